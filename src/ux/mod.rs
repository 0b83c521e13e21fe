use colored::{Color, Colorize};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::time::Duration;

use crate::segment::{self, BodyFragment};
use crate::wire::{Briefing, BriefingSection, BusinessCategory, HistoryEntry, Tone};

/// Cosmetic styling picked from the business category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub accent: Color,
    pub icon: &'static str,
}

pub fn theme(category: BusinessCategory) -> Theme {
    let (accent, icon) = match category {
        BusinessCategory::Coffee => (Color::Yellow, "☕"),
        BusinessCategory::Restaurant => (Color::Red, "🍽️"),
        BusinessCategory::Gym => (Color::BrightRed, "💪"),
        BusinessCategory::Fashion => (Color::Magenta, "👗"),
        BusinessCategory::Tech => (Color::Cyan, "💻"),
        BusinessCategory::Marketing => (Color::BrightMagenta, "📣"),
        BusinessCategory::RealEstate => (Color::Green, "🏠"),
        BusinessCategory::Education => (Color::Blue, "🎓"),
        BusinessCategory::Travel => (Color::BrightCyan, "✈️"),
        BusinessCategory::Music => (Color::BrightBlue, "🎵"),
        BusinessCategory::Other => (Color::BrightWhite, "📊"),
    };
    Theme { accent, icon }
}

pub fn print_header() {
    println!("\n{}", "DecisionDesk AI".bold());
    println!("{}", "Your AI Business Strategist for a Focused Day.".dimmed());
}

pub fn print_welcome(tone: Tone) {
    println!(
        "\nInput your daily stats, and I'll generate a focused morning briefing to guide your day. (tone: {})",
        tone.label().bold()
    );
    println!("  {} Key metrics like sales, user activity, ad spend, or even team morale updates.", "What to provide?".bold());
    println!("  {} Submit without data to get a general productivity tip to start your day strong.", "No data today?".bold());
    println!(
        "  {}",
        "End a block with an empty line. Commands: :tone <strategic|chill|tough love>, :history, :quit".dimmed()
    );
}

pub fn prompt_marker() {
    print!("{} ", ">".bold());
    let _ = io::stdout().flush();
}

/// "Analyzing..." spinner; hidden when `plain`.
pub fn spinner(plain: bool) -> ProgressBar {
    if plain {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message("Analyzing...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub fn print_error(message: &str) {
    eprintln!("\n{} {}", "✖".red().bold(), message.red());
}

pub fn print_history(entries: &[HistoryEntry]) {
    if entries.is_empty() {
        println!("(no submissions in the last 7 days)");
        return;
    }
    for e in entries {
        println!("{}  {}", e.timestamp.format("%Y-%m-%d %H:%M").to_string().dimmed(), e.data.replace('\n', " / "));
    }
}

fn indent(s: &str, n: usize) -> String {
    let pad = " ".repeat(n);
    s.lines()
        .map(|l| format!("{}{}", pad, l))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Terminal text for a section body: each bullet starts its own line.
pub fn body_text(body: &str) -> String {
    let mut out = String::new();
    for fragment in segment::body_fragments(body) {
        match fragment {
            BodyFragment::Text(t) => out.push_str(t),
            BodyFragment::Item(t) => {
                if !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
                out.push_str("• ");
                out.push_str(t.trim());
            }
            BodyFragment::Break => out.push('\n'),
        }
    }
    out
}

fn print_section(section: &BriefingSection, theme: Theme) {
    if section.is_degenerate() {
        println!("{}\n", indent(&body_text(&section.body), 2));
        return;
    }
    println!("{}  {}", section.emoji, section.title.color(theme.accent).bold());
    if !section.body.is_empty() {
        println!("{}", indent(&body_text(&section.body), 4));
    }
    println!();
}

pub fn print_briefing(briefing: &Briefing) {
    let theme = theme(briefing.business_type);
    println!(
        "\n{}",
        format!("┏━━━━━━━━━━━━━━━━━━━━ {} Your Daily Focus ━━━━━━━━━━━━━━━━━━━━┓", theme.icon)
            .color(theme.accent)
            .bold()
    );
    println!(
        "  {}: {}   {}: {}\n",
        "Business".bold(),
        briefing.business_type.label(),
        "Tone".bold(),
        briefing.tone.label()
    );
    for section in &briefing.sections {
        print_section(section, theme);
    }
    println!(
        "{}",
        "┗━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━┛".color(theme.accent).bold()
    );
}

/// Standalone HTML fragment for the display panel.
pub fn render_html(briefing: &Briefing) -> String {
    let mut out = format!(
        "<section class=\"briefing\" data-business-type=\"{}\">\n  <h2>Your Daily Focus</h2>\n",
        segment::escape_html(briefing.business_type.label())
    );
    for s in &briefing.sections {
        out.push_str(&format!(
            "  <div class=\"briefing-section\">\n    <span class=\"emoji\">{}</span>\n    <h3>{}</h3>\n    <div class=\"content\">{}</div>\n  </div>\n",
            segment::escape_html(&s.emoji),
            segment::escape_html(&s.title),
            segment::body_html(&s.body)
        ));
    }
    out.push_str("</section>\n");
    out
}
