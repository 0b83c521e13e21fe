use regex::Regex;
use std::sync::OnceLock;

use crate::wire::BriefingSection;

/// Section headers, matched as exact code point sequences.
pub const SECTION_MARKERS: [&str; 5] = ["🧭", "⚠️", "💡", "🔥", "💭"];

const BOLD: &str = "**";
const DASH: char = '—';
const BULLET: char = '•';

fn marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let alternatives: Vec<String> = SECTION_MARKERS.iter().map(|m| regex::escape(m)).collect();
        Regex::new(&alternatives.join("|")).expect("marker alternation is a valid pattern")
    })
}

/// Cuts `text` immediately before every marker, keeping the marker on the
/// following chunk. Blank chunks are dropped.
fn split_chunks(text: &str) -> Vec<&str> {
    let mut cuts: Vec<usize> = marker_re()
        .find_iter(text)
        .map(|m| m.start())
        .filter(|&i| i > 0)
        .collect();
    cuts.push(text.len());

    let mut chunks = Vec::with_capacity(cuts.len());
    let mut start = 0;
    for end in cuts {
        let chunk = &text[start..end];
        if !chunk.trim().is_empty() {
            chunks.push(chunk);
        }
        start = end;
    }
    chunks
}

fn parse_chunk(chunk: &str) -> BriefingSection {
    let trimmed = chunk.trim();
    if !SECTION_MARKERS.iter().any(|m| trimmed.starts_with(m)) {
        return BriefingSection::degenerate(trimmed);
    }
    let Some((ws_at, ws)) = trimmed.char_indices().find(|(_, c)| c.is_whitespace()) else {
        return BriefingSection::degenerate(trimmed);
    };

    let emoji = &trimmed[..ws_at];
    let rest = trimmed[ws_at + ws.len_utf8()..].replace(BOLD, "");

    match rest.find(DASH) {
        None => BriefingSection::new(emoji, rest.trim(), ""),
        Some(at) => BriefingSection::new(
            emoji,
            rest[..at].trim(),
            rest[at + DASH.len_utf8()..].trim(),
        ),
    }
}

/// Best-effort split of a generated briefing into titled sections.
///
/// Never fails. Text without any marker comes back as one degenerate
/// section; blank text yields no sections. A marker that is missing or
/// encoded differently upstream merges its section into the previous one.
pub fn parse_briefing(text: &str) -> Vec<BriefingSection> {
    split_chunks(text).into_iter().map(parse_chunk).collect()
}

/// Display pieces of a section body. Bullets open list items and newlines
/// become breaks; everything else is literal text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFragment<'a> {
    Text(&'a str),
    Item(&'a str),
    Break,
}

pub fn body_fragments(body: &str) -> Vec<BodyFragment<'_>> {
    let mut out = Vec::new();
    for (i, line) in body.split('\n').enumerate() {
        if i > 0 {
            out.push(BodyFragment::Break);
        }
        let mut pieces = line.split(BULLET);
        if let Some(lead) = pieces.next() {
            if !lead.is_empty() {
                out.push(BodyFragment::Text(lead));
            }
        }
        for item in pieces {
            out.push(BodyFragment::Item(item));
        }
    }
    out
}

pub(crate) fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// HTML for a section body: `•` becomes `<li>`, `\n` becomes `<br />`, and
/// the rest is escaped so generated text never turns into markup.
pub fn body_html(body: &str) -> String {
    body_fragments(body)
        .into_iter()
        .map(|f| match f {
            BodyFragment::Text(t) => escape_html(t),
            BodyFragment::Item(t) => format!("<li>{}", escape_html(t)),
            BodyFragment::Break => "<br />".to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn five_well_formed_sections_in_order() {
        let text = "🧭 **Daily Overview** — Revenue is up.\n\n\
                    ⚠️ **What Needs Attention** — Ad costs crept higher.\n\n\
                    💡 **Smart Moves for Today** — • Bundle pastries\n• Post a reel\n\n\
                    🔥 **Decision of the Day** — Pause the Facebook campaign.\n\n\
                    💭 **CEO Thought** — Small steps, big mornings.";
        let sections = parse_briefing(text);
        assert_eq!(
            sections,
            vec![
                BriefingSection::new("🧭", "Daily Overview", "Revenue is up."),
                BriefingSection::new("⚠️", "What Needs Attention", "Ad costs crept higher."),
                BriefingSection::new("💡", "Smart Moves for Today", "• Bundle pastries\n• Post a reel"),
                BriefingSection::new("🔥", "Decision of the Day", "Pause the Facebook campaign."),
                BriefingSection::new("💭", "CEO Thought", "Small steps, big mornings."),
            ]
        );
    }

    #[test]
    fn markers_split_without_newlines() {
        let text = "🧭 **Overview** — Good day.⚠️ **Attention** — Watch spend.💡 **Moves** — • Do X\n• Do Y";
        let sections = parse_briefing(text);
        let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Overview", "Attention", "Moves"]);
        assert_eq!(sections[0].body, "Good day.");
        assert_eq!(sections[2].body, "• Do X\n• Do Y");
    }

    #[test]
    fn text_without_markers_is_one_degenerate_section() {
        let sections = parse_briefing("  Sorry, I could not produce a briefing today.  ");
        assert_eq!(sections, vec![BriefingSection::degenerate("Sorry, I could not produce a briefing today.")]);
        assert!(sections[0].is_degenerate());
    }

    #[test]
    fn blank_text_yields_nothing() {
        assert!(parse_briefing("").is_empty());
        assert!(parse_briefing(" \n\t").is_empty());
    }

    #[test]
    fn preamble_before_first_marker_is_kept_as_degenerate() {
        let sections = parse_briefing("Here you go:\n🧭 **Overview** — Fine.");
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0], BriefingSection::degenerate("Here you go:"));
        assert_eq!(sections[1].title, "Overview");
    }

    #[test]
    fn header_without_dash_is_title_only() {
        let sections = parse_briefing("🔥 **Decision of the Day**");
        assert_eq!(sections, vec![BriefingSection::new("🔥", "Decision of the Day", "")]);
    }

    #[test]
    fn lone_marker_without_whitespace_is_degenerate() {
        assert_eq!(parse_briefing("💭"), vec![BriefingSection::degenerate("💭")]);
    }

    #[test]
    fn only_first_dash_separates_title() {
        let sections = parse_briefing("🧭 **Overview** — Sales — and more sales.");
        assert_eq!(sections[0].title, "Overview");
        assert_eq!(sections[0].body, "Sales — and more sales.");
    }

    #[test]
    fn warning_sign_without_variation_selector_does_not_split() {
        let sections = parse_briefing("🧭 **Overview** — Fine. ⚠ **Attention** — Careful.");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].body, "Fine. ⚠ Attention — Careful.");
    }

    #[test]
    fn body_html_only_adds_list_items_and_breaks() {
        let html = body_html("• Do <b>X</b>\n• Say \"hi\" & wave");
        assert_eq!(html, "<li> Do &lt;b&gt;X&lt;/b&gt;<br /><li> Say &quot;hi&quot; &amp; wave");
    }

    #[test]
    fn body_fragments_mix_text_and_items() {
        assert_eq!(
            body_fragments("Try these: • one • two\nthen rest"),
            vec![
                BodyFragment::Text("Try these: "),
                BodyFragment::Item(" one "),
                BodyFragment::Item(" two"),
                BodyFragment::Break,
                BodyFragment::Text("then rest"),
            ]
        );
    }
}
