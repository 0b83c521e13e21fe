use chrono::{DateTime, Local, Utc};

use crate::history;
use crate::wire::{BriefingRequest, BusinessCategory, HistoryEntry, Tone};

pub const NO_DATA_SENTINEL: &str = "No data provided today.";
pub const NO_HISTORY_SENTINEL: &str = "No data from the last 7 days.";

/// JSON field the classifier must fill.
pub const CATEGORY_FIELD: &str = "businessType";

fn tone_instruction(tone: Tone) -> &'static str {
    match tone {
        Tone::Strategic => {
r#"Tone: Strategic. Think like a seasoned strategist with a long-term view. Frame today's numbers against the bigger picture: positioning, growth trajectory, and where the business should be a few months from now. Favour leverage and compounding moves over quick fixes."#
        }
        Tone::ToughLove => {
r#"Tone: Tough Love. Be a direct, no-nonsense coach. Call out weak spots plainly, skip the sugar-coating, and hold the entrepreneur accountable for acting today. Be firm but never insulting."#
        }
        Tone::Chill => {
r#"Tone: Chill. Be a calm, supportive mentor. Keep the language relaxed and reassuring while still giving clear, practical guidance. Celebrate small wins and keep pressure low."#
        }
    }
}

fn section_format() -> &'static str {
r#"🧭 **Daily Overview** — One short paragraph summarizing key performance highlights and what they mean for the business today. Focus on insight, not restating data.

⚠️ **What Needs Attention** — Identify one issue, risk area, or weak signal that could impact progress. Explain it briefly.

💡 **Smart Moves for Today** — Give 2–3 specific, actionable recommendations to grow revenue, improve efficiency, or strengthen the brand. Each recommendation should be a new bullet point starting with "• ".

🔥 **Decision of the Day** — One single prioritized decision the entrepreneur should make today. Be decisive and persuasive.

💭 **CEO Thought** — End with a short motivational quote or personalized encouragement line that fits the tone of the report."#
}

fn date_label(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%-m/%-d/%Y").to_string()
}

/// Entries inside the trailing window, oldest first, one record per entry.
pub fn history_block(entries: &[HistoryEntry], now: DateTime<Utc>) -> String {
    let mut recent = history::within_window(entries, now);
    if recent.is_empty() {
        return NO_HISTORY_SENTINEL.to_string();
    }
    recent.reverse();
    recent
        .iter()
        .map(|e| format!("Date: {}\nData: {}", date_label(&e.timestamp), e.data))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Full instruction text for the daily briefing.
pub fn briefing_prompt(req: &BriefingRequest, now: DateTime<Utc>) -> String {
    let data = if req.raw_user_text.trim().is_empty() {
        NO_DATA_SENTINEL
    } else {
        req.raw_user_text.as_str()
    };
    let history = history_block(&req.historical_entries, now);

    format!(
r#"You are DecisionDesk, an AI business strategist and daily advisor for busy entrepreneurs.
Your job is to turn the user's input data into a concise, insight-rich morning business briefing that helps them decide what to focus on today.

Historical Data (last 7 days, oldest first):
{history}

Trend Analysis: compare today's data with the historical data above. Point out momentum, declines, or repeating patterns and let them shape your advice. If there is no historical data, focus on today alone.

Use the user's data to interpret trends and produce a clear, confident report in the following markdown-style format. Use the exact emoji prefixes and heading format. Each section must be on a new line.

{sections}

Writing Style Guidelines:
- Max 300 words total.
- {tone}
- Avoid generic business jargon; use natural language and fresh phrasing.
- Always interpret what the data means, don't just restate what it says.
- DO NOT output explanations of your reasoning or any commentary about this prompt — just give the formatted briefing.

If the user provides "{no_data}", give a short default productivity tip and encouragement in the same format. For "Smart Moves", suggest a generic productivity tip. For "Decision of the Day", suggest a small, manageable task.

Today's Business Data:
{data}
"#,
        history = history,
        sections = section_format(),
        tone = tone_instruction(req.tone),
        no_data = NO_DATA_SENTINEL,
        data = data,
    )
}

/// Instruction for the single-field business classification.
pub fn classification_prompt(user_data: &str) -> String {
    let categories = BusinessCategory::labels().join(", ");
    format!(
r#"Classify the business described by the data below into exactly one of these categories: {categories}.
If nothing fits, use "Other".
Return a JSON object with a single field "{field}" holding the category.

Business Data:
{data}
"#,
        categories = categories,
        field = CATEGORY_FIELD,
        data = user_data.trim(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn entry(days_ago: i64, data: &str) -> HistoryEntry {
        HistoryEntry {
            timestamp: now() - Duration::days(days_ago),
            data: data.to_string(),
        }
    }

    #[test]
    fn blank_input_uses_no_data_sentinel() {
        for raw in ["", "   ", "\n\t "] {
            let req = BriefingRequest::new(raw, Tone::Chill, vec![]);
            let prompt = briefing_prompt(&req, now());
            assert!(prompt.contains(&format!("Today's Business Data:\n{NO_DATA_SENTINEL}")));
        }
    }

    #[test]
    fn every_tone_has_its_own_instruction() {
        let p = |t| briefing_prompt(&BriefingRequest::new("x", t, vec![]), now());
        assert!(p(Tone::Strategic).contains("long-term view"));
        assert!(p(Tone::ToughLove).contains("direct, no-nonsense coach"));
        assert!(p(Tone::Chill).contains("calm, supportive mentor"));
    }

    #[test]
    fn unknown_tone_label_gets_mentor_instruction() {
        let req = BriefingRequest::new("x", Tone::from_label("Balanced"), vec![]);
        let prompt = briefing_prompt(&req, now());
        assert!(prompt.contains("calm, supportive mentor"));
        assert!(!prompt.contains("no-nonsense"));
    }

    #[test]
    fn prompt_names_all_five_sections() {
        let prompt = briefing_prompt(&BriefingRequest::new("x", Tone::Chill, vec![]), now());
        for header in [
            "🧭 **Daily Overview** —",
            "⚠️ **What Needs Attention** —",
            "💡 **Smart Moves for Today** —",
            "🔥 **Decision of the Day** —",
            "💭 **CEO Thought** —",
        ] {
            assert!(prompt.contains(header), "missing {header}");
        }
        assert!(prompt.contains("Max 300 words"));
    }

    #[test]
    fn history_block_drops_old_entries_and_reads_oldest_first() {
        // stored newest first
        let entries = vec![entry(1, "yesterday"), entry(3, "three days"), entry(8, "too old")];
        let block = history_block(&entries, now());
        assert!(!block.contains("too old"));
        let three = block.find("three days").unwrap();
        let one = block.find("yesterday").unwrap();
        assert!(three < one);
        assert!(block.starts_with("Date: "));
        assert!(block.contains(&format!("Date: {}\nData: yesterday", date_label(&entries[0].timestamp))));
    }

    #[test]
    fn history_block_without_recent_entries_uses_sentinel() {
        assert_eq!(history_block(&[], now()), NO_HISTORY_SENTINEL);
        assert_eq!(history_block(&[entry(30, "old")], now()), NO_HISTORY_SENTINEL);
    }

    #[test]
    fn tough_love_scenario_prompt() {
        let req = BriefingRequest::new("Sales: $500, no ad spend", Tone::from_label("Tough Love"), vec![]);
        let prompt = briefing_prompt(&req, now());
        assert!(prompt.contains("direct, no-nonsense coach"));
        assert!(prompt.contains("Sales: $500, no ad spend"));
        assert!(prompt.contains(NO_HISTORY_SENTINEL));
    }

    #[test]
    fn classification_prompt_lists_every_category() {
        let prompt = classification_prompt("  Sold 40 lattes  ");
        for label in BusinessCategory::labels() {
            assert!(prompt.contains(label));
        }
        assert!(prompt.contains("\"businessType\""));
        assert!(prompt.contains("Business Data:\nSold 40 lattes\n"));
    }
}
