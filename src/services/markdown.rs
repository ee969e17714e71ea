use serde_json::Value;
use tracing::trace;

use crate::types::{DayEntry, Itinerary};

const DEFAULT_TITLE: &str = "your trip";

/// Render an itinerary as a Markdown document.
///
/// Section order is fixed: title, overview, daily plan, highlights, offbeat
/// picks, budget breakdown, tips, sources. Sections without data are left
/// out entirely.
pub fn render_markdown(plan: &Itinerary) -> String {
    let mut md = Vec::new();

    md.push(format!(
        "# Itinerary for {}",
        plan.destination.as_deref().unwrap_or(DEFAULT_TITLE)
    ));

    // An empty overview is dropped even when the key was present.
    if !plan.overview.is_empty() {
        md.push(format!("\n**Overview**\n\n{}\n", plan.overview));
    }

    if !plan.daily_plan.is_empty() {
        md.push("## Daily Plan\n".to_string());
        for (idx, day) in plan.daily_plan.iter().enumerate() {
            push_day(&mut md, idx, day);
        }
    }

    push_list(&mut md, "Highlights", plan.highlights.as_deref());
    push_list(&mut md, "Offbeat Picks", plan.offbeat_picks.as_deref());

    if let Some(budget) = plan.budget_breakdown.as_ref().filter(|b| !b.is_empty()) {
        md.push("## Budget Breakdown\n".to_string());
        for (key, value) in budget {
            md.push(format!(
                "- **{}**: {}",
                title_case(&key.replace('_', " ")),
                display_value(value)
            ));
        }
        md.push(String::new());
    }

    push_list(&mut md, "Tips", plan.tips.as_deref());
    push_list(&mut md, "Sources", plan.sources.as_deref());

    md.join("\n")
}

fn push_day(md: &mut Vec<String>, idx: usize, day: &DayEntry) {
    let number = day
        .day
        .as_ref()
        .map(|label| label.to_string())
        .unwrap_or_else(|| "?".to_string());

    // Numbering is expected to follow position, not enforced.
    if day
        .day
        .as_ref()
        .and_then(|label| label.number())
        .is_some_and(|n| n != idx as u64 + 1)
    {
        trace!(
            target: "travel_buddy::render",
            position = idx + 1,
            day = %number,
            "day numbers out of sequence"
        );
    }

    md.push(format!(
        "### Day {number}\n- **Morning:** {}\n- **Afternoon:** {}\n- **Evening:** {}",
        day.morning, day.afternoon, day.evening
    ));
    if let Some(dining) = day.dining.as_deref().filter(|d| !d.is_empty()) {
        md.push(format!("- **Dining ideas:** {dining}"));
    }
    md.push(String::new());
}

fn push_list(md: &mut Vec<String>, heading: &str, items: Option<&[String]>) {
    let Some(items) = items.filter(|items| !items.is_empty()) else {
        return;
    };

    let bullets: Vec<String> = items.iter().map(|item| format!("- {item}")).collect();
    md.push(format!("## {heading}\n{}\n", bullets.join("\n")));
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Title-case `text`: a letter is upper-cased when the preceding character
/// is not a letter and lower-cased otherwise.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_is_letter = false;

    for ch in text.chars() {
        if ch.is_alphabetic() {
            if prev_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(ch);
            prev_is_letter = false;
        }
    }

    out
}
