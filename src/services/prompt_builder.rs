use crate::{
    schemas::{render_schema_for_prompt, CompletionSchema},
    types::{Itinerary, TripPreferences, Vibe},
};

/// System message sent ahead of every planning prompt.
pub const SYSTEM_PROMPT: &str = "You are a JSON-only travel planner.";

const CONVENTIONAL_MAX: u8 = 20;
const BALANCED_MAX: u8 = 60;
const OFFBEAT_PICKS_THRESHOLD: u8 = 30;

/// Qualitative reading of the 0..=100 quirkiness dial.
pub fn quirk_descriptor(quirkiness: u8) -> &'static str {
    if quirkiness <= CONVENTIONAL_MAX {
        "conventional & popular"
    } else if quirkiness <= BALANCED_MAX {
        "balanced with a few offbeat gems"
    } else {
        "playfully offbeat, local, and unusual"
    }
}

fn vibe_text(vibe: Vibe) -> &'static str {
    match vibe {
        Vibe::Mixed => "a balanced mix of food, outdoors, culture, and nightlife",
        other => other.as_str(),
    }
}

fn or_none(text: &str) -> &str {
    if text.is_empty() {
        "none"
    } else {
        text
    }
}

/// Build the user prompt for one planning request.
///
/// Free-text fields are interpolated as given.
pub fn build_prompt(prefs: &TripPreferences) -> String {
    let schema = render_schema_for_prompt(Itinerary::schema());
    let month_hint = prefs
        .month_hint
        .as_deref()
        .filter(|hint| !hint.trim().is_empty())
        .map(|hint| format!(" The trip is around: {hint}."))
        .unwrap_or_default();

    format!(
        r#"
You are **AI Travel Buddy**, a helpful travel planner that outputs **valid JSON** conforming to this schema:
{schema}

Key rules:
- Always return **ONLY** JSON (no markdown, no commentary).
- Tailor to the user's preferences and constraints.
- Respect **dietary** needs and **avoid** list.
- Calibrate **quirkiness**: {quirkiness}/100 → {quirk_desc}.
- Prefer walkable clusters and logical neighborhood groupings.
- Include at least 1-2 **offbeat picks** if quirkiness > {offbeat_threshold}.
- Budget levels: {budget_levels}.
- If month/season provided, align with weather/seasonal factors.
- Safety: Avoid risky/illegal suggestions. No medical/legal advice.

User request:
- Destination: {destination}
- Duration (days): {days}
- Budget level: {budget}
- Pace: {pace}
- Vibe: {vibe}
- Companions: {companions}
- Dietary: {dietary}
- Must-do: {must_do}
- Avoid: {avoid}
- Quirkiness: {quirkiness}/100.{month_hint}

Output requirements:
- Provide a concise "overview" explaining how the plan matches the inputs.
- Create a "daily_plan" with day numbers 1..N and clear morning/afternoon/evening blocks.
- "dining" can be included with suggestions relevant to dietary needs.
- Provide optional "highlights", "offbeat_picks", "budget_breakdown", "tips", "sources".
- **Return only JSON.**
"#,
        quirkiness = prefs.quirkiness,
        quirk_desc = quirk_descriptor(prefs.quirkiness),
        offbeat_threshold = OFFBEAT_PICKS_THRESHOLD,
        budget_levels = crate::types::BudgetLevel::VARIANTS.join(", "),
        destination = prefs.destination,
        days = prefs.days,
        budget = prefs.budget_level,
        pace = prefs.pace,
        vibe = vibe_text(prefs.vibe),
        companions = prefs.companions,
        dietary = prefs.dietary,
        must_do = or_none(&prefs.must_do),
        avoid = or_none(&prefs.avoid),
    )
}
