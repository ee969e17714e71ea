use std::{fmt, str::FromStr};

use super::preferences::{BudgetLevel, Companions, Dietary, Pace, TripPreferences, Vibe};
use crate::error::PlannerError;

/// Canned example trips for quick demos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Tokyo Foodie (5 days)
    Tokyo,
    /// Lisbon Outdoors (4 days)
    Lisbon,
    /// NYC Culture (3 days, offbeat)
    Nyc,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Tokyo, Preset::Lisbon, Preset::Nyc];
    pub const VARIANTS: &'static [&'static str] = &["tokyo", "lisbon", "nyc"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Tokyo => "tokyo",
            Preset::Lisbon => "lisbon",
            Preset::Nyc => "nyc",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Preset::Tokyo => "Tokyo Foodie (5 days)",
            Preset::Lisbon => "Lisbon Outdoors (4 days)",
            Preset::Nyc => "NYC Culture (3 days, Offbeat)",
        }
    }

    pub fn preferences(&self) -> TripPreferences {
        match self {
            Preset::Tokyo => TripPreferences::new("Tokyo, Japan", 5)
                .with_budget_level(BudgetLevel::Moderate)
                .with_pace(Pace::Balanced)
                .with_vibe(Vibe::Foodie)
                .with_companions(Companions::Solo)
                .with_dietary(Dietary::None)
                .with_must_do("Tsukiji outer market; kissaten coffee; ramen; Japanese whisky bars")
                .with_avoid("long bus rides")
                .with_quirkiness(40)
                .with_month_hint("April"),
            Preset::Lisbon => TripPreferences::new("Lisbon, Portugal", 4)
                .with_budget_level(BudgetLevel::Moderate)
                .with_pace(Pace::Balanced)
                .with_vibe(Vibe::Outdoors)
                .with_companions(Companions::Couple)
                .with_dietary(Dietary::Vegetarian)
                .with_must_do("Miradouros (viewpoints), tram 28, pastel de nata")
                .with_avoid("crowded mega-malls")
                .with_quirkiness(30)
                .with_month_hint("May"),
            Preset::Nyc => TripPreferences::new("New York City, USA", 3)
                .with_budget_level(BudgetLevel::Premium)
                .with_pace(Pace::Packed)
                .with_vibe(Vibe::Culture)
                .with_companions(Companions::Friends)
                .with_dietary(Dietary::GlutenFree)
                .with_must_do("Off-Broadway theater, galleries, speakeasies")
                .with_avoid("Times Square, chain restaurants")
                .with_quirkiness(80)
                .with_month_hint("October"),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preset {
    type Err = PlannerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "tokyo" => Ok(Preset::Tokyo),
            "lisbon" => Ok(Preset::Lisbon),
            "nyc" => Ok(Preset::Nyc),
            other => Err(PlannerError::Validation(format!(
                "unknown preset `{other}` (expected one of: {})",
                Self::VARIANTS.join(", ")
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        for name in Preset::VARIANTS {
            let preset: Preset = name.parse().unwrap();
            assert_eq!(preset.as_str(), *name);
            assert!(preset.preferences().validate().is_ok());
        }
    }

    #[test]
    fn test_nyc_preset_is_offbeat() {
        let prefs = Preset::Nyc.preferences();
        assert_eq!(prefs.destination, "New York City, USA");
        assert_eq!(prefs.days, 3);
        assert_eq!(prefs.quirkiness, 80);
        assert_eq!(prefs.dietary, Dietary::GlutenFree);
        assert_eq!(prefs.month_hint.as_deref(), Some("October"));
    }

    #[test]
    fn test_all_matches_variant_names() {
        let names: Vec<&str> = Preset::ALL.iter().map(Preset::as_str).collect();
        assert_eq!(names, Preset::VARIANTS);
        assert_eq!(Preset::Lisbon.label(), "Lisbon Outdoors (4 days)");
    }

    #[test]
    fn test_unknown_preset() {
        assert!("paris".parse::<Preset>().is_err());
    }
}
