use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};

pub const MIN_DAYS: u32 = 1;
pub const MAX_QUIRKINESS: u8 = 100;
const SURPRISE_DESTINATION: &str = "Surprise Me";

/// Declares a closed set of lowercase options with `Display`/`FromStr`
/// implementations matching their serde names.
macro_rules! preference_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident { $($variant:ident => $wire:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $wire)] $variant),+
        }

        impl $name {
            /// Every accepted value, in display order.
            pub const VARIANTS: &'static [&'static str] = &[$($wire),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = PlannerError;

            fn from_str(value: &str) -> Result<Self> {
                match value.trim().to_ascii_lowercase().as_str() {
                    $($wire => Ok($name::$variant),)+
                    other => Err(PlannerError::Validation(format!(
                        "unknown {} `{}` (expected one of: {})",
                        stringify!($name),
                        other,
                        Self::VARIANTS.join(", ")
                    ))),
                }
            }
        }
    };
}

preference_enum! {
    /// How much the traveler wants to spend.
    pub enum BudgetLevel {
        Shoestring => "shoestring",
        Moderate => "moderate",
        Premium => "premium",
        Luxury => "luxury",
    }
}

preference_enum! {
    /// How densely each day should be scheduled.
    pub enum Pace {
        Relaxed => "relaxed",
        Balanced => "balanced",
        Packed => "packed",
    }
}

preference_enum! {
    /// Overall flavor of the trip.
    pub enum Vibe {
        Foodie => "foodie",
        Outdoors => "outdoors",
        Culture => "culture",
        Nightlife => "nightlife",
        Family => "family",
        Romantic => "romantic",
        Mixed => "mixed",
    }
}

preference_enum! {
    /// Who the traveler is going with.
    pub enum Companions {
        Solo => "solo",
        Couple => "couple",
        Friends => "friends",
        Family => "family",
        Business => "business",
    }
}

preference_enum! {
    /// Dietary restriction the dining suggestions must respect.
    pub enum Dietary {
        None => "none",
        Vegetarian => "vegetarian",
        Vegan => "vegan",
        Halal => "halal",
        Kosher => "kosher",
        GlutenFree => "gluten-free",
        Other => "other",
    }
}

/// Everything the traveler told us about the trip.
///
/// Built once per planning request and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripPreferences {
    /// City or region, e.g. "Kyoto, Japan"
    pub destination: String,
    /// Trip length in days, at least 1
    pub days: u32,
    pub budget_level: BudgetLevel,
    pub pace: Pace,
    pub vibe: Vibe,
    pub companions: Companions,
    pub dietary: Dietary,
    /// Free text, e.g. "tea ceremony, ramen, live jazz"
    pub must_do: String,
    /// Free text, e.g. "long hikes, night buses"
    pub avoid: String,
    /// 0 is conventional, 100 is as offbeat as it gets
    pub quirkiness: u8,
    /// Month or season, e.g. "April" or "Oct 2025"
    pub month_hint: Option<String>,
}

impl Default for TripPreferences {
    fn default() -> Self {
        Self {
            destination: String::new(),
            days: 5,
            budget_level: BudgetLevel::Moderate,
            pace: Pace::Balanced,
            vibe: Vibe::Mixed,
            companions: Companions::Solo,
            dietary: Dietary::None,
            must_do: String::new(),
            avoid: String::new(),
            quirkiness: 50,
            month_hint: None,
        }
    }
}

impl TripPreferences {
    pub fn new(destination: impl Into<String>, days: u32) -> Self {
        Self {
            destination: destination.into(),
            days,
            ..Self::default()
        }
    }

    pub fn with_budget_level(mut self, budget_level: BudgetLevel) -> Self {
        self.budget_level = budget_level;
        self
    }

    pub fn with_pace(mut self, pace: Pace) -> Self {
        self.pace = pace;
        self
    }

    pub fn with_vibe(mut self, vibe: Vibe) -> Self {
        self.vibe = vibe;
        self
    }

    pub fn with_companions(mut self, companions: Companions) -> Self {
        self.companions = companions;
        self
    }

    pub fn with_dietary(mut self, dietary: Dietary) -> Self {
        self.dietary = dietary;
        self
    }

    pub fn with_must_do(mut self, must_do: impl Into<String>) -> Self {
        self.must_do = must_do.into();
        self
    }

    pub fn with_avoid(mut self, avoid: impl Into<String>) -> Self {
        self.avoid = avoid.into();
        self
    }

    pub fn with_quirkiness(mut self, quirkiness: u8) -> Self {
        self.quirkiness = quirkiness;
        self
    }

    pub fn with_month_hint(mut self, month_hint: impl Into<String>) -> Self {
        self.month_hint = Some(month_hint.into());
        self
    }

    /// Check the record invariants: `days >= 1` and `quirkiness <= 100`.
    pub fn validate(&self) -> Result<()> {
        if self.days < MIN_DAYS {
            return Err(PlannerError::Validation(format!(
                "trip length must be at least {MIN_DAYS} day, got {}",
                self.days
            )));
        }
        if self.quirkiness > MAX_QUIRKINESS {
            return Err(PlannerError::Validation(format!(
                "quirkiness must be between 0 and {MAX_QUIRKINESS}, got {}",
                self.quirkiness
            )));
        }
        Ok(())
    }

    /// Trim the free-text fields, drop a blank month hint and fall back to
    /// "Surprise Me" when no destination was given.
    pub fn normalized(mut self) -> Self {
        let destination = self.destination.trim();
        self.destination = if destination.is_empty() {
            SURPRISE_DESTINATION.to_string()
        } else {
            destination.to_string()
        };
        self.must_do = self.must_do.trim().to_string();
        self.avoid = self.avoid.trim().to_string();
        self.month_hint = self
            .month_hint
            .as_deref()
            .map(str::trim)
            .filter(|hint| !hint.is_empty())
            .map(str::to_string);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_round_trips_through_strings() {
        assert_eq!("gluten-free".parse::<Dietary>().unwrap(), Dietary::GlutenFree);
        assert_eq!(Dietary::GlutenFree.to_string(), "gluten-free");
        assert_eq!(" Luxury ".parse::<BudgetLevel>().unwrap(), BudgetLevel::Luxury);
        assert_eq!(
            serde_json::to_value(Companions::Business).unwrap(),
            serde_json::json!("business")
        );
    }

    #[test]
    fn test_unknown_enum_value_lists_choices() {
        let err = "hyperactive".parse::<Pace>().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Pace"));
        assert!(message.contains("relaxed, balanced, packed"));
    }

    #[test]
    fn test_validate_bounds() {
        assert!(TripPreferences::new("Oslo", 1).validate().is_ok());
        assert!(TripPreferences::new("Oslo", 0).validate().is_err());
        assert!(TripPreferences::new("Oslo", 3)
            .with_quirkiness(100)
            .validate()
            .is_ok());
        assert!(TripPreferences::new("Oslo", 3)
            .with_quirkiness(101)
            .validate()
            .is_err());
    }

    #[test]
    fn test_normalized_fills_destination_and_trims() {
        let prefs = TripPreferences::new("   ", 2)
            .with_must_do("  ramen ")
            .with_avoid("\tcrowds\n")
            .with_month_hint("   ")
            .normalized();

        assert_eq!(prefs.destination, "Surprise Me");
        assert_eq!(prefs.must_do, "ramen");
        assert_eq!(prefs.avoid, "crowds");
        assert_eq!(prefs.month_hint, None);
    }

    #[test]
    fn test_default_matches_form_defaults() {
        let prefs = TripPreferences::default();
        assert_eq!(prefs.days, 5);
        assert_eq!(prefs.budget_level, BudgetLevel::Moderate);
        assert_eq!(prefs.pace, Pace::Balanced);
        assert_eq!(prefs.vibe, Vibe::Mixed);
        assert_eq!(prefs.companions, Companions::Solo);
        assert_eq!(prefs.dietary, Dietary::None);
        assert_eq!(prefs.quirkiness, 50);
    }
}
