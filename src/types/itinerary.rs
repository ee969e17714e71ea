use std::fmt;

use crate::completion_schema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Overview used when nothing in the model reply could be parsed.
pub const UNPARSEABLE_OVERVIEW: &str = "Could not parse JSON from model.";

/// Structured itinerary returned by the travel planner model.
///
/// Deserialization is lenient so that any JSON object the model returns is
/// usable: `null` reads as absent, mistyped text fields keep their JSON text
/// and keys outside the schema are carried in `extra`.
#[completion_schema]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Itinerary {
    /// Destination the plan was made for; filled from the request when omitted
    #[serde(
        default,
        deserialize_with = "lenient::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub destination: Option<String>,
    /// Short intro and how the plan suits the user.
    #[completion(required)]
    #[serde(default, deserialize_with = "lenient::text")]
    pub overview: String,
    /// One entry per day, numbered 1..N
    #[completion(required)]
    #[serde(default, deserialize_with = "lenient::days")]
    pub daily_plan: Vec<DayEntry>,
    /// Key experiences of the trip
    #[serde(
        default,
        deserialize_with = "lenient::text_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub highlights: Option<Vec<String>>,
    /// Local, unusual or lesser-known picks
    #[serde(
        default,
        deserialize_with = "lenient::text_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub offbeat_picks: Option<Vec<String>>,
    /// Free-text estimates keyed by category, e.g. lodging_per_night, food_per_day, transport, activities, total_estimate
    #[serde(
        default,
        deserialize_with = "lenient::object",
        skip_serializing_if = "Option::is_none"
    )]
    pub budget_breakdown: Option<Map<String, Value>>,
    /// Practical advice for the trip
    #[serde(
        default,
        deserialize_with = "lenient::text_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub tips: Option<Vec<String>>,
    /// Links or references backing the suggestions
    #[serde(
        default,
        deserialize_with = "lenient::text_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub sources: Option<Vec<String>>,
    /// Keys the model added beyond the schema, kept for the structured view.
    #[serde(flatten)]
    #[schemars(skip)]
    pub extra: Map<String, Value>,
}

/// One day of the itinerary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DayEntry {
    /// 1-based day number
    #[serde(
        default,
        deserialize_with = "lenient::day_label",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(with = "Option<u32>")]
    pub day: Option<DayLabel>,
    /// Morning activities
    #[serde(default, deserialize_with = "lenient::text")]
    pub morning: String,
    /// Afternoon activities
    #[serde(default, deserialize_with = "lenient::text")]
    pub afternoon: String,
    /// Evening activities
    #[serde(default, deserialize_with = "lenient::text")]
    pub evening: String,
    /// Dining suggestions that respect the dietary needs
    #[serde(
        default,
        deserialize_with = "lenient::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub dining: Option<String>,
    #[serde(flatten)]
    #[schemars(skip)]
    pub extra: Map<String, Value>,
}

/// The label of a day: normally a number, but models also send `"1"` or
/// `"Arrival"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DayLabel {
    Number(Number),
    Text(String),
}

impl DayLabel {
    /// The day number, when the label is or spells a non-negative integer.
    pub fn number(&self) -> Option<u64> {
        match self {
            DayLabel::Number(number) => number.as_u64(),
            DayLabel::Text(text) => text.trim().parse().ok(),
        }
    }
}

impl From<u32> for DayLabel {
    fn from(day: u32) -> Self {
        DayLabel::Number(day.into())
    }
}

impl fmt::Display for DayLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayLabel::Number(number) => write!(f, "{number}"),
            DayLabel::Text(text) => f.write_str(text),
        }
    }
}

mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::{Map, Value};

    use super::{DayEntry, DayLabel};

    fn value_text(value: Value) -> String {
        match value {
            Value::String(text) => text,
            other => other.to_string(),
        }
    }

    pub(super) fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(opt_text(deserializer)?.unwrap_or_default())
    }

    pub(super) fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Null => None,
            other => Some(value_text(other)),
        })
    }

    pub(super) fn text_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Null => None,
            Value::Array(items) => Some(
                items
                    .into_iter()
                    .filter(|item| !item.is_null())
                    .map(value_text)
                    .collect(),
            ),
            single => Some(vec![value_text(single)]),
        })
    }

    pub(super) fn object<'de, D>(deserializer: D) -> Result<Option<Map<String, Value>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Null => None,
            Value::Object(map) => Some(map),
            other => {
                let mut map = Map::new();
                map.insert("total_estimate".to_string(), other);
                Some(map)
            }
        })
    }

    pub(super) fn day_label<'de, D>(deserializer: D) -> Result<Option<DayLabel>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Null => None,
            Value::Number(number) => Some(DayLabel::Number(number)),
            other => Some(DayLabel::Text(value_text(other))),
        })
    }

    pub(super) fn days<'de, D>(deserializer: D) -> Result<Vec<DayEntry>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let items = match Value::deserialize(deserializer)? {
            Value::Null => Vec::new(),
            Value::Array(items) => items,
            single => vec![single],
        };

        items
            .into_iter()
            .filter(|item| !item.is_null())
            .map(|item| match item {
                Value::Object(_) => {
                    DayEntry::deserialize(item).map_err(<D::Error as serde::de::Error>::custom)
                }
                // A bare string or list still describes the day.
                other => Ok(DayEntry {
                    morning: value_text(other),
                    ..DayEntry::default()
                }),
            })
            .collect()
    }
}

impl Itinerary {
    /// A displayable record carrying only an explanatory overview.
    pub fn fallback(message: impl Into<String>) -> Self {
        Self {
            overview: message.into(),
            ..Self::default()
        }
    }

    /// The record returned when no candidate in a reply parses.
    pub fn unparseable() -> Self {
        Self::fallback(UNPARSEABLE_OVERVIEW)
    }

    /// Set the destination unless the model already supplied one.
    pub fn with_default_destination(mut self, destination: impl Into<String>) -> Self {
        if self.destination.is_none() {
            self.destination = Some(destination.into());
        }
        self
    }

    pub fn day_count(&self) -> usize {
        self.daily_plan.len()
    }

    /// True when the record carries no day entries, as fallback records do.
    pub fn is_empty(&self) -> bool {
        self.daily_plan.is_empty()
    }
}
