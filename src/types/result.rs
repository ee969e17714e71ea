use super::itinerary::Itinerary;
use serde::Serialize;
use std::time::Duration;

/// Outcome of one planning run.
///
/// Always displayable: failures are folded into `itinerary` as a fallback
/// record with an explanatory overview.
#[derive(Debug, Clone, Serialize)]
pub struct TripPlan {
    /// Rendered Markdown document
    pub markdown: String,
    /// Structured record the Markdown was rendered from
    pub itinerary: Itinerary,
    /// Raw model reply, absent when no model call succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
    /// Model the request was sent to
    pub model: String,
    /// Wall-clock time of the run
    pub duration: Duration,
}

impl TripPlan {
    pub fn new(
        markdown: String,
        itinerary: Itinerary,
        raw_response: Option<String>,
        model: String,
        duration: Duration,
    ) -> Self {
        Self {
            markdown,
            itinerary,
            raw_response,
            model,
            duration,
        }
    }

    /// True when the model produced at least one day entry.
    pub fn is_success(&self) -> bool {
        !self.itinerary.is_empty()
    }

    /// Structured record as pretty JSON, for the raw-output view.
    pub fn structured_json(&self) -> String {
        serde_json::to_string_pretty(&self.itinerary)
            .unwrap_or_else(|_| format!("{:?}", self.itinerary))
    }

    /// One-line summary for logs.
    pub fn summary(&self) -> String {
        format!(
            "{} day(s) for {} via {} in {:.2}s",
            self.itinerary.day_count(),
            self.itinerary.destination.as_deref().unwrap_or("your trip"),
            self.model,
            self.duration.as_secs_f64()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::itinerary::DayEntry;

    #[test]
    fn test_fallback_plan_is_not_success() {
        let plan = TripPlan::new(
            String::new(),
            Itinerary::fallback("Error calling model: boom"),
            None,
            "gpt-4o-mini".to_string(),
            Duration::from_millis(5),
        );
        assert!(!plan.is_success());
        assert!(plan.structured_json().contains("Error calling model: boom"));
    }

    #[test]
    fn test_summary() {
        let itinerary = Itinerary {
            daily_plan: vec![DayEntry::default(), DayEntry::default()],
            ..Itinerary::fallback("ok")
        }
        .with_default_destination("Oslo");

        let plan = TripPlan::new(
            String::new(),
            itinerary,
            Some("{}".to_string()),
            "gpt-4o-mini".to_string(),
            Duration::from_secs(2),
        );

        assert!(plan.is_success());
        assert_eq!(plan.summary(), "2 day(s) for Oslo via gpt-4o-mini in 2.00s");
    }
}
