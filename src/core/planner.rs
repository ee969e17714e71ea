use std::time::Instant;

use tracing::{info, warn};

use crate::{
    config::Config,
    error::{PlannerError, Result},
    services::{
        extraction::extract_itinerary,
        markdown::render_markdown,
        openai_client::{ChatCompletionRequest, OpenAIClient},
        prompt_builder::{build_prompt, SYSTEM_PROMPT},
    },
    types::{Itinerary, TripPlan, TripPreferences},
};

pub const MISSING_KEY_OVERVIEW: &str =
    "OPENAI_API_KEY not set. Please add your key to `.env` or your deployment secrets.";

/// Per-request overrides of the configured model settings.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlanOptions {
    pub model: Option<String>,
    pub temperature: Option<f32>,
}

impl PlanOptions {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Turns trip preferences into a rendered itinerary.
///
/// Planning never fails: a missing key, a failed request or an unparseable
/// reply all produce a displayable record whose overview explains what
/// happened and whose day list is empty.
#[derive(Debug)]
pub struct TravelPlanner {
    config: Config,
    client: Option<OpenAIClient>,
}

impl TravelPlanner {
    pub fn new(config: Config) -> Result<Self> {
        let client = config
            .api_key()
            .map(|key| OpenAIClient::from_config(key, &config))
            .transpose()?;

        Ok(Self { config, client })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(Config::from_env()?)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Plan with the configured model and temperature.
    pub async fn plan_trip(&self, prefs: TripPreferences) -> TripPlan {
        self.plan_trip_with(prefs, &PlanOptions::default()).await
    }

    pub async fn plan_trip_with(&self, prefs: TripPreferences, options: &PlanOptions) -> TripPlan {
        let started = Instant::now();
        let model = self.model_for(options).to_string();
        let prefs = prefs.normalized();

        let (itinerary, raw_response) = match prefs.validate() {
            Err(err) => {
                warn!(target: "travel_buddy::planner", error = %err, "rejected trip preferences");
                (Itinerary::fallback(err.to_string()), None)
            }
            Ok(()) => self.request_itinerary(&prefs, options).await,
        };

        let itinerary = itinerary.with_default_destination(prefs.destination.clone());
        let markdown = render_markdown(&itinerary);
        let plan = TripPlan::new(markdown, itinerary, raw_response, model, started.elapsed());

        info!(target: "travel_buddy::planner", summary = %plan.summary(), success = plan.is_success(), "planning finished");
        plan
    }

    async fn request_itinerary(
        &self,
        prefs: &TripPreferences,
        options: &PlanOptions,
    ) -> (Itinerary, Option<String>) {
        let prompt = build_prompt(prefs);

        match self.call_model(&prompt, options).await {
            Ok(raw) => (extract_itinerary(&raw), Some(raw)),
            Err(PlannerError::Config(message)) => {
                warn!(target: "travel_buddy::planner", %message, "model call skipped");
                (Itinerary::fallback(MISSING_KEY_OVERVIEW), None)
            }
            Err(err) => {
                warn!(target: "travel_buddy::planner", error = %err, code = err.error_code(), "model call failed");
                (Itinerary::fallback(format!("Error calling model: {err}")), None)
            }
        }
    }

    /// Send `prompt` as the user message and return the model's raw reply.
    ///
    /// Fails with [`PlannerError::Config`] before any network traffic when no
    /// API key is configured.
    pub async fn call_model(&self, prompt: &str, options: &PlanOptions) -> Result<String> {
        let client = self.client.as_ref().ok_or_else(|| {
            PlannerError::Config("OPENAI_API_KEY is not set".to_string())
        })?;

        let request = ChatCompletionRequest::new(self.model_for(options))
            .with_system(SYSTEM_PROMPT)
            .with_user(prompt)
            .with_temperature(options.temperature.unwrap_or(self.config.temperature()))
            .with_max_tokens(self.config.max_tokens());

        info!(target: "travel_buddy::planner", model = self.model_for(options), base_url = client.base_url(), "requesting itinerary");
        client.complete(request).await
    }

    fn model_for<'a>(&'a self, options: &'a PlanOptions) -> &'a str {
        options.model.as_deref().unwrap_or(self.config.model())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_yields_fallback_without_network() {
        let planner = TravelPlanner::new(Config::default()).unwrap();
        let plan = planner.plan_trip(TripPreferences::new("Oslo", 2)).await;

        assert_eq!(plan.itinerary.overview, MISSING_KEY_OVERVIEW);
        assert!(plan.itinerary.daily_plan.is_empty());
        assert!(plan.raw_response.is_none());
        assert!(plan.markdown.starts_with("# Itinerary for Oslo"));
    }

    #[tokio::test]
    async fn test_invalid_preferences_yield_fallback() {
        let planner = TravelPlanner::new(Config::default().with_api_key("sk-test")).unwrap();
        let plan = planner.plan_trip(TripPreferences::new("Oslo", 0)).await;

        assert!(plan.itinerary.overview.contains("at least 1 day"));
        assert!(!plan.is_success());
    }

    #[tokio::test]
    async fn test_blank_destination_becomes_surprise() {
        let planner = TravelPlanner::new(Config::default()).unwrap();
        let plan = planner.plan_trip(TripPreferences::new("  ", 3)).await;

        assert_eq!(plan.itinerary.destination.as_deref(), Some("Surprise Me"));
    }

    #[test]
    fn test_options_override_model() {
        let planner = TravelPlanner::new(Config::default()).unwrap();
        assert_eq!(planner.model_for(&PlanOptions::default()), "gpt-4o-mini");
        assert_eq!(
            planner.model_for(&PlanOptions::default().with_model("gpt-4.1")),
            "gpt-4.1"
        );
    }
}
