//! travel-buddy: personalized travel itineraries from an LLM chat-completion API
//!
//! Preferences are turned into a prompt, the model's reply is recovered as a
//! structured [`Itinerary`] even when wrapped in prose or code fences, and the
//! result is rendered as Markdown. Planning never fails: every error becomes a
//! displayable record with an explanatory overview.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use travel_buddy::{Config, Preset, TravelPlanner};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let planner = TravelPlanner::new(Config::from_env()?)?;
//!
//!     let plan = planner.plan_trip(Preset::Tokyo.preferences()).await;
//!     println!("{}", plan.markdown);
//!     Ok(())
//! }
//! ```

extern crate self as travel_buddy;

pub mod config;
pub mod core;
pub mod error;
pub mod schemas;
pub mod services;
pub mod types;

pub use config::Config;
pub use crate::core::{PlanOptions, TravelPlanner, TripPlan};
pub use error::{PlannerError, Result};
pub use schemas::{CompletionSchema, SchemaHandle};
pub use services::{
    build_prompt, export_markdown, extract_itinerary, extract_structured, quirk_descriptor,
    render_markdown, strip_code_fence,
};
pub use travel_buddy_macros::completion_schema;
pub use types::{
    BudgetLevel, Companions, DayEntry, DayLabel, Dietary, Itinerary, Pace, Preset, TripPreferences, Vibe,
};

pub use schemas as schema;

#[cfg(feature = "cli")]
pub mod cli;
