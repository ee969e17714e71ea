pub mod planner;

pub use crate::types::result::TripPlan;
pub use planner::{PlanOptions, TravelPlanner, MISSING_KEY_OVERVIEW};
