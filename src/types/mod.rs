pub mod itinerary;
pub mod preferences;
pub mod presets;
pub mod response;
pub mod result;

pub use itinerary::{DayEntry, DayLabel, Itinerary, UNPARSEABLE_OVERVIEW};
pub use preferences::{BudgetLevel, Companions, Dietary, Pace, TripPreferences, Vibe};
pub use presets::Preset;
pub use response::deserialize_structured_response;
pub use result::TripPlan;
