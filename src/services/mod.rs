pub mod export;
pub mod extraction;
pub mod markdown;
pub(crate) mod openai_client;
pub mod prompt_builder;

pub use export::{export_markdown, DEFAULT_EXPORT_DIR};
pub use extraction::{extract_itinerary, extract_structured, strip_code_fence};
pub use markdown::render_markdown;
pub use prompt_builder::{build_prompt, quirk_descriptor, SYSTEM_PROMPT};
