pub mod schema;

pub use schema::{
    apply_schema_metadata, render_schema_for_prompt, CompletionSchema, SchemaHandle,
    SchemaMetadata,
};
