mod completion_schema;
mod schema_extraction;

use proc_macro::TokenStream;

/// Implements `travel_buddy::schema::CompletionSchema` for a struct with named fields.
///
/// The generated schema is built once from the `schemars::JsonSchema` impl and
/// enriched with the struct and field doc comments, so the descriptions the
/// model sees stay next to the Rust definition.
///
/// Accepts optional `name = "..."` and `description = "..."` overrides.
#[proc_macro_attribute]
pub fn completion_schema(attr: TokenStream, item: TokenStream) -> TokenStream {
    completion_schema::completion_schema(attr, item)
}
