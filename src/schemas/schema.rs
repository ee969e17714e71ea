use schemars::{
    schema::{ObjectValidation, RootSchema, Schema, SchemaObject},
    schema_for,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::{
    any::TypeId,
    sync::{Arc, OnceLock},
};

/// Cached JSON schema handle associated with a structured record type.
#[derive(Clone, Debug)]
pub struct SchemaHandle {
    schema_name: &'static str,
    type_name: &'static str,
    type_id: TypeId,
    schema_json: Arc<Value>,
}

impl SchemaHandle {
    pub fn from_root_schema<T: 'static>(
        schema_name: &'static str,
        type_name: &'static str,
        root: RootSchema,
    ) -> Self {
        let schema_json = serde_json::to_value(root)
            .unwrap_or_else(|err| panic!("failed to serialize schema for {}: {}", type_name, err));

        Self {
            schema_name,
            type_name,
            type_id: TypeId::of::<T>(),
            schema_json: Arc::new(schema_json),
        }
    }

    pub fn schema_name(&self) -> &'static str {
        self.schema_name
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn schema_json(&self) -> &Value {
        self.schema_json.as_ref()
    }

    pub fn schema_json_arc(&self) -> Arc<Value> {
        Arc::clone(&self.schema_json)
    }
}

/// A record the model is asked to produce, with its published JSON schema.
///
/// Implemented by `#[completion_schema]`; `serde_json::Value` implements it
/// with an unconstrained schema so untyped documents can flow through the
/// same extraction path.
pub trait CompletionSchema: DeserializeOwned + Send + Sync + 'static {
    fn schema() -> &'static SchemaHandle;
}

impl CompletionSchema for Value {
    fn schema() -> &'static SchemaHandle {
        static HANDLE: OnceLock<SchemaHandle> = OnceLock::new();
        HANDLE.get_or_init(|| {
            SchemaHandle::from_root_schema::<Value>("JsonValue", "Value", schema_for!(Value))
        })
    }
}

/// Metadata captured by `#[completion_schema]` at the definition site.
#[derive(Clone, Copy, Debug)]
pub struct SchemaMetadata {
    pub title: &'static str,
    pub description: Option<&'static str>,
    /// `(field, doc)` pairs taken from field doc comments.
    pub field_docs: &'static [(&'static str, &'static str)],
    /// Fields listed as required even when serde defaults them on input.
    pub required: &'static [&'static str],
}

/// Apply metadata captured by the procedural macro to the generated root schema.
pub fn apply_schema_metadata(root: &mut RootSchema, metadata: SchemaMetadata) {
    let schema_object = &mut root.schema;
    apply_struct_metadata(schema_object, metadata.title, metadata.description);

    if let Some(object_validation) = schema_object.object.as_mut() {
        apply_field_metadata(object_validation.as_mut(), metadata.field_docs);
        apply_required_fields(object_validation.as_mut(), metadata.required);
    }
}

/// Pretty-printed schema text for embedding into prompts.
///
/// The `$schema` keyword is dropped; models do not need the draft URI.
pub fn render_schema_for_prompt(handle: &SchemaHandle) -> String {
    let mut schema = handle.schema_json().clone();
    if let Some(object) = schema.as_object_mut() {
        object.remove("$schema");
    }
    serde_json::to_string_pretty(&schema).unwrap_or_else(|_| schema.to_string())
}

fn apply_struct_metadata(
    schema_object: &mut SchemaObject,
    title: &'static str,
    description: Option<&'static str>,
) {
    let metadata = schema_object.metadata();

    if metadata.title.is_none() {
        metadata.title = Some(title.to_string());
    }

    if let Some(description) = description {
        if metadata.description.is_none() {
            metadata.description = Some(description.to_string());
        }
    }
}

fn apply_field_metadata(
    object_validation: &mut ObjectValidation,
    field_docs: &[(&'static str, &'static str)],
) {
    for (field, doc) in field_docs {
        if let Some(Schema::Object(field_object)) = object_validation.properties.get_mut(*field) {
            let metadata = field_object.metadata();
            if metadata.description.is_none() {
                metadata.description = Some((*doc).to_string());
            }
        }
    }
}

fn apply_required_fields(object_validation: &mut ObjectValidation, required: &[&'static str]) {
    for field in required {
        if object_validation.properties.contains_key(*field) {
            object_validation.required.insert((*field).to_string());
        }
    }
}
