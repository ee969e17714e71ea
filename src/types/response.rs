use crate::{
    error::{PlannerError, Result},
    schemas::CompletionSchema,
};

/// Strictly parse `raw` as JSON and deserialize it into `T`.
///
/// Failures name the schema and the path of the offending value, e.g.
/// ``failed to deserialize `Forecast` at days[0].high: invalid type``.
pub fn deserialize_structured_response<T>(raw: &str) -> Result<T>
where
    T: CompletionSchema,
{
    let schema = T::schema();
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    let value = serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
        let path = err.path().to_string();
        let location = if path.is_empty() || path == "." {
            "<root>".to_string()
        } else {
            path
        };
        PlannerError::Validation(format!(
            "failed to deserialize `{}` at {}: {}",
            schema.schema_name(),
            location,
            err.inner()
        ))
    })?;

    // Reject trailing content such as `{...} extra`.
    deserializer.end().map_err(|err| {
        PlannerError::Validation(format!(
            "trailing characters after `{}` document: {}",
            schema.schema_name(),
            err
        ))
    })?;

    Ok(value)
}
