use tracing::{debug, warn};

use crate::{
    schemas::CompletionSchema,
    types::{deserialize_structured_response, Itinerary},
};

const FENCE: &str = "```";

/// Unwrap text that is entirely one fenced code block, optionally tagged
/// (```` ```json ````). Anything else comes back trimmed but otherwise as is.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();

    let Some(inner) = trimmed
        .strip_prefix(FENCE)
        .and_then(|rest| rest.strip_suffix(FENCE))
    else {
        return trimmed;
    };

    let tag_len = inner
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+')))
        .unwrap_or(inner.len());
    let (tag, rest) = inner.split_at(tag_len);

    let body = if tag.eq_ignore_ascii_case("json")
        || (!tag.is_empty() && rest.starts_with(char::is_whitespace))
    {
        rest
    } else {
        inner
    };

    body.trim()
}

/// Byte ranges of top-level `{ ... }` groups, in order of their closing brace.
///
/// Braces are matched by depth only; strings are not tracked, so a candidate
/// may be cut short or run long. Candidates are validated by a real parser.
fn brace_candidates(text: &str) -> impl Iterator<Item = &str> + '_ {
    let mut depth = 0usize;
    let mut start = None;

    text.char_indices().filter_map(move |(idx, ch)| match ch {
        '{' => {
            if depth == 0 {
                start = Some(idx);
            }
            depth += 1;
            None
        }
        '}' if depth > 0 => {
            depth -= 1;
            if depth == 0 {
                start.take().map(|from| &text[from..=idx])
            } else {
                None
            }
        }
        _ => None,
    })
}

/// Recover a `T` from noisy model output.
///
/// Tries, in order: the whole text (after unwrapping a code fence), then
/// each top-level brace group left to right. Returns the first strict parse,
/// or `None` when nothing parses.
pub fn extract_structured<T>(text: &str) -> Option<T>
where
    T: CompletionSchema,
{
    let schema = T::schema().schema_name();
    let body = strip_code_fence(text);

    match deserialize_structured_response::<T>(body) {
        Ok(value) => return Some(value),
        Err(err) => debug!(
            target: "travel_buddy::extract",
            schema,
            error = %err,
            "direct parse failed, scanning for brace groups"
        ),
    }

    for (idx, candidate) in brace_candidates(body).enumerate() {
        match deserialize_structured_response::<T>(candidate) {
            Ok(value) => {
                debug!(
                    target: "travel_buddy::extract",
                    schema,
                    candidate = idx,
                    len = candidate.len(),
                    "recovered document from brace group"
                );
                return Some(value);
            }
            Err(err) => debug!(
                target: "travel_buddy::extract",
                schema,
                candidate = idx,
                error = %err,
                "brace group rejected"
            ),
        }
    }

    None
}

/// Recover an itinerary from model output, never failing.
///
/// Falls back to [`Itinerary::unparseable`] when no candidate parses.
pub fn extract_itinerary(text: &str) -> Itinerary {
    extract_structured::<Itinerary>(text).unwrap_or_else(|| {
        warn!(
            target: "travel_buddy::extract",
            len = text.len(),
            "no parseable itinerary in model reply"
        );
        Itinerary::unparseable()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_strip_code_fence_variants() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```JSON {\"a\":1}```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```json{\"a\":1}```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```{\"a\":1}```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("  {\"a\":1}  "), "{\"a\":1}");
    }

    #[test]
    fn test_strip_code_fence_requires_whole_text() {
        let text = "Here you go:\n```json\n{}\n```";
        assert_eq!(strip_code_fence(text), text);
    }

    #[test]
    fn test_brace_candidates_are_top_level_groups() {
        let groups: Vec<&str> = brace_candidates("} a {b {c}} d {e} {f").collect();
        assert_eq!(groups, ["{b {c}}", "{e}"]);
    }

    #[test]
    fn test_generic_extraction_of_plain_document() {
        let value: Value = extract_structured("prefix {\"k\": [1, 2]} suffix").unwrap();
        assert_eq!(value, json!({"k": [1, 2]}));
    }

    #[test]
    fn test_scan_skips_invalid_group() {
        let value: Value = extract_structured("{not json} then {\"ok\": true}").unwrap();
        assert_eq!(value, json!({"ok": true}));
    }

    #[test]
    fn test_no_braces_returns_none() {
        assert!(extract_structured::<Itinerary>("no structure here").is_none());
    }
}
