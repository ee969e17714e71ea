use jsonschema::{Draft, JSONSchema};
use serde_json::{json, Value};
use travel_buddy::{CompletionSchema, Itinerary};

fn compiled() -> JSONSchema {
    JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(Itinerary::schema().schema_json())
        .expect("itinerary schema compiles")
}

#[test]
fn test_fallback_record_conforms_to_schema() {
    let fallback = serde_json::to_value(Itinerary::unparseable()).unwrap();
    assert!(compiled().is_valid(&fallback));
}

#[test]
fn test_full_record_conforms_to_schema() {
    let record = json!({
        "overview": "x",
        "daily_plan": [{ "day": 1, "morning": "a", "afternoon": "b", "evening": "c", "dining": "d" }],
        "highlights": ["h"],
        "offbeat_picks": ["o"],
        "budget_breakdown": { "transport": "$20", "total_estimate": 400 },
        "tips": ["t"],
        "sources": ["s"]
    });
    assert!(compiled().is_valid(&record));
}

#[test]
fn test_schema_rejects_missing_required_fields() {
    assert!(!compiled().is_valid(&json!({ "overview": "x" })));
    assert!(!compiled().is_valid(&json!({ "daily_plan": [] })));
}

#[test]
fn test_schema_describes_day_entries() {
    let schema: &Value = Itinerary::schema().schema_json();
    let day = &schema["definitions"]["DayEntry"];

    assert_eq!(day["type"], "object");
    for field in ["day", "morning", "afternoon", "evening", "dining"] {
        assert!(day["properties"].get(field).is_some(), "missing {field}");
    }
    assert_eq!(day["properties"]["day"]["description"], "1-based day number");
}
