use mockito::Matcher;
use serde_json::json;
use travel_buddy::{
    core::MISSING_KEY_OVERVIEW, export_markdown, Config, PlanOptions, PlannerError, Preset,
    TravelPlanner, TripPreferences,
};

fn completion_body(content: &str) -> String {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
    .to_string()
}

fn planner_for(server: &mockito::Server) -> TravelPlanner {
    let config = Config::default()
        .with_api_key("sk-test")
        .with_base_url(format!("{}/v1", server.url()));
    TravelPlanner::new(config).unwrap()
}

#[tokio::test]
async fn test_plan_trip_against_mock_server() {
    let mut server = mockito::Server::new_async().await;
    let reply = "Here you go:\n```json\n{\"overview\":\"Eat everything.\",\"daily_plan\":[{\"day\":1,\"morning\":\"Market\",\"afternoon\":\"Museum\",\"evening\":\"Izakaya\"}]}\n```";

    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_header("authorization", "Bearer sk-test")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(json!({ "model": "gpt-4o-mini", "max_tokens": 1200 })),
            Matcher::Regex("You are a JSON-only travel planner.".to_string()),
            Matcher::Regex("Destination: Tokyo, Japan".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(reply))
        .create_async()
        .await;

    let plan = planner_for(&server)
        .plan_trip(Preset::Tokyo.preferences())
        .await;

    mock.assert_async().await;
    assert!(plan.is_success());
    assert_eq!(plan.itinerary.overview, "Eat everything.");
    assert_eq!(plan.itinerary.destination.as_deref(), Some("Tokyo, Japan"));
    assert_eq!(plan.raw_response.as_deref(), Some(reply));
    assert!(plan.markdown.contains("# Itinerary for Tokyo, Japan"));
    assert!(plan.markdown.contains("### Day 1\n- **Morning:** Market"));
}

#[tokio::test]
async fn test_options_override_model_and_temperature() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::PartialJson(json!({
            "model": "gpt-4.1",
            "temperature": 0.0
        })))
        .with_status(200)
        .with_body(completion_body("{\"overview\":\"ok\",\"daily_plan\":[]}"))
        .create_async()
        .await;

    let options = PlanOptions::default()
        .with_model("gpt-4.1")
        .with_temperature(0.0);
    let plan = planner_for(&server)
        .plan_trip_with(TripPreferences::new("Oslo", 2), &options)
        .await;

    mock.assert_async().await;
    assert_eq!(plan.model, "gpt-4.1");
    assert_eq!(plan.itinerary.overview, "ok");
}

#[tokio::test]
async fn test_api_error_becomes_fallback_record() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(500)
        .with_body(r#"{"error":{"message":"upstream exploded"}}"#)
        .expect(1)
        .create_async()
        .await;

    let plan = planner_for(&server)
        .plan_trip(TripPreferences::new("Oslo", 2))
        .await;

    mock.assert_async().await;
    assert!(plan
        .itinerary
        .overview
        .starts_with("Error calling model: API error (status 500)"));
    assert!(plan.itinerary.overview.contains("upstream exploded"));
    assert!(plan.itinerary.daily_plan.is_empty());
    assert!(plan.raw_response.is_none());
    assert!(plan.markdown.contains("**Overview**"));
}

#[tokio::test]
async fn test_server_errors_are_retried_when_configured() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(503)
        .expect(2)
        .create_async()
        .await;

    let config = Config::default()
        .with_api_key("sk-test")
        .with_base_url(format!("{}/v1", server.url()))
        .with_max_retries(1);
    let err = TravelPlanner::new(config)
        .unwrap()
        .call_model("prompt", &PlanOptions::default())
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert!(matches!(err, PlannerError::Api { status: 503, .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_rate_limit_honours_retry_after_then_succeeds() {
    let mut server = mockito::Server::new_async().await;
    let limited = server
        .mock("POST", "/v1/chat/completions")
        .with_status(429)
        .with_header("retry-after", "0")
        .expect(1)
        .create_async()
        .await;
    let ok = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(r#"{"overview":"after wait","daily_plan":[]}"#))
        .expect(1)
        .create_async()
        .await;

    let config = Config::default()
        .with_api_key("sk-test")
        .with_base_url(format!("{}/v1", server.url()))
        .with_max_retries(1);
    let reply = TravelPlanner::new(config)
        .unwrap()
        .call_model("prompt", &PlanOptions::default())
        .await
        .unwrap();

    limited.assert_async().await;
    ok.assert_async().await;
    assert!(reply.contains("after wait"));
}

#[tokio::test]
async fn test_rate_limit_without_retries_is_reported() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(429)
        .with_header("retry-after", "7")
        .expect(1)
        .create_async()
        .await;

    let err = planner_for(&server)
        .call_model("prompt", &PlanOptions::default())
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert!(matches!(err, PlannerError::RateLimit { retry_after: 7 }));
    assert_eq!(err.error_code(), "RATE_LIMIT_ERROR");
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_unparseable_reply_becomes_fallback_record() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_body(completion_body("Sorry, I can only chat about the weather."))
        .create_async()
        .await;

    let plan = planner_for(&server)
        .plan_trip(TripPreferences::new("Oslo", 2))
        .await;

    assert_eq!(plan.itinerary.overview, "Could not parse JSON from model.");
    assert_eq!(
        plan.raw_response.as_deref(),
        Some("Sorry, I can only chat about the weather.")
    );
}

#[tokio::test]
async fn test_missing_key_never_reaches_the_network() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let config = Config::default().with_base_url(format!("{}/v1", server.url()));
    let plan = TravelPlanner::new(config)
        .unwrap()
        .plan_trip(Preset::Lisbon.preferences())
        .await;

    mock.assert_async().await;
    assert_eq!(plan.itinerary.overview, MISSING_KEY_OVERVIEW);
    assert!(plan.markdown.starts_with("# Itinerary for Lisbon, Portugal"));
}

#[test]
fn test_export_creates_directory_and_timestamped_file() {
    let temp = tempfile::tempdir().unwrap();
    let dir = temp.path().join("nested").join("exports");

    let path = export_markdown("# Itinerary for Oslo\n", &dir).unwrap();

    assert!(path.starts_with(&dir));
    let name = path.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("itinerary_"));
    assert!(name.ends_with(".md"));
    assert_eq!(name.len(), "itinerary_YYYYmmdd_HHMMSS.md".len());
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "# Itinerary for Oslo\n"
    );
}

#[test]
fn test_error_payload() {
    let error = PlannerError::Validation("bad days".to_string());
    assert_eq!(error.error_code(), "VALIDATION_ERROR");

    let payload = error.to_error_payload();
    assert_eq!(payload["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(payload["error"]["retryable"], false);
    assert!(payload["error"]["message"]
        .as_str()
        .unwrap()
        .contains("bad days"));
}
