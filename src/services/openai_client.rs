use std::time::Duration;

use reqwest::StatusCode;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::{
    config::Config,
    error::{PlannerError, Result},
};

const INITIAL_BACKOFF: Duration = Duration::from_millis(250);

/// Minimal OpenAI-compatible chat-completion client.
#[derive(Clone, Debug)]
pub struct OpenAIClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    max_retries: usize,
}

impl OpenAIClient {
    /// Client for the endpoint, timeout and retry budget in `config`.
    ///
    /// The API key is passed separately; callers check for its presence.
    pub fn from_config(api_key: impl Into<String>, config: &Config) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            api_key: api_key.into(),
            base_url: config.base_url().to_string(),
            max_retries: config.max_retries(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one chat completion and return the decoded response body.
    ///
    /// 429 and 5xx responses are retried up to `max_retries` times with
    /// exponential backoff, honouring `Retry-After` on 429.
    pub async fn chat_completion(&self, body: &Value) -> Result<Value> {
        let request_url = build_chat_url(&self.base_url);
        let mut attempt = 0;
        let mut backoff = INITIAL_BACKOFF;

        loop {
            debug!(target: "travel_buddy::http", url = %request_url, attempt, "sending chat completion");

            let response = self
                .http
                .post(&request_url)
                .bearer_auth(&self.api_key)
                .json(body)
                .send()
                .await?;

            let status = response.status();
            let headers = response.headers().clone();
            let response_text = response.text().await?;

            if status == StatusCode::TOO_MANY_REQUESTS {
                let retry_after_duration = headers
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|value| value.to_str().ok())
                    .and_then(|value| value.parse::<u64>().ok())
                    .map(Duration::from_secs)
                    .unwrap_or(backoff);

                if attempt < self.max_retries {
                    warn!(target: "travel_buddy::http", attempt, wait_ms = retry_after_duration.as_millis() as u64, "rate limited, retrying");
                    tokio::time::sleep(retry_after_duration).await;
                    attempt += 1;
                    backoff *= 2;
                    continue;
                }

                return Err(PlannerError::RateLimit {
                    retry_after: retry_after_duration.as_secs().max(1),
                });
            }

            if status.is_server_error() && attempt < self.max_retries {
                warn!(target: "travel_buddy::http", attempt, status = status.as_u16(), "server error, retrying");
                tokio::time::sleep(backoff).await;
                attempt += 1;
                backoff *= 2;
                continue;
            }

            if !status.is_success() {
                return Err(PlannerError::Api {
                    status: status.as_u16(),
                    message: api_error_message(&response_text),
                });
            }

            let response_json: Value = serde_json::from_str(&response_text)?;

            if let Some(error) = response_json.get("error").filter(|e| !e.is_null()) {
                let message = error
                    .get("message")
                    .and_then(|value| value.as_str())
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| error.to_string());
                return Err(PlannerError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            return Ok(response_json);
        }
    }

    /// Send `request` and return the text of the first choice.
    pub async fn complete(&self, request: ChatCompletionRequest) -> Result<String> {
        let response = self.chat_completion(&request.into_value()).await?;
        first_choice_content(&response)
    }
}

fn build_chat_url(base_url: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    if trimmed.ends_with("/chat/completions") {
        trimmed.to_string()
    } else {
        format!("{}/chat/completions", trimmed)
    }
}

/// Prefer `error.message` from a JSON error body, else the raw body.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            json.get("error")
                .and_then(|error| error.get("message"))
                .and_then(|value| value.as_str())
                .map(|s| s.to_string())
        })
        .unwrap_or_else(|| body.trim().to_string())
}

fn first_choice_content(response: &Value) -> Result<String> {
    response
        .get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(|content| content.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| {
            PlannerError::Validation("chat completion response has no message content".to_string())
        })
}

#[derive(Clone, Debug)]
pub struct ChatCompletionRequest {
    model: String,
    messages: Vec<Value>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl ChatCompletionRequest {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_system(mut self, content: impl Into<String>) -> Self {
        self.messages
            .push(json!({ "role": "system", "content": content.into() }));
        self
    }

    pub fn with_user(mut self, content: impl Into<String>) -> Self {
        self.messages
            .push(json!({ "role": "user", "content": content.into() }));
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn into_value(self) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": self.messages,
        });

        if let Some(temperature) = self.temperature {
            // f32 -> f64 widening would send 0.4 as 0.4000000059604645
            body["temperature"] = json!((f64::from(temperature) * 1000.0).round() / 1000.0);
        }

        if let Some(max_tokens) = self.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }

        body
    }
}
