//! Chat-completions client used for profile comparisons.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::ai::prompt::{build_comparison_prompt, SYSTEM_PROMPT};
use crate::config::Config;
use crate::error::AppError;
use crate::models::GitHubUser;

pub const MODEL: &str = "meta/llama-3.1-8b-instruct";

/// Upper bound on a comparison call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Debug, Clone)]
pub struct ComparisonClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ComparisonClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    /// `None` when no API key is configured.
    pub fn from_config(config: &Config) -> Result<Option<Self>, reqwest::Error> {
        config
            .ai_api_key
            .as_deref()
            .map(|key| Self::new(config.ai_api_url.clone(), key, DEFAULT_TIMEOUT))
            .transpose()
    }

    // == Compare ==
    /// Asks the model to compare `users`.
    ///
    /// Returns the first choice's text, or an empty string when the upstream
    /// produced no choices.
    pub async fn compare(&self, users: &[GitHubUser]) -> Result<String, AppError> {
        let prompt = build_comparison_prompt(users);
        let request = ChatRequest {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            temperature: 0.5,
            max_tokens: 300,
        };
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));

        debug!(users = users.len(), model = MODEL, "requesting AI comparison");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "AI upstream unreachable");
                AppError::Ai("Failed to connect to AI API".to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), %body, "AI upstream returned an error");
            return Err(AppError::Ai(format!("AI API error: {}", status.as_u16())));
        }

        let data: ChatResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "AI response did not parse");
            AppError::Ai("Failed to parse AI response".to_string())
        })?;

        Ok(data
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn users() -> Vec<GitHubUser> {
        ["alice", "bob"]
            .iter()
            .map(|login| GitHubUser {
                login: login.to_string(),
                ..Default::default()
            })
            .collect()
    }

    fn client(server: &MockServer) -> ComparisonClient {
        ComparisonClient::new(server.uri(), "key", Duration::from_secs(2)).unwrap()
    }

    #[tokio::test]
    async fn test_compare_returns_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer key"))
            .and(body_partial_json(json!({
                "model": MODEL,
                "max_tokens": 300,
                "temperature": 0.5
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [
                    {"message": {"content": "alice wins"}},
                    {"message": {"content": "ignored"}}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let text = client(&server).compare(&users()).await.unwrap();

        assert_eq!(text, "alice wins");
    }

    #[tokio::test]
    async fn test_compare_without_choices_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        assert_eq!(client(&server).compare(&users()).await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_compare_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let err = client(&server).compare(&users()).await.unwrap_err();

        assert_eq!(err.to_string(), "AI API error: 503");
    }

    #[tokio::test]
    async fn test_compare_unparseable_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("nope"))
            .mount(&server)
            .await;

        let err = client(&server).compare(&users()).await.unwrap_err();

        assert!(matches!(err, AppError::Ai(_)));
    }

    #[test]
    fn test_from_config_requires_key() {
        let config = Config::default();
        assert!(ComparisonClient::from_config(&config).unwrap().is_none());

        let config = Config {
            ai_api_key: Some("key".into()),
            ..Config::default()
        };
        assert!(ComparisonClient::from_config(&config).unwrap().is_some());
    }
}
