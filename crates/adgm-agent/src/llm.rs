//! Typed client for an OpenAI-compatible chat-completions API.
//!
//! Calls `POST {base}/chat/completions` with a single user message and
//! returns the first choice's content. Transport failures are retried with
//! exponential backoff; status codes are not.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::AgentConfig;
use crate::error::LlmError;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat-completion client.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    endpoint_url: url::Url,
    model: String,
    temperature: f32,
}

impl ChatClient {
    pub fn new(
        base_url: &url::Url,
        api_key: &str,
        model: impl Into<String>,
        temperature: f32,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::AUTHORIZATION,
                    reqwest::header::HeaderValue::from_str(&format!("Bearer {api_key}"))
                        .map_err(|_| LlmError::Config("API key is not a valid header value".into()))?,
                );
                headers
            })
            .build()
            .map_err(|e| LlmError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;
        let endpoint_url = adgm_rag::provider_url(base_url, "chat/completions")
            .map_err(|e| LlmError::Config(format!("invalid chat base URL: {e}")))?;

        Ok(Self {
            http,
            endpoint_url,
            model: model.into(),
            temperature,
        })
    }

    /// Build from agent configuration. Requires `OPENAI_API_KEY`.
    pub fn from_config(config: &AgentConfig) -> Result<Self, crate::error::ConfigError> {
        let base_url = config.llm_base_url()?;
        let api_key = config.api_key("openai chat")?;
        Ok(Self::new(
            &base_url,
            api_key,
            config.llm.model.clone(),
            config.llm.temperature,
            config.timeout(),
        )?)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send `prompt` as one user message and return the reply text.
    pub async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let endpoint = "POST /chat/completions";
        let body = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let resp = adgm_rag::RetryPolicy::default().send(|| {
            self.http
                .post(self.endpoint_url.clone())
                .json(&body)
                .send()
        })
        .await
        .map_err(|e| LlmError::Http {
            endpoint: endpoint.into(),
            source: e,
        })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::ApiError {
                endpoint: endpoint.into(),
                status,
                body,
            });
        }

        let parsed: ChatResponse = resp.json().await.map_err(|e| LlmError::Deserialization {
            endpoint: endpoint.into(),
            source: e,
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(LlmError::EmptyResponse)
    }
}
