//! HTTP client for the content service
//!
//! One POST per tool action, JSON in and out. Any transport failure or
//! non-success status is returned as an error; deciding what to do about it
//! is the caller's business.

use crate::config::BackendConfig;
use crate::error::{Error, Result};
use crate::tools::ChatMessage;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// A successful reply plus the provenance the service reported for it
#[derive(Debug, Clone, PartialEq)]
pub struct Reply<V> {
    pub value: V,
    /// The service itself answered with a placeholder
    pub fallback: bool,
}

#[derive(Debug, Deserialize)]
struct Envelope<V> {
    #[serde(flatten)]
    body: V,
    #[serde(default)]
    source: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SummaryBody {
    summary: String,
}

#[derive(Debug, Deserialize)]
struct IdeasBody {
    ideas: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefineBody {
    refined_text: String,
}

#[derive(Debug, Deserialize)]
struct ChatBody {
    response: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

/// Client for the remote content service
#[derive(Debug, Clone)]
pub struct ContentClient {
    client: reqwest::Client,
    base_url: String,
}

impl ContentClient {
    /// Build a client from configuration
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<V: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: serde_json::Value,
    ) -> Result<Reply<V>> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(%url, "content request");

        let resp = self.client.post(&url).json(&body).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|b| b.error.or(b.detail))
                .unwrap_or_else(|| {
                    format!(
                        "HTTP {}: {}",
                        status.as_u16(),
                        status.canonical_reason().unwrap_or("error")
                    )
                });
            return Err(Error::backend(status.as_u16(), message));
        }

        let envelope = resp.json::<Envelope<V>>().await?;
        Ok(Reply {
            value: envelope.body,
            fallback: envelope.source.as_deref() == Some("fallback"),
        })
    }

    pub async fn summarize(&self, text: &str) -> Result<Reply<String>> {
        let reply: Reply<SummaryBody> = self
            .post("/api/summarize", json!({ "text": text }))
            .await?;
        Ok(Reply {
            value: reply.value.summary,
            fallback: reply.fallback,
        })
    }

    pub async fn generate_ideas(&self, topic: &str) -> Result<Reply<Vec<String>>> {
        let reply: Reply<IdeasBody> = self
            .post("/api/generate-ideas", json!({ "topic": topic }))
            .await?;
        Ok(Reply {
            value: reply.value.ideas,
            fallback: reply.fallback,
        })
    }

    pub async fn refine_content(&self, text: &str, instruction: &str) -> Result<Reply<String>> {
        let reply: Reply<RefineBody> = self
            .post(
                "/api/refine-content",
                json!({ "text": text, "instruction": instruction }),
            )
            .await?;
        Ok(Reply {
            value: reply.value.refined_text,
            fallback: reply.fallback,
        })
    }

    /// Send a chat message with the most recent prior messages as context
    pub async fn chat(&self, message: &str, history: &[ChatMessage]) -> Result<Reply<String>> {
        let reply: Reply<ChatBody> = self
            .post(
                "/api/chat",
                json!({ "message": message, "history": history }),
            )
            .await?;
        Ok(Reply {
            value: reply.value.response,
            fallback: reply.fallback,
        })
    }

    /// Whether the service answers its health endpoint
    pub async fn probe(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        let resp = self.client.get(url).send().await;
        matches!(resp, Ok(r) if r.status().is_success())
    }
}
