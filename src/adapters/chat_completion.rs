//! Chat-completion client for one-sentence paper summaries
//!
//! Talks to any OpenAI-compatible `/chat/completions` endpoint. Failures are
//! reported as [`SummarizationResult::Failed`] and never as errors, so a bad
//! summary can't stop a digest run.

use crate::adapters::Summarizer;
use crate::error::Result;
use crate::models::SummarizationResult;
use crate::utils::http::{build_client, truncate_for_log};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.deepseek.com";

/// Default model identifier
pub const DEFAULT_MODEL: &str = "deepseek-chat";

// "You are a senior algorithm engineer; summarize the paper's core
// innovation in one Chinese sentence."
const SYSTEM_PROMPT: &str = "你是一个资深算法工程师，请用一句话中文总结这篇论文的核心创新点。";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Client for a chat-completion API
pub struct ChatCompletionClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl ChatCompletionClient {
    /// Create a new chat-completion client
    ///
    /// # Arguments
    /// * `api_key` - Optional API key; without one every summary is skipped
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Ok(Self::with_client(build_client()?, api_key))
    }

    /// Create a new client with an existing reqwest client
    pub fn with_client(client: Client, api_key: Option<String>) -> Self {
        Self {
            client,
            api_key: api_key.filter(|k| !k.is_empty()),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn build_request<'a>(&'a self, title: &str, r#abstract: &str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: format!("标题: {}\n摘要: {}", title, r#abstract),
                },
            ],
        }
    }

    /// Send the request and pull out the first completion.
    ///
    /// The HTTP status is not checked on its own: an error response fails
    /// here because its body has no `choices`.
    async fn request_summary(
        &self,
        api_key: &str,
        title: &str,
        r#abstract: &str,
    ) -> std::result::Result<String, String> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!("Requesting summary from {} ({})", url, self.model);

        let resp = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&self.build_request(title, r#abstract))
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| format!("read failed: {}", e))?;

        let parsed: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            format!(
                "parse failed (status {}): {}: {}",
                status,
                e,
                truncate_for_log(&body, 200)
            )
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| format!("response had no choices (status {})", status))
    }
}

#[async_trait]
impl Summarizer for ChatCompletionClient {
    async fn summarize(&self, title: &str, r#abstract: &str) -> SummarizationResult {
        let Some(api_key) = self.api_key.as_deref() else {
            return SummarizationResult::Unavailable;
        };

        match self.request_summary(api_key, title, r#abstract).await {
            Ok(text) => SummarizationResult::Summarized { text },
            Err(reason) => {
                warn!("Summarization failed for {:?}: {}", title, reason);
                SummarizationResult::Failed { reason }
            }
        }
    }
}
