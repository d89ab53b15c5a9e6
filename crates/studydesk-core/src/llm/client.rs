//! HTTP client for OpenAI-compatible chat services (Groq, DeepSeek)

use super::{ChatProvider, CompletionRequest};
use crate::config::ProviderServiceConfig;
use crate::error::{Result, StudyDeskError};
use crate::router::ProviderId;
use crate::session::Role;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Chat message in the OpenAI wire format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Client for `/chat/completions` endpoints
pub struct OpenAiCompatClient {
    id: ProviderId,
    http_client: reqwest::Client,
    config: ProviderServiceConfig,
}

impl OpenAiCompatClient {
    /// Create client from configuration
    pub fn new(id: ProviderId, config: ProviderServiceConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(StudyDeskError::Http)?;

        Ok(Self {
            id,
            http_client,
            config,
        })
    }

    /// Messages for a request: system, history, then the user turn
    pub fn build_messages(request: &CompletionRequest) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(request.history.len() + 2);
        if !request.system.is_empty() {
            messages.push(ChatMessage::system(request.system.clone()));
        }
        for turn in &request.history {
            messages.push(match turn.role {
                Role::User => ChatMessage::user(turn.content.clone()),
                Role::Assistant => ChatMessage::assistant(turn.content.clone()),
            });
        }
        messages.push(ChatMessage::user(request.user_message()));
        messages
    }
}

#[async_trait]
impl ChatProvider for OpenAiCompatClient {
    fn id(&self) -> ProviderId {
        self.id
    }

    async fn complete(&self, model: &str, request: &CompletionRequest) -> Result<String> {
        #[derive(Serialize)]
        struct ChatRequest {
            model: String,
            messages: Vec<ChatMessage>,
            temperature: f32,
            max_tokens: u32,
        }

        #[derive(Deserialize)]
        struct ChatResponse {
            choices: Vec<ChatChoice>,
        }

        #[derive(Deserialize)]
        struct ChatChoice {
            message: ChatMessage,
        }

        let start = Instant::now();

        let body = ChatRequest {
            model: model.to_string(),
            messages: Self::build_messages(request),
            temperature: 0.3,
            max_tokens: 4096,
        };

        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));

        let mut req = self.http_client.post(&url).json(&body);

        if let Some(ref api_key) = self.config.api_key {
            req = req.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = req.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StudyDeskError::ExternalError(format!(
                "{} error (HTTP {}): {}",
                self.id, status, body
            )));
        }

        let chat_response: ChatResponse = response.json().await?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| StudyDeskError::Provider(format!("No response from {}", self.id)))?
            .message
            .content;

        tracing::debug!(
            "{} answered with {} in {} ms",
            self.id,
            model,
            start.elapsed().as_millis()
        );

        Ok(content)
    }
}
