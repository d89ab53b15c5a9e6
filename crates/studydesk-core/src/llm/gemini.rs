//! Client for the primary multimodal provider (Google Gemini REST API)

use super::{ChatProvider, CompletionRequest, Embedder, ImageTranscriber, ModelLister};
use crate::config::ProviderServiceConfig;
use crate::error::{Result, StudyDeskError};
use crate::router::{ProviderId, FALLBACK_FLASH_MODEL};
use crate::session::Role;
use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default embedding model
pub const DEFAULT_EMBED_MODEL: &str = "text-embedding-004";

/// Maximum texts per batchEmbedContents call
const EMBED_BATCH_LIMIT: usize = 100;

const TRANSCRIBE_PROMPT: &str = "Transcribe all the text visible in this image, in reading order. \
Write mathematical formulas in LaTeX enclosed in $$. Render tables as rows separated by ' | '. \
Output only the transcription.";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: Blob,
    },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Blob {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelList {
    #[serde(default)]
    models: Vec<ModelInfo>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelInfo {
    name: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

/// Gemini REST client: chat, model listing, embeddings and vision
pub struct GeminiClient {
    http_client: reqwest::Client,
    config: ProviderServiceConfig,
    embedding_model: String,
    vision_model: String,
}

impl GeminiClient {
    /// Create client from configuration
    pub fn new(config: ProviderServiceConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(StudyDeskError::Http)?;

        Ok(Self {
            http_client,
            config,
            embedding_model: DEFAULT_EMBED_MODEL.to_string(),
            vision_model: FALLBACK_FLASH_MODEL.to_string(),
        })
    }

    /// Model used for image transcription
    pub fn with_vision_model(mut self, model: impl Into<String>) -> Self {
        self.vision_model = model.into();
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.config.api_key {
            Some(ref key) => req.header("x-goog-api-key", key),
            None => req,
        }
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(StudyDeskError::ExternalError(format!(
            "gemini error (HTTP {}): {}",
            status, body
        )))
    }

    async fn generate(&self, model: &str, body: &GenerateRequest) -> Result<String> {
        let url = self.url(&format!("models/{}:generateContent", model));
        let response = self
            .authorize(self.http_client.post(&url).json(body))
            .send()
            .await?;
        let response: GenerateResponse = Self::check(response).await?.json().await?;
        extract_text(response)
    }
}

fn build_generate_request(request: &CompletionRequest) -> GenerateRequest {
    let mut contents: Vec<Content> = request
        .history
        .iter()
        .map(|turn| Content {
            role: Some(
                match turn.role {
                    Role::User => "user",
                    Role::Assistant => "model",
                }
                .to_string(),
            ),
            parts: vec![Part::Text {
                text: turn.content.clone(),
            }],
        })
        .collect();

    contents.push(Content {
        role: Some("user".to_string()),
        parts: vec![Part::Text {
            text: request.user_message(),
        }],
    });

    let system_instruction = if request.system.is_empty() {
        None
    } else {
        Some(Content {
            role: None,
            parts: vec![Part::Text {
                text: request.system.clone(),
            }],
        })
    };

    GenerateRequest {
        contents,
        system_instruction,
        generation_config: GenerationConfig {
            temperature: 0.3,
            max_output_tokens: 8192,
        },
    }
}

fn extract_text(response: GenerateResponse) -> Result<String> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .unwrap_or_else(|| "no candidates".to_string());
        return Err(StudyDeskError::Provider(format!(
            "gemini returned no answer: {}",
            reason
        )));
    };

    let text: String = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|part| match part {
            Part::Text { text } => Some(text),
            Part::InlineData { .. } => None,
        })
        .collect::<Vec<_>>()
        .join("");

    if text.trim().is_empty() {
        return Err(StudyDeskError::Provider(format!(
            "gemini returned an empty answer (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        )));
    }

    Ok(text)
}

fn text_generation_models(list: ModelList) -> Vec<String> {
    list.models
        .into_iter()
        .filter(|m| {
            m.supported_generation_methods
                .iter()
                .any(|method| method == "generateContent")
        })
        .map(|m| m.name.trim_start_matches("models/").to_string())
        .collect()
}

#[async_trait]
impl ChatProvider for GeminiClient {
    fn id(&self) -> ProviderId {
        ProviderId::Gemini
    }

    async fn complete(&self, model: &str, request: &CompletionRequest) -> Result<String> {
        self.generate(model, &build_generate_request(request)).await
    }
}

#[async_trait]
impl ModelLister for GeminiClient {
    async fn list_models(&self) -> Result<Vec<String>> {
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut req = self
                .http_client
                .get(self.url("models"))
                .query(&[("pageSize", "1000")]);
            if let Some(ref token) = page_token {
                req = req.query(&[("pageToken", token.as_str())]);
            }

            let response = self.authorize(req).send().await?;
            let list: ModelList = Self::check(response).await?.json().await?;
            page_token = list.next_page_token.clone().filter(|t| !t.is_empty());
            models.extend(text_generation_models(list));

            if page_token.is_none() {
                break;
            }
        }

        Ok(models)
    }
}

#[async_trait]
impl Embedder for GeminiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let results = self.embed_batch(&[text.to_string()]).await?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| StudyDeskError::Provider("No embedding returned".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        #[derive(Serialize)]
        struct EmbedRequest {
            model: String,
            content: Content,
        }

        #[derive(Serialize)]
        struct BatchRequest {
            requests: Vec<EmbedRequest>,
        }

        #[derive(Deserialize)]
        struct BatchResponse {
            #[serde(default)]
            embeddings: Vec<EmbeddingValues>,
        }

        #[derive(Deserialize)]
        struct EmbeddingValues {
            values: Vec<f32>,
        }

        let mut all = Vec::with_capacity(texts.len());
        let url = self.url(&format!("models/{}:batchEmbedContents", self.embedding_model));

        for chunk in texts.chunks(EMBED_BATCH_LIMIT) {
            let body = BatchRequest {
                requests: chunk
                    .iter()
                    .map(|text| EmbedRequest {
                        model: format!("models/{}", self.embedding_model),
                        content: Content {
                            role: None,
                            parts: vec![Part::Text { text: text.clone() }],
                        },
                    })
                    .collect(),
            };

            let response = self
                .authorize(self.http_client.post(&url).json(&body))
                .send()
                .await?;
            let batch: BatchResponse = Self::check(response).await?.json().await?;

            if batch.embeddings.len() != chunk.len() {
                return Err(StudyDeskError::Provider(format!(
                    "Expected {} embeddings, got {}",
                    chunk.len(),
                    batch.embeddings.len()
                )));
            }
            all.extend(batch.embeddings.into_iter().map(|e| e.values));
        }

        Ok(all)
    }

    fn model_name(&self) -> &str {
        &self.embedding_model
    }
}

#[async_trait]
impl ImageTranscriber for GeminiClient {
    async fn transcribe(&self, image: &[u8], mime_type: &str) -> Result<String> {
        let data = base64::engine::general_purpose::STANDARD.encode(image);
        let body = GenerateRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![
                    Part::Text {
                        text: TRANSCRIBE_PROMPT.to_string(),
                    },
                    Part::InlineData {
                        inline_data: Blob {
                            mime_type: mime_type.to_string(),
                            data,
                        },
                    },
                ],
            }],
            system_instruction: None,
            generation_config: GenerationConfig {
                temperature: 0.0,
                max_output_tokens: 8192,
            },
        };
        self.generate(&self.vision_model, &body).await
    }
}
