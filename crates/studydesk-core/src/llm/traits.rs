//! LLM trait definitions

use super::CompletionRequest;
use crate::error::Result;
use crate::router::ProviderId;
use async_trait::async_trait;

/// A hosted chat-completion backend
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Which provider this is
    fn id(&self) -> ProviderId;

    /// Generate one answer with the given model
    async fn complete(&self, model: &str, request: &CompletionRequest) -> Result<String>;
}

/// Model discovery
#[async_trait]
pub trait ModelLister: Send + Sync {
    /// Names of models that support text generation
    async fn list_models(&self) -> Result<Vec<String>>;
}

/// Embedding generation trait
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate embedding for single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for batch of texts
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Get model name
    fn model_name(&self) -> &str;
}

/// Vision transcription of uploaded images
#[async_trait]
pub trait ImageTranscriber: Send + Sync {
    /// Transcribe text and formulas visible in an image
    async fn transcribe(&self, image: &[u8], mime_type: &str) -> Result<String>;
}
