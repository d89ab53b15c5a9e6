//! LLM integration
//!
//! Provides traits and implementations for:
//! - Chat completion against hosted providers (Gemini, Groq, DeepSeek)
//! - Model discovery for the primary provider
//! - Embedding generation for retrieval
//! - Image transcription for uploaded pictures

mod client;
mod gemini;
mod registry;
mod request;
mod traits;

pub use client::{ChatMessage, OpenAiCompatClient};
pub use gemini::{GeminiClient, DEFAULT_EMBED_MODEL};
pub use registry::Providers;
pub use request::{ChatTurn, CompletionRequest, SYSTEM_INSTRUCTION};
pub use traits::*;
