//! StudyDesk Core Library
//!
//! Core functionality for the studydesk study assistant.
//!
//! # Features
//! - Multi-provider routing with an ordered fallback cascade (Gemini, Groq, DeepSeek)
//! - Keyword and length classification of prompts
//! - Text extraction from PDF, spreadsheets, Word, PowerPoint and images
//! - Retrieval over loaded course material with hosted embeddings
//! - Word and PDF export with LaTeX formulas rendered as images

pub mod config;
pub mod documents;
pub mod error;
pub mod export;
pub mod formula;
pub mod llm;
pub mod retrieval;
pub mod router;
pub mod session;
pub mod study;

pub use config::{Config, ExportConfig, ProviderServiceConfig, ProvidersConfig, RoutingConfig};
pub use documents::{extract_document, extract_documents, DocumentKind, ExtractionReport};
pub use error::{Error, Result, StudyDeskError};
pub use export::{export, export_docx, export_pdf, export_to_path, ExportFormat};
pub use formula::{
    render_for_export, split_segments, substitute_symbols, DisabledRenderer, ExportBlock,
    FormulaRenderer, LatexRenderer, Segment,
};
pub use llm::{
    ChatProvider, ChatTurn, CompletionRequest, Embedder, GeminiClient, ImageTranscriber,
    ModelLister, OpenAiCompatClient, Providers,
};
pub use retrieval::VectorIndex;
pub use router::{
    CandidateOutcome, CascadePolicy, ModelCatalog, ProviderCandidate, ProviderId, RoutedAnswer,
    Router, RoutingMode, Tier, ALL_FAILED_LABEL,
};
pub use session::{AppState, ChatMessage, DocumentContext, Role, Session};
pub use study::{QuizLevel, StudyTask, Subject, Tutor};

/// Default config directory name
pub const CONFIG_DIR_NAME: &str = "studydesk";
