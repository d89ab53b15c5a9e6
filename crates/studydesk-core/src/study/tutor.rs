//! Conversation orchestration over the router and session state

use super::{StudyTask, Subject};
use crate::config::Config;
use crate::documents::{extract_documents, ExtractionReport};
use crate::error::{Result, StudyDeskError};
use crate::llm::{Embedder, ImageTranscriber, Providers};
use crate::retrieval::VectorIndex;
use crate::router::{RoutedAnswer, Router, RoutingMode};
use crate::session::{AppState, DocumentContext};
use std::path::PathBuf;
use std::sync::Arc;

/// Ties a router, an optional embedder and the application state together
pub struct Tutor {
    state: AppState,
    router: Router,
    embedder: Option<Arc<dyn Embedder>>,
}

impl Tutor {
    pub fn new(router: Router, subject: Subject) -> Self {
        let router = router.with_system_instruction(subject.system_instruction());
        Self {
            state: AppState::new(subject),
            router,
            embedder: None,
        }
    }

    /// Router over the configured providers, with embeddings when available
    pub async fn from_config(config: &Config, providers: &Providers) -> Self {
        let router = Router::from_config(config, providers).await;
        let tutor = Self::new(router, config.subject);
        match providers.embedder() {
            Some(embedder) => tutor.with_embedder(embedder),
            None => tutor,
        }
    }

    pub fn with_embedder(mut self, embedder: Arc<dyn Embedder>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn subject(&self) -> Subject {
        self.state.subject
    }

    pub fn set_subject(&mut self, subject: Subject) {
        self.state.subject = subject;
        self.router.set_system_instruction(subject.system_instruction());
    }

    /// Answer one message and record both turns in the current session
    pub async fn ask(&mut self, prompt: &str, mode: RoutingMode) -> RoutedAnswer {
        let history = self
            .state
            .current()
            .recent_turns(self.router.routing().history_turns);
        self.state.push_user(prompt);

        let context = match self.state.document() {
            Some(document) => {
                document
                    .context_for(prompt, self.embedder.as_deref(), self.router.routing())
                    .await
            }
            None => String::new(),
        };

        let answer = self
            .router
            .route_and_answer(prompt, mode, &context, &history)
            .await;

        if answer.is_failure() {
            tracing::warn!("No provider answered: {}", answer.answer);
        }
        self.state.push_assistant(answer.answer.clone(), answer.label.clone());
        answer
    }

    /// Generate a synthesis, flashcards or a quiz from the loaded document
    pub async fn run_task(&mut self, task: StudyTask) -> Result<RoutedAnswer> {
        if self.state.document().map_or(true, DocumentContext::is_empty) {
            return Err(StudyDeskError::InvalidInput(
                "load a course document before generating exercises".to_string(),
            ));
        }

        let prompt = task.prompt(self.state.subject);
        Ok(self.ask(&prompt, task.mode()).await)
    }

    /// Extract files and make them the current document context.
    ///
    /// The previous context is replaced only when at least one file was
    /// read. Indexing failures keep the raw text without retrieval.
    pub async fn load_documents(
        &mut self,
        paths: &[PathBuf],
        transcriber: Option<&dyn ImageTranscriber>,
    ) -> ExtractionReport {
        let report = extract_documents(paths, transcriber).await;
        if report.documents.is_empty() {
            return report;
        }

        let mut document = DocumentContext::new(report.text.clone(), report.sources());
        if let Some(embedder) = self.embedder.as_deref() {
            match VectorIndex::build(&report.text, embedder).await {
                Ok(index) => document = document.with_index(index),
                Err(e) => tracing::warn!("Vector index unavailable, using raw text: {}", e),
            }
        }

        self.state.set_document(document);
        report
    }
}
