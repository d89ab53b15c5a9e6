//! Conversation state owned by one tutor instance

use crate::config::RoutingConfig;
use crate::error::{Result, StudyDeskError};
use crate::llm::{ChatTurn, Embedder};
use crate::retrieval::VectorIndex;
use crate::study::Subject;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const TITLE_CHARS: usize = 40;

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One turn of a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    /// Label of the model that produced an assistant message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_label: Option<String>,
}

/// An ordered conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub messages: Vec<ChatMessage>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: generate_session_id(),
            created_at: Utc::now(),
            messages: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Start of the first user message, or "Session"
    pub fn title(&self) -> String {
        let first = self
            .messages
            .iter()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.split_whitespace().collect::<Vec<_>>().join(" "))
            .unwrap_or_default();

        if first.is_empty() {
            return "Session".to_string();
        }
        if first.chars().count() <= TITLE_CHARS {
            return first;
        }
        let truncated: String = first.chars().take(TITLE_CHARS).collect();
        format!("{}…", truncated.trim_end())
    }

    /// Name used when the session is archived
    pub fn archive_name(&self) -> String {
        format!(
            "{} ({})",
            self.title(),
            self.created_at.format("%Y-%m-%d %H:%M:%S")
        )
    }

    /// The last `limit` messages as provider history
    pub fn recent_turns(&self, limit: usize) -> Vec<ChatTurn> {
        let skip = self.messages.len().saturating_sub(limit);
        self.messages
            .iter()
            .skip(skip)
            .map(|m| ChatTurn {
                role: m.role,
                content: m.content.clone(),
            })
            .collect()
    }

    /// Last assistant answer, if any
    pub fn last_answer(&self) -> Option<&ChatMessage> {
        self.messages.iter().rev().find(|m| m.role == Role::Assistant)
    }
}

/// Loaded course material, replaced wholesale on each upload
#[derive(Debug, Clone, Default)]
pub struct DocumentContext {
    pub raw_text: String,
    /// File names the text came from
    pub sources: Vec<String>,
    pub vector_index: Option<VectorIndex>,
}

impl DocumentContext {
    pub fn new(raw_text: impl Into<String>, sources: Vec<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            sources,
            vector_index: None,
        }
    }

    pub fn with_index(mut self, index: VectorIndex) -> Self {
        self.vector_index = Some(index);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.raw_text.trim().is_empty()
    }

    /// Context text for one question.
    ///
    /// Uses the top retrieved passages when an index and embedder are
    /// available, otherwise the raw text cut at `max_context_chars`.
    pub async fn context_for(
        &self,
        query: &str,
        embedder: Option<&dyn Embedder>,
        routing: &RoutingConfig,
    ) -> String {
        if let (Some(index), Some(embedder)) = (&self.vector_index, embedder) {
            match index.search(query, embedder, routing.retrieval_top_k).await {
                Ok(hits) if !hits.is_empty() => {
                    return hits
                        .into_iter()
                        .map(|hit| hit.chunk.text.trim().to_string())
                        .collect::<Vec<_>>()
                        .join("\n\n");
                }
                Ok(_) => {}
                Err(e) => tracing::warn!("Retrieval failed, using raw document text: {}", e),
            }
        }

        truncate_chars(&self.raw_text, routing.max_context_chars)
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}

/// Explicitly owned application state: the current session, archived
/// sessions by name, the loaded document and the active subject.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    current: Session,
    archive: BTreeMap<String, Session>,
    document: Option<DocumentContext>,
    pub subject: Subject,
}

impl AppState {
    pub fn new(subject: Subject) -> Self {
        Self {
            subject,
            ..Default::default()
        }
    }

    pub fn current(&self) -> &Session {
        &self.current
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.current.messages.push(ChatMessage {
            role: Role::User,
            content: content.into(),
            model_label: None,
        });
    }

    pub fn push_assistant(&mut self, content: impl Into<String>, model_label: impl Into<String>) {
        self.current.messages.push(ChatMessage {
            role: Role::Assistant,
            content: content.into(),
            model_label: Some(model_label.into()),
        });
    }

    /// Move a non-empty session into the archive, returning its name
    fn archive_session(&mut self, session: Session) -> Option<String> {
        if session.is_empty() {
            return None;
        }

        let base = session.archive_name();
        let mut name = base.clone();
        let mut n = 2;
        while self.archive.contains_key(&name) {
            name = format!("{} #{}", base, n);
            n += 1;
        }

        tracing::info!("Archived session {} as '{}'", session.id, name);
        self.archive.insert(name.clone(), session);
        Some(name)
    }

    /// Archive the current session (when non-empty) and start a fresh one
    pub fn new_session(&mut self) -> Option<String> {
        let previous = std::mem::take(&mut self.current);
        self.archive_session(previous)
    }

    /// Make an archived session current, archiving the current one first
    pub fn restore(&mut self, name: &str) -> Result<()> {
        let restored = self
            .archive
            .remove(name)
            .ok_or_else(|| StudyDeskError::SessionNotFound(name.to_string()))?;

        let previous = std::mem::replace(&mut self.current, restored);
        self.archive_session(previous);
        tracing::info!("Restored session '{}'", name);
        Ok(())
    }

    pub fn archived_names(&self) -> Vec<&str> {
        self.archive.keys().map(String::as_str).collect()
    }

    pub fn archived(&self, name: &str) -> Option<&Session> {
        self.archive.get(name)
    }

    pub fn document(&self) -> Option<&DocumentContext> {
        self.document.as_ref()
    }

    pub fn set_document(&mut self, document: DocumentContext) {
        tracing::info!(
            "Loaded document context from {} source(s)",
            document.sources.len()
        );
        self.document = Some(document);
    }

    pub fn clear_document(&mut self) {
        self.document = None;
    }
}

/// Session identifier printed in UUID layout.
///
/// Mixed from the clock, the process id and a process-wide counter; it is
/// unique within a run but not random, despite the version nibble.
fn generate_session_id() -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();

    let pid = std::process::id();
    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
    let mixed = timestamp ^ (pid as u128 * 6_364_136_223_846_793_005) ^ ((seq as u128) << 32);

    format!(
        "{:08x}-{:04x}-4{:03x}-{:04x}-{:012x}",
        (mixed >> 96) as u32,
        (mixed >> 80) as u16,
        (mixed >> 64) as u16 & 0x0FFF,
        ((mixed >> 48) as u16 & 0x3FFF) | 0x8000,
        mixed as u64 & 0xFFFF_FFFF_FFFF,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_ids_are_unique() {
        let a = Session::new();
        let b = Session::new();
        assert_ne!(a.id, b.id);
        assert_eq!(a.id.len(), 36);
    }

    #[test]
    fn test_session_id_layout() {
        let id = Session::new().id;
        let groups: Vec<&str> = id.split('-').collect();
        assert_eq!(
            groups.iter().map(|g| g.len()).collect::<Vec<_>>(),
            vec![8, 4, 4, 4, 12]
        );
        assert!(groups[2].starts_with('4'));
        assert!(id.chars().all(|c| c == '-' || c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_new_session_archives_only_non_empty() {
        let mut state = AppState::default();
        assert_eq!(state.new_session(), None);
        assert!(state.archived_names().is_empty());

        state.push_user("Qu'est-ce que le BFR ?");
        state.push_assistant("Le besoin en fonds de roulement…", "Gemini Flash");
        let name = state.new_session().unwrap();

        assert!(name.starts_with("Qu'est-ce que le BFR ? ("));
        assert!(state.current().is_empty());
        assert_eq!(state.archived_names(), vec![name.as_str()]);
        assert_eq!(state.archived(&name).unwrap().messages.len(), 2);
    }

    #[test]
    fn test_restore_swaps_sessions() {
        let mut state = AppState::default();
        state.push_user("première");
        let first = state.new_session().unwrap();
        state.push_user("seconde");

        state.restore(&first).unwrap();
        assert_eq!(state.current().messages[0].content, "première");
        let names = state.archived_names();
        assert_eq!(names.len(), 1);
        assert!(names[0].starts_with("seconde"));
    }

    #[test]
    fn test_restore_unknown_session() {
        let mut state = AppState::default();
        let err = state.restore("nope").unwrap_err();
        assert!(matches!(err, StudyDeskError::SessionNotFound(_)));
        assert_eq!(err.exit_code(), crate::error::exit_codes::NOT_FOUND);
    }

    #[test]
    fn test_duplicate_archive_names_get_suffix() {
        let mut state = AppState::default();
        let mut session = Session::new();
        session.messages.push(ChatMessage {
            role: Role::User,
            content: "même".into(),
            model_label: None,
        });
        let a = state.archive_session(session.clone()).unwrap();
        let b = state.archive_session(session).unwrap();
        assert_ne!(a, b);
        assert!(b.ends_with(" #2"));
    }

    #[test]
    fn test_title_is_truncated() {
        let mut session = Session::new();
        assert_eq!(session.title(), "Session");
        session.messages.push(ChatMessage {
            role: Role::User,
            content: "x".repeat(100),
            model_label: None,
        });
        assert_eq!(session.title().chars().count(), TITLE_CHARS + 1);
    }

    #[test]
    fn test_recent_turns() {
        let mut state = AppState::default();
        for i in 0..5 {
            state.push_user(format!("q{}", i));
            state.push_assistant(format!("a{}", i), "test");
        }
        let turns = state.current().recent_turns(3);
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[0].content, "a3");
        assert_eq!(turns[2].role, Role::Assistant);
        assert_eq!(state.current().last_answer().unwrap().content, "a4");
    }

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        assert_eq!(truncate_chars("éàç", 2), "éà");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    #[tokio::test]
    async fn test_context_without_index_is_truncated_raw_text() {
        let routing = RoutingConfig {
            max_context_chars: 5,
            ..RoutingConfig::default()
        };
        let document = DocumentContext::new("abcdefgh", vec!["cours.pdf".into()]);
        assert_eq!(document.context_for("q", None, &routing).await, "abcde");
    }

    #[test]
    fn test_document_replaced_wholesale() {
        let mut state = AppState::default();
        state.set_document(DocumentContext::new("un", vec!["a.pdf".into()]));
        state.set_document(DocumentContext::new("deux", vec!["b.pdf".into()]));
        let document = state.document().unwrap();
        assert_eq!(document.raw_text, "deux");
        assert_eq!(document.sources, vec!["b.pdf".to_string()]);
        state.clear_document();
        assert!(state.document().is_none());
    }
}
