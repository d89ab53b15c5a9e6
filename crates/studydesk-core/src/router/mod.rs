//! Provider routing and fallback cascade
//!
//! Decides, per query, which hosted model answers:
//! - Classification of the prompt into a tier (simple, complex, reasoning)
//! - Candidate list built from an ordered cascade policy
//! - Sequential execution, first success wins

mod cascade;
mod catalog;
mod classify;
mod policy;

pub use cascade::{Attempt, CandidateOutcome, RoutedAnswer, Router, ALL_FAILED_LABEL};
pub use catalog::{CatalogSlot, ModelCatalog, FALLBACK_FLASH_MODEL, FALLBACK_PRO_MODEL};
pub use classify::{classify, Classification};
pub use policy::{CascadePolicy, CascadeRule, ModelRef};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hosted LLM backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    /// Primary multimodal provider
    Gemini,
    /// Fast-inference text provider
    Groq,
    /// Reasoning-focused provider
    DeepSeek,
}

impl ProviderId {
    pub const ALL: [ProviderId; 3] = [ProviderId::Gemini, ProviderId::Groq, ProviderId::DeepSeek];

    /// Environment variables holding the credential, in lookup order
    pub fn env_vars(&self) -> &'static [&'static str] {
        match self {
            Self::Gemini => &["GEMINI_API_KEY", "GOOGLE_API_KEY"],
            Self::Groq => &["GROQ_API_KEY"],
            Self::DeepSeek => &["DEEPSEEK_API_KEY"],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::Groq => "groq",
            Self::DeepSeek => "deepseek",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One (provider, model) pair to try
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderCandidate {
    pub provider: ProviderId,
    pub model: String,
    pub label: String,
}

/// Manual mode selection, or heuristic routing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutingMode {
    #[default]
    Auto,
    Fast,
    Expert,
    Reasoning,
}

impl FromStr for RoutingMode {
    type Err = crate::error::StudyDeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "fast" | "rapide" => Ok(Self::Fast),
            "expert" => Ok(Self::Expert),
            "reasoning" | "raisonnement" => Ok(Self::Reasoning),
            other => Err(crate::error::StudyDeskError::InvalidInput(format!(
                "Unknown routing mode: {}",
                other
            ))),
        }
    }
}

/// Cost/capability tier a prompt is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Simple,
    Complex,
    Reasoning,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Simple => "simple",
            Self::Complex => "complex",
            Self::Reasoning => "reasoning",
        };
        f.write_str(name)
    }
}
