//! Configuration management

use crate::error::{Result, StudyDeskError};
use crate::router::{CascadePolicy, ProviderId};
use crate::study::Subject;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Subject injected into the tutor's system instruction
    #[serde(default)]
    pub subject: Subject,

    /// Hosted provider endpoints and credentials
    #[serde(default)]
    pub providers: ProvidersConfig,

    /// Classification thresholds and keyword sets
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Ordered provider cascade
    #[serde(default)]
    pub cascade: CascadePolicy,

    /// Document export settings
    #[serde(default)]
    pub export: ExportConfig,
}

/// Connection settings for one hosted LLM provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderServiceConfig {
    /// Base URL of the provider API
    pub base_url: String,

    /// API key; a provider without one is disabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl ProviderServiceConfig {
    fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            api_key: None,
            timeout_secs: default_timeout(),
        }
    }

    /// Whether a non-empty credential is present
    pub fn is_enabled(&self) -> bool {
        self.api_key
            .as_deref()
            .map(|k| !k.trim().is_empty())
            .unwrap_or(false)
    }
}

fn default_timeout() -> u64 {
    120
}

/// Per-provider configuration blocks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default = "default_gemini")]
    pub gemini: ProviderServiceConfig,

    #[serde(default = "default_groq")]
    pub groq: ProviderServiceConfig,

    #[serde(default = "default_deepseek")]
    pub deepseek: ProviderServiceConfig,
}

fn default_gemini() -> ProviderServiceConfig {
    ProviderServiceConfig::with_base_url("https://generativelanguage.googleapis.com/v1beta")
}

fn default_groq() -> ProviderServiceConfig {
    ProviderServiceConfig::with_base_url("https://api.groq.com/openai/v1")
}

fn default_deepseek() -> ProviderServiceConfig {
    ProviderServiceConfig::with_base_url("https://api.deepseek.com/v1")
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            gemini: default_gemini(),
            groq: default_groq(),
            deepseek: default_deepseek(),
        }
    }
}

impl ProvidersConfig {
    /// Get the block for a provider
    pub fn get(&self, id: ProviderId) -> &ProviderServiceConfig {
        match id {
            ProviderId::Gemini => &self.gemini,
            ProviderId::Groq => &self.groq,
            ProviderId::DeepSeek => &self.deepseek,
        }
    }

    fn get_mut(&mut self, id: ProviderId) -> &mut ProviderServiceConfig {
        match id {
            ProviderId::Gemini => &mut self.gemini,
            ProviderId::Groq => &mut self.groq,
            ProviderId::DeepSeek => &mut self.deepseek,
        }
    }

    /// Fill missing credentials from the environment
    pub fn apply_env_credentials(&mut self) {
        self.apply_credentials_from(|name| std::env::var(name).ok());
    }

    /// Fill missing credentials using a variable lookup
    pub fn apply_credentials_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        for id in ProviderId::ALL {
            let block = self.get_mut(id);
            if block.is_enabled() {
                continue;
            }
            block.api_key = id
                .env_vars()
                .iter()
                .filter_map(|name| lookup(name))
                .find(|value| !value.trim().is_empty());
        }
    }

    /// Providers that have a credential
    pub fn enabled(&self) -> Vec<ProviderId> {
        ProviderId::ALL
            .into_iter()
            .filter(|id| self.get(*id).is_enabled())
            .collect()
    }
}

/// Routing heuristics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Context longer than this many characters counts as present
    #[serde(default = "default_context_threshold")]
    pub context_threshold: usize,

    /// Prompts with more words than this are complex
    #[serde(default = "default_word_threshold")]
    pub word_threshold: usize,

    /// Whether loaded context alone selects the complex tier
    #[serde(default = "default_true")]
    pub context_forces_complex: bool,

    /// Keywords that mark a prompt as complex
    #[serde(default = "default_complex_keywords")]
    pub complex_keywords: Vec<String>,

    /// Keywords that send a prompt to the reasoning provider
    #[serde(default = "default_reasoning_keywords")]
    pub reasoning_keywords: Vec<String>,

    /// Previous turns forwarded with each request
    #[serde(default = "default_history_turns")]
    pub history_turns: usize,

    /// Raw document text is truncated to this many characters
    #[serde(default = "default_max_context_chars")]
    pub max_context_chars: usize,

    /// Passages retrieved from the vector index per question
    #[serde(default = "default_top_k")]
    pub retrieval_top_k: usize,
}

fn default_context_threshold() -> usize {
    10
}

fn default_word_threshold() -> usize {
    15
}

fn default_true() -> bool {
    true
}

fn default_complex_keywords() -> Vec<String> {
    [
        "analyse",
        "analyser",
        "synthèse",
        "calcul",
        "calculer",
        "tableau",
        "bilan",
        "ratio",
        "formule",
        "pourquoi",
        "explique",
        "expliquer",
        "exercice",
        "résoudre",
        "corrigé",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_reasoning_keywords() -> Vec<String> {
    [
        "comparer",
        "démonstration",
        "démontrer",
        "prouver",
        "justifier",
        "raisonnement",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_history_turns() -> usize {
    6
}

fn default_max_context_chars() -> usize {
    30_000
}

fn default_top_k() -> usize {
    4
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            context_threshold: default_context_threshold(),
            word_threshold: default_word_threshold(),
            context_forces_complex: default_true(),
            complex_keywords: default_complex_keywords(),
            reasoning_keywords: default_reasoning_keywords(),
            history_turns: default_history_turns(),
            max_context_chars: default_max_context_chars(),
            retrieval_top_k: default_top_k(),
        }
    }
}

/// Export settings for Word and PDF output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Formula rasterization resolution
    #[serde(default = "default_dpi")]
    pub dpi: u32,

    /// Display width of formula images
    #[serde(default = "default_image_width")]
    pub image_width_inches: f32,

    /// Body font size for PDF export
    #[serde(default = "default_font_size")]
    pub pdf_font_size: f32,

    /// LaTeX compiler used to typeset formulas
    #[serde(default = "default_latex_command")]
    pub latex_command: String,

    /// DVI to PNG converter
    #[serde(default = "default_dvipng_command")]
    pub dvipng_command: String,
}

fn default_dpi() -> u32 {
    200
}

fn default_image_width() -> f32 {
    2.0
}

fn default_font_size() -> f32 {
    11.0
}

fn default_latex_command() -> String {
    "latex".to_string()
}

fn default_dvipng_command() -> String {
    "dvipng".to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dpi: default_dpi(),
            image_width_inches: default_image_width(),
            pdf_font_size: default_font_size(),
            latex_command: default_latex_command(),
            dvipng_command: default_dvipng_command(),
        }
    }
}

impl Config {
    /// Load config from the configured path, then fill credentials from the environment
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::path())?;
        config.providers.apply_env_credentials();
        Ok(config)
    }

    /// Load config from a file, defaults when it does not exist
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_yaml::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to the configured path
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Config path (`STUDYDESK_CONFIG` overrides the default)
    pub fn path() -> PathBuf {
        std::env::var("STUDYDESK_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::default_path())
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CONFIG_DIR_NAME)
            .join("config.yml")
    }

    fn validate(&self) -> Result<()> {
        if self.export.dpi == 0 {
            return Err(StudyDeskError::Config("export.dpi must be positive".into()));
        }
        if self.export.image_width_inches <= 0.0 {
            return Err(StudyDeskError::Config(
                "export.image_width_inches must be positive".into(),
            ));
        }
        if self.routing.retrieval_top_k == 0 {
            return Err(StudyDeskError::Config(
                "routing.retrieval_top_k must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
