//! Clients for the providers that have credentials

use super::{ChatProvider, Embedder, GeminiClient, ImageTranscriber, OpenAiCompatClient};
use crate::config::ProvidersConfig;
use crate::error::Result;
use crate::router::ProviderId;
use std::sync::Arc;

/// Constructed provider clients; absent credentials leave a slot empty
#[derive(Default, Clone)]
pub struct Providers {
    gemini: Option<Arc<GeminiClient>>,
    groq: Option<Arc<OpenAiCompatClient>>,
    deepseek: Option<Arc<OpenAiCompatClient>>,
}

impl Providers {
    /// Build a client for every enabled provider
    pub fn from_config(config: &ProvidersConfig) -> Result<Self> {
        let mut providers = Self::default();

        for id in config.enabled() {
            let block = config.get(id).clone();
            match id {
                ProviderId::Gemini => providers.gemini = Some(Arc::new(GeminiClient::new(block)?)),
                ProviderId::Groq => {
                    providers.groq = Some(Arc::new(OpenAiCompatClient::new(id, block)?))
                }
                ProviderId::DeepSeek => {
                    providers.deepseek = Some(Arc::new(OpenAiCompatClient::new(id, block)?))
                }
            }
            tracing::debug!("Provider {} enabled", id);
        }

        Ok(providers)
    }

    pub fn gemini(&self) -> Option<&Arc<GeminiClient>> {
        self.gemini.as_ref()
    }

    /// Chat-capable clients in canonical order
    pub fn chat_providers(&self) -> Vec<Arc<dyn ChatProvider>> {
        let mut list: Vec<Arc<dyn ChatProvider>> = Vec::new();
        if let Some(ref gemini) = self.gemini {
            list.push(gemini.clone());
        }
        if let Some(ref groq) = self.groq {
            list.push(groq.clone());
        }
        if let Some(ref deepseek) = self.deepseek {
            list.push(deepseek.clone());
        }
        list
    }

    /// Embedding backend, when the primary provider is configured
    pub fn embedder(&self) -> Option<Arc<dyn Embedder>> {
        self.gemini
            .as_ref()
            .map(|g| g.clone() as Arc<dyn Embedder>)
    }

    /// Vision backend, when the primary provider is configured
    pub fn transcriber(&self) -> Option<Arc<dyn ImageTranscriber>> {
        self.gemini
            .as_ref()
            .map(|g| g.clone() as Arc<dyn ImageTranscriber>)
    }

    pub fn is_empty(&self) -> bool {
        self.gemini.is_none() && self.groq.is_none() && self.deepseek.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_credentials_no_clients() {
        let providers = Providers::from_config(&ProvidersConfig::default()).unwrap();
        assert!(providers.is_empty());
        assert!(providers.embedder().is_none());
        assert!(providers.chat_providers().is_empty());
    }

    #[test]
    fn test_enabled_providers_get_clients() {
        let mut config = ProvidersConfig::default();
        config.groq.api_key = Some("k1".into());
        config.deepseek.api_key = Some("k2".into());

        let providers = Providers::from_config(&config).unwrap();
        let ids: Vec<ProviderId> = providers.chat_providers().iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec![ProviderId::Groq, ProviderId::DeepSeek]);
        assert!(providers.transcriber().is_none());
    }
}
