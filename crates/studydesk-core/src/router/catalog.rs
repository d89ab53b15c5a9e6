//! Discovered model names for the primary provider
//!
//! Model names are looked up by substring markers against the provider's
//! own listing, so a decommissioned name is never hardcoded in the cascade.

use crate::error::Result;
use crate::llm::ModelLister;
use serde::{Deserialize, Serialize};

/// Used when the listing failed or nothing matched the Pro markers
pub const FALLBACK_PRO_MODEL: &str = "gemini-2.5-pro";

/// Used when the listing failed or nothing matched the Flash markers
pub const FALLBACK_FLASH_MODEL: &str = "gemini-flash-latest";

/// Listed models that advertise text generation but are not chat models
const NON_TEXT_MARKERS: &[&str] = &["tts", "image", "audio", "live", "embedding"];

/// Named positions in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSlot {
    /// Most capable model
    Pro,
    /// Fast and cheap model
    Flash,
}

impl CatalogSlot {
    pub fn markers(&self) -> &'static [&'static str] {
        match self {
            Self::Pro => &["pro", "2.5"],
            Self::Flash => &["flash", "latest"],
        }
    }

    pub fn fallback_model(&self) -> &'static str {
        match self {
            Self::Pro => FALLBACK_PRO_MODEL,
            Self::Flash => FALLBACK_FLASH_MODEL,
        }
    }
}

/// Text-generation models known for the primary provider
#[derive(Debug, Clone, Default, Serialize)]
pub struct ModelCatalog {
    models: Vec<String>,
    discovered: bool,
}

impl ModelCatalog {
    /// Catalog holding only the hardcoded fallback pair
    pub fn fallback() -> Self {
        Self {
            models: vec![
                FALLBACK_PRO_MODEL.to_string(),
                FALLBACK_FLASH_MODEL.to_string(),
            ],
            discovered: false,
        }
    }

    /// Build from a listing result; failures and empty listings use the fallback pair
    pub fn from_listing(listing: Result<Vec<String>>) -> Self {
        match listing {
            Ok(models) if !models.is_empty() => {
                tracing::debug!("Discovered {} text-generation models", models.len());
                Self {
                    models,
                    discovered: true,
                }
            }
            Ok(_) => {
                tracing::warn!("Model listing returned no text-generation models, using fallback pair");
                Self::fallback()
            }
            Err(e) => {
                tracing::warn!("Model listing failed ({}), using fallback pair", e);
                Self::fallback()
            }
        }
    }

    /// Query the provider's model listing once
    pub async fn discover(lister: &dyn ModelLister) -> Self {
        Self::from_listing(lister.list_models().await)
    }

    /// Resolve a slot to a concrete model name
    pub fn resolve(&self, slot: CatalogSlot) -> String {
        let markers = slot.markers();
        self.models
            .iter()
            .find(|name| {
                let lowered = name.to_lowercase();
                markers.iter().all(|m| lowered.contains(m))
                    && !NON_TEXT_MARKERS.iter().any(|m| lowered.contains(m))
            })
            .cloned()
            .unwrap_or_else(|| slot.fallback_model().to_string())
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    /// Whether the models come from a successful listing
    pub fn is_discovered(&self) -> bool {
        self.discovered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StudyDeskError;

    #[test]
    fn test_failed_listing_uses_fallback_pair() {
        let catalog = ModelCatalog::from_listing(Err(StudyDeskError::Provider("down".into())));
        assert!(!catalog.is_discovered());
        assert_eq!(catalog.resolve(CatalogSlot::Pro), FALLBACK_PRO_MODEL);
        assert_eq!(catalog.resolve(CatalogSlot::Flash), FALLBACK_FLASH_MODEL);
    }

    #[test]
    fn test_markers_select_listed_models() {
        let catalog = ModelCatalog::from_listing(Ok(vec![
            "gemini-2.0-flash".into(),
            "gemini-2.5-pro-preview-tts".into(),
            "gemini-2.5-pro".into(),
            "gemini-flash-latest".into(),
        ]));
        assert!(catalog.is_discovered());
        assert_eq!(catalog.resolve(CatalogSlot::Pro), "gemini-2.5-pro");
        assert_eq!(catalog.resolve(CatalogSlot::Flash), "gemini-flash-latest");
    }

    #[test]
    fn test_unmatched_slot_falls_back() {
        let catalog = ModelCatalog::from_listing(Ok(vec!["gemini-1.0-pro".into()]));
        assert_eq!(catalog.resolve(CatalogSlot::Pro), FALLBACK_PRO_MODEL);
    }

    #[test]
    fn test_empty_listing_is_not_discovered() {
        let catalog = ModelCatalog::from_listing(Ok(vec![]));
        assert!(!catalog.is_discovered());
        assert_eq!(catalog.models().len(), 2);
    }
}
