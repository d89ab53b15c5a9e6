//! Ordered cascade configuration

use super::{CatalogSlot, ModelCatalog, ProviderCandidate, ProviderId, Tier};
use serde::{Deserialize, Serialize};

/// How a rule names its model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelRef {
    /// Literal model identifier
    Fixed(String),
    /// Resolved against the discovered catalog at selection time
    Catalog(CatalogSlot),
}

impl ModelRef {
    fn resolve(&self, catalog: &ModelCatalog) -> String {
        match self {
            Self::Fixed(name) => name.clone(),
            Self::Catalog(slot) => catalog.resolve(*slot),
        }
    }
}

/// One entry of the cascade: which tiers it serves and what it calls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CascadeRule {
    pub tiers: Vec<Tier>,
    pub provider: ProviderId,
    pub model: ModelRef,
    pub label: String,
}

impl CascadeRule {
    fn new(tiers: &[Tier], provider: ProviderId, model: ModelRef, label: &str) -> Self {
        Self {
            tiers: tiers.to_vec(),
            provider,
            model,
            label: label.to_string(),
        }
    }

    fn candidate(&self, catalog: &ModelCatalog) -> ProviderCandidate {
        ProviderCandidate {
            provider: self.provider,
            model: self.model.resolve(catalog),
            label: self.label.clone(),
        }
    }
}

/// Priority table for all tiers plus the generic last resort
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CascadePolicy {
    pub rules: Vec<CascadeRule>,
    pub final_fallback: CascadeRule,
}

impl Default for CascadePolicy {
    fn default() -> Self {
        use Tier::*;
        Self {
            rules: vec![
                CascadeRule::new(
                    &[Reasoning],
                    ProviderId::DeepSeek,
                    ModelRef::Fixed("deepseek-reasoner".into()),
                    "DeepSeek R1 (reasoning)",
                ),
                CascadeRule::new(
                    &[Reasoning, Complex],
                    ProviderId::Gemini,
                    ModelRef::Catalog(CatalogSlot::Pro),
                    "Gemini Pro (expert)",
                ),
                CascadeRule::new(
                    &[Reasoning, Complex],
                    ProviderId::Groq,
                    ModelRef::Fixed("llama-3.3-70b-versatile".into()),
                    "Groq Llama 70B (relay)",
                ),
                CascadeRule::new(
                    &[Simple],
                    ProviderId::Groq,
                    ModelRef::Fixed("llama-3.1-8b-instant".into()),
                    "Groq Llama 8B (fast)",
                ),
                CascadeRule::new(
                    &[Reasoning, Complex, Simple],
                    ProviderId::Gemini,
                    ModelRef::Catalog(CatalogSlot::Flash),
                    "Gemini Flash",
                ),
            ],
            final_fallback: CascadeRule::new(
                &[Reasoning, Complex, Simple],
                ProviderId::Gemini,
                ModelRef::Fixed("gemini-2.0-flash".into()),
                "Gemini (fallback)",
            ),
        }
    }
}

impl CascadePolicy {
    /// Ordered candidates for a tier, restricted to configured providers.
    ///
    /// The final fallback is appended for every tier. A (provider, model)
    /// pair already in the list is not repeated.
    pub fn candidates(
        &self,
        tier: Tier,
        enabled: &[ProviderId],
        catalog: &ModelCatalog,
    ) -> Vec<ProviderCandidate> {
        let mut candidates: Vec<ProviderCandidate> = Vec::new();

        let rules = self
            .rules
            .iter()
            .filter(|rule| rule.tiers.contains(&tier))
            .chain(std::iter::once(&self.final_fallback));

        for rule in rules {
            if !enabled.contains(&rule.provider) {
                continue;
            }
            let candidate = rule.candidate(catalog);
            let duplicate = candidates
                .iter()
                .any(|c| c.provider == candidate.provider && c.model == candidate.model);
            if !duplicate {
                candidates.push(candidate);
            }
        }

        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [ProviderId; 3] = ProviderId::ALL;

    fn models(list: &[ProviderCandidate]) -> Vec<&str> {
        list.iter().map(|c| c.model.as_str()).collect()
    }

    #[test]
    fn test_simple_tier_starts_with_fast_model() {
        let policy = CascadePolicy::default();
        let list = policy.candidates(Tier::Simple, &ALL, &ModelCatalog::fallback());
        assert_eq!(
            models(&list),
            vec!["llama-3.1-8b-instant", "gemini-flash-latest", "gemini-2.0-flash"]
        );
    }

    #[test]
    fn test_complex_tier_order() {
        let policy = CascadePolicy::default();
        let list = policy.candidates(Tier::Complex, &ALL, &ModelCatalog::fallback());
        assert_eq!(
            models(&list),
            vec![
                "gemini-2.5-pro",
                "llama-3.3-70b-versatile",
                "gemini-flash-latest",
                "gemini-2.0-flash"
            ]
        );
    }

    #[test]
    fn test_reasoning_tier_starts_with_reasoning_provider() {
        let policy = CascadePolicy::default();
        let list = policy.candidates(Tier::Reasoning, &ALL, &ModelCatalog::fallback());
        assert_eq!(list[0].provider, ProviderId::DeepSeek);
        assert_eq!(list.len(), 5);
    }

    #[test]
    fn test_disabled_providers_are_skipped() {
        let policy = CascadePolicy::default();
        let list = policy.candidates(Tier::Complex, &[ProviderId::Groq], &ModelCatalog::fallback());
        assert_eq!(models(&list), vec!["llama-3.3-70b-versatile"]);

        let list = policy.candidates(Tier::Simple, &[], &ModelCatalog::fallback());
        assert!(list.is_empty());
    }

    #[test]
    fn test_fallback_not_duplicated() {
        let catalog = ModelCatalog::from_listing(Ok(vec!["gemini-2.0-flash-latest".into()]));
        let mut policy = CascadePolicy::default();
        policy.final_fallback.model = ModelRef::Catalog(CatalogSlot::Flash);
        let list = policy.candidates(Tier::Simple, &[ProviderId::Gemini], &catalog);
        assert_eq!(models(&list), vec!["gemini-2.0-flash-latest"]);
    }

    #[test]
    fn test_policy_yaml_roundtrip_shape() {
        let yaml = r#"
rules:
  - tiers: [simple]
    provider: groq
    model: { fixed: llama-3.1-8b-instant }
    label: Fast
final_fallback:
  tiers: [simple, complex, reasoning]
  provider: gemini
  model: { catalog: flash }
  label: Last resort
"#;
        let policy: CascadePolicy = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(policy.rules.len(), 1);
        assert_eq!(policy.final_fallback.model, ModelRef::Catalog(CatalogSlot::Flash));
    }
}
