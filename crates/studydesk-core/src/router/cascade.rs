//! Sequential execution of the candidate list

use super::{
    classify, CascadePolicy, Classification, ModelCatalog, ProviderCandidate, ProviderId,
    RoutingMode, Tier,
};
use crate::config::{Config, RoutingConfig};
use crate::llm::{ChatProvider, ChatTurn, CompletionRequest, Providers, SYSTEM_INSTRUCTION};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Label attached to the synthetic answer when every candidate failed
pub const ALL_FAILED_LABEL: &str = "all-failed";

/// Result of one candidate call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CandidateOutcome {
    Success,
    Failed { reason: String },
}

/// One candidate and what happened when it was called
#[derive(Debug, Clone, Serialize)]
pub struct Attempt {
    pub candidate: ProviderCandidate,
    pub outcome: CandidateOutcome,
}

/// Final decision of the cascade
#[derive(Debug, Clone, Serialize)]
pub struct RoutedAnswer {
    pub answer: String,
    pub label: String,
    pub tier: Tier,
    /// Present for Auto mode only
    pub classification: Option<Classification>,
    pub attempts: Vec<Attempt>,
}

impl RoutedAnswer {
    /// Whether no candidate produced an answer
    pub fn is_failure(&self) -> bool {
        self.label == ALL_FAILED_LABEL
    }

    /// Failure reasons in attempt order
    pub fn failures(&self) -> impl Iterator<Item = (&ProviderCandidate, &str)> {
        self.attempts.iter().filter_map(|a| match &a.outcome {
            CandidateOutcome::Failed { reason } => Some((&a.candidate, reason.as_str())),
            CandidateOutcome::Success => None,
        })
    }
}

/// Picks candidates for a prompt and calls them in order until one answers
pub struct Router {
    providers: HashMap<ProviderId, Arc<dyn ChatProvider>>,
    policy: CascadePolicy,
    routing: RoutingConfig,
    catalog: ModelCatalog,
    system_instruction: String,
}

impl Router {
    pub fn new(policy: CascadePolicy, routing: RoutingConfig, catalog: ModelCatalog) -> Self {
        Self {
            providers: HashMap::new(),
            policy,
            routing,
            catalog,
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
        }
    }

    /// Build a router over the configured providers, discovering the model catalog
    pub async fn from_config(config: &Config, providers: &Providers) -> Self {
        let catalog = match providers.gemini() {
            Some(gemini) => ModelCatalog::discover(gemini.as_ref()).await,
            None => ModelCatalog::fallback(),
        };

        let mut router = Self::new(config.cascade.clone(), config.routing.clone(), catalog);
        for provider in providers.chat_providers() {
            router = router.with_provider(provider);
        }
        router
    }

    /// Register a configured provider
    pub fn with_provider(mut self, provider: Arc<dyn ChatProvider>) -> Self {
        self.providers.insert(provider.id(), provider);
        self
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = instruction.into();
        self
    }

    pub fn set_system_instruction(&mut self, instruction: impl Into<String>) {
        self.system_instruction = instruction.into();
    }

    /// Configured providers in canonical order
    pub fn enabled(&self) -> Vec<ProviderId> {
        ProviderId::ALL
            .into_iter()
            .filter(|id| self.providers.contains_key(id))
            .collect()
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    pub fn routing(&self) -> &RoutingConfig {
        &self.routing
    }

    /// Decide the tier and the ordered candidate list without calling anything
    pub fn plan(
        &self,
        prompt: &str,
        mode: RoutingMode,
        context: &str,
    ) -> (Tier, Option<Classification>, Vec<ProviderCandidate>) {
        let enabled = self.enabled();
        let (tier, classification) = match mode {
            RoutingMode::Auto => {
                let reasoning_available = enabled.contains(&ProviderId::DeepSeek);
                let c = classify(prompt, context, &self.routing, reasoning_available);
                (c.tier, Some(c))
            }
            RoutingMode::Fast => (Tier::Simple, None),
            RoutingMode::Expert => (Tier::Complex, None),
            RoutingMode::Reasoning => (Tier::Reasoning, None),
        };

        let candidates = self.policy.candidates(tier, &enabled, &self.catalog);
        (tier, classification, candidates)
    }

    /// Route a prompt and return the first successful answer.
    ///
    /// Never fails: when every candidate errors, the answer is a synthetic
    /// message embedding the last error and the label is [`ALL_FAILED_LABEL`].
    pub async fn route_and_answer(
        &self,
        prompt: &str,
        mode: RoutingMode,
        context: &str,
        history: &[ChatTurn],
    ) -> RoutedAnswer {
        let (tier, classification, candidates) = self.plan(prompt, mode, context);

        tracing::debug!(
            "Routing {:?} prompt as {} tier over {} candidates",
            mode,
            tier,
            candidates.len()
        );

        let request = CompletionRequest {
            system: self.system_instruction.clone(),
            prompt: prompt.to_string(),
            context: context.to_string(),
            history: history.to_vec(),
        };

        let mut attempts = Vec::with_capacity(candidates.len());
        let mut last_error = String::from("no provider configured");

        for candidate in candidates {
            let Some(provider) = self.providers.get(&candidate.provider) else {
                continue;
            };

            tracing::debug!("Trying {} ({})", candidate.label, candidate.model);

            match provider.complete(&candidate.model, &request).await {
                Ok(text) if !text.trim().is_empty() => {
                    let label = candidate.label.clone();
                    attempts.push(Attempt {
                        candidate,
                        outcome: CandidateOutcome::Success,
                    });
                    return RoutedAnswer {
                        answer: text,
                        label,
                        tier,
                        classification,
                        attempts,
                    };
                }
                Ok(_) => {
                    last_error = format!("{}: empty response", candidate.label);
                    tracing::warn!("{}", last_error);
                    attempts.push(Attempt {
                        candidate,
                        outcome: CandidateOutcome::Failed {
                            reason: "empty response".to_string(),
                        },
                    });
                }
                Err(e) => {
                    last_error = format!("{}: {}", candidate.label, e);
                    tracing::warn!("Candidate failed, advancing cascade: {}", last_error);
                    attempts.push(Attempt {
                        candidate,
                        outcome: CandidateOutcome::Failed {
                            reason: e.to_string(),
                        },
                    });
                }
            }
        }

        RoutedAnswer {
            answer: format!("All providers failed. Last error: {}", last_error),
            label: ALL_FAILED_LABEL.to_string(),
            tier,
            classification,
            attempts,
        }
    }
}
