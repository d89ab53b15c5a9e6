//! Keyword and length heuristics for Auto mode

use super::Tier;
use crate::config::RoutingConfig;
use serde::Serialize;

/// Outcome of classifying one prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub tier: Tier,
    /// Complexity flag, independent of the reasoning trigger
    pub is_complex: bool,
    pub has_context: bool,
    pub keyword_hit: Option<String>,
    pub reasoning_hit: Option<String>,
    pub word_count: usize,
}

/// Classify a prompt for Auto routing.
///
/// The reasoning trigger only applies when the reasoning provider is
/// available; otherwise the prompt falls back to the complexity flag.
pub fn classify(
    prompt: &str,
    context: &str,
    routing: &RoutingConfig,
    reasoning_available: bool,
) -> Classification {
    let lowered = prompt.to_lowercase();
    let has_context = context.chars().count() > routing.context_threshold;
    let word_count = prompt.split_whitespace().count();

    let keyword_hit = find_keyword(&lowered, &routing.complex_keywords);
    let reasoning_hit = find_keyword(&lowered, &routing.reasoning_keywords);

    let is_complex = (has_context && routing.context_forces_complex)
        || keyword_hit.is_some()
        || word_count > routing.word_threshold;

    let tier = if reasoning_available && reasoning_hit.is_some() {
        Tier::Reasoning
    } else if is_complex {
        Tier::Complex
    } else {
        Tier::Simple
    };

    Classification {
        tier,
        is_complex,
        has_context,
        keyword_hit,
        reasoning_hit,
        word_count,
    }
}

fn find_keyword(lowered: &str, keywords: &[String]) -> Option<String> {
    keywords
        .iter()
        .find(|k| !k.is_empty() && lowered.contains(&k.to_lowercase()))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn routing() -> RoutingConfig {
        RoutingConfig::default()
    }

    #[test]
    fn test_short_plain_prompt_is_simple() {
        let c = classify("Bonjour, comment vas-tu ?", "", &routing(), true);
        assert_eq!(c.tier, Tier::Simple);
        assert!(!c.is_complex);
        assert_eq!(c.word_count, 4);
    }

    #[test]
    fn test_keyword_is_case_insensitive() {
        let c = classify("Donne-moi la FORMULE du VAN", "", &routing(), false);
        assert_eq!(c.tier, Tier::Complex);
        assert_eq!(c.keyword_hit.as_deref(), Some("formule"));
    }

    #[test]
    fn test_long_prompt_is_complex() {
        let prompt = "un deux trois quatre cinq six sept huit neuf dix onze douze treize quatorze quinze seize";
        let c = classify(prompt, "", &routing(), false);
        assert_eq!(c.word_count, 16);
        assert_eq!(c.tier, Tier::Complex);
    }

    #[test]
    fn test_fifteen_words_stay_simple() {
        let prompt = "un deux trois quatre cinq six sept huit neuf dix onze douze treize quatorze quinze";
        let c = classify(prompt, "", &routing(), false);
        assert_eq!(c.tier, Tier::Simple);
    }

    #[test]
    fn test_context_threshold_is_exclusive() {
        let c = classify("salut", "0123456789", &routing(), false);
        assert!(!c.has_context);
        let c = classify("salut", "0123456789a", &routing(), false);
        assert!(c.has_context);
        assert!(c.is_complex);
    }

    #[test]
    fn test_reasoning_needs_provider() {
        let c = classify("Peux-tu démontrer ce théorème", "", &routing(), true);
        assert_eq!(c.tier, Tier::Reasoning);

        let c = classify("Peux-tu démontrer ce théorème", "", &routing(), false);
        assert_eq!(c.reasoning_hit.as_deref(), Some("démontrer"));
        assert_eq!(c.tier, Tier::Simple);
    }

    #[test]
    fn test_context_policy_can_be_relaxed() {
        let mut routing = routing();
        routing.context_forces_complex = false;
        let c = classify("merci", "a long loaded course document", &routing, false);
        assert!(c.has_context);
        assert_eq!(c.tier, Tier::Simple);
    }

    proptest! {
        #[test]
        fn prop_context_forces_complex(prompt in "[a-z ]{0,80}", context in ".{11,60}") {
            let c = classify(&prompt, &context, &RoutingConfig::default(), false);
            prop_assert!(c.is_complex);
        }
    }
}
