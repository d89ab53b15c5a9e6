//! Status command

use crate::app::OutputFormat;
use anyhow::Result;
use studydesk_core::{Config, ProviderId};

pub async fn run(config: &Config, format: OutputFormat) -> Result<()> {
    let path = Config::path();
    let routing = &config.routing;

    match format {
        OutputFormat::Json => {
            let providers: Vec<serde_json::Value> = ProviderId::ALL
                .iter()
                .map(|id| {
                    let block = config.providers.get(*id);
                    serde_json::json!({
                        "provider": id.as_str(),
                        "enabled": block.is_enabled(),
                        "base_url": block.base_url,
                    })
                })
                .collect();
            let output = serde_json::json!({
                "config_path": path.display().to_string(),
                "config_exists": path.exists(),
                "subject": config.subject,
                "providers": providers,
                "routing": {
                    "context_threshold": routing.context_threshold,
                    "word_threshold": routing.word_threshold,
                    "context_forces_complex": routing.context_forces_complex,
                    "history_turns": routing.history_turns,
                    "retrieval_top_k": routing.retrieval_top_k,
                },
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Cli => {
            println!("StudyDesk Status");
            println!(
                "  Config:   {}{}",
                path.display(),
                if path.exists() { "" } else { " (not created)" }
            );
            println!("  Subject:  {}", config.subject.label());
            println!();
            println!("Providers:");
            for id in ProviderId::ALL {
                let block = config.providers.get(id);
                let state = if block.is_enabled() {
                    "enabled"
                } else {
                    "disabled"
                };
                println!("  {:<10} {:<9} {}", id.as_str(), state, block.base_url);
            }
            println!();
            println!("Routing:");
            println!("  Context threshold: {} chars", routing.context_threshold);
            println!("  Word threshold:    {} words", routing.word_threshold);
            println!("  History turns:     {}", routing.history_turns);
            println!("  Retrieval top-k:   {}", routing.retrieval_top_k);
        }
    }
    Ok(())
}
