//! Models command

use crate::app::OutputFormat;
use anyhow::Result;
use studydesk_core::router::CatalogSlot;
use studydesk_core::{Config, ModelCatalog, Providers, StudyDeskError};

pub async fn run(config: &Config, format: OutputFormat) -> Result<()> {
    let providers = Providers::from_config(&config.providers)?;
    let Some(gemini) = providers.gemini() else {
        return Err(StudyDeskError::Config(
            "Gemini is not configured (set GEMINI_API_KEY)".to_string(),
        )
        .into());
    };

    let catalog = ModelCatalog::discover(&**gemini).await;
    let pro = catalog.resolve(CatalogSlot::Pro);
    let flash = catalog.resolve(CatalogSlot::Flash);

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "discovered": catalog.is_discovered(),
                "models": catalog.models(),
                "pro": pro,
                "flash": flash,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Cli => {
            if !catalog.is_discovered() {
                println!("Model listing unavailable, using built-in defaults");
            }
            for model in catalog.models() {
                println!("  {}", model);
            }
            println!();
            println!("Pro slot:   {}", pro);
            println!("Flash slot: {}", flash);
        }
    }
    Ok(())
}
