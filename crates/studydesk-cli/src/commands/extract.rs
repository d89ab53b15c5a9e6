//! Extract command

use crate::app::{ExtractArgs, OutputFormat};
use crate::output;
use anyhow::Result;
use studydesk_core::{extract_documents, Config, Providers};

pub async fn run(args: ExtractArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let providers = Providers::from_config(&config.providers)?;
    let transcriber = providers.transcriber();

    let report = extract_documents(&args.files, transcriber.as_deref()).await;
    output::print_warnings(&report.warnings);
    output::print_report(&report, format)
}
