//! Ask command

use super::{build_tutor, export_answer, load_documents};
use crate::app::{AskArgs, OutputFormat};
use crate::output;
use anyhow::Result;
use studydesk_core::{Config, StudyDeskError};

pub async fn run(args: AskArgs, config: &Config, format: OutputFormat, verbose: bool) -> Result<()> {
    let prompt = args.prompt.join(" ");
    if prompt.trim().is_empty() {
        return Err(StudyDeskError::InvalidInput("Question is empty".to_string()).into());
    }

    let (mut tutor, providers) = build_tutor(config).await?;
    load_documents(&mut tutor, &providers, &args.docs).await;

    let answer = tutor.ask(&prompt, args.mode).await;
    output::print_answer(&answer, format, verbose)?;

    if !answer.is_failure() {
        export_answer(&args.export, "Réponse", &answer.answer, config)?;
    }
    Ok(())
}
