//! Study command: synthesis, flashcards and quizzes

use super::{build_tutor, export_answer, load_documents};
use crate::app::{OutputFormat, StudyArgs};
use crate::output;
use anyhow::Result;
use studydesk_core::Config;

pub async fn run(
    args: StudyArgs,
    config: &Config,
    format: OutputFormat,
    verbose: bool,
) -> Result<()> {
    let (mut tutor, providers) = build_tutor(config).await?;
    load_documents(&mut tutor, &providers, &args.docs).await;

    let task = args.task.task(args.level);
    let answer = tutor.run_task(task).await?;
    output::print_answer(&answer, format, verbose)?;

    if !answer.is_failure() {
        export_answer(&args.export, &task.title(), &answer.answer, config)?;
    }
    Ok(())
}
