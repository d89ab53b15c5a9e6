//! Output formatters

pub mod json;
pub mod terminal;

use crate::app::OutputFormat;
use anyhow::Result;
use studydesk_core::{ExtractionReport, RoutedAnswer};

/// Print a routed answer
pub fn print_answer(answer: &RoutedAnswer, format: OutputFormat, verbose: bool) -> Result<()> {
    match format {
        OutputFormat::Json => print!("{}", json::format_answer(answer)?),
        OutputFormat::Cli => terminal::print_answer(answer, verbose)?,
    }
    Ok(())
}

/// Print extracted text
pub fn print_report(report: &ExtractionReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print!("{}", json::format_report(report)?),
        OutputFormat::Cli => print!("{}", terminal::format_report(report)),
    }
    Ok(())
}

/// Per-file extraction problems go to stderr
pub fn print_warnings(warnings: &[String]) {
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }
}
