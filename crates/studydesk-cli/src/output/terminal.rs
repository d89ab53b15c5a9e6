//! Terminal output formatter

use anyhow::Result;
use std::io::{IsTerminal, Write};
use studydesk_core::{CandidateOutcome, ExtractionReport, RoutedAnswer};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

fn stdout() -> StandardStream {
    let choice = if std::io::stdout().is_terminal() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    StandardStream::stdout(choice)
}

pub fn print_answer(answer: &RoutedAnswer, verbose: bool) -> Result<()> {
    let mut out = stdout();

    let color = if answer.is_failure() {
        Color::Red
    } else {
        Color::Cyan
    };
    out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(out, "[{}]", answer.label)?;
    out.reset()?;
    writeln!(out, " {} tier", answer.tier)?;

    if verbose {
        for attempt in &answer.attempts {
            match &attempt.outcome {
                CandidateOutcome::Success => {
                    writeln!(out, "  ok    {} ({})", attempt.candidate.label, attempt.candidate.model)?
                }
                CandidateOutcome::Failed { reason } => writeln!(
                    out,
                    "  fail  {} ({}): {}",
                    attempt.candidate.label, attempt.candidate.model, reason
                )?,
            }
        }
    }

    writeln!(out)?;
    writeln!(out, "{}", answer.answer.trim_end())?;
    Ok(())
}

pub fn format_report(report: &ExtractionReport) -> String {
    let mut output = String::new();

    for document in &report.documents {
        output.push_str(&format!(
            "=== {} ({}, {} chars) ===\n",
            document.name(),
            document.kind.as_str(),
            document.text.chars().count()
        ));
        output.push_str(document.text.trim_end());
        output.push_str("\n\n");
    }

    output
}
