//! Export command

use super::write_export;
use crate::app::ExportArgs;
use anyhow::{Context, Result};
use studydesk_core::{Config, ExportFormat};

pub async fn run(args: ExportArgs, config: &Config) -> Result<()> {
    // Reject the output extension before doing any work
    ExportFormat::from_path(&args.output)?;

    let text = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let title = args.title.unwrap_or_else(|| {
        args.input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Export".to_string())
    });

    write_export(&args.output, &title, &text, args.no_render, config)
}
