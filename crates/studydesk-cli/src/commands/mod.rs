//! Command implementations

pub mod ask;
pub mod chat;
pub mod config;
pub mod export;
pub mod extract;
pub mod models;
pub mod status;
pub mod study;

use crate::app::ExportTarget;
use crate::output;
use anyhow::Result;
use std::path::{Path, PathBuf};
use studydesk_core::{
    export_to_path, Config, DisabledRenderer, FormulaRenderer, LatexRenderer, Providers, Tutor,
};

/// Build the provider clients and a tutor routed over them
pub(crate) async fn build_tutor(config: &Config) -> Result<(Tutor, Providers)> {
    let providers = Providers::from_config(&config.providers)?;
    if providers.is_empty() {
        tracing::warn!(
            "No provider credential configured; set GEMINI_API_KEY, GROQ_API_KEY or DEEPSEEK_API_KEY"
        );
    }
    let tutor = Tutor::from_config(config, &providers).await;
    Ok((tutor, providers))
}

/// Load course documents into the tutor, printing per-file warnings
pub(crate) async fn load_documents(tutor: &mut Tutor, providers: &Providers, docs: &[PathBuf]) {
    if docs.is_empty() {
        return;
    }
    let transcriber = providers.transcriber();
    let report = tutor.load_documents(docs, transcriber.as_deref()).await;
    output::print_warnings(&report.warnings);
    if !report.documents.is_empty() {
        eprintln!(
            "Loaded {} document(s): {}",
            report.documents.len(),
            report.sources().join(", ")
        );
    }
}

pub(crate) fn renderer(config: &Config, no_render: bool) -> Box<dyn FormulaRenderer> {
    if no_render {
        Box::new(DisabledRenderer)
    } else {
        Box::new(LatexRenderer::from_config(&config.export))
    }
}

/// Write `text` to `path` as .docx or .pdf
pub(crate) fn write_export(
    path: &Path,
    title: &str,
    text: &str,
    no_render: bool,
    config: &Config,
) -> Result<()> {
    let renderer = renderer(config, no_render);
    let format = export_to_path(path, title, text, renderer.as_ref(), &config.export)?;
    eprintln!("Exported {} to {}", format.extension(), path.display());
    Ok(())
}

/// Export an answer when `--export` was given
pub(crate) fn export_answer(
    target: &ExportTarget,
    default_title: &str,
    text: &str,
    config: &Config,
) -> Result<()> {
    if let Some(path) = &target.path {
        let title = target.title.as_deref().unwrap_or(default_title);
        write_export(path, title, text, target.no_render, config)?;
    }
    Ok(())
}
