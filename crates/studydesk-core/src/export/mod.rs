//! Document export (Word and PDF)

mod docx;
mod metrics;
mod pdf;
pub mod png;

pub use docx::export_docx;
pub use pdf::export_pdf;

use crate::config::ExportConfig;
use crate::error::{Result, StudyDeskError};
use crate::formula::{render_for_export, FormulaRenderer};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Output document format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Docx,
    Pdf,
}

impl ExportFormat {
    /// Infer the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "docx" => Ok(Self::Docx),
            "pdf" => Ok(Self::Pdf),
            other => Err(StudyDeskError::UnsupportedFormat(format!(
                "cannot export to '.{}' (expected .docx or .pdf)",
                other
            ))),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Docx => "docx",
            Self::Pdf => "pdf",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Docx => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            Self::Pdf => "application/pdf",
        }
    }
}

/// Render formulas in `text` and write the result in `format`
pub fn export(
    format: ExportFormat,
    title: &str,
    text: &str,
    renderer: &dyn FormulaRenderer,
    config: &ExportConfig,
) -> Result<Vec<u8>> {
    let blocks = render_for_export(text, renderer);
    tracing::debug!(
        "Exporting {} block(s) as {}",
        blocks.len(),
        format.extension()
    );
    match format {
        ExportFormat::Docx => export_docx(title, blocks, config),
        ExportFormat::Pdf => export_pdf(title, blocks, config),
    }
}

/// Export to a file, choosing the format from its extension
pub fn export_to_path(
    path: &Path,
    title: &str,
    text: &str,
    renderer: &dyn FormulaRenderer,
    config: &ExportConfig,
) -> Result<ExportFormat> {
    let format = ExportFormat::from_path(path)?;
    let bytes = export(format, title, text, renderer, config)?;
    std::fs::write(path, bytes)?;
    Ok(format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::DisabledRenderer;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ExportFormat::from_path(Path::new("notes.DOCX")).unwrap(),
            ExportFormat::Docx
        );
        assert_eq!(
            ExportFormat::from_path(Path::new("a/b.pdf")).unwrap(),
            ExportFormat::Pdf
        );
        assert!(matches!(
            ExportFormat::from_path(Path::new("notes.txt")),
            Err(StudyDeskError::UnsupportedFormat(_))
        ));
        assert!(ExportFormat::from_path(Path::new("notes")).is_err());
    }

    #[test]
    fn test_mime_types() {
        assert_eq!(ExportFormat::Pdf.mime_type(), "application/pdf");
        assert!(ExportFormat::Docx.mime_type().contains("wordprocessingml"));
        assert_eq!(ExportFormat::Docx.extension(), "docx");
    }

    #[test]
    fn test_export_to_path_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fiche.pdf");
        let format = export_to_path(
            &path,
            "Fiche",
            "Variance $$\\sigma^2$$",
            &DisabledRenderer,
            &ExportConfig::default(),
        )
        .unwrap();
        assert_eq!(format, ExportFormat::Pdf);
        assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF"));
    }
}
