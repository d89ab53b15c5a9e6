//! Uploaded document text extraction
//!
//! Each supported format is converted to plain text. Failures are reported
//! per file so that one broken upload never aborts the batch.

mod office;
mod pdf;
mod spreadsheet;

pub use office::{extract_docx, extract_pptx};
pub use pdf::{extract_pages, extract_pdf, join_pages};
pub use spreadsheet::extract_spreadsheet;

use crate::error::{Result, StudyDeskError};
use crate::llm::ImageTranscriber;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Supported upload formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Pdf,
    Spreadsheet,
    Presentation,
    WordDocument,
    Image,
    PlainText,
}

impl DocumentKind {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "pdf" => Ok(Self::Pdf),
            "xlsx" | "xls" | "xlsm" | "ods" => Ok(Self::Spreadsheet),
            "pptx" => Ok(Self::Presentation),
            "docx" => Ok(Self::WordDocument),
            "png" | "jpg" | "jpeg" => Ok(Self::Image),
            "txt" | "md" => Ok(Self::PlainText),
            _ => Err(StudyDeskError::UnsupportedFormat(format!(
                "{} (supported: pdf, xlsx, xls, pptx, docx, png, jpg, txt, md)",
                path.display()
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Spreadsheet => "spreadsheet",
            Self::Presentation => "presentation",
            Self::WordDocument => "word",
            Self::Image => "image",
            Self::PlainText => "text",
        }
    }
}

fn image_mime_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("png") => "image/png",
        _ => "image/jpeg",
    }
}

/// Text extracted from one file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedDocument {
    pub path: PathBuf,
    pub kind: DocumentKind,
    pub text: String,
}

impl ExtractedDocument {
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Outcome of a batch extraction
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionReport {
    /// Combined text of every extracted document
    pub text: String,
    pub documents: Vec<ExtractedDocument>,
    /// One message per file that could not be read
    pub warnings: Vec<String>,
}

impl ExtractionReport {
    pub fn sources(&self) -> Vec<String> {
        self.documents.iter().map(ExtractedDocument::name).collect()
    }
}

/// Extract the text of a single file
pub async fn extract_document(
    path: &Path,
    transcriber: Option<&dyn ImageTranscriber>,
) -> Result<ExtractedDocument> {
    let kind = DocumentKind::from_path(path)?;
    let bytes = fs::read(path).map_err(|e| {
        StudyDeskError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to read {}: {}", path.display(), e),
        ))
    })?;

    let text = match kind {
        DocumentKind::Pdf => extract_pdf(&bytes)?,
        DocumentKind::Spreadsheet => extract_spreadsheet(&bytes)?,
        DocumentKind::Presentation => extract_pptx(&bytes)?,
        DocumentKind::WordDocument => extract_docx(&bytes)?,
        DocumentKind::PlainText => String::from_utf8_lossy(&bytes).into_owned(),
        DocumentKind::Image => {
            let transcriber = transcriber.ok_or_else(|| {
                StudyDeskError::Provider(
                    "image transcription needs a vision provider (set GEMINI_API_KEY)".to_string(),
                )
            })?;
            transcriber
                .transcribe(&bytes, image_mime_type(path))
                .await?
        }
    };

    if text.trim().is_empty() {
        return Err(StudyDeskError::Parse(format!(
            "{} contains no extractable text",
            path.display()
        )));
    }

    Ok(ExtractedDocument {
        path: path.to_path_buf(),
        kind,
        text,
    })
}

/// Extract a batch of files; failures become warnings
pub async fn extract_documents(
    paths: &[PathBuf],
    transcriber: Option<&dyn ImageTranscriber>,
) -> ExtractionReport {
    let mut report = ExtractionReport::default();

    for path in paths {
        match extract_document(path, transcriber).await {
            Ok(document) => {
                tracing::debug!(
                    "Extracted {} chars from {} ({})",
                    document.text.len(),
                    path.display(),
                    document.kind.as_str()
                );
                report.documents.push(document);
            }
            Err(e) => {
                tracing::warn!("Could not read {}: {}", path.display(), e);
                report
                    .warnings
                    .push(format!("{}: {}", path.display(), e));
            }
        }
    }

    report.text = report
        .documents
        .iter()
        .map(|doc| format!("--- {} ---\n{}", doc.name(), doc.text.trim_end()))
        .collect::<Vec<_>>()
        .join("\n\n");

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct EchoTranscriber;

    #[async_trait]
    impl ImageTranscriber for EchoTranscriber {
        async fn transcribe(&self, image: &[u8], mime_type: &str) -> Result<String> {
            Ok(format!("{} bytes of {}", image.len(), mime_type))
        }
    }

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(
            DocumentKind::from_path(Path::new("cours.PDF")).unwrap(),
            DocumentKind::Pdf
        );
        assert_eq!(
            DocumentKind::from_path(Path::new("bilan.xls")).unwrap(),
            DocumentKind::Spreadsheet
        );
        assert_eq!(
            DocumentKind::from_path(Path::new("scan.jpeg")).unwrap(),
            DocumentKind::Image
        );
        assert!(matches!(
            DocumentKind::from_path(Path::new("archive.tar.gz")),
            Err(StudyDeskError::UnsupportedFormat(_))
        ));
    }

    #[tokio::test]
    async fn test_batch_continues_after_failure() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("notes.txt");
        let bad = dir.path().join("broken.pdf");
        let unknown = dir.path().join("data.bin");
        fs::write(&good, "Le ratio de liquidité").unwrap();
        fs::write(&bad, "not a pdf").unwrap();
        fs::write(&unknown, "??").unwrap();

        let report = extract_documents(&[bad, good, unknown], None).await;
        assert_eq!(report.documents.len(), 1);
        assert_eq!(report.warnings.len(), 2);
        assert_eq!(report.text, "--- notes.txt ---\nLe ratio de liquidité");
        assert_eq!(report.sources(), vec!["notes.txt".to_string()]);
    }

    #[tokio::test]
    async fn test_image_uses_transcriber() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("board.png");
        fs::write(&image, [1u8, 2, 3]).unwrap();

        let document = extract_document(&image, Some(&EchoTranscriber)).await.unwrap();
        assert_eq!(document.text, "3 bytes of image/png");

        let err = extract_document(&image, None).await.unwrap_err();
        assert!(matches!(err, StudyDeskError::Provider(_)));
    }

    #[tokio::test]
    async fn test_blank_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let blank = dir.path().join("blank.md");
        fs::write(&blank, "  \n").unwrap();
        let report = extract_documents(&[blank], None).await;
        assert!(report.documents.is_empty());
        assert_eq!(report.warnings.len(), 1);
    }
}
