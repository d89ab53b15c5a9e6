//! PDF text extraction

use crate::error::{Result, StudyDeskError};
use lopdf::Document;

/// Extract text page by page.
///
/// Falls back to whole-document extraction when the file cannot be
/// parsed into pages.
pub fn extract_pdf(bytes: &[u8]) -> Result<String> {
    match Document::load_mem(bytes) {
        Ok(doc) => Ok(join_pages(extract_pages(&doc))),
        Err(e) => {
            tracing::debug!("Page-level PDF parsing failed ({}), trying whole document", e);
            pdf_extract::extract_text_from_mem(bytes)
                .map_err(|e| StudyDeskError::Parse(format!("Failed to extract text from PDF: {}", e)))
        }
    }
}

/// Text of every page in page order, unreadable pages as empty strings
pub fn extract_pages(doc: &Document) -> Vec<String> {
    doc.get_pages()
        .keys()
        .map(|&number| {
            doc.extract_text(&[number]).unwrap_or_else(|e| {
                tracing::warn!("Skipping unreadable PDF page {}: {}", number, e);
                String::new()
            })
        })
        .collect()
}

pub fn join_pages(pages: Vec<String>) -> String {
    pages.concat()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExportConfig;
    use crate::export::export_pdf;
    use crate::formula::ExportBlock;
    use proptest::prelude::*;

    fn sample_pdf(text: &str) -> Vec<u8> {
        export_pdf(
            "",
            vec![ExportBlock::Text(text.to_string())],
            &ExportConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_extracts_generated_pdf() {
        let text = extract_pdf(&sample_pdf("Bonjour le bilan")).unwrap();
        assert!(text.contains("Bonjour"));
    }

    #[test]
    fn test_pages_in_order() {
        let body = (0..120)
            .map(|i| format!("ligne{}", i))
            .collect::<Vec<_>>()
            .join("\n");
        let bytes = sample_pdf(&body);
        let doc = Document::load_mem(&bytes).unwrap();
        let pages = extract_pages(&doc);
        assert!(pages.len() >= 2);

        let first = pages[0].find("ligne0").unwrap_or(usize::MAX);
        assert!(first != usize::MAX);
        assert!(pages[pages.len() - 1].contains("ligne119"));
        assert_eq!(extract_pdf(&bytes).unwrap(), pages.concat());
    }

    #[test]
    fn test_garbage_is_parse_error() {
        assert!(extract_pdf(b"definitely not a pdf").is_err());
    }

    proptest! {
        #[test]
        fn prop_join_keeps_page_order(pages in proptest::collection::vec("[a-z ]{0,8}", 0..6)) {
            let joined = join_pages(pages.clone());
            let mut offset = 0;
            for page in &pages {
                prop_assert_eq!(&joined[offset..offset + page.len()], page.as_str());
                offset += page.len();
            }
            prop_assert_eq!(offset, joined.len());
        }
    }
}
