//! Formula export through both writers and back through the extractors

use studydesk_core::documents::{extract_docx, extract_pdf};
use studydesk_core::formula::{split_segments, Segment};
use studydesk_core::{
    export, render_for_export, DisabledRenderer, ExportBlock, ExportConfig, ExportFormat,
    FormulaRenderer, Result, StudyDeskError,
};

const ANSWER: &str = "La variance vaut $$\\sigma^2 = \\frac{1}{n}\\sum x_i^2$$ ici.\n\nFin.";

/// Fails on anything containing "frac", succeeds with a 1x1 gray PNG otherwise
struct PickyRenderer;

impl FormulaRenderer for PickyRenderer {
    fn render(&self, latex: &str) -> Result<Vec<u8>> {
        if latex.contains("frac") {
            return Err(StudyDeskError::Render("unsupported".into()));
        }
        Ok(one_pixel_png())
    }
}

fn one_pixel_png() -> Vec<u8> {
    // 1x1 8-bit grayscale, IDAT = zlib(stored) of [filter 0, 0xFF]
    vec![
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, // signature
        0x00, 0x00, 0x00, 0x0D, b'I', b'H', b'D', b'R', 0x00, 0x00, 0x00, 0x01, 0x00, 0x00,
        0x00, 0x01, 0x08, 0x00, 0x00, 0x00, 0x00, 0x3A, 0x7E, 0x9B, 0x55, // IHDR
        0x00, 0x00, 0x00, 0x0D, b'I', b'D', b'A', b'T', 0x78, 0x01, 0x01, 0x02, 0x00, 0xFD,
        0xFF, 0x00, 0xFF, 0x01, 0x01, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, // IDAT (crc unchecked)
        0x00, 0x00, 0x00, 0x00, b'I', b'E', b'N', b'D', 0xAE, 0x42, 0x60, 0x82, // IEND
    ]
}

#[test]
fn test_segments_rejoin_to_input() {
    let segments = split_segments(ANSWER);
    assert_eq!(segments.iter().filter(|s| s.is_formula()).count(), 1);
    let rejoined: String = segments.iter().map(Segment::source).collect();
    assert_eq!(rejoined, ANSWER);
}

#[test]
fn test_stray_delimiter_stays_text() {
    let segments = split_segments("coût $$ 5 euros");
    assert_eq!(segments, vec![Segment::Text("coût $$ 5 euros".into())]);
}

#[test]
fn test_mixed_render_outcomes() {
    let blocks = render_for_export("a $$x$$ b $$\\frac{1}{2}$$ c", &PickyRenderer);
    assert_eq!(blocks.len(), 3);
    assert!(matches!(blocks[1], ExportBlock::Image(_)));
    assert_eq!(
        blocks[2],
        ExportBlock::Text(" b $$\\frac{1}{2}$$ c".into())
    );
}

#[test]
fn test_docx_export_is_readable() {
    let bytes = export(
        ExportFormat::Docx,
        "Variance",
        ANSWER,
        &DisabledRenderer,
        &ExportConfig::default(),
    )
    .unwrap();
    let text = extract_docx(&bytes).unwrap();
    assert!(text.starts_with("Variance\n"));
    assert!(text.contains("σ²"));
    assert!(text.contains("$$"));
}

#[test]
fn test_pdf_export_is_readable() {
    let bytes = export(
        ExportFormat::Pdf,
        "Variance",
        "La moyenne et la variance.",
        &PickyRenderer,
        &ExportConfig::default(),
    )
    .unwrap();
    let text = extract_pdf(&bytes).unwrap();
    assert!(text.contains("Variance"));
    assert!(text.contains("moyenne"));
}

#[test]
fn test_pdf_with_embedded_formula() {
    let bytes = export(
        ExportFormat::Pdf,
        "",
        "avant $$x$$ après",
        &PickyRenderer,
        &ExportConfig::default(),
    )
    .unwrap();
    assert!(bytes.starts_with(b"%PDF"));
    let text = extract_pdf(&bytes).unwrap();
    assert!(text.contains("avant"));
}
