//! Word and PowerPoint text runs

use crate::error::{Result, StudyDeskError};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use zip::ZipArchive;

/// Which runs carry text and which element closes a paragraph
struct Markup {
    text: &'static [u8],
    paragraph: &'static [u8],
    tab: &'static [u8],
    line_break: &'static [u8],
}

const WORD: Markup = Markup {
    text: b"w:t",
    paragraph: b"w:p",
    tab: b"w:tab",
    line_break: b"w:br",
};

const DRAWING: Markup = Markup {
    text: b"a:t",
    paragraph: b"a:p",
    tab: b"a:tab",
    line_break: b"a:br",
};

fn runs_text(xml: &str, markup: &Markup) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == markup.text => in_text = true,
            Event::End(e) => {
                let name = e.name();
                if name.as_ref() == markup.text {
                    in_text = false;
                } else if name.as_ref() == markup.paragraph {
                    out.push('\n');
                }
            }
            Event::Empty(e) => {
                let name = e.name();
                if name.as_ref() == markup.tab {
                    out.push('\t');
                } else if name.as_ref() == markup.line_break || name.as_ref() == markup.paragraph {
                    out.push('\n');
                }
            }
            Event::Text(t) if in_text => out.push_str(&t.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(out)
}

fn read_entry<R: std::io::Read + std::io::Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<String> {
    let mut file = archive.by_name(name)?;
    let mut xml = String::new();
    file.read_to_string(&mut xml)?;
    Ok(xml)
}

/// Paragraph text of a .docx body
pub fn extract_docx(bytes: &[u8]) -> Result<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let xml = read_entry(&mut archive, "word/document.xml")?;
    runs_text(&xml, &WORD)
}

fn slide_number(name: &str) -> Option<u32> {
    name.strip_prefix("ppt/slides/slide")?
        .strip_suffix(".xml")?
        .parse()
        .ok()
}

/// Slide text of a .pptx, slides in numeric order
pub fn extract_pptx(bytes: &[u8]) -> Result<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let mut slides: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| slide_number(name).map(|n| (n, name.to_string())))
        .collect();
    if slides.is_empty() {
        return Err(StudyDeskError::Parse(
            "presentation contains no slides".to_string(),
        ));
    }
    slides.sort_by_key(|(n, _)| *n);

    let mut blocks = Vec::with_capacity(slides.len());
    for (number, name) in slides {
        let xml = read_entry(&mut archive, &name)?;
        let text = runs_text(&xml, &DRAWING)?;
        blocks.push(format!("[Slide {}]\n{}", number, text.trim_end()));
    }
    Ok(blocks.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExportConfig;
    use crate::export::export_docx;
    use crate::formula::ExportBlock;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn slide(text: &str) -> String {
        format!(
            "<p:sld xmlns:p=\"p\" xmlns:a=\"a\"><p:cSld><p:spTree><p:sp><p:txBody><a:p><a:r><a:t>{}</a:t></a:r></a:p></p:txBody></p:sp></p:spTree></p:cSld></p:sld>",
            text
        )
    }

    fn pptx(slides: &[(&str, String)]) -> Vec<u8> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, xml) in slides {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(xml.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_docx_round_trip_through_exporter() {
        let bytes = export_docx(
            "Titre",
            vec![ExportBlock::Text("Ligne un\nLigne & deux".into())],
            &ExportConfig::default(),
        )
        .unwrap();
        let text = extract_docx(&bytes).unwrap();
        assert_eq!(text, "Titre\nLigne un\nLigne & deux\n");
    }

    #[test]
    fn test_pptx_numeric_slide_order() {
        let bytes = pptx(&[
            ("ppt/slides/slide10.xml", slide("dix")),
            ("ppt/slides/slide2.xml", slide("deux")),
            ("ppt/slides/_rels/slide2.xml.rels", "<Relationships/>".to_string()),
        ]);
        let text = extract_pptx(&bytes).unwrap();
        assert_eq!(text, "[Slide 2]\ndeux\n\n[Slide 10]\ndix");
    }

    #[test]
    fn test_pptx_without_slides() {
        let bytes = pptx(&[("docProps/app.xml", "<x/>".to_string())]);
        assert!(matches!(extract_pptx(&bytes), Err(StudyDeskError::Parse(_))));
    }

    #[test]
    fn test_word_tabs_and_breaks() {
        let xml = "<w:document><w:body><w:p><w:r><w:t>a</w:t><w:tab/><w:t>b</w:t><w:br/><w:t>c</w:t></w:r></w:p></w:body></w:document>";
        assert_eq!(runs_text(xml, &WORD).unwrap(), "a\tb\nc\n");
    }

    #[test]
    fn test_slide_number() {
        assert_eq!(slide_number("ppt/slides/slide3.xml"), Some(3));
        assert_eq!(slide_number("ppt/slides/_rels/slide3.xml.rels"), None);
        assert_eq!(slide_number("ppt/slideLayouts/slideLayout1.xml"), None);
    }
}
