//! Word (WordprocessingML) export

use crate::config::ExportConfig;
use crate::error::Result;
use crate::formula::{substitute_symbols, ExportBlock};
use quick_xml::escape::escape;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const EMU_PER_INCH: f32 = 914_400.0;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Default Extension="png" ContentType="image/png"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_OPEN: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture"><w:body>"#;

const DOCUMENT_CLOSE: &str = r#"<w:sectPr><w:pgSz w:w="11906" w:h="16838"/><w:pgMar w:top="1134" w:right="1134" w:bottom="1134" w:left="1134" w:header="708" w:footer="708" w:gutter="0"/></w:sectPr></w:body></w:document>"#;

/// Characters XML 1.0 does not allow
fn sanitize(text: &str) -> String {
    text.chars()
        .filter(|c| matches!(c, '\t' | '\n' | '\r') || *c >= ' ')
        .collect()
}

fn text_paragraph(xml: &mut String, text: &str, heading: bool) {
    let run_props = if heading {
        "<w:rPr><w:b/><w:sz w:val=\"32\"/></w:rPr>"
    } else {
        ""
    };
    xml.push_str("<w:p><w:r>");
    xml.push_str(run_props);
    xml.push_str("<w:t xml:space=\"preserve\">");
    xml.push_str(&escape(sanitize(text).as_str()));
    xml.push_str("</w:t></w:r></w:p>");
}

fn image_paragraph(xml: &mut String, index: usize, cx: u64, cy: u64, description: &str) {
    let description = escape(sanitize(description).as_str()).into_owned();
    xml.push_str(&format!(
        concat!(
            "<w:p><w:r><w:drawing><wp:inline distT=\"0\" distB=\"0\" distL=\"0\" distR=\"0\">",
            "<wp:extent cx=\"{cx}\" cy=\"{cy}\"/>",
            "<wp:docPr id=\"{id}\" name=\"Formula {id}\" descr=\"{descr}\"/>",
            "<a:graphic><a:graphicData uri=\"http://schemas.openxmlformats.org/drawingml/2006/picture\">",
            "<pic:pic><pic:nvPicPr><pic:cNvPr id=\"{id}\" name=\"formula{id}.png\"/><pic:cNvPicPr/></pic:nvPicPr>",
            "<pic:blipFill><a:blip r:embed=\"rIdImg{id}\"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill>",
            "<pic:spPr><a:xfrm><a:off x=\"0\" y=\"0\"/><a:ext cx=\"{cx}\" cy=\"{cy}\"/></a:xfrm>",
            "<a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom></pic:spPr></pic:pic>",
            "</a:graphicData></a:graphic></wp:inline></w:drawing></w:r></w:p>"
        ),
        cx = cx,
        cy = cy,
        id = index,
        descr = description
    ));
}

/// Build a .docx package from export blocks.
///
/// Text lines become paragraphs after symbol substitution; each formula
/// image gets its own paragraph at the configured width.
pub fn export_docx(title: &str, blocks: Vec<ExportBlock>, config: &ExportConfig) -> Result<Vec<u8>> {
    let mut document = String::from(DOCUMENT_OPEN);
    let mut relationships = Vec::new();
    let mut media: Vec<(String, Vec<u8>)> = Vec::new();

    let title = substitute_symbols(title.trim());
    if !title.is_empty() {
        text_paragraph(&mut document, &title, true);
    }

    for block in blocks {
        match block {
            ExportBlock::Text(text) => {
                let substituted = substitute_symbols(&text);
                for line in substituted.lines().map(str::trim_end) {
                    if !line.trim().is_empty() {
                        text_paragraph(&mut document, line, false);
                    }
                }
            }
            ExportBlock::Image(image) => {
                let index = media.len() + 1;
                let cx = (config.image_width_inches * EMU_PER_INCH).round() as u64;
                let cy = cx * image.height_px as u64 / image.width_px.max(1) as u64;
                image_paragraph(&mut document, index, cx, cy.max(1), &image.source);
                relationships.push(format!(
                    "<Relationship Id=\"rIdImg{0}\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/image\" Target=\"media/formula{0}.png\"/>",
                    index
                ));
                media.push((format!("word/media/formula{}.png", index), image.png));
            }
        }
    }

    document.push_str(DOCUMENT_CLOSE);

    let document_rels = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">{}</Relationships>",
        relationships.concat()
    );

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    zip.start_file("[Content_Types].xml", deflated)?;
    zip.write_all(CONTENT_TYPES.as_bytes())?;
    zip.start_file("_rels/.rels", deflated)?;
    zip.write_all(PACKAGE_RELS.as_bytes())?;
    zip.start_file("word/document.xml", deflated)?;
    zip.write_all(document.as_bytes())?;
    zip.start_file("word/_rels/document.xml.rels", deflated)?;
    zip.write_all(document_rels.as_bytes())?;
    for (name, png) in media {
        zip.start_file(name, stored)?;
        zip.write_all(&png)?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}
