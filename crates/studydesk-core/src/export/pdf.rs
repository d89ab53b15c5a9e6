//! Simple-layout PDF export using the core Helvetica fonts

use super::metrics::Font;
use super::png::PngInfo;
use crate::config::ExportConfig;
use crate::error::{Result, StudyDeskError};
use crate::formula::{substitute_symbols, to_latin1, ExportBlock, RenderedFormula};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 56.0;
const USABLE_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

enum Item {
    Title(Vec<u8>),
    Line(Vec<u8>),
    Gap,
    Image { name: String, width: f32, height: f32 },
}

/// Greedy word wrap over WinAnsi bytes, measured with the font metrics
fn wrap(line: &[u8], font: Font, size: f32, max_width: f32) -> Vec<Vec<u8>> {
    let fits = |bytes: &[u8]| font.text_width(bytes, size) <= max_width;
    let mut lines = Vec::new();
    let mut current: Vec<u8> = Vec::new();

    for word in line.split(|b| *b == b' ').filter(|w| !w.is_empty()) {
        let mut candidate = current.clone();
        if !candidate.is_empty() {
            candidate.push(b' ');
        }
        candidate.extend_from_slice(word);
        if fits(candidate.as_slice()) {
            current = candidate;
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        let mut rest = word;
        while !fits(rest) {
            // At least one byte per line, even when a single glyph is too wide
            let mut end = 1;
            while end < rest.len() && fits(&rest[..end + 1]) {
                end += 1;
            }
            lines.push(rest[..end].to_vec());
            rest = &rest[end..];
        }
        current.extend_from_slice(rest);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn image_object(image: &RenderedFormula, info: &PngInfo) -> Result<Stream> {
    let colors = info
        .colors()
        .ok_or_else(|| StudyDeskError::Export("PNG with alpha channel".to_string()))?;

    let color_space: Object = match info.color_type {
        0 => "DeviceGray".into(),
        2 => "DeviceRGB".into(),
        _ => Object::Array(vec![
            "Indexed".into(),
            "DeviceRGB".into(),
            Object::Integer((info.palette.len() / 3) as i64 - 1),
            Object::String(info.palette.clone(), StringFormat::Hexadecimal),
        ]),
    };

    let mut dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => image.width_px as i64,
        "Height" => image.height_px as i64,
        "ColorSpace" => color_space,
        "BitsPerComponent" => info.bit_depth as i64,
        "Filter" => "FlateDecode",
        "DecodeParms" => dictionary! {
            "Predictor" => 15,
            "Colors" => colors as i64,
            "BitsPerComponent" => info.bit_depth as i64,
            "Columns" => image.width_px as i64,
        },
    };
    if let Some(ranges) = info.color_key_mask() {
        dict.set(
            "Mask",
            Object::Array(ranges.into_iter().map(Object::Integer).collect()),
        );
    }

    Ok(Stream::new(dict, info.idat.clone()))
}

struct Layout {
    font_size: f32,
    title_size: f32,
    leading: f32,
}

impl Layout {
    fn new(config: &ExportConfig) -> Self {
        let font_size = config.pdf_font_size.max(4.0);
        Self {
            font_size,
            title_size: font_size + 5.0,
            leading: font_size * 1.4,
        }
    }

    fn height(&self, item: &Item) -> f32 {
        match item {
            Item::Title(_) => self.title_size * 1.6,
            Item::Line(_) => self.leading,
            Item::Gap => self.leading * 0.5,
            Item::Image { height, .. } => height + self.leading * 0.5,
        }
    }
}

/// Build a PDF from export blocks.
///
/// Text goes through symbol substitution and Latin-1 transliteration.
/// Images the PDF writer cannot embed fall back to their formula source.
pub fn export_pdf(title: &str, blocks: Vec<ExportBlock>, config: &ExportConfig) -> Result<Vec<u8>> {
    let layout = Layout::new(config);
    let usable_height = PAGE_HEIGHT - 2.0 * MARGIN;

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut xobjects = Dictionary::new();
    let mut items: Vec<Item> = Vec::new();

    if !title.trim().is_empty() {
        let title = to_latin1(&substitute_symbols(title.trim()));
        for line in wrap(&title, Font::Bold, layout.title_size, USABLE_WIDTH) {
            items.push(Item::Title(line));
        }
    }

    let push_text = |items: &mut Vec<Item>, text: &str| {
        for line in substitute_symbols(text).lines() {
            if line.trim().is_empty() {
                if !matches!(items.last(), Some(Item::Gap) | None) {
                    items.push(Item::Gap);
                }
                continue;
            }
            let bytes = to_latin1(line.trim_end());
            for wrapped in wrap(&bytes, Font::Regular, layout.font_size, USABLE_WIDTH) {
                items.push(Item::Line(wrapped));
            }
        }
    };

    for block in blocks {
        match block {
            ExportBlock::Text(text) => push_text(&mut items, &text),
            ExportBlock::Image(image) => {
                let embedded = PngInfo::parse(&image.png)
                    .and_then(|info| {
                        if info.is_pdf_embeddable() {
                            image_object(&image, &info)
                        } else {
                            Err(StudyDeskError::Export("unsupported PNG layout".to_string()))
                        }
                    });

                match embedded {
                    Ok(stream) => {
                        let name = format!("Im{}", xobjects.len() + 1);
                        let id = doc.add_object(stream);
                        xobjects.set(name.clone(), id);

                        let mut width = (config.image_width_inches * 72.0).min(USABLE_WIDTH);
                        let mut height = width * image.height_px as f32 / image.width_px.max(1) as f32;
                        if height > usable_height {
                            width *= usable_height / height;
                            height = usable_height;
                        }
                        items.push(Item::Image {
                            name,
                            width,
                            height,
                        });
                    }
                    Err(e) => {
                        tracing::debug!("Formula image kept as text in PDF: {}", e);
                        push_text(&mut items, &image.source);
                    }
                }
            }
        }
    }

    let mut fonts = Dictionary::new();
    for font in [Font::Regular, Font::Bold] {
        let id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => font.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(font.resource(), id);
    }
    let resources_id = doc.add_object(dictionary! {
        "Font" => fonts,
        "XObject" => xobjects,
    });

    // Paginate
    let mut pages: Vec<Vec<Operation>> = vec![Vec::new()];
    let mut y = PAGE_HEIGHT - MARGIN;

    for item in &items {
        let height = layout.height(item);
        if y - height < MARGIN && !pages.last().map(Vec::is_empty).unwrap_or(true) {
            pages.push(Vec::new());
            y = PAGE_HEIGHT - MARGIN;
        }
        let Some(ops) = pages.last_mut() else {
            continue;
        };

        match item {
            Item::Title(bytes) | Item::Line(bytes) => {
                let (font, size) = match item {
                    Item::Title(_) => (Font::Bold, layout.title_size),
                    _ => (Font::Regular, layout.font_size),
                };
                ops.push(Operation::new("BT", vec![]));
                ops.push(Operation::new(
                    "Tf",
                    vec![Object::Name(font.resource().as_bytes().to_vec()), size.into()],
                ));
                ops.push(Operation::new("Td", vec![MARGIN.into(), (y - size).into()]));
                ops.push(Operation::new(
                    "Tj",
                    vec![Object::String(bytes.clone(), StringFormat::Literal)],
                ));
                ops.push(Operation::new("ET", vec![]));
            }
            Item::Gap => {}
            Item::Image {
                name,
                width,
                height,
            } => {
                ops.push(Operation::new("q", vec![]));
                ops.push(Operation::new(
                    "cm",
                    vec![
                        (*width).into(),
                        0.into(),
                        0.into(),
                        (*height).into(),
                        MARGIN.into(),
                        (y - height).into(),
                    ],
                ));
                ops.push(Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]));
                ops.push(Operation::new("Q", vec![]));
            }
        }
        y -= height;
    }

    let mut kids = Vec::with_capacity(pages.len());
    for operations in pages {
        let content = Content { operations };
        let encoded = content
            .encode()
            .map_err(|e| StudyDeskError::Export(format!("cannot encode page: {}", e)))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id: ObjectId = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| StudyDeskError::Export(format!("cannot write PDF: {}", e)))?;
    Ok(buffer)
}
