//! Minimal paginated PDF writer on top of lopdf.
//!
//! Layout code works in a top-left coordinate system (y grows downwards);
//! the conversion to PDF user space happens in [`ReportDocument::to_bytes`].

use chrono::{DateTime, Utc};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use tracing::debug;

use crate::error::ReportError;
use crate::models::config::ReportConfig;

/// Builtin Type1 fonts used by the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    /// Helvetica.
    Regular,
    /// Helvetica-Bold.
    Bold,
}

impl Font {
    fn resource_name(&self) -> &'static str {
        match self {
            Self::Regular => "F1",
            Self::Bold => "F2",
        }
    }
}

/// RGB fill colour, components in 0.0 - 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    pub const NAVY: Color = Color::rgb(0.0, 0.0, 0.5);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

/// A single positioned text run.
#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub font: Font,
    pub size: f32,
    pub color: Color,
}

/// One page of the report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportPage {
    pub width: f32,
    pub height: f32,
    pub items: Vec<TextItem>,
}

impl ReportPage {
    /// Text runs on the page, in insertion order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|i| i.text.as_str())
    }
}

/// An in-memory PDF document made of text-only pages.
#[derive(Debug, Clone)]
pub struct ReportDocument {
    pages: Vec<ReportPage>,
    page_width: f32,
    page_height: f32,
    created: DateTime<Utc>,
}

impl ReportDocument {
    /// Create an empty document with the given page size in points.
    pub fn new(page_width: f32, page_height: f32) -> Self {
        Self {
            pages: Vec::new(),
            page_width,
            page_height,
            created: Utc::now(),
        }
    }

    /// Create an empty document sized by the report configuration.
    pub fn from_config(config: &ReportConfig) -> Self {
        Self::new(config.page_width, config.page_height)
    }

    /// Start a new page and return its index.
    pub fn new_page(&mut self) -> usize {
        self.pages.push(ReportPage {
            width: self.page_width,
            height: self.page_height,
            items: Vec::new(),
        });
        self.pages.len() - 1
    }

    /// Place text on the current (last) page, starting one if needed.
    pub fn insert_text(
        &mut self,
        pos: (f32, f32),
        text: impl Into<String>,
        font: Font,
        size: f32,
        color: Color,
    ) {
        if self.pages.is_empty() {
            self.new_page();
        }
        if let Some(page) = self.pages.last_mut() {
            page.items.push(TextItem {
                x: pos.0,
                y: pos.1,
                text: text.into(),
                font,
                size,
                color,
            });
        }
    }

    /// Append every page of another document.
    pub fn append(&mut self, other: ReportDocument) {
        self.pages.extend(other.pages);
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Pages in order.
    pub fn pages(&self) -> &[ReportPage] {
        &self.pages
    }

    /// Serialize to PDF bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ReportError> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let bold_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                Font::Regular.resource_name() => regular_id,
                Font::Bold.resource_name() => bold_id,
            },
        });

        let mut kids: Vec<Object> = Vec::with_capacity(self.pages.len());
        for page in &self.pages {
            let content = Content {
                operations: page_operations(page),
            };
            let encoded = content
                .encode()
                .map_err(|e| ReportError::Encode(e.to_string()))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

            let media_box: Vec<Object> = vec![
                Object::Integer(0),
                Object::Integer(0),
                page.width.into(),
                page.height.into(),
            ];
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
                "MediaBox" => media_box,
            });
            kids.push(page_id.into());
        }

        let page_count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => Object::Integer(page_count),
                "Resources" => resources_id,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Producer" => Object::string_literal("picksheet"),
            "CreationDate" => Object::string_literal(
                self.created.format("D:%Y%m%d%H%M%SZ").to_string()
            ),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);
        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|e| ReportError::Write(e.to_string()))?;

        debug!("Serialized report: {} pages, {} bytes", self.pages.len(), bytes.len());
        Ok(bytes)
    }
}

fn page_operations(page: &ReportPage) -> Vec<Operation> {
    let mut operations = Vec::with_capacity(page.items.len() * 5);
    for item in &page.items {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![item.font.resource_name().into(), item.size.into()],
        ));
        operations.push(Operation::new(
            "rg",
            vec![item.color.r.into(), item.color.g.into(), item.color.b.into()],
        ));
        operations.push(Operation::new(
            "Td",
            vec![item.x.into(), (page.height - item.y).into()],
        ));
        operations.push(Operation::new(
            "Tj",
            vec![Object::string_literal(encode_text(&item.text))],
        ));
        operations.push(Operation::new("ET", vec![]));
    }
    operations
}

/// WinAnsi bytes 0x80-0x9F that differ from Latin-1.
const WIN_ANSI_EXTRA: [(char, u8); 27] = [
    ('\u{20AC}', 0x80),
    ('\u{201A}', 0x82),
    ('\u{0192}', 0x83),
    ('\u{201E}', 0x84),
    ('\u{2026}', 0x85),
    ('\u{2020}', 0x86),
    ('\u{2021}', 0x87),
    ('\u{02C6}', 0x88),
    ('\u{2030}', 0x89),
    ('\u{0160}', 0x8A),
    ('\u{2039}', 0x8B),
    ('\u{0152}', 0x8C),
    ('\u{017D}', 0x8E),
    ('\u{2018}', 0x91),
    ('\u{2019}', 0x92),
    ('\u{201C}', 0x93),
    ('\u{201D}', 0x94),
    ('\u{2022}', 0x95),
    ('\u{2013}', 0x96),
    ('\u{2014}', 0x97),
    ('\u{02DC}', 0x98),
    ('\u{2122}', 0x99),
    ('\u{0161}', 0x9A),
    ('\u{203A}', 0x9B),
    ('\u{0153}', 0x9C),
    ('\u{017E}', 0x9E),
    ('\u{0178}', 0x9F),
];

/// Encode text for a WinAnsi Type1 font; anything the encoding lacks becomes `?`.
fn encode_text(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_byte).collect()
}

fn win_ansi_byte(c: char) -> u8 {
    match u32::from(c) {
        code @ (0x00..=0x7F | 0xA0..=0xFF) => code as u8,
        _ => WIN_ANSI_EXTRA
            .iter()
            .find(|(ch, _)| *ch == c)
            .map_or(b'?', |(_, byte)| *byte),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_text_starts_first_page() {
        let mut doc = ReportDocument::new(595.0, 842.0);
        assert_eq!(doc.page_count(), 0);

        doc.insert_text((50.0, 50.0), "hello", Font::Regular, 10.0, Color::BLACK);
        assert_eq!(doc.page_count(), 1);

        doc.new_page();
        doc.insert_text((50.0, 50.0), "second", Font::Bold, 12.0, Color::BLUE);
        assert_eq!(doc.pages()[1].texts().collect::<Vec<_>>(), vec!["second"]);
    }

    #[test]
    fn test_append_concatenates_pages() {
        let mut first = ReportDocument::new(595.0, 842.0);
        first.new_page();
        let mut second = ReportDocument::new(595.0, 842.0);
        second.new_page();
        second.new_page();

        first.append(second);
        assert_eq!(first.page_count(), 3);
    }

    #[test]
    fn test_to_bytes_produces_loadable_pdf() {
        let mut doc = ReportDocument::new(595.0, 842.0);
        doc.insert_text((50.0, 50.0), "SO-100 (B-PG-172)", Font::Regular, 10.0, Color::BLACK);
        doc.new_page();
        doc.insert_text((72.0, 421.0), "Señal ✓", Font::Bold, 18.0, Color::NAVY);

        let bytes = doc.to_bytes().unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let loaded = Document::load_mem(&bytes).unwrap();
        assert_eq!(loaded.get_pages().len(), 2);
    }

    #[test]
    fn test_encode_text_replaces_unmapped() {
        assert_eq!(encode_text("añ✓"), vec![b'a', 0xF1, b'?']);
    }

    #[test]
    fn test_encode_text_uses_win_ansi_punctuation() {
        assert_eq!(
            encode_text("Men\u{2019}s \u{201C}Pro\u{201D} \u{2013} \u{20AC}5"),
            b"Men\x92s \x93Pro\x94 \x96 \x805".to_vec()
        );
        // C1 controls have no glyph in WinAnsi
        assert_eq!(encode_text("\u{0085}\u{0092}"), b"??".to_vec());
    }
}
