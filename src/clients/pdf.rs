use anyhow::{Error, Result, anyhow};
use lopdf::{
    Dictionary, Document, Object, ObjectId, Stream, StringFormat,
    content::{Content, Operation},
    dictionary,
};
use tracing::debug;

use crate::{
    clients::font_metrics::{
        HELVETICA_BOLD_WIDTHS, HELVETICA_WIDTHS, encode_win_ansi, string_width,
    },
    models::{document::RenderedDocument, field_spec::FieldSpec, payload::SubmissionPayload},
};

const PDF_VERSION: &str = "1.5";
const PRODUCER: &str = "form-mailer";

const REGULAR_FONT: &[u8] = b"F1";
const BOLD_FONT: &[u8] = b"F2";

/// Page geometry and type sizes, in PDF points.
#[derive(Debug, Clone)]
pub struct PageLayout {
    pub width: i64,
    pub height: i64,
    pub margin: i64,
    pub title_size: i64,
    pub title_leading: i64,
    pub title_spacing: i64,
    pub body_size: i64,
    pub body_leading: i64,
    pub entry_spacing: i64,
}

impl Default for PageLayout {
    /// US Letter with one-inch margins.
    fn default() -> Self {
        Self {
            width: 612,
            height: 792,
            margin: 72,
            title_size: 18,
            title_leading: 22,
            title_spacing: 12,
            body_size: 11,
            body_leading: 14,
            entry_spacing: 6,
        }
    }
}

impl PageLayout {
    fn text_width(&self) -> i64 {
        self.width - 2 * self.margin
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Face {
    Regular,
    Bold,
}

impl Face {
    fn resource_name(self) -> &'static [u8] {
        match self {
            Face::Regular => REGULAR_FONT,
            Face::Bold => BOLD_FONT,
        }
    }

    fn widths(self) -> &'static [u16; 256] {
        match self {
            Face::Regular => &HELVETICA_WIDTHS,
            Face::Bold => &HELVETICA_BOLD_WIDTHS,
        }
    }

    /// Width of encoded `text` at `size`, in 1/1000 pt.
    fn measure(self, text: &[u8], size: i64) -> i64 {
        string_width(self.widths(), text) * size
    }
}

#[derive(Debug)]
struct PlacedLine {
    text: Vec<u8>,
    face: Face,
    size: i64,
    x: i64,
    y: i64,
}

/// Lays lines top to bottom, opening a new page whenever the next line
/// would cross the bottom margin.
struct Cursor<'a> {
    layout: &'a PageLayout,
    pages: Vec<Vec<PlacedLine>>,
    y: i64,
}

impl<'a> Cursor<'a> {
    fn new(layout: &'a PageLayout) -> Self {
        Self {
            layout,
            pages: vec![Vec::new()],
            y: layout.height - layout.margin,
        }
    }

    fn place(&mut self, text: Vec<u8>, face: Face, size: i64, leading: i64, centered: bool) {
        if self.y - leading < self.layout.margin {
            self.pages.push(Vec::new());
            self.y = self.layout.height - self.layout.margin;
        }
        self.y -= leading;

        let x = if centered {
            let estimated = face.measure(&text, size) / 1000;
            self.layout.margin + ((self.layout.text_width() - estimated) / 2).max(0)
        } else {
            self.layout.margin
        };

        if let Some(page) = self.pages.last_mut() {
            page.push(PlacedLine {
                text,
                face,
                size,
                x,
                y: self.y,
            });
        }
    }

    fn space(&mut self, points: i64) {
        self.y -= points;
    }
}

/// Renders a title and labeled field lines into a paginated PDF.
///
/// Output carries no timestamps or random identifiers, so the same input
/// always yields the same bytes.
#[derive(Debug, Clone, Default)]
pub struct DocumentRenderer {
    layout: PageLayout,
}

impl DocumentRenderer {
    pub fn new(layout: PageLayout) -> Self {
        Self { layout }
    }

    pub fn render(
        &self,
        title: &str,
        field_spec: &FieldSpec,
        payload: &SubmissionPayload,
    ) -> Result<RenderedDocument, Error> {
        let layout = &self.layout;
        let mut cursor = Cursor::new(layout);

        let column = layout.text_width();

        for line in wrap_text(title, Face::Bold, layout.title_size, column) {
            cursor.place(line, Face::Bold, layout.title_size, layout.title_leading, true);
        }
        cursor.space(layout.title_spacing);

        for entry in field_spec.entries() {
            let text = format!("{}: {}", entry.label, payload.display_value(&entry.key));
            for line in wrap_text(&text, Face::Regular, layout.body_size, column) {
                cursor.place(line, Face::Regular, layout.body_size, layout.body_leading, false);
            }
            cursor.space(layout.entry_spacing);
        }

        let pages = cursor.pages;
        let page_count = pages.len();
        let bytes = self.write_pdf(title, pages)?;

        debug!(
            bytes = bytes.len(),
            pages = page_count,
            fields = field_spec.len(),
            "Document rendered"
        );

        Ok(RenderedDocument::new(bytes, page_count))
    }

    fn write_pdf(&self, title: &str, pages: Vec<Vec<PlacedLine>>) -> Result<Vec<u8>, Error> {
        let mut doc = Document::with_version(PDF_VERSION);
        let pages_id = doc.new_object_id();

        let regular_id = doc.add_object(font_dictionary("Helvetica"));
        let bold_id = doc.add_object(font_dictionary("Helvetica-Bold"));
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => regular_id,
                "F2" => bold_id,
            },
        });

        let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
        for lines in pages {
            let page_id = add_page(&mut doc, pages_id, lines)?;
            kids.push(page_id.into());
        }

        let page_count = kids.len() as i64;
        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(self.layout.width),
                Object::Integer(self.layout.height),
            ],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::String(encode_win_ansi(title), StringFormat::Literal),
            "Producer" => Object::String(PRODUCER.as_bytes().to_vec(), StringFormat::Literal),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| anyhow!("Failed to write PDF: {}", e))?;

        Ok(buffer)
    }
}

fn font_dictionary(base_font: &str) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
        "Encoding" => "WinAnsiEncoding",
    }
}

fn add_page(doc: &mut Document, pages_id: ObjectId, lines: Vec<PlacedLine>) -> Result<ObjectId> {
    let mut operations = Vec::with_capacity(lines.len() * 5);
    for line in lines {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![
                Object::Name(line.face.resource_name().to_vec()),
                Object::Integer(line.size),
            ],
        ));
        operations.push(Operation::new(
            "Td",
            vec![Object::Integer(line.x), Object::Integer(line.y)],
        ));
        operations.push(Operation::new(
            "Tj",
            vec![Object::String(line.text, StringFormat::Literal)],
        ));
        operations.push(Operation::new("ET", vec![]));
    }

    let content = Content { operations }
        .encode()
        .map_err(|e| anyhow!("Failed to encode page content: {}", e))?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, content));

    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    }))
}

/// Greedy word wrap to `column` points, measured with the face's glyph
/// widths. Words wider than the column are split between glyphs.
fn wrap_text(text: &str, face: Face, size: i64, column: i64) -> Vec<Vec<u8>> {
    let limit = column * 1000;
    let space = face.measure(b" ", size);

    let mut lines = Vec::new();
    let mut current: Vec<u8> = Vec::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        let word = encode_win_ansi(word);

        for piece in split_to_fit(&word, face, size, limit) {
            let piece_width = face.measure(&piece, size);

            if !current.is_empty() && current_width + space + piece_width > limit {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }

            if !current.is_empty() {
                current.push(b' ');
                current_width += space;
            }

            current.extend_from_slice(&piece);
            current_width += piece_width;
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }

    lines
}

fn split_to_fit(word: &[u8], face: Face, size: i64, limit: i64) -> Vec<Vec<u8>> {
    let mut pieces = Vec::new();
    let mut piece = Vec::new();
    let mut width = 0;

    for &byte in word {
        let glyph = face.measure(&[byte], size);

        if !piece.is_empty() && width + glyph > limit {
            pieces.push(std::mem::take(&mut piece));
            width = 0;
        }

        piece.push(byte);
        width += glyph;
    }

    if !piece.is_empty() {
        pieces.push(piece);
    }

    pieces
}
