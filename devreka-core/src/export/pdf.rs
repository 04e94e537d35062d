//! PDF export of a conversation
//!
//! Layout works in points on an A4 portrait page with the origin at the top
//! left. Every text block asks for its height first; if it would cross the
//! bottom margin a new page is started before anything is drawn.

use super::ExportError;
use super::blocks::{self, BlockVisitor};
use crate::llm::{Message, Role};
use crate::session::ConversationHistory;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Pt, Rgb,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

pub const PDF_FILE_NAME: &str = "idea-conversation.pdf";

const TITLE: &str = "Conversation about a Project Idea";
const A4_WIDTH: f32 = 595.28;
const A4_HEIGHT: f32 = 841.89;
const MARGIN: f32 = 40.0;
const LINE_HEIGHT: f32 = 1.2;
const BODY_SIZE: f32 = 10.0;
const LIST_INDENT: f32 = 15.0;
const BULLET: &str = "•";
/// Average Helvetica glyph width as a fraction of the font size
const CHAR_WIDTH_EM: f32 = 0.5;

/// RGB color with components in `0..=255`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextColor(pub u8, pub u8, pub u8);

impl TextColor {
    pub const BLACK: TextColor = TextColor(0, 0, 0);
    pub const USER: TextColor = TextColor(0x00, 0x7b, 0xff);
    pub const ASSISTANT: TextColor = TextColor(0x21, 0x25, 0x29);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub bold: bool,
    pub size: f32,
    pub color: TextColor,
}

impl TextStyle {
    fn body() -> Self {
        Self { bold: false, size: BODY_SIZE, color: TextColor::BLACK }
    }

    fn bold(size: f32) -> Self {
        Self { bold: true, size, color: TextColor::BLACK }
    }
}

/// Page-aware text placement backend
pub trait PdfSurface {
    /// Page width and height in points
    fn page_size(&self) -> (f32, f32);

    fn add_page(&mut self);

    /// Draw one line with its baseline at `y` points from the page top
    fn text(&mut self, x: f32, y: f32, text: &str, style: &TextStyle, align: Align);
}

/// Places a conversation onto a surface
pub struct PdfLayout<'a, S: PdfSurface> {
    surface: &'a mut S,
    width: f32,
    height: f32,
    y: f32,
}

impl<'a, S: PdfSurface> PdfLayout<'a, S> {
    pub fn new(surface: &'a mut S) -> Self {
        let (width, height) = surface.page_size();
        Self { surface, width, height, y: MARGIN }
    }

    fn check_page_break(&mut self, needed: f32) {
        if self.y + needed > self.height - MARGIN {
            self.surface.add_page();
            self.y = MARGIN;
        }
    }

    fn wrap(&self, text: &str, x: f32, size: f32) -> Vec<String> {
        let available = (self.width - x - MARGIN).max(size);
        let columns = ((available / (size * CHAR_WIDTH_EM)).floor() as usize).max(1);
        textwrap::wrap(text, columns).into_iter().map(|line| line.into_owned()).collect()
    }

    fn render_text(&mut self, text: &str, x: f32, style: TextStyle, list_item: bool) {
        let lines = self.wrap(text, x, style.size);
        let line_height = style.size * LINE_HEIGHT;
        let block_height = lines.len() as f32 * line_height;

        if block_height <= self.height - 2.0 * MARGIN {
            self.check_page_break(block_height);
            if list_item {
                self.surface.text(x - LIST_INDENT, self.y, BULLET, &style, Align::Left);
            }
            for (i, line) in lines.iter().enumerate() {
                let y = self.y + i as f32 * line_height;
                self.surface.text(x, y, line, &style, Align::Left);
            }
            self.y += block_height;
            return;
        }

        // taller than a page: place it line by line
        for (i, line) in lines.iter().enumerate() {
            self.check_page_break(line_height);
            if list_item && i == 0 {
                self.surface.text(x - LIST_INDENT, self.y, BULLET, &style, Align::Left);
            }
            self.surface.text(x, self.y, line, &style, Align::Left);
            self.y += line_height;
        }
    }

    pub fn title(&mut self, title: &str) {
        self.check_page_break(20.0);
        let style = TextStyle::bold(18.0);
        self.surface.text(self.width / 2.0, self.y, title, &style, Align::Center);
        self.y += 30.0;
    }

    pub fn message(&mut self, message: &Message) {
        self.check_page_break(20.0);
        let (label, color) = match message.role {
            Role::User => ("You:", TextColor::USER),
            Role::Assistant => ("AI:", TextColor::ASSISTANT),
        };
        self.render_text(label, MARGIN, TextStyle { bold: true, size: 12.0, color }, false);

        for block in blocks::lex(&message.content) {
            block.accept(self);
        }
        self.y += 15.0;
    }
}

impl<S: PdfSurface> BlockVisitor for PdfLayout<'_, S> {
    fn heading(&mut self, depth: u8, text: &str) {
        let size = 16.0 - f32::from(depth) * 2.0;
        self.render_text(text, MARGIN, TextStyle::bold(size), false);
    }

    fn paragraph(&mut self, text: &str) {
        self.render_text(text, MARGIN, TextStyle::body(), false);
    }

    fn list_item(&mut self, text: &str) {
        self.render_text(text, MARGIN + LIST_INDENT, TextStyle::body(), true);
    }

    fn space(&mut self) {
        self.y += 10.0;
    }
}

/// Lay out the visible part of `history` onto `surface`
pub fn layout_conversation<S: PdfSurface>(history: &ConversationHistory, surface: &mut S) {
    let mut layout = PdfLayout::new(surface);
    layout.title(TITLE);
    for message in history.transcript() {
        layout.message(message);
    }
}

/// `PdfSurface` writing a real document with the builtin Helvetica fonts
pub struct PrintPdfSurface {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl PrintPdfSurface {
    pub fn new(title: &str) -> Result<Self, ExportError> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm::from(Pt(A4_WIDTH)), Mm::from(Pt(A4_HEIGHT)), "Layer 1");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ExportError::pdf(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ExportError::pdf(e.to_string()))?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Self { doc, layer, regular, bold })
    }

    pub fn save(self, path: &Path) -> Result<(), ExportError> {
        let file = File::create(path)?;
        self.doc
            .save(&mut BufWriter::new(file))
            .map_err(|e| ExportError::pdf(e.to_string()))
    }
}

impl PdfSurface for PrintPdfSurface {
    fn page_size(&self) -> (f32, f32) {
        (A4_WIDTH, A4_HEIGHT)
    }

    fn add_page(&mut self) {
        let (page, layer) =
            self.doc.add_page(Mm::from(Pt(A4_WIDTH)), Mm::from(Pt(A4_HEIGHT)), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
    }

    fn text(&mut self, x: f32, y: f32, text: &str, style: &TextStyle, align: Align) {
        let x = match align {
            Align::Left => x,
            Align::Center => {
                x - text.chars().count() as f32 * style.size * CHAR_WIDTH_EM / 2.0
            }
        };
        let TextColor(r, g, b) = style.color;
        self.layer.set_fill_color(Color::Rgb(Rgb::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            None,
        )));
        let font = if style.bold { &self.bold } else { &self.regular };
        self.layer.use_text(
            text,
            style.size,
            Mm::from(Pt(x)),
            Mm::from(Pt(A4_HEIGHT - y)),
            font,
        );
    }
}

/// Write the conversation as a PDF into `directory`
pub fn export_pdf(history: &ConversationHistory, directory: &Path) -> Result<PathBuf, ExportError> {
    if history.transcript().is_empty() {
        return Err(ExportError::Empty);
    }

    let mut surface = PrintPdfSurface::new(TITLE)?;
    layout_conversation(history, &mut surface);

    let path = directory.join(PDF_FILE_NAME);
    surface.save(&path)?;
    info!("Exported PDF to {}", path.display());
    Ok(path)
}
