use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Polygon, Rgb,
};
use tracing::debug;

use crate::core::error::RenderError;
use crate::core::message::Message;

// Landscape A4.
const PAGE_WIDTH: f32 = 297.0;
const PAGE_HEIGHT: f32 = 210.0;
const MARGIN: f32 = 5.0;

const TABLE_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
const ROLE_COL_WIDTH: f32 = 30.0;
const TEXT_COL_WIDTH: f32 = TABLE_WIDTH - ROLE_COL_WIDTH;
const CELL_PADDING: f32 = 2.0;

const BODY_SIZE_PT: f32 = 9.0;
const HEADER_SIZE_PT: f32 = 10.0;
const GRID_THICKNESS_PT: f32 = 0.25;

const PT_TO_MM: f32 = 0.352_778;

fn line_height_mm(font_size_pt: f32) -> f32 {
    font_size_pt * PT_TO_MM * 1.3
}

/// Renders an ordered conversation into a paginated two-column PDF table:
/// role label on the left, message text on the right, one row per message.
/// Cell text wraps, rows grow to fit and split across page breaks.
pub struct TranscriptExporter {
    title: String,
}

impl Default for TranscriptExporter {
    fn default() -> Self {
        Self {
            title: "Chat transcript".into(),
        }
    }
}

struct TableRow {
    role_lines: Vec<String>,
    text_lines: Vec<String>,
    header: bool,
}

impl TranscriptExporter {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    /// Render the messages into an in-memory PDF. Empty input yields a valid
    /// header-only document. The input is borrowed and never mutated, so a
    /// failed export leaves the session exactly as it was.
    pub fn render(&self, messages: &[Message]) -> Result<Vec<u8>, RenderError> {
        debug!(message_count = messages.len(), "rendering transcript");

        let (doc, page, layer) = PdfDocument::new(
            self.title.as_str(),
            Mm(PAGE_WIDTH),
            Mm(PAGE_HEIGHT),
            "transcript",
        );
        let body_font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        let bold_font = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;

        let rows = build_rows(messages);

        let mut painter = TablePainter {
            doc: &doc,
            layer: doc.get_page(page).get_layer(layer),
            body_font: &body_font,
            bold_font: &bold_font,
            cursor_y: PAGE_HEIGHT - MARGIN,
        };

        for row in &rows {
            painter.paint_row(row);
        }

        doc.save_to_bytes()
            .map_err(|e| RenderError::Pdf(e.to_string()))
    }
}

fn build_rows(messages: &[Message]) -> Vec<TableRow> {
    let role_width = ROLE_COL_WIDTH - 2.0 * CELL_PADDING;
    let text_width = TEXT_COL_WIDTH - 2.0 * CELL_PADDING;

    let mut rows = vec![TableRow {
        role_lines: vec!["Role".into()],
        text_lines: vec!["Message".into()],
        header: true,
    }];

    for msg in messages {
        rows.push(TableRow {
            role_lines: wrap_text(msg.role.label(), role_width, BODY_SIZE_PT),
            text_lines: wrap_text(&msg.content, text_width, BODY_SIZE_PT),
            header: false,
        });
    }

    rows
}

struct TablePainter<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    body_font: &'a IndirectFontRef,
    bold_font: &'a IndirectFontRef,
    cursor_y: f32,
}

impl TablePainter<'_> {
    /// Paint one logical row, splitting it across pages when the remaining
    /// lines do not fit.
    fn paint_row(&mut self, row: &TableRow) {
        let line_h = line_height_mm(if row.header { HEADER_SIZE_PT } else { BODY_SIZE_PT });
        let mut role_at = 0;
        let mut text_at = 0;

        loop {
            let role_left = row.role_lines.len() - role_at;
            let text_left = row.text_lines.len() - text_at;
            let lines_left = role_left.max(text_left).max(1);

            let available = self.cursor_y - MARGIN;
            let fit = (((available - 2.0 * CELL_PADDING) / line_h).floor() as i64).max(0) as usize;

            if fit == 0 {
                self.new_page();
                continue;
            }

            let take = lines_left.min(fit);
            let role_take = role_left.min(take);
            let text_take = text_left.min(take);

            self.paint_segment(
                row,
                &row.role_lines[role_at..role_at + role_take],
                &row.text_lines[text_at..text_at + text_take],
                take,
                line_h,
            );
            role_at += role_take;
            text_at += text_take;

            if take == lines_left {
                break;
            }
            self.new_page();
        }
    }

    fn new_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "transcript");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.cursor_y = PAGE_HEIGHT - MARGIN;
    }

    fn paint_segment(
        &mut self,
        row: &TableRow,
        role_lines: &[String],
        text_lines: &[String],
        line_slots: usize,
        line_h: f32,
    ) {
        let top = self.cursor_y;
        let height = line_slots as f32 * line_h + 2.0 * CELL_PADDING;
        let bottom = top - height;

        if row.header {
            self.layer.set_fill_color(header_background());
            self.layer.add_polygon(Polygon {
                rings: vec![vec![
                    (Point::new(Mm(MARGIN), Mm(top)), false),
                    (Point::new(Mm(MARGIN + TABLE_WIDTH), Mm(top)), false),
                    (Point::new(Mm(MARGIN + TABLE_WIDTH), Mm(bottom)), false),
                    (Point::new(Mm(MARGIN), Mm(bottom)), false),
                ]],
                mode: PaintMode::Fill,
                winding_order: WindingOrder::NonZero,
            });
        }

        let (font, size, color) = if row.header {
            (self.bold_font, HEADER_SIZE_PT, header_text_color())
        } else {
            (self.body_font, BODY_SIZE_PT, body_text_color())
        };
        self.layer.set_fill_color(color);

        for (i, line) in role_lines.iter().enumerate() {
            let baseline = top - CELL_PADDING - (i as f32 + 1.0) * line_h + 0.28 * line_h;
            self.layer.use_text(
                line.as_str(),
                size,
                Mm(MARGIN + CELL_PADDING),
                Mm(baseline),
                font,
            );
        }
        for (i, line) in text_lines.iter().enumerate() {
            let baseline = top - CELL_PADDING - (i as f32 + 1.0) * line_h + 0.28 * line_h;
            self.layer.use_text(
                line.as_str(),
                size,
                Mm(MARGIN + ROLE_COL_WIDTH + CELL_PADDING),
                Mm(baseline),
                font,
            );
        }

        self.paint_grid(top, bottom);
        self.cursor_y = bottom;
    }

    /// Cell borders: top and bottom rules plus the three vertical rules.
    /// Shared edges between adjacent rows overdraw, which is harmless.
    fn paint_grid(&mut self, top: f32, bottom: f32) {
        self.layer.set_outline_color(grid_color());
        self.layer.set_outline_thickness(GRID_THICKNESS_PT);

        let xs = [MARGIN, MARGIN + ROLE_COL_WIDTH, MARGIN + TABLE_WIDTH];
        for x in xs {
            self.stroke_line(x, top, x, bottom);
        }
        for y in [top, bottom] {
            self.stroke_line(MARGIN, y, MARGIN + TABLE_WIDTH, y);
        }
    }

    fn stroke_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(x1), Mm(y1)), false),
                (Point::new(Mm(x2), Mm(y2)), false),
            ],
            is_closed: false,
        });
    }
}

fn header_background() -> Color {
    Color::Rgb(Rgb::new(0.5, 0.5, 0.5, None))
}

fn header_text_color() -> Color {
    // whitesmoke
    Color::Rgb(Rgb::new(0.96, 0.96, 0.96, None))
}

fn body_text_color() -> Color {
    Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None))
}

fn grid_color() -> Color {
    Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None))
}

/// Greedy word wrap against an estimated Helvetica advance width. Explicit
/// newlines are honored; a single word wider than the column is hard-split.
pub(crate) fn wrap_text(text: &str, max_width_mm: f32, font_size_pt: f32) -> Vec<String> {
    let mut lines = Vec::new();

    for raw_line in sanitize(text).split('\n') {
        if raw_line.trim().is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current = String::new();
        for word in raw_line.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };

            if text_width_mm(&candidate, font_size_pt) <= max_width_mm {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            if text_width_mm(word, font_size_pt) <= max_width_mm {
                current = word.to_string();
            } else {
                current = hard_split(word, max_width_mm, font_size_pt, &mut lines);
            }
        }
        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Break an overlong unbroken token at character boundaries; returns the
/// trailing fragment that still fits on one line.
fn hard_split(
    word: &str,
    max_width_mm: f32,
    font_size_pt: f32,
    lines: &mut Vec<String>,
) -> String {
    let mut chunk = String::new();
    for ch in word.chars() {
        chunk.push(ch);
        if text_width_mm(&chunk, font_size_pt) > max_width_mm && chunk.chars().count() > 1 {
            let keep = chunk.pop().unwrap_or_default();
            lines.push(std::mem::take(&mut chunk));
            chunk.push(keep);
        }
    }
    chunk
}

fn sanitize(text: &str) -> String {
    text.replace('\t', "    ")
        .replace("\r\n", "\n")
        .chars()
        .filter(|c| *c == '\n' || !c.is_control())
        .collect()
}

/// Estimated rendered width in millimeters, from coarse Helvetica advance
/// classes. Slightly generous so wrapped lines stay inside the cell.
pub(crate) fn text_width_mm(text: &str, font_size_pt: f32) -> f32 {
    let em: f32 = text.chars().map(char_em).sum();
    em * font_size_pt * PT_TO_MM
}

fn char_em(c: char) -> f32 {
    match c {
        'i' | 'j' | 'l' | '\'' | '|' | '.' | ',' | ':' | ';' | '!' => 0.26,
        'f' | 't' | 'r' | 'I' | ' ' | '(' | ')' | '[' | ']' | '-' | '"' | '/' | '\\' => 0.33,
        'm' | 'w' | 'M' | 'W' | '@' | '%' => 0.95,
        'A'..='Z' | '_' | '#' | '&' | '+' | '=' | '~' | '<' | '>' => 0.74,
        '0'..='9' => 0.58,
        c if !c.is_ascii() => 0.95,
        _ => 0.56,
    }
}
