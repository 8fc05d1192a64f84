//! Small PDF writer: headings, paragraphs, monospaced blocks, tables and
//! RGB images on A4 pages.
//!
//! Uses the standard Type 1 fonts with WinAnsi encoding, so nothing is
//! embedded. Latin-1 text and the common typographic marks survive; other
//! characters are replaced with `?`.

use crate::error::{ReportError, ReportResult};
use crate::output::write_artifact;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::RgbImage;
use std::fmt::Write as _;
use std::io::Write as _;
use std::path::Path;

const PAGE_WIDTH: f64 = 595.0;
const PAGE_HEIGHT: f64 = 842.0;
const MARGIN: f64 = 50.0;
const CONTENT_WIDTH: f64 = PAGE_WIDTH - 2.0 * MARGIN;

#[derive(Debug, Clone, Copy)]
enum Font {
    Regular,
    Bold,
    Mono,
}

impl Font {
    fn resource(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
            Font::Mono => "F3",
        }
    }

    /// Average glyph advance as a fraction of the font size
    fn advance(self) -> f64 {
        match self {
            Font::Regular => 0.5,
            Font::Bold => 0.55,
            Font::Mono => 0.6,
        }
    }
}

struct PageImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

#[derive(Default)]
struct Page {
    content: String,
    images: Vec<PageImage>,
}

/// Flowing document; content moves to a new page when the current one is full
pub struct PdfDocument {
    pages: Vec<Page>,
    cursor: f64,
}

impl Default for PdfDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfDocument {
    pub fn new() -> Self {
        Self {
            pages: vec![Page::default()],
            cursor: PAGE_HEIGHT - MARGIN,
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn reserve(&mut self, height: f64) {
        if self.cursor - height < MARGIN && self.cursor < PAGE_HEIGHT - MARGIN {
            self.pages.push(Page::default());
            self.cursor = PAGE_HEIGHT - MARGIN;
        }
    }

    fn page(&mut self) -> &mut Page {
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn line(&mut self, text: &str, font: Font, size: f64, x: f64) {
        let leading = size * 1.3;
        self.reserve(leading);
        self.cursor -= leading;
        let y = self.cursor;
        let escaped = escape(text);
        let _ = writeln!(
            self.page().content,
            "BT /{} {} Tf {:.2} {:.2} Td ({}) Tj ET",
            font.resource(),
            size,
            x,
            y,
            escaped
        );
    }

    pub fn spacer(&mut self, height: f64) -> &mut Self {
        self.cursor -= height;
        if self.cursor < MARGIN {
            self.reserve(PAGE_HEIGHT);
        }
        self
    }

    pub fn title(&mut self, text: &str) -> &mut Self {
        for line in wrap(text, chars_per_line(Font::Bold, 18.0)) {
            self.line(&line, Font::Bold, 18.0, MARGIN);
        }
        self.spacer(8.0)
    }

    pub fn heading(&mut self, text: &str) -> &mut Self {
        self.spacer(6.0);
        for line in wrap(text, chars_per_line(Font::Bold, 13.0)) {
            self.line(&line, Font::Bold, 13.0, MARGIN);
        }
        self.spacer(4.0)
    }

    pub fn paragraph(&mut self, text: &str) -> &mut Self {
        for line in wrap(text, chars_per_line(Font::Regular, 10.0)) {
            self.line(&line, Font::Regular, 10.0, MARGIN);
        }
        self
    }

    /// Monospaced block; line breaks are kept, long lines are wrapped
    pub fn code(&mut self, text: &str) -> &mut Self {
        let width = chars_per_line(Font::Mono, 8.0);
        for source in text.lines() {
            for line in hard_wrap(source, width) {
                self.line(&line, Font::Mono, 8.0, MARGIN);
            }
        }
        self
    }

    /// Equal-width columns; cells longer than their column are cut
    pub fn table(&mut self, headers: &[String], rows: &[Vec<String>]) -> &mut Self {
        let columns = headers.len().max(rows.iter().map(Vec::len).max().unwrap_or(0)).max(1);
        let column_width = CONTENT_WIDTH / columns as f64;
        let cell_chars = ((column_width / (9.0 * Font::Mono.advance())) as usize).saturating_sub(1).max(1);

        let render = |cells: &[String]| -> String {
            (0..columns)
                .map(|i| {
                    let cell = cells.get(i).map(String::as_str).unwrap_or("");
                    let cut: String = cell.chars().take(cell_chars).collect();
                    format!("{:<width$}", cut, width = cell_chars + 1)
                })
                .collect::<String>()
                .trim_end()
                .to_string()
        };

        if !headers.is_empty() {
            self.line(&render(headers), Font::Bold, 9.0, MARGIN);
        }
        for row in rows {
            self.line(&render(row), Font::Mono, 9.0, MARGIN);
        }
        self
    }

    /// Place an RGB image scaled to `width` x `height` points, left aligned
    pub fn image(&mut self, image: &RgbImage, width: f64, height: f64) -> ReportResult<&mut Self> {
        let (width, height) = if width > CONTENT_WIDTH {
            (CONTENT_WIDTH, height * CONTENT_WIDTH / width)
        } else {
            (width, height)
        };

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(image.as_raw())
            .map_err(|e| ReportError::io("<pdf image>", "compress", e))?;
        let data = encoder
            .finish()
            .map_err(|e| ReportError::io("<pdf image>", "compress", e))?;

        self.reserve(height);
        self.cursor -= height;
        let y = self.cursor;
        let page = self.page();
        let name = format!("Im{}", page.images.len() + 1);
        page.images.push(PageImage {
            width: image.width(),
            height: image.height(),
            data,
        });
        let _ = writeln!(
            page.content,
            "q {:.2} 0 0 {:.2} {:.2} {:.2} cm /{} Do Q",
            width, height, MARGIN, y, name
        );
        Ok(self)
    }

    /// Serialize the document
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut objects: Vec<Vec<u8>> = Vec::new();
        // 1 catalog, 2 page tree, 3-5 fonts
        objects.push(b"<< /Type /Catalog /Pages 2 0 R >>".to_vec());
        objects.push(Vec::new());
        for base in ["Helvetica", "Helvetica-Bold", "Courier"] {
            objects.push(
                format!("<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>", base)
                    .into_bytes(),
            );
        }

        let mut kids = Vec::new();
        for page in &self.pages {
            let page_id = objects.len() + 1;
            let content_id = page_id + 1;
            let first_image_id = content_id + 1;
            kids.push(format!("{} 0 R", page_id));

            let xobjects: String = (0..page.images.len())
                .map(|i| format!("/Im{} {} 0 R ", i + 1, first_image_id + i))
                .collect();
            objects.push(
                format!(
                    "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] /Resources << /Font << /F1 3 0 R /F2 4 0 R /F3 5 0 R >> /XObject << {}>> >> /Contents {} 0 R >>",
                    PAGE_WIDTH, PAGE_HEIGHT, xobjects, content_id
                )
                .into_bytes(),
            );
            objects.push(stream(b"", page.content.as_bytes()));

            for image in &page.images {
                let dict = format!(
                    "/Type /XObject /Subtype /Image /Width {} /Height {} /ColorSpace /DeviceRGB /BitsPerComponent 8 /Filter /FlateDecode ",
                    image.width, image.height
                );
                objects.push(stream(dict.as_bytes(), &image.data));
            }
        }
        objects[1] = format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            self.pages.len()
        )
        .into_bytes();

        let mut out = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            out.extend_from_slice(format!("{} 0 obj\n", i + 1).as_bytes());
            out.extend_from_slice(body);
            out.extend_from_slice(b"\nendobj\n");
        }

        let xref = out.len();
        let mut table = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for offset in offsets {
            let _ = write!(table, "{:010} 00000 n \n", offset);
        }
        let _ = write!(
            table,
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref
        );
        out.extend_from_slice(table.as_bytes());
        out
    }

    pub fn save(&self, path: &Path) -> ReportResult<()> {
        write_artifact(path, self.to_bytes())?;
        tracing::debug!(path = %path.display(), pages = self.pages.len(), "PDF written");
        Ok(())
    }
}

fn stream(dict_entries: &[u8], data: &[u8]) -> Vec<u8> {
    let mut body = b"<< ".to_vec();
    body.extend_from_slice(dict_entries);
    body.extend_from_slice(format!("/Length {} >>\nstream\n", data.len()).as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(b"\nendstream");
    body
}

fn chars_per_line(font: Font, size: f64) -> usize {
    ((CONTENT_WIDTH / (size * font.advance())) as usize).max(1)
}

/// WinAnsi code for characters outside ASCII, if the encoding has one
fn win_ansi(ch: char) -> Option<u8> {
    let code = match ch {
        '\u{a0}'..='\u{ff}' => ch as u32 as u8,
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8a,
        '‹' => 0x8b,
        'Œ' => 0x8c,
        'Ž' => 0x8e,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9a,
        '›' => 0x9b,
        'œ' => 0x9c,
        'ž' => 0x9e,
        'Ÿ' => 0x9f,
        _ => return None,
    };
    Some(code)
}

/// PDF string literal body in WinAnsi: `\`, `(` and `)` escaped, bytes
/// above ASCII as octal escapes
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' | '(' | ')' => {
                out.push('\\');
                out.push(ch);
            }
            '\t' => out.push_str("    "),
            ' '..='~' => out.push(ch),
            _ => match win_ansi(ch) {
                Some(code) => {
                    let _ = write!(out, "\\{:03o}", code);
                }
                None => out.push('?'),
            },
        }
    }
    out
}

/// Greedy word wrap
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > width {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        lines.extend(hard_wrap(&line, width));
    }
    lines
}

/// Split every `width` characters; an empty line stays one empty line
fn hard_wrap(line: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    if chars.is_empty() {
        return vec![String::new()];
    }
    chars.chunks(width.max(1)).map(|c| c.iter().collect()).collect()
}
