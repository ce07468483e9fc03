//! # Minimal PDF Writer
//!
//! Just enough of PDF 1.4 to lay out a text-and-vector report: pages with
//! content streams, the two standard Helvetica fonts, filled and stroked
//! paths, and an info dictionary. No images and no embedded fonts.
//!
//! Page coordinates are millimetres with the origin at the top-left corner,
//! the same convention the chart [`Scene`] uses. Every content stream starts
//! with a transform that maps this space onto PDF points (origin bottom-left).
//!
//! Content streams are FlateDecode-compressed unless compression is disabled.

use std::fmt::Write as _;
use std::io::Write as _;

use chrono::{DateTime, Utc};
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::chart::{Element, Paint, Path, PathCommand, Point, Rgb, Scene, TextAlign};

/// Points per millimetre
pub const MM_TO_PT: f64 = 72.0 / 25.4;

/// A4 width in millimetres
pub const A4_WIDTH_MM: f64 = 210.0;

/// A4 height in millimetres
pub const A4_HEIGHT_MM: f64 = 297.0;

/// Bézier control distance for a quarter circle
const KAPPA: f64 = 0.552_284_749_831;

/// Horizontal bands used to approximate a vertical gradient
const GRADIENT_BANDS: usize = 32;

/// Standard font face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    /// Helvetica
    Regular,
    /// Helvetica-Bold
    Bold,
}

impl Font {
    fn resource(&self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }
}

/// One page of drawing operators
#[derive(Debug, Clone)]
pub struct PdfPage {
    width: f64,
    height: f64,
    ops: String,
}

impl PdfPage {
    /// Empty page of `width` x `height` millimetres
    pub fn new(width: f64, height: f64) -> Self {
        let mut page = Self {
            width,
            height,
            ops: String::new(),
        };
        page.op(format!(
            "{} 0 0 {} 0 {} cm",
            num(MM_TO_PT),
            num(-MM_TO_PT),
            num(height * MM_TO_PT)
        ));
        page
    }

    /// Empty A4 portrait page
    pub fn a4() -> Self {
        Self::new(A4_WIDTH_MM, A4_HEIGHT_MM)
    }

    /// Page width in millimetres
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Page height in millimetres
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Raw content stream operators
    pub fn operators(&self) -> &str {
        &self.ops
    }

    fn op(&mut self, line: impl AsRef<str>) {
        self.ops.push_str(line.as_ref());
        self.ops.push('\n');
    }

    /// Set the fill color for subsequent shapes and text
    pub fn set_fill_color(&mut self, color: Rgb) {
        let (r, g, b) = color.unit_channels();
        self.op(format!("{} {} {} rg", num(r), num(g), num(b)));
    }

    /// Set the stroke color for subsequent lines
    pub fn set_stroke_color(&mut self, color: Rgb) {
        let (r, g, b) = color.unit_channels();
        self.op(format!("{} {} {} RG", num(r), num(g), num(b)));
    }

    /// Set the line width in the current user unit
    pub fn set_line_width(&mut self, width: f64) {
        self.op(format!("{} w", num(width)));
    }

    /// Filled rectangle with its top-left corner at `(x, y)`
    pub fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.op(format!("{} {} {} {} re f", num(x), num(y), num(width), num(height)));
    }

    /// Stroked rectangle with its top-left corner at `(x, y)`
    pub fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.op(format!("{} {} {} {} re S", num(x), num(y), num(width), num(height)));
    }

    /// Straight stroked line
    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.op(format!("{} {} m {} {} l S", num(x1), num(y1), num(x2), num(y2)));
    }

    /// Text with its baseline at `y`; `size` is in points
    pub fn text(&mut self, x: f64, y: f64, size: f64, font: Font, align: TextAlign, text: &str) {
        self.text_in_user_units(x, y, size / MM_TO_PT, font, align, text);
    }

    fn text_in_user_units(
        &mut self,
        x: f64,
        y: f64,
        size: f64,
        font: Font,
        align: TextAlign,
        text: &str,
    ) {
        let encoded = encode_win_ansi(text);
        let width = text_width(&encoded) * size;
        let x = match align {
            TextAlign::Start => x,
            TextAlign::Middle => x - width / 2.0,
            TextAlign::End => x - width,
        };
        self.op(format!(
            "BT /{} {} Tf 1 0 0 -1 {} {} Tm ({}) Tj ET",
            font.resource(),
            num(size),
            num(x),
            num(y),
            escape_bytes(&encoded)
        ));
    }

    /// Draw `scene` scaled uniformly to fit the box at `(x, y)`
    pub fn draw_scene(&mut self, scene: &Scene, x: f64, y: f64, width: f64, height: f64) {
        if scene.width <= 0.0 || scene.height <= 0.0 {
            return;
        }
        let scale = (width / scene.width).min(height / scene.height);

        self.op("q");
        self.op(format!("{} 0 0 {} {} {} cm", num(scale), num(scale), num(x), num(y)));
        self.set_fill_color(scene.background);
        self.fill_rect(0.0, 0.0, scene.width, scene.height);

        if !scene.plot.is_empty() {
            self.op("q");
            self.op(format!(
                "{} {} {} {} re W n",
                num(scene.clip.x),
                num(scene.clip.y),
                num(scene.clip.width),
                num(scene.clip.height)
            ));
            for element in &scene.plot {
                self.draw_element(scene, element);
            }
            self.op("Q");
        }
        for element in &scene.overlay {
            self.draw_element(scene, element);
        }
        self.op("Q");
    }

    fn draw_element(&mut self, scene: &Scene, element: &Element) {
        match element {
            Element::Path { path, fill, stroke } => {
                if let Some(Paint::VerticalGradient { .. }) = fill {
                    self.fill_gradient(scene, path, fill.as_ref());
                }
                let painted_fill = match fill {
                    Some(Paint::Solid(color)) => {
                        self.set_fill_color(*color);
                        true
                    }
                    _ => false,
                };
                if let Some(stroke) = stroke {
                    self.set_stroke_color(stroke.color);
                    self.set_line_width(stroke.width);
                }
                let paint_op = match (painted_fill, stroke.is_some()) {
                    (true, true) => "B",
                    (true, false) => "f",
                    (false, true) => "S",
                    (false, false) => return,
                };
                self.path(path);
                self.op(paint_op);
            }
            Element::Line { from, to, stroke } => {
                self.set_stroke_color(stroke.color);
                self.set_line_width(stroke.width);
                self.line(from.x, from.y, to.x, to.y);
            }
            Element::Circle {
                center,
                radius,
                fill,
                stroke,
            } => {
                self.set_fill_color(*fill);
                if let Some(stroke) = stroke {
                    self.set_stroke_color(stroke.color);
                    self.set_line_width(stroke.width);
                }
                self.path(&circle_path(*center, *radius));
                self.op(if stroke.is_some() { "B" } else { "f" });
            }
            Element::Text {
                anchor,
                text,
                size,
                color,
                align,
            } => {
                self.set_fill_color(*color);
                self.text_in_user_units(anchor.x, anchor.y, *size, Font::Regular, *align, text);
            }
        }
    }

    fn fill_gradient(&mut self, scene: &Scene, path: &Path, paint: Option<&Paint>) {
        let Some(&Paint::VerticalGradient {
            color,
            y_bottom,
            y_top,
            bottom_opacity,
            top_opacity,
        }) = paint
        else {
            return;
        };
        self.op("q");
        self.path(path);
        self.op("W n");
        let band = (y_bottom - y_top) / GRADIENT_BANDS as f64;
        for i in 0..GRADIENT_BANDS {
            let f = (i as f64 + 0.5) / GRADIENT_BANDS as f64;
            let opacity = top_opacity + (bottom_opacity - top_opacity) * f;
            self.set_fill_color(color.over(scene.background, opacity));
            // overlap bands slightly so no hairline gaps show between them
            self.fill_rect(0.0, y_top + band * i as f64, scene.width, band * 1.05);
        }
        self.op("Q");
    }

    fn path(&mut self, path: &Path) {
        let mut line = String::new();
        for cmd in path.commands() {
            match cmd {
                PathCommand::MoveTo(p) => {
                    let _ = write!(line, "{} {} m ", num(p.x), num(p.y));
                }
                PathCommand::LineTo(p) => {
                    let _ = write!(line, "{} {} l ", num(p.x), num(p.y));
                }
                PathCommand::CubicTo(c1, c2, p) => {
                    let _ = write!(
                        line,
                        "{} {} {} {} {} {} c ",
                        num(c1.x),
                        num(c1.y),
                        num(c2.x),
                        num(c2.y),
                        num(p.x),
                        num(p.y)
                    );
                }
                PathCommand::Close => line.push_str("h "),
            }
        }
        self.op(line.trim_end());
    }
}

fn circle_path(center: Point, r: f64) -> Path {
    let k = r * KAPPA;
    let (cx, cy) = (center.x, center.y);
    let mut path = Path::new();
    path.move_to(Point::new(cx + r, cy))
        .cubic_to(Point::new(cx + r, cy + k), Point::new(cx + k, cy + r), Point::new(cx, cy + r))
        .cubic_to(Point::new(cx - k, cy + r), Point::new(cx - r, cy + k), Point::new(cx - r, cy))
        .cubic_to(Point::new(cx - r, cy - k), Point::new(cx - k, cy - r), Point::new(cx, cy - r))
        .cubic_to(Point::new(cx + k, cy - r), Point::new(cx + r, cy - k), Point::new(cx + r, cy))
        .close();
    path
}

/// Document-level metadata
#[derive(Debug, Clone)]
pub struct PdfInfo {
    /// Document title
    pub title: String,
    /// Document author
    pub author: String,
    /// Subject line
    pub subject: String,
    /// Creation timestamp
    pub created: DateTime<Utc>,
}

/// Paginated document
#[derive(Debug, Clone)]
pub struct PdfDocument {
    info: PdfInfo,
    pages: Vec<PdfPage>,
    compress: bool,
}

impl PdfDocument {
    /// Empty document
    pub fn new(info: PdfInfo) -> Self {
        Self {
            info,
            pages: Vec::new(),
            compress: true,
        }
    }

    /// Enable or disable FlateDecode compression of content streams
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Append a page
    pub fn add_page(&mut self, page: PdfPage) {
        self.pages.push(page);
    }

    /// Pages in order
    pub fn pages(&self) -> &[PdfPage] {
        &self.pages
    }

    /// Mutable access to the pages, e.g. to stamp footers
    pub fn pages_mut(&mut self) -> &mut [PdfPage] {
        &mut self.pages
    }

    /// Number of pages
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Serialize the document
    pub fn to_bytes(&self) -> std::io::Result<Vec<u8>> {
        const CATALOG: usize = 1;
        const PAGES: usize = 2;
        const FONT_REGULAR: usize = 3;
        const FONT_BOLD: usize = 4;
        const INFO: usize = 5;
        const FIRST_PAGE: usize = 6;

        let mut out: Vec<u8> = Vec::new();
        out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");
        let object_count = FIRST_PAGE - 1 + self.pages.len() * 2;
        let mut offsets = vec![0usize; object_count + 1];

        let page_refs: Vec<String> = (0..self.pages.len())
            .map(|i| format!("{} 0 R", FIRST_PAGE + i * 2))
            .collect();

        write_object(&mut out, &mut offsets, CATALOG, b"<< /Type /Catalog /Pages 2 0 R >>");
        write_object(
            &mut out,
            &mut offsets,
            PAGES,
            format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>",
                page_refs.join(" "),
                self.pages.len()
            )
            .as_bytes(),
        );
        write_object(
            &mut out,
            &mut offsets,
            FONT_REGULAR,
            b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>",
        );
        write_object(
            &mut out,
            &mut offsets,
            FONT_BOLD,
            b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>",
        );

        let mut info = Vec::new();
        info.extend_from_slice(b"<< /Title (");
        info.extend_from_slice(escape_bytes(&encode_win_ansi(&self.info.title)).as_bytes());
        info.extend_from_slice(b") /Author (");
        info.extend_from_slice(escape_bytes(&encode_win_ansi(&self.info.author)).as_bytes());
        info.extend_from_slice(b") /Subject (");
        info.extend_from_slice(escape_bytes(&encode_win_ansi(&self.info.subject)).as_bytes());
        info.extend_from_slice(b") /Producer (mindsync ");
        info.extend_from_slice(env!("CARGO_PKG_VERSION").as_bytes());
        info.extend_from_slice(b") /CreationDate (D:");
        info.extend_from_slice(self.info.created.format("%Y%m%d%H%M%SZ").to_string().as_bytes());
        info.extend_from_slice(b") >>");
        write_object(&mut out, &mut offsets, INFO, &info);

        for (i, page) in self.pages.iter().enumerate() {
            let page_id = FIRST_PAGE + i * 2;
            let content_id = page_id + 1;
            write_object(
                &mut out,
                &mut offsets,
                page_id,
                format!(
                    "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
                     /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>",
                    num(page.width * MM_TO_PT),
                    num(page.height * MM_TO_PT),
                    content_id
                )
                .as_bytes(),
            );

            let (data, filter) = if self.compress {
                let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(page.ops.as_bytes())?;
                (encoder.finish()?, " /Filter /FlateDecode")
            } else {
                (page.ops.as_bytes().to_vec(), "")
            };
            let mut stream = format!("<< /Length {}{} >>\nstream\n", data.len(), filter).into_bytes();
            stream.extend_from_slice(&data);
            stream.extend_from_slice(b"\nendstream");
            write_object(&mut out, &mut offsets, content_id, &stream);
        }

        let xref_offset = out.len();
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", object_count + 1);
        for offset in &offsets[1..] {
            let _ = writeln!(xref, "{:010} 00000 n ", offset);
        }
        let _ = write!(
            xref,
            "trailer\n<< /Size {} /Root {} 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            object_count + 1,
            CATALOG,
            INFO,
            xref_offset
        );
        out.extend_from_slice(xref.as_bytes());
        Ok(out)
    }
}

fn write_object(out: &mut Vec<u8>, offsets: &mut [usize], id: usize, body: &[u8]) {
    offsets[id] = out.len();
    out.extend_from_slice(format!("{} 0 obj\n", id).as_bytes());
    out.extend_from_slice(body);
    out.extend_from_slice(b"\nendobj\n");
}

/// Format a number for a content stream
fn num(v: f64) -> String {
    let s = format!("{:.4}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" || s.is_empty() {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// Encode text for the WinAnsi-encoded standard fonts; unmappable characters become `?`
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            'µ' | 'μ' => 0xB5,
            '\u{A0}'..='\u{FF}' => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

fn escape_bytes(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len());
    for &b in bytes {
        match b {
            b'(' | b')' | b'\\' => {
                s.push('\\');
                s.push(b as char);
            }
            0x20..=0x7E => s.push(b as char),
            _ => {
                let _ = write!(s, "\\{:03o}", b);
            }
        }
    }
    s
}

/// Advance width of WinAnsi-encoded text in units of the font size (Helvetica metrics)
pub fn text_width(encoded: &[u8]) -> f64 {
    encoded.iter().map(|&b| glyph_width(b) as f64).sum::<f64>() / 1000.0
}

fn glyph_width(b: u8) -> u16 {
    match b {
        b' ' | b'!' | b',' | b'.' | b'/' | b':' | b';' | b'I' | b'[' | b'\\' | b']' | b'f'
        | b't' => 278,
        b'"' => 355,
        b'%' => 889,
        b'&' | b'A' | b'B' | b'E' | b'K' | b'P' | b'S' | b'V' | b'X' | b'Y' => 667,
        b'\'' => 191,
        b'(' | b')' | b'-' | b'`' | b'r' => 333,
        b'*' => 389,
        b'+' | b'<' | b'=' | b'>' | b'~' => 584,
        b'@' => 1015,
        b'C' | b'D' | b'H' | b'N' | b'R' | b'U' | b'w' => 722,
        b'F' | b'T' | b'Z' => 611,
        b'G' | b'O' | b'Q' => 778,
        b'J' => 500,
        b'M' | b'm' => 833,
        b'W' => 944,
        b'^' => 469,
        b'c' | b'k' | b's' | b'v' | b'x' | b'y' | b'z' => 500,
        b'i' | b'j' | b'l' => 222,
        b'{' | b'}' => 334,
        b'|' => 260,
        0x95 => 350,
        _ => 556,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> PdfInfo {
        PdfInfo {
            title: "Test".to_string(),
            author: "Jane (QA)".to_string(),
            subject: "Unit test".to_string(),
            created: Utc::now(),
        }
    }

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    #[test]
    fn test_document_structure_and_xref_offsets() {
        let mut doc = PdfDocument::new(info()).with_compression(false);
        for i in 0..3 {
            let mut page = PdfPage::a4();
            page.text(20.0, 30.0, 12.0, Font::Bold, TextAlign::Start, &format!("Page {}", i));
            doc.add_page(page);
        }
        let bytes = doc.to_bytes().unwrap();

        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(bytes.ends_with(b"%%EOF\n"));
        assert!(find(&bytes, b"/Count 3").is_some());
        assert!(find(&bytes, b"(Jane \\(QA\\))").is_some());

        let start = find(&bytes, b"startxref\n").unwrap() + b"startxref\n".len();
        let tail = std::str::from_utf8(&bytes[start..]).unwrap();
        let xref_offset: usize = tail.lines().next().unwrap().parse().unwrap();
        let xref = std::str::from_utf8(&bytes[xref_offset..]).unwrap();
        assert!(xref.starts_with("xref\n0 12\n"));

        for (id, line) in xref.lines().skip(3).take(11).enumerate() {
            let offset: usize = line[..10].parse().unwrap();
            let expected = format!("{} 0 obj", id + 1);
            assert!(bytes[offset..].starts_with(expected.as_bytes()), "object {}", id + 1);
        }
    }

    #[test]
    fn test_compressed_streams_are_smaller() {
        let mut page = PdfPage::a4();
        for i in 0..200 {
            page.line(20.0, i as f64, 190.0, i as f64);
        }
        let mut plain = PdfDocument::new(info()).with_compression(false);
        plain.add_page(page.clone());
        let mut packed = PdfDocument::new(info());
        packed.add_page(page);

        let plain = plain.to_bytes().unwrap();
        let packed = packed.to_bytes().unwrap();
        assert!(packed.len() < plain.len());
        assert!(find(&packed, b"/Filter /FlateDecode").is_some());
    }

    #[test]
    fn test_win_ansi_encoding() {
        assert_eq!(encode_win_ansi("• 12 μg/dL"), b"\x95 12 \xB5g/dL".to_vec());
        assert_eq!(encode_win_ansi("漢"), b"?".to_vec());
        assert_eq!(escape_bytes(&encode_win_ansi("a(b)\\•")), "a\\(b\\)\\\\\\225");
    }

    #[test]
    fn test_text_width_uses_helvetica_metrics() {
        assert!((text_width(b"Hello") - 2.278).abs() < 1e-9);
        assert_eq!(text_width(b""), 0.0);
    }

    #[test]
    fn test_centered_text_is_shifted_left() {
        let mut page = PdfPage::a4();
        page.text(105.0, 287.0, 10.0, Font::Regular, TextAlign::Middle, "Page 1 of 5");
        let op = page.operators().lines().last().unwrap().to_string();
        assert!(op.contains("Tm (Page 1 of 5) Tj"));
        assert!(!op.contains(" 105 287 Tm"));
    }

    #[test]
    fn test_num_formatting() {
        assert_eq!(num(1.0), "1");
        assert_eq!(num(-0.00001), "0");
        assert_eq!(num(2.83464566), "2.8346");
    }
}
