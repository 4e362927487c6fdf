//! Minimal paginated (PDF 1.4) rendering of a tutorial.
//!
//! Uses the standard Helvetica faces so no fonts are embedded. Line breaks
//! and page breaks are computed from estimated glyph widths and line
//! heights; nothing time- or random-dependent is written, so the same
//! tutorial always yields the same bytes.

use std::fmt::Write as _;

use crate::tutorial::TutorialResponse;

// A4 in millimetres.
const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 15.0;
const PT_PER_MM: f32 = 72.0 / 25.4;

const BLACK: [u8; 3] = [0, 0, 0];
const RED: [u8; 3] = [200, 0, 0];

#[derive(Debug, Clone, Copy, PartialEq)]
enum Face {
    Regular,
    Bold,
}

impl Face {
    fn resource(self) -> &'static str {
        match self {
            Face::Regular => "F1",
            Face::Bold => "F2",
        }
    }

    /// Average advance width as a fraction of the font size.
    fn avg_advance(self) -> f32 {
        match self {
            Face::Regular => 0.50,
            Face::Bold => 0.55,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Style {
    face: Face,
    size: f32,
    color: [u8; 3],
}

const TITLE: Style = Style { face: Face::Bold, size: 22.0, color: BLACK };
const WARNING_HEADER: Style = Style { face: Face::Bold, size: 16.0, color: RED };
const SECTION_HEADER: Style = Style { face: Face::Bold, size: 16.0, color: BLACK };
const STEP_TITLE: Style = Style { face: Face::Bold, size: 12.0, color: BLACK };
const BODY: Style = Style { face: Face::Regular, size: 11.0, color: BLACK };

const BODY_LINE: f32 = 5.0;
const STEP_TITLE_LINE: f32 = 6.0;

impl Style {
    fn char_width_mm(self) -> f32 {
        self.size * self.face.avg_advance() / PT_PER_MM
    }

    fn chars_per_line(self, width_mm: f32) -> usize {
        ((width_mm / self.char_width_mm()).floor() as usize).max(1)
    }
}

#[derive(Debug, Clone)]
struct TextRun {
    x: f32,
    y: f32,
    style: Style,
    text: String,
}

struct Layout {
    pages: Vec<Vec<TextRun>>,
    y: f32,
}

impl Layout {
    fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            y: MARGIN,
        }
    }

    fn new_page(&mut self) {
        self.pages.push(Vec::new());
        self.y = MARGIN;
    }

    /// Start a new page unless `height` more millimetres fit on this one.
    fn ensure_room(&mut self, height: f32) {
        if self.y + height > PAGE_HEIGHT - MARGIN {
            self.new_page();
        }
    }

    fn put(&mut self, x: f32, style: Style, text: &str) {
        let run = TextRun {
            x,
            y: self.y,
            style,
            text: text.to_string(),
        };
        if let Some(page) = self.pages.last_mut() {
            page.push(run);
        }
    }

    /// Only a block taller than a whole page spills over mid-block.
    fn put_lines(&mut self, lines: &[String], style: Style, line_height: f32) {
        for line in lines {
            if self.y > PAGE_HEIGHT - MARGIN {
                self.new_page();
            }
            self.put(MARGIN, style, line);
            self.y += line_height;
        }
    }
}

/// Greedy word wrap on estimated character counts. Explicit newlines are
/// kept; words longer than a line are split.
fn wrap(text: &str, style: Style) -> Vec<String> {
    let max = style.chars_per_line(PAGE_WIDTH - MARGIN * 2.0);
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut len = 0usize;
        for word in paragraph.split_whitespace() {
            let mut chars: Vec<char> = word.chars().collect();
            while chars.len() > max {
                if len > 0 {
                    lines.push(std::mem::take(&mut line));
                    len = 0;
                }
                let rest = chars.split_off(max);
                lines.push(chars.into_iter().collect());
                chars = rest;
            }
            let wlen = chars.len();
            if len > 0 && len + 1 + wlen > max {
                lines.push(std::mem::take(&mut line));
                len = 0;
            }
            if len > 0 {
                line.push(' ');
                len += 1;
            }
            line.extend(chars);
            len += wlen;
        }
        lines.push(line);
    }
    lines
}

fn lay_out(response: &TutorialResponse) -> Vec<Vec<TextRun>> {
    let mut layout = Layout::new();

    let title = "PC Upgrade Guide";
    let title_width = title.chars().count() as f32 * TITLE.char_width_mm();
    layout.put((PAGE_WIDTH - title_width) / 2.0, TITLE, title);
    layout.y += 15.0;

    if !response.warnings.is_empty() {
        layout.put(MARGIN, WARNING_HEADER, "Compatibility Warnings");
        layout.y += 8.0;
        for warning in &response.warnings {
            let lines = wrap(&format!("\u{2022} {warning}"), BODY);
            layout.ensure_room(lines.len() as f32 * BODY_LINE + 2.0);
            layout.put_lines(&lines, BODY, BODY_LINE);
            layout.y += 2.0;
        }
        layout.y += 10.0;
    }

    layout.ensure_room(10.0);
    layout.put(MARGIN, SECTION_HEADER, "Upgrade Steps");
    layout.y += 10.0;

    for item in &response.tutorial {
        let title_lines = wrap(&format!("{}. {}", item.step, item.title), STEP_TITLE);
        let detail_lines = wrap(&item.details, BODY);
        let title_height = title_lines.len() as f32 * STEP_TITLE_LINE;
        let block = title_height + detail_lines.len() as f32 * BODY_LINE + 5.0;
        // A step that fits on one page is never split; a longer one starts
        // with its title and first detail line together.
        if block <= PAGE_HEIGHT - MARGIN * 2.0 {
            layout.ensure_room(block);
        } else {
            layout.ensure_room(title_height + BODY_LINE);
        }
        layout.put_lines(&title_lines, STEP_TITLE, STEP_TITLE_LINE);
        layout.put_lines(&detail_lines, BODY, BODY_LINE);
        layout.y += 3.0;
    }

    layout.pages
}

/// Encode text as a WinAnsi PDF string literal body.
fn escape(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '\\' | '(' | ')' => {
                out.push('\\');
                out.push(ch);
            }
            '\t' => out.push(' '),
            ' '..='~' => out.push(ch),
            _ => match win_ansi(ch) {
                Some(code) => {
                    let _ = write!(out, "\\{code:03o}");
                }
                None => out.push('?'),
            },
        }
    }
}

fn win_ansi(ch: char) -> Option<u8> {
    match ch {
        '\u{20ac}' => Some(0x80),
        '\u{2026}' => Some(0x85),
        '\u{2018}' => Some(0x91),
        '\u{2019}' => Some(0x92),
        '\u{201c}' => Some(0x93),
        '\u{201d}' => Some(0x94),
        '\u{2022}' => Some(0x95),
        '\u{2013}' => Some(0x96),
        '\u{2014}' => Some(0x97),
        '\u{2122}' => Some(0x99),
        '\u{a0}'..='\u{ff}' => Some(ch as u8),
        _ => None,
    }
}

fn content_stream(runs: &[TextRun]) -> String {
    let mut s = String::new();
    for run in runs {
        let [r, g, b] = run.style.color;
        let _ = write!(
            s,
            "BT /{} {:.1} Tf {:.3} {:.3} {:.3} rg {:.2} {:.2} Td (",
            run.style.face.resource(),
            run.style.size,
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            run.x * PT_PER_MM,
            (PAGE_HEIGHT - run.y) * PT_PER_MM,
        );
        escape(&run.text, &mut s);
        s.push_str(") Tj ET\n");
    }
    s
}

struct PdfWriter {
    buf: Vec<u8>,
    offsets: Vec<usize>,
}

impl PdfWriter {
    fn new() -> Self {
        let mut buf = Vec::with_capacity(4096);
        buf.extend_from_slice(b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n");
        Self {
            buf,
            offsets: Vec::new(),
        }
    }

    /// Objects must be added in id order starting at 1.
    fn object(&mut self, body: &str) {
        self.offsets.push(self.buf.len());
        let id = self.offsets.len();
        self.buf.extend_from_slice(format!("{id} 0 obj\n{body}\nendobj\n").as_bytes());
    }

    fn stream(&mut self, content: &str) {
        self.object(&format!(
            "<< /Length {} >>\nstream\n{content}endstream",
            content.len()
        ));
    }

    fn finish(mut self) -> Vec<u8> {
        let xref = self.buf.len();
        let count = self.offsets.len() + 1;
        let mut tail = format!("xref\n0 {count}\n0000000000 65535 f \n");
        for offset in &self.offsets {
            let _ = write!(tail, "{offset:010} 00000 n \n");
        }
        let _ = write!(
            tail,
            "trailer\n<< /Size {count} /Root 1 0 R >>\nstartxref\n{xref}\n%%EOF\n"
        );
        self.buf.extend_from_slice(tail.as_bytes());
        self.buf
    }
}

/// Render a tutorial as a PDF document.
pub fn render_pdf(response: &TutorialResponse) -> Vec<u8> {
    let pages = lay_out(response);

    // 1 catalog, 2 page tree, 3-4 fonts, then (page, contents) pairs.
    let page_ids: Vec<usize> = (0..pages.len()).map(|i| 5 + i * 2).collect();
    let kids = page_ids
        .iter()
        .map(|id| format!("{id} 0 R"))
        .collect::<Vec<_>>()
        .join(" ");

    let mut pdf = PdfWriter::new();
    pdf.object("<< /Type /Catalog /Pages 2 0 R >>");
    pdf.object(&format!("<< /Type /Pages /Kids [{kids}] /Count {} >>", pages.len()));
    pdf.object("<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>");
    pdf.object("<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>");

    let media_box = format!(
        "[0 0 {:.2} {:.2}]",
        PAGE_WIDTH * PT_PER_MM,
        PAGE_HEIGHT * PT_PER_MM
    );
    for (page, id) in pages.iter().zip(&page_ids) {
        pdf.object(&format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox {media_box} \
/Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>",
            id + 1
        ));
        pdf.stream(&content_stream(page));
    }

    pdf.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tutorial::TutorialStep;

    fn tutorial(steps: usize, details: &str) -> TutorialResponse {
        TutorialResponse {
            warnings: vec![],
            tutorial: (1..=steps)
                .map(|n| TutorialStep {
                    step: n as u32,
                    title: format!("Step title {n}"),
                    details: details.to_string(),
                })
                .collect(),
        }
    }

    fn page_count(pdf: &[u8]) -> usize {
        String::from_utf8_lossy(pdf).matches("/Type /Page /Parent").count()
    }

    #[test]
    fn produces_well_formed_envelope() {
        let pdf = render_pdf(&tutorial(2, "Unplug the PC and ground yourself."));
        assert!(pdf.starts_with(b"%PDF-1.4"));
        assert!(pdf.ends_with(b"%%EOF\n"));
        assert_eq!(page_count(&pdf), 1);
    }

    #[test]
    fn startxref_points_at_xref_table() {
        let pdf = render_pdf(&tutorial(3, "details"));
        let text = String::from_utf8_lossy(&pdf).to_string();
        let tail = &text[text.rfind("startxref\n").unwrap() + "startxref\n".len()..];
        let offset: usize = tail.lines().next().unwrap().parse().unwrap();
        assert!(pdf[offset..].starts_with(b"xref\n"));
    }

    #[test]
    fn object_offsets_are_exact() {
        let pdf = render_pdf(&tutorial(1, "x"));
        let text = String::from_utf8_lossy(&pdf).to_string();
        let xref = text.find("xref\n0 ").unwrap();
        let entries: Vec<usize> = text[xref..]
            .lines()
            .skip(3)
            .take_while(|l| l.ends_with(" n "))
            .map(|l| l[..10].parse().unwrap())
            .collect();
        for (i, offset) in entries.iter().enumerate() {
            let expected = format!("{} 0 obj", i + 1);
            assert!(pdf[*offset..].starts_with(expected.as_bytes()));
        }
    }

    #[test]
    fn long_tutorials_paginate() {
        let details = "Carefully remove the component and set it aside on an anti-static surface. ".repeat(6);
        let pdf = render_pdf(&tutorial(25, &details));
        assert!(page_count(&pdf) > 1);
    }

    /// Page index of each run, in layout order.
    fn placed(response: &TutorialResponse) -> Vec<(usize, TextRun)> {
        lay_out(response)
            .into_iter()
            .enumerate()
            .flat_map(|(page, runs)| runs.into_iter().map(move |run| (page, run)))
            .collect()
    }

    fn is_step_title(run: &TextRun) -> bool {
        run.style.face == Face::Bold && run.style.size == STEP_TITLE.size
    }

    #[test]
    fn step_titles_stay_with_their_details() {
        // Detail blocks of varying height push titles toward the page foot.
        let response = TutorialResponse {
            warnings: vec![],
            tutorial: (1..=30)
                .map(|n| TutorialStep {
                    step: n,
                    title: format!("Step title {n}"),
                    details: "Reseat the cable and check the latch. ".repeat(2 + (n as usize * 3) % 9),
                })
                .collect(),
        };
        let runs = placed(&response);
        assert!(runs.last().map(|(page, _)| *page).unwrap_or(0) > 1);

        let mut titles = 0;
        for (i, (page, run)) in runs.iter().enumerate() {
            if !is_step_title(run) {
                continue;
            }
            titles += 1;
            let (detail_page, detail) = &runs[i + 1];
            assert!(!is_step_title(detail));
            assert_eq!(page, detail_page, "title {:?} split from its details", run.text);
        }
        assert_eq!(titles, 30);
    }

    #[test]
    fn oversized_step_spills_but_starts_together() {
        let details = "Route every cable behind the motherboard tray before closing the case. ".repeat(120);
        let response = tutorial(2, &details);
        let runs = placed(&response);
        let starts: Vec<usize> = runs
            .iter()
            .enumerate()
            .filter(|(_, (_, run))| is_step_title(run))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(starts.len(), 2);
        for i in starts {
            assert_eq!(runs[i].0, runs[i + 1].0);
        }
    }

    #[test]
    fn warnings_are_red() {
        let mut response = tutorial(1, "x");
        assert!(!String::from_utf8_lossy(&render_pdf(&response)).contains("0.784 0.000 0.000 rg"));
        response.warnings.push("Check PSU wattage".into());
        let text = String::from_utf8_lossy(&render_pdf(&response)).to_string();
        assert!(text.contains("0.784 0.000 0.000 rg"));
        assert!(text.contains("(\\225 Check PSU wattage)"));
    }

    #[test]
    fn output_is_deterministic() {
        let response = tutorial(4, "Seat the RAM until the clips click.");
        assert_eq!(render_pdf(&response), render_pdf(&response));
    }

    #[test]
    fn escapes_string_delimiters() {
        let mut out = String::new();
        escape("Clip (PCIe) \\ 90°", &mut out);
        assert_eq!(out, "Clip \\(PCIe\\) \\\\ 90\\260");
    }

    #[test]
    fn wrap_respects_width_and_newlines() {
        let max = BODY.chars_per_line(PAGE_WIDTH - MARGIN * 2.0);
        let text = format!("{}\nsecond", "word ".repeat(60));
        let lines = wrap(&text, BODY);
        assert!(lines.iter().all(|l| l.chars().count() <= max));
        assert_eq!(lines.last().map(String::as_str), Some("second"));

        let long = "x".repeat(max * 2 + 3);
        let lines = wrap(&long, BODY);
        assert_eq!(lines.len(), 3);
    }
}
