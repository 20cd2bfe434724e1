//! Line reconstruction: groups positioned PDF text runs back into visual lines.
//!
//! Items are consumed in the order the decoder emitted them. There is no sort:
//! a new line starts whenever an item's rounded baseline moves more than
//! `LINE_TOLERANCE` units away from the previous item's baseline.

use serde::{Deserialize, Serialize};

/// Maximum baseline drift (PDF units) for two items to share a line.
pub const LINE_TOLERANCE: i64 = 2;

/// A positioned text run as emitted by the PDF decoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextItem {
    pub text: String,
    pub x: f64,
    /// Baseline in PDF user space (origin bottom-left).
    pub y: f64,
}

impl TextItem {
    pub fn new(text: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            text: text.into(),
            x,
            y,
        }
    }

    /// Rounds half-way baselines up, so -10.5 becomes -10.
    fn baseline(&self) -> i64 {
        (self.y + 0.5).floor() as i64
    }
}

/// All text runs of one page, in emission order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageItems {
    /// 1-based page number.
    pub page_number: u32,
    pub items: Vec<TextItem>,
}

/// Accumulates the current line while a page is scanned.
#[derive(Default)]
struct LineBuffer {
    baseline: Option<i64>,
    line: String,
    output: String,
}

impl LineBuffer {
    fn push(&mut self, item: &TextItem) {
        let baseline = item.baseline();

        if let Some(current) = self.baseline {
            if (current - baseline).abs() > LINE_TOLERANCE {
                self.finish_line();
            }
        }

        if !item.text.trim().is_empty() {
            if !self.line.is_empty() {
                self.line.push(' ');
            }
            self.line.push_str(&item.text);
        }

        // Empty runs still move the baseline so they can split two real lines.
        self.baseline = Some(baseline);
    }

    fn finish_line(&mut self) {
        let trimmed = self.line.trim();
        if !trimmed.is_empty() {
            self.output.push_str(trimmed);
            self.output.push('\n');
        }
        self.line.clear();
    }

    fn finish(mut self) -> String {
        self.finish_line();
        self.output
    }
}

/// Reconstructs one page. Every finalized line is followed by `\n`.
pub fn reconstruct_page(items: &[TextItem]) -> String {
    let mut buffer = LineBuffer::default();
    for item in items {
        buffer.push(item);
    }
    buffer.finish()
}

/// Reconstructs a whole document, pages in ascending page-number order.
pub fn reconstruct_document(mut pages: Vec<PageItems>) -> String {
    pages.sort_by_key(|p| p.page_number);

    let text: String = pages
        .iter()
        .map(|page| reconstruct_page(&page.items))
        .collect();

    text.trim().to_string()
}
