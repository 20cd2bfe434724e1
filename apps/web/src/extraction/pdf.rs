//! PDF decoding: turns raw PDF bytes into positioned text runs per page.
//!
//! Glyph decoding is delegated to `pdf-extract`; this module only listens to its
//! `OutputDev` callbacks and groups glyphs into runs. `pdf-extract` panics on
//! some malformed fonts, so every decode runs on the blocking pool and a panic
//! is reported as a regular decode failure.

use bytes::Bytes;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use pdf_extract::{MediaBox, OutputDev, OutputError, Transform};
use thiserror::Error;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::extraction::lines::{reconstruct_document, PageItems, TextItem};

/// Glyphs whose baselines differ by less than this belong to the same run.
const RUN_BASELINE_EPSILON: f64 = 0.01;

/// Horizontal gap, in ems, beyond which the next glyph starts a new run.
/// Kerning adjustments stay well below it; a word space in a `TJ` array
/// (typically 250 thousandths or more) does not.
const RUN_GAP_EM: f64 = 0.2;

const PROBE_TEXT: &str = "ready";

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to load PDF: {0}")]
    Load(#[from] lopdf::Error),

    #[error("failed to read PDF content: {0}")]
    Content(String),

    #[error("PDF decoder panicked")]
    Panicked,

    #[error("decoder task failed: {0}")]
    Join(String),
}

impl From<DecodeError> for AppError {
    fn from(e: DecodeError) -> Self {
        AppError::Decode(e.to_string())
    }
}

/// Handle proving the PDF backend works. Obtained once at startup through
/// [`PdfDecoder::initialize`] and injected wherever decoding is needed.
#[derive(Debug, Clone)]
pub struct PdfDecoder {
    _ready: (),
}

impl PdfDecoder {
    /// Decodes a generated probe document once. Fails instead of waiting if the
    /// backend cannot handle it.
    pub async fn initialize() -> Result<Self, DecodeError> {
        let probe = build_pdf(&[vec![(72, 720, PROBE_TEXT)]])?;
        let decoder = Self { _ready: () };
        let pages = decoder.decode(Bytes::from(probe)).await?;

        info!(
            "PDF decoder ready (probe: {} page(s), {:?})",
            pages.len(),
            reconstruct_document(pages.clone())
        );
        Ok(decoder)
    }

    #[cfg(test)]
    pub(crate) fn unchecked() -> Self {
        Self { _ready: () }
    }

    /// Decodes every page into text runs, in page order.
    pub async fn decode(&self, bytes: Bytes) -> Result<Vec<PageItems>, DecodeError> {
        let started = std::time::Instant::now();
        let size = bytes.len();

        let pages = tokio::task::spawn_blocking(move || decode_blocking(&bytes))
            .await
            .map_err(|e| {
                if e.is_panic() {
                    DecodeError::Panicked
                } else {
                    DecodeError::Join(e.to_string())
                }
            })??;

        debug!(
            "Decoded {size} byte PDF into {} page(s) in {}ms",
            pages.len(),
            started.elapsed().as_millis()
        );
        Ok(pages)
    }

    /// Decodes and reconstructs the document's plain text.
    pub async fn extract_text(&self, bytes: Bytes) -> Result<String, DecodeError> {
        let pages = self.decode(bytes).await?;
        Ok(reconstruct_document(pages))
    }
}

fn decode_blocking(bytes: &[u8]) -> Result<Vec<PageItems>, DecodeError> {
    let doc = Document::load_mem(bytes)?;
    let mut collector = RunCollector::default();
    pdf_extract::output_doc(&doc, &mut collector)
        .map_err(|e| DecodeError::Content(format!("{e:?}")))?;
    Ok(collector.finish())
}

/// Groups glyphs into runs. A run continues across word boundaries (a kerned
/// `TJ` array reports one word per string element) as long as the next glyph
/// sits on the same baseline and close to where the previous glyph ended. A
/// baseline change or a horizontal jump starts a new run.
#[derive(Default)]
struct RunCollector {
    pages: Vec<PageItems>,
    page: Option<PageItems>,
    run: Option<OpenRun>,
}

struct OpenRun {
    item: TextItem,
    /// Where the next glyph would start if it continued the run.
    pen_x: f64,
    /// Largest horizontal gap that still continues the run.
    max_gap: f64,
}

impl OpenRun {
    fn continues_with(&self, x: f64, y: f64) -> bool {
        (self.item.y - y).abs() <= RUN_BASELINE_EPSILON && (x - self.pen_x).abs() <= self.max_gap
    }
}

impl RunCollector {
    fn flush_run(&mut self) {
        if let Some(run) = self.run.take() {
            self.page
                .get_or_insert_with(PageItems::default)
                .items
                .push(run.item);
        }
    }

    fn finish(mut self) -> Vec<PageItems> {
        self.flush_run();
        if let Some(page) = self.page.take() {
            self.pages.push(page);
        }
        self.pages
    }
}

impl OutputDev for RunCollector {
    fn begin_page(
        &mut self,
        page_num: u32,
        _media_box: &MediaBox,
        _art_box: Option<(f64, f64, f64, f64)>,
    ) -> Result<(), OutputError> {
        self.page = Some(PageItems {
            page_number: page_num,
            items: Vec::new(),
        });
        Ok(())
    }

    fn end_page(&mut self) -> Result<(), OutputError> {
        self.flush_run();
        if let Some(page) = self.page.take() {
            self.pages.push(page);
        }
        Ok(())
    }

    fn output_character(
        &mut self,
        trm: &Transform,
        width: f64,
        spacing: f64,
        font_size: f64,
        char: &str,
    ) -> Result<(), OutputError> {
        let (x, y) = (trm.m31, trm.m32);
        // `trm` carries the text and CTM scaling but not the font size.
        let scale = trm.m11.hypot(trm.m12);
        let advance = (width * font_size + spacing) * scale;
        let max_gap = RUN_GAP_EM * font_size.abs() * scale;

        if let Some(run) = &self.run {
            if !run.continues_with(x, y) {
                self.flush_run();
            }
        }

        match &mut self.run {
            Some(run) => {
                run.item.text.push_str(char);
                run.pen_x = x + advance;
            }
            None => {
                self.run = Some(OpenRun {
                    item: TextItem::new(char, x, y),
                    pen_x: x + advance,
                    max_gap,
                })
            }
        }
        Ok(())
    }

    fn begin_word(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_word(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_line(&mut self) -> Result<(), OutputError> {
        Ok(())
    }
}

/// Builds a minimal Helvetica PDF. Each page is a list of `(x, y, text)` runs,
/// each drawn by its own text object.
pub fn build_pdf(pages: &[Vec<(i64, i64, &str)>]) -> Result<Vec<u8>, DecodeError> {
    let pages = pages
        .iter()
        .map(|runs| {
            runs.iter()
                .flat_map(|&(x, y, text)| {
                    text_object(x, y, Operation::new("Tj", vec![Object::string_literal(text)]))
                })
                .collect()
        })
        .collect();
    assemble_pdf(pages)
}

fn text_object(x: i64, y: i64, show: Operation) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), 12.into()]),
        Operation::new("Td", vec![Object::Integer(x), Object::Integer(y)]),
        show,
        Operation::new("ET", vec![]),
    ]
}

fn assemble_pdf(pages: Vec<Vec<Operation>>) -> Result<Vec<u8>, DecodeError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids = Vec::with_capacity(pages.len());
    for operations in pages {
        let content = Content { operations }
            .encode()
            .map_err(|e| DecodeError::Content(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|e| DecodeError::Content(e.to_string()))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_initialize_succeeds() {
        assert!(PdfDecoder::initialize().await.is_ok());
    }

    #[tokio::test]
    async fn test_garbage_bytes_fail_to_decode() {
        let decoder = PdfDecoder::unchecked();
        let result = decoder
            .extract_text(Bytes::from_static(b"this is not a pdf"))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_lines_reconstructed_from_pdf() {
        let pdf = build_pdf(&[vec![(72, 720, "Jane Doe"), (72, 690, "Experience:")]]).unwrap();
        let text = PdfDecoder::unchecked()
            .extract_text(Bytes::from(pdf))
            .await
            .unwrap();
        assert_eq!(text, "Jane Doe\nExperience:");
    }

    #[tokio::test]
    async fn test_runs_on_same_baseline_share_a_line() {
        let pdf = build_pdf(&[vec![(72, 720, "Rust"), (200, 721, "Go")]]).unwrap();
        let text = PdfDecoder::unchecked()
            .extract_text(Bytes::from(pdf))
            .await
            .unwrap();
        assert_eq!(text, "Rust Go");
    }

    #[tokio::test]
    async fn test_pages_decoded_in_order() {
        let pdf = build_pdf(&[vec![(72, 720, "first")], vec![(72, 720, "second")]]).unwrap();
        let pages = PdfDecoder::unchecked().decode(Bytes::from(pdf)).await.unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].page_number, 1);
        assert_eq!(pages[1].page_number, 2);
        assert_eq!(reconstruct_document(pages), "first\nsecond");
    }

    /// One line drawn by a single `TJ`. Numbers are kerning adjustments in
    /// thousandths of an em; strings are shown text.
    fn build_kerned_pdf(x: i64, y: i64, elements: Vec<Object>) -> Vec<u8> {
        let show = Operation::new("TJ", vec![Object::Array(elements)]);
        assemble_pdf(vec![text_object(x, y, show)]).unwrap()
    }

    #[tokio::test]
    async fn test_kerned_word_stays_whole() {
        let pdf = build_kerned_pdf(
            72,
            720,
            vec![
                Object::string_literal("W"),
                Object::Integer(80),
                Object::string_literal("orld"),
            ],
        );
        let text = PdfDecoder::unchecked()
            .extract_text(Bytes::from(pdf))
            .await
            .unwrap();
        assert_eq!(text, "World");
    }

    #[tokio::test]
    async fn test_kerned_line_keeps_word_gaps() {
        // -300 pushes the pen right by 0.3 em: a word gap, not kerning.
        let pdf = build_kerned_pdf(
            72,
            720,
            vec![
                Object::string_literal("Exp"),
                Object::Integer(15),
                Object::string_literal("erience"),
                Object::Integer(-300),
                Object::string_literal("Summary"),
            ],
        );
        let text = PdfDecoder::unchecked()
            .extract_text(Bytes::from(pdf))
            .await
            .unwrap();
        assert_eq!(text, "Experience Summary");
    }

    fn media_box() -> MediaBox {
        MediaBox {
            llx: 0.0,
            lly: 0.0,
            urx: 612.0,
            ury: 792.0,
        }
    }

    fn at(x: f64, y: f64) -> Transform {
        Transform::row_major(1.0, 0.0, 0.0, 1.0, x, y)
    }

    fn texts(pages: &[PageItems]) -> Vec<&str> {
        pages[0].items.iter().map(|i| i.text.as_str()).collect()
    }

    #[test]
    fn test_collector_splits_run_on_baseline_change() {
        let mut collector = RunCollector::default();
        collector.begin_page(1, &media_box(), None).unwrap();
        // Width 0.5 at size 12 advances the pen by 6 units.
        for (ch, x, y) in [("a", 10.0, 100.0), ("b", 16.0, 100.0), ("c", 22.0, 90.0)] {
            collector.output_character(&at(x, y), 0.5, 0.0, 12.0, ch).unwrap();
        }
        collector.end_page().unwrap();

        let pages = collector.finish();
        assert_eq!(pages.len(), 1);
        assert_eq!(texts(&pages), vec!["ab", "c"]);
        assert_eq!(pages[0].items[1].y, 90.0);
    }

    #[test]
    fn test_collector_word_boundaries_do_not_split_runs() {
        let mut collector = RunCollector::default();
        collector.begin_page(1, &media_box(), None).unwrap();
        collector.begin_word().unwrap();
        collector.output_character(&at(10.0, 100.0), 0.5, 0.0, 12.0, "x").unwrap();
        collector.end_word().unwrap();
        // Kerned back by 0.08 em.
        collector.begin_word().unwrap();
        collector.output_character(&at(15.04, 100.0), 0.5, 0.0, 12.0, "y").unwrap();
        collector.end_word().unwrap();
        collector.end_page().unwrap();

        let pages = collector.finish();
        assert_eq!(texts(&pages), vec!["xy"]);
    }

    #[test]
    fn test_collector_horizontal_jump_starts_new_run() {
        let mut collector = RunCollector::default();
        collector.begin_page(1, &media_box(), None).unwrap();
        collector.output_character(&at(10.0, 100.0), 0.5, 0.0, 12.0, "a").unwrap();
        collector.output_character(&at(200.0, 100.0), 0.5, 0.0, 12.0, "b").unwrap();
        // Jumping back to the left margin also breaks the run.
        collector.output_character(&at(10.0, 100.0), 0.5, 0.0, 12.0, "c").unwrap();
        collector.end_page().unwrap();

        let pages = collector.finish();
        assert_eq!(texts(&pages), vec!["a", "b", "c"]);
        assert_eq!(pages[0].items[1].x, 200.0);
    }
}
