pub mod pdftotext;

use crate::error::LensError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, warn};

/// Separator placed between pages when the document text is concatenated.
pub const PAGE_SEPARATOR: &str = "\n\n";

/// Rectangle in page units (points for selectable text, pixels for OCR).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

impl BBox {
    /// Smallest box containing both `self` and `other`.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x_min: self.x_min.min(other.x_min),
            y_min: self.y_min.min(other.y_min),
            x_max: self.x_max.max(other.x_max),
            y_max: self.y_max.max(other.y_max),
        }
    }
}

/// A positioned run of text. Fragments on the same visual line share `line_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    pub text: String,
    pub bbox: BBox,
    pub line_id: usize,
}

/// Text and layout of a single page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    /// 1-based page number.
    pub page_number: usize,
    pub width: f32,
    pub height: f32,
    pub fragments: Vec<TextFragment>,
    pub raw_text: String,
}

/// Fragments of one visual line, in reading order.
#[derive(Debug, Clone)]
pub struct LineGroup<'a> {
    pub line_id: usize,
    pub fragments: Vec<&'a TextFragment>,
}

impl LineGroup<'_> {
    /// Fragment texts joined with single spaces.
    pub fn text(&self) -> String {
        self.fragments
            .iter()
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Union of all fragment boxes on the line.
    pub fn bbox(&self) -> Option<BBox> {
        let mut iter = self.fragments.iter();
        let first = iter.next()?.bbox;
        Some(iter.fold(first, |acc, f| acc.union(&f.bbox)))
    }
}

impl PageLayout {
    /// Group fragments by `line_id`, ordered by first appearance.
    pub fn lines(&self) -> Vec<LineGroup<'_>> {
        let mut groups: Vec<LineGroup<'_>> = Vec::new();
        for fragment in &self.fragments {
            match groups.iter_mut().find(|g| g.line_id == fragment.line_id) {
                Some(group) => group.fragments.push(fragment),
                None => groups.push(LineGroup {
                    line_id: fragment.line_id,
                    fragments: vec![fragment],
                }),
            }
        }
        groups
    }

    /// Number of characters in the page text once surrounding whitespace is trimmed.
    pub fn text_len(&self) -> usize {
        self.raw_text.trim().chars().count()
    }
}

/// Outcome of selectable-text extraction.
///
/// A broken or unreadable PDF is not an error for the pipeline; it is reported
/// as `Failed` so the caller can still try OCR.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// At least one page carries text.
    Text {
        text: String,
        layouts: Vec<PageLayout>,
    },
    /// The document opened fine but has no selectable text.
    Empty { layouts: Vec<PageLayout> },
    /// The document could not be opened or parsed.
    Failed { reason: String },
}

impl Extraction {
    /// Concatenated text and page layouts (empty for `Failed`).
    pub fn into_parts(self) -> (String, Vec<PageLayout>) {
        match self {
            Extraction::Text { text, layouts } => (text, layouts),
            Extraction::Empty { layouts } => (String::new(), layouts),
            Extraction::Failed { .. } => (String::new(), Vec::new()),
        }
    }
}

/// Trait for selectable-text extraction backends.
pub trait TextExtractor: Send + Sync {
    /// Extract one `PageLayout` per page of the PDF at `pdf_path`.
    fn extract_pages(&self, pdf_path: &Path) -> Result<Vec<PageLayout>, LensError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Run `extractor` and classify the result into an [`Extraction`].
pub fn extract_document(extractor: &dyn TextExtractor, pdf_path: &Path) -> Extraction {
    match extractor.extract_pages(pdf_path) {
        Ok(layouts) => {
            let text = join_pages(&layouts);
            debug!(
                backend = extractor.backend_name(),
                pages = layouts.len(),
                chars = text.len(),
                "selectable text extracted"
            );
            if text.trim().is_empty() {
                Extraction::Empty { layouts }
            } else {
                Extraction::Text { text, layouts }
            }
        }
        Err(e) => {
            warn!(
                backend = extractor.backend_name(),
                path = %pdf_path.display(),
                "text extraction failed: {e}"
            );
            Extraction::Failed {
                reason: e.to_string(),
            }
        }
    }
}

/// Join the raw text of all pages with [`PAGE_SEPARATOR`].
pub fn join_pages(layouts: &[PageLayout]) -> String {
    layouts
        .iter()
        .map(|l| l.raw_text.as_str())
        .collect::<Vec<_>>()
        .join(PAGE_SEPARATOR)
}

/// Combine selectable and OCR layouts, ordered by page.
///
/// Both versions of a page are kept; the selectable one comes first, so a
/// lookup in order prefers it and only falls through to the OCR layout
/// when the text is missing there.
pub fn merge_layouts(selectable: Vec<PageLayout>, ocr: Vec<PageLayout>) -> Vec<PageLayout> {
    let mut merged = selectable;
    merged.extend(ocr);
    // stable: selectable stays ahead of OCR within a page
    merged.sort_by_key(|p| p.page_number);
    merged
}

/// Number of distinct pages among `layouts`.
pub fn page_count(layouts: &[PageLayout]) -> usize {
    layouts
        .iter()
        .map(|l| l.page_number)
        .collect::<BTreeSet<_>>()
        .len()
}

pub(crate) fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(text: &str, line_id: usize, x: f32) -> TextFragment {
        TextFragment {
            text: text.to_string(),
            bbox: BBox {
                x_min: x,
                y_min: 10.0,
                x_max: x + 20.0,
                y_max: 20.0,
            },
            line_id,
        }
    }

    fn page(number: usize, text: &str) -> PageLayout {
        PageLayout {
            page_number: number,
            width: 612.0,
            height: 792.0,
            fragments: vec![],
            raw_text: text.to_string(),
        }
    }

    struct FailingExtractor;

    impl TextExtractor for FailingExtractor {
        fn extract_pages(&self, _pdf_path: &Path) -> Result<Vec<PageLayout>, LensError> {
            Err(LensError::Extraction("not a PDF".into()))
        }

        fn backend_name(&self) -> &str {
            "failing"
        }
    }

    struct FixedExtractor(Vec<PageLayout>);

    impl TextExtractor for FixedExtractor {
        fn extract_pages(&self, _pdf_path: &Path) -> Result<Vec<PageLayout>, LensError> {
            Ok(self.0.clone())
        }

        fn backend_name(&self) -> &str {
            "fixed"
        }
    }

    #[test]
    fn test_lines_group_by_line_id_in_order() {
        let mut layout = page(1, "");
        layout.fragments = vec![
            fragment("Global", 0, 10.0),
            fragment("Reporting", 0, 40.0),
            fragment("Initiative", 1, 10.0),
        ];
        let lines = layout.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), "Global Reporting");
        let bbox = lines[0].bbox().unwrap();
        assert_eq!(bbox.x_min, 10.0);
        assert_eq!(bbox.x_max, 60.0);
    }

    #[test]
    fn test_failed_extraction_is_not_an_error() {
        let outcome = extract_document(&FailingExtractor, Path::new("broken.pdf"));
        assert!(matches!(outcome, Extraction::Failed { .. }));
        let (text, layouts) = outcome.into_parts();
        assert!(text.is_empty());
        assert!(layouts.is_empty());
    }

    #[test]
    fn test_blank_pages_are_empty_not_failed() {
        let extractor = FixedExtractor(vec![page(1, "  \n "), page(2, "")]);
        let outcome = extract_document(&extractor, Path::new("scan.pdf"));
        match outcome {
            Extraction::Empty { layouts } => assert_eq!(layouts.len(), 2),
            other => panic!("expected Empty, got {other:?}"),
        }
    }

    #[test]
    fn test_text_pages_joined_with_separator() {
        let extractor = FixedExtractor(vec![page(1, "First page"), page(2, "Second page")]);
        match extract_document(&extractor, Path::new("doc.pdf")) {
            Extraction::Text { text, .. } => assert_eq!(text, "First page\n\nSecond page"),
            other => panic!("expected Text, got {other:?}"),
        }
    }

    #[test]
    fn test_merge_keeps_both_versions_selectable_first() {
        let selectable = vec![page(1, "Cover"), page(2, "")];
        let ocr = vec![page(1, "C0ver page with more noisy text"), page(2, "Scanned body text")];
        let merged = merge_layouts(selectable, ocr);
        let texts: Vec<(usize, &str)> = merged
            .iter()
            .map(|p| (p.page_number, p.raw_text.as_str()))
            .collect();
        assert_eq!(
            texts,
            vec![
                (1, "Cover"),
                (1, "C0ver page with more noisy text"),
                (2, ""),
                (2, "Scanned body text"),
            ]
        );
        assert_eq!(page_count(&merged), 2);
    }

    #[test]
    fn test_page_count_of_nothing_is_zero() {
        assert_eq!(page_count(&[]), 0);
    }
}
