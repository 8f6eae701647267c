pub mod tesseract;

use crate::error::LensError;
use crate::extraction::PageLayout;
use std::path::Path;
use tracing::{info, warn};

/// Outcome of an OCR pass over a whole document.
#[derive(Debug, Clone, PartialEq)]
pub enum OcrOutcome {
    /// One layout per rendered page.
    Recognized(Vec<PageLayout>),
    /// The engine is not installed or not configured.
    Unavailable(String),
    /// The engine ran but the pass failed.
    Failed(String),
}

/// Trait for OCR backends.
pub trait OcrEngine: Send + Sync {
    /// Rasterize every page of the PDF and recognize its text.
    ///
    /// Return `LensError::OcrUnavailable` when the engine cannot run at all.
    fn recognize_pages(&self, pdf_path: &Path) -> Result<Vec<PageLayout>, LensError>;

    /// Name of this OCR backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// OCR backend that is never available. Used when OCR is switched off.
pub struct DisabledOcr;

impl OcrEngine for DisabledOcr {
    fn recognize_pages(&self, _pdf_path: &Path) -> Result<Vec<PageLayout>, LensError> {
        Err(LensError::OcrUnavailable("OCR is disabled".into()))
    }

    fn backend_name(&self) -> &str {
        "disabled"
    }
}

/// Run `engine` over the document and classify the result into an [`OcrOutcome`].
pub fn run_ocr(engine: &dyn OcrEngine, pdf_path: &Path) -> OcrOutcome {
    match engine.recognize_pages(pdf_path) {
        Ok(pages) => {
            let chars: usize = pages.iter().map(|p| p.raw_text.len()).sum();
            info!(
                backend = engine.backend_name(),
                pages = pages.len(),
                chars,
                "OCR completed"
            );
            OcrOutcome::Recognized(pages)
        }
        Err(LensError::OcrUnavailable(reason)) => {
            warn!(
                backend = engine.backend_name(),
                "OCR unavailable, continuing with selectable text only: {reason}"
            );
            OcrOutcome::Unavailable(reason)
        }
        Err(e) => {
            warn!(backend = engine.backend_name(), "OCR failed: {e}");
            OcrOutcome::Failed(e.to_string())
        }
    }
}
