pub mod catalog;
pub mod categorize;
pub mod error;
pub mod export;
pub mod extraction;
pub mod locate;
pub mod matching;
pub mod model;
pub mod ocr;
pub mod segment;

use catalog::FrameworkCatalog;
use error::LensError;
use extraction::{extract_document, merge_layouts, page_count, TextExtractor, PAGE_SEPARATOR};
use matching::Matcher;
use model::{EsgMatch, ExtractionMethod, ProcessingResult, ProcessingStatus};
use ocr::{run_ocr, OcrEngine, OcrOutcome};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Tunables for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Selectable text shorter than this (trimmed, in characters) triggers OCR.
    pub ocr_min_text_len: usize,
    /// Sentences shorter than this are not considered as evidence.
    pub min_sentence_len: usize,
    /// Fuzzy scores must be strictly above this to count.
    pub fuzzy_threshold: f64,
    /// Upper bound for fuzzy confidence.
    pub fuzzy_cap: f64,
    pub exact_long_confidence: f64,
    pub exact_short_confidence: f64,
    /// Keywords longer than this many characters get `exact_long_confidence`.
    pub long_keyword_len: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        PipelineOptions {
            ocr_min_text_len: 200,
            min_sentence_len: segment::MIN_SENTENCE_LEN,
            fuzzy_threshold: 80.0,
            fuzzy_cap: 90.0,
            exact_long_confidence: 95.0,
            exact_short_confidence: 85.0,
            long_keyword_len: 10,
        }
    }
}

/// Main API entry point: find ESG framework evidence in a PDF.
///
/// Unreadable PDFs and missing OCR engines degrade the extraction method
/// instead of failing. Only errors past extraction are returned.
pub fn analyze_pdf(
    pdf_path: &Path,
    document_name: &str,
    extractor: &dyn TextExtractor,
    ocr: &dyn OcrEngine,
    catalog: &FrameworkCatalog,
    options: &PipelineOptions,
) -> Result<ProcessingResult, LensError> {
    let started = Instant::now();

    let (selectable, layouts) = extract_document(extractor, pdf_path).into_parts();
    let selectable_len = selectable.trim().chars().count();

    let (text, layouts, extraction_method) = if selectable_len >= options.ocr_min_text_len {
        (selectable, layouts, ExtractionMethod::Selectable)
    } else {
        info!(
            chars = selectable_len,
            threshold = options.ocr_min_text_len,
            "selectable text insufficient, trying OCR"
        );
        match run_ocr(ocr, pdf_path) {
            OcrOutcome::Recognized(pages) if pages.iter().any(|p| p.text_len() > 0) => {
                let ocr_text = extraction::join_pages(&pages);
                let text = if selectable.trim().is_empty() {
                    ocr_text
                } else {
                    format!("{selectable}{PAGE_SEPARATOR}{ocr_text}")
                };
                (text, merge_layouts(layouts, pages), ExtractionMethod::Ocr)
            }
            _ => (selectable, layouts, ExtractionMethod::Limited),
        }
    };

    let sentences = segment::split_sentences(&text, options.min_sentence_len);
    debug!(sentences = sentences.len(), "text segmented");

    let hits = Matcher::new(catalog, options).find_hits(&sentences);

    let mut matches: Vec<EsgMatch> = hits
        .into_iter()
        .enumerate()
        .map(|(i, hit)| {
            let evidence = hit.evidence.trim().to_string();
            let location = locate::locate(&evidence, &layouts);
            EsgMatch {
                id: (i + 1).to_string(),
                framework: hit.entry.name.clone(),
                description: hit.entry.description.clone(),
                evidence,
                page_number: location.page_number,
                confidence: hit.confidence,
                category: hit.entry.category,
                bbox: location.bbox,
            }
        })
        .collect();

    // Stable, so equal confidences keep catalog order.
    matches.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let result = ProcessingResult {
        matches,
        document_name: document_name.to_string(),
        total_pages: page_count(&layouts).max(1),
        processing_time: started.elapsed().as_secs_f64(),
        extraction_method,
        text_length: text.chars().count(),
    };
    result.validate()?;

    info!(
        document = document_name,
        matches = result.matches.len(),
        pages = result.total_pages,
        method = %result.extraction_method,
        "document analyzed"
    );
    Ok(result)
}

/// Run [`analyze_pdf`] and report the terminal status of the run.
pub fn process_document(
    pdf_path: &Path,
    document_name: &str,
    extractor: &dyn TextExtractor,
    ocr: &dyn OcrEngine,
    catalog: &FrameworkCatalog,
    options: &PipelineOptions,
) -> ProcessingStatus {
    match analyze_pdf(pdf_path, document_name, extractor, ocr, catalog, options) {
        Ok(result) => ProcessingStatus::Ready { result },
        Err(e) => {
            tracing::error!(document = document_name, "processing failed: {e}");
            ProcessingStatus::Failed {
                error: e.to_string(),
            }
        }
    }
}

/// Write a result as pretty-printed JSON.
pub fn save_result(result: &ProcessingResult, path: &Path) -> Result<(), LensError> {
    let json = serde_json::to_string_pretty(result)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Read a result document and check its invariants.
pub fn load_result(path: &Path) -> Result<ProcessingResult, LensError> {
    let content = std::fs::read_to_string(path)?;
    let result: ProcessingResult = serde_json::from_str(&content)?;
    result.validate()?;
    Ok(result)
}
