use crate::error::LensError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// ESG pillar a framework belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Environmental,
    Social,
    Governance,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Environmental => write!(f, "Environmental"),
            Category::Social => write!(f, "Social"),
            Category::Governance => write!(f, "Governance"),
        }
    }
}

/// Where the analyzed text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMethod {
    /// Selectable PDF text was sufficient.
    Selectable,
    /// Selectable text was insufficient and OCR supplied text.
    Ocr,
    /// Selectable text was insufficient and OCR produced nothing.
    Limited,
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionMethod::Selectable => write!(f, "selectable"),
            ExtractionMethod::Ocr => write!(f, "ocr"),
            ExtractionMethod::Limited => write!(f, "limited"),
        }
    }
}

/// Evidence that a document discusses one ESG framework.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EsgMatch {
    /// Unique within one processing run.
    pub id: String,
    pub framework: String,
    pub description: String,
    /// The matched sentence, verbatim.
    pub evidence: String,
    /// 1-based page the evidence was located on.
    pub page_number: usize,
    /// 0-100.
    pub confidence: f64,
    pub category: Category,
    /// `[x1, y1, x2, y2]` as percentages of page width/height.
    pub bbox: [f64; 4],
}

/// Outcome of processing one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingResult {
    /// Sorted by descending confidence.
    pub matches: Vec<EsgMatch>,
    pub document_name: String,
    pub total_pages: usize,
    /// Wall-clock seconds spent processing.
    pub processing_time: f64,
    #[serde(rename = "text_extraction_method")]
    pub extraction_method: ExtractionMethod,
    /// Characters of analyzed text.
    pub text_length: usize,
}

impl ProcessingResult {
    /// Check the structural invariants of a result document.
    pub fn validate(&self) -> Result<(), LensError> {
        for pair in self.matches.windows(2) {
            if pair[0].confidence < pair[1].confidence {
                return Err(LensError::ResultsInvalid(format!(
                    "matches not sorted by confidence ({} before {})",
                    pair[0].confidence, pair[1].confidence
                )));
            }
        }

        for m in &self.matches {
            if m.page_number < 1 || m.page_number > self.total_pages {
                return Err(LensError::ResultsInvalid(format!(
                    "match '{}' is on page {} but the document has {} page(s)",
                    m.id, m.page_number, self.total_pages
                )));
            }
            if !(0.0..=100.0).contains(&m.confidence) {
                return Err(LensError::ResultsInvalid(format!(
                    "match '{}' has confidence {} outside 0-100",
                    m.id, m.confidence
                )));
            }
            let [x1, y1, x2, y2] = m.bbox;
            let in_range = |v: f64| (0.0..=100.0).contains(&v);
            let ordered = x1 <= x2 && y1 <= y2;
            if !(in_range(x1) && in_range(y1) && in_range(x2) && in_range(y2) && ordered) {
                return Err(LensError::ResultsInvalid(format!(
                    "match '{}' has malformed bbox {:?}",
                    m.id, m.bbox
                )));
            }
        }

        let mut frameworks: Vec<&str> = self.matches.iter().map(|m| m.framework.as_str()).collect();
        frameworks.sort_unstable();
        if let Some(dup) = frameworks.windows(2).find(|w| w[0] == w[1]) {
            return Err(LensError::ResultsInvalid(format!(
                "framework '{}' matched more than once",
                dup[0]
            )));
        }

        Ok(())
    }
}

/// Terminal status of a processing run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ProcessingStatus {
    Ready { result: ProcessingResult },
    Failed { error: String },
}
