use crate::model::{Category, ExtractionMethod, ProcessingResult};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One matched framework in the export document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportInitiative {
    pub id: String,
    pub framework: String,
    pub description: String,
    pub evidence: String,
    pub page_number: usize,
    pub confidence: f64,
    pub category: Category,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSummary {
    pub total_initiatives: usize,
    /// Mean confidence rounded half to even; 0 without matches.
    pub average_confidence: f64,
    pub category_counts: BTreeMap<Category, usize>,
}

/// Downloadable analysis document with camelCase keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub document_name: String,
    pub total_pages: usize,
    pub processing_time: f64,
    pub extraction_method: ExtractionMethod,
    pub text_length: usize,
    pub initiatives: Vec<ExportInitiative>,
    pub summary: ExportSummary,
    pub exported_at: String,
}

impl ExportDocument {
    pub fn from_result(result: &ProcessingResult, exported_at: DateTime<Local>) -> Self {
        let initiatives = result
            .matches
            .iter()
            .map(|m| ExportInitiative {
                id: m.id.clone(),
                framework: m.framework.clone(),
                description: m.description.clone(),
                evidence: m.evidence.clone(),
                page_number: m.page_number,
                confidence: m.confidence,
                category: m.category,
            })
            .collect();

        ExportDocument {
            document_name: result.document_name.clone(),
            total_pages: result.total_pages,
            processing_time: result.processing_time,
            extraction_method: result.extraction_method,
            text_length: result.text_length,
            initiatives,
            summary: summarize(result),
            exported_at: exported_at.to_rfc3339(),
        }
    }
}

/// Aggregate counts for a result.
pub fn summarize(result: &ProcessingResult) -> ExportSummary {
    let total = result.matches.len();
    let average_confidence = if total == 0 {
        0.0
    } else {
        let sum: f64 = result.matches.iter().map(|m| m.confidence).sum();
        (sum / total as f64).round_ties_even()
    };

    let mut category_counts = BTreeMap::new();
    for m in &result.matches {
        *category_counts.entry(m.category).or_insert(0) += 1;
    }

    ExportSummary {
        total_initiatives: total,
        average_confidence,
        category_counts,
    }
}

/// `esg_analysis_{name}_{timestamp}.json`, with every non-alphanumeric
/// character of the document name replaced by `_`.
pub fn export_filename(document_name: &str, at: DateTime<Local>) -> String {
    let safe: String = document_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect::<String>()
        .to_lowercase();
    format!("esg_analysis_{}_{}.json", safe, at.format("%Y%m%d_%H%M%S"))
}
