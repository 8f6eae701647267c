//! Maps an evidence sentence back to a page and an approximate region on it.
//!
//! Boxes are `[x1, y1, x2, y2]` in percent of the page size. They are meant
//! for highlighting overlays and are not pixel accurate.

use crate::extraction::{normalize_ws, PageLayout};
use tracing::debug;

/// Box used when the sentence cannot be placed.
pub const PLACEHOLDER_BBOX: [f64; 4] = [10.0, 45.0, 90.0, 55.0];

/// Minimum share of sentence words a line must contain to be used.
const LINE_OVERLAP_THRESHOLD: f64 = 0.3;
/// Padding, in percentage points, around a line-derived box.
const LINE_PADDING: f64 = 2.0;
/// Characters of the sentence used for the raw-text fallback search.
const PREFIX_CHARS: usize = 50;
const BAND_ABOVE: f64 = 3.0;
const BAND_BELOW: f64 = 8.0;
const BAND_LEFT: f64 = 5.0;
const BAND_RIGHT: f64 = 95.0;

/// Which strategy produced a location's box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxStrategy {
    /// Union of the fragments on the best-overlapping line.
    LineOverlap,
    /// Horizontal band estimated from the line offset in the page text.
    TextOffset,
    /// Fixed box near the page center.
    Placeholder,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub page_number: usize,
    pub bbox: [f64; 4],
    pub strategy: BoxStrategy,
}

impl Location {
    fn placeholder(page_number: usize) -> Self {
        Location {
            page_number,
            bbox: PLACEHOLDER_BBOX,
            strategy: BoxStrategy::Placeholder,
        }
    }
}

/// Find the first page containing `sentence` and estimate where it sits.
///
/// Falls back to page 1 with [`PLACEHOLDER_BBOX`] when no page contains it.
pub fn locate(sentence: &str, layouts: &[PageLayout]) -> Location {
    let clean = normalize_ws(sentence).to_lowercase();
    if clean.is_empty() {
        return Location::placeholder(1);
    }

    let Some(layout) = layouts
        .iter()
        .find(|l| normalize_ws(&l.raw_text).to_lowercase().contains(&clean))
    else {
        debug!("evidence not found on any page, using placeholder");
        return Location::placeholder(1);
    };

    let location = if let Some(bbox) = line_overlap_bbox(&clean, layout) {
        Location {
            page_number: layout.page_number,
            bbox,
            strategy: BoxStrategy::LineOverlap,
        }
    } else if let Some(bbox) = text_offset_bbox(&clean, layout) {
        Location {
            page_number: layout.page_number,
            bbox,
            strategy: BoxStrategy::TextOffset,
        }
    } else {
        Location::placeholder(layout.page_number)
    };

    debug!(
        page = location.page_number,
        strategy = ?location.strategy,
        "evidence located"
    );
    location
}

/// Box of the line sharing the most words with the sentence, if any line
/// contains more than 30% of them. Earlier lines win ties.
fn line_overlap_bbox(clean_lower: &str, layout: &PageLayout) -> Option<[f64; 4]> {
    if layout.width <= 0.0 || layout.height <= 0.0 {
        return None;
    }

    let words: Vec<&str> = clean_lower.split_whitespace().collect();
    if words.is_empty() {
        return None;
    }

    let mut best_score = 0.0;
    let mut best_box = None;
    for line in layout.lines() {
        let Some(bbox) = line.bbox() else {
            continue;
        };
        let line_text = normalize_ws(&line.text()).to_lowercase();
        let found = words.iter().filter(|w| line_text.contains(*w)).count();
        let score = found as f64 / words.len() as f64;
        if score > best_score && score > LINE_OVERLAP_THRESHOLD {
            best_score = score;
            best_box = Some(bbox);
        }
    }

    let bbox = best_box?;
    let width = f64::from(layout.width);
    let height = f64::from(layout.height);
    Some(percent_box(
        f64::from(bbox.x_min) / width * 100.0 - LINE_PADDING,
        f64::from(bbox.y_min) / height * 100.0 - LINE_PADDING,
        f64::from(bbox.x_max) / width * 100.0 + LINE_PADDING,
        f64::from(bbox.y_max) / height * 100.0 + LINE_PADDING,
    ))
}

/// Near-full-width band around the line where the sentence's first
/// characters appear in the page text.
fn text_offset_bbox(clean_lower: &str, layout: &PageLayout) -> Option<[f64; 4]> {
    let prefix: String = clean_lower.chars().take(PREFIX_CHARS).collect();

    // Normalize line by line, remembering where each line starts, so a match
    // offset can be turned back into a line index.
    let raw_lines: Vec<&str> = layout.raw_text.split('\n').collect();
    let mut joined = String::new();
    let mut line_starts = Vec::with_capacity(raw_lines.len());
    for line in &raw_lines {
        let norm = normalize_ws(line).to_lowercase();
        if !joined.is_empty() && !norm.is_empty() {
            joined.push(' ');
        }
        line_starts.push(joined.len());
        joined.push_str(&norm);
    }

    let offset = joined.find(&prefix)?;
    let line_index = line_starts
        .iter()
        .rposition(|&start| start <= offset)
        .unwrap_or(0);
    let estimated_y = line_index as f64 * 100.0 / raw_lines.len() as f64;

    Some(percent_box(
        BAND_LEFT,
        estimated_y - BAND_ABOVE,
        BAND_RIGHT,
        estimated_y + BAND_BELOW,
    ))
}

/// Clamp to 0-100 and order the corners.
fn percent_box(x1: f64, y1: f64, x2: f64, y2: f64) -> [f64; 4] {
    let clamp = |v: f64| if v.is_finite() { v.clamp(0.0, 100.0) } else { 0.0 };
    let (x1, x2) = (clamp(x1), clamp(x2));
    let (y1, y2) = (clamp(y1), clamp(y2));
    [x1.min(x2), y1.min(y2), x1.max(x2), y1.max(y2)]
}
