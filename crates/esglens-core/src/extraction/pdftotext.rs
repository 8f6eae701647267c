use crate::error::LensError;
use crate::extraction::{BBox, PageLayout, TextExtractor, TextFragment};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;

/// US Letter, used when pdftotext reports no page size.
const DEFAULT_PAGE_WIDTH: f32 = 612.0;
const DEFAULT_PAGE_HEIGHT: f32 = 792.0;

/// PDF extraction backend using pdftotext (from poppler-utils).
///
/// Runs pdftotext twice: once in reading order for the page text and once
/// with `-bbox-layout` for word positions.
pub struct PdftotextExtractor {
    binary: PathBuf,
}

impl PdftotextExtractor {
    pub fn new() -> Self {
        Self::with_binary("pdftotext")
    }

    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        PdftotextExtractor {
            binary: binary.into(),
        }
    }

    /// Check if pdftotext is available on the system.
    pub fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }

    fn run(&self, args: &[&OsStr]) -> Result<String, LensError> {
        let output = Command::new(&self.binary)
            .args(args)
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    LensError::PdftotextNotFound
                } else {
                    LensError::Extraction(format!("pdftotext failed: {}", e))
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(LensError::PdftotextFailed { code, stderr });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for PdftotextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for PdftotextExtractor {
    fn extract_pages(&self, pdf_path: &Path) -> Result<Vec<PageLayout>, LensError> {
        let stdout = OsStr::new("-");
        let text = self.run(&[pdf_path.as_os_str(), stdout])?;
        let xml = self.run(&[OsStr::new("-bbox-layout"), pdf_path.as_os_str(), stdout])?;
        let bbox_pages = parse_bbox_xml(&xml)?;

        // pdftotext ends every page with a form feed, so the last split is empty.
        let mut text_pages: Vec<&str> = text.split('\x0c').collect();
        if text_pages.last().is_some_and(|p| p.trim().is_empty()) {
            text_pages.pop();
        }

        let page_count = bbox_pages.len().max(text_pages.len());
        let layouts = (0..page_count)
            .map(|i| {
                let raw_text = text_pages.get(i).map(|s| s.to_string()).unwrap_or_default();
                match bbox_pages.get(i) {
                    Some(bp) => PageLayout {
                        page_number: i + 1,
                        width: bp.width,
                        height: bp.height,
                        fragments: bp.fragments.clone(),
                        raw_text,
                    },
                    None => PageLayout {
                        page_number: i + 1,
                        width: DEFAULT_PAGE_WIDTH,
                        height: DEFAULT_PAGE_HEIGHT,
                        fragments: Vec::new(),
                        raw_text,
                    },
                }
            })
            .collect();

        Ok(layouts)
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

#[derive(Debug, Clone)]
struct BBoxPage {
    width: f32,
    height: f32,
    fragments: Vec<TextFragment>,
}

/// Parse the XHTML written by `pdftotext -bbox-layout` into per-page word
/// fragments. Each `<line>` element gets its own line id.
fn parse_bbox_xml(xml: &str) -> Result<Vec<BBoxPage>, LensError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    reader.config_mut().check_end_names = false;

    let mut pages: Vec<BBoxPage> = Vec::new();
    let mut line_id: usize = 0;
    let mut current_word: Option<BBox> = None;
    let mut word_text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(tag)) => match tag.name().as_ref() {
                b"page" => {
                    pages.push(BBoxPage {
                        width: attr_f32(&tag, b"width").unwrap_or(DEFAULT_PAGE_WIDTH),
                        height: attr_f32(&tag, b"height").unwrap_or(DEFAULT_PAGE_HEIGHT),
                        fragments: Vec::new(),
                    });
                    line_id = 0;
                }
                b"line" => line_id += 1,
                b"word" => {
                    current_word = parse_bbox(&tag);
                    word_text.clear();
                }
                _ => {}
            },
            Ok(Event::Text(t)) => {
                if current_word.is_some() {
                    let decoded = t
                        .unescape()
                        .map_err(|e| LensError::Extraction(format!("bad bbox XML text: {e}")))?;
                    word_text.push_str(&decoded);
                }
            }
            Ok(Event::End(tag)) => {
                if tag.name().as_ref() == b"word" {
                    if let (Some(bbox), Some(page)) = (current_word.take(), pages.last_mut()) {
                        let text = word_text.trim();
                        if !text.is_empty() {
                            page.fragments.push(TextFragment {
                                text: text.to_string(),
                                bbox,
                                line_id,
                            });
                        }
                    }
                    word_text.clear();
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(LensError::Extraction(format!(
                    "failed to parse pdftotext bbox output at byte {}: {e}",
                    reader.error_position()
                )))
            }
            _ => {}
        }
    }

    Ok(pages)
}

fn attr_f32(tag: &BytesStart<'_>, name: &[u8]) -> Option<f32> {
    tag.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == name)
        .and_then(|a| a.unescape_value().ok()?.parse().ok())
}

fn parse_bbox(tag: &BytesStart<'_>) -> Option<BBox> {
    Some(BBox {
        x_min: attr_f32(tag, b"xMin")?,
        y_min: attr_f32(tag, b"yMin")?,
        x_max: attr_f32(tag, b"xMax")?,
        y_max: attr_f32(tag, b"yMax")?,
    })
}
