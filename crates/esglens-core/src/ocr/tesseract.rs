use crate::error::LensError;
use crate::extraction::{BBox, PageLayout, TextFragment};
use crate::ocr::OcrEngine;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// PDF user space is 72 units per inch.
const PDF_BASE_DPI: f32 = 72.0;

#[derive(Debug, Clone)]
pub struct TesseractConfig {
    /// Path to the tesseract binary (default: "tesseract", relies on PATH).
    pub tesseract_path: PathBuf,
    /// Path to poppler's pdftoppm, used to rasterize pages.
    pub pdftoppm_path: PathBuf,
    /// Language for Tesseract OCR (default: "eng").
    pub language: String,
    /// Render scale relative to the PDF's native 72 dpi.
    pub scale: f32,
}

impl Default for TesseractConfig {
    fn default() -> Self {
        Self {
            tesseract_path: PathBuf::from("tesseract"),
            pdftoppm_path: PathBuf::from("pdftoppm"),
            language: "eng".to_string(),
            scale: 2.0,
        }
    }
}

/// OCR backend: renders pages with `pdftoppm` and reads them with the
/// `tesseract` CLI in TSV mode, so recognized words keep their pixel boxes.
pub struct TesseractOcr {
    config: TesseractConfig,
}

impl TesseractOcr {
    pub fn new(config: TesseractConfig) -> Self {
        TesseractOcr { config }
    }

    /// Both the renderer and the OCR engine respond on this system.
    pub fn is_available(&self) -> bool {
        let responds = |binary: &Path, flag: &str| {
            Command::new(binary)
                .arg(flag)
                .output()
                .map(|o| o.status.success() || !o.stderr.is_empty())
                .unwrap_or(false)
        };
        responds(&self.config.tesseract_path, "--version")
            && responds(&self.config.pdftoppm_path, "-v")
    }

    fn render_pages(
        &self,
        pdf_path: &Path,
        out_dir: &Path,
    ) -> Result<Vec<(usize, PathBuf)>, LensError> {
        let dpi = (PDF_BASE_DPI * self.config.scale).round() as u32;
        let output = Command::new(&self.config.pdftoppm_path)
            .arg("-r")
            .arg(dpi.to_string())
            .arg("-png")
            .arg(pdf_path)
            .arg(out_dir.join("page"))
            .output()
            .map_err(|e| LensError::OcrUnavailable(format!("failed to run pdftoppm: {e}")))?;

        if !output.status.success() {
            return Err(LensError::Ocr(format!(
                "pdftoppm failed (exit code {}): {}",
                output.status.code().unwrap_or(-1),
                String::from_utf8_lossy(&output.stderr)
            )));
        }

        let mut images = Vec::new();
        for entry in std::fs::read_dir(out_dir)? {
            let path = entry?.path();
            if let Some(page_number) = rendered_page_number(&path) {
                images.push((page_number, path));
            }
        }
        images.sort_by_key(|(n, _)| *n);
        Ok(images)
    }

    fn recognize_image(&self, page_number: usize, image: &Path) -> Result<PageLayout, LensError> {
        let output = Command::new(&self.config.tesseract_path)
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(&self.config.language)
            .arg("tsv")
            .output()
            .map_err(|e| LensError::OcrUnavailable(format!("failed to run tesseract: {e}")))?;

        if !output.status.success() {
            return Err(LensError::Ocr(format!(
                "tesseract failed on page {} (exit code {}): {}",
                page_number,
                output.status.code().unwrap_or(-1),
                String::from_utf8_lossy(&output.stderr)
            )));
        }

        Ok(parse_tsv(page_number, &String::from_utf8_lossy(&output.stdout)))
    }
}

impl Default for TesseractOcr {
    fn default() -> Self {
        Self::new(TesseractConfig::default())
    }
}

impl OcrEngine for TesseractOcr {
    fn recognize_pages(&self, pdf_path: &Path) -> Result<Vec<PageLayout>, LensError> {
        if !self.is_available() {
            return Err(LensError::OcrUnavailable(format!(
                "tesseract ('{}') or pdftoppm ('{}') is not installed",
                self.config.tesseract_path.display(),
                self.config.pdftoppm_path.display()
            )));
        }

        let work_dir = tempfile::tempdir()?;
        let images = self.render_pages(pdf_path, work_dir.path())?;
        debug!(pages = images.len(), "rendered pages for OCR");

        images
            .iter()
            .map(|(page_number, image)| self.recognize_image(*page_number, image))
            .collect()
    }

    fn backend_name(&self) -> &str {
        "tesseract"
    }
}

/// pdftoppm names its output `page-1.png`, or `page-01.png` for longer documents.
fn rendered_page_number(path: &Path) -> Option<usize> {
    if path.extension()? != "png" {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    stem.rsplit('-').next()?.parse().ok()
}

/// Build a page layout from tesseract TSV output.
///
/// Level 1 rows carry the page size; level 5 rows are words. Words sharing
/// block, paragraph and line numbers form one visual line.
fn parse_tsv(page_number: usize, tsv: &str) -> PageLayout {
    let mut layout = PageLayout {
        page_number,
        width: 0.0,
        height: 0.0,
        fragments: Vec::new(),
        raw_text: String::new(),
    };
    let mut line_id = 0;
    let mut prev_key: Option<(u32, u32, u32)> = None;

    for row in tsv.lines().skip(1) {
        let cols: Vec<&str> = row.split('\t').collect();
        if cols.len() < 11 {
            continue;
        }
        let num = |i: usize| cols[i].trim().parse::<f32>().ok();
        let (Some(left), Some(top), Some(width), Some(height)) = (num(6), num(7), num(8), num(9))
        else {
            continue;
        };

        match cols[0].trim() {
            "1" => {
                layout.width = width;
                layout.height = height;
            }
            "5" => {
                let text = cols.get(11).map(|t| t.trim()).unwrap_or("");
                if text.is_empty() {
                    continue;
                }
                let key = (
                    cols[2].trim().parse().unwrap_or(0),
                    cols[3].trim().parse().unwrap_or(0),
                    cols[4].trim().parse().unwrap_or(0),
                );
                match prev_key {
                    Some(prev) if prev == key => layout.raw_text.push(' '),
                    Some(prev) => {
                        line_id += 1;
                        if (prev.0, prev.1) != (key.0, key.1) {
                            layout.raw_text.push_str("\n\n");
                        } else {
                            layout.raw_text.push('\n');
                        }
                    }
                    None => {}
                }
                prev_key = Some(key);
                layout.raw_text.push_str(text);
                layout.fragments.push(TextFragment {
                    text: text.to_string(),
                    bbox: BBox {
                        x_min: left,
                        y_min: top,
                        x_max: left + width,
                        y_max: top + height,
                    },
                    line_id,
                });
            }
            _ => {}
        }
    }

    layout
}
