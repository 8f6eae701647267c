use esglens_core::catalog::FrameworkCatalog;
use esglens_core::error::LensError;
use esglens_core::extraction::pdftotext::PdftotextExtractor;
use esglens_core::model::ProcessingStatus;
use esglens_core::ocr::tesseract::TesseractOcr;
use esglens_core::ocr::{DisabledOcr, OcrEngine};
use esglens_core::PipelineOptions;
use std::path::PathBuf;
use tracing::debug;

use crate::output;

pub fn run(
    input_file: PathBuf,
    output_format: &str,
    output_file: Option<PathBuf>,
    frameworks: Option<PathBuf>,
    no_ocr: bool,
) -> Result<(), LensError> {
    if !input_file.is_file() {
        return Err(LensError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} does not exist", input_file.display()),
        )));
    }

    let catalog = match frameworks {
        Some(path) => FrameworkCatalog::from_file(&path)?,
        None => FrameworkCatalog::builtin()?,
    };
    debug!(
        catalog = %catalog.name,
        version = %catalog.version,
        frameworks = catalog.len(),
        "framework catalog loaded"
    );

    let extractor = PdftotextExtractor::new();
    let ocr: Box<dyn OcrEngine> = if no_ocr {
        Box::new(DisabledOcr)
    } else {
        Box::new(TesseractOcr::default())
    };

    let document_name = input_file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| input_file.display().to_string());

    let status = esglens_core::process_document(
        &input_file,
        &document_name,
        &extractor,
        ocr.as_ref(),
        &catalog,
        &PipelineOptions::default(),
    );
    let result = match status {
        ProcessingStatus::Ready { result } => result,
        ProcessingStatus::Failed { error } => return Err(LensError::ProcessingFailed(error)),
    };

    match output_file {
        Some(path) => {
            esglens_core::save_result(&result, &path)?;
            eprintln!(
                "Found {} framework(s) in {}, written to {}",
                result.matches.len(),
                result.document_name,
                path.display()
            );
        }
        None => match output_format {
            "json" => output::json::print(&result)?,
            _ => output::table::print(&result),
        },
    }

    Ok(())
}
