use chrono::Local;
use esglens_core::error::LensError;
use esglens_core::export::{export_filename, ExportDocument};
use std::path::PathBuf;

pub fn run(results_file: PathBuf, out: Option<PathBuf>) -> Result<(), LensError> {
    let result = esglens_core::load_result(&results_file)?;
    let now = Local::now();
    let document = ExportDocument::from_result(&result, now);
    let json = serde_json::to_string_pretty(&document)?;

    let target = match out {
        Some(path) if path.is_dir() => path.join(export_filename(&result.document_name, now)),
        Some(path) => path,
        None => {
            println!("{json}");
            return Ok(());
        }
    };

    std::fs::write(&target, json)?;
    eprintln!(
        "Exported {} initiative(s) to {}",
        document.summary.total_initiatives,
        target.display()
    );
    Ok(())
}
