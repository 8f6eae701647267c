use esglens_core::error::LensError;
use esglens_core::model::ProcessingResult;

pub fn print(result: &ProcessingResult) -> Result<(), LensError> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}
