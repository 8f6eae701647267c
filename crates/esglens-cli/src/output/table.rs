use esglens_core::export::summarize;
use esglens_core::model::ProcessingResult;

const EVIDENCE_WIDTH: usize = 90;

pub fn print(result: &ProcessingResult) {
    println!("=== {} ===\n", result.document_name);
    println!(
        "  Pages: {}  Text: {} chars via {}  Time: {:.2}s\n",
        result.total_pages, result.text_length, result.extraction_method, result.processing_time
    );

    if result.matches.is_empty() {
        println!("  No framework evidence found.\n");
        return;
    }

    let max_name = result
        .matches
        .iter()
        .map(|m| m.framework.chars().count())
        .max()
        .unwrap_or(20);

    println!(
        "  {:>5}  {:<13}  {:>4}  {:<width$}",
        "Conf",
        "Category",
        "Page",
        "Framework",
        width = max_name
    );
    println!("  {}", "-".repeat(5 + 2 + 13 + 2 + 4 + 2 + max_name));

    for m in &result.matches {
        println!(
            "  {:>5.1}  {:<13}  {:>4}  {:<width$}",
            m.confidence,
            m.category.to_string(),
            m.page_number,
            m.framework,
            width = max_name
        );
        println!("         \"{}\"", truncate(&m.evidence, EVIDENCE_WIDTH));
    }
    println!();

    let summary = summarize(result);
    let counts: Vec<String> = summary
        .category_counts
        .iter()
        .map(|(category, count)| format!("{category} {count}"))
        .collect();
    println!(
        "  {} framework(s), average confidence {}  ({})\n",
        summary.total_initiatives,
        summary.average_confidence,
        counts.join(", ")
    );
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", cut.trim_end())
}
