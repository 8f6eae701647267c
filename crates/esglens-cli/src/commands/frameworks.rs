use esglens_core::catalog::{builtin, load_catalog, FrameworkCatalog};
use esglens_core::categorize::Categorizer;
use esglens_core::error::LensError;
use esglens_core::PipelineOptions;
use std::path::Path;

pub fn list() -> Result<(), LensError> {
    let def = builtin::load_builtin()?;
    let catalog = FrameworkCatalog::from_def(&def, &Categorizer::default());

    println!("{} (v{})", catalog.name, catalog.version);
    if let Some(ref desc) = def.description {
        println!("{}", desc);
    }
    println!();

    let max_name = catalog
        .entries
        .iter()
        .map(|e| e.name.chars().count())
        .max()
        .unwrap_or(20);
    for entry in &catalog.entries {
        println!(
            "  {:<width$}  {:<13}  {} keyword(s)",
            entry.name,
            entry.category.to_string(),
            entry.keywords.len(),
            width = max_name
        );
    }
    println!();
    Ok(())
}

pub fn explain(name: &str) -> Result<(), LensError> {
    let catalog = FrameworkCatalog::builtin()?;
    let wanted = name.trim().to_lowercase();
    let entry = catalog
        .entries
        .iter()
        .find(|e| e.name.to_lowercase() == wanted)
        .ok_or_else(|| {
            let known: Vec<&str> = catalog.entries.iter().map(|e| e.name.as_str()).collect();
            LensError::CatalogInvalid(format!(
                "unknown framework '{}'. Known frameworks: {}",
                name,
                known.join(", ")
            ))
        })?;

    println!("{}\n", entry.name);
    println!("{}\n", entry.description);
    println!("Category: {}\n", entry.category);

    let (env, social, gov) = Categorizer::default().scores(&entry.name);
    println!(
        "Name keyword hits: environmental {}, social {}, governance {}\n",
        env, social, gov
    );

    let options = PipelineOptions::default();
    println!("Keywords, in matching order:\n");
    for kw in &entry.keywords {
        let tier = if kw.chars().count() > options.long_keyword_len {
            options.exact_long_confidence
        } else {
            options.exact_short_confidence
        };
        println!("  {:<40} exact match confidence {}", kw, tier);
    }
    println!();
    println!("Sentences without an exact keyword are scored by fuzzy similarity;");
    println!(
        "scores above {} count, capped at {}.\n",
        options.fuzzy_threshold, options.fuzzy_cap
    );

    Ok(())
}

pub fn schema() -> Result<(), LensError> {
    print!(
        r#"JSON Framework Catalog Schema
=============================

A catalog lists the ESG frameworks to look for. When you run
`esglens analyze`, each framework's keywords are searched for in the
sentences of the document; the first sentence that mentions one becomes
the evidence for that framework.

Top-level fields:
  name          (string, required)  Human-readable name of the catalog
  description   (string, optional)  What this catalog is for
  version       (string, required)  Version identifier (e.g., "2024.1")
  frameworks    (array, required)   Frameworks, matched in this order

Each entry in the "frameworks" array:
  name          (string, required)  Canonical framework name, unique
  keywords      (array, required)   Phrases that indicate the framework,
                                    most specific first. Matching is
                                    case-insensitive. Keywords longer than
                                    10 characters score 95 on an exact hit,
                                    shorter ones 85.
  category      (string, optional)  "Environmental", "Social" or
                                    "Governance". Omit to derive it from
                                    the words in the framework name.
  description   (string, optional)  Shown with each match. "{{framework}}"
                                    is replaced by the framework name.

Example:
{{
  "name": "Packaging frameworks",
  "version": "1.0",
  "frameworks": [
    {{
      "name": "Forest Stewardship Council",
      "keywords": ["forest stewardship council", "fsc certified", "fsc"],
      "category": "Environmental"
    }},
    {{
      "name": "How2Recycle",
      "keywords": ["how2recycle", "recycling label"],
      "description": "Products carry the {{framework}} label."
    }}
  ]
}}
"#
    );
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), LensError> {
    let def = load_catalog(file)?;
    let catalog = FrameworkCatalog::from_def(&def, &Categorizer::default());

    println!("Catalog '{}' (v{}) is valid.", catalog.name, catalog.version);
    println!("  Frameworks: {}", catalog.len());

    // Warnings, not errors
    let mut warnings = Vec::new();
    for (fw, entry) in def.frameworks.iter().zip(&catalog.entries) {
        if fw.category.is_none() {
            warnings.push(format!(
                "framework '{}' has no category, derived '{}' from its name",
                entry.name, entry.category
            ));
        }
        for kw in &entry.keywords {
            if kw.chars().count() < 4 {
                warnings.push(format!(
                    "framework '{}' keyword '{}' is very short and may match unrelated words",
                    entry.name, kw
                ));
            }
        }
        let mut seen = std::collections::HashSet::new();
        for kw in &entry.keywords {
            if !seen.insert(kw.as_str()) {
                warnings.push(format!(
                    "framework '{}' lists keyword '{}' more than once",
                    entry.name, kw
                ));
            }
        }
    }

    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in &warnings {
            println!("  - {}", w);
        }
    }

    Ok(())
}
