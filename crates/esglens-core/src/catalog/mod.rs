pub mod builtin;
pub mod schema;

use crate::categorize::Categorizer;
use crate::error::LensError;
use crate::model::Category;
use schema::CatalogDef;
use std::collections::HashSet;
use std::path::Path;

/// Description used for frameworks that do not provide one.
pub const DEFAULT_DESCRIPTION_TEMPLATE: &str =
    "Implementation of {framework} standards and practices in sustainability operations.";

/// A framework ready for matching.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameworkEntry {
    pub name: String,
    /// Lowercase, in matching order.
    pub keywords: Vec<String>,
    pub category: Category,
    pub description: String,
}

/// Immutable set of frameworks, built once and shared by reference.
#[derive(Debug, Clone)]
pub struct FrameworkCatalog {
    pub name: String,
    pub version: String,
    pub entries: Vec<FrameworkEntry>,
}

impl FrameworkCatalog {
    /// Build a catalog from a validated definition. Frameworks without an
    /// explicit category are categorized by name.
    pub fn from_def(def: &CatalogDef, categorizer: &Categorizer) -> FrameworkCatalog {
        let entries = def
            .frameworks
            .iter()
            .map(|fw| FrameworkEntry {
                name: fw.name.clone(),
                keywords: fw.keywords.iter().map(|k| k.trim().to_lowercase()).collect(),
                category: fw
                    .category
                    .unwrap_or_else(|| categorizer.categorize(&fw.name)),
                description: render_description(
                    fw.description.as_deref().unwrap_or(DEFAULT_DESCRIPTION_TEMPLATE),
                    &fw.name,
                ),
            })
            .collect();

        FrameworkCatalog {
            name: def.name.clone(),
            version: def.version.clone(),
            entries,
        }
    }

    /// The catalog shipped with the crate.
    pub fn builtin() -> Result<FrameworkCatalog, LensError> {
        let def = builtin::load_builtin()?;
        Ok(FrameworkCatalog::from_def(&def, &Categorizer::default()))
    }

    /// Load, validate and build a catalog from a JSON file.
    pub fn from_file(path: &Path) -> Result<FrameworkCatalog, LensError> {
        let def = load_catalog(path)?;
        Ok(FrameworkCatalog::from_def(&def, &Categorizer::default()))
    }

    pub fn get(&self, name: &str) -> Option<&FrameworkEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn render_description(template: &str, framework: &str) -> String {
    template.replace("{framework}", framework)
}

/// Load a catalog definition from a JSON file.
pub fn load_catalog(path: &Path) -> Result<CatalogDef, LensError> {
    let content = std::fs::read_to_string(path).map_err(|e| LensError::CatalogLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_catalog(&content, path)
}

/// Parse a catalog definition from a JSON string.
pub fn parse_catalog(json: &str, source: &Path) -> Result<CatalogDef, LensError> {
    let def: CatalogDef = serde_json::from_str(json).map_err(|e| LensError::CatalogLoad {
        path: source.to_path_buf(),
        reason: e.to_string(),
    })?;
    validate_catalog(&def)?;
    Ok(def)
}

/// Parse a catalog definition from a JSON string (no file path context).
pub fn parse_catalog_str(json: &str) -> Result<CatalogDef, LensError> {
    let def: CatalogDef = serde_json::from_str(json).map_err(LensError::Json)?;
    validate_catalog(&def)?;
    Ok(def)
}

/// Validate that a catalog definition is well-formed.
pub fn validate_catalog(def: &CatalogDef) -> Result<(), LensError> {
    if def.name.trim().is_empty() {
        return Err(LensError::CatalogInvalid(
            "catalog name must not be empty".into(),
        ));
    }

    if def.frameworks.is_empty() {
        return Err(LensError::CatalogInvalid(
            "frameworks must not be empty".into(),
        ));
    }

    let mut seen = HashSet::new();
    for fw in &def.frameworks {
        if fw.name.trim().is_empty() {
            return Err(LensError::CatalogInvalid(
                "framework name must not be empty".into(),
            ));
        }

        if !seen.insert(fw.name.as_str()) {
            return Err(LensError::CatalogInvalid(format!(
                "framework '{}' is defined more than once",
                fw.name
            )));
        }

        if fw.keywords.is_empty() {
            return Err(LensError::CatalogInvalid(format!(
                "framework '{}' has no keywords",
                fw.name
            )));
        }

        if fw.keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(LensError::CatalogInvalid(format!(
                "framework '{}' has an empty keyword",
                fw.name
            )));
        }
    }

    Ok(())
}
