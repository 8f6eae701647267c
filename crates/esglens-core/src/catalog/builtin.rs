use crate::catalog::schema::CatalogDef;
use crate::catalog::validate_catalog;
use crate::error::LensError;

const ESG_FRAMEWORKS_JSON: &str = include_str!("../../../../frameworks/esg-frameworks.json");

/// Load the builtin framework catalog definition.
pub fn load_builtin() -> Result<CatalogDef, LensError> {
    let def: CatalogDef = serde_json::from_str(ESG_FRAMEWORKS_JSON)?;
    validate_catalog(&def)?;
    Ok(def)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FrameworkCatalog;
    use crate::model::Category;

    #[test]
    fn test_load_builtin() {
        let def = load_builtin().unwrap();
        assert_eq!(def.frameworks.len(), 15);
        assert_eq!(def.frameworks[0].name, "Science Based Targets initiative");
    }

    #[test]
    fn test_builtin_keywords_are_lowercase() {
        let catalog = FrameworkCatalog::builtin().unwrap();
        for entry in &catalog.entries {
            for kw in &entry.keywords {
                assert_eq!(kw, &kw.to_lowercase(), "{}", entry.name);
            }
        }
    }

    #[test]
    fn test_builtin_categories() {
        let catalog = FrameworkCatalog::builtin().unwrap();
        let category = |name: &str| catalog.get(name).map(|e| e.category);
        assert_eq!(
            category("Science Based Targets initiative"),
            Some(Category::Environmental)
        );
        assert_eq!(category("Fair Labor Association"), Some(Category::Social));
        assert_eq!(category("Global Reporting Initiative"), Some(Category::Governance));
        assert_eq!(category("Forest Stewardship Council"), Some(Category::Environmental));
    }
}
