use crate::model::Category;
use serde::{Deserialize, Serialize};

/// A catalog of ESG frameworks as stored in JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogDef {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    /// Matched in this order.
    pub frameworks: Vec<FrameworkDef>,
}

/// A single framework within a catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameworkDef {
    pub name: String,
    /// Phrases that indicate the framework, most specific first.
    pub keywords: Vec<String>,
    /// Overrides the name-based category when set.
    #[serde(default)]
    pub category: Option<Category>,
    /// May contain `{framework}`, replaced by the framework name.
    #[serde(default)]
    pub description: Option<String>,
}
