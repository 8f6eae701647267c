use crate::model::Category;

const ENVIRONMENTAL_KEYWORDS: &[&str] = &[
    "climate",
    "carbon",
    "environmental",
    "emission",
    "energy",
    "waste",
    "water",
    "forest",
    "chemical",
    "pollution",
    "circular",
];

const SOCIAL_KEYWORDS: &[&str] = &[
    "labor",
    "social",
    "human rights",
    "fair",
    "worker",
    "community",
    "diversity",
    "health",
    "safety",
    "supply chain",
];

const GOVERNANCE_KEYWORDS: &[&str] = &[
    "governance",
    "reporting",
    "disclosure",
    "compliance",
    "standards",
    "ethics",
    "transparency",
    "accountability",
    "risk management",
];

/// Assigns an ESG category to a framework from the words in its name.
#[derive(Debug, Clone)]
pub struct Categorizer {
    environmental: Vec<String>,
    social: Vec<String>,
    governance: Vec<String>,
}

impl Default for Categorizer {
    fn default() -> Self {
        let owned = |kws: &[&str]| -> Vec<String> { kws.iter().map(|s| s.to_string()).collect() };
        Categorizer {
            environmental: owned(ENVIRONMENTAL_KEYWORDS),
            social: owned(SOCIAL_KEYWORDS),
            governance: owned(GOVERNANCE_KEYWORDS),
        }
    }
}

impl Categorizer {
    /// Per-category keyword hit counts for `name`: (environmental, social, governance).
    pub fn scores(&self, name: &str) -> (usize, usize, usize) {
        let lower = name.to_lowercase();
        (
            hits(&self.environmental, &lower),
            hits(&self.social, &lower),
            hits(&self.governance, &lower),
        )
    }

    /// Highest-scoring category. Ties go to Environmental, then Social.
    pub fn categorize(&self, name: &str) -> Category {
        let (env, social, gov) = self.scores(name);
        if env >= social && env >= gov {
            Category::Environmental
        } else if social >= gov {
            Category::Social
        } else {
            Category::Governance
        }
    }
}

fn hits(keywords: &[String], lower_name: &str) -> usize {
    keywords
        .iter()
        .filter(|kw| lower_name.contains(kw.as_str()))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_keywords_defaults_to_environmental() {
        let c = Categorizer::default();
        assert_eq!(c.scores("Science Based Targets initiative"), (0, 0, 0));
        assert_eq!(
            c.categorize("Science Based Targets initiative"),
            Category::Environmental
        );
    }

    #[test]
    fn test_social_framework() {
        let c = Categorizer::default();
        assert_eq!(c.categorize("Fair Labor Association"), Category::Social);
        assert_eq!(
            c.categorize("Social & Labor Convergence Program"),
            Category::Social
        );
    }

    #[test]
    fn test_governance_framework() {
        let c = Categorizer::default();
        assert_eq!(c.categorize("Global Reporting Initiative"), Category::Governance);
        assert_eq!(
            c.categorize("Sustainability Accounting Standards Board"),
            Category::Governance
        );
    }

    #[test]
    fn test_environment_wins_three_way_tie() {
        let c = Categorizer::default();
        // one hit in each set
        assert_eq!(c.scores("Carbon Labor Reporting"), (1, 1, 1));
        assert_eq!(c.categorize("Carbon Labor Reporting"), Category::Environmental);
    }

    #[test]
    fn test_social_wins_tie_with_governance() {
        let c = Categorizer::default();
        assert_eq!(c.scores("Worker Ethics Code"), (0, 1, 1));
        assert_eq!(c.categorize("Worker Ethics Code"), Category::Social);
    }

    #[test]
    fn test_environment_wins_tie_with_governance() {
        let c = Categorizer::default();
        assert_eq!(
            c.categorize("Task Force on Climate-related Financial Disclosures"),
            Category::Environmental
        );
        assert_eq!(c.categorize("Carbon Disclosure Project"), Category::Environmental);
    }
}
