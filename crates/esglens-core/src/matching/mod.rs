pub mod similarity;

use crate::catalog::{FrameworkCatalog, FrameworkEntry};
use crate::PipelineOptions;
use similarity::{PartialRatio, Similarity};
use tracing::debug;

/// How a framework's evidence sentence was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// A keyword occurs verbatim (case-insensitive) in the sentence.
    Exact,
    /// A keyword scored above the fuzzy threshold against the sentence.
    Fuzzy,
}

/// The single best evidence sentence for one framework.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameworkHit<'c> {
    pub entry: &'c FrameworkEntry,
    /// Sentence as segmented from the document.
    pub evidence: String,
    /// Keyword that produced the hit.
    pub keyword: String,
    pub confidence: f64,
    pub kind: MatchKind,
}

/// Finds at most one evidence sentence per catalog framework.
pub struct Matcher<'c> {
    catalog: &'c FrameworkCatalog,
    options: PipelineOptions,
    similarity: Box<dyn Similarity>,
}

impl<'c> Matcher<'c> {
    pub fn new(catalog: &'c FrameworkCatalog, options: &PipelineOptions) -> Self {
        Self::with_similarity(catalog, options, Box::new(PartialRatio))
    }

    pub fn with_similarity(
        catalog: &'c FrameworkCatalog,
        options: &PipelineOptions,
        similarity: Box<dyn Similarity>,
    ) -> Self {
        Matcher {
            catalog,
            options: options.clone(),
            similarity,
        }
    }

    /// Match every framework in catalog order. Frameworks without a
    /// qualifying sentence are left out.
    pub fn find_hits(&self, sentences: &[String]) -> Vec<FrameworkHit<'c>> {
        let lowered: Vec<String> = sentences.iter().map(|s| s.to_lowercase()).collect();
        self.catalog
            .entries
            .iter()
            .filter_map(|entry| self.match_framework(entry, sentences, &lowered))
            .collect()
    }

    /// Exact pass over all sentences first; the fuzzy pass only runs when no
    /// sentence contains any keyword. The first qualifying sentence wins.
    fn match_framework(
        &self,
        entry: &'c FrameworkEntry,
        sentences: &[String],
        lowered: &[String],
    ) -> Option<FrameworkHit<'c>> {
        let hit = self
            .exact_hit(entry, sentences, lowered)
            .or_else(|| self.fuzzy_hit(entry, sentences, lowered));

        if let Some(ref h) = hit {
            debug!(
                framework = %entry.name,
                keyword = %h.keyword,
                confidence = h.confidence,
                kind = ?h.kind,
                "framework matched"
            );
        }
        hit
    }

    fn exact_hit(
        &self,
        entry: &'c FrameworkEntry,
        sentences: &[String],
        lowered: &[String],
    ) -> Option<FrameworkHit<'c>> {
        sentences.iter().zip(lowered).find_map(|(sentence, lower)| {
            let keyword = entry.keywords.iter().find(|kw| lower.contains(kw.as_str()))?;
            Some(FrameworkHit {
                entry,
                evidence: sentence.clone(),
                keyword: keyword.clone(),
                confidence: self.exact_confidence(keyword),
                kind: MatchKind::Exact,
            })
        })
    }

    fn fuzzy_hit(
        &self,
        entry: &'c FrameworkEntry,
        sentences: &[String],
        lowered: &[String],
    ) -> Option<FrameworkHit<'c>> {
        sentences.iter().zip(lowered).find_map(|(sentence, lower)| {
            entry.keywords.iter().find_map(|kw| {
                let score = self.similarity.score(kw, lower);
                (score > self.options.fuzzy_threshold).then(|| FrameworkHit {
                    entry,
                    evidence: sentence.clone(),
                    keyword: kw.clone(),
                    confidence: score.min(self.options.fuzzy_cap),
                    kind: MatchKind::Fuzzy,
                })
            })
        })
    }

    /// Longer keywords are more specific, so they score higher.
    fn exact_confidence(&self, keyword: &str) -> f64 {
        if keyword.chars().count() > self.options.long_keyword_len {
            self.options.exact_long_confidence
        } else {
            self.options.exact_short_confidence
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::parse_catalog_str;
    use crate::categorize::Categorizer;

    fn catalog() -> FrameworkCatalog {
        let json = r#"{
            "name": "Test",
            "version": "1.0",
            "frameworks": [
                { "name": "Science Based Targets initiative",
                  "keywords": ["science based targets", "sbti"] },
                { "name": "Sustainability Accounting Standards Board",
                  "keywords": ["sasb", "sustainability accounting standards"] },
                { "name": "Forest Stewardship Council",
                  "keywords": ["fsc", "forest stewardship council"] }
            ]
        }"#;
        FrameworkCatalog::from_def(&parse_catalog_str(json).unwrap(), &Categorizer::default())
    }

    fn sentences(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    /// Scores every keyword/sentence pair the same.
    struct FixedScore(f64);

    impl Similarity for FixedScore {
        fn score(&self, _keyword: &str, _sentence: &str) -> f64 {
            self.0
        }
    }

    #[test]
    fn test_long_keyword_scores_95() {
        let catalog = catalog();
        let matcher = Matcher::new(&catalog, &PipelineOptions::default());
        let hits = matcher.find_hits(&sentences(&[
            "We have set Science Based Targets for our operations",
        ]));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].entry.name, "Science Based Targets initiative");
        assert_eq!(hits[0].confidence, 95.0);
        assert_eq!(hits[0].kind, MatchKind::Exact);
    }

    #[test]
    fn test_short_keyword_scores_85() {
        let catalog = catalog();
        let matcher = Matcher::new(&catalog, &PipelineOptions::default());
        let hits =
            matcher.find_hits(&sentences(&["Our targets were validated by the SBTi in 2021"]));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].keyword, "sbti");
        assert_eq!(hits[0].confidence, 85.0);
    }

    #[test]
    fn test_first_keyword_in_catalog_order_wins_within_sentence() {
        let catalog = catalog();
        let matcher = Matcher::new(&catalog, &PipelineOptions::default());
        let hits = matcher.find_hits(&sentences(&[
            "The SBTi approved our science based targets last year",
        ]));
        assert_eq!(hits[0].keyword, "science based targets");
        assert_eq!(hits[0].confidence, 95.0);
    }

    #[test]
    fn test_first_matching_sentence_is_evidence() {
        let catalog = catalog();
        let matcher = Matcher::new(&catalog, &PipelineOptions::default());
        let hits = matcher.find_hits(&sentences(&[
            "Packaging is sourced from FSC certified suppliers",
            "All paper carries the Forest Stewardship Council label",
        ]));
        assert_eq!(hits.len(), 1);
        assert_eq!(
            hits[0].evidence,
            "Packaging is sourced from FSC certified suppliers"
        );
        assert_eq!(hits[0].confidence, 85.0);
    }

    #[test]
    fn test_at_most_one_hit_per_framework_in_catalog_order() {
        let catalog = catalog();
        let matcher = Matcher::new(&catalog, &PipelineOptions::default());
        let hits = matcher.find_hits(&sentences(&[
            "Packaging is sourced from FSC certified suppliers",
            "We disclose against SASB metrics for apparel",
            "We also disclose against the SASB standards for retail",
        ]));
        let names: Vec<&str> = hits.iter().map(|h| h.entry.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Sustainability Accounting Standards Board",
                "Forest Stewardship Council"
            ]
        );
    }

    #[test]
    fn test_fuzzy_confidence_is_capped_at_90() {
        let catalog = catalog();
        let matcher = Matcher::with_similarity(
            &catalog,
            &PipelineOptions::default(),
            Box::new(FixedScore(97.0)),
        );
        let hits = matcher.find_hits(&sentences(&["Nothing here names a framework directly"]));
        assert_eq!(hits.len(), 3);
        assert!(hits.iter().all(|h| h.kind == MatchKind::Fuzzy));
        assert!(hits.iter().all(|h| h.confidence == 90.0));
    }

    #[test]
    fn test_fuzzy_score_below_cap_is_kept() {
        let catalog = catalog();
        let matcher = Matcher::with_similarity(
            &catalog,
            &PipelineOptions::default(),
            Box::new(FixedScore(82.0)),
        );
        let hits = matcher.find_hits(&sentences(&["Nothing here names a framework directly"]));
        let sasb = hits
            .iter()
            .find(|h| h.entry.name == "Sustainability Accounting Standards Board")
            .unwrap();
        assert_eq!(sasb.confidence, 82.0);
        assert_eq!(sasb.keyword, "sasb");
    }

    #[test]
    fn test_fuzzy_threshold_is_exclusive() {
        let catalog = catalog();
        let matcher = Matcher::with_similarity(
            &catalog,
            &PipelineOptions::default(),
            Box::new(FixedScore(80.0)),
        );
        assert!(matcher
            .find_hits(&sentences(&["Nothing here names a framework directly"]))
            .is_empty());
    }

    #[test]
    fn test_exact_hit_anywhere_beats_earlier_fuzzy_candidate() {
        let catalog = catalog();
        let matcher = Matcher::with_similarity(
            &catalog,
            &PipelineOptions::default(),
            Box::new(FixedScore(99.0)),
        );
        let hits = matcher.find_hits(&sentences(&[
            "An opening sentence without framework names",
            "Later we mention the sbti validation explicitly",
        ]));
        let sbti = hits
            .iter()
            .find(|h| h.entry.name == "Science Based Targets initiative")
            .unwrap();
        assert_eq!(sbti.kind, MatchKind::Exact);
        assert_eq!(sbti.evidence, "Later we mention the sbti validation explicitly");
    }

    #[test]
    fn test_typo_matches_fuzzily_with_default_similarity() {
        let catalog = catalog();
        let matcher = Matcher::new(&catalog, &PipelineOptions::default());
        let hits = matcher.find_hits(&sentences(&[
            "Our paper is certified by the Forest Stewardshp Council",
        ]));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].kind, MatchKind::Fuzzy);
        assert!(hits[0].confidence > 80.0 && hits[0].confidence <= 90.0);
    }

    #[test]
    fn test_keyword_fused_into_a_word_matches_builtin_gri() {
        let catalog = FrameworkCatalog::builtin().unwrap();
        let matcher = Matcher::new(&catalog, &PipelineOptions::default());
        let hits = matcher.find_hits(&sentences(&[
            "Our report references the ungri standard every year",
        ]));
        let gri = hits
            .iter()
            .find(|h| h.entry.name == "Global Reporting Initiative")
            .expect("GRI hit");
        assert_eq!(gri.kind, MatchKind::Fuzzy);
        assert_eq!(gri.keyword, "gri standards");
        assert_eq!(gri.confidence, 90.0);
    }

    #[test]
    fn test_no_sentences_no_hits() {
        let catalog = catalog();
        let matcher = Matcher::new(&catalog, &PipelineOptions::default());
        assert!(matcher.find_hits(&[]).is_empty());
    }
}
