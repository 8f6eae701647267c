use std::collections::HashMap;

/// Scores how well a keyword appears inside a sentence, 0-100.
pub trait Similarity: Send + Sync {
    fn score(&self, keyword: &str, sentence: &str) -> f64;
}

/// Best Indel ratio of the shorter string against every same-sized window
/// of the longer one, plus the shorter windows at either end.
#[derive(Debug, Clone, Copy, Default)]
pub struct PartialRatio;

impl Similarity for PartialRatio {
    fn score(&self, keyword: &str, sentence: &str) -> f64 {
        partial_ratio(keyword, sentence)
    }
}

/// Indel similarity of two whole strings: `2 * LCS / (len_a + len_b)` as a
/// percentage. Two empty strings are identical.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() && b.is_empty() {
        return 100.0;
    }
    indel_ratio(lcs_len(&a, &b), a.len(), b.len())
}

/// Partial similarity, 0-100.
///
/// The shorter string is aligned at every character offset of the longer
/// one. Windows hanging over either end of the longer string are scored at
/// their truncated length.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    if a.len() == b.len() {
        return best_alignment(&a, &b).max(best_alignment(&b, &a));
    }
    if a.len() < b.len() {
        best_alignment(&a, &b)
    } else {
        best_alignment(&b, &a)
    }
}

/// Highest ratio of `needle` against the windows of `haystack`.
/// `needle` must not be longer than `haystack`.
fn best_alignment(needle: &[char], haystack: &[char]) -> f64 {
    let m = needle.len();
    let n = haystack.len();
    let pattern = BitPattern::new(needle);
    let lcs = |window: &[char]| match &pattern {
        Some(p) => p.lcs_len(window),
        None => lcs_len(needle, window),
    };

    let mut best: f64 = 0.0;
    let mut consider = |window: &[char]| {
        best = best.max(indel_ratio(lcs(window), m, window.len()));
    };

    for k in 1..m {
        consider(&haystack[..k]);
        consider(&haystack[n - k..]);
    }
    for start in 0..=n - m {
        consider(&haystack[start..start + m]);
    }
    best
}

fn indel_ratio(lcs: usize, len_a: usize, len_b: usize) -> f64 {
    200.0 * lcs as f64 / (len_a + len_b) as f64
}

/// Match masks for bit-parallel LCS over patterns of at most 64 chars.
struct BitPattern {
    masks: HashMap<char, u64>,
    len: usize,
}

impl BitPattern {
    fn new(pattern: &[char]) -> Option<BitPattern> {
        if pattern.is_empty() || pattern.len() > 64 {
            return None;
        }
        let mut masks: HashMap<char, u64> = HashMap::new();
        for (i, c) in pattern.iter().enumerate() {
            *masks.entry(*c).or_insert(0) |= 1 << i;
        }
        Some(BitPattern {
            masks,
            len: pattern.len(),
        })
    }

    /// Length of the longest common subsequence with `text`.
    fn lcs_len(&self, text: &[char]) -> usize {
        let all = if self.len == 64 {
            u64::MAX
        } else {
            (1u64 << self.len) - 1
        };
        let mut s = all;
        for c in text {
            let m = self.masks.get(c).copied().unwrap_or(0);
            let u = s & m;
            s = (s.wrapping_add(u) | s.wrapping_sub(u)) & all;
        }
        self.len - s.count_ones() as usize
    }
}

/// Row-by-row LCS for patterns too long for a single word.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut cur = vec![0usize; b.len() + 1];
    for ca in a {
        for (j, cb) in b.iter().enumerate() {
            cur[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(cur[j])
            };
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_contained_scores_100() {
        assert_eq!(partial_ratio("tcfd", "we support the tcfd recommendations"), 100.0);
    }

    #[test]
    fn test_argument_order_does_not_matter() {
        let s = "we report under the gri standrads every year";
        assert_eq!(partial_ratio("gri standards", s), partial_ratio(s, "gri standards"));
    }

    #[test]
    fn test_keyword_aligned_inside_a_word() {
        // best window is "gri standard " starting mid-word in "ungri"
        let score = partial_ratio(
            "gri standards",
            "our report references the ungri standard every year",
        );
        assert!((score - 1200.0 / 13.0).abs() < 1e-9, "score was {score}");
    }

    #[test]
    fn test_keyword_cut_off_at_sentence_end() {
        // suffix window "sas": 2 * 3 / (4 + 3)
        let score = partial_ratio("sasb", "in the appendix we map our metrics to sas");
        assert!((score - 600.0 / 7.0).abs() < 1e-9, "score was {score}");
    }

    #[test]
    fn test_transposition_scores_high() {
        let score = partial_ratio("gri standards", "we report under the gri standrads every year");
        assert!(score > 90.0, "score was {score}");
    }

    #[test]
    fn test_missing_character_scores_high() {
        let score = partial_ratio(
            "forest stewardship council",
            "packaging certified by the forest stewardshp council",
        );
        assert!(score > 90.0, "score was {score}");
    }

    #[test]
    fn test_unrelated_text_scores_low() {
        let score = partial_ratio("sasb", "our employees volunteered in local communities");
        assert!(score <= 80.0, "score was {score}");
    }

    #[test]
    fn test_ratio_is_indel_based() {
        // one substitution costs two indel edits: 2 * 3 / 8
        assert_eq!(ratio("abcd", "abce"), 75.0);
        assert_eq!(ratio("", ""), 100.0);
    }

    #[test]
    fn test_bit_parallel_lcs_agrees_with_table() {
        let pattern = chars("sustainability accounting");
        let bits = BitPattern::new(&pattern).unwrap();
        for text in ["sustainable accounting", "accounting for sustainability", "xyz", ""] {
            let text = chars(text);
            assert_eq!(bits.lcs_len(&text), lcs_len(&pattern, &text));
        }
    }

    #[test]
    fn test_long_needle_uses_table_lcs() {
        let needle = "a".repeat(70);
        let haystack = format!("{}b{}", "a".repeat(35), "a".repeat(40));
        // every 70-char window holds the "b": 2 * 69 / 140
        let score = partial_ratio(&needle, &haystack);
        assert!((score - 6900.0 / 70.0).abs() < 1e-9, "score was {score}");
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(partial_ratio("", "anything"), 0.0);
    }
}
