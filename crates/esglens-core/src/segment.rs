/// Minimum trimmed length (in characters) for a candidate evidence sentence.
pub const MIN_SENTENCE_LEN: usize = 20;

fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// Split document text into candidate evidence sentences.
///
/// Splits on runs of `.`, `!` and `?`, trims each piece and drops pieces
/// shorter than `min_len` characters. Document order is preserved.
pub fn split_sentences(text: &str, min_len: usize) -> Vec<String> {
    text.split(is_terminal)
        .map(str::trim)
        .filter(|s| s.chars().count() >= min_len)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_on_terminal_punctuation_runs() {
        let text = "We report under the GRI Standards framework!!! Do we also follow SASB guidance?? \
                    Yes... We publish a TCFD aligned climate report.";
        let sentences = split_sentences(text, MIN_SENTENCE_LEN);
        assert_eq!(
            sentences,
            vec![
                "We report under the GRI Standards framework",
                "Do we also follow SASB guidance",
                "We publish a TCFD aligned climate report",
            ]
        );
    }

    #[test]
    fn test_short_fragments_dropped() {
        // 19 characters after trimming
        let text = "   short sentence here   . exactly twenty chars!";
        let sentences = split_sentences(text, MIN_SENTENCE_LEN);
        assert_eq!(sentences, vec!["exactly twenty chars"]);
    }

    #[test]
    fn test_keeps_internal_newlines() {
        let text = "Our facilities are certified\nto ISO 14001 standards.";
        let sentences = split_sentences(text, MIN_SENTENCE_LEN);
        assert_eq!(sentences.len(), 1);
        assert!(sentences[0].contains('\n'));
    }

    #[test]
    fn test_empty_text() {
        assert!(split_sentences("", MIN_SENTENCE_LEN).is_empty());
    }
}
