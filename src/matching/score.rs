use crate::matching::normalize::unique_tokens;

/// Share of the matched roster name's words that the contact reproduced, in percent.
pub fn token_coverage_pct(overlap: usize, matched_name: &str) -> f64 {
    let total = unique_tokens(matched_name).len();
    if total == 0 {
        return 0.0;
    }
    100.0 * overlap.min(total) as f64 / total as f64
}

/// Blends character similarity with word coverage so that neither a
/// misspelled full name nor a well-spelled partial name scores at the extremes.
pub fn confidence_pct(overlap: usize, similarity: f64, matched_name: &str) -> f64 {
    let similarity_pct = 100.0 * similarity.clamp(0.0, 1.0);
    (similarity_pct + token_coverage_pct(overlap, matched_name)) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_scores_hundred() {
        assert_eq!(confidence_pct(2, 1.0, "JUAN PEREZ"), 100.0);
    }

    #[test]
    fn test_partial_coverage() {
        assert_eq!(token_coverage_pct(1, "ANA MARIA LOPEZ GOMEZ"), 25.0);
        assert_eq!(confidence_pct(1, 0.5, "ANA MARIA LOPEZ GOMEZ"), 37.5);
    }

    #[test]
    fn test_empty_matched_name_has_zero_coverage() {
        assert_eq!(token_coverage_pct(0, ""), 0.0);
    }

    #[test]
    fn test_confidence_bounds() {
        for (overlap, similarity, name) in [(0, 0.0, "A"), (3, 1.0, "A B C"), (5, 1.0, "A B"), (1, 0.3, "A B C D")] {
            let c = confidence_pct(overlap, similarity, name);
            assert!((0.0..=100.0).contains(&c), "confidence {}", c);
        }
    }
}
