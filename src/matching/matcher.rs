use crate::matching::index::{IndexEntry, KeywordIndex};
use crate::matching::normalize::unique_tokens;
use crate::matching::similarity::ratio;
use std::collections::HashSet;

/// Best roster candidate for one contact.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub row: usize,
    pub overlap: usize,
    pub similarity: f64,
}

/// Number of distinct words two normalized names share.
pub fn token_overlap(a: &str, b: &str) -> usize {
    let left: HashSet<&str> = a.split_whitespace().collect();
    let right: HashSet<&str> = b.split_whitespace().collect();
    left.intersection(&right).count()
}

/// Candidates sharing at least one word with the query, in retrieval order:
/// query words by first appearance, each bucket in roster order, first
/// occurrence of each roster row kept.
pub fn candidates<'a>(query: &str, index: &'a KeywordIndex) -> Vec<&'a IndexEntry> {
    let mut seen: HashSet<usize> = HashSet::new();
    let mut found = Vec::new();

    for token in unique_tokens(query) {
        for entry in index.bucket(token) {
            if seen.insert(entry.row) {
                found.push(entry);
            }
        }
    }

    found
}

/// Picks the candidate with the most shared words, breaking ties by
/// character similarity. A later candidate must strictly beat the current
/// best, so the first one seen wins exact ties.
pub fn find_best_match(query: &str, index: &KeywordIndex) -> Option<Candidate> {
    if query.split_whitespace().next().is_none() {
        return None;
    }

    let mut best: Option<Candidate> = None;
    let (mut best_overlap, mut best_similarity) = (0usize, 0.0f64);

    for entry in candidates(query, index) {
        let overlap = token_overlap(query, &entry.name);
        let similarity = ratio(query, &entry.name);

        if overlap > best_overlap || (overlap == best_overlap && similarity > best_similarity) {
            best_overlap = overlap;
            best_similarity = similarity;
            best = Some(Candidate {
                row: entry.row,
                overlap,
                similarity,
            });
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::index::build_index;

    #[test]
    fn test_overlap_ties_broken_by_similarity() {
        let index = build_index(&["ANA MARIA LOPEZ", "ANA LOPEZ GOMEZ", "ANA LOPEZ"]);
        let best = find_best_match("ANA LOPEZ", &index).unwrap();
        assert_eq!(best.row, 2);
        assert_eq!(best.overlap, 2);
        assert!((best.similarity - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_equal_overlap_and_similarity_keeps_first_seen() {
        // both score overlap 2 and similarity 18/24
        let index = build_index(&["ANA MARIA LOPEZ", "ANA LOPEZ GOMEZ"]);
        let best = find_best_match("ANA LOPEZ", &index).unwrap();
        assert_eq!(best.row, 0);
        assert_eq!(best.overlap, 2);
    }

    #[test]
    fn test_higher_overlap_beats_higher_similarity() {
        let index = build_index(&["JUAN CARLOS", "JUAN CARLOS PEREZ ROJAS"]);
        let best = find_best_match("JUAN CARLOS PEREZ", &index).unwrap();
        assert_eq!(best.row, 1);
        assert_eq!(best.overlap, 3);
    }

    #[test]
    fn test_no_shared_token_is_no_match() {
        let index = build_index(&["MARIA FERNANDEZ"]);
        assert!(find_best_match("PEDRO GONZALEZ", &index).is_none());
    }

    #[test]
    fn test_empty_query_or_roster() {
        let index = build_index(&["MARIA FERNANDEZ"]);
        assert!(find_best_match("", &index).is_none());
        assert!(find_best_match("MARIA", &build_index::<&str>(&[])).is_none());
    }

    #[test]
    fn test_candidates_deduplicated_in_retrieval_order() {
        let index = build_index(&["LOPEZ ANA", "ANA GOMEZ", "PEDRO LOPEZ"]);
        let rows: Vec<usize> = candidates("ANA LOPEZ", &index).iter().map(|e| e.row).collect();
        assert_eq!(rows, vec![0, 1, 2]);
        let rows: Vec<usize> = candidates("LOPEZ ANA", &index).iter().map(|e| e.row).collect();
        assert_eq!(rows, vec![0, 2, 1]);
    }

    #[test]
    fn test_token_overlap_counts_distinct_words() {
        assert_eq!(token_overlap("ANA ANA LOPEZ", "ANA LOPEZ LOPEZ"), 2);
        assert_eq!(token_overlap("", "ANA"), 0);
    }
}
