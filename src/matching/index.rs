use crate::matching::normalize::unique_tokens;
use std::collections::HashMap;

/// A roster row reachable through one of its name tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub row: usize,
    pub name: String,
}

/// Inverted index from name token to the roster rows containing it.
///
/// Buckets keep roster order so candidate retrieval is deterministic.
/// Built once per run and only read afterwards.
#[derive(Debug, Clone, Default)]
pub struct KeywordIndex {
    buckets: HashMap<String, Vec<IndexEntry>>,
}

impl KeywordIndex {
    pub fn bucket(&self, token: &str) -> &[IndexEntry] {
        self.buckets.get(token).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn token_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Builds the index from already-normalized roster names, in roster order.
pub fn build_index<S: AsRef<str>>(normalized_names: &[S]) -> KeywordIndex {
    let mut buckets: HashMap<String, Vec<IndexEntry>> = HashMap::new();

    for (row, name) in normalized_names.iter().enumerate() {
        let name = name.as_ref();
        for token in unique_tokens(name) {
            buckets.entry(token.to_string()).or_default().push(IndexEntry {
                row,
                name: name.to_string(),
            });
        }
    }

    KeywordIndex { buckets }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buckets_preserve_roster_order() {
        let index = build_index(&["ANA LOPEZ", "PEDRO LOPEZ", "ANA GOMEZ"]);
        let rows: Vec<usize> = index.bucket("LOPEZ").iter().map(|e| e.row).collect();
        assert_eq!(rows, vec![0, 1]);
        let rows: Vec<usize> = index.bucket("ANA").iter().map(|e| e.row).collect();
        assert_eq!(rows, vec![0, 2]);
        assert_eq!(index.token_count(), 4);
    }

    #[test]
    fn test_repeated_word_indexed_once_per_name() {
        let index = build_index(&["LOPEZ LOPEZ MARIA"]);
        assert_eq!(index.bucket("LOPEZ").len(), 1);
        assert_eq!(index.bucket("LOPEZ")[0].name, "LOPEZ LOPEZ MARIA");
    }

    #[test]
    fn test_empty_names_contribute_nothing() {
        let index = build_index(&["", "JUAN"]);
        assert_eq!(index.token_count(), 1);
        assert_eq!(index.bucket("JUAN")[0].row, 1);
        assert!(index.bucket("").is_empty());
        assert!(build_index::<&str>(&[]).is_empty());
    }
}
