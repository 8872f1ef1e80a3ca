use crate::domain::model::CellValue;

/// 只處理西班牙文常見的帶重音母音
const ACCENTED_VOWELS: [(char, char); 10] = [
    ('á', 'a'),
    ('é', 'e'),
    ('í', 'i'),
    ('ó', 'o'),
    ('ú', 'u'),
    ('Á', 'A'),
    ('É', 'E'),
    ('Í', 'I'),
    ('Ó', 'O'),
    ('Ú', 'U'),
];

fn strip_accent(c: char) -> char {
    ACCENTED_VOWELS
        .iter()
        .find(|(accented, _)| *accented == c)
        .map(|(_, plain)| *plain)
        .unwrap_or(c)
}

/// Canonical comparable form of a name: accents stripped, uppercased,
/// whitespace collapsed. Total and idempotent.
pub fn normalize(raw: &str) -> String {
    let stripped: String = raw.trim().chars().map(strip_accent).collect();
    stripped
        .to_uppercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalizes a cell of any type through its text form.
pub fn normalize_cell(value: &CellValue) -> String {
    normalize(&value.to_string())
}

/// Tokens of a normalized name in first-appearance order, duplicates removed.
pub fn unique_tokens(name: &str) -> Vec<&str> {
    let mut tokens: Vec<&str> = Vec::new();
    for token in name.split_whitespace() {
        if !tokens.contains(&token) {
            tokens.push(token);
        }
    }
    tokens
}
