use serde::{Deserialize, Serialize};
use std::fmt;

/// 表格儲存格的值，保留來源檔案的型別
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            // Excel stores phone numbers and cédulas as floats
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value.to_string())
        }
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        if value.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value)
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

/// Header row plus data rows. Rows may be shorter than the header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<CellValue>) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 以標題名稱尋找欄位（先完全相符，再忽略大小寫與空白）
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .or_else(|| {
                self.headers
                    .iter()
                    .position(|h| h.trim().eq_ignore_ascii_case(name.trim()))
            })
    }

    /// First header among `aliases` that exists in the table.
    pub fn first_column<S: AsRef<str>>(&self, aliases: &[S]) -> Option<usize> {
        aliases.iter().find_map(|alias| self.column(alias.as_ref()))
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    pub fn text(&self, row: usize, col: Option<usize>) -> String {
        col.and_then(|c| self.cell(row, c))
            .map(|v| v.to_string())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub display_name: String,
    pub telefono1: String,
    pub telefono2: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterEntry {
    pub cedula: String,
    pub nombres: String,
    pub tipo: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    #[default]
    Combined,
    UnillanosFiltered,
}

impl MatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::Combined => "combined",
            MatchMode::UnillanosFiltered => "unillanos_filtered",
        }
    }
}

impl std::str::FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "combined" => Ok(MatchMode::Combined),
            "unillanos_filtered" | "unillanos" => Ok(MatchMode::UnillanosFiltered),
            other => Err(format!(
                "unknown mode '{}', expected 'combined' or 'unillanos_filtered'",
                other
            )),
        }
    }
}

/// 報表排序策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankOrder {
    /// Descending confidence percentage.
    #[default]
    Confidence,
    /// Descending token overlap, then similarity.
    Coincidence,
}

impl std::str::FromStr for RankOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "confidence" => Ok(RankOrder::Confidence),
            "coincidence" => Ok(RankOrder::Coincidence),
            other => Err(format!(
                "unknown order '{}', expected 'confidence' or 'coincidence'",
                other
            )),
        }
    }
}

/// Outcome of matching one contact against the roster.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub roster_row: usize,
    pub overlap: usize,
    pub similarity: f64,
    pub confidence_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    #[serde(rename = "Cedula")]
    pub cedula: String,
    #[serde(rename = "Nombre")]
    pub nombre: String,
    #[serde(rename = "Nombre Egresado")]
    pub nombre_egresado: String,
    #[serde(rename = "Tipo")]
    pub tipo: String,
    #[serde(rename = "Telefono1")]
    pub telefono1: String,
    #[serde(rename = "Telefono2")]
    pub telefono2: String,
    #[serde(rename = "Telefono")]
    pub telefono: Option<String>,
    #[serde(rename = "Certeza")]
    pub certeza: f64,
    #[serde(rename = "Primer Nombre")]
    pub primer_nombre: String,
    #[serde(skip)]
    pub display_name: String,
    #[serde(skip)]
    pub overlap: usize,
    #[serde(skip)]
    pub similarity: f64,
}

pub const REPORT_HEADERS: [&str; 9] = [
    "Cedula",
    "Nombre",
    "Nombre Egresado",
    "Tipo",
    "Telefono1",
    "Telefono2",
    "Telefono",
    "Certeza",
    "Primer Nombre",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report {
    pub rows: Vec<ReportRow>,
}

impl Report {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 轉成表格，交給試算表或 CSV 寫入器
    pub fn to_table(&self) -> Table {
        let mut table = Table::new(REPORT_HEADERS.iter().map(|h| h.to_string()).collect());
        for row in &self.rows {
            table.push_row(vec![
                CellValue::from(row.cedula.clone()),
                CellValue::from(row.nombre.clone()),
                CellValue::from(row.nombre_egresado.clone()),
                CellValue::from(row.tipo.clone()),
                CellValue::from(row.telefono1.clone()),
                CellValue::from(row.telefono2.clone()),
                row.telefono.clone().map(CellValue::from).unwrap_or(CellValue::Empty),
                CellValue::Number(row.certeza),
                CellValue::from(row.primer_nombre.clone()),
            ]);
        }
        table
    }
}

/// 輸入表格的欄位名稱對應
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub name: String,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub phone1_aliases: Vec<String>,
    pub phone2_aliases: Vec<String>,
    pub roster_name: String,
    pub roster_id: String,
    pub roster_category: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        let owned = |names: &[&str]| names.iter().map(|n| n.to_string()).collect::<Vec<_>>();
        Self {
            name: "Nombre".to_string(),
            first_name: "First Name".to_string(),
            middle_name: "Middle Name".to_string(),
            last_name: "Last Name".to_string(),
            // Google Contacts export first, then Outlook
            phone1_aliases: owned(&["Phone 1 - Value", "Mobile Phone", "Phone1", "Telefono1", "Teléfono"]),
            phone2_aliases: owned(&["Phone 2 - Value", "Primary Phone", "Other Phone", "Phone2", "Telefono2"]),
            roster_name: "Nombres".to_string(),
            roster_id: "Cedula".to_string(),
            roster_category: "Tipo".to_string(),
        }
    }
}

pub const DEFAULT_PARTITION_PATTERN: &str = r"\b(U|UNILLANOS)\b";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchOptions {
    pub mode: MatchMode,
    pub order: RankOrder,
    /// Whole-word pattern for the unillanos partition, matched case-insensitively.
    pub partition_pattern: String,
    pub parallel: bool,
    #[serde(skip)]
    pub columns: ColumnMapping,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            mode: MatchMode::default(),
            order: RankOrder::default(),
            partition_pattern: DEFAULT_PARTITION_PATTERN.to_string(),
            parallel: false,
            columns: ColumnMapping::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integral_numbers_display_without_fraction() {
        assert_eq!(CellValue::Number(3009998877.0).to_string(), "3009998877");
        assert_eq!(CellValue::Number(12.5).to_string(), "12.5");
        assert_eq!(CellValue::Empty.to_string(), "");
    }

    #[test]
    fn test_column_lookup_prefers_exact_then_case_insensitive() {
        let table = Table::new(vec!["Nombre".to_string(), " cedula ".to_string()]);
        assert_eq!(table.column("Nombre"), Some(0));
        assert_eq!(table.column("Cedula"), Some(1));
        assert_eq!(table.column("Tipo"), None);
        assert_eq!(table.first_column(&["Phone1", "Cedula"]), Some(1));
    }

    #[test]
    fn test_text_of_missing_cell_is_empty() {
        let mut table = Table::new(vec!["A".to_string(), "B".to_string()]);
        table.push_row(vec![CellValue::from("x")]);
        assert_eq!(table.text(0, Some(0)), "x");
        assert_eq!(table.text(0, Some(1)), "");
        assert_eq!(table.text(0, None), "");
    }
}
