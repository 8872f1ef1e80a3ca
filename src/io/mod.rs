pub mod csv;
pub mod layout;
pub mod xlsx;

use crate::domain::model::Table;
use crate::utils::error::{MatchError, Result};
use std::path::Path;

/// 依副檔名判斷表格格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Excel,
}

impl TableFormat {
    pub fn from_path(path: &str) -> Result<Self> {
        let extension = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" | "tsv" | "txt" => Ok(TableFormat::Csv),
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Ok(TableFormat::Excel),
            other => Err(MatchError::input_format(format!(
                "unsupported table file '{}' (extension '{}')",
                path, other
            ))),
        }
    }
}

/// Parses table bytes, choosing the reader from the file name.
pub fn read_table(bytes: Vec<u8>, file_name: &str) -> Result<Table> {
    match TableFormat::from_path(file_name)? {
        TableFormat::Csv => csv::read_table(bytes),
        TableFormat::Excel => xlsx::read_table(bytes),
    }
}
