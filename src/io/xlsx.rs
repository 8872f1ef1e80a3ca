// Excel import (xlsx, xls, xlsb, ods) and formatted xlsx export

use crate::domain::model::{CellValue, Table};
use crate::io::layout::{compute_layout, SheetLayout};
use crate::utils::error::{MatchError, Result};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use rust_xlsxwriter::{Format, FormatAlign, Workbook, Worksheet};
use std::io::Cursor;

fn cell_from_data(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::from(s.as_str()),
        Data::Float(n) => CellValue::Number(*n),
        Data::Int(n) => CellValue::Number(*n as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::from(s.as_str()),
        Data::Error(_) => CellValue::Empty,
    }
}

/// Reads the first worksheet; its first row is the header.
pub fn read_table(bytes: Vec<u8>) -> Result<Table> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| MatchError::input_format(format!("Failed to open Excel file: {}", e)))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| MatchError::input_format("Excel file contains no sheets"))?;
    let range = workbook.worksheet_range(&sheet_name)?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or_else(|| MatchError::input_format(format!("sheet '{}' is empty", sheet_name)))?
        .iter()
        .map(|cell| cell_from_data(cell).to_string().trim().to_string())
        .collect();

    let mut table = Table::new(headers);
    for row in rows {
        let cells: Vec<CellValue> = row.iter().map(cell_from_data).collect();
        if cells.iter().all(CellValue::is_empty) {
            continue;
        }
        table.push_row(cells);
    }

    tracing::debug!(
        "Parsed sheet '{}': {} columns, {} rows",
        sheet_name,
        table.headers.len(),
        table.len()
    );
    Ok(table)
}

/// Writes the table as a single-sheet workbook: wrapped, top-aligned cells,
/// columns sized to content and rows sized to their line count.
pub fn write_table(table: &Table, sheet_name: &str) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    let format = Format::new().set_text_wrap().set_align(FormatAlign::Top);

    for (col, header) in table.headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, header, &format)?;
    }
    for (idx, row) in table.rows.iter().enumerate() {
        let sheet_row = idx as u32 + 1;
        for (col, cell) in row.iter().enumerate() {
            write_cell(worksheet, sheet_row, col as u16, cell, &format)?;
        }
    }

    apply_layout(worksheet, &compute_layout(table))?;

    Ok(workbook.save_to_buffer()?)
}

fn write_cell(worksheet: &mut Worksheet, row: u32, col: u16, cell: &CellValue, format: &Format) -> Result<()> {
    match cell {
        CellValue::Empty => worksheet.write_blank(row, col, format)?,
        CellValue::Text(s) => worksheet.write_string_with_format(row, col, s, format)?,
        CellValue::Number(n) => worksheet.write_number_with_format(row, col, *n, format)?,
        CellValue::Bool(b) => worksheet.write_boolean_with_format(row, col, *b, format)?,
    };
    Ok(())
}

fn apply_layout(worksheet: &mut Worksheet, layout: &SheetLayout) -> Result<()> {
    for (col, width) in layout.column_widths.iter().enumerate() {
        worksheet.set_column_width(col as u16, *width)?;
    }
    // 高度為 0 的列保留預設值，避免被隱藏
    for (row, height) in layout.row_heights.iter().enumerate() {
        if *height > 0.0 {
            worksheet.set_row_height(row as u32, *height)?;
        }
    }
    Ok(())
}
