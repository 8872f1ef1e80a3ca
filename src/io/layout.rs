use crate::domain::model::Table;

/// Points per text line when sizing rows.
pub const LINE_HEIGHT: f64 = 15.0;
/// Extra characters of padding added to every column.
pub const COLUMN_PADDING: usize = 2;

/// Column widths and row heights for a finished table.
///
/// Row 0 is the header row; data row `i` is sheet row `i + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    pub column_widths: Vec<f64>,
    pub row_heights: Vec<f64>,
}

/// Sizes each column to its longest stringified cell and each row to the
/// largest number of lines any of its cells spans.
pub fn compute_layout(table: &Table) -> SheetLayout {
    let mut widths: Vec<usize> = table.headers.iter().map(|h| h.chars().count()).collect();
    let mut row_heights = Vec::with_capacity(table.len() + 1);
    row_heights.push(lines_height(table.headers.iter().map(String::as_str)));

    for row in &table.rows {
        let texts: Vec<String> = row.iter().map(|cell| cell.to_string()).collect();
        for (col, text) in texts.iter().enumerate() {
            let len = text.chars().count();
            match widths.get_mut(col) {
                Some(width) => *width = (*width).max(len),
                None => widths.push(len),
            }
        }
        row_heights.push(lines_height(texts.iter().map(String::as_str)));
    }

    SheetLayout {
        column_widths: widths.into_iter().map(|w| (w + COLUMN_PADDING) as f64).collect(),
        row_heights,
    }
}

fn lines_height<'a>(cells: impl Iterator<Item = &'a str>) -> f64 {
    let lines = cells
        .filter(|text| !text.is_empty())
        .map(|text| text.matches('\n').count() + 1)
        .max()
        .unwrap_or(0);
    lines as f64 * LINE_HEIGHT
}
