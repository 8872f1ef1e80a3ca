// CSV import/export for contact, roster and report tables

use crate::domain::model::{CellValue, Table};
use crate::utils::error::{MatchError, Result};

/// Decodes file bytes as UTF-8, falling back to Windows-1252 (common for
/// Excel-exported CSVs). A leading BOM is dropped.
pub fn decode_text(bytes: Vec<u8>) -> String {
    let text = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    };
    match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    }
}

/// Delimiters seen in contact and roster exports: Google/Outlook write
/// commas, Excel in Spanish locales writes semicolons.
const DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];
const SAMPLE_LINES: usize = 10;

/// Counts `delimiter` outside double-quoted sections of one line.
fn unquoted_count(line: &str, delimiter: u8) -> usize {
    let mut in_quotes = false;
    let mut count = 0;
    for byte in line.bytes() {
        if byte == b'"' {
            in_quotes = !in_quotes;
        } else if byte == delimiter && !in_quotes {
            count += 1;
        }
    }
    count
}

/// Picks the delimiter that splits the header most and that the sample rows
/// agree with. For single-column files (a bare list of names) it picks the
/// delimiter the rows use least, comma first, so "TORRES, ANA" stays whole.
fn sniff_delimiter(content: &str) -> u8 {
    let mut lines = content.lines().filter(|line| !line.trim().is_empty());
    let Some(header) = lines.next() else {
        return b',';
    };
    let rows: Vec<&str> = lines.take(SAMPLE_LINES - 1).collect();

    DELIMITERS
        .iter()
        .filter_map(|&delimiter| {
            let splits = unquoted_count(header, delimiter);
            if splits == 0 {
                return None;
            }
            let agreeing = rows
                .iter()
                .filter(|row| unquoted_count(row, delimiter) == splits)
                .count();
            Some(((agreeing, splits), delimiter))
        })
        // max_by_key keeps the last maximum, so reverse to favour list order on ties
        .rev()
        .max_by_key(|(score, _)| *score)
        .map(|(_, delimiter)| delimiter)
        .unwrap_or_else(|| single_column_delimiter(&rows))
}

fn single_column_delimiter(rows: &[&str]) -> u8 {
    DELIMITERS
        .iter()
        .copied()
        .min_by_key(|&delimiter| rows.iter().map(|row| unquoted_count(row, delimiter)).sum::<usize>())
        .unwrap_or(b',')
}

/// Parses CSV bytes whose first record is the header row.
pub fn read_table(bytes: Vec<u8>) -> Result<Table> {
    let content = decode_text(bytes);
    let delimiter = sniff_delimiter(&content);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| MatchError::input_format(format!("unreadable CSV header: {}", e)))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect::<Vec<_>>();

    if headers.iter().all(String::is_empty) {
        return Err(MatchError::input_format("CSV file has no header row"));
    }

    let mut table = Table::new(headers);
    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|e| {
            MatchError::input_format(format!("unreadable CSV record {}: {}", line + 1, e))
        })?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        table.push_row(record.iter().map(CellValue::from).collect());
    }

    tracing::debug!(
        "Parsed CSV with delimiter {:?}: {} columns, {} rows",
        delimiter as char,
        table.headers.len(),
        table.len()
    );
    Ok(table)
}

pub fn write_table(table: &Table) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());

    writer.write_record(&table.headers)?;
    for row in &table.rows {
        let mut record: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        record.resize(table.headers.len(), String::new());
        writer.write_record(&record)?;
    }

    writer
        .into_inner()
        .map_err(|e| MatchError::IoError(e.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_semicolon_delimiter() {
        let content = "Nombre;Phone 1 - Value\nAna;300\nPedro;301\n";
        assert_eq!(sniff_delimiter(content), b';');
    }

    #[test]
    fn test_sniff_comma_delimiter() {
        let content = "Cedula,Nombres,Tipo\n1,ANA,Egresado\n2,PEDRO,Docente\n";
        assert_eq!(sniff_delimiter(content), b',');
    }

    #[test]
    fn test_sniff_ignores_delimiters_inside_quotes() {
        let content = "Nombre;Notas\n\"Pérez, Juan\";\"a, b, c\"\nAna;x\n";
        assert_eq!(sniff_delimiter(content), b';');
    }

    #[test]
    fn test_sniff_single_column_falls_back_to_comma() {
        assert_eq!(sniff_delimiter("Nombres\nANA TORRES\nJUAN PEREZ\n"), b',');
        assert_eq!(sniff_delimiter(""), b',');
    }

    #[test]
    fn test_sniff_tab_export() {
        let content = "First Name\tLast Name\tMobile Phone\nAna\tTorres\t300\n";
        assert_eq!(sniff_delimiter(content), b'\t');
    }

    #[test]
    fn test_single_column_names_read_whole() {
        assert_eq!(sniff_delimiter("Nombres\nTORRES, ANA\n"), b';');

        let table = read_table(b"Nombres\nTORRES, ANA\nJUAN PEREZ\n".to_vec()).unwrap();
        assert_eq!(table.headers, vec!["Nombres"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.text(0, Some(0)), "TORRES, ANA");
        assert_eq!(table.rows[0].len(), 1);
    }

    #[test]
    fn test_read_table_with_bom_and_blank_lines() {
        let bytes = "\u{feff}Nombre,Phone1\nJuan Pérez,3009998877\n,\nAna,\n".as_bytes().to_vec();
        let table = read_table(bytes).unwrap();
        assert_eq!(table.headers, vec!["Nombre", "Phone1"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.text(0, Some(0)), "Juan Pérez");
        assert_eq!(table.text(1, Some(1)), "");
    }

    #[test]
    fn test_read_windows_1252() {
        // "José" encoded as Windows-1252
        let mut bytes = b"Nombre\nJos".to_vec();
        bytes.push(0xE9);
        bytes.push(b'\n');
        let table = read_table(bytes).unwrap();
        assert_eq!(table.text(0, Some(0)), "José");
    }

    #[test]
    fn test_empty_input_is_format_error() {
        let err = read_table(Vec::new()).unwrap_err();
        assert!(matches!(err, MatchError::InputFormatError { .. }));
    }

    #[test]
    fn test_write_pads_short_rows() {
        let mut table = Table::new(vec!["A".to_string(), "B".to_string()]);
        table.push_row(vec![CellValue::Number(3009998877.0)]);
        let text = String::from_utf8(write_table(&table).unwrap()).unwrap();
        assert_eq!(text, "A,B\n3009998877,\n");
    }
}
