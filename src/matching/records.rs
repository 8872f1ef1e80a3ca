use crate::domain::model::{ColumnMapping, Contact, RosterEntry, Table};
use crate::utils::error::{MatchError, Result};

/// Reads contacts out of a table. Missing name or phone columns yield empty
/// values instead of an error.
pub fn contacts_from_table(table: &Table, columns: &ColumnMapping) -> Vec<Contact> {
    let name_col = table.column(&columns.name);
    let part_cols = [
        table.column(&columns.first_name),
        table.column(&columns.middle_name),
        table.column(&columns.last_name),
    ];
    let phone1_col = table.first_column(&columns.phone1_aliases);
    let phone2_col = table.first_column(&columns.phone2_aliases);

    if name_col.is_none() && part_cols.iter().all(Option::is_none) {
        tracing::warn!(
            "⚠️ Contacts have neither '{}' nor first/middle/last name columns; every contact will be unmatched",
            columns.name
        );
    }
    if phone1_col.is_none() && phone2_col.is_none() {
        tracing::warn!("⚠️ No recognized phone columns in contacts");
    }
    tracing::debug!(
        "Contact columns: name={:?}, parts={:?}, phone1={:?}, phone2={:?}",
        name_col,
        part_cols,
        phone1_col,
        phone2_col
    );

    (0..table.len())
        .map(|row| {
            let display_name = match name_col {
                Some(col) => table.text(row, Some(col)).trim().to_string(),
                None => part_cols
                    .iter()
                    .map(|col| table.text(row, *col))
                    .collect::<Vec<_>>()
                    .join(" ")
                    .trim()
                    .to_string(),
            };
            Contact {
                display_name,
                telefono1: table.text(row, phone1_col),
                telefono2: table.text(row, phone2_col),
            }
        })
        .collect()
}

/// Reads roster entries. The name and identity columns are required.
pub fn roster_from_table(table: &Table, columns: &ColumnMapping) -> Result<Vec<RosterEntry>> {
    let name_col = required_column(table, &columns.roster_name)?;
    let id_col = required_column(table, &columns.roster_id)?;
    let category_col = table.column(&columns.roster_category);
    if category_col.is_none() {
        tracing::warn!("⚠️ Roster has no '{}' column", columns.roster_category);
    }

    Ok((0..table.len())
        .map(|row| RosterEntry {
            cedula: table.text(row, Some(id_col)).trim().to_string(),
            nombres: table.text(row, Some(name_col)),
            tipo: table.text(row, category_col),
        })
        .collect())
}

fn required_column(table: &Table, name: &str) -> Result<usize> {
    table.column(name).ok_or_else(|| {
        MatchError::input_format(format!(
            "roster is missing required column '{}' (found: {})",
            name,
            table.headers.join(", ")
        ))
    })
}

/// 依身分證號查詢名冊，回傳第一筆相符資料
pub fn lookup_by_id(roster: &Table, columns: &ColumnMapping, key: &str) -> Result<Option<RosterEntry>> {
    let key = key.trim();
    if key.is_empty() {
        return Ok(None);
    }
    Ok(roster_from_table(roster, columns)?
        .into_iter()
        .find(|entry| entry.cedula == key))
}
