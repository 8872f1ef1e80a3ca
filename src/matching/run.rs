use crate::domain::model::{
    Contact, MatchMode, MatchOptions, MatchResult, Report, ReportRow, RosterEntry, Table,
};
use crate::domain::ports::ProgressSink;
use crate::matching::assemble::{partition_front, partition_regex, rank, ProgressTracker};
use crate::matching::enrich::{first_name, preferred_phone};
use crate::matching::index::{build_index, KeywordIndex};
use crate::matching::matcher::{find_best_match, Candidate};
use crate::matching::normalize::normalize;
use crate::matching::records::{contacts_from_table, roster_from_table};
use crate::matching::score::confidence_pct;
use crate::utils::error::{MatchError, Result};
use rayon::prelude::*;
use std::sync::mpsc;

/// Matches every contact against the roster and assembles the ranked report.
///
/// `sink` receives one integer percentage per processed contact. The roster
/// index is built before any contact is matched; contacts without a shared
/// word are left out of the report.
pub fn run_matching(
    contacts: &Table,
    roster: &Table,
    options: &MatchOptions,
    sink: &dyn ProgressSink,
) -> Result<Report> {
    let partition = match options.mode {
        MatchMode::UnillanosFiltered => Some(partition_regex(&options.partition_pattern)?),
        MatchMode::Combined => None,
    };

    let roster_entries = roster_from_table(roster, &options.columns)?;
    let contacts = contacts_from_table(contacts, &options.columns);

    let roster_names: Vec<String> = roster_entries.iter().map(|e| normalize(&e.nombres)).collect();
    let index = build_index(&roster_names);
    tracing::debug!(
        "Indexed {} roster entries under {} distinct words",
        roster_entries.len(),
        index.token_count()
    );

    let queries: Vec<String> = contacts.iter().map(|c| normalize(&c.display_name)).collect();
    let mut tracker = ProgressTracker::new(sink, queries.len());
    let matches = if options.parallel {
        match_parallel(&queries, &index, &mut tracker)?
    } else {
        queries
            .iter()
            .map(|query| {
                let found = find_best_match(query, &index);
                tracker.advance();
                found
            })
            .collect()
    };

    let mut rows: Vec<ReportRow> = Vec::with_capacity(matches.len());
    for ((contact, query), candidate) in contacts.iter().zip(&queries).zip(matches) {
        let Some(candidate) = candidate else {
            continue;
        };
        let matched_name = &roster_names[candidate.row];
        let result = MatchResult {
            roster_row: candidate.row,
            overlap: candidate.overlap,
            similarity: candidate.similarity,
            confidence_pct: confidence_pct(candidate.overlap, candidate.similarity, matched_name),
        };
        rows.push(report_row(contact, query, &roster_entries[result.roster_row], matched_name, &result));
    }

    tracing::info!(
        "🔎 Matched {} of {} contacts against {} roster entries",
        rows.len(),
        contacts.len(),
        roster_entries.len()
    );

    rank(&mut rows, options.order);
    if let Some(pattern) = partition {
        rows = partition_front(rows, &pattern);
    }

    Ok(Report { rows })
}

fn report_row(
    contact: &Contact,
    query: &str,
    entry: &RosterEntry,
    matched_name: &str,
    result: &MatchResult,
) -> ReportRow {
    ReportRow {
        cedula: entry.cedula.clone(),
        nombre: query.to_string(),
        nombre_egresado: matched_name.to_string(),
        tipo: entry.tipo.clone(),
        telefono1: contact.telefono1.clone(),
        telefono2: contact.telefono2.clone(),
        telefono: preferred_phone(&contact.telefono1, &contact.telefono2),
        certeza: result.confidence_pct,
        primer_nombre: first_name(&contact.display_name),
        display_name: contact.display_name.clone(),
        overlap: result.overlap,
        similarity: result.similarity,
    }
}

/// Matches on the rayon pool while this thread alone reports progress,
/// counting completions as workers send them.
fn match_parallel(
    queries: &[String],
    index: &KeywordIndex,
    tracker: &mut ProgressTracker<'_>,
) -> Result<Vec<Option<Candidate>>> {
    let (tx, rx) = mpsc::channel::<()>();

    std::thread::scope(|scope| {
        let worker = scope.spawn(move || {
            queries
                .par_iter()
                .map_with(tx, |tx, query| {
                    let found = find_best_match(query, index);
                    let _ = tx.send(());
                    found
                })
                .collect::<Vec<_>>()
        });

        for () in rx {
            tracker.advance();
        }

        worker.join().map_err(|_| MatchError::ProcessingError {
            message: "matching worker panicked".to_string(),
        })
    })
}
