use crate::domain::model::{RankOrder, ReportRow};
use crate::domain::ports::ProgressSink;
use crate::utils::error::{MatchError, Result};
use regex::{Regex, RegexBuilder};
use std::cmp::Ordering;

/// Stable descending sort; equal keys keep processing order.
pub fn rank(rows: &mut [ReportRow], order: RankOrder) {
    match order {
        RankOrder::Confidence => rows.sort_by(|a, b| desc(a.certeza, b.certeza)),
        RankOrder::Coincidence => rows.sort_by(|a, b| {
            b.overlap
                .cmp(&a.overlap)
                .then_with(|| desc(a.similarity, b.similarity))
        }),
    }
}

fn desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

pub fn partition_regex(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| MatchError::InvalidConfigValueError {
            field: "matching.partition_pattern".to_string(),
            value: pattern.to_string(),
            reason: e.to_string(),
        })
}

/// Moves rows whose contact name matches `pattern` to the front as a block.
/// Relative order inside each group is unchanged.
pub fn partition_front(rows: Vec<ReportRow>, pattern: &Regex) -> Vec<ReportRow> {
    let (mut matching, rest): (Vec<_>, Vec<_>) = rows
        .into_iter()
        .partition(|row| pattern.is_match(&row.display_name));
    matching.extend(rest);
    matching
}

/// Emits `round(100 * processed / total)` once per processed contact.
pub struct ProgressTracker<'a> {
    sink: &'a dyn ProgressSink,
    total: usize,
    processed: usize,
}

impl<'a> ProgressTracker<'a> {
    pub fn new(sink: &'a dyn ProgressSink, total: usize) -> Self {
        Self {
            sink,
            total,
            processed: 0,
        }
    }

    pub fn advance(&mut self) {
        if self.total == 0 {
            return;
        }
        self.processed = (self.processed + 1).min(self.total);
        let percent = (100.0 * self.processed as f64 / self.total as f64).round() as u8;
        self.sink.on_progress(percent);
    }

    pub fn processed(&self) -> usize {
        self.processed
    }
}
