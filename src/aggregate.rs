use crate::model::{ActivityRow, CommitRecord, DailyActivity};
use std::collections::BTreeSet;
use tracing::debug;

/// Accumulates distinct author names per day across every repository fed to
/// it. Author names are taken verbatim, so two spellings of one person count
/// as two developers.
#[derive(Debug, Default)]
pub struct ActivityAggregator {
    activity: DailyActivity,
    commits: usize,
    skipped: usize,
}

impl ActivityAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ingest(&mut self, records: &[CommitRecord]) {
        for record in records {
            self.commits += 1;
            match (record.day_key(), record.author_name()) {
                (Some(day), Some(author)) => {
                    self.activity.record(day, author);
                }
                _ => {
                    self.skipped += 1;
                    debug!(sha = ?record.sha, "Skipping commit without usable author data");
                }
            }
        }
    }

    /// Number of records ingested, including skipped ones.
    pub fn commits(&self) -> usize {
        self.commits
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Number of distinct days with at least one commit.
    pub fn days(&self) -> usize {
        self.activity.days()
    }

    pub fn distinct_authors(&self) -> usize {
        self.activity
            .iter()
            .flat_map(|(_, authors)| authors.iter())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Day to active-developer count, ascending by day.
    pub fn rows(&self) -> Vec<ActivityRow> {
        self.activity
            .iter()
            .map(|(day, authors)| ActivityRow {
                date: day.clone(),
                active_developers: authors.len(),
            })
            .collect()
    }

    pub fn finish(self) -> Vec<ActivityRow> {
        self.rows()
    }
}
