use crate::aggregate::ActivityAggregator;
use crate::config::load_repositories;
use crate::export::{output_json, output_summary, write_csv};
use crate::github::{Clock, CommitFetcher, HttpTransport, SystemClock, Transport};
use crate::model::{ActivityRow, DateRange, RepoReport};
use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    pub range: DateRange,
    pub since: Option<String>,
    pub until: Option<String>,
    pub per_page: Option<u8>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub repositories: Vec<RepoReport>,
    pub rows: Vec<ActivityRow>,
    pub active_days: usize,
    pub distinct_authors: usize,
}

pub fn exec(options: RunOptions, token: Option<String>) -> anyhow::Result<RunSummary> {
    if token.is_none() {
        warn!("No GitHub token supplied; requests are unauthenticated and heavily rate limited");
    }

    let transport = HttpTransport::new(token).context("Failed to set up the GitHub client")?;
    let fetcher = CommitFetcher::new(transport, SystemClock)
        .with_per_page(options.per_page)
        .with_range(options.range.clone());

    let summary = run_with(&options, &fetcher)?;

    if options.json {
        output_json(
            &summary.rows,
            &summary.repositories,
            options.since.as_deref(),
            options.until.as_deref(),
        )?;
    } else if !options.quiet {
        output_summary(&summary, &options.output);
    }

    Ok(summary)
}

/// Loads the input, fetches every repository in order, and writes the table.
/// Configuration errors abort before any request is made; fetch failures
/// only shorten the affected repository's history.
pub fn run_with<T: Transport, C: Clock>(
    options: &RunOptions,
    fetcher: &CommitFetcher<T, C>,
) -> anyhow::Result<RunSummary> {
    let repos = load_repositories(&options.input).context("Failed to load repository list")?;
    info!(count = repos.len(), input = %options.input.display(), "Loaded repositories");

    let pb = if options.quiet || options.json {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );

    let mut aggregator = ActivityAggregator::new();
    let mut repositories = Vec::with_capacity(repos.len());

    for (idx, repo) in repos.iter().enumerate() {
        pb.set_message(format!("Fetching {} ({}/{})", repo.url, idx + 1, repos.len()));
        pb.tick();

        let outcome = fetcher.fetch(repo);
        aggregator.ingest(&outcome.records);
        repositories.push(outcome.report);
    }
    pb.finish_and_clear();

    let active_days = aggregator.days();
    let distinct_authors = aggregator.distinct_authors();
    info!(
        days = active_days,
        commits = aggregator.commits(),
        skipped = aggregator.skipped(),
        "Aggregated commit history"
    );

    let rows = aggregator.finish();
    write_csv(&rows, &options.output).context("Failed to write activity table")?;
    info!(output = %options.output.display(), "Wrote activity table");

    Ok(RunSummary {
        repositories,
        rows,
        active_days,
        distinct_authors,
    })
}
