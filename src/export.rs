use crate::error::{PulseError, Result};
use crate::model::{ActivityOutput, ActivityRow, RepoReport, SCHEMA_VERSION};
use crate::run::RunSummary;
use chrono::Utc;
use console::style;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

pub const DEFAULT_OUTPUT_FILE: &str = "output.csv";

pub const HEADER: [&str; 2] = ["date", "active developers"];

/// Writes the table to `path`, replacing any existing file. An empty `rows`
/// slice still produces the header line.
pub fn write_csv(rows: &[ActivityRow], path: &Path) -> Result<()> {
    let write_failed = |source: io::Error| PulseError::WriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(write_failed)?;
    write_rows(rows, file).map_err(write_failed)
}

pub fn write_rows<W: Write>(rows: &[ActivityRow], writer: W) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(HEADER)?;
    for row in rows {
        let count = row.active_developers.to_string();
        wtr.write_record([row.date.as_str(), count.as_str()])?;
    }
    wtr.flush()
}

pub fn output_json(
    rows: &[ActivityRow],
    repositories: &[RepoReport],
    since: Option<&str>,
    until: Option<&str>,
) -> Result<()> {
    let output = ActivityOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        repositories: repositories.to_vec(),
        since: since.map(str::to_string),
        until: until.map(str::to_string),
        rows: rows.to_vec(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn output_summary(summary: &RunSummary, output_path: &Path) {
    let rows = &summary.rows;
    let repositories = &summary.repositories;

    println!("{}", style("Activity Summary").bold());
    println!("{}", "─".repeat(50));

    let total_commits: usize = repositories.iter().map(|r| r.commits).sum();
    let busiest = rows.iter().max_by_key(|r| r.active_developers);

    println!("Repositories: {}", style(repositories.len()).cyan());
    println!("Commits fetched: {}", style(total_commits).cyan());
    println!("Active days: {}", style(summary.active_days).cyan());
    println!("Distinct authors: {}", style(summary.distinct_authors).yellow());

    if let (Some(first), Some(last)) = (rows.first(), rows.last()) {
        println!(
            "Date range: {} to {}",
            style(&first.date).dim(),
            style(&last.date).dim()
        );
    }
    if let Some(day) = busiest {
        println!(
            "Busiest day: {} ({} developers)",
            style(&day.date).green(),
            day.active_developers
        );
    }

    let incomplete: Vec<_> = repositories.iter().filter(|r| !r.complete).collect();
    if !incomplete.is_empty() {
        println!("\n{}", style("Incomplete repositories").red().bold());
        for report in incomplete {
            println!(
                "  {} ({} commits kept): {}",
                report.url,
                report.commits,
                report.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    println!("\nWrote {}", style(output_path.display()).bold());
}
