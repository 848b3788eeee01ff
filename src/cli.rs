use crate::config::DEFAULT_INPUT_FILE;
use crate::export::DEFAULT_OUTPUT_FILE;
use crate::github::endpoint::MAX_PER_PAGE;
use crate::logging::{init_logger, LogLevel};
use crate::run::RunOptions;
use crate::util::resolve_range;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "devpulse")]
#[command(about = "Count distinct active developers per day across GitHub repositories")]
#[command(version)]
pub struct Cli {
    #[arg(long, help = "TOML file listing repositories", default_value = DEFAULT_INPUT_FILE)]
    pub input: PathBuf,

    #[arg(long, help = "CSV file to write", default_value = DEFAULT_OUTPUT_FILE)]
    pub output: PathBuf,

    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, help = "GitHub API token")]
    pub token: Option<String>,

    #[arg(long, help = "Only commits after this date (RFC3339, YYYY-MM-DD, or 'N days ago')")]
    pub since: Option<String>,

    #[arg(long, help = "Only commits before this date (RFC3339, YYYY-MM-DD, or 'N days ago')")]
    pub until: Option<String>,

    #[arg(
        long,
        help = "Commits requested per page",
        value_parser = clap::value_parser!(u8).range(1..=MAX_PER_PAGE as i64)
    )]
    pub per_page: Option<u8>,

    #[arg(long, help = "Print the result as JSON in addition to writing the CSV")]
    pub json: bool,

    #[arg(long, short, help = "Suppress progress and summary output")]
    pub quiet: bool,

    #[arg(long, help = "Log level (error, warn, info, debug, trace)", default_value = "warn")]
    pub log_level: LogLevel,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        init_logger(self.log_level).ok();

        let range = resolve_range(self.since.as_deref(), self.until.as_deref())
            .context("Failed to resolve date range")?;

        let options = RunOptions {
            input: self.input,
            output: self.output,
            range,
            since: self.since,
            until: self.until,
            per_page: self.per_page,
            json: self.json,
            quiet: self.quiet,
        };

        let token = self.token.filter(|t| !t.trim().is_empty());
        crate::run::exec(options, token)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_conventional_paths() {
        let cli = Cli::try_parse_from(["devpulse"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("input.toml"));
        assert_eq!(cli.output, PathBuf::from("output.csv"));
        assert_eq!(cli.log_level, LogLevel::Warn);
        assert!(!cli.json);
    }

    #[test]
    fn per_page_is_bounded() {
        assert!(Cli::try_parse_from(["devpulse", "--per-page", "0"]).is_err());
        assert!(Cli::try_parse_from(["devpulse", "--per-page", "101"]).is_err());
        let cli = Cli::try_parse_from(["devpulse", "--per-page", "100"]).unwrap();
        assert_eq!(cli.per_page, Some(100));
    }

    #[test]
    fn log_level_parses() {
        let cli = Cli::try_parse_from(["devpulse", "--log-level", "debug"]).unwrap();
        assert_eq!(cli.log_level, LogLevel::Debug);
    }
}
