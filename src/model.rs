use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub const SCHEMA_VERSION: u32 = 1;

/// A repository as listed in the input file, identified by its web URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRef {
    pub url: String,
}

impl RepoRef {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// One element of a `/commits` page. Only the fields the aggregation needs are
/// decoded; everything else in the payload is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitRecord {
    #[serde(default)]
    pub sha: Option<String>,
    pub commit: CommitDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitDetail {
    #[serde(default)]
    pub author: Option<CommitAuthor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitAuthor {
    pub name: String,
    pub date: String,
}

impl CommitRecord {
    pub fn new(name: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            sha: None,
            commit: CommitDetail {
                author: Some(CommitAuthor {
                    name: name.into(),
                    date: date.into(),
                }),
            },
        }
    }

    pub fn author_name(&self) -> Option<&str> {
        self.commit.author.as_ref().map(|a| a.name.as_str())
    }

    /// First ten characters of the authorship timestamp (`YYYY-MM-DD`).
    pub fn day_key(&self) -> Option<&str> {
        let date = self.commit.author.as_ref()?.date.as_str();
        let end = date
            .char_indices()
            .map(|(idx, _)| idx)
            .chain(std::iter::once(date.len()))
            .nth(10)?;
        Some(&date[..end])
    }
}

/// Day key to the distinct author names seen on that day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailyActivity {
    days: BTreeMap<String, BTreeSet<String>>,
}

impl DailyActivity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the author was not yet recorded for that day.
    pub fn record(&mut self, day: &str, author: &str) -> bool {
        self.days
            .entry(day.to_string())
            .or_default()
            .insert(author.to_string())
    }

    pub fn days(&self) -> usize {
        self.days.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeSet<String>)> {
        self.days.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRow {
    pub date: String,
    #[serde(rename = "active developers")]
    pub active_developers: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoReport {
    pub url: String,
    pub commits: usize,
    pub pages: usize,
    pub complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub repositories: Vec<RepoReport>,
    pub since: Option<String>,
    pub until: Option<String>,
    pub rows: Vec<ActivityRow>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DateRange {
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new() -> Self {
        Self { since: None, until: None }
    }

    pub fn with_since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    pub fn with_until(mut self, until: DateTime<Utc>) -> Self {
        self.until = Some(until);
        self
    }

    /// Query parameters understood by the commits endpoint.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(since) = self.since {
            pairs.push(("since", since.to_rfc3339_opts(SecondsFormat::Secs, true)));
        }
        if let Some(until) = self.until {
            pairs.push(("until", until.to_rfc3339_opts(SecondsFormat::Secs, true)));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn commit_record_decodes_api_shape() {
        let json = r#"{
            "sha": "abc123",
            "commit": {
                "author": {"name": "Alice", "email": "a@example.com", "date": "2024-01-01T10:00:00Z"},
                "message": "init"
            },
            "author": null
        }"#;
        let record: CommitRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.sha.as_deref(), Some("abc123"));
        assert_eq!(record.author_name(), Some("Alice"));
        assert_eq!(record.day_key(), Some("2024-01-01"));
    }

    #[test]
    fn missing_author_yields_no_key() {
        let record: CommitRecord = serde_json::from_str(r#"{"commit": {"author": null}}"#).unwrap();
        assert_eq!(record.author_name(), None);
        assert_eq!(record.day_key(), None);
    }

    #[test]
    fn short_date_yields_no_key() {
        let record = CommitRecord::new("Alice", "2024-01");
        assert_eq!(record.day_key(), None);
    }

    #[test]
    fn day_key_counts_characters_not_bytes() {
        let record = CommitRecord::new("Zoe", "2024-01-0é");
        assert_eq!(record.day_key(), Some("2024-01-0é"));

        let record = CommitRecord::new("Zoe", "2024-01-0éT10:00:00Z");
        assert_eq!(record.day_key(), Some("2024-01-0é"));
    }

    #[test]
    fn record_deduplicates_authors_per_day() {
        let mut activity = DailyActivity::new();
        assert!(activity.record("2024-01-01", "Alice"));
        assert!(!activity.record("2024-01-01", "Alice"));
        assert!(activity.record("2024-01-01", "alice"));
        let counts: Vec<_> = activity.iter().map(|(day, a)| (day.as_str(), a.len())).collect();
        assert_eq!(counts, vec![("2024-01-01", 2)]);
        assert_eq!(activity.days(), 1);
    }

    #[test]
    fn date_range_query_pairs() {
        let since = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let range = DateRange::new().with_since(since);
        assert_eq!(
            range.query_pairs(),
            vec![("since", "2024-01-01T00:00:00Z".to_string())]
        );
    }
}
