//! Input file handling.
//!
//! The input is a TOML document with a top-level `repo` array of tables, each
//! carrying a `url`:
//!
//! ```toml
//! [[repo]]
//! url = "https://github.com/owner/name"
//! ```

use crate::error::{PulseError, Result};
use crate::model::RepoRef;
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_INPUT_FILE: &str = "input.toml";

#[derive(Debug, Deserialize)]
struct InputFile {
    repo: Vec<RepoEntry>,
}

#[derive(Debug, Deserialize)]
struct RepoEntry {
    url: String,
}

/// Loads the repository list from `path`, preserving file order and
/// duplicates.
///
/// # Errors
/// * `PulseError::ConfigNotFound` if the file cannot be opened or read
/// * `PulseError::ConfigMalformed` if it is not TOML, lacks the `repo` array,
///   or an entry has no usable `url`
pub fn load_repositories(path: &Path) -> Result<Vec<RepoRef>> {
    let content = fs::read_to_string(path).map_err(|source| PulseError::ConfigNotFound {
        path: path.to_path_buf(),
        source,
    })?;

    parse_repositories(&content).map_err(|reason| PulseError::ConfigMalformed {
        path: path.to_path_buf(),
        reason,
    })
}

fn parse_repositories(content: &str) -> std::result::Result<Vec<RepoRef>, String> {
    let input: InputFile = toml::from_str(content).map_err(|e| e.message().to_string())?;

    input
        .repo
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| {
            let url = entry.url.trim();
            if url.is_empty() {
                Err(format!("repo entry {} has an empty url", idx + 1))
            } else {
                Ok(RepoRef::new(url))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn write_input(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(DEFAULT_INPUT_FILE);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn loads_entries_in_file_order() {
        let dir = TempDir::new().unwrap();
        let path = write_input(
            &dir,
            r#"
[[repo]]
url = "https://github.com/rust-lang/cargo"

[[repo]]
url = "https://github.com/rust-lang/rust"

[[repo]]
url = "https://github.com/rust-lang/cargo"
"#,
        );

        let repos = load_repositories(&path).unwrap();
        assert_eq!(
            repos,
            vec![
                RepoRef::new("https://github.com/rust-lang/cargo"),
                RepoRef::new("https://github.com/rust-lang/rust"),
                RepoRef::new("https://github.com/rust-lang/cargo"),
            ]
        );
    }

    #[test]
    fn empty_repo_array_is_valid() {
        let dir = TempDir::new().unwrap();
        let path = write_input(&dir, "repo = []\n");
        assert!(load_repositories(&path).unwrap().is_empty());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let dir = TempDir::new().unwrap();
        let path = write_input(
            &dir,
            "title = \"team\"\n[[repo]]\nurl = \"https://github.com/a/b\"\nbranch = \"main\"\n",
        );
        assert_eq!(load_repositories(&path).unwrap().len(), 1);
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = load_repositories(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, PulseError::ConfigNotFound { .. }));
    }

    #[test]
    fn invalid_toml_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = write_input(&dir, "[[repo]\nurl = ");
        let err = load_repositories(&path).unwrap_err();
        assert!(matches!(err, PulseError::ConfigMalformed { .. }));
    }

    #[test]
    fn missing_repo_key_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = write_input(&dir, "[settings]\nverbose = true\n");
        let err = load_repositories(&path).unwrap_err();
        assert!(matches!(err, PulseError::ConfigMalformed { .. }));
    }

    #[test]
    fn entry_without_url_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = write_input(&dir, "[[repo]]\nname = \"cargo\"\n");
        let err = load_repositories(&path).unwrap_err();
        assert!(err.to_string().contains("url"));
    }

    #[test]
    fn blank_url_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = write_input(&dir, "[[repo]]\nurl = \"   \"\n");
        let err = load_repositories(&path).unwrap_err();
        assert!(matches!(err, PulseError::ConfigMalformed { .. }));
    }
}
