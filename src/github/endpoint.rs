use crate::error::FetchError;
use reqwest::Url;

const WEB_HOST: &str = "github.com";
const API_PREFIX: &str = "api.github.com/repos";

pub const MAX_PER_PAGE: u8 = 100;

/// Maps a repository web URL onto its commits listing,
/// e.g. `https://github.com/o/r` to `https://api.github.com/repos/o/r/commits`.
pub fn commits_endpoint(repo_url: &str) -> String {
    let trimmed = repo_url.trim().trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);
    format!("{}/commits", trimmed.replacen(WEB_HOST, API_PREFIX, 1))
}

/// First page URL for a repository, with the optional query parameters
/// percent-encoded.
pub fn first_page_url(
    repo_url: &str,
    per_page: Option<u8>,
    range_pairs: &[(&'static str, String)],
) -> Result<String, FetchError> {
    let endpoint = commits_endpoint(repo_url);
    let mut url = Url::parse(&endpoint)
        .map_err(|e| FetchError::Transport(format!("invalid endpoint '{endpoint}': {e}")))?;

    if per_page.is_some() || !range_pairs.is_empty() {
        let mut query = url.query_pairs_mut();
        if let Some(n) = per_page {
            query.append_pair("per_page", &n.clamp(1, MAX_PER_PAGE).to_string());
        }
        for (key, value) in range_pairs {
            query.append_pair(key, value);
        }
    }

    Ok(url.to_string())
}
