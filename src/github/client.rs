use super::endpoint::first_page_url;
use super::link::next_link;
use super::transport::{Clock, PageResponse, Transport};
use crate::error::FetchError;
use crate::model::{CommitRecord, DateRange, RepoRef, RepoReport};
use std::time::Duration;
use tracing::{debug, info, warn};

const BODY_SNIPPET_CHARS: usize = 200;

/// Records fetched for one repository, plus how the fetch went.
#[derive(Debug)]
pub struct FetchOutcome {
    pub records: Vec<CommitRecord>,
    pub report: RepoReport,
}

struct Page {
    records: Vec<CommitRecord>,
    next: Option<String>,
}

/// Walks the paginated commit listing of a repository.
///
/// Pagination follows the `rel="next"` relation of the `Link` header. A 403
/// carrying `X-RateLimit-Reset` puts the thread to sleep until the reset and
/// retries the same page, as often as needed. Any other failure ends the walk
/// for that repository and keeps whatever was already fetched.
pub struct CommitFetcher<T, C> {
    transport: T,
    clock: C,
    per_page: Option<u8>,
    range: DateRange,
}

impl<T: Transport, C: Clock> CommitFetcher<T, C> {
    pub fn new(transport: T, clock: C) -> Self {
        Self {
            transport,
            clock,
            per_page: None,
            range: DateRange::new(),
        }
    }

    pub fn with_per_page(mut self, per_page: Option<u8>) -> Self {
        self.per_page = per_page;
        self
    }

    pub fn with_range(mut self, range: DateRange) -> Self {
        self.range = range;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn fetch(&self, repo: &RepoRef) -> FetchOutcome {
        let mut records = Vec::new();
        let mut pages = 0usize;
        let mut failure: Option<FetchError> = None;

        match first_page_url(&repo.url, self.per_page, &self.range.query_pairs()) {
            Ok(first) => {
                let mut url = first;
                loop {
                    match self.request_page(&url) {
                        Ok(page) => {
                            pages += 1;
                            debug!(url = %url, count = page.records.len(), "Fetched commit page");
                            records.extend(page.records);
                            match page.next {
                                Some(next) => url = next,
                                None => break,
                            }
                        }
                        Err(FetchError::RateLimited { reset }) => self.wait_for_reset(reset),
                        Err(e) => {
                            failure = Some(e);
                            break;
                        }
                    }
                }
            }
            Err(e) => failure = Some(e),
        }

        if let Some(e) = &failure {
            warn!(
                repo = %repo.url,
                fetched = records.len(),
                error = %e,
                "An error occurred while fetching commit history; keeping partial results"
            );
        } else {
            info!(repo = %repo.url, commits = records.len(), pages, "Fetched commit history");
        }

        let report = RepoReport {
            url: repo.url.clone(),
            commits: records.len(),
            pages,
            complete: failure.is_none(),
            error: failure.map(|e| e.to_string()),
        };

        FetchOutcome { records, report }
    }

    fn request_page(&self, url: &str) -> Result<Page, FetchError> {
        let response = self.transport.get(url)?;
        classify(response)
    }

    /// Sleeps until `reset`. A reset already in the past returns at once, so a
    /// persistent 403 with a stale reset header is retried without delay.
    fn wait_for_reset(&self, reset: i64) {
        let wait = reset - self.clock.now();
        if wait > 0 {
            warn!(wait_secs = wait, reset, "Rate limited, sleeping until the limit resets");
            self.clock.sleep(Duration::from_secs(wait as u64));
        } else {
            debug!(reset, "Rate limit reset already passed, retrying");
        }
    }
}

fn classify(response: PageResponse) -> Result<Page, FetchError> {
    match response.status {
        200..=299 => {
            let records: Vec<CommitRecord> = serde_json::from_str(&response.body)?;
            let next = response.link.as_deref().and_then(next_link);
            Ok(Page { records, next })
        }
        403 => match response.rate_limit_reset {
            Some(reset) => Err(FetchError::RateLimited { reset }),
            None => Err(status_error(response)),
        },
        _ => Err(status_error(response)),
    }
}

fn status_error(response: PageResponse) -> FetchError {
    FetchError::Status {
        status: response.status,
        body: response.body.chars().take(BODY_SNIPPET_CHARS).collect(),
    }
}
