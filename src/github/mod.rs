pub mod client;
pub mod endpoint;
pub mod link;
pub mod transport;

pub use client::{CommitFetcher, FetchOutcome};
pub use transport::{Clock, HttpTransport, PageResponse, SystemClock, Transport};
