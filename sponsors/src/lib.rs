pub mod cache;
pub mod config;
pub mod github;
pub mod metrics_defs;
pub mod source;
#[cfg(any(test, feature = "testutils"))]
pub mod testutils;
pub mod types;

pub use cache::{CacheError, Snapshot, SponsorCache};
pub use github::GitHubSource;
pub use source::{PAGE_SIZE, SourceError, SponsorSource, fetch_all};
pub use types::{Sponsor, SponsorPage};
