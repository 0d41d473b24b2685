use crate::types::{Sponsor, SponsorPage};
use async_trait::async_trait;
use http::StatusCode;

/// Number of sponsors requested per page.
pub const PAGE_SIZE: usize = 100;

#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    #[error("request to sponsor source failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("sponsor source returned status {0}")]
    Status(StatusCode),
    #[error("sponsor source returned errors: {0}")]
    GraphQl(String),
    #[error("sponsor source signalled another page without a cursor")]
    MissingCursor,
    #[error("invalid API token")]
    InvalidToken,
}

/// Upstream that lists sponsors one page at a time.
#[async_trait]
pub trait SponsorSource: Send + Sync {
    /// Fetch the page following `cursor`. No cursor requests the first page.
    async fn fetch_page(&self, cursor: Option<&str>) -> Result<SponsorPage, SourceError>;
}

/// Fetches every page from the source and concatenates them in source order.
///
/// Any page error aborts the whole fetch, no partial list is ever returned.
pub async fn fetch_all(source: &dyn SponsorSource) -> Result<Vec<Sponsor>, SourceError> {
    let mut sponsors = Vec::new();
    let mut cursor: Option<String> = None;
    let mut page_fetches = 0;

    loop {
        let page = source.fetch_page(cursor.as_deref()).await?;
        page_fetches += 1;
        sponsors.extend(page.sponsors);

        if !page.has_next_page {
            break;
        }

        cursor = Some(page.end_cursor.ok_or(SourceError::MissingCursor)?);
    }

    tracing::debug!(
        pages = page_fetches,
        sponsors = sponsors.len(),
        "Fetched sponsors"
    );

    Ok(sponsors)
}
