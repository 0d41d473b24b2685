use crate::source::{SourceError, SponsorSource};
use crate::types::{Sponsor, SponsorPage};
use async_trait::async_trait;
use http::StatusCode;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub fn make_sponsors(count: usize) -> Vec<Sponsor> {
    (0..count)
        .map(|i| {
            Sponsor::new(
                format!("Sponsor {i}"),
                format!("sponsor{i}"),
                format!("https://avatars.githubusercontent.com/u/{i}"),
            )
        })
        .collect()
}

/// In-memory source that serves a fixed list in pages of `page_size`.
///
/// Cursors are the offset of the next page (`cursor:{offset}`). Records every
/// cursor it was asked for and can be told to fail.
pub struct PagedSource {
    sponsors: Mutex<Vec<Sponsor>>,
    page_size: usize,
    page_calls: AtomicUsize,
    cursors_seen: Mutex<Vec<Option<String>>>,
    // 1-based page number that returns an error, counted across all fetches.
    fail_on_page: Mutex<Option<usize>>,
    fail_all: Mutex<bool>,
}

impl PagedSource {
    pub fn new(sponsors: Vec<Sponsor>, page_size: usize) -> Self {
        PagedSource {
            sponsors: Mutex::new(sponsors),
            page_size,
            page_calls: AtomicUsize::new(0),
            cursors_seen: Mutex::new(Vec::new()),
            fail_on_page: Mutex::new(None),
            fail_all: Mutex::new(false),
        }
    }

    pub fn page_calls(&self) -> usize {
        self.page_calls.load(Ordering::SeqCst)
    }

    pub fn cursors_seen(&self) -> Vec<Option<String>> {
        self.cursors_seen.lock().unwrap().clone()
    }

    pub fn fail_on_page(&self, page: usize) {
        *self.fail_on_page.lock().unwrap() = Some(page);
    }

    pub fn set_failing(&self, failing: bool) {
        *self.fail_all.lock().unwrap() = failing;
    }

    pub fn set_sponsors(&self, sponsors: Vec<Sponsor>) {
        *self.sponsors.lock().unwrap() = sponsors;
    }
}

#[async_trait]
impl SponsorSource for PagedSource {
    async fn fetch_page(&self, cursor: Option<&str>) -> Result<SponsorPage, SourceError> {
        let call = self.page_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.cursors_seen
            .lock()
            .unwrap()
            .push(cursor.map(String::from));

        if *self.fail_all.lock().unwrap() || *self.fail_on_page.lock().unwrap() == Some(call) {
            return Err(SourceError::Status(StatusCode::BAD_GATEWAY));
        }

        let offset = match cursor {
            Some(c) => c
                .strip_prefix("cursor:")
                .and_then(|o| o.parse::<usize>().ok())
                .ok_or_else(|| SourceError::GraphQl(format!("unknown cursor {c}")))?,
            None => 0,
        };

        let sponsors = self.sponsors.lock().unwrap();
        let end = (offset + self.page_size).min(sponsors.len());
        let page = sponsors.get(offset..end).unwrap_or_default().to_vec();

        Ok(SponsorPage {
            sponsors: page,
            has_next_page: end < sponsors.len(),
            end_cursor: Some(format!("cursor:{end}")),
        })
    }
}
