//! Client-side Knowledge Hub state.
//!
//! The `HubQuery` is the only input; every fetch takes a ticket from a
//! [`RequestSequence`] and only the newest ticket may write results back.
//! Superseded responses, successful or not, are dropped without touching
//! the loading flag.

use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info, warn};

use hub_core::coordinator::{FetchOutcome, HubPage};
use hub_core::filters::{self, FilterCategory};
use hub_core::sequence::RequestSequence;
use hub_core::types::MediaItem;
use hub_core::url_state::HubQuery;

use crate::backend::HubBackend;
use crate::error::ClientError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub query: HubQuery,
    pub items: Vec<MediaItem>,
    pub total_count: u64,
    pub total_pages: u32,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The response was the newest and is now in the state.
    Page,
    /// A later fetch was issued while this one was in flight.
    Stale,
}

pub struct HubSession<B> {
    backend: B,
    sequence: RequestSequence,
    state: Mutex<SessionState>,
}

impl<B: HubBackend> HubSession<B> {
    pub fn new(backend: B, query: HubQuery) -> Self {
        Self {
            backend,
            sequence: RequestSequence::new(),
            state: Mutex::new(SessionState {
                query,
                ..SessionState::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> SessionState {
        self.lock().clone()
    }

    pub fn query(&self) -> HubQuery {
        self.lock().query.clone()
    }

    /// Fetch the page for the current query.
    pub async fn refresh(&self) -> Result<Applied, ClientError> {
        let (ticket, query) = {
            let mut state = self.lock();
            state.loading = true;
            (self.sequence.issue(), state.query.clone())
        };

        let result = self.fetch_clamped(&query).await;

        let mut state = self.lock();
        if !self.sequence.is_current(ticket) {
            debug!(ticket = ticket.value(), "discarding superseded response");
            return Ok(Applied::Stale);
        }
        state.loading = false;

        match result {
            Ok((clamped, page)) => {
                // only the page number is rewritten, and only if nothing
                // touched the query while this fetch was in flight
                if let Some(clamped) = clamped {
                    if state.query == query {
                        state.query = clamped;
                    }
                }
                state.items = page.items;
                state.total_count = page.total_count;
                state.total_pages = page.total_pages;
                state.error = None;
                Ok(Applied::Page)
            }
            Err(err) => {
                warn!(error = %err, "knowledge hub fetch failed");
                state.items.clear();
                state.total_count = 0;
                state.total_pages = 0;
                state.error = Some(err.display_message());
                Err(err)
            }
        }
    }

    /// Clear the error and fetch again. Nothing retries on its own.
    pub async fn retry(&self) -> Result<Applied, ClientError> {
        self.lock().error = None;
        self.refresh().await
    }

    /// One fetch, plus at most one more when the page was out of range.
    /// Returns the clamped query when a redirect was followed.
    async fn fetch_clamped(
        &self,
        query: &HubQuery,
    ) -> Result<(Option<HubQuery>, HubPage), ClientError> {
        match self.backend.fetch(query).await? {
            FetchOutcome::Page(page) => Ok((None, page)),
            FetchOutcome::Redirect { query: clamped } => {
                info!(requested = query.page, page = clamped.page, "following page clamp");
                match self.backend.fetch(&clamped).await? {
                    FetchOutcome::Page(page) => Ok((Some(clamped), page)),
                    FetchOutcome::Redirect { .. } => Err(ClientError::RedirectLoop),
                }
            }
        }
    }

    /// Write settled search text into the query. Returns false when the
    /// text matches what is already there.
    pub fn set_search(&self, text: &str) -> bool {
        self.lock().query.set_search(text)
    }

    pub fn toggle_filter(&self, category: FilterCategory, label: &str) {
        let mut state = self.lock();
        state.query = filters::toggle(&state.query, category, label);
    }

    pub fn clear_filters(&self) {
        self.lock().query.clear_filters();
    }

    pub fn go_to_page(&self, page: u32) {
        let mut state = self.lock();
        state.query = state.query.with_page(page);
    }
}
