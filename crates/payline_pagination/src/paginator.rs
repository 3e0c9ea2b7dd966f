//! Resumable, stateful page traversal.

use crate::PageFetcher;
use payline_core::{CursorOptions, Page};
use payline_error::PaylineResult;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Result of one [`Paginator::next`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct PageStep<T> {
    /// The fetched page, empty once the paginator is exhausted
    pub value: Page<T>,
    /// True when the server reported no further pages
    pub done: bool,
}

/// Walks a collection one page at a time, remembering its cursor.
///
/// Once the last page has been returned the paginator is exhausted: further
/// [`next`](Self::next) calls return an empty, done step without fetching,
/// until [`reset`](Self::reset).
///
/// State only changes after a fetch completes, so dropping a pending `next`
/// future leaves the cursor where it was.
pub struct Paginator<T, F> {
    fetcher: Arc<F>,
    initial: CursorOptions,
    cursor: CursorOptions,
    exhausted: bool,
    _marker: PhantomData<fn() -> T>,
}

impl<T, F> Paginator<T, F>
where
    F: PageFetcher<T>,
{
    pub(crate) fn new(fetcher: Arc<F>, initial: CursorOptions) -> Self {
        Self {
            fetcher,
            cursor: initial.clone(),
            initial,
            exhausted: false,
            _marker: PhantomData,
        }
    }

    /// Fetch the next page and advance the cursor.
    ///
    /// The cursor advances only when the page reports more results and names
    /// an `after_id`; otherwise the paginator becomes exhausted.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an out-of-range limit, or the fetcher's
    /// error unchanged. The cursor is not moved on error.
    #[instrument(skip(self), fields(after_id = ?self.cursor.after_id))]
    pub async fn next(&mut self) -> PaylineResult<PageStep<T>> {
        if self.exhausted {
            debug!("Paginator exhausted, not fetching");
            return Ok(PageStep {
                value: Page::empty(),
                done: true,
            });
        }

        let request = self.cursor.to_request()?;
        let page = self.fetcher.fetch_page(&request).await?;

        match page.next_cursor() {
            Some(after_id) => {
                self.cursor.after_id = Some(after_id.to_string());
                self.cursor.before_id = None;
            }
            None => self.exhausted = true,
        }
        debug!(items = page.len(), has_more = page.has_more, "Fetched page");

        let done = !page.has_more;
        Ok(PageStep { value: page, done })
    }

    /// Rewind to the initial options, overlaid with `overrides` if given.
    ///
    /// Allowed in any state; clears exhaustion. The overrides apply to this
    /// traversal only, a later `reset(None)` returns to the initial options.
    pub fn reset(&mut self, overrides: Option<CursorOptions>) {
        self.cursor = match overrides {
            Some(overrides) => self.initial.merge(&overrides),
            None => self.initial.clone(),
        };
        self.exhausted = false;
    }

    /// Whether another [`next`](Self::next) call would fetch. Never fetches.
    pub fn has_more(&self) -> bool {
        !self.exhausted
    }

    /// Options the next fetch will use.
    pub fn cursor(&self) -> &CursorOptions {
        &self.cursor
    }
}

impl<T, F> std::fmt::Debug for Paginator<T, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Paginator")
            .field("initial", &self.initial)
            .field("cursor", &self.cursor)
            .field("exhausted", &self.exhausted)
            .finish()
    }
}
