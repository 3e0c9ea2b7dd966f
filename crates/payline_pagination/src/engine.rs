//! Transport-agnostic pagination over a [`PageFetcher`].

use crate::{PageFetcher, PageStep, Paginator};
use async_stream::stream;
use futures_util::stream::{Stream, try_unfold};
use payline_core::{CursorOptions, Page};
use payline_error::{PaylineError, PaylineResult};
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Page count cap applied by [`FetchAllOptions::default`].
pub const DEFAULT_MAX_PAGES: usize = 100;

/// Lazy stream of pages.
pub type PageStream<T> = Pin<Box<dyn Stream<Item = PaylineResult<Page<T>>> + Send>>;

/// Lazy stream of individual items.
pub type ItemStream<T> = Pin<Box<dyn Stream<Item = PaylineResult<T>> + Send>>;

/// Bounds for [`PaginationEngine::fetch_all_pages`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchAllOptions {
    /// Where to start and which filters to apply
    pub cursor: CursorOptions,
    /// Stop after this many fetches
    pub max_pages: usize,
    /// Stop once this many items were collected
    pub max_items: Option<usize>,
}

impl FetchAllOptions {
    /// Fetch everything reachable from `cursor`, within the default page cap.
    pub fn new(cursor: CursorOptions) -> Self {
        Self {
            cursor,
            ..Self::default()
        }
    }

    /// Cap the number of fetches.
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Cap the number of items returned.
    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = Some(max_items);
        self
    }
}

impl Default for FetchAllOptions {
    fn default() -> Self {
        Self {
            cursor: CursorOptions::default(),
            max_pages: DEFAULT_MAX_PAGES,
            max_items: None,
        }
    }
}

/// Drives a [`PageFetcher`] through cursor-paginated collections.
///
/// # Examples
///
/// ```
/// use payline_core::{CursorOptions, Page, PageRequest};
/// use payline_error::{PaylineError, PaylineResult};
/// use payline_pagination::{FetchAllOptions, PaginationEngine};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> PaylineResult<()> {
/// // 25 numbered items served 10 at a time
/// let engine = PaginationEngine::new(|request: PageRequest| async move {
///     let start: usize = request.after_id.as_deref().map_or(0, |id| id.parse().unwrap());
///     let end = (start + request.limit as usize).min(25);
///     let has_more = end < 25;
///     let after_id = has_more.then(|| end.to_string());
///     PaylineResult::Ok(Page::new((start..end).collect::<Vec<_>>(), has_more, after_id))
/// });
///
/// let all = engine.fetch_all_pages(&FetchAllOptions::default()).await?;
/// assert_eq!(all.len(), 25);
///
/// let first = engine.fetch_single_page(&CursorOptions::new().with_limit(5)).await?;
/// assert_eq!(first.data, vec![0, 1, 2, 3, 4]);
/// # Ok(())
/// # }
/// ```
pub struct PaginationEngine<T, F> {
    fetcher: Arc<F>,
    _marker: PhantomData<fn() -> T>,
}

impl<T, F> Clone for PaginationEngine<T, F> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            _marker: PhantomData,
        }
    }
}

impl<T, F> std::fmt::Debug for PaginationEngine<T, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginationEngine").finish_non_exhaustive()
    }
}

impl<T, F> PaginationEngine<T, F>
where
    F: PageFetcher<T>,
{
    /// Create an engine around `fetcher`.
    pub fn new(fetcher: F) -> Self {
        Self::from_arc(Arc::new(fetcher))
    }

    /// Create an engine around a shared fetcher.
    pub fn from_arc(fetcher: Arc<F>) -> Self {
        Self {
            fetcher,
            _marker: PhantomData,
        }
    }

    /// Fetch exactly one page.
    ///
    /// # Errors
    ///
    /// Returns a validation error, without fetching, when the limit is outside
    /// `1..=100`. Fetcher errors propagate unchanged.
    #[instrument(skip(self, options), fields(limit = ?options.limit, after_id = ?options.after_id))]
    pub async fn fetch_single_page(&self, options: &CursorOptions) -> PaylineResult<Page<T>> {
        let request = options.to_request()?;
        self.fetcher.fetch_page(&request).await
    }

    /// Follow the cursor and collect items until a bound is hit.
    ///
    /// Stops when `max_items` were collected (truncating the last page), when
    /// `max_pages` pages were fetched, when the server reports no more pages,
    /// or when a page claims more results but gives no cursor to follow.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any fetch for an invalid limit. The
    /// first fetcher error aborts the walk and is returned unchanged.
    #[instrument(skip(self, options), fields(max_pages = options.max_pages, max_items = ?options.max_items))]
    pub async fn fetch_all_pages(&self, options: &FetchAllOptions) -> PaylineResult<Vec<T>> {
        let mut request = options.cursor.to_request()?;
        let mut items = Vec::new();
        let mut pages = 0usize;

        loop {
            if pages >= options.max_pages {
                debug!(pages, "Reached page cap");
                break;
            }
            if options.max_items.is_some_and(|max| items.len() >= max) {
                break;
            }

            let page = self.fetcher.fetch_page(&request).await?;
            pages += 1;
            let has_more = page.has_more;
            let after_id = page.after_id;
            items.extend(page.data);

            if let Some(max) = options.max_items {
                if items.len() >= max {
                    items.truncate(max);
                    debug!(max, "Reached item cap");
                    break;
                }
            }
            if !has_more {
                break;
            }
            match after_id {
                Some(after_id) => {
                    request.after_id = Some(after_id);
                    request.before_id = None;
                }
                None => {
                    warn!(pages, "Page reports more results without a cursor, stopping");
                    break;
                }
            }
        }

        debug!(pages, items = items.len(), "Finished collecting pages");
        Ok(items)
    }

    /// A resumable paginator starting from `initial`.
    pub fn paginator(&self, initial: CursorOptions) -> Paginator<T, F> {
        Paginator::new(Arc::clone(&self.fetcher), initial)
    }
}

impl<T, F> PaginationEngine<T, F>
where
    T: Send + 'static,
    F: PageFetcher<T> + 'static,
{
    /// Lazily yield pages, one fetch per poll.
    ///
    /// The stream is finite and forward-only. It ends after the last page or
    /// after yielding the first error. Dropping it stops all fetching.
    pub fn iterate_pages(&self, options: CursorOptions) -> PageStream<T> {
        let paginator = self.paginator(options);
        Box::pin(try_unfold(paginator, |mut paginator| async move {
            if !paginator.has_more() {
                return Ok(None);
            }
            let PageStep { value, .. } = paginator.next().await?;
            Ok::<_, PaylineError>(Some((value, paginator)))
        }))
    }

    /// Lazily yield items across pages.
    ///
    /// With `max_items` set, the stream ends as soon as that many items were
    /// yielded and fetches no further page.
    pub fn iterate_items(&self, options: CursorOptions, max_items: Option<usize>) -> ItemStream<T> {
        let mut paginator = self.paginator(options);
        Box::pin(stream! {
            let mut yielded = 0usize;
            'pages: while paginator.has_more() && !max_items.is_some_and(|max| yielded >= max) {
                let step = match paginator.next().await {
                    Ok(step) => step,
                    Err(err) => {
                        yield Err(err);
                        break 'pages;
                    }
                };
                for item in step.value.data {
                    yield Ok(item);
                    yielded += 1;
                    if max_items.is_some_and(|max| yielded >= max) {
                        break 'pages;
                    }
                }
            }
        })
    }
}
