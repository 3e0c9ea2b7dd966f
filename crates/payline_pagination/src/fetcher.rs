//! The page-fetch seam.

use async_trait::async_trait;
use payline_core::{Page, PageRequest};
use payline_error::PaylineResult;
use std::future::Future;

/// Fetches one page of a cursor-paginated collection.
///
/// The engine never talks to the network itself; it drives a fetcher. Any
/// `Fn(PageRequest) -> impl Future<Output = PaylineResult<Page<T>>>` closure
/// is a fetcher.
///
/// # Examples
///
/// ```
/// use payline_core::{Page, PageRequest};
/// use payline_error::PaylineResult;
/// use payline_pagination::PageFetcher;
///
/// async fn numbers(request: PageRequest) -> PaylineResult<Page<u32>> {
///     Ok(Page::new((0..request.limit).collect(), false, None))
/// }
///
/// fn assert_fetcher<F: PageFetcher<u32>>(_: &F) {}
/// assert_fetcher(&numbers);
/// ```
#[async_trait]
pub trait PageFetcher<T>: Send + Sync {
    /// Fetch the page described by `request`.
    async fn fetch_page(&self, request: &PageRequest) -> PaylineResult<Page<T>>;
}

#[async_trait]
impl<T, F, Fut> PageFetcher<T> for F
where
    T: Send + 'static,
    F: Fn(PageRequest) -> Fut + Send + Sync,
    Fut: Future<Output = PaylineResult<Page<T>>> + Send,
{
    async fn fetch_page(&self, request: &PageRequest) -> PaylineResult<Page<T>> {
        (self)(request.clone()).await
    }
}
