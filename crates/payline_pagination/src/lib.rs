//! Cursor pagination for the Payline client.
//!
//! [`PaginationEngine`] is transport-agnostic: it drives any [`PageFetcher`]
//! (resource clients pass one backed by the request pipeline, tests pass a
//! closure) and offers four ways through a collection:
//!
//! - [`PaginationEngine::fetch_single_page`]: one bounded page
//! - [`PaginationEngine::fetch_all_pages`]: accumulate, bounded by page and item count
//! - [`PaginationEngine::paginator`]: a resumable [`Paginator`] with `next`/`reset`/`has_more`
//! - [`PaginationEngine::iterate_pages`] / [`PaginationEngine::iterate_items`]: lazy streams

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod engine;
mod fetcher;
mod paginator;

pub use engine::{DEFAULT_MAX_PAGES, FetchAllOptions, ItemStream, PageStream, PaginationEngine};
pub use fetcher::PageFetcher;
pub use paginator::{PageStep, Paginator};
