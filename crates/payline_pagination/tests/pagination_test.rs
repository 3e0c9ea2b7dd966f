//! Pagination engine behaviour against a scripted collection.

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use payline_core::{CursorOptions, Page, PageRequest};
use payline_error::{HttpError, PaylineResult};
use payline_pagination::{FetchAllOptions, PageFetcher, PaginationEngine};
use std::sync::{Arc, Mutex};

/// Serves `total` items named `item_1..=item_total`, recording every request.
#[derive(Debug, Default)]
struct ScriptedCollection {
    total: usize,
    requests: Mutex<Vec<PageRequest>>,
    fail_on_call: Option<usize>,
}

impl ScriptedCollection {
    fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    fn failing_on(total: usize, call: usize) -> Self {
        Self {
            total,
            fail_on_call: Some(call),
            ..Self::default()
        }
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher<String> for ScriptedCollection {
    async fn fetch_page(&self, request: &PageRequest) -> PaylineResult<Page<String>> {
        let call = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
            requests.len()
        };
        if self.fail_on_call == Some(call) {
            return Err(HttpError::new("connection reset").into());
        }

        let start = match &request.after_id {
            Some(after) => after.trim_start_matches("item_").parse::<usize>().unwrap(),
            None => 0,
        };
        let end = (start + request.limit as usize).min(self.total);
        let data: Vec<String> = (start + 1..=end).map(|i| format!("item_{}", i)).collect();
        let has_more = end < self.total;
        let after_id = if has_more { data.last().cloned() } else { None };
        Ok(Page::new(data, has_more, after_id))
    }
}

fn engine(collection: &Arc<ScriptedCollection>) -> PaginationEngine<String, ScriptedCollection> {
    PaginationEngine::from_arc(Arc::clone(collection))
}

#[tokio::test]
async fn test_fetch_all_twenty_five_items_in_three_pages() -> anyhow::Result<()> {
    let collection = Arc::new(ScriptedCollection::new(25));
    let engine = engine(&collection);

    let items = engine
        .fetch_all_pages(&FetchAllOptions::new(CursorOptions::new().with_limit(10)))
        .await?;

    assert_eq!(items.len(), 25);
    assert_eq!(items.first().map(String::as_str), Some("item_1"));
    assert_eq!(items.last().map(String::as_str), Some("item_25"));
    let cursors: Vec<Option<String>> = collection
        .requests()
        .into_iter()
        .map(|r| r.after_id)
        .collect();
    assert_eq!(
        cursors,
        vec![None, Some("item_10".to_string()), Some("item_20".to_string())]
    );
    Ok(())
}

#[tokio::test]
async fn test_fetch_all_item_cap_is_exact() -> anyhow::Result<()> {
    let collection = Arc::new(ScriptedCollection::new(25));
    let engine = engine(&collection);

    let items = engine
        .fetch_all_pages(
            &FetchAllOptions::new(CursorOptions::new().with_limit(10)).with_max_items(15),
        )
        .await?;

    let expected: Vec<String> = (1..=15).map(|i| format!("item_{}", i)).collect();
    assert_eq!(items, expected);
    assert_eq!(collection.calls(), 2);
    Ok(())
}

#[tokio::test]
async fn test_fetch_all_respects_page_cap() -> anyhow::Result<()> {
    for max_pages in [0usize, 1, 2, 7] {
        let collection = Arc::new(ScriptedCollection::new(1000));
        let engine = engine(&collection);

        let items = engine
            .fetch_all_pages(
                &FetchAllOptions::new(CursorOptions::new().with_limit(3)).with_max_pages(max_pages),
            )
            .await?;

        assert_eq!(collection.calls(), max_pages);
        assert_eq!(items.len(), max_pages * 3);
    }
    Ok(())
}

#[tokio::test]
async fn test_fetch_all_stops_when_cursor_missing() -> anyhow::Result<()> {
    let calls = Arc::new(Mutex::new(0usize));
    let counter = Arc::clone(&calls);
    let engine = PaginationEngine::new(move |_request: PageRequest| {
        let counter = Arc::clone(&counter);
        async move {
            *counter.lock().unwrap() += 1;
            PaylineResult::Ok(Page::new(vec![1u32, 2, 3], true, None))
        }
    });

    let items = engine.fetch_all_pages(&FetchAllOptions::default()).await?;
    assert_eq!(items, vec![1, 2, 3]);
    assert_eq!(*calls.lock().unwrap(), 1);
    Ok(())
}

#[tokio::test]
async fn test_invalid_limit_never_fetches() {
    let collection = Arc::new(ScriptedCollection::new(5));
    let engine = engine(&collection);

    let err = engine
        .fetch_single_page(&CursorOptions::new().with_limit(0))
        .await
        .unwrap_err();
    assert_eq!(err.as_validation().unwrap().field(), "limit");

    let err = engine
        .fetch_all_pages(&FetchAllOptions::new(CursorOptions::new().with_limit(101)))
        .await
        .unwrap_err();
    assert!(err.as_validation().is_some());
    assert_eq!(collection.calls(), 0);
}

#[tokio::test]
async fn test_single_page_forwards_cursor_and_filters() -> anyhow::Result<()> {
    let collection = Arc::new(ScriptedCollection::new(25));
    let engine = engine(&collection);

    let page = engine
        .fetch_single_page(
            &CursorOptions::new()
                .with_after_id("item_20")
                .with_param("status", "ACTIVE"),
        )
        .await?;

    assert_eq!(page.data, vec!["item_21", "item_22", "item_23", "item_24", "item_25"]);
    assert!(!page.has_more);
    let request = &collection.requests()[0];
    assert_eq!(request.limit, 10);
    assert_eq!(request.params.get("status").map(String::as_str), Some("ACTIVE"));
    Ok(())
}

#[tokio::test]
async fn test_fetch_error_propagates_unchanged() {
    let collection = Arc::new(ScriptedCollection::failing_on(25, 2));
    let engine = engine(&collection);

    let err = engine
        .fetch_all_pages(&FetchAllOptions::default())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("connection reset"));
    assert_eq!(collection.calls(), 2);
}

#[tokio::test]
async fn test_paginator_walks_and_exhausts() -> anyhow::Result<()> {
    let collection = Arc::new(ScriptedCollection::new(25));
    let engine = engine(&collection);
    let mut paginator = engine.paginator(CursorOptions::new().with_limit(10));

    let sizes = {
        let mut sizes = Vec::new();
        while paginator.has_more() {
            let step = paginator.next().await?;
            sizes.push((step.value.len(), step.done));
        }
        sizes
    };
    assert_eq!(sizes, vec![(10, false), (10, false), (5, true)]);

    // Exhaustion is stable and costs no fetches
    for _ in 0..3 {
        let step = paginator.next().await?;
        assert!(step.done);
        assert!(step.value.is_empty());
    }
    assert_eq!(collection.calls(), 3);
    Ok(())
}

#[tokio::test]
async fn test_paginator_reset_is_idempotent() -> anyhow::Result<()> {
    let collection = Arc::new(ScriptedCollection::new(25));
    let engine = engine(&collection);
    let mut paginator = engine.paginator(CursorOptions::new().with_limit(10));

    let first = paginator.next().await?;
    paginator.next().await?;

    paginator.reset(None);
    let again = paginator.next().await?;
    assert_eq!(again, first);

    paginator.reset(None);
    paginator.reset(None);
    let once_more = paginator.next().await?;
    assert_eq!(once_more, first);
    Ok(())
}

#[tokio::test]
async fn test_paginator_reset_with_overrides() -> anyhow::Result<()> {
    let collection = Arc::new(ScriptedCollection::new(25));
    let engine = engine(&collection);
    let mut paginator = engine.paginator(CursorOptions::new().with_limit(10));

    while paginator.has_more() {
        paginator.next().await?;
    }
    assert!(!paginator.has_more());

    paginator.reset(Some(CursorOptions::new().with_after_id("item_22")));
    assert!(paginator.has_more());
    let step = paginator.next().await?;
    assert_eq!(step.value.data, vec!["item_23", "item_24", "item_25"]);
    assert!(step.done);

    // Overrides do not stick
    paginator.reset(None);
    assert_eq!(paginator.cursor().after_id, None);
    Ok(())
}

#[tokio::test]
async fn test_paginator_error_keeps_cursor() -> anyhow::Result<()> {
    let collection = Arc::new(ScriptedCollection::failing_on(25, 2));
    let engine = engine(&collection);
    let mut paginator = engine.paginator(CursorOptions::new().with_limit(10));

    paginator.next().await?;
    assert!(paginator.next().await.is_err());
    assert_eq!(paginator.cursor().after_id.as_deref(), Some("item_10"));

    let step = paginator.next().await?;
    assert_eq!(step.value.data.first().map(String::as_str), Some("item_11"));
    Ok(())
}

#[tokio::test]
async fn test_iterate_pages_is_lazy_and_finite() -> anyhow::Result<()> {
    let collection = Arc::new(ScriptedCollection::new(25));
    let engine = engine(&collection);

    let mut pages = engine.iterate_pages(CursorOptions::new().with_limit(10));
    assert_eq!(collection.calls(), 0);

    let first = pages.next().await.transpose()?;
    assert_eq!(first.map(|p| p.len()), Some(10));
    assert_eq!(collection.calls(), 1);
    drop(pages);
    assert_eq!(collection.calls(), 1);

    let all: Vec<Page<String>> = engine
        .iterate_pages(CursorOptions::new().with_limit(10))
        .try_collect()
        .await?;
    assert_eq!(all.iter().map(Page::len).collect::<Vec<_>>(), vec![10, 10, 5]);
    Ok(())
}

#[tokio::test]
async fn test_iterate_pages_ends_after_error() {
    let collection = Arc::new(ScriptedCollection::failing_on(25, 2));
    let engine = engine(&collection);

    let results: Vec<PaylineResult<Page<String>>> = engine
        .iterate_pages(CursorOptions::new().with_limit(10))
        .collect()
        .await;

    assert_eq!(results.len(), 2);
    assert!(results[0].is_ok());
    assert!(results[1].is_err());
}

#[tokio::test]
async fn test_iterate_items_stops_without_extra_fetch() -> anyhow::Result<()> {
    let collection = Arc::new(ScriptedCollection::new(25));
    let engine = engine(&collection);

    let items: Vec<String> = engine
        .iterate_items(CursorOptions::new().with_limit(10), Some(10))
        .try_collect()
        .await?;
    assert_eq!(items.len(), 10);
    assert_eq!(collection.calls(), 1);

    let items: Vec<String> = engine
        .iterate_items(CursorOptions::new().with_limit(10), None)
        .try_collect()
        .await?;
    assert_eq!(items.len(), 25);
    Ok(())
}

#[tokio::test]
async fn test_iterate_items_early_drop_fetches_nothing_more() -> anyhow::Result<()> {
    let collection = Arc::new(ScriptedCollection::new(25));
    let engine = engine(&collection);

    let taken: Vec<String> = engine
        .iterate_items(CursorOptions::new().with_limit(10), None)
        .take(3)
        .try_collect()
        .await?;
    assert_eq!(taken, vec!["item_1", "item_2", "item_3"]);
    assert_eq!(collection.calls(), 1);
    Ok(())
}
