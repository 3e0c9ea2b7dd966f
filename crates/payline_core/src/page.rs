//! Cursor pagination types.
//!
//! List endpoints return pages addressed by opaque cursors (`after_id` /
//! `before_id`) rather than numeric offsets. [`CursorOptions`] is what callers
//! build; [`PageRequest`] is the validated form handed to a page fetcher.

use payline_error::{PaylineResult, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Page size used when the caller does not pick one.
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Largest page size the API accepts.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Anything that carries a server-assigned identifier usable as a cursor.
pub trait Identifiable {
    /// The resource identifier.
    fn id(&self) -> &str;
}

/// One page of a cursor-paginated collection.
///
/// Items keep the order the server returned them in.
///
/// # Examples
///
/// ```
/// use payline_core::Page;
///
/// let page = Page::new(vec![1, 2, 3], true, Some("item_3".to_string()));
/// assert_eq!(page.len(), 3);
/// assert!(page.has_more);
///
/// let empty: Page<u32> = Page::empty();
/// assert!(empty.is_empty());
/// assert!(!empty.has_more);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page, in server order
    pub data: Vec<T>,
    /// Whether the server reports more items after this page
    pub has_more: bool,
    /// Cursor to resume after this page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_id: Option<String>,
}

impl<T> Page<T> {
    /// Create a page.
    pub fn new(data: Vec<T>, has_more: bool, after_id: Option<String>) -> Self {
        Self {
            data,
            has_more,
            after_id,
        }
    }

    /// A page with no items and nothing after it.
    pub fn empty() -> Self {
        Self::new(Vec::new(), false, None)
    }

    /// Number of items on the page.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the page holds no items.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Cursor for the next page, only when the server reports one exists.
    pub fn next_cursor(&self) -> Option<&str> {
        if self.has_more {
            self.after_id.as_deref()
        } else {
            None
        }
    }

    /// Consume the page, keeping its items.
    pub fn into_data(self) -> Vec<T> {
        self.data
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Wire envelope returned by list endpoints.
///
/// ```json
/// { "data": [...], "has_more": true, "after_id": "cust_123" }
/// ```
///
/// Some endpoints omit `after_id`; [`ListEnvelope::into_page`] then falls
/// back to the id of the last item.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ListEnvelope<T> {
    /// Items on this page
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    /// Whether more items follow
    #[serde(default)]
    pub has_more: bool,
    /// Explicit resume cursor, if the server sent one
    #[serde(default)]
    pub after_id: Option<String>,
}

impl<T: Identifiable> ListEnvelope<T> {
    /// Convert into a [`Page`], deriving the cursor when it is missing.
    pub fn into_page(self) -> Page<T> {
        let after_id = self.after_id.or_else(|| {
            if self.has_more {
                self.data.last().map(|item| item.id().to_string())
            } else {
                None
            }
        });
        Page::new(self.data, self.has_more, after_id)
    }
}

/// Caller-facing pagination options.
///
/// Every field is optional so that options can be merged: values set on an
/// override win, filter parameters are combined.
///
/// # Examples
///
/// ```
/// use payline_core::CursorOptions;
///
/// let base = CursorOptions::new().with_limit(25).with_param("status", "PAID");
/// let resumed = base.merge(&CursorOptions::new().with_after_id("inv_42"));
///
/// assert_eq!(resumed.limit, Some(25));
/// assert_eq!(resumed.after_id.as_deref(), Some("inv_42"));
/// assert_eq!(resumed.params.get("status").map(String::as_str), Some("PAID"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorOptions {
    /// Page size, `1..=100` (default 10)
    #[serde(default)]
    pub limit: Option<u32>,
    /// Resume after this item
    #[serde(default)]
    pub after_id: Option<String>,
    /// Resume before this item
    #[serde(default)]
    pub before_id: Option<String>,
    /// Filter, search and sort parameters passed through verbatim
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

impl CursorOptions {
    /// Options with every field unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Resume after the given item id.
    pub fn with_after_id(mut self, after_id: impl Into<String>) -> Self {
        self.after_id = Some(after_id.into());
        self
    }

    /// Resume before the given item id.
    pub fn with_before_id(mut self, before_id: impl Into<String>) -> Self {
        self.before_id = Some(before_id.into());
        self
    }

    /// Add a pass-through query parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Overlay `overrides` on top of `self`.
    pub fn merge(&self, overrides: &CursorOptions) -> CursorOptions {
        let mut params = self.params.clone();
        params.extend(
            overrides
                .params
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        CursorOptions {
            limit: overrides.limit.or(self.limit),
            after_id: overrides.after_id.clone().or_else(|| self.after_id.clone()),
            before_id: overrides
                .before_id
                .clone()
                .or_else(|| self.before_id.clone()),
            params,
        }
    }

    /// Validate the options and resolve defaults.
    ///
    /// # Errors
    ///
    /// Returns a validation error when `limit` is outside `1..=100`.
    pub fn to_request(&self) -> PaylineResult<PageRequest> {
        let limit = self.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
        if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
            return Err(ValidationError::single(
                "limit",
                format!("must be between 1 and {}, got {}", MAX_PAGE_LIMIT, limit),
            )
            .into());
        }
        Ok(PageRequest {
            limit,
            after_id: self.after_id.clone(),
            before_id: self.before_id.clone(),
            params: self.params.clone(),
        })
    }
}

/// Validated request for a single page, as handed to a page fetcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    /// Page size, already within `1..=100`
    pub limit: u32,
    /// Resume after this item
    pub after_id: Option<String>,
    /// Resume before this item
    pub before_id: Option<String>,
    /// Pass-through query parameters
    pub params: BTreeMap<String, String>,
}

impl PageRequest {
    /// Query pairs in wire form: `limit`, `after_id`, `before_id`, then filters.
    ///
    /// # Examples
    ///
    /// ```
    /// use payline_core::CursorOptions;
    ///
    /// let request = CursorOptions::new()
    ///     .with_after_id("cust_9")
    ///     .with_param("reference_id", "ref-1")
    ///     .to_request()
    ///     .unwrap();
    ///
    /// assert_eq!(
    ///     request.query_pairs(),
    ///     vec![
    ///         ("limit".to_string(), "10".to_string()),
    ///         ("after_id".to_string(), "cust_9".to_string()),
    ///         ("reference_id".to_string(), "ref-1".to_string()),
    ///     ]
    /// );
    /// ```
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("limit".to_string(), self.limit.to_string())];
        if let Some(after_id) = &self.after_id {
            pairs.push(("after_id".to_string(), after_id.clone()));
        }
        if let Some(before_id) = &self.before_id {
            pairs.push(("before_id".to_string(), before_id.clone()));
        }
        pairs.extend(self.params.iter().map(|(k, v)| (k.clone(), v.clone())));
        pairs
    }
}
