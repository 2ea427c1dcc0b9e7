//! Paginated list results and their wire metadata.

use serde::{Deserialize, Serialize};

use crate::PageWindow;

/// Page metadata rendered alongside list payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// One-based page number actually served.
    pub page: u32,
    /// Effective page size after clamping.
    pub limit: u32,
    /// Total number of items across all pages.
    pub total: u64,
    /// Number of pages of `limit` items needed to hold `total`.
    pub total_pages: u64,
}

/// One page of items together with the window that produced it.
///
/// ## Invariants
/// - `limit` comes from a [`PageWindow`], so it never exceeds the guard's
///   ceiling.
/// - `total_pages == ceil(total / limit)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginated<T> {
    items: Vec<T>,
    meta: PageMeta,
}

impl<T> Paginated<T> {
    /// Assemble a page from the items fetched for `window`.
    #[must_use]
    pub fn new(items: Vec<T>, window: PageWindow, total: u64) -> Self {
        let limit = u64::from(window.limit().max(1));
        Self {
            items,
            meta: PageMeta {
                page: window.page(),
                limit: window.limit(),
                total,
                total_pages: total.div_ceil(limit),
            },
        }
    }

    /// Items on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Page metadata.
    #[must_use]
    pub const fn meta(&self) -> PageMeta {
        self.meta
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.meta.page
    }

    /// Effective page size.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.meta.limit
    }

    /// Total number of items across all pages.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.meta.total
    }

    /// Number of pages available.
    #[must_use]
    pub const fn total_pages(&self) -> u64 {
        self.meta.total_pages
    }

    /// Transform every item, keeping the metadata.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Paginated<U>
    where
        F: FnMut(T) -> U,
    {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }

    /// Split into items and metadata.
    #[must_use]
    pub fn into_parts(self) -> (Vec<T>, PageMeta) {
        (self.items, self.meta)
    }
}

#[cfg(test)]
mod tests {
    //! Metadata arithmetic for paginated results.

    use super::*;
    use crate::{PageRequest, PaginationGuard};
    use rstest::rstest;

    fn window(page: i64, limit: i64) -> PageWindow {
        PaginationGuard::default().window(&PageRequest::new(Some(page), Some(limit)))
    }

    #[rstest]
    #[case(0, 20, 0)]
    #[case(1, 20, 1)]
    #[case(20, 20, 1)]
    #[case(21, 20, 2)]
    #[case(202, 100, 3)]
    fn total_pages_rounds_up(#[case] total: u64, #[case] limit: i64, #[case] expected: u64) {
        let page: Paginated<u8> = Paginated::new(Vec::new(), window(1, limit), total);
        assert_eq!(page.total_pages(), expected);
    }

    #[rstest]
    fn metadata_serialises_in_camel_case() {
        let page = Paginated::new(vec![1, 2], window(2, 2), 5);
        let value = serde_json::to_value(page.meta()).expect("serialise meta");
        assert_eq!(
            value,
            serde_json::json!({"page": 2, "limit": 2, "total": 5, "totalPages": 3})
        );
    }

    #[rstest]
    fn map_preserves_metadata() {
        let page = Paginated::new(vec![1, 2, 3], window(1, 3), 9);
        let mapped = page.map(|n| n.to_string());
        assert_eq!(mapped.items(), ["1", "2", "3"]);
        assert_eq!(mapped.total_pages(), 3);
        assert_eq!(mapped.limit(), 3);
    }
}
