//! Server-side clamping of client supplied page requests.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest page size served when no other ceiling is configured.
pub const DEFAULT_PAGE_CEILING: u32 = 100;

/// Page size used when the client does not ask for one.
pub const DEFAULT_LIMIT: u32 = 20;

/// Untrusted page selection as received from a client.
///
/// Values are kept signed and optional so that negative, zero, and missing
/// inputs reach the guard instead of failing deserialisation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Requested page number, starting at 1.
    #[serde(default)]
    pub page: Option<i64>,
    /// Requested number of items per page.
    #[serde(default)]
    pub limit: Option<i64>,
}

impl PageRequest {
    /// Build a request from optional raw values.
    #[must_use]
    pub const fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self { page, limit }
    }
}

/// Errors raised when a guard is configured with inconsistent bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PaginationConfigError {
    /// The ceiling must allow at least one item per page.
    #[error("page ceiling must be at least 1")]
    ZeroCeiling,
    /// The default page size must be between 1 and the ceiling.
    #[error("default page size {default_limit} must be between 1 and the ceiling {ceiling}")]
    DefaultOutOfRange {
        /// Configured default page size.
        default_limit: u32,
        /// Configured ceiling.
        ceiling: u32,
    },
}

/// Immutable pagination policy shared by every list operation.
///
/// ## Invariants
/// - `ceiling >= 1`
/// - `1 <= default_limit <= ceiling`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationGuard {
    ceiling: u32,
    default_limit: u32,
}

impl Default for PaginationGuard {
    fn default() -> Self {
        Self {
            ceiling: DEFAULT_PAGE_CEILING,
            default_limit: DEFAULT_LIMIT,
        }
    }
}

impl PaginationGuard {
    /// Build a guard, validating the configured bounds.
    ///
    /// # Errors
    /// Returns [`PaginationConfigError`] when the ceiling is zero or the
    /// default page size falls outside `1..=ceiling`.
    pub const fn new(ceiling: u32, default_limit: u32) -> Result<Self, PaginationConfigError> {
        if ceiling == 0 {
            return Err(PaginationConfigError::ZeroCeiling);
        }
        if default_limit == 0 || default_limit > ceiling {
            return Err(PaginationConfigError::DefaultOutOfRange {
                default_limit,
                ceiling,
            });
        }
        Ok(Self {
            ceiling,
            default_limit,
        })
    }

    /// Largest page size this guard will ever produce.
    #[must_use]
    pub const fn ceiling(&self) -> u32 {
        self.ceiling
    }

    /// Page size used when the client omits `limit`.
    #[must_use]
    pub const fn default_limit(&self) -> u32 {
        self.default_limit
    }

    /// Clamp a client request into a query window.
    ///
    /// Pages below 1 are treated as page 1. A missing limit falls back to the
    /// default, a limit below 1 becomes 1, and anything above the ceiling is
    /// silently clamped to the ceiling.
    #[must_use]
    pub fn window(&self, request: &PageRequest) -> PageWindow {
        let page = request
            .page
            .map_or(1, |page| u32::try_from(page.max(1)).unwrap_or(u32::MAX));
        let limit = request.limit.map_or(self.default_limit, |limit| {
            let bounded = limit.clamp(1, i64::from(self.ceiling));
            u32::try_from(bounded).unwrap_or(self.ceiling)
        });
        let offset = u64::from(page - 1).saturating_mul(u64::from(limit));
        PageWindow {
            page,
            limit,
            offset,
        }
    }
}

/// A bounded slice of a collection, produced only by [`PaginationGuard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    page: u32,
    limit: u32,
    offset: u64,
}

impl PageWindow {
    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of items in the page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of items to skip before the page starts.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.offset
    }
}

#[cfg(test)]
mod tests {
    //! Unit coverage for request clamping.

    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn guard() -> PaginationGuard {
        PaginationGuard::default()
    }

    #[rstest]
    fn missing_values_use_defaults(guard: PaginationGuard) {
        let window = guard.window(&PageRequest::default());
        assert_eq!(window.page(), 1);
        assert_eq!(window.limit(), DEFAULT_LIMIT);
        assert_eq!(window.offset(), 0);
    }

    #[rstest]
    #[case(10_000, 100)]
    #[case(101, 100)]
    #[case(100, 100)]
    #[case(i64::MAX, 100)]
    fn oversized_limits_clamp_to_ceiling(
        guard: PaginationGuard,
        #[case] requested: i64,
        #[case] expected: u32,
    ) {
        let window = guard.window(&PageRequest::new(None, Some(requested)));
        assert_eq!(window.limit(), expected);
    }

    #[rstest]
    #[case(0)]
    #[case(-1)]
    #[case(i64::MIN)]
    fn pages_below_one_are_page_one(guard: PaginationGuard, #[case] page: i64) {
        let window = guard.window(&PageRequest::new(Some(page), Some(10)));
        assert_eq!(window.page(), 1);
        assert_eq!(window.offset(), 0);
    }

    #[rstest]
    #[case(0)]
    #[case(-25)]
    fn limits_below_one_become_one(guard: PaginationGuard, #[case] limit: i64) {
        let window = guard.window(&PageRequest::new(Some(3), Some(limit)));
        assert_eq!(window.limit(), 1);
        assert_eq!(window.offset(), 2);
    }

    #[rstest]
    fn offset_is_previous_pages_times_limit(guard: PaginationGuard) {
        let window = guard.window(&PageRequest::new(Some(4), Some(25)));
        assert_eq!(window.offset(), 75);
    }

    #[rstest]
    fn huge_pages_saturate_instead_of_overflowing(guard: PaginationGuard) {
        let window = guard.window(&PageRequest::new(Some(i64::MAX), Some(100)));
        assert_eq!(window.page(), u32::MAX);
        assert_eq!(window.offset(), u64::from(u32::MAX - 1) * 100);
    }

    #[rstest]
    fn custom_ceiling_is_honoured() {
        let guard = PaginationGuard::new(10, 5).expect("valid bounds");
        let window = guard.window(&PageRequest::new(None, Some(50)));
        assert_eq!(window.limit(), 10);
        assert_eq!(guard.window(&PageRequest::default()).limit(), 5);
    }

    #[rstest]
    #[case(0, 0, PaginationConfigError::ZeroCeiling)]
    #[case(10, 0, PaginationConfigError::DefaultOutOfRange { default_limit: 0, ceiling: 10 })]
    #[case(10, 11, PaginationConfigError::DefaultOutOfRange { default_limit: 11, ceiling: 10 })]
    fn inconsistent_bounds_are_rejected(
        #[case] ceiling: u32,
        #[case] default_limit: u32,
        #[case] expected: PaginationConfigError,
    ) {
        let err = PaginationGuard::new(ceiling, default_limit).expect_err("invalid bounds");
        assert_eq!(err, expected);
    }
}
