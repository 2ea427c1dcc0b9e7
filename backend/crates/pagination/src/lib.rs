//! Offset pagination primitives shared by backend endpoints.
//!
//! Every "fetch many" operation in the backend is bounded by a
//! [`PaginationGuard`]. Clients send an untrusted [`PageRequest`]; the guard
//! turns it into a [`PageWindow`] whose `limit` never exceeds the configured
//! ceiling. Repositories accept only a [`PageWindow`], and because the window
//! has no public constructor the guard cannot be bypassed.
//!
//! List results travel back as [`Paginated`], which carries the page metadata
//! rendered by HTTP adapters. Small static reference lists that are served
//! without paging use [`BoundedList`], which refuses to hold more entries than
//! the same ceiling.
//!
//! # Examples
//! ```
//! use pagination::{PageRequest, Paginated, PaginationGuard};
//!
//! let guard = PaginationGuard::default();
//! let window = guard.window(&PageRequest::new(Some(2), Some(10_000)));
//! assert_eq!(window.limit(), 100);
//! assert_eq!(window.offset(), 100);
//!
//! let page = Paginated::new(vec!["a", "b"], window, 202);
//! assert_eq!(page.total_pages(), 3);
//! ```

mod guard;
mod page;
mod reference;

pub use guard::{
    DEFAULT_LIMIT, DEFAULT_PAGE_CEILING, PageRequest, PageWindow, PaginationConfigError,
    PaginationGuard,
};
pub use page::{PageMeta, Paginated};
pub use reference::{BoundedList, ReferenceDataError};
