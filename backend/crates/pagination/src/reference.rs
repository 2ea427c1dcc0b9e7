//! Bounded static reference data.
//!
//! Unpaged "fetch all" reads are only acceptable for small, enumerated
//! reference sets. [`BoundedList`] makes that bound explicit: it refuses to
//! hold more entries than the page ceiling.

use thiserror::Error;

/// Raised when a reference list would exceed the page ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("reference data has {len} entries; the ceiling is {ceiling}")]
pub struct ReferenceDataError {
    /// Number of entries offered.
    pub len: usize,
    /// Ceiling the list must respect.
    pub ceiling: u32,
}

/// A complete, small list served without pagination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedList<T> {
    items: Vec<T>,
}

impl<T> BoundedList<T> {
    /// Accept `items` when they fit under `ceiling`.
    ///
    /// # Errors
    /// Returns [`ReferenceDataError`] when `items` is longer than `ceiling`.
    pub fn new(items: Vec<T>, ceiling: u32) -> Result<Self, ReferenceDataError> {
        let fits = usize::try_from(ceiling).map_or(true, |max| items.len() <= max);
        if fits {
            Ok(Self { items })
        } else {
            Err(ReferenceDataError {
                len: items.len(),
                ceiling,
            })
        }
    }

    /// Entries in declaration order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the list.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    //! Ceiling enforcement for reference lists.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0)]
    #[case(3)]
    fn lists_within_the_ceiling_are_accepted(#[case] len: usize) {
        let list = BoundedList::new(vec![0_u8; len], 3).expect("fits");
        assert_eq!(list.items().len(), len);
    }

    #[rstest]
    fn oversized_lists_are_rejected() {
        let err = BoundedList::new(vec![0_u8; 4], 3).expect_err("too large");
        assert_eq!(err, ReferenceDataError { len: 4, ceiling: 3 });
    }
}
