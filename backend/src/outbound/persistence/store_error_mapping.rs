//! Mapping from storage failures to domain errors.
//!
//! Storage errors never leave the persistence adapter; every variant is
//! translated here into a structured domain error with a caller-safe message.

use tracing::debug;

use crate::domain::{ALREADY_PUBLISHED, DUPLICATE_TITLE, Error};

/// Failures raised by the post store itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write.
    #[error("unique constraint `{constraint}` violated")]
    UniqueViolation {
        /// Name of the violated constraint.
        constraint: &'static str,
    },
    /// The row addressed by a write does not exist.
    #[error("row {key} not found")]
    RowMissing {
        /// Key of the missing row.
        key: String,
    },
    /// A publish addressed a post that is already published.
    #[error("row {key} already published")]
    AlreadyPublished {
        /// Key of the published row.
        key: String,
    },
    /// The store's lock was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    Poisoned,
}

/// Constraint enforcing one title per owner.
pub(super) const OWNER_TITLE_CONSTRAINT: &str = "posts_owner_title_key";

pub(super) fn map_store_error(error: StoreError) -> Error {
    debug!(%error, "post store operation failed");
    match error {
        StoreError::UniqueViolation {
            constraint: OWNER_TITLE_CONSTRAINT,
        } => Error::conflict("a post with this title already exists").with_code(DUPLICATE_TITLE),
        StoreError::UniqueViolation { .. } => Error::conflict("record already exists"),
        StoreError::RowMissing { .. } => Error::not_found("post not found"),
        StoreError::AlreadyPublished { .. } => {
            Error::conflict("post is already published").with_code(ALREADY_PUBLISHED)
        }
        StoreError::Poisoned => Error::internal("post store unavailable"),
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for storage error translation.

    use super::*;
    use crate::domain::{ErrorCode, StatusClass};
    use rstest::rstest;

    #[rstest]
    #[case::duplicate_title(
        StoreError::UniqueViolation { constraint: OWNER_TITLE_CONSTRAINT },
        StatusClass::Conflict,
        DUPLICATE_TITLE,
    )]
    #[case::other_constraint(
        StoreError::UniqueViolation { constraint: "posts_pkey" },
        StatusClass::Conflict,
        ErrorCode::CONFLICT,
    )]
    #[case::missing_row(
        StoreError::RowMissing { key: "abc".to_owned() },
        StatusClass::NotFound,
        ErrorCode::NOT_FOUND,
    )]
    #[case::already_published(
        StoreError::AlreadyPublished { key: "abc".to_owned() },
        StatusClass::Conflict,
        ALREADY_PUBLISHED,
    )]
    #[case::poisoned(StoreError::Poisoned, StatusClass::Internal, ErrorCode::INTERNAL_ERROR)]
    fn storage_failures_become_structured_errors(
        #[case] error: StoreError,
        #[case] status: StatusClass,
        #[case] code: ErrorCode,
    ) {
        let mapped = map_store_error(error);
        assert_eq!(mapped.status(), status);
        assert_eq!(mapped.code(), &code);
    }

    #[rstest]
    fn mapped_messages_do_not_leak_constraint_names() {
        let mapped = map_store_error(StoreError::UniqueViolation {
            constraint: OWNER_TITLE_CONSTRAINT,
        });
        assert!(!mapped.message().contains(OWNER_TITLE_CONSTRAINT));
    }
}
