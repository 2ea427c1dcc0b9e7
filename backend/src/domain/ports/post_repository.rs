//! Driven port for post persistence.
//!
//! Adapters own storage access only. They translate every storage failure
//! into a domain [`Error`] before returning, so no storage error type crosses
//! this boundary. Writes are single calls that the adapter executes
//! atomically against the stored row, never against a caller's copy.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::{PageWindow, Paginated};

use crate::domain::{Error, Post, PostChanges, PostId, PostVisibility};

/// Persistence port for posts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Store a new post. Duplicate titles for the same owner are a conflict.
    async fn insert(&self, post: &Post) -> Result<(), Error>;

    /// Load a post by id.
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, Error>;

    /// Load one page of posts, newest first.
    ///
    /// Takes a [`PageWindow`], which only the pagination guard can build, so
    /// every listing is bounded by the configured ceiling.
    async fn list(
        &self,
        window: PageWindow,
        visibility: PostVisibility,
    ) -> Result<Paginated<Post>, Error>;

    /// Apply `changes` to the stored post, stamping `at` as its modification
    /// time. Fields outside `changes`, including publication state, keep their
    /// stored values. Returns the stored post.
    async fn update(
        &self,
        id: PostId,
        changes: PostChanges,
        at: DateTime<Utc>,
    ) -> Result<Post, Error>;

    /// Mark a draft as published and record the publication, as one atomic
    /// storage operation. Returns the stored post, or an `ALREADY_PUBLISHED`
    /// conflict when the stored post is already published.
    async fn publish(&self, id: PostId, at: DateTime<Utc>) -> Result<Post, Error>;

    /// Remove a post.
    async fn delete(&self, id: PostId) -> Result<(), Error>;
}
