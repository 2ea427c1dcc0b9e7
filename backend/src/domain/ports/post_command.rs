//! Driving port for post mutations.

use async_trait::async_trait;

use crate::domain::{Error, NewPost, Post, PostChanges, PostId, Session};

/// Write-side use cases. Each call is one business operation; authorisation
/// against the stored post happens inside the implementation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostCommand: Send + Sync {
    /// Create a draft owned by the session's user.
    async fn create(&self, session: Session, input: NewPost) -> Result<Post, Error>;

    /// Apply changes to a post the session may edit.
    async fn update(&self, session: Session, id: PostId, changes: PostChanges)
    -> Result<Post, Error>;

    /// Publish a draft owned by the session's user.
    async fn publish(&self, session: Session, id: PostId) -> Result<Post, Error>;

    /// Delete a post the session may manage.
    async fn delete(&self, session: Session, id: PostId) -> Result<(), Error>;
}
