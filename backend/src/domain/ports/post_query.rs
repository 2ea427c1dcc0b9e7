//! Driving port for reading posts.

use async_trait::async_trait;
use pagination::{BoundedList, PageRequest, Paginated};

use crate::domain::{Category, Error, Post, PostId, Session};

/// Read-side use cases. Inbound adapters reach posts only through this port
/// and [`super::PostCommand`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostQuery: Send + Sync {
    /// Load one post visible to `session`.
    async fn get(&self, session: Session, id: PostId) -> Result<Post, Error>;

    /// List posts visible to `session`. The request is clamped by the
    /// service's pagination guard.
    async fn list(&self, session: Session, request: PageRequest) -> Result<Paginated<Post>, Error>;

    /// Static category reference list.
    async fn categories(&self) -> Result<BoundedList<Category>, Error>;
}
