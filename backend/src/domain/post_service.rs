//! Posts domain service.
//!
//! Implements the [`PostQuery`] and [`PostCommand`] driving ports. Callers
//! arrive with an authenticated [`Session`]; per-resource authorisation is
//! decided here, inline, against the stored post.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use pagination::{BoundedList, PageRequest, Paginated, PaginationGuard};
use tracing::{debug, info};

use crate::domain::ports::{
    ModerationGateway, ModerationVerdict, PostCommand, PostQuery, PostRepository,
};
use crate::domain::{
    Category, Error, ErrorCode, NewPost, Post, PostChanges, PostId, PostVisibility, Role, Session,
};

/// Raised when publishing a post twice.
pub const ALREADY_PUBLISHED: ErrorCode = ErrorCode::from_static("ALREADY_PUBLISHED");
/// Raised when moderation refuses the content.
pub const CONTENT_REJECTED: ErrorCode = ErrorCode::from_static("CONTENT_REJECTED");
/// Raised when an owner reuses one of their titles.
pub const DUPLICATE_TITLE: ErrorCode = ErrorCode::from_static("DUPLICATE_TITLE");

/// Posts service implementing the driving ports.
#[derive(Clone)]
pub struct PostService<R, M> {
    posts: Arc<R>,
    moderation: Arc<M>,
    guard: PaginationGuard,
}

impl<R, M> PostService<R, M> {
    /// Create a new service. The guard is fixed for the service's lifetime.
    pub fn new(posts: Arc<R>, moderation: Arc<M>, guard: PaginationGuard) -> Self {
        Self {
            posts,
            moderation,
            guard,
        }
    }
}

fn is_admin(session: &Session) -> bool {
    session.role() == Role::Admin
}

fn not_found(id: PostId) -> Error {
    Error::not_found(format!("post {id} not found"))
}

impl<R, M> PostService<R, M>
where
    R: PostRepository,
    M: ModerationGateway,
{
    /// Load a post the session is allowed to see.
    ///
    /// Drafts belonging to someone else are reported as missing so their
    /// existence is not disclosed.
    async fn load_visible(&self, session: &Session, id: PostId) -> Result<Post, Error> {
        let post = self.posts.find_by_id(id).await?.ok_or_else(|| not_found(id))?;
        let visible = post.is_published()
            || post.owner_id() == session.user_id()
            || is_admin(session);
        if !visible {
            debug!(post_id = %id, user_id = %session.user_id(), "draft hidden from non-owner");
            return Err(not_found(id));
        }
        Ok(post)
    }

    async fn moderate(&self, text: &str) -> Result<(), Error> {
        match self.moderation.review(text).await? {
            ModerationVerdict::Approved => Ok(()),
            ModerationVerdict::Rejected { reason } => {
                Err(Error::bad_request(reason).with_code(CONTENT_REJECTED))
            }
        }
    }
}

#[async_trait]
impl<R, M> PostQuery for PostService<R, M>
where
    R: PostRepository,
    M: ModerationGateway,
{
    async fn get(&self, session: Session, id: PostId) -> Result<Post, Error> {
        self.load_visible(&session, id).await
    }

    async fn list(&self, session: Session, request: PageRequest) -> Result<Paginated<Post>, Error> {
        let window = self.guard.window(&request);
        let visibility = if is_admin(&session) {
            PostVisibility::Everything
        } else {
            PostVisibility::PublishedOrOwnedBy(session.user_id())
        };
        self.posts.list(window, visibility).await
    }

    async fn categories(&self) -> Result<BoundedList<Category>, Error> {
        BoundedList::new(Category::ALL.to_vec(), self.guard.ceiling())
            .map_err(|err| Error::internal(format!("category list rejected: {err}")))
    }
}

#[async_trait]
impl<R, M> PostCommand for PostService<R, M>
where
    R: PostRepository,
    M: ModerationGateway,
{
    async fn create(&self, session: Session, input: NewPost) -> Result<Post, Error> {
        self.moderate(&format!("{}\n\n{}", input.title, input.body))
            .await?;
        let post = Post::draft(PostId::random(), session.user_id(), input, Utc::now());
        self.posts.insert(&post).await?;
        info!(post_id = %post.id(), user_id = %session.user_id(), "post created");
        Ok(post)
    }

    async fn update(
        &self,
        session: Session,
        id: PostId,
        changes: PostChanges,
    ) -> Result<Post, Error> {
        if changes.is_empty() {
            return Err(Error::bad_request("no changes supplied"));
        }
        let post = self.load_visible(&session, id).await?;
        if post.owner_id() != session.user_id() && !is_admin(&session) {
            return Err(Error::forbidden("only the owner or an admin may edit this post"));
        }
        if let Some(text) = changes.moderated_text() {
            self.moderate(&text).await?;
        }
        let updated = self.posts.update(id, changes, Utc::now()).await?;
        info!(post_id = %id, user_id = %session.user_id(), "post updated");
        Ok(updated)
    }

    async fn publish(&self, session: Session, id: PostId) -> Result<Post, Error> {
        let post = self.load_visible(&session, id).await?;
        if post.owner_id() != session.user_id() {
            return Err(Error::forbidden("only the owner may publish this post"));
        }
        if post.is_published() {
            return Err(Error::conflict("post is already published").with_code(ALREADY_PUBLISHED));
        }
        // The store re-checks under its lock; a concurrent publish surfaces
        // as the same conflict from there.
        let published = self.posts.publish(id, Utc::now()).await?;
        info!(post_id = %id, user_id = %session.user_id(), "post published");
        Ok(published)
    }

    async fn delete(&self, session: Session, id: PostId) -> Result<(), Error> {
        let post = self.load_visible(&session, id).await?;
        if post.owner_id() != session.user_id() && !is_admin(&session) {
            return Err(Error::forbidden("only the owner or an admin may delete this post"));
        }
        self.posts.delete(id).await?;
        info!(post_id = %id, user_id = %session.user_id(), "post deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "post_service_tests.rs"]
mod tests;
