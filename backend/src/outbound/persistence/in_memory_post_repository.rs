//! In-process post store backing the `PostRepository` port.
//!
//! Rows live behind a single mutex. Every operation takes the lock once and
//! checks its preconditions against the stored row under it, so publishing
//! (flip the post, append to the publication log) and edits are atomic with
//! respect to other callers.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::{PageWindow, Paginated};

use super::store_error_mapping::{OWNER_TITLE_CONSTRAINT, StoreError, map_store_error};
use crate::domain::ports::PostRepository;
use crate::domain::{Error, Post, PostChanges, PostId, PostVisibility, UserId};

/// Append-only record of a publication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicationRecord {
    /// Published post.
    pub post_id: PostId,
    /// Owner at publication time.
    pub owner_id: UserId,
    /// Publication timestamp.
    pub published_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Tables {
    posts: HashMap<PostId, Post>,
    publications: Vec<PublicationRecord>,
}

impl Tables {
    fn title_taken(&self, candidate: &Post) -> bool {
        self.posts.values().any(|existing| {
            existing.id() != candidate.id()
                && existing.owner_id() == candidate.owner_id()
                && existing.title() == candidate.title()
        })
    }

    fn check_unique_title(&self, candidate: &Post) -> Result<(), StoreError> {
        if self.title_taken(candidate) {
            return Err(StoreError::UniqueViolation {
                constraint: OWNER_TITLE_CONSTRAINT,
            });
        }
        Ok(())
    }
}

/// Post repository held entirely in memory.
#[derive(Debug, Default)]
pub struct InMemoryPostRepository {
    tables: Mutex<Tables>,
}

impl InMemoryPostRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the publication log, oldest first.
    pub fn publications(&self) -> Result<Vec<PublicationRecord>, Error> {
        Ok(self.lock().map_err(map_store_error)?.publications.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables.lock().map_err(|_| StoreError::Poisoned)
    }

    fn with_tables<T>(
        &self,
        op: impl FnOnce(&mut Tables) -> Result<T, StoreError>,
    ) -> Result<T, Error> {
        let mut tables = self.lock().map_err(map_store_error)?;
        op(&mut tables).map_err(map_store_error)
    }
}

fn missing(id: PostId) -> StoreError {
    StoreError::RowMissing { key: id.to_string() }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn insert(&self, post: &Post) -> Result<(), Error> {
        self.with_tables(|tables| {
            if tables.posts.contains_key(&post.id()) {
                return Err(StoreError::UniqueViolation {
                    constraint: "posts_pkey",
                });
            }
            tables.check_unique_title(post)?;
            tables.posts.insert(post.id(), post.clone());
            Ok(())
        })
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, Error> {
        self.with_tables(|tables| Ok(tables.posts.get(&id).cloned()))
    }

    async fn list(
        &self,
        window: PageWindow,
        visibility: PostVisibility,
    ) -> Result<Paginated<Post>, Error> {
        self.with_tables(|tables| {
            let mut visible: Vec<&Post> = tables
                .posts
                .values()
                .filter(|post| visibility.admits(post))
                .collect();
            visible.sort_by(|a, b| {
                b.created_at()
                    .cmp(&a.created_at())
                    .then_with(|| a.id().cmp(&b.id()))
            });
            let total = visible.len() as u64;
            let offset = usize::try_from(window.offset()).unwrap_or(usize::MAX);
            let limit = usize::try_from(window.limit()).unwrap_or(usize::MAX);
            let items = visible
                .into_iter()
                .skip(offset)
                .take(limit)
                .cloned()
                .collect();
            Ok(Paginated::new(items, window, total))
        })
    }

    async fn update(
        &self,
        id: PostId,
        changes: PostChanges,
        at: DateTime<Utc>,
    ) -> Result<Post, Error> {
        self.with_tables(|tables| {
            let stored = tables.posts.get(&id).ok_or_else(|| missing(id))?;
            let updated = stored.with_changes(changes, at);
            tables.check_unique_title(&updated)?;
            tables.posts.insert(id, updated.clone());
            Ok(updated)
        })
    }

    async fn publish(&self, id: PostId, at: DateTime<Utc>) -> Result<Post, Error> {
        self.with_tables(|tables| {
            let stored = tables.posts.get(&id).ok_or_else(|| missing(id))?;
            if stored.is_published() {
                return Err(StoreError::AlreadyPublished { key: id.to_string() });
            }
            let published = stored.published(at);
            tables.publications.push(PublicationRecord {
                post_id: id,
                owner_id: published.owner_id(),
                published_at: at,
            });
            tables.posts.insert(id, published.clone());
            Ok(published)
        })
    }

    async fn delete(&self, id: PostId) -> Result<(), Error> {
        self.with_tables(|tables| {
            tables.posts.remove(&id).map(drop).ok_or_else(|| missing(id))
        })
    }
}
