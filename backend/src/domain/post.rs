//! Posts: the reference aggregate served by the CRUD endpoints.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

/// Maximum title length in characters.
pub const TITLE_MAX: usize = 200;

/// Maximum body length in characters.
pub const BODY_MAX: usize = 20_000;

/// Identifier of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PostId(Uuid);

impl PostId {
    /// Generate a fresh random id.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PostId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Static reference list of post categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Release notes and notices.
    Announcement,
    /// Technical write-ups.
    Engineering,
    /// Events and community news.
    Community,
    /// Anything else.
    General,
}

impl Category {
    /// Every category in display order.
    pub const ALL: [Self; 4] = [
        Self::Announcement,
        Self::Engineering,
        Self::Community,
        Self::General,
    ];

    /// Slug used on the wire.
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Announcement => "announcement",
            Self::Engineering => "engineering",
            Self::Community => "community",
            Self::General => "general",
        }
    }

    /// Human-readable label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Announcement => "Announcements",
            Self::Engineering => "Engineering",
            Self::Community => "Community",
            Self::General => "General",
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.slug() == s)
            .ok_or_else(|| format!("unknown category '{s}'"))
    }
}

/// Validated input for a new post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    /// Title, unique per owner.
    pub title: String,
    /// Markdown body.
    pub body: String,
    /// Category from the reference list.
    pub category: Category,
}

/// Partial update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostChanges {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement body.
    pub body: Option<String>,
    /// Replacement category.
    pub category: Option<Category>,
}

impl PostChanges {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.body.is_none() && self.category.is_none()
    }

    /// Text that must pass moderation before the change is stored.
    pub fn moderated_text(&self) -> Option<String> {
        match (&self.title, &self.body) {
            (None, None) => None,
            (title, body) => Some(
                [title.as_deref(), body.as_deref()]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join("\n\n"),
            ),
        }
    }
}

/// Which posts a listing may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostVisibility {
    /// Every post, drafts included.
    Everything,
    /// Published posts plus the given user's drafts.
    PublishedOrOwnedBy(UserId),
}

impl PostVisibility {
    /// Whether `post` falls inside this visibility.
    pub fn admits(&self, post: &Post) -> bool {
        match self {
            Self::Everything => true,
            Self::PublishedOrOwnedBy(user_id) => post.is_published() || post.owner_id() == *user_id,
        }
    }
}

/// A stored post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    id: PostId,
    owner_id: UserId,
    title: String,
    body: String,
    category: Category,
    published_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Post {
    /// Start an unpublished draft owned by `owner_id`.
    pub fn draft(id: PostId, owner_id: UserId, input: NewPost, now: DateTime<Utc>) -> Self {
        Self {
            id,
            owner_id,
            title: input.title,
            body: input.body,
            category: input.category,
            published_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Return a copy with `changes` applied.
    #[must_use]
    pub fn with_changes(&self, changes: PostChanges, now: DateTime<Utc>) -> Self {
        let PostChanges {
            title,
            body,
            category,
        } = changes;
        Self {
            title: title.unwrap_or_else(|| self.title.clone()),
            body: body.unwrap_or_else(|| self.body.clone()),
            category: category.unwrap_or(self.category),
            updated_at: now,
            ..self.clone()
        }
    }

    /// Return a copy marked as published at `at`.
    #[must_use]
    pub fn published(&self, at: DateTime<Utc>) -> Self {
        Self {
            published_at: Some(at),
            updated_at: at,
            ..self.clone()
        }
    }

    /// Post identifier.
    pub fn id(&self) -> PostId {
        self.id
    }

    /// Author of the post.
    pub fn owner_id(&self) -> UserId {
        self.owner_id
    }

    /// Title text.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Body text.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Category.
    pub fn category(&self) -> Category {
        self.category
    }

    /// Publication timestamp, if published.
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }

    /// Whether the post has been published.
    pub fn is_published(&self) -> bool {
        self.published_at.is_some()
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last modification timestamp.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
