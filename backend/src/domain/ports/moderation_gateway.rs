//! Driven port for the third-party content moderation service.
//!
//! Adapters translate transport and provider failures into domain errors at
//! the point of origin.

use async_trait::async_trait;

use crate::domain::Error;

/// Outcome of a moderation review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModerationVerdict {
    /// Content may be stored.
    Approved,
    /// Content must not be stored.
    Rejected {
        /// Provider supplied reason, safe to show to the author.
        reason: String,
    },
}

/// Moderation port.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModerationGateway: Send + Sync {
    /// Review user supplied text.
    async fn review(&self, text: &str) -> Result<ModerationVerdict, Error>;
}

/// Approves everything; used when no moderation endpoint is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureModerationGateway;

#[async_trait]
impl ModerationGateway for FixtureModerationGateway {
    async fn review(&self, _text: &str) -> Result<ModerationVerdict, Error> {
        Ok(ModerationVerdict::Approved)
    }
}
