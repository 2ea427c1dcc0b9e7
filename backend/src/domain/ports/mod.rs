//! Domain ports for the hexagonal boundary.
//!
//! Driving ports (`PostQuery`, `PostCommand`, `LoginService`) are what
//! inbound handlers call. Driven ports (`PostRepository`,
//! `ModerationGateway`) are what services call; only outbound adapters
//! implement them.

mod login_service;
mod moderation_gateway;
mod post_command;
mod post_query;
mod post_repository;

#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{FIXTURE_ADMIN_ID, FIXTURE_MEMBER_ID, FixtureLoginService, LoginService};
#[cfg(test)]
pub use moderation_gateway::MockModerationGateway;
pub use moderation_gateway::{FixtureModerationGateway, ModerationGateway, ModerationVerdict};
#[cfg(test)]
pub use post_command::MockPostCommand;
pub use post_command::PostCommand;
#[cfg(test)]
pub use post_query::MockPostQuery;
pub use post_query::PostQuery;
#[cfg(test)]
pub use post_repository::MockPostRepository;
pub use post_repository::PostRepository;
