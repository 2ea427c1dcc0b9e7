//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: the post store behind `PostRepository`
//! - **moderation**: the HTTP client behind `ModerationGateway`
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. Every infrastructure failure is converted into a domain
//! error before it leaves this module.

pub mod moderation;
pub mod persistence;
