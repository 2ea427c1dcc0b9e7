//! Moderation outbound adapters.
//!
//! Thin HTTP implementation of the `ModerationGateway` port.

mod http_moderation_gateway;

pub use http_moderation_gateway::HttpModerationGateway;
