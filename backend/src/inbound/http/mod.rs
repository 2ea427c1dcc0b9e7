//! HTTP inbound adapter exposing REST endpoints.
//!
//! Layering inside the adapter:
//! - [`boundary`] settles every handler outcome into a response;
//! - [`fallback`] envelopes unmatched routes and framework rejections;
//! - [`validation`] turns raw request parts into typed input or a 400;
//! - [`session`] performs the optimistic first authorisation phase;
//! - handler modules ([`auth`], [`posts`], [`health`]) call driving ports.

pub mod auth;
pub mod boundary;
pub mod error;
pub mod fallback;
pub mod health;
pub mod posts;
pub mod responses;
pub mod routes;
pub mod schemas;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;
