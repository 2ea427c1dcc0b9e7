//! Backend library modules.
//!
//! Layers, outermost first: [`inbound`] handlers settle every outcome at
//! the boundary, [`domain`] services apply business and ownership rules,
//! and [`outbound`] adapters translate storage and third-party failures
//! into domain errors.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
