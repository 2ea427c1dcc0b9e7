//! Request middleware.
//!
//! Cross-cutting request lifecycle concerns that sit outside individual
//! handlers.

pub mod trace;

pub use trace::{TRACE_ID_HEADER, Trace};
