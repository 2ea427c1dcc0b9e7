//! Persistence adapters.
//!
//! Repository implementations translate between stored rows and domain
//! types and map every storage failure into a domain [`crate::domain::Error`]
//! before returning. No business rules live here.

mod in_memory_post_repository;
mod store_error_mapping;

pub use in_memory_post_repository::{InMemoryPostRepository, PublicationRecord};
pub use store_error_mapping::StoreError;
