//! Storage-agnostic Adapters
//!
//! UserRepository implementations that need no external system:
//! an in-memory store and a caching decorator over any other repository.

mod cached;
mod memory;

pub use cached::{CachedUserRepository, DEFAULT_CACHE_CAPACITY};
pub use memory::InMemoryUserRepository;
