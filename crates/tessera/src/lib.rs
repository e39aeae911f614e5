//! Tessera Domain Library
//!
//! Core domain types, interfaces and use cases for user lifecycle management.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: Core domain models (User, NewUser)
//!   - `value_objects/`: Validated value types (UserId, UserName, Email, PageRequest)
//!   - `errors/`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `repositories/`: Data access interfaces
//!
//! - **Application** (`application/`): Use cases over the ports
//!   - `commands`: Validated input
//!   - `views`: Read-only output projections
//!
//! - **Adapters** (`adapters/`): Repository implementations that need no
//!   external system (in-memory store, caching decorator)
//!
//! - **Testing** (`testing`, feature `testing`): a lifecycle scenario that
//!   any repository can be run through and compared against another
//!
//! Database and transport adapters live in `tessera-server`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tessera::{CreateUser, InMemoryUserRepository, UserService};
//!
//! let service = UserService::new(Arc::new(InMemoryUserRepository::new()));
//! let view = service.create(CreateUser::new("Ada", "ada@example.com")?).await?;
//! ```

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export commonly used types
pub use adapters::{CachedUserRepository, InMemoryUserRepository};
pub use application::{CreateUser, UpdateUser, UserPage, UserService, UserView};
pub use domain::{DomainError, Email, NewUser, PageRequest, User, UserId, UserName};
pub use ports::UserRepository;
