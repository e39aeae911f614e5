//! Application Layer (Use Cases)
//!
//! Orchestrates domain operations and coordinates with repositories.
//! Receives already-validated commands and returns read-only views.

pub mod commands;
pub mod views;
mod user_service;

pub use commands::{CreateUser, UpdateUser};
pub use user_service::UserService;
pub use views::{UserPage, UserView};
