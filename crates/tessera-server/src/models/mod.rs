//! Tessera Data Models
//!
//! - User: request and response shapes for user management

mod user;

pub use user::*;
