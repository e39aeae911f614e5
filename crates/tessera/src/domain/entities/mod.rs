//! Domain Entities
//!
//! Pure domain models without infrastructure dependencies.
//! - User: account identity with an active/deactivated lifecycle

mod user;

pub use user::*;
