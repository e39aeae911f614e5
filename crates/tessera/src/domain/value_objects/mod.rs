//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.
//! Each one validates eagerly on construction.

mod email;
mod page;
mod user_id;
mod user_name;

pub use email::*;
pub use page::*;
pub use user_id::*;
pub use user_name::*;
