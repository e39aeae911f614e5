//! Views - Read-only projections of entities for callers

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{User, UserId};

/// External projection of a User. Internal fields (version) are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserView {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id(),
            name: user.name().to_string(),
            email: user.email().to_string(),
            is_active: user.is_active(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        }
    }
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

/// One page of a User listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserPage {
    pub items: Vec<UserView>,
    pub offset: u64,
    pub limit: u32,
    pub total: u64,
}
