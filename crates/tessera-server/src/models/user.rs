//! User DTOs
//!
//! Wire shapes for the user endpoints. Requests are raw input; they become
//! validated commands in the route handlers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use tessera::{CreateUser, DomainError, PageRequest, UpdateUser, UserPage, UserView};

/// Create User request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
}

impl CreateUserRequest {
    pub fn into_command(self) -> Result<CreateUser, DomainError> {
        CreateUser::new(&self.name, &self.email)
    }
}

/// Update User request (at least one field required)
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl UpdateUserRequest {
    pub fn into_command(self) -> Result<UpdateUser, DomainError> {
        UpdateUser::new(self.name.as_deref(), self.email.as_deref())
    }
}

/// Paging parameters for listing Users
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    /// Number of Users to skip (default 0)
    pub offset: Option<u64>,
    /// Maximum Users to return, 1-100 (default 20)
    pub limit: Option<u32>,
}

impl ListUsersQuery {
    pub fn into_page(self) -> Result<PageRequest, DomainError> {
        PageRequest::from_optional(self.offset, self.limit)
    }
}

/// User response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserView> for UserResponse {
    fn from(view: UserView) -> Self {
        Self {
            id: view.id.as_uuid(),
            name: view.name,
            email: view.email,
            is_active: view.is_active,
            created_at: view.created_at,
            updated_at: view.updated_at,
        }
    }
}

/// Paged User listing
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserListResponse {
    pub items: Vec<UserResponse>,
    pub offset: u64,
    pub limit: u32,
    pub total: u64,
}

impl From<UserPage> for UserListResponse {
    fn from(page: UserPage) -> Self {
        Self {
            items: page.items.into_iter().map(UserResponse::from).collect(),
            offset: page.offset,
            limit: page.limit,
            total: page.total,
        }
    }
}
