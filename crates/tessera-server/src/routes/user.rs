//! User Routes - Account Lifecycle Management
//!
//! HTTP handlers that turn requests into commands and delegate to
//! UserService for business logic.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use tessera::UserId;

use super::{domain_error, ApiError};
use crate::models::{
    CreateUserRequest, ListUsersQuery, UpdateUserRequest, UserListResponse, UserResponse,
};
use crate::AppState;

/// List Users
#[utoipa::path(
    get,
    path = "/tessera/users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "Page of Users in creation order", body = UserListResponse),
        (status = 422, description = "Invalid paging parameters"),
        (status = 500, description = "Internal server error")
    ),
    tag = "User"
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<UserListResponse>, ApiError> {
    let page = query.into_page().map_err(domain_error)?;
    let users = state.user_service.list(page).await.map_err(domain_error)?;

    Ok(Json(users.into()))
}

/// Create new User
#[utoipa::path(
    post,
    path = "/tessera/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created successfully", body = UserResponse),
        (status = 409, description = "Email already registered"),
        (status = 422, description = "Invalid name or email"),
        (status = 500, description = "Internal server error")
    ),
    tag = "User"
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let cmd = payload.into_command().map_err(domain_error)?;
    let user = state.user_service.create(cmd).await.map_err(domain_error)?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Get User by ID
#[utoipa::path(
    get,
    path = "/tessera/users/{id}",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "User"
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .user_service
        .get_by_id(UserId::from(id))
        .await
        .map_err(domain_error)?;

    Ok(Json(user.into()))
}

/// Update User
#[utoipa::path(
    put,
    path = "/tessera/users/{id}",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated successfully", body = UserResponse),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email taken, user deactivated, or concurrent modification"),
        (status = 422, description = "Invalid name or email"),
        (status = 500, description = "Internal server error")
    ),
    tag = "User"
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let cmd = payload.into_command().map_err(domain_error)?;
    let user = state
        .user_service
        .update(UserId::from(id), cmd)
        .await
        .map_err(domain_error)?;

    Ok(Json(user.into()))
}

/// Deactivate User
#[utoipa::path(
    post,
    path = "/tessera/users/{id}/deactivate",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User is deactivated", body = UserResponse),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "User"
)]
pub async fn deactivate_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .user_service
        .deactivate(UserId::from(id))
        .await
        .map_err(domain_error)?;

    Ok(Json(user.into()))
}

/// Activate User
#[utoipa::path(
    post,
    path = "/tessera/users/{id}/activate",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User is active", body = UserResponse),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "User"
)]
pub async fn activate_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .user_service
        .activate(UserId::from(id))
        .await
        .map_err(domain_error)?;

    Ok(Json(user.into()))
}

/// Delete User
#[utoipa::path(
    delete,
    path = "/tessera/users/{id}",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted successfully"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "User"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .user_service
        .delete(UserId::from(id))
        .await
        .map_err(domain_error)?;

    Ok(Json(serde_json::json!({
        "status": "ok",
        "message": "User deleted"
    })))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tessera/users", get(list_users).post(create_user))
        .route(
            "/tessera/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/tessera/users/:id/deactivate", post(deactivate_user))
        .route("/tessera/users/:id/activate", post(activate_user))
}
