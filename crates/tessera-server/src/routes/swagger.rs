//! OpenAPI Documentation
//!
//! Centralized API documentation using utoipa.

use utoipa::OpenApi;

use crate::models::{CreateUserRequest, UpdateUserRequest, UserListResponse, UserResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        // User endpoints
        super::user::list_users,
        super::user::create_user,
        super::user::get_user,
        super::user::update_user,
        super::user::deactivate_user,
        super::user::activate_user,
        super::user::delete_user,
    ),
    info(
        title = "Tessera API",
        version = "0.1.0",
        description = "User lifecycle API: create, read, update, deactivate and delete users.",
        license(name = "MIT"),
    ),
    servers(
        (url = "/", description = "Current server"),
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "User", description = "User - Account lifecycle management"),
    ),
    components(
        schemas(
            CreateUserRequest,
            UpdateUserRequest,
            UserResponse,
            UserListResponse,
        )
    ),
)]
pub struct ApiDoc;
