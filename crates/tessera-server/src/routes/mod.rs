//! Tessera API Routes
//!
//! - /tessera/users - User lifecycle management
//! - /swagger-ui - OpenAPI documentation

pub mod swagger;
pub mod user;

use axum::http::StatusCode;
use tessera::DomainError;

/// Error half of every handler result
pub type ApiError = (StatusCode, String);

/// Map a domain error onto an HTTP status and message
pub fn domain_error(e: DomainError) -> ApiError {
    match e {
        DomainError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
        DomainError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        DomainError::NotFound { entity_type, .. } => {
            (StatusCode::NOT_FOUND, format!("{entity_type} not found"))
        }
        DomainError::Repository(msg) => {
            tracing::error!("Repository failure: {}", msg);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds_map_to_statuses() {
        assert_eq!(
            domain_error(DomainError::Validation("name: empty".into())).0,
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            domain_error(DomainError::Conflict("dup".into())).0,
            StatusCode::CONFLICT
        );
        assert_eq!(
            domain_error(DomainError::not_found("User", "42")).0,
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_repository_details_are_not_leaked() {
        let (status, body) = domain_error(DomainError::Repository("password=hunter2".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.contains("hunter2"));
    }
}
