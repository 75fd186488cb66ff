/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `Result<T, ApiError>`; errors from the shared crate
/// convert with `?`.
///
/// | Source                                  | Status |
/// |-----------------------------------------|--------|
/// | malformed id, no fields, bad order      | 400    |
/// | missing or invalid session              | 401    |
/// | entity owned by someone else            | 403    |
/// | entity (or its chain) missing           | 404    |
/// | duplicate email                         | 409    |
/// | `validator` failures                    | 422    |
/// | store failures                          | 500    |
///
/// # Example
///
/// ```
/// use kanban_api::error::{ApiError, ApiResult};
/// use axum::Json;
/// use serde_json::json;
///
/// async fn handler(title: Option<String>) -> ApiResult<Json<serde_json::Value>> {
///     let title = title.ok_or_else(|| ApiError::BadRequest("No fields to update".to_string()))?;
///     Ok(Json(json!({ "title": title })))
/// }
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use kanban_shared::auth::{
    authorization::AuthzError, jwt::JwtError, middleware::AuthError, password::PasswordError,
};
use kanban_shared::position::PositionError;
use serde::{Deserialize, Serialize};
use sqlx::error::ErrorKind;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Every failure a handler can report
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Bad request (400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Unauthorized (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Forbidden (403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflict (409) - e.g., duplicate email
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Unprocessable entity (422) - validation errors
    #[error("Validation failed: {} errors", .0.len())]
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApiError {
    /// Partial update with no recognized fields
    pub fn no_fields_to_update() -> Self {
        ApiError::BadRequest("No fields to update".to_string())
    }

    /// Single-field validation failure
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: field.to_string(),
            message: message.into(),
        }])
    }
}

/// One failing field of a request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// JSON body of every error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "bad_request", "forbidden")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::ValidationError(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::InternalError(msg) => {
                // Store details stay in the log
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => match db_err.kind() {
                ErrorKind::UniqueViolation => {
                    if db_err.constraint().is_some_and(|c| c.contains("email")) {
                        ApiError::Conflict("Email already exists".to_string())
                    } else {
                        ApiError::Conflict("Resource already exists".to_string())
                    }
                }
                ErrorKind::CheckViolation => {
                    ApiError::BadRequest("Value violates a constraint".to_string())
                }
                ErrorKind::ForeignKeyViolation => {
                    ApiError::NotFound("Referenced resource not found".to_string())
                }
                _ => ApiError::InternalError(format!("Database error: {}", db_err)),
            },
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Convert authentication errors to API errors
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials => {
                ApiError::Unauthorized("Unauthenticated".to_string())
            }
            AuthError::InvalidToken(msg) => ApiError::Unauthorized(msg),
        }
    }
}

/// Convert ownership errors to API errors
impl From<AuthzError> for ApiError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::InvalidReference(_) => ApiError::BadRequest("Invalid id".to_string()),
            AuthzError::NotFound(entity) => ApiError::NotFound(format!("{} not found", entity)),
            AuthzError::Forbidden(_) => {
                ApiError::Forbidden("Not authorized to access this resource".to_string())
            }
            AuthzError::DatabaseError(err) => err.into(),
        }
    }
}

/// Convert position engine errors to API errors
impl From<PositionError> for ApiError {
    fn from(err: PositionError) -> Self {
        match err {
            PositionError::NegativePosition(_)
            | PositionError::PositionTooLarge(_)
            | PositionError::InvalidOrder(_) => ApiError::BadRequest(err.to_string()),
            PositionError::ContainerFull(_) => ApiError::Conflict(err.to_string()),
            PositionError::ContainerNotFound(_) | PositionError::ItemNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            PositionError::DatabaseError(err) => err.into(),
        }
    }
}

/// Convert password errors to API errors
impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

/// Convert JWT errors to API errors
impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::CreateError(msg) => ApiError::InternalError(msg),
            JwtError::Expired => ApiError::Unauthorized("Token expired".to_string()),
            JwtError::ValidationError(_) => ApiError::Unauthorized("Invalid token".to_string()),
        }
    }
}

/// Convert `validator` failures to a 422 with per-field details
impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut errors: Vec<ValidationErrorDetail> = err
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();
        errors.sort_by(|a, b| a.field.cmp(&b.field));

        ApiError::ValidationError(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kanban_shared::auth::authorization::EntityRef;
    use kanban_shared::ordering::OrderError;

    fn status_of(err: impl Into<ApiError>) -> StatusCode {
        err.into().into_response().status()
    }

    #[test]
    fn test_no_fields_to_update_is_bad_request() {
        let err = ApiError::no_fields_to_update();
        assert_eq!(err.to_string(), "Bad request: No fields to update");
        assert_eq!(status_of(err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_validator_errors_become_sorted_details() {
        #[derive(validator::Validate)]
        struct Rename {
            #[validate(length(min = 1, message = "Title must not be empty"))]
            title: String,
            #[validate(range(min = 0, message = "Position must be non-negative"))]
            position: i32,
        }

        let failures = validator::Validate::validate(&Rename {
            title: String::new(),
            position: -2,
        })
        .unwrap_err();

        let ApiError::ValidationError(details) = ApiError::from(failures) else {
            panic!("expected validation error");
        };
        let fields: Vec<&str> = details.iter().map(|d| d.field.as_str()).collect();
        assert_eq!(fields, vec!["position", "title"]);
        assert_eq!(details[1].message, "Title must not be empty");
    }

    #[test]
    fn test_authz_error_statuses() {
        assert_eq!(
            status_of(AuthzError::InvalidReference("abc".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AuthzError::NotFound(EntityRef::Card(5))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AuthzError::Forbidden(EntityRef::List(1))),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_position_error_statuses() {
        assert_eq!(status_of(PositionError::NegativePosition(-1)), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(PositionError::PositionTooLarge(i32::MAX)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(PositionError::ContainerFull(kanban_shared::position::Container::List(2))),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(PositionError::InvalidOrder(OrderError::DuplicateId(4))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(PositionError::ItemNotFound(kanban_shared::position::Item::Card(3))),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_auth_errors_are_unauthorized() {
        assert_eq!(status_of(AuthError::MissingCredentials), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(JwtError::Expired), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of(JwtError::CreateError("boom".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_store_failures_are_not_surfaced() {
        assert_eq!(status_of(sqlx::Error::PoolTimedOut), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(status_of(sqlx::Error::RowNotFound), StatusCode::NOT_FOUND);
    }
}
