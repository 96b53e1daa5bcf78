//! Typed error handling for the bakery backend
//!
//! Every resource-manager failure is one of these values. The HTTP layer
//! never inspects storage errors directly: it asks the error for its status
//! code and renders an [`ErrorResponse`].
//!
//! # Error Categories
//!
//! - [`EntityError`]: lifecycle outcomes (not found, identity mismatch, unresolved conflict)
//! - [`ValidationError`]: payload shape and field-level violations
//! - [`StorageError`]: failures reported by a storage adapter
//! - [`ConfigError`]: configuration parsing and validation
//! - [`RequestError`]: malformed path parameters
//!
//! Server-side failures (5xx) never expose the underlying storage text to
//! clients; the raw cause is logged where the error is produced.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// The main error type for the bakery backend
#[derive(Debug)]
pub enum BakeryError {
    /// Resource lifecycle errors
    Entity(EntityError),

    /// Validation errors
    Validation(ValidationError),

    /// Storage backend errors
    Storage(StorageError),

    /// Configuration errors
    Config(ConfigError),

    /// HTTP/Request errors
    Request(RequestError),

    /// Unexpected failures
    Internal(String),
}

impl fmt::Display for BakeryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BakeryError::Entity(e) => write!(f, "{}", e),
            BakeryError::Validation(e) => write!(f, "{}", e),
            BakeryError::Storage(e) => write!(f, "{}", e),
            BakeryError::Config(e) => write!(f, "{}", e),
            BakeryError::Request(e) => write!(f, "{}", e),
            BakeryError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for BakeryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BakeryError::Entity(e) => Some(e),
            BakeryError::Validation(e) => Some(e),
            BakeryError::Storage(e) => Some(e),
            BakeryError::Config(e) => Some(e),
            BakeryError::Request(e) => Some(e),
            BakeryError::Internal(_) => None,
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Message shown to clients for every 5xx response
pub const INTERNAL_ERROR_MESSAGE: &str = "An error occurred while processing the request.";

impl BakeryError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            BakeryError::Entity(e) => e.status_code(),
            BakeryError::Validation(_) => StatusCode::BAD_REQUEST,
            BakeryError::Storage(e) => e.status_code(),
            BakeryError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BakeryError::Request(_) => StatusCode::BAD_REQUEST,
            BakeryError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            BakeryError::Entity(e) => e.error_code(),
            BakeryError::Validation(_) => "VALIDATION_ERROR",
            BakeryError::Storage(e) => e.error_code(),
            BakeryError::Config(_) => "CONFIG_ERROR",
            BakeryError::Request(e) => e.error_code(),
            BakeryError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    ///
    /// 5xx responses carry a generic message and a diagnostic string that
    /// names the failure class without the raw backend text.
    pub fn to_response(&self) -> ErrorResponse {
        if self.status_code().is_server_error() {
            return ErrorResponse {
                code: self.error_code().to_string(),
                message: INTERNAL_ERROR_MESSAGE.to_string(),
                details: Some(serde_json::json!({ "error": self.diagnostic() })),
            };
        }

        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    /// Short internal diagnostic, safe to hand to clients
    pub fn diagnostic(&self) -> String {
        match self {
            BakeryError::Storage(e) => e.diagnostic(),
            BakeryError::Entity(EntityError::Conflict {
                entity_type, id, ..
            }) => format!("unresolved concurrent modification of {} {}", entity_type, id),
            BakeryError::Config(_) => "configuration error".to_string(),
            other => other.error_code().to_lowercase(),
        }
    }

    /// Get additional details for the error
    fn details(&self) -> Option<serde_json::Value> {
        match self {
            BakeryError::Entity(EntityError::NotFound { entity_type, id }) => {
                Some(serde_json::json!({
                    "entity_type": entity_type,
                    "id": id
                }))
            }
            BakeryError::Entity(EntityError::IdentityMismatch {
                path_id, body_id, ..
            }) => Some(serde_json::json!({
                "path_id": path_id,
                "body_id": body_id
            })),
            BakeryError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for BakeryError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Entity Errors
// =============================================================================

/// Lifecycle outcomes surfaced by the resource managers
#[derive(Debug)]
pub enum EntityError {
    /// No row for the given id
    NotFound { entity_type: String, id: i32 },

    /// A listing matched nothing and the resource treats that as not found
    NoneFound { entity_type: String },

    /// Path id disagrees with the id embedded in the body
    IdentityMismatch {
        entity_type: String,
        path_id: i32,
        body_id: Option<i32>,
    },

    /// The store reported a conflicting write and the row still exists
    Conflict {
        entity_type: String,
        id: i32,
        message: String,
    },
}

impl fmt::Display for EntityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityError::NotFound { entity_type, id } => {
                write!(f, "{} with ID {} not found.", capitalize(entity_type), id)
            }
            EntityError::NoneFound { entity_type } => {
                write!(f, "No {} found.", entity_type)
            }
            EntityError::IdentityMismatch { entity_type, .. } => {
                write!(f, "{} ID mismatch.", capitalize(entity_type))
            }
            EntityError::Conflict {
                entity_type,
                id,
                message,
            } => {
                write!(
                    f,
                    "Conflicting modification of {} {}: {}",
                    entity_type, id, message
                )
            }
        }
    }
}

impl std::error::Error for EntityError {}

impl EntityError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            EntityError::NotFound { .. } => StatusCode::NOT_FOUND,
            EntityError::NoneFound { .. } => StatusCode::NOT_FOUND,
            EntityError::IdentityMismatch { .. } => StatusCode::BAD_REQUEST,
            EntityError::Conflict { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            EntityError::NotFound { .. } => "ENTITY_NOT_FOUND",
            EntityError::NoneFound { .. } => "NO_ENTITIES_FOUND",
            EntityError::IdentityMismatch { .. } => "IDENTITY_MISMATCH",
            EntityError::Conflict { .. } => "ENTITY_CONFLICT",
        }
    }
}

impl From<EntityError> for BakeryError {
    fn from(err: EntityError) -> Self {
        BakeryError::Entity(err)
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug)]
pub enum ValidationError {
    /// One entry per violated field
    FieldErrors(Vec<FieldValidationError>),

    /// Body is not valid JSON or does not fit the target type
    InvalidJson { message: String },
}

/// A single field validation error
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

impl FieldValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::FieldErrors(errors) => {
                let msgs: Vec<String> = errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect();
                write!(f, "Validation errors: {}", msgs.join(", "))
            }
            ValidationError::InvalidJson { message } => {
                write!(f, "Invalid JSON: {}", message)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for BakeryError {
    fn from(err: ValidationError) -> Self {
        BakeryError::Validation(err)
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors reported by a storage adapter
///
/// Absence on a plain lookup is not an error (`Ok(None)`); `NotFound` is only
/// used by operations that must target an existing row.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The targeted row does not exist
    #[error("{entity_type} {id} does not exist")]
    NotFound { entity_type: &'static str, id: i32 },

    /// Concurrent modification or constraint violation
    #[error("conflict: {message}")]
    Conflict { message: String },

    /// Backend unreachable (pool exhausted, connection refused, poisoned lock)
    #[error("storage backend '{backend}' is unavailable: {message}")]
    Unavailable {
        backend: &'static str,
        message: String,
    },

    /// Any other query failure
    #[error("{backend} query error: {message}")]
    Query {
        backend: &'static str,
        message: String,
    },
}

impl StorageError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            StorageError::NotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            StorageError::NotFound { .. } => "ENTITY_NOT_FOUND",
            StorageError::Conflict { .. } => "STORAGE_CONFLICT",
            StorageError::Unavailable { .. } => "STORAGE_UNAVAILABLE",
            StorageError::Query { .. } => "STORAGE_ERROR",
        }
    }

    fn diagnostic(&self) -> String {
        match self {
            StorageError::NotFound { entity_type, id } => {
                format!("{} {} does not exist", entity_type, id)
            }
            StorageError::Conflict { .. } => "storage reported a conflicting write".to_string(),
            StorageError::Unavailable { backend, .. } => {
                format!("storage backend '{}' unavailable", backend)
            }
            StorageError::Query { backend, .. } => format!("{} query failed", backend),
        }
    }
}

impl From<StorageError> for BakeryError {
    fn from(err: StorageError) -> Self {
        BakeryError::Storage(err)
    }
}

/// Result type returned by storage adapters
pub type StorageResult<T> = Result<T, StorageError>;

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to parse configuration file
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// IO error while reading configuration
    IoError { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::InvalidValue {
                field,
                value,
                message,
            } => {
                write!(
                    f,
                    "Invalid value '{}' for field '{}': {}",
                    value, field, message
                )
            }
            ConfigError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for BakeryError {
    fn from(err: ConfigError) -> Self {
        BakeryError::Config(err)
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors related to HTTP requests
#[derive(Debug)]
pub enum RequestError {
    /// Path id is not an integer
    InvalidEntityId { id: String },
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::InvalidEntityId { id } => {
                write!(f, "Invalid entity ID format: '{}'", id)
            }
        }
    }
}

impl std::error::Error for RequestError {}

impl RequestError {
    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::InvalidEntityId { .. } => "INVALID_ENTITY_ID",
        }
    }
}

impl From<RequestError> for BakeryError {
    fn from(err: RequestError) -> Self {
        BakeryError::Request(err)
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_json::Error> for BakeryError {
    fn from(err: serde_json::Error) -> Self {
        BakeryError::Validation(ValidationError::InvalidJson {
            message: err.to_string(),
        })
    }
}

impl From<serde_yaml::Error> for BakeryError {
    fn from(err: serde_yaml::Error) -> Self {
        BakeryError::Config(ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        })
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for resource-manager operations
pub type BakeryResult<T> = Result<T, BakeryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_entity_and_id() {
        let err = EntityError::NotFound {
            entity_type: "order".to_string(),
            id: 42,
        };
        assert_eq!(err.to_string(), "Order with ID 42 not found.");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_none_found_is_404() {
        let err: BakeryError = EntityError::NoneFound {
            entity_type: "orders".to_string(),
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_response().message, "No orders found.");
    }

    #[test]
    fn test_identity_mismatch_is_400_with_both_ids() {
        let err: BakeryError = EntityError::IdentityMismatch {
            entity_type: "product".to_string(),
            path_id: 3,
            body_id: Some(4),
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        let response = err.to_response();
        assert_eq!(response.message, "Product ID mismatch.");
        let details = response.details.expect("details");
        assert_eq!(details["path_id"], 3);
        assert_eq!(details["body_id"], 4);
    }

    #[test]
    fn test_validation_error_lists_every_field() {
        let err = ValidationError::FieldErrors(vec![
            FieldValidationError::new("firstName", "is required"),
            FieldValidationError::new("email", "is not a valid email address"),
        ]);
        let display = err.to_string();
        assert!(display.contains("firstName"));
        assert!(display.contains("email"));

        let response = BakeryError::from(err).to_response();
        assert_eq!(response.code, "VALIDATION_ERROR");
        let fields = response.details.expect("details")["fields"].clone();
        assert_eq!(fields.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_server_errors_hide_backend_text() {
        let err: BakeryError = StorageError::Unavailable {
            backend: "postgres",
            message: "password authentication failed for user \"bakery\"".to_string(),
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = err.to_response();
        assert_eq!(response.message, INTERNAL_ERROR_MESSAGE);
        let body = serde_json::to_string(&response).unwrap();
        assert!(!body.contains("password"));
        assert!(body.contains("storage backend 'postgres' unavailable"));
    }

    #[test]
    fn test_unresolved_conflict_is_fatal() {
        let err: BakeryError = EntityError::Conflict {
            entity_type: "customer".to_string(),
            id: 9,
            message: "row version changed".to_string(),
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), "ENTITY_CONFLICT");
    }

    #[test]
    fn test_invalid_entity_id_is_400() {
        let err: BakeryError = RequestError::InvalidEntityId {
            id: "abc".to_string(),
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("abc"));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: BakeryError = json_err.into();
        assert!(matches!(
            err,
            BakeryError::Validation(ValidationError::InvalidJson { .. })
        ));
    }
}
