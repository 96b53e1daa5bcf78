//! Axum extractor for validated payloads
//!
//! `Validated<T>` reads the body as JSON, runs the entity's validation rules
//! for the request's operation and only then deserializes into `T`.

use super::config::{EntityValidationConfig, Operation};
use crate::core::error::{BakeryError, ValidationError};
use axum::{
    Json,
    extract::{FromRequest, Request},
    http::Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Payload types that carry their own validation rules
pub trait ValidatableEntity: DeserializeOwned {
    /// Validation rules for the given operation
    fn validation_config(operation: Operation) -> EntityValidationConfig;

    /// Validate a raw payload and deserialize it
    fn from_payload(operation: Operation, payload: Value) -> Result<Self, BakeryError> {
        let filtered = Self::validation_config(operation)
            .validate_and_filter(payload)
            .map_err(ValidationError::FieldErrors)?;
        Ok(serde_json::from_value(filtered)?)
    }
}

/// Axum extractor yielding an already validated `T`
///
/// ```rust,ignore
/// pub async fn create(Validated(draft): Validated<ProductDraft>) -> BakeryResult<...> {
///     // every field rule has passed
/// }
/// ```
pub struct Validated<T>(pub T);

fn operation_for(method: &Method) -> Operation {
    if method == Method::PUT || method == Method::PATCH {
        Operation::Update
    } else {
        Operation::Create
    }
}

impl<S, T> FromRequest<S> for Validated<T>
where
    S: Send + Sync,
    T: ValidatableEntity + Send,
{
    type Rejection = BakeryError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let operation = operation_for(req.method());

        let Json(payload): Json<Value> = Json::from_request(req, state)
            .await
            .map_err(|rejection| ValidationError::InvalidJson {
                message: rejection.body_text(),
            })?;

        T::from_payload(operation, payload).map(Validated)
    }
}
