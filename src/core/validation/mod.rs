//! Request payload validation
//!
//! Rules are declared per entity and per operation with
//! [`EntityValidationConfig`], and enforced by the [`Validated`] extractor
//! before a handler sees the payload.

pub mod config;
pub mod extractor;
pub mod validators;

pub use config::{EntityValidationConfig, Operation};
pub use extractor::{Validated, ValidatableEntity};
