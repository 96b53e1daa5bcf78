//! API exposure
//!
//! REST is the only transport; it consumes the entity registry and produces
//! an Axum router.

pub mod rest;

pub use rest::RestExposure;
