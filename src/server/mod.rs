//! Server module for building the HTTP server
//!
//! `ServerBuilder` wires the stores into every resource, registers their
//! routes and serves them with graceful shutdown.

pub mod builder;
pub mod entity_registry;
pub mod exposure;

pub use builder::ServerBuilder;
pub use entity_registry::{EntityDescriptor, EntityRegistry};
