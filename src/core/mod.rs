//! Core module containing the traits and types every resource builds on

pub mod datetime;
pub mod error;
pub mod manager;
pub mod money;
pub mod service;
pub mod validation;

pub use error::{BakeryError, BakeryResult, StorageError, StorageResult};
pub use manager::ResourceManager;
pub use service::{DataStore, ListingStore, OrderStore, Record, Stores};
