//! # Belle Croissant
//!
//! REST backend for a bakery: customers, products, orders and order items.
//!
//! ## Layout
//!
//! - [`core`]: error types, storage traits, the shared resource lifecycle
//!   and payload validation
//! - [`entities`]: one module per resource with its record, payload rules
//!   and routes; orders add the aggregate read and status transitions
//! - [`storage`]: in-memory and PostgreSQL (feature `postgres`) adapters
//! - [`server`]: registry, REST exposure and the server builder
//! - [`config`]: YAML and environment configuration
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bakery::prelude::*;
//!
//! let app = ServerBuilder::new()
//!     .with_in_memory_store()
//!     .with_order_list_limit(100)
//!     .build()?;
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    pub use crate::config::AppConfig;
    pub use crate::core::error::{
        BakeryError, BakeryResult, EntityError, ErrorResponse, StorageError, StorageResult,
        ValidationError,
    };
    pub use crate::core::manager::ResourceManager;
    pub use crate::core::service::{DataStore, ListingStore, OrderStore, Record, Stores};
    pub use crate::core::validation::{Operation, ValidatableEntity, Validated};
    pub use crate::entities::customer::{Customer, CustomerDraft, CustomerManager};
    pub use crate::entities::order::{
        Order, OrderAggregate, OrderDraft, OrderManager, OrderStatus, OrderView,
    };
    pub use crate::entities::order_item::{OrderItem, OrderItemDraft, OrderItemManager};
    pub use crate::entities::product::{Product, ProductDraft, ProductManager};
    pub use crate::server::{EntityDescriptor, EntityRegistry, ServerBuilder};
    pub use crate::storage::InMemoryStore;

    #[cfg(feature = "postgres")]
    pub use crate::storage::PostgresStore;
}
