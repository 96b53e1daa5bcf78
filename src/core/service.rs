//! Storage access traits
//!
//! Resource managers only talk to storage through these traits, so the
//! in-memory and PostgreSQL adapters are interchangeable.

use crate::core::error::StorageResult;
use crate::core::validation::ValidatableEntity;
use crate::entities::customer::Customer;
use crate::entities::order::{Order, OrderAggregate};
use crate::entities::order_item::OrderItem;
use crate::entities::product::Product;
use async_trait::async_trait;
use serde::Serialize;
use std::cmp::Ordering;
use std::sync::Arc;

/// A persisted row with a storage-assigned integer identity
pub trait Record: Clone + Serialize + Send + Sync + 'static {
    /// Client payload for create and replace (identity optional)
    type Draft: ValidatableEntity + Clone + Send + Sync + 'static;

    /// Singular name used in messages ("product")
    const ENTITY_TYPE: &'static str;

    /// Route segment and plural name ("products")
    const PLURAL: &'static str;

    /// Whether an empty listing is reported as not found
    const EMPTY_LIST_IS_NOT_FOUND: bool = false;

    fn id(&self) -> i32;

    /// Identity embedded in a payload, if any
    fn draft_id(draft: &Self::Draft) -> Option<i32>;

    /// Ordering applied to listings
    fn display_order(&self, other: &Self) -> Ordering {
        self.id().cmp(&other.id())
    }
}

/// CRUD primitives over one record type
#[async_trait]
pub trait DataStore<R: Record>: Send + Sync {
    /// Absence is `Ok(None)`
    async fn get(&self, id: i32) -> StorageResult<Option<R>>;

    async fn exists(&self, id: i32) -> StorageResult<bool> {
        Ok(self.get(id).await?.is_some())
    }

    /// Insert a new row; the store assigns the identity
    async fn insert(&self, draft: R::Draft) -> StorageResult<R>;

    /// Replace every column of an existing row
    ///
    /// Reports `Conflict` when no row was changed.
    async fn replace(&self, id: i32, draft: R::Draft) -> StorageResult<()>;

    /// Remove a row, `NotFound` if it is absent
    async fn delete(&self, id: i32) -> StorageResult<()>;
}

/// Stores whose rows are listed as stored
///
/// Orders are never listed this way; they are read as aggregates.
#[async_trait]
pub trait ListingStore<R: Record>: DataStore<R> {
    async fn list(&self) -> StorageResult<Vec<R>>;
}

/// Order storage with eager-loaded reads and status writes
#[async_trait]
pub trait OrderStore: DataStore<Order> {
    /// Overwrite the status column; `false` when the order does not exist
    async fn set_status(&self, id: i32, status: &str) -> StorageResult<bool>;

    /// Orders by date with customer, items and products, at most `limit`
    async fn list_aggregates(&self, limit: usize) -> StorageResult<Vec<OrderAggregate>>;

    async fn get_aggregate(&self, id: i32) -> StorageResult<Option<OrderAggregate>>;
}

/// The four store handles the server is wired with
#[derive(Clone)]
pub struct Stores {
    pub customers: Arc<dyn ListingStore<Customer>>,
    pub products: Arc<dyn ListingStore<Product>>,
    pub orders: Arc<dyn OrderStore>,
    pub order_items: Arc<dyn ListingStore<OrderItem>>,
}

impl Stores {
    /// Use one backend for every resource
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: ListingStore<Customer>
            + ListingStore<Product>
            + OrderStore
            + ListingStore<OrderItem>
            + 'static,
    {
        Self {
            customers: backend.clone(),
            products: backend.clone(),
            orders: backend.clone(),
            order_items: backend,
        }
    }
}
