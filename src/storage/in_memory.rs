//! In-memory storage for tests and development
//!
//! All four tables live behind one `RwLock`, so every write sees a
//! consistent snapshot. Foreign keys are checked the way the relational
//! schema checks them and violations are reported as `Conflict`.

use crate::core::error::{StorageError, StorageResult};
use crate::core::service::{DataStore, ListingStore, OrderStore, Record};
use crate::entities::customer::{Customer, CustomerDraft};
use crate::entities::order::{Order, OrderAggregate, OrderDraft, OrderLine};
use crate::entities::order_item::{OrderItem, OrderItemDraft};
use crate::entities::product::{Product, ProductDraft};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

const BACKEND: &str = "memory";

/// Monotonic identity generator; ids start at 1 and are never reused
#[derive(Debug, Default)]
struct Sequence(i32);

impl Sequence {
    fn next(&mut self) -> i32 {
        self.0 += 1;
        self.0
    }
}

#[derive(Debug, Default)]
struct Tables {
    customers: BTreeMap<i32, Customer>,
    products: BTreeMap<i32, Product>,
    orders: BTreeMap<i32, Order>,
    order_items: BTreeMap<i32, OrderItem>,
    customer_ids: Sequence,
    product_ids: Sequence,
    order_ids: Sequence,
    order_item_ids: Sequence,
}

impl Tables {
    fn aggregate(&self, order: &Order) -> OrderAggregate {
        let lines = self
            .order_items
            .values()
            .filter(|item| item.transaction_id == order.transaction_id)
            .map(|item| OrderLine {
                item: item.clone(),
                product: self.products.get(&item.product_id).cloned(),
            })
            .collect();

        OrderAggregate {
            order: order.clone(),
            customer: self.customers.get(&order.customer_id).cloned(),
            lines,
        }
    }

    fn check_customer(&self, customer_id: i32) -> StorageResult<()> {
        if self.customers.contains_key(&customer_id) {
            Ok(())
        } else {
            Err(foreign_key_violation("orders", "customer_id", customer_id))
        }
    }

    fn check_item_references(&self, draft: &OrderItemDraft) -> StorageResult<()> {
        if !self.orders.contains_key(&draft.transaction_id) {
            return Err(foreign_key_violation(
                "order_items",
                "transaction_id",
                draft.transaction_id,
            ));
        }
        if !self.products.contains_key(&draft.product_id) {
            return Err(foreign_key_violation(
                "order_items",
                "product_id",
                draft.product_id,
            ));
        }
        Ok(())
    }
}

fn foreign_key_violation(table: &str, column: &str, value: i32) -> StorageError {
    StorageError::Conflict {
        message: format!("{}.{} references missing row {}", table, column, value),
    }
}

fn still_referenced(table: &str, id: i32, by: &str) -> StorageError {
    StorageError::Conflict {
        message: format!("{} row {} is still referenced by {}", table, id, by),
    }
}

/// Overwrite an existing row; a missing row means nothing was updated
fn replace_row<R: Record>(table: &mut BTreeMap<i32, R>, record: R) -> StorageResult<()> {
    match table.get_mut(&record.id()) {
        Some(row) => {
            *row = record;
            Ok(())
        }
        None => Err(StorageError::Conflict {
            message: format!("no {} row with id {} was updated", R::ENTITY_TYPE, record.id()),
        }),
    }
}

fn remove_row<R: Record>(table: &mut BTreeMap<i32, R>, id: i32) -> StorageResult<R> {
    table.remove(&id).ok_or(StorageError::NotFound {
        entity_type: R::ENTITY_TYPE,
        id,
    })
}

/// Process-local store implementing every resource's storage trait
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StorageResult<RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(|e| StorageError::Unavailable {
            backend: BACKEND,
            message: format!("failed to acquire read lock: {}", e),
        })
    }

    fn write(&self) -> StorageResult<RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|e| StorageError::Unavailable {
            backend: BACKEND,
            message: format!("failed to acquire write lock: {}", e),
        })
    }
}

#[async_trait]
impl ListingStore<Customer> for InMemoryStore {
    async fn list(&self) -> StorageResult<Vec<Customer>> {
        Ok(self.read()?.customers.values().cloned().collect())
    }
}

#[async_trait]
impl DataStore<Customer> for InMemoryStore {
    async fn get(&self, id: i32) -> StorageResult<Option<Customer>> {
        Ok(self.read()?.customers.get(&id).cloned())
    }

    async fn insert(&self, draft: CustomerDraft) -> StorageResult<Customer> {
        let mut tables = self.write()?;
        let customer = draft.into_record(tables.customer_ids.next());
        tables
            .customers
            .insert(customer.customer_id, customer.clone());
        Ok(customer)
    }

    async fn replace(&self, id: i32, draft: CustomerDraft) -> StorageResult<()> {
        let mut tables = self.write()?;
        replace_row(&mut tables.customers, draft.into_record(id))
    }

    async fn delete(&self, id: i32) -> StorageResult<()> {
        let mut tables = self.write()?;
        if tables.orders.values().any(|o| o.customer_id == id) {
            return Err(still_referenced("customers", id, "orders"));
        }
        remove_row(&mut tables.customers, id).map(|_| ())
    }
}

#[async_trait]
impl ListingStore<Product> for InMemoryStore {
    async fn list(&self) -> StorageResult<Vec<Product>> {
        Ok(self.read()?.products.values().cloned().collect())
    }
}

#[async_trait]
impl DataStore<Product> for InMemoryStore {
    async fn get(&self, id: i32) -> StorageResult<Option<Product>> {
        Ok(self.read()?.products.get(&id).cloned())
    }

    async fn insert(&self, draft: ProductDraft) -> StorageResult<Product> {
        let mut tables = self.write()?;
        let product = draft.into_record(tables.product_ids.next());
        tables.products.insert(product.product_id, product.clone());
        Ok(product)
    }

    async fn replace(&self, id: i32, draft: ProductDraft) -> StorageResult<()> {
        let mut tables = self.write()?;
        replace_row(&mut tables.products, draft.into_record(id))
    }

    async fn delete(&self, id: i32) -> StorageResult<()> {
        let mut tables = self.write()?;
        if tables.order_items.values().any(|i| i.product_id == id) {
            return Err(still_referenced("products", id, "order_items"));
        }
        remove_row(&mut tables.products, id).map(|_| ())
    }
}

#[async_trait]
impl DataStore<Order> for InMemoryStore {
    async fn get(&self, id: i32) -> StorageResult<Option<Order>> {
        Ok(self.read()?.orders.get(&id).cloned())
    }

    async fn insert(&self, draft: OrderDraft) -> StorageResult<Order> {
        let mut tables = self.write()?;
        tables.check_customer(draft.customer_id)?;
        let order = draft.into_record(tables.order_ids.next());
        tables.orders.insert(order.transaction_id, order.clone());
        Ok(order)
    }

    async fn replace(&self, id: i32, draft: OrderDraft) -> StorageResult<()> {
        let mut tables = self.write()?;
        tables.check_customer(draft.customer_id)?;
        replace_row(&mut tables.orders, draft.into_record(id))
    }

    /// Items of the order are removed with it
    async fn delete(&self, id: i32) -> StorageResult<()> {
        let mut tables = self.write()?;
        remove_row(&mut tables.orders, id)?;
        tables.order_items.retain(|_, item| item.transaction_id != id);
        Ok(())
    }
}

#[async_trait]
impl OrderStore for InMemoryStore {
    async fn set_status(&self, id: i32, status: &str) -> StorageResult<bool> {
        let mut tables = self.write()?;
        match tables.orders.get_mut(&id) {
            Some(order) => {
                order.status = status.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_aggregates(&self, limit: usize) -> StorageResult<Vec<OrderAggregate>> {
        let tables = self.read()?;
        let mut orders: Vec<&Order> = tables.orders.values().collect();
        orders.sort_by(|a, b| a.display_order(b));
        Ok(orders
            .into_iter()
            .take(limit)
            .map(|order| tables.aggregate(order))
            .collect())
    }

    async fn get_aggregate(&self, id: i32) -> StorageResult<Option<OrderAggregate>> {
        let tables = self.read()?;
        Ok(tables.orders.get(&id).map(|order| tables.aggregate(order)))
    }
}

#[async_trait]
impl ListingStore<OrderItem> for InMemoryStore {
    async fn list(&self) -> StorageResult<Vec<OrderItem>> {
        Ok(self.read()?.order_items.values().cloned().collect())
    }
}

#[async_trait]
impl DataStore<OrderItem> for InMemoryStore {
    async fn get(&self, id: i32) -> StorageResult<Option<OrderItem>> {
        Ok(self.read()?.order_items.get(&id).cloned())
    }

    async fn insert(&self, draft: OrderItemDraft) -> StorageResult<OrderItem> {
        let mut tables = self.write()?;
        tables.check_item_references(&draft)?;
        let item = draft.into_record(tables.order_item_ids.next());
        tables.order_items.insert(item.order_item_id, item.clone());
        Ok(item)
    }

    async fn replace(&self, id: i32, draft: OrderItemDraft) -> StorageResult<()> {
        let mut tables = self.write()?;
        tables.check_item_references(&draft)?;
        replace_row(&mut tables.order_items, draft.into_record(id))
    }

    async fn delete(&self, id: i32) -> StorageResult<()> {
        let mut tables = self.write()?;
        remove_row(&mut tables.order_items, id).map(|_| ())
    }
}
