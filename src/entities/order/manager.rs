//! Order resource manager
//!
//! Plain writes go through the shared [`ResourceManager`] protocol. Reads
//! return assembled [`OrderView`] documents and the two transitions overwrite
//! the status unconditionally.

use super::aggregate::{OrderView, assemble_list};
use super::model::{Order, OrderDraft, OrderStatus};
use crate::core::error::BakeryResult;
use crate::core::manager::{ResourceManager, not_found};
use crate::core::service::OrderStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct OrderManager {
    records: ResourceManager<Order, dyn OrderStore>,
    list_limit: usize,
}

impl OrderManager {
    pub fn new(store: Arc<dyn OrderStore>, list_limit: usize) -> Self {
        Self {
            records: ResourceManager::new(store),
            list_limit,
        }
    }

    /// Orders by date with customer, items and products; empty is not found
    pub async fn list(&self) -> BakeryResult<Vec<OrderView>> {
        let aggregates = self
            .records
            .store()
            .list_aggregates(self.list_limit)
            .await?;
        let views = assemble_list(aggregates, self.list_limit)?;
        tracing::debug!(count = views.len(), limit = self.list_limit, "listed orders");
        Ok(views)
    }

    pub async fn get(&self, id: i32) -> BakeryResult<OrderView> {
        match self.records.store().get_aggregate(id).await? {
            Some(aggregate) => Ok(aggregate.into()),
            None => {
                tracing::warn!(id, "order not found");
                Err(not_found::<Order>(id))
            }
        }
    }

    pub async fn create(&self, draft: OrderDraft) -> BakeryResult<Order> {
        self.records.create(draft).await
    }

    pub async fn update(&self, id: i32, draft: OrderDraft) -> BakeryResult<Order> {
        self.records.update(id, draft).await
    }

    pub async fn delete(&self, id: i32) -> BakeryResult<()> {
        self.records.delete(id).await
    }

    pub async fn complete(&self, id: i32) -> BakeryResult<Order> {
        self.transition(id, OrderStatus::Completed).await
    }

    pub async fn cancel(&self, id: i32) -> BakeryResult<Order> {
        self.transition(id, OrderStatus::Cancelled).await
    }

    /// No guard on the current status: last write wins
    async fn transition(&self, id: i32, status: OrderStatus) -> BakeryResult<Order> {
        if !self.records.store().set_status(id, status.as_str()).await? {
            tracing::warn!(id, %status, "transition on missing order");
            return Err(not_found::<Order>(id));
        }
        tracing::info!(id, %status, "order status changed");
        self.records.reread(id).await
    }
}
