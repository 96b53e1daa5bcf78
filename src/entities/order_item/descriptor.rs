//! Entity descriptor for OrderItem

use super::OrderItemManager;
use super::model::OrderItem;
use crate::core::service::Record;
use crate::entities::crud;
use crate::server::EntityDescriptor;
use axum::Router;

/// Descriptor for the OrderItem entity (no delete route)
pub struct OrderItemDescriptor {
    pub manager: OrderItemManager,
}

impl OrderItemDescriptor {
    pub fn new(manager: OrderItemManager) -> Self {
        Self { manager }
    }
}

impl EntityDescriptor for OrderItemDescriptor {
    fn entity_type(&self) -> &str {
        OrderItem::ENTITY_TYPE
    }

    fn plural(&self) -> &str {
        OrderItem::PLURAL
    }

    fn build_routes(&self) -> Router {
        crud::routes(self.manager.clone(), false)
    }
}
