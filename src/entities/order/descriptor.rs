//! Entity descriptor for Order

use super::handlers::{
    cancel_order, complete_order, create_order, delete_order, get_order, list_orders,
    update_order,
};
use super::manager::OrderManager;
use crate::server::EntityDescriptor;
use axum::{
    Router,
    routing::{get, put},
};

/// Descriptor for the Order entity
pub struct OrderDescriptor {
    pub manager: OrderManager,
}

impl OrderDescriptor {
    pub fn new(manager: OrderManager) -> Self {
        Self { manager }
    }
}

impl EntityDescriptor for OrderDescriptor {
    fn entity_type(&self) -> &str {
        "order"
    }

    fn plural(&self) -> &str {
        "orders"
    }

    fn build_routes(&self) -> Router {
        Router::new()
            .route("/orders", get(list_orders).post(create_order))
            .route(
                "/orders/{id}",
                get(get_order).put(update_order).delete(delete_order),
            )
            .route("/orders/{id}/complete", put(complete_order))
            .route("/orders/{id}/cancel", put(cancel_order))
            .with_state(self.manager.clone())
    }
}
