//! Bakery resources: customers, products, orders and order items

pub mod crud;
pub mod customer;
pub mod order;
pub mod order_item;
pub mod product;

pub use customer::{Customer, CustomerDescriptor, CustomerManager};
pub use order::{OrderDescriptor, OrderManager, Order, OrderView};
pub use order_item::{OrderItem, OrderItemDescriptor, OrderItemManager};
pub use product::{Product, ProductDescriptor, ProductManager};

use crate::core::service::Stores;
use crate::server::EntityRegistry;

/// Register every resource's routes, wired to the given stores
pub fn register_all(registry: &mut EntityRegistry, stores: &Stores, order_list_limit: usize) {
    registry.register(Box::new(CustomerDescriptor::new(CustomerManager::new(
        stores.customers.clone(),
    ))));
    registry.register(Box::new(ProductDescriptor::new(ProductManager::new(
        stores.products.clone(),
    ))));
    registry.register(Box::new(OrderDescriptor::new(OrderManager::new(
        stores.orders.clone(),
        order_list_limit,
    ))));
    registry.register(Box::new(OrderItemDescriptor::new(OrderItemManager::new(
        stores.order_items.clone(),
    ))));
}
