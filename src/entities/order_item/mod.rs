//! OrderItem entity module

pub mod descriptor;
pub mod model;

pub use descriptor::OrderItemDescriptor;
pub use model::{OrderItem, OrderItemDraft};

use crate::core::manager::ResourceManager;

pub type OrderItemManager = ResourceManager<OrderItem>;
