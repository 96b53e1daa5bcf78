//! Order entity module

pub mod aggregate;
pub mod descriptor;
pub mod handlers;
pub mod manager;
pub mod model;

pub use aggregate::{DEFAULT_LIST_LIMIT, OrderAggregate, OrderItemView, OrderLine, OrderView};
pub use descriptor::OrderDescriptor;
pub use manager::OrderManager;
pub use model::{Order, OrderDraft, OrderStatus};
