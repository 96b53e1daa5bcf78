//! Order aggregate reads
//!
//! Stores return [`OrderAggregate`] values: an order with its customer, its
//! items and each item's product. They are turned into [`OrderView`]
//! documents for the wire. Views hold no back-references (an item does not
//! repeat its order, a customer does not list its orders), so serializing
//! them cannot cycle.

use super::model::Order;
use crate::core::error::{BakeryResult, EntityError};
use crate::entities::customer::Customer;
use crate::entities::order_item::OrderItem;
use crate::entities::product::Product;
use serde::Serialize;

/// Default cap on the number of orders in a listing
pub const DEFAULT_LIST_LIMIT: usize = 100;

/// An order item joined with its product
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub item: OrderItem,
    pub product: Option<Product>,
}

/// An order joined with everything it references
#[derive(Debug, Clone, PartialEq)]
pub struct OrderAggregate {
    pub order: Order,
    pub customer: Option<Customer>,
    pub lines: Vec<OrderLine>,
}

/// Wire shape of an order item inside an order
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemView {
    #[serde(flatten)]
    pub item: OrderItem,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
}

/// Wire shape of an order read
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
    pub order_items: Vec<OrderItemView>,
}

impl From<OrderAggregate> for OrderView {
    fn from(aggregate: OrderAggregate) -> Self {
        let order_items = aggregate
            .lines
            .into_iter()
            .map(|line| OrderItemView {
                item: line.item,
                product: line.product,
            })
            .collect();

        OrderView {
            order: aggregate.order,
            customer: aggregate.customer,
            order_items,
        }
    }
}

/// Build the listing: at most `limit` views, and an empty result is not found
pub fn assemble_list(aggregates: Vec<OrderAggregate>, limit: usize) -> BakeryResult<Vec<OrderView>> {
    if aggregates.is_empty() {
        return Err(EntityError::NoneFound {
            entity_type: "orders".to_string(),
        }
        .into());
    }

    let views: Vec<OrderView> = aggregates
        .into_iter()
        .take(limit)
        .map(OrderView::from)
        .collect();

    for view in &views {
        tracing::debug!(
            transaction_id = view.order.transaction_id,
            items = view.order_items.len(),
            "assembled order"
        );
    }
    Ok(views)
}
