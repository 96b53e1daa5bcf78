//! OrderItem record and payload

use crate::core::money;
use crate::core::service::Record;
use crate::core::validation::validators::*;
use crate::core::validation::{EntityValidationConfig, Operation, ValidatableEntity};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One product line of an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub order_item_id: i32,
    pub transaction_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    /// Unit price
    #[serde(with = "money")]
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDraft {
    #[serde(default)]
    pub order_item_id: Option<i32>,
    pub transaction_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    #[serde(with = "money")]
    pub price: Decimal,
}

impl OrderItemDraft {
    pub fn into_record(self, order_item_id: i32) -> OrderItem {
        OrderItem {
            order_item_id,
            transaction_id: self.transaction_id,
            product_id: self.product_id,
            quantity: self.quantity,
            price: money::normalize(self.price),
        }
    }
}

impl ValidatableEntity for OrderItemDraft {
    fn validation_config(operation: Operation) -> EntityValidationConfig {
        let mut config = EntityValidationConfig::new("order item");

        // Items never carry their parent order or product inline.
        config.strip("order");
        config.strip("product");
        match operation {
            Operation::Create => config.strip("orderItemId"),
            Operation::Update => config.add_validator("orderItemId", integer()),
        }

        for field in ["transactionId", "productId"] {
            config.add_validator(field, required());
            config.add_validator(field, integer());
        }

        config.add_validator("quantity", required());
        config.add_validator("quantity", integer());
        config.add_validator("quantity", min_value(1));

        config.add_validator("price", required());
        config.add_validator("price", money());
        config.add_validator("price", non_negative());

        config
    }
}

impl Record for OrderItem {
    type Draft = OrderItemDraft;

    const ENTITY_TYPE: &'static str = "order item";
    const PLURAL: &'static str = "order-items";

    fn id(&self) -> i32 {
        self.order_item_id
    }

    fn draft_id(draft: &OrderItemDraft) -> Option<i32> {
        draft.order_item_id
    }
}
