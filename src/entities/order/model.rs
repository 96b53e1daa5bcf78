//! Order record, payload and status values

use crate::core::service::Record;
use crate::core::validation::validators::*;
use crate::core::validation::{EntityValidationConfig, Operation, ValidatableEntity};
use crate::core::{datetime, money};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Status values written by the order transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A customer order (one sales transaction)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub transaction_id: i32,
    pub customer_id: i32,
    #[serde(with = "datetime")]
    pub order_date: NaiveDateTime,
    #[serde(with = "money")]
    pub total_amount: Decimal,
    pub status: String,
    pub payment_method: String,
    pub channel: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion_id: Option<i32>,
    #[serde(default, with = "money::option", skip_serializing_if = "Option::is_none")]
    pub discount_amount: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    #[serde(default)]
    pub transaction_id: Option<i32>,
    pub customer_id: i32,
    #[serde(with = "datetime")]
    pub order_date: NaiveDateTime,
    #[serde(with = "money")]
    pub total_amount: Decimal,
    #[serde(default)]
    pub status: Option<String>,
    pub payment_method: String,
    pub channel: String,
    #[serde(default)]
    pub store_id: Option<i32>,
    #[serde(default)]
    pub promotion_id: Option<i32>,
    #[serde(default, with = "money::option")]
    pub discount_amount: Option<Decimal>,
}

impl OrderDraft {
    pub fn into_record(self, transaction_id: i32) -> Order {
        Order {
            transaction_id,
            customer_id: self.customer_id,
            order_date: self.order_date,
            total_amount: money::normalize(self.total_amount),
            status: self
                .status
                .unwrap_or_else(|| OrderStatus::Pending.as_str().to_string()),
            payment_method: self.payment_method,
            channel: self.channel,
            store_id: self.store_id,
            promotion_id: self.promotion_id,
            discount_amount: self.discount_amount.map(money::normalize),
        }
    }
}

impl ValidatableEntity for OrderDraft {
    fn validation_config(operation: Operation) -> EntityValidationConfig {
        let mut config = EntityValidationConfig::new("order");

        // Navigation fields are read-only; items are managed through /order-items.
        config.strip("customer");
        config.strip("orderItems");
        match operation {
            Operation::Create => config.strip("transactionId"),
            Operation::Update => config.add_validator("transactionId", integer()),
        }

        config.add_validator("customerId", required());
        config.add_validator("customerId", integer());

        config.add_validator("orderDate", required());
        config.add_validator("orderDate", date());

        config.add_validator("totalAmount", required());
        config.add_validator("totalAmount", money());
        config.add_validator("totalAmount", non_negative());

        config.add_validator("status", string());
        config.add_validator("status", string_length(1, 20));

        config.add_validator("paymentMethod", required());
        config.add_validator("paymentMethod", string());
        config.add_validator("paymentMethod", string_length(1, 50));

        config.add_validator("channel", required());
        config.add_validator("channel", string());
        config.add_validator("channel", string_length(1, 20));

        config.add_validator("storeId", integer());
        config.add_validator("promotionId", integer());

        config.add_validator("discountAmount", money());
        config.add_validator("discountAmount", non_negative());

        config
    }
}

impl Record for Order {
    type Draft = OrderDraft;

    const ENTITY_TYPE: &'static str = "order";
    const PLURAL: &'static str = "orders";
    const EMPTY_LIST_IS_NOT_FOUND: bool = true;

    fn id(&self) -> i32 {
        self.transaction_id
    }

    fn draft_id(draft: &OrderDraft) -> Option<i32> {
        draft.transaction_id
    }

    fn display_order(&self, other: &Self) -> Ordering {
        self.order_date
            .cmp(&other.order_date)
            .then(self.transaction_id.cmp(&other.transaction_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_defaults_to_pending() {
        let payload = json!({
            "customerId": 1,
            "orderDate": "2024-01-01",
            "totalAmount": 12.4,
            "paymentMethod": "Card",
            "channel": "Online"
        });
        let order = OrderDraft::from_payload(Operation::Create, payload)
            .unwrap()
            .into_record(5);
        assert_eq!(order.status, "Pending");
        assert_eq!(order.total_amount.to_string(), "12.40");
    }

    #[test]
    fn test_overlong_status_is_rejected() {
        let payload = json!({
            "customerId": 1,
            "orderDate": "2024-01-01",
            "totalAmount": 1,
            "status": "Awaiting confirmation by the bakery",
            "paymentMethod": "Card",
            "channel": "Store"
        });
        let err = OrderDraft::from_payload(Operation::Create, payload).unwrap_err();
        assert!(err.to_string().contains("status"));
    }

    #[test]
    fn test_status_names() {
        assert_eq!(OrderStatus::Completed.to_string(), "Completed");
        assert_eq!(OrderStatus::Cancelled.as_str(), "Cancelled");
    }
}
