//! Customer record and payload

use crate::core::service::Record;
use crate::core::validation::validators::*;
use crate::core::validation::{EntityValidationConfig, Operation, ValidatableEntity};
use crate::core::{datetime, money};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Membership tier given to customers created without one
pub const DEFAULT_MEMBERSHIP: &str = "Basic";

/// A bakery customer
///
/// Orders are not embedded; they reference the customer by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub customer_id: i32,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub membership_status: String,
    #[serde(default, with = "datetime::option", skip_serializing_if = "Option::is_none")]
    pub join_date: Option<NaiveDateTime>,
    #[serde(default, with = "datetime::option", skip_serializing_if = "Option::is_none")]
    pub last_purchase_date: Option<NaiveDateTime>,
    #[serde(with = "money")]
    pub total_spending: Decimal,
    #[serde(default, with = "money::option", skip_serializing_if = "Option::is_none")]
    pub average_order_value: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub churned: Option<bool>,
}

/// Customer payload for create and replace
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDraft {
    #[serde(default)]
    pub customer_id: Option<i32>,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub age: Option<i32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub membership_status: Option<String>,
    #[serde(default, with = "datetime::option")]
    pub join_date: Option<NaiveDateTime>,
    #[serde(default, with = "datetime::option")]
    pub last_purchase_date: Option<NaiveDateTime>,
    #[serde(with = "money")]
    pub total_spending: Decimal,
    #[serde(default, with = "money::option")]
    pub average_order_value: Option<Decimal>,
    #[serde(default)]
    pub frequency: Option<String>,
    #[serde(default)]
    pub preferred_category: Option<String>,
    #[serde(default)]
    pub churned: Option<bool>,
}

impl CustomerDraft {
    pub fn into_record(self, customer_id: i32) -> Customer {
        Customer {
            customer_id,
            first_name: self.first_name,
            last_name: self.last_name,
            age: self.age,
            gender: self.gender,
            postal_code: self.postal_code,
            email: self.email,
            phone_number: self.phone_number,
            membership_status: self
                .membership_status
                .unwrap_or_else(|| DEFAULT_MEMBERSHIP.to_string()),
            join_date: self.join_date,
            last_purchase_date: self.last_purchase_date,
            total_spending: money::normalize(self.total_spending),
            average_order_value: self.average_order_value.map(money::normalize),
            frequency: self.frequency,
            preferred_category: self.preferred_category,
            churned: self.churned,
        }
    }
}

impl ValidatableEntity for CustomerDraft {
    fn validation_config(operation: Operation) -> EntityValidationConfig {
        let mut config = EntityValidationConfig::new("customer");

        // Creating a customer never creates orders.
        config.strip("orders");
        match operation {
            Operation::Create => config.strip("customerId"),
            Operation::Update => config.add_validator("customerId", integer()),
        }

        for field in ["firstName", "lastName"] {
            config.add_validator(field, required());
            config.add_validator(field, string());
            config.add_validator(field, string_length(1, 50));
        }

        config.add_validator("age", integer());
        config.add_validator("age", min_value(0));

        config.add_validator("gender", string());
        config.add_validator("gender", in_list(vec!["M".into(), "F".into(), "O".into()]));

        config.add_validator("postalCode", string());
        config.add_validator("postalCode", string_length(0, 10));

        config.add_validator("email", required());
        config.add_validator("email", string());
        config.add_validator("email", string_length(1, 100));
        config.add_validator("email", email());

        config.add_validator("phoneNumber", string());
        config.add_validator("phoneNumber", string_length(0, 20));

        config.add_validator("membershipStatus", string());
        config.add_validator("membershipStatus", string_length(1, 20));

        config.add_validator("joinDate", date());
        config.add_validator("lastPurchaseDate", date());

        config.add_validator("totalSpending", required());
        config.add_validator("totalSpending", money());
        config.add_validator("totalSpending", non_negative());

        config.add_validator("averageOrderValue", money());
        config.add_validator("averageOrderValue", non_negative());

        for field in ["frequency", "preferredCategory"] {
            config.add_validator(field, string());
            config.add_validator(field, string_length(0, 50));
        }

        config.add_validator("churned", boolean());

        config
    }
}

impl Record for Customer {
    type Draft = CustomerDraft;

    const ENTITY_TYPE: &'static str = "customer";
    const PLURAL: &'static str = "customers";

    fn id(&self) -> i32 {
        self.customer_id
    }

    fn draft_id(draft: &CustomerDraft) -> Option<i32> {
        draft.customer_id
    }

    fn display_order(&self, other: &Self) -> Ordering {
        self.first_name
            .cmp(&other.first_name)
            .then_with(|| self.last_name.cmp(&other.last_name))
            .then(self.customer_id.cmp(&other.customer_id))
    }
}
