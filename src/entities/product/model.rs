//! Product record and payload

use crate::core::service::Record;
use crate::core::validation::validators::*;
use crate::core::validation::{EntityValidationConfig, Operation, ValidatableEntity};
use crate::core::{datetime, money};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A product on sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_id: i32,
    pub product_name: String,
    pub category: String,
    #[serde(with = "money")]
    pub price: Decimal,
    #[serde(with = "money")]
    pub cost: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub seasonal: bool,
    pub active: bool,
    #[serde(with = "datetime")]
    pub introduced_date: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<String>,
}

/// Product payload for create and replace
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    #[serde(default)]
    pub product_id: Option<i32>,
    pub product_name: String,
    pub category: String,
    #[serde(with = "money")]
    pub price: Decimal,
    #[serde(with = "money")]
    pub cost: Decimal,
    #[serde(default)]
    pub description: Option<String>,
    pub seasonal: bool,
    pub active: bool,
    #[serde(with = "datetime")]
    pub introduced_date: NaiveDateTime,
    #[serde(default)]
    pub ingredients: Option<String>,
}

impl ProductDraft {
    pub fn into_record(self, product_id: i32) -> Product {
        Product {
            product_id,
            product_name: self.product_name,
            category: self.category,
            price: money::normalize(self.price),
            cost: money::normalize(self.cost),
            description: self.description,
            seasonal: self.seasonal,
            active: self.active,
            introduced_date: self.introduced_date,
            ingredients: self.ingredients,
        }
    }
}

impl ValidatableEntity for ProductDraft {
    fn validation_config(operation: Operation) -> EntityValidationConfig {
        let mut config = EntityValidationConfig::new("product");
        config.add_alias("name", "productName");

        match operation {
            Operation::Create => config.strip("productId"),
            Operation::Update => config.add_validator("productId", integer()),
        }

        config.add_validator("productName", required());
        config.add_validator("productName", string());
        config.add_validator("productName", string_length(1, 100));

        config.add_validator("category", required());
        config.add_validator("category", string());
        config.add_validator("category", string_length(1, 50));

        for field in ["price", "cost"] {
            config.add_validator(field, required());
            config.add_validator(field, money());
            config.add_validator(field, non_negative());
        }

        config.add_validator("description", string());

        for field in ["seasonal", "active"] {
            config.add_validator(field, required());
            config.add_validator(field, boolean());
        }

        config.add_validator("introducedDate", required());
        config.add_validator("introducedDate", date());

        config.add_validator("ingredients", string());

        config
    }
}

impl Record for Product {
    type Draft = ProductDraft;

    const ENTITY_TYPE: &'static str = "product";
    const PLURAL: &'static str = "products";
    const EMPTY_LIST_IS_NOT_FOUND: bool = true;

    fn id(&self) -> i32 {
        self.product_id
    }

    fn draft_id(draft: &ProductDraft) -> Option<i32> {
        draft.product_id
    }

    fn display_order(&self, other: &Self) -> Ordering {
        self.product_name
            .cmp(&other.product_name)
            .then(self.product_id.cmp(&other.product_id))
    }
}
