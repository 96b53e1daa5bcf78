//! Integration tests for the PostgreSQL store
//!
//! # Requirements
//!
//! - Docker must be running (testcontainers launches a PostgreSQL container)
//! - Feature flag `postgres` must be enabled
//!
//! # Running
//!
//! ```sh
//! cargo test --features postgres --test postgres_tests -- --test-threads=1
//! ```
//!
//! All tests share one container. Each test opens its own pool and truncates
//! the tables before running.

#![cfg(feature = "postgres")]

use axum::http::StatusCode;
use axum_test::TestServer;
use bakery::prelude::*;
use bakery::storage::ensure_schema;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::sync::{Arc, OnceLock};
use testcontainers::runners::AsyncRunner;
use testcontainers_modules::postgres::Postgres;

// ---------------------------------------------------------------------------
// Shared test environment (single container, fresh pool per test)
// ---------------------------------------------------------------------------

struct PgTestEnv {
    /// Dropping this stops the container
    _container: testcontainers::ContainerAsync<Postgres>,
    connection_url: String,
}

static TEST_ENV: OnceLock<PgTestEnv> = OnceLock::new();

async fn init_pg_env() -> &'static PgTestEnv {
    if let Some(env) = TEST_ENV.get() {
        return env;
    }

    let container = Postgres::default()
        .start()
        .await
        .expect("Failed to start PostgreSQL container (is Docker running?)");

    let host = container.get_host().await.unwrap();
    let port = container.get_host_port_ipv4(5432).await.unwrap();
    let url = format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

    let pool = PgPool::connect(&url)
        .await
        .expect("Failed to connect to PostgreSQL");
    ensure_schema(&pool).await.expect("Failed to create schema");
    pool.close().await;

    let _ = TEST_ENV.set(PgTestEnv {
        _container: container,
        connection_url: url,
    });
    TEST_ENV.get().unwrap()
}

async fn clean_store() -> PostgresStore {
    let env = init_pg_env().await;
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect(&env.connection_url)
        .await
        .expect("Failed to connect to PostgreSQL");
    sqlx::query("TRUNCATE order_items, orders, products, customers RESTART IDENTITY CASCADE")
        .execute(&pool)
        .await
        .expect("Failed to truncate tables");
    PostgresStore::new(pool)
}

fn at(day: u32) -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, day)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

fn customer_draft() -> CustomerDraft {
    CustomerDraft {
        customer_id: None,
        first_name: "Jane".to_string(),
        last_name: "Doe".to_string(),
        age: Some(34),
        gender: Some("F".to_string()),
        postal_code: None,
        email: "jane@example.com".to_string(),
        phone_number: None,
        membership_status: None,
        join_date: Some(at(1)),
        last_purchase_date: None,
        total_spending: Decimal::new(12000, 2),
        average_order_value: None,
        frequency: None,
        preferred_category: None,
        churned: Some(false),
    }
}

fn product_draft(name: &str) -> ProductDraft {
    ProductDraft {
        product_id: None,
        product_name: name.to_string(),
        category: "Viennoiserie".to_string(),
        price: Decimal::new(350, 2),
        cost: Decimal::new(120, 2),
        description: None,
        seasonal: false,
        active: true,
        introduced_date: at(1),
        ingredients: Some("flour, butter".to_string()),
    }
}

fn order_draft(customer_id: i32, day: u32) -> OrderDraft {
    OrderDraft {
        transaction_id: None,
        customer_id,
        order_date: at(day),
        total_amount: Decimal::new(1240, 2),
        status: None,
        payment_method: "Card".to_string(),
        channel: "Online".to_string(),
        store_id: Some(1),
        promotion_id: None,
        discount_amount: Some(Decimal::new(50, 2)),
    }
}

fn item_draft(transaction_id: i32, product_id: i32, quantity: i32) -> OrderItemDraft {
    OrderItemDraft {
        order_item_id: None,
        transaction_id,
        product_id,
        quantity,
        price: Decimal::new(350, 2),
    }
}

// ---------------------------------------------------------------------------
// Store contract
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_customer_round_trip_defaults_membership() {
    let store = clean_store().await;

    let customer = DataStore::<Customer>::insert(&store, customer_draft())
        .await
        .unwrap();
    assert_eq!(customer.customer_id, 1);
    assert_eq!(customer.membership_status, "Basic");

    let fetched = DataStore::<Customer>::get(&store, customer.customer_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.email, "jane@example.com");
    assert_eq!(fetched.total_spending.to_string(), "120.00");
}

#[tokio::test]
async fn test_products_listed_by_name() {
    let store = clean_store().await;
    for name in ["Eclair", "Baguette", "Croissant"] {
        DataStore::<Product>::insert(&store, product_draft(name))
            .await
            .unwrap();
    }

    let names: Vec<String> = ListingStore::<Product>::list(&store)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.product_name)
        .collect();
    assert_eq!(names, vec!["Baguette", "Croissant", "Eclair"]);
}

#[tokio::test]
async fn test_get_missing_row_is_none() {
    let store = clean_store().await;
    assert!(
        DataStore::<Product>::get(&store, 99)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_replace_missing_row_is_conflict() {
    let store = clean_store().await;
    let mut draft = product_draft("Croissant");
    draft.product_id = Some(5);

    let err = DataStore::<Product>::replace(&store, 5, draft)
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Conflict { .. }));
}

#[tokio::test]
async fn test_delete_missing_row_is_not_found() {
    let store = clean_store().await;
    let err = DataStore::<Product>::delete(&store, 5).await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound { .. }));
}

#[tokio::test]
async fn test_order_for_unknown_customer_is_conflict() {
    let store = clean_store().await;
    let err = DataStore::<Order>::insert(&store, order_draft(42, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Conflict { .. }));
}

#[tokio::test]
async fn test_set_status() {
    let store = clean_store().await;
    let customer = DataStore::<Customer>::insert(&store, customer_draft())
        .await
        .unwrap();
    let order = DataStore::<Order>::insert(&store, order_draft(customer.customer_id, 1))
        .await
        .unwrap();
    assert_eq!(order.status, "Pending");

    assert!(store.set_status(order.transaction_id, "Completed").await.unwrap());
    assert!(!store.set_status(order.transaction_id + 1, "Completed").await.unwrap());

    let fetched = DataStore::<Order>::get(&store, order.transaction_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.status, "Completed");
}

#[tokio::test]
async fn test_aggregate_joins_customer_items_and_products() {
    let store = clean_store().await;
    let customer = DataStore::<Customer>::insert(&store, customer_draft())
        .await
        .unwrap();
    let croissant = DataStore::<Product>::insert(&store, product_draft("Croissant"))
        .await
        .unwrap();
    let eclair = DataStore::<Product>::insert(&store, product_draft("Eclair"))
        .await
        .unwrap();
    let order = DataStore::<Order>::insert(&store, order_draft(customer.customer_id, 2))
        .await
        .unwrap();
    for (product, quantity) in [(&croissant, 2), (&eclair, 1)] {
        DataStore::<OrderItem>::insert(
            &store,
            item_draft(order.transaction_id, product.product_id, quantity),
        )
        .await
        .unwrap();
    }

    let aggregate = store
        .get_aggregate(order.transaction_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        aggregate.customer.as_ref().map(|c| c.first_name.as_str()),
        Some("Jane")
    );
    assert_eq!(aggregate.lines.len(), 2);
    let names: Vec<&str> = aggregate
        .lines
        .iter()
        .filter_map(|line| line.product.as_ref())
        .map(|p| p.product_name.as_str())
        .collect();
    assert!(names.contains(&"Croissant"));
    assert!(names.contains(&"Eclair"));
}

#[tokio::test]
async fn test_list_aggregates_respects_limit_and_order() {
    let store = clean_store().await;
    let customer = DataStore::<Customer>::insert(&store, customer_draft())
        .await
        .unwrap();
    for day in [3, 1, 2] {
        DataStore::<Order>::insert(&store, order_draft(customer.customer_id, day))
            .await
            .unwrap();
    }

    let aggregates = store.list_aggregates(2).await.unwrap();
    assert_eq!(aggregates.len(), 2);
    assert_eq!(aggregates[0].order.order_date, at(1));
    assert_eq!(aggregates[1].order.order_date, at(2));
}

#[tokio::test]
async fn test_deleting_order_cascades_to_items() {
    let store = clean_store().await;
    let customer = DataStore::<Customer>::insert(&store, customer_draft())
        .await
        .unwrap();
    let product = DataStore::<Product>::insert(&store, product_draft("Croissant"))
        .await
        .unwrap();
    let order = DataStore::<Order>::insert(&store, order_draft(customer.customer_id, 1))
        .await
        .unwrap();
    let item = DataStore::<OrderItem>::insert(
        &store,
        item_draft(order.transaction_id, product.product_id, 1),
    )
    .await
    .unwrap();

    DataStore::<Order>::delete(&store, order.transaction_id)
        .await
        .unwrap();
    assert!(
        DataStore::<OrderItem>::get(&store, item.order_item_id)
            .await
            .unwrap()
            .is_none()
    );
}

// ---------------------------------------------------------------------------
// REST over PostgreSQL
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_rest_order_flow() {
    let store = clean_store().await;
    let app = ServerBuilder::new()
        .with_stores(Stores::from_backend(Arc::new(store)))
        .build()
        .unwrap();
    let server = TestServer::new(app);

    server.get("/orders").await.assert_status_not_found();

    let customer = server
        .post("/customers")
        .json(&json!({
            "firstName": "Jane",
            "lastName": "Doe",
            "email": "jane@example.com",
            "totalSpending": "0"
        }))
        .await;
    customer.assert_status(StatusCode::CREATED);
    let customer_id = customer.json::<Value>()["customerId"].as_i64().unwrap();

    let order = server
        .post("/orders")
        .json(&json!({
            "customerId": customer_id,
            "orderDate": "2024-05-01T10:00:00",
            "totalAmount": 7.5,
            "paymentMethod": "Cash",
            "channel": "In-store"
        }))
        .await;
    order.assert_status(StatusCode::CREATED);
    let order_id = order.json::<Value>()["transactionId"].as_i64().unwrap();

    let cancelled = server.put(&format!("/orders/{}/cancel", order_id)).await;
    cancelled.assert_status_ok();
    assert_eq!(cancelled.json::<Value>()["status"], "Cancelled");

    let listed = server.get("/orders").await.json::<Vec<Value>>();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["totalAmount"], "7.50");
    assert_eq!(listed[0]["customer"]["customerId"], customer_id);
    assert!(listed[0]["orderItems"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_rest_rejects_price_wider_than_column() {
    let store = clean_store().await;
    let app = ServerBuilder::new()
        .with_stores(Stores::from_backend(Arc::new(store)))
        .build()
        .unwrap();
    let server = TestServer::new(app);

    let response = server
        .post("/products")
        .json(&json!({
            "productName": "Gold Leaf Cake",
            "category": "Cake",
            "price": 1e9,
            "cost": 10,
            "seasonal": false,
            "active": true,
            "introducedDate": "2024-01-01"
        }))
        .await;
    response.assert_status_bad_request();
    assert_eq!(response.json::<Value>()["details"]["fields"][0]["field"], "price");
    server.get("/products").await.assert_status_not_found();
}
