//! PostgreSQL storage backend using sqlx.
//!
//! Provides [`PostgresStore`], which implements every resource's storage
//! trait over one `sqlx::PgPool` with plain parameterized SQL.
//!
//! # Feature flag
//!
//! This module is gated behind the `postgres` feature flag:
//! ```toml
//! [dependencies]
//! belle-croissant = { version = "0.1", features = ["postgres"] }
//! ```

use crate::core::error::{StorageError, StorageResult};
use crate::core::money;
use crate::core::service::{DataStore, ListingStore, OrderStore};
use crate::entities::customer::{Customer, CustomerDraft, DEFAULT_MEMBERSHIP};
use crate::entities::order::{Order, OrderAggregate, OrderDraft, OrderLine, OrderStatus};
use crate::entities::order_item::{OrderItem, OrderItemDraft};
use crate::entities::product::{Product, ProductDraft};
use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::collections::HashMap;

const BACKEND: &str = "postgres";

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS customers (
        customer_id         SERIAL PRIMARY KEY,
        first_name          VARCHAR(50)  NOT NULL,
        last_name           VARCHAR(50)  NOT NULL,
        age                 INTEGER      CHECK (age >= 0),
        gender              VARCHAR(1),
        postal_code         VARCHAR(10),
        email               VARCHAR(100) NOT NULL,
        phone_number        VARCHAR(20),
        membership_status   VARCHAR(20)  NOT NULL DEFAULT 'Basic',
        join_date           TIMESTAMP,
        last_purchase_date  TIMESTAMP,
        total_spending      NUMERIC(10, 2) NOT NULL DEFAULT 0 CHECK (total_spending >= 0),
        average_order_value NUMERIC(10, 2),
        frequency           VARCHAR(50),
        preferred_category  VARCHAR(50),
        churned             BOOLEAN
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS products (
        product_id      SERIAL PRIMARY KEY,
        product_name    VARCHAR(100)   NOT NULL,
        category        VARCHAR(50)    NOT NULL,
        price           NUMERIC(10, 2) NOT NULL CHECK (price >= 0),
        cost            NUMERIC(10, 2) NOT NULL CHECK (cost >= 0),
        description     TEXT,
        seasonal        BOOLEAN        NOT NULL,
        active          BOOLEAN        NOT NULL,
        introduced_date TIMESTAMP      NOT NULL,
        ingredients     TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS orders (
        transaction_id  SERIAL PRIMARY KEY,
        customer_id     INTEGER        NOT NULL REFERENCES customers (customer_id),
        order_date      TIMESTAMP      NOT NULL,
        total_amount    NUMERIC(10, 2) NOT NULL CHECK (total_amount >= 0),
        status          VARCHAR(20)    NOT NULL DEFAULT 'Pending',
        payment_method  VARCHAR(50)    NOT NULL,
        channel         VARCHAR(20)    NOT NULL,
        store_id        INTEGER,
        promotion_id    INTEGER,
        discount_amount NUMERIC(10, 2)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS order_items (
        order_item_id  SERIAL PRIMARY KEY,
        transaction_id INTEGER        NOT NULL REFERENCES orders (transaction_id) ON DELETE CASCADE,
        product_id     INTEGER        NOT NULL REFERENCES products (product_id),
        quantity       INTEGER        NOT NULL CHECK (quantity >= 1),
        price          NUMERIC(10, 2) NOT NULL CHECK (price >= 0)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_orders_order_date ON orders (order_date, transaction_id)",
    "CREATE INDEX IF NOT EXISTS idx_order_items_transaction ON order_items (transaction_id)",
];

/// Create the four tables if they do not exist yet.
///
/// Idempotent. Call once at startup before serving requests.
pub async fn ensure_schema(pool: &PgPool) -> StorageResult<()> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(classify)?;
    }
    Ok(())
}

/// Map a sqlx error onto the storage error taxonomy
fn classify(err: sqlx::Error) -> StorageError {
    match &err {
        sqlx::Error::Database(db)
            if db.is_foreign_key_violation()
                || db.is_unique_violation()
                || db.is_check_violation()
                // serialization_failure: concurrent update under SERIALIZABLE
                || db.code().as_deref() == Some("40001") =>
        {
            StorageError::Conflict {
                message: db.message().to_string(),
            }
        }
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::WorkerCrashed => StorageError::Unavailable {
            backend: BACKEND,
            message: err.to_string(),
        },
        _ => StorageError::Query {
            backend: BACKEND,
            message: err.to_string(),
        },
    }
}

fn nothing_updated(table: &str, id: i32) -> StorageError {
    StorageError::Conflict {
        message: format!("no {} row with id {} was updated", table, id),
    }
}

const CUSTOMER_COLUMNS: &str = "customer_id, first_name, last_name, age, gender, postal_code, \
     email, phone_number, membership_status, join_date, last_purchase_date, total_spending, \
     average_order_value, frequency, preferred_category, churned";

const PRODUCT_COLUMNS: &str = "product_id, product_name, category, price, cost, description, \
     seasonal, active, introduced_date, ingredients";

const ORDER_COLUMNS: &str = "transaction_id, customer_id, order_date, total_amount, status, \
     payment_method, channel, store_id, promotion_id, discount_amount";

const ORDER_ITEM_COLUMNS: &str = "order_item_id, transaction_id, product_id, quantity, price";

fn customer_from_row(row: &PgRow) -> Result<Customer, sqlx::Error> {
    Ok(Customer {
        customer_id: row.try_get("customer_id")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        age: row.try_get("age")?,
        gender: row.try_get("gender")?,
        postal_code: row.try_get("postal_code")?,
        email: row.try_get("email")?,
        phone_number: row.try_get("phone_number")?,
        membership_status: row.try_get("membership_status")?,
        join_date: row.try_get("join_date")?,
        last_purchase_date: row.try_get("last_purchase_date")?,
        total_spending: row.try_get("total_spending")?,
        average_order_value: row.try_get("average_order_value")?,
        frequency: row.try_get("frequency")?,
        preferred_category: row.try_get("preferred_category")?,
        churned: row.try_get("churned")?,
    })
}

/// Product columns, optionally prefixed (`p_`) when joined next to an item
fn product_from_row(row: &PgRow, prefix: &str) -> Result<Product, sqlx::Error> {
    let col = |name: &str| format!("{}{}", prefix, name);
    Ok(Product {
        product_id: row.try_get(col("product_id").as_str())?,
        product_name: row.try_get(col("product_name").as_str())?,
        category: row.try_get(col("category").as_str())?,
        price: row.try_get(col("price").as_str())?,
        cost: row.try_get(col("cost").as_str())?,
        description: row.try_get(col("description").as_str())?,
        seasonal: row.try_get(col("seasonal").as_str())?,
        active: row.try_get(col("active").as_str())?,
        introduced_date: row.try_get(col("introduced_date").as_str())?,
        ingredients: row.try_get(col("ingredients").as_str())?,
    })
}

fn order_from_row(row: &PgRow) -> Result<Order, sqlx::Error> {
    Ok(Order {
        transaction_id: row.try_get("transaction_id")?,
        customer_id: row.try_get("customer_id")?,
        order_date: row.try_get("order_date")?,
        total_amount: row.try_get("total_amount")?,
        status: row.try_get("status")?,
        payment_method: row.try_get("payment_method")?,
        channel: row.try_get("channel")?,
        store_id: row.try_get("store_id")?,
        promotion_id: row.try_get("promotion_id")?,
        discount_amount: row.try_get("discount_amount")?,
    })
}

fn order_item_from_row(row: &PgRow) -> Result<OrderItem, sqlx::Error> {
    Ok(OrderItem {
        order_item_id: row.try_get("order_item_id")?,
        transaction_id: row.try_get("transaction_id")?,
        product_id: row.try_get("product_id")?,
        quantity: row.try_get("quantity")?,
        price: row.try_get("price")?,
    })
}

/// Storage over a PostgreSQL connection pool
///
/// The pool is built by the caller from its configuration; this type never
/// reads ambient settings.
#[derive(Clone, Debug)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool against `url`
    pub async fn connect(url: &str, max_connections: u32) -> StorageResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(|e| StorageError::Unavailable {
                backend: BACKEND,
                message: e.to_string(),
            })?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Join customers, items and products onto already loaded orders
    async fn attach(&self, orders: Vec<Order>) -> StorageResult<Vec<OrderAggregate>> {
        if orders.is_empty() {
            return Ok(Vec::new());
        }

        let order_ids: Vec<i32> = orders.iter().map(|o| o.transaction_id).collect();
        let mut customer_ids: Vec<i32> = orders.iter().map(|o| o.customer_id).collect();
        customer_ids.sort_unstable();
        customer_ids.dedup();

        let sql = format!(
            "SELECT {} FROM customers WHERE customer_id = ANY($1)",
            CUSTOMER_COLUMNS
        );
        let customers: HashMap<i32, Customer> = sqlx::query(&sql)
            .bind(&customer_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(classify)?
            .iter()
            .map(customer_from_row)
            .map(|c| c.map(|c| (c.customer_id, c)))
            .collect::<Result<_, _>>()
            .map_err(classify)?;

        let rows = sqlx::query(
            "SELECT i.order_item_id, i.transaction_id, i.product_id, i.quantity, i.price, \
                    p.product_id AS p_product_id, p.product_name AS p_product_name, \
                    p.category AS p_category, p.price AS p_price, p.cost AS p_cost, \
                    p.description AS p_description, p.seasonal AS p_seasonal, \
                    p.active AS p_active, p.introduced_date AS p_introduced_date, \
                    p.ingredients AS p_ingredients \
             FROM order_items i \
             LEFT JOIN products p ON p.product_id = i.product_id \
             WHERE i.transaction_id = ANY($1) \
             ORDER BY i.order_item_id",
        )
        .bind(&order_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(classify)?;

        let mut lines: HashMap<i32, Vec<OrderLine>> = HashMap::new();
        for row in &rows {
            let item = order_item_from_row(row).map_err(classify)?;
            let joined: Option<i32> = row.try_get("p_product_id").map_err(classify)?;
            let product = match joined {
                Some(_) => Some(product_from_row(row, "p_").map_err(classify)?),
                None => None,
            };
            lines
                .entry(item.transaction_id)
                .or_default()
                .push(OrderLine { item, product });
        }

        Ok(orders
            .into_iter()
            .map(|order| OrderAggregate {
                customer: customers.get(&order.customer_id).cloned(),
                lines: lines.remove(&order.transaction_id).unwrap_or_default(),
                order,
            })
            .collect())
    }
}

#[async_trait]
impl ListingStore<Customer> for PostgresStore {
    async fn list(&self) -> StorageResult<Vec<Customer>> {
        let sql = format!(
            "SELECT {} FROM customers ORDER BY first_name, last_name, customer_id",
            CUSTOMER_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(classify)?;
        rows.iter()
            .map(customer_from_row)
            .collect::<Result<_, _>>()
            .map_err(classify)
    }
}

#[async_trait]
impl DataStore<Customer> for PostgresStore {
    async fn get(&self, id: i32) -> StorageResult<Option<Customer>> {
        let sql = format!("SELECT {} FROM customers WHERE customer_id = $1", CUSTOMER_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?;
        row.as_ref()
            .map(customer_from_row)
            .transpose()
            .map_err(classify)
    }

    async fn insert(&self, draft: CustomerDraft) -> StorageResult<Customer> {
        let sql = format!(
            "INSERT INTO customers (first_name, last_name, age, gender, postal_code, email, \
             phone_number, membership_status, join_date, last_purchase_date, total_spending, \
             average_order_value, frequency, preferred_category, churned) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
             RETURNING {}",
            CUSTOMER_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(&draft.first_name)
            .bind(&draft.last_name)
            .bind(draft.age)
            .bind(&draft.gender)
            .bind(&draft.postal_code)
            .bind(&draft.email)
            .bind(&draft.phone_number)
            .bind(draft.membership_status.as_deref().unwrap_or(DEFAULT_MEMBERSHIP))
            .bind(draft.join_date)
            .bind(draft.last_purchase_date)
            .bind(money::normalize(draft.total_spending))
            .bind(draft.average_order_value.map(money::normalize))
            .bind(&draft.frequency)
            .bind(&draft.preferred_category)
            .bind(draft.churned)
            .fetch_one(&self.pool)
            .await
            .map_err(classify)?;
        customer_from_row(&row).map_err(classify)
    }

    async fn replace(&self, id: i32, draft: CustomerDraft) -> StorageResult<()> {
        let result = sqlx::query(
            "UPDATE customers SET first_name = $1, last_name = $2, age = $3, gender = $4, \
             postal_code = $5, email = $6, phone_number = $7, membership_status = $8, \
             join_date = $9, last_purchase_date = $10, total_spending = $11, \
             average_order_value = $12, frequency = $13, preferred_category = $14, \
             churned = $15 \
             WHERE customer_id = $16",
        )
        .bind(&draft.first_name)
        .bind(&draft.last_name)
        .bind(draft.age)
        .bind(&draft.gender)
        .bind(&draft.postal_code)
        .bind(&draft.email)
        .bind(&draft.phone_number)
        .bind(draft.membership_status.as_deref().unwrap_or(DEFAULT_MEMBERSHIP))
        .bind(draft.join_date)
        .bind(draft.last_purchase_date)
        .bind(money::normalize(draft.total_spending))
        .bind(draft.average_order_value.map(money::normalize))
        .bind(&draft.frequency)
        .bind(&draft.preferred_category)
        .bind(draft.churned)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(classify)?;

        if result.rows_affected() == 0 {
            return Err(nothing_updated("customers", id));
        }
        Ok(())
    }

    async fn delete(&self, id: i32) -> StorageResult<()> {
        let result = sqlx::query("DELETE FROM customers WHERE customer_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound {
                entity_type: "customer",
                id,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ListingStore<Product> for PostgresStore {
    async fn list(&self) -> StorageResult<Vec<Product>> {
        let sql = format!(
            "SELECT {} FROM products ORDER BY product_name, product_id",
            PRODUCT_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(classify)?;
        rows.iter()
            .map(|row| product_from_row(row, ""))
            .collect::<Result<_, _>>()
            .map_err(classify)
    }
}

#[async_trait]
impl DataStore<Product> for PostgresStore {
    async fn get(&self, id: i32) -> StorageResult<Option<Product>> {
        let sql = format!("SELECT {} FROM products WHERE product_id = $1", PRODUCT_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?;
        row.as_ref()
            .map(|row| product_from_row(row, ""))
            .transpose()
            .map_err(classify)
    }

    async fn insert(&self, draft: ProductDraft) -> StorageResult<Product> {
        let sql = format!(
            "INSERT INTO products (product_name, category, price, cost, description, seasonal, \
             active, introduced_date, ingredients) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {}",
            PRODUCT_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(&draft.product_name)
            .bind(&draft.category)
            .bind(money::normalize(draft.price))
            .bind(money::normalize(draft.cost))
            .bind(&draft.description)
            .bind(draft.seasonal)
            .bind(draft.active)
            .bind(draft.introduced_date)
            .bind(&draft.ingredients)
            .fetch_one(&self.pool)
            .await
            .map_err(classify)?;
        product_from_row(&row, "").map_err(classify)
    }

    async fn replace(&self, id: i32, draft: ProductDraft) -> StorageResult<()> {
        let result = sqlx::query(
            "UPDATE products SET product_name = $1, category = $2, price = $3, cost = $4, \
             description = $5, seasonal = $6, active = $7, introduced_date = $8, \
             ingredients = $9 \
             WHERE product_id = $10",
        )
        .bind(&draft.product_name)
        .bind(&draft.category)
        .bind(money::normalize(draft.price))
        .bind(money::normalize(draft.cost))
        .bind(&draft.description)
        .bind(draft.seasonal)
        .bind(draft.active)
        .bind(draft.introduced_date)
        .bind(&draft.ingredients)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(classify)?;

        if result.rows_affected() == 0 {
            return Err(nothing_updated("products", id));
        }
        Ok(())
    }

    async fn delete(&self, id: i32) -> StorageResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE product_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound {
                entity_type: "product",
                id,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl DataStore<Order> for PostgresStore {
    async fn get(&self, id: i32) -> StorageResult<Option<Order>> {
        let sql = format!("SELECT {} FROM orders WHERE transaction_id = $1", ORDER_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?;
        row.as_ref()
            .map(order_from_row)
            .transpose()
            .map_err(classify)
    }

    async fn insert(&self, draft: OrderDraft) -> StorageResult<Order> {
        let sql = format!(
            "INSERT INTO orders (customer_id, order_date, total_amount, status, payment_method, \
             channel, store_id, promotion_id, discount_amount) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {}",
            ORDER_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(draft.customer_id)
            .bind(draft.order_date)
            .bind(money::normalize(draft.total_amount))
            .bind(draft.status.as_deref().unwrap_or(OrderStatus::Pending.as_str()))
            .bind(&draft.payment_method)
            .bind(&draft.channel)
            .bind(draft.store_id)
            .bind(draft.promotion_id)
            .bind(draft.discount_amount.map(money::normalize))
            .fetch_one(&self.pool)
            .await
            .map_err(classify)?;
        order_from_row(&row).map_err(classify)
    }

    async fn replace(&self, id: i32, draft: OrderDraft) -> StorageResult<()> {
        let result = sqlx::query(
            "UPDATE orders SET customer_id = $1, order_date = $2, total_amount = $3, \
             status = $4, payment_method = $5, channel = $6, store_id = $7, \
             promotion_id = $8, discount_amount = $9 \
             WHERE transaction_id = $10",
        )
        .bind(draft.customer_id)
        .bind(draft.order_date)
        .bind(money::normalize(draft.total_amount))
        .bind(draft.status.as_deref().unwrap_or(OrderStatus::Pending.as_str()))
        .bind(&draft.payment_method)
        .bind(&draft.channel)
        .bind(draft.store_id)
        .bind(draft.promotion_id)
        .bind(draft.discount_amount.map(money::normalize))
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(classify)?;

        if result.rows_affected() == 0 {
            return Err(nothing_updated("orders", id));
        }
        Ok(())
    }

    async fn delete(&self, id: i32) -> StorageResult<()> {
        let result = sqlx::query("DELETE FROM orders WHERE transaction_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound {
                entity_type: "order",
                id,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl OrderStore for PostgresStore {
    async fn set_status(&self, id: i32, status: &str) -> StorageResult<bool> {
        let result = sqlx::query("UPDATE orders SET status = $1 WHERE transaction_id = $2")
            .bind(status)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_aggregates(&self, limit: usize) -> StorageResult<Vec<OrderAggregate>> {
        let sql = format!(
            "SELECT {} FROM orders ORDER BY order_date, transaction_id LIMIT $1",
            ORDER_COLUMNS
        );
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let orders = sqlx::query(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(classify)?
            .iter()
            .map(order_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(classify)?;
        self.attach(orders).await
    }

    async fn get_aggregate(&self, id: i32) -> StorageResult<Option<OrderAggregate>> {
        match DataStore::<Order>::get(self, id).await? {
            Some(order) => Ok(self.attach(vec![order]).await?.pop()),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl ListingStore<OrderItem> for PostgresStore {
    async fn list(&self) -> StorageResult<Vec<OrderItem>> {
        let sql = format!(
            "SELECT {} FROM order_items ORDER BY order_item_id",
            ORDER_ITEM_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(classify)?;
        rows.iter()
            .map(order_item_from_row)
            .collect::<Result<_, _>>()
            .map_err(classify)
    }
}

#[async_trait]
impl DataStore<OrderItem> for PostgresStore {
    async fn get(&self, id: i32) -> StorageResult<Option<OrderItem>> {
        let sql = format!(
            "SELECT {} FROM order_items WHERE order_item_id = $1",
            ORDER_ITEM_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?;
        row.as_ref()
            .map(order_item_from_row)
            .transpose()
            .map_err(classify)
    }

    async fn insert(&self, draft: OrderItemDraft) -> StorageResult<OrderItem> {
        let sql = format!(
            "INSERT INTO order_items (transaction_id, product_id, quantity, price) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {}",
            ORDER_ITEM_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(draft.transaction_id)
            .bind(draft.product_id)
            .bind(draft.quantity)
            .bind(money::normalize(draft.price))
            .fetch_one(&self.pool)
            .await
            .map_err(classify)?;
        order_item_from_row(&row).map_err(classify)
    }

    async fn replace(&self, id: i32, draft: OrderItemDraft) -> StorageResult<()> {
        let result = sqlx::query(
            "UPDATE order_items SET transaction_id = $1, product_id = $2, quantity = $3, \
             price = $4 \
             WHERE order_item_id = $5",
        )
        .bind(draft.transaction_id)
        .bind(draft.product_id)
        .bind(draft.quantity)
        .bind(money::normalize(draft.price))
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(classify)?;

        if result.rows_affected() == 0 {
            return Err(nothing_updated("order_items", id));
        }
        Ok(())
    }

    async fn delete(&self, id: i32) -> StorageResult<()> {
        let result = sqlx::query("DELETE FROM order_items WHERE order_item_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound {
                entity_type: "order item",
                id,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_errors_are_unavailable() {
        assert!(matches!(
            classify(sqlx::Error::PoolTimedOut),
            StorageError::Unavailable { backend: "postgres", .. }
        ));
        assert!(matches!(
            classify(sqlx::Error::PoolClosed),
            StorageError::Unavailable { .. }
        ));
    }

    #[test]
    fn test_missing_row_is_query_error() {
        assert!(matches!(
            classify(sqlx::Error::RowNotFound),
            StorageError::Query { .. }
        ));
    }

    #[test]
    fn test_schema_creates_tables_in_dependency_order() {
        let tables: Vec<&str> = SCHEMA
            .iter()
            .filter_map(|s| s.split("CREATE TABLE IF NOT EXISTS ").nth(1))
            .filter_map(|rest| rest.split_whitespace().next())
            .collect();
        assert_eq!(tables, vec!["customers", "products", "orders", "order_items"]);
    }
}
