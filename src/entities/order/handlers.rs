//! Order HTTP handlers

use super::aggregate::OrderView;
use super::manager::OrderManager;
use super::model::{Order, OrderDraft};
use crate::core::error::BakeryResult;
use crate::core::validation::Validated;
use crate::entities::crud::{created, parse_id};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Json, Response},
};

pub async fn list_orders(
    State(manager): State<OrderManager>,
) -> BakeryResult<Json<Vec<OrderView>>> {
    manager.list().await.map(Json)
}

pub async fn get_order(
    State(manager): State<OrderManager>,
    Path(id): Path<String>,
) -> BakeryResult<Json<OrderView>> {
    let id = parse_id(&id)?;
    manager.get(id).await.map(Json)
}

pub async fn create_order(
    State(manager): State<OrderManager>,
    Validated(draft): Validated<OrderDraft>,
) -> BakeryResult<Response> {
    let order = manager.create(draft).await?;
    Ok(created(order))
}

pub async fn update_order(
    State(manager): State<OrderManager>,
    Path(id): Path<String>,
    Validated(draft): Validated<OrderDraft>,
) -> BakeryResult<Json<Order>> {
    let id = parse_id(&id)?;
    manager.update(id, draft).await.map(Json)
}

pub async fn delete_order(
    State(manager): State<OrderManager>,
    Path(id): Path<String>,
) -> BakeryResult<StatusCode> {
    let id = parse_id(&id)?;
    manager.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn complete_order(
    State(manager): State<OrderManager>,
    Path(id): Path<String>,
) -> BakeryResult<Json<Order>> {
    let id = parse_id(&id)?;
    manager.complete(id).await.map(Json)
}

pub async fn cancel_order(
    State(manager): State<OrderManager>,
    Path(id): Path<String>,
) -> BakeryResult<Json<Order>> {
    let id = parse_id(&id)?;
    manager.cancel(id).await.map(Json)
}
