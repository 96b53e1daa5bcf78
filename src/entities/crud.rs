//! HTTP handlers shared by every plain CRUD resource
//!
//! Handlers are generic over the record type and take the resource's
//! [`ResourceManager`] as router state.

use crate::core::error::{BakeryResult, RequestError};
use crate::core::manager::ResourceManager;
use crate::core::service::Record;
use crate::core::validation::Validated;
use axum::{
    Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Json, Response},
    routing::get,
};

/// Parse an integer path id
pub fn parse_id(raw: &str) -> BakeryResult<i32> {
    raw.trim().parse::<i32>().map_err(|_| {
        RequestError::InvalidEntityId {
            id: raw.to_string(),
        }
        .into()
    })
}

/// 201 with the stored record and its location
pub fn created<R: Record>(record: R) -> Response {
    let location = format!("/{}/{}", R::PLURAL, record.id());
    (
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(record),
    )
        .into_response()
}

pub async fn list_records<R: Record>(
    State(manager): State<ResourceManager<R>>,
) -> BakeryResult<Json<Vec<R>>> {
    manager.list().await.map(Json)
}

pub async fn get_record<R: Record>(
    State(manager): State<ResourceManager<R>>,
    Path(id): Path<String>,
) -> BakeryResult<Json<R>> {
    let id = parse_id(&id)?;
    manager.get(id).await.map(Json)
}

pub async fn create_record<R: Record>(
    State(manager): State<ResourceManager<R>>,
    Validated(draft): Validated<R::Draft>,
) -> BakeryResult<Response> {
    let record = manager.create(draft).await?;
    Ok(created(record))
}

pub async fn update_record<R: Record>(
    State(manager): State<ResourceManager<R>>,
    Path(id): Path<String>,
    Validated(draft): Validated<R::Draft>,
) -> BakeryResult<Json<R>> {
    let id = parse_id(&id)?;
    manager.update(id, draft).await.map(Json)
}

pub async fn delete_record<R: Record>(
    State(manager): State<ResourceManager<R>>,
    Path(id): Path<String>,
) -> BakeryResult<StatusCode> {
    let id = parse_id(&id)?;
    manager.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Routes for `/{plural}` and `/{plural}/{id}`
///
/// `with_delete` adds `DELETE /{plural}/{id}` for resources that expose it.
pub fn routes<R: Record>(manager: ResourceManager<R>, with_delete: bool) -> Router {
    let item = get(get_record::<R>).put(update_record::<R>);
    let item = if with_delete {
        item.delete(delete_record::<R>)
    } else {
        item
    };

    Router::new()
        .route(
            &format!("/{}", R::PLURAL),
            get(list_records::<R>).post(create_record::<R>),
        )
        .route(&format!("/{}/{{id}}", R::PLURAL), item)
        .with_state(manager)
}
