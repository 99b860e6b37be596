//! Item HTTP Routes
//!
//! CRUD endpoints over the item collection, nested under `/api`:
//!
//! | Method | Path         | Success                          |
//! |--------|--------------|----------------------------------|
//! | POST   | `/items`     | 201 + created item               |
//! | GET    | `/items`     | 200 + array of items             |
//! | GET    | `/items/:id` | 200 + item                       |
//! | PUT    | `/items/:id` | 200 + updated item               |
//! | DELETE | `/items/:id` | 200 + `{"message": ...}`         |
//!
//! Unknown or malformed ids answer 404 `{"error":"Item not found"}`.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use super::errors::{ApiError, ApiResult};
use crate::model::{Item, ItemFields, ItemPatch};
use crate::repository::{ItemRepository, Lookup};

/// Message returned by a successful delete
pub const DELETED_MESSAGE: &str = "Item deleted successfully";

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Create item routes backed by `repository`
pub fn item_routes<R: ItemRepository>(repository: Arc<R>) -> Router {
    Router::new()
        .route("/items", get(list_items::<R>).post(create_item::<R>))
        .route(
            "/items/:id",
            get(get_item::<R>)
                .put(update_item::<R>)
                .delete(delete_item::<R>),
        )
        .with_state(repository)
}

fn found<T>(lookup: Lookup<T>) -> ApiResult<T> {
    match lookup {
        Lookup::Found(value) => Ok(value),
        Lookup::NotFound => Err(ApiError::ItemNotFound),
    }
}

async fn create_item<R: ItemRepository>(
    State(repository): State<Arc<R>>,
    payload: Result<Json<ItemFields>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Item>)> {
    let Json(fields) = payload?;
    let item = repository.insert(fields).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn list_items<R: ItemRepository>(
    State(repository): State<Arc<R>>,
) -> ApiResult<Json<Vec<Item>>> {
    let items = repository.list_all().await?;
    Ok(Json(items))
}

async fn get_item<R: ItemRepository>(
    State(repository): State<Arc<R>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Item>> {
    let item = found(repository.get_by_id(&id).await?)?;
    Ok(Json(item))
}

async fn update_item<R: ItemRepository>(
    State(repository): State<Arc<R>>,
    Path(id): Path<String>,
    payload: Result<Json<ItemPatch>, JsonRejection>,
) -> ApiResult<Json<Item>> {
    let Json(patch) = payload?;
    let item = found(repository.update_by_id(&id, patch).await?)?;
    Ok(Json(item))
}

async fn delete_item<R: ItemRepository>(
    State(repository): State<Arc<R>>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    found(repository.delete_by_id(&id).await?)?;
    Ok(Json(MessageResponse {
        message: DELETED_MESSAGE.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryItemRepository;

    #[test]
    fn test_router_builds() {
        let _router = item_routes(Arc::new(MemoryItemRepository::new()));
    }

    #[test]
    fn test_found_maps_not_found() {
        assert!(matches!(
            found::<()>(Lookup::NotFound),
            Err(ApiError::ItemNotFound)
        ));
        assert_eq!(found(Lookup::Found(1)).unwrap(), 1);
    }
}
