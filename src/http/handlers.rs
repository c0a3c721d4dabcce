//! Demo catalog API handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::catalog::{Catalog, CatalogError, Item, NewItem, Quote};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Catalog,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct QuoteParams {
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = match self {
            CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
            CatalogError::Invalid(_) | CatalogError::PriceOverflow(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
        };
        (status, self.to_string()).into_response()
    }
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn list_items(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Item>>, CatalogError> {
    state.catalog.list(params.limit).await.map(Json)
}

pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Item>, CatalogError> {
    state.catalog.get(id).await.map(Json)
}

pub async fn create_item(
    State(state): State<AppState>,
    Json(new): Json<NewItem>,
) -> Result<(StatusCode, Json<Item>), CatalogError> {
    let item = state.catalog.create(new).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn quote_item(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Query(params): Query<QuoteParams>,
) -> Result<Json<Quote>, CatalogError> {
    state.catalog.quote(id, params.quantity).await.map(Json)
}
