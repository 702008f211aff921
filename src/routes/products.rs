use axum::{
    extract::{rejection::JsonRejection, Query, State},
    routing::post,
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use super::{non_empty, LIST_LIMIT};
use crate::error::{ApiError, AppError, ValidationErrorBody};
use crate::models::product::Product;
use crate::models::warranty::warranty_end_from_stored;
use crate::models::Entity;
use crate::store::{Document, Filter, StoreError};
use crate::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductCreated {
    pub id: String,
    /// Derived from the submitted purchase date and warranty length
    pub warranty_end: Option<NaiveDate>,
    pub message: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    /// Exact owner match
    pub user_id: Option<String>,
    /// Exact, case-sensitive brand match
    pub brand: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/products", post(create_product).get(list_products))
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body = Product,
    responses(
        (status = 200, description = "Product stored", body = ProductCreated),
        (status = 400, description = "Malformed JSON body", body = ApiError),
        (status = 422, description = "Payload failed validation", body = ValidationErrorBody),
        (status = 503, description = "Database not available", body = ApiError),
    ),
    tag = "Products"
)]
pub(crate) async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<Document>, JsonRejection>,
) -> Result<Json<ProductCreated>, AppError> {
    let Json(payload) = payload?;
    let product = Product::validate(&payload)?;
    let store = state.store()?;

    let document = product.to_document().map_err(StoreError::from)?;
    let id = store.insert_one(Product::COLLECTION, document).await?;
    tracing::info!(product_id = %id, user_id = %product.user_id, "Product added");

    Ok(Json(ProductCreated {
        id,
        warranty_end: product.warranty_end(),
        message: "Product added successfully".to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(ProductQuery),
    responses(
        (
            status = 200,
            description = "Up to 100 products in insertion order, with `id` and `warranty_end`",
            body = Vec<Product>
        ),
        (status = 503, description = "Database not available", body = ApiError),
    ),
    tag = "Products"
)]
pub(crate) async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Vec<Document>>, AppError> {
    let mut filter = Filter::new();
    if let Some(user_id) = non_empty(query.user_id) {
        filter = filter.equals("user_id", user_id);
    }
    if let Some(brand) = non_empty(query.brand) {
        filter = filter.equals("brand", brand);
    }

    let docs = state
        .store()?
        .find_many(Product::COLLECTION, &filter, LIST_LIMIT)
        .await?;

    let products = docs
        .into_iter()
        .map(|doc| {
            let warranty_end = warranty_end_from_stored(
                doc.body.get("purchase_date"),
                doc.body.get("warranty_months"),
            );
            let mut body = doc.into_body_with_id();
            body.insert(
                "warranty_end".to_string(),
                warranty_end.map_or(Value::Null, |d| Value::String(d.to_string())),
            );
            body
        })
        .collect();

    Ok(Json(products))
}
