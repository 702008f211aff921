use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

use super::{non_empty, LIST_LIMIT};
use crate::error::{ApiError, AppError};
use crate::models::service_center::ServiceCenter;
use crate::models::Entity;
use crate::store::{Document, Filter};
use crate::AppState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ServiceCenterQuery {
    /// Exact city match
    pub city: Option<String>,
    /// Centers whose `brands` include this brand
    pub brand: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/service-centers", get(list_service_centers))
}

#[utoipa::path(
    get,
    path = "/api/service-centers",
    params(ServiceCenterQuery),
    responses(
        (
            status = 200,
            description = "Up to 100 service centers in insertion order, each with `id`",
            body = Vec<ServiceCenter>
        ),
        (status = 503, description = "Database not available", body = ApiError),
    ),
    tag = "Service Centers"
)]
pub(crate) async fn list_service_centers(
    State(state): State<AppState>,
    Query(query): Query<ServiceCenterQuery>,
) -> Result<Json<Vec<Document>>, AppError> {
    let mut filter = Filter::new();
    if let Some(city) = non_empty(query.city) {
        filter = filter.equals("city", city);
    }
    if let Some(brand) = non_empty(query.brand) {
        filter = filter.contains("brands", brand);
    }

    let centers = state
        .store()?
        .find_many(ServiceCenter::COLLECTION, &filter, LIST_LIMIT)
        .await?
        .into_iter()
        .map(|doc| doc.into_body_with_id())
        .collect();

    Ok(Json(centers))
}
