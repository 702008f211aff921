use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{ApiError, AppError, ValidationErrorBody};
use crate::models::service_request::{ServiceRequest, SERVER_MANAGED_FIELDS};
use crate::models::Entity;
use crate::store::{Document, StoreError};
use crate::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceRequestCreated {
    pub id: String,
    pub message: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/service-requests", post(create_service_request))
}

#[utoipa::path(
    post,
    path = "/api/service-requests",
    request_body = ServiceRequest,
    responses(
        (
            status = 200,
            description = "Service request created as pending",
            body = ServiceRequestCreated
        ),
        (status = 400, description = "Malformed JSON body", body = ApiError),
        (status = 422, description = "Payload failed validation", body = ValidationErrorBody),
        (status = 503, description = "Database not available", body = ApiError),
    ),
    tag = "Service Requests"
)]
pub(crate) async fn create_service_request(
    State(state): State<AppState>,
    payload: Result<Json<Document>, JsonRejection>,
) -> Result<Json<ServiceRequestCreated>, AppError> {
    let Json(mut payload) = payload?;
    // Status and assignment start out server-side defaults.
    for field in SERVER_MANAGED_FIELDS {
        payload.remove(*field);
    }

    let request = ServiceRequest::validate(&payload)?;
    let store = state.store()?;

    let document = request.to_document().map_err(StoreError::from)?;
    let id = store.insert_one(ServiceRequest::COLLECTION, document).await?;
    tracing::info!(
        request_id = %id,
        product_id = %request.product_id,
        "Service request created"
    );

    Ok(Json(ServiceRequestCreated {
        id,
        message: "Service request created".to_string(),
    }))
}
