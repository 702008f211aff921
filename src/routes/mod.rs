pub mod meta;
pub mod products;
pub mod service_centers;
pub mod service_requests;

use axum::Router;

use crate::AppState;

/// Upper bound on documents returned by any listing endpoint.
pub const LIST_LIMIT: usize = 100;

pub fn api_router(state: AppState) -> Router {
    Router::new()
        .merge(meta::router())
        .merge(products::router())
        .merge(service_requests::router())
        .merge(service_centers::router())
        .with_state(state)
}

/// Treats `?field=` the same as an absent query parameter.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
