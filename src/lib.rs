pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::error::AppError;
use crate::store::DocumentStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// `None` when no usable store settings were supplied. Handlers that need
    /// the store go through [`AppState::store`].
    pub store: Option<Arc<dyn DocumentStore>>,
}

impl AppState {
    pub fn new(config: Config, store: Option<Arc<dyn DocumentStore>>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }

    pub fn store(&self) -> Result<&dyn DocumentStore, AppError> {
        self.store.as_deref().ok_or(AppError::StoreUnavailable)
    }
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Unified Product Lifecycle & Service Management API"),
    paths(
        routes::meta::root,
        routes::meta::test_database,
        routes::meta::schema_overview,
        routes::products::create_product,
        routes::products::list_products,
        routes::service_requests::create_service_request,
        routes::service_centers::list_service_centers,
    ),
    components(schemas(
        models::user::User,
        models::product::Product,
        models::service_center::ServiceCenter,
        models::service_request::ServiceRequest,
        models::warranty::Warranty,
        models::CollectionSchema,
        models::FieldError,
        error::ApiError,
        error::ValidationErrorBody,
        routes::products::ProductCreated,
        routes::service_requests::ServiceRequestCreated,
        routes::meta::RootMessage,
        routes::meta::HealthReport,
        routes::meta::SchemaOverview,
    )),
    tags(
        (name = "Products", description = "Product vault with derived warranty end"),
        (name = "Service Requests", description = "Repair and service requests"),
        (name = "Service Centers", description = "Authorized service center directory"),
        (name = "Meta", description = "Liveness, connectivity and schema introspection")
    )
)]
struct ApiDoc;

/// Full application: API routes, Swagger UI, CORS and request tracing.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);
    routes::api_router(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(cors_origins: &str) -> CorsLayer {
    if cors_origins.trim().is_empty() || cors_origins == "*" {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = cors_origins
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_credentials(true)
}
