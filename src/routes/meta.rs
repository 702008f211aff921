use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{self, CollectionSchema};
use crate::AppState;

const MAX_ERROR_CHARS: usize = 80;
const MAX_COLLECTIONS: usize = 10;

#[derive(Debug, Serialize, ToSchema)]
pub struct RootMessage {
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthReport {
    pub backend: String,
    pub database: String,
    pub database_url: String,
    pub database_name: String,
    pub connection_status: String,
    pub collections: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SchemaOverview {
    pub collections: Vec<CollectionSchema>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/test", get(test_database))
        .route("/schema", get(schema_overview))
}

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Process is up", body = RootMessage)),
    tag = "Meta"
)]
pub(crate) async fn root() -> Json<RootMessage> {
    Json(RootMessage {
        message: "Unified Service Platform Backend Running".to_string(),
    })
}

/// Never fails: store problems are reported in the body.
#[utoipa::path(
    get,
    path = "/test",
    responses(
        (status = 200, description = "Backend and database connectivity", body = HealthReport)
    ),
    tag = "Meta"
)]
pub(crate) async fn test_database(State(state): State<AppState>) -> Json<HealthReport> {
    let mut report = HealthReport {
        backend: "✅ Running".to_string(),
        database: "❌ Not Available".to_string(),
        database_url: set_or_not(&state.config.database_url),
        database_name: set_or_not(&state.config.database_name),
        connection_status: "Not Connected".to_string(),
        collections: Vec::new(),
    };

    if let Some(store) = state.store.as_deref() {
        report.database = "✅ Available".to_string();
        report.connection_status = "Connected".to_string();
        match store.list_collection_names().await {
            Ok(mut names) => {
                names.truncate(MAX_COLLECTIONS);
                report.collections = names;
                report.database = "✅ Connected & Working".to_string();
            }
            Err(e) => {
                tracing::warn!(error = %e, "Connectivity check failed");
                report.database =
                    format!("⚠️ Connected but Error: {}", truncate(&e.to_string()));
            }
        }
    }

    Json(report)
}

#[utoipa::path(
    get,
    path = "/schema",
    responses(
        (status = 200, description = "Field names and types per collection", body = SchemaOverview)
    ),
    tag = "Meta"
)]
pub(crate) async fn schema_overview() -> Json<SchemaOverview> {
    Json(SchemaOverview {
        collections: models::collection_schemas(),
    })
}

fn set_or_not(value: &Option<String>) -> String {
    let label = if value.is_some() { "✅ Set" } else { "❌ Not Set" };
    label.to_string()
}

fn truncate(msg: &str) -> String {
    msg.chars().take(MAX_ERROR_CHARS).collect()
}
