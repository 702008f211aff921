use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::types::Json;
use sqlx::PgPool;
use tokio::sync::OnceCell;
use uuid::Uuid;

use super::{Document, DocumentStore, Filter, StoreError, StoredDocument};

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Document collections kept in a single JSONB table, one row per document.
#[derive(Debug)]
pub struct PgDocumentStore {
    pool: PgPool,
    /// Set once migrations have run; a failed attempt leaves it empty.
    schema_ready: OnceCell<()>,
}

impl PgDocumentStore {
    /// Builds a pool without connecting; the first query opens the connection.
    pub fn connect_lazy(url: &str, database: &str) -> Result<Self, StoreError> {
        let options = PgConnectOptions::from_str(url)?.database(database);
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_lazy_with(options);
        Ok(Self {
            pool,
            schema_ready: OnceCell::new(),
        })
    }

    /// Runs the embedded migrations unless an earlier call already succeeded.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        self.schema_ready
            .get_or_try_init(|| async {
                sqlx::migrate!("./src/db/migrations").run(&self.pool).await?;
                tracing::info!("Document store migrations applied");
                Ok::<_, StoreError>(())
            })
            .await?;
        Ok(())
    }

    pub fn is_schema_ready(&self) -> bool {
        self.schema_ready.initialized()
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert_one(
        &self,
        collection: &str,
        document: Document,
    ) -> Result<String, StoreError> {
        self.ensure_schema().await?;
        let id = Uuid::new_v4();
        sqlx::query("INSERT INTO documents (id, collection, body) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(collection)
            .bind(Json(document))
            .execute(&self.pool)
            .await?;
        Ok(id.to_string())
    }

    async fn find_many(
        &self,
        collection: &str,
        filter: &Filter,
        limit: usize,
    ) -> Result<Vec<StoredDocument>, StoreError> {
        self.ensure_schema().await?;
        let rows = sqlx::query_as::<_, (Uuid, Json<serde_json::Value>)>(
            "SELECT id, body FROM documents
             WHERE collection = $1 AND body @> $2
             ORDER BY seq
             LIMIT $3",
        )
        .bind(collection)
        .bind(Json(filter.to_containment()))
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(id, Json(body))| match body {
                serde_json::Value::Object(body) => Ok(StoredDocument {
                    id: id.to_string(),
                    body,
                }),
                _ => Err(StoreError::Malformed(collection.to_string())),
            })
            .collect()
    }

    async fn list_collection_names(&self) -> Result<Vec<String>, StoreError> {
        self.ensure_schema().await?;
        let names = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT collection FROM documents ORDER BY collection",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(names)
    }
}
