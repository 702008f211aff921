mod memory;
mod postgres;

pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::config::Config;

/// A schema-free record as it is written to and read from a collection.
pub type Document = Map<String, Value>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("document in `{0}` is not a JSON object")]
    Malformed(String),
    #[error("in-memory store lock poisoned")]
    Poisoned,
}

/// Persistence backend addressed by collection name.
///
/// Identifiers are assigned by the store and never read from the document body.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Stores `document` and returns its generated identifier.
    async fn insert_one(&self, collection: &str, document: Document) -> Result<String, StoreError>;

    /// Returns up to `limit` documents matching `filter`, in insertion order.
    async fn find_many(
        &self,
        collection: &str,
        filter: &Filter,
        limit: usize,
    ) -> Result<Vec<StoredDocument>, StoreError>;

    async fn list_collection_names(&self) -> Result<Vec<String>, StoreError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub body: Document,
}

impl StoredDocument {
    /// Body with the store identifier exposed as a leading `id` field.
    pub fn into_body_with_id(self) -> Document {
        let mut out = Document::with_capacity(self.body.len() + 1);
        out.insert("id".to_string(), Value::String(self.id));
        for (key, value) in self.body {
            if key != "id" && key != "_id" {
                out.insert(key, value);
            }
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Clause {
    /// Field value equals `value` exactly.
    Equals { field: String, value: Value },
    /// Field is an array containing `value`.
    Contains { field: String, value: Value },
}

/// Conjunction of equality and membership predicates over top-level fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<Clause>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn equals(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push(Clause::Equals {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn contains(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push(Clause::Contains {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn matches(&self, document: &Document) -> bool {
        self.clauses.iter().all(|clause| match clause {
            Clause::Equals { field, value } => document.get(field) == Some(value),
            Clause::Contains { field, value } => document
                .get(field)
                .and_then(Value::as_array)
                .is_some_and(|items| items.contains(value)),
        })
    }

    /// JSONB containment pattern equivalent to this filter (`body @> pattern`).
    ///
    /// Scalars in JSONB containment only match by equality, and an array
    /// pattern matches any superset array, so both clause kinds map directly.
    pub fn to_containment(&self) -> Value {
        let mut pattern = Map::new();
        for clause in &self.clauses {
            match clause {
                Clause::Equals { field, value } => {
                    pattern.insert(field.clone(), value.clone());
                }
                Clause::Contains { field, value } => {
                    let entry = pattern
                        .entry(field.clone())
                        .or_insert_with(|| Value::Array(Vec::new()));
                    if let Value::Array(items) = entry {
                        items.push(value.clone());
                    }
                }
            }
        }
        Value::Object(pattern)
    }
}

/// Opens the store named by the configuration.
///
/// Returns `None` instead of failing when settings are missing or unusable so
/// the server still starts and reports the problem per request.
pub async fn open(config: &Config) -> Option<Arc<dyn DocumentStore>> {
    let Some(url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set; document store unavailable");
        return None;
    };

    if url.starts_with("memory://") {
        tracing::info!("Using in-memory document store");
        return Some(Arc::new(MemoryDocumentStore::default()));
    }

    let Some(name) = config.database_name.as_deref() else {
        tracing::warn!("DATABASE_NAME not set; document store unavailable");
        return None;
    };

    let store = match PgDocumentStore::connect_lazy(url, name) {
        Ok(store) => store,
        Err(e) => {
            tracing::warn!(error = %e, "Invalid DATABASE_URL; document store unavailable");
            return None;
        }
    };

    if let Err(e) = store.ensure_schema().await {
        tracing::warn!(error = %e, "Failed to run migrations; retrying on first use");
    }

    tracing::info!(database = name, "Document store configured");
    Some(Arc::new(store))
}
