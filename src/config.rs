#[derive(Debug, Clone)]
pub struct Config {
    /// Document store connection URL. `memory://` selects the in-process store.
    pub database_url: Option<String>,
    /// Database to use on the server named by `database_url`.
    pub database_name: Option<String>,
    pub listen_addr: String,
    /// Comma-separated allowed CORS origins. If empty or "*", allows all origins (dev mode).
    pub cors_origins: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let port = var("PORT").unwrap_or_else(|| "8000".to_string());
        Self {
            database_url: var("DATABASE_URL"),
            database_name: var("DATABASE_NAME"),
            listen_addr: var("LISTEN_ADDR").unwrap_or_else(|| format!("0.0.0.0:{port}")),
            cors_origins: var("CORS_ORIGINS").unwrap_or_else(|| "*".to_string()),
        }
    }
}

fn var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
