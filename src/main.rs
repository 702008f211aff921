use servicehub_server::{app, config::Config, store, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("servicehub_server=debug,tower_http=debug")),
        )
        .init();

    let config = Config::from_env();
    let store = store::open(&config).await;
    let listen_addr = config.listen_addr.clone();
    let state = AppState::new(config, store);

    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    tracing::info!("Listening on {}", listen_addr);
    tracing::info!("Swagger UI at http://{}/docs/", listen_addr);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
