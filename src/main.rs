use interpreter_booking::{AppState, config::Config, create_router};
use sqlx::mysql::MySqlPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logging: livello da RUST_LOG, default info
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Inizializza la configurazione
    let config = Config::from_env()?;
    config.print_info();

    // Pool di connessioni condiviso da tutti i repository
    let pool = MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .max_lifetime(Duration::from_secs(config.connection_lifetime_secs))
        .connect(&config.database_url)
        .await?;
    info!("Connected to database");

    let state = Arc::new(AppState::new(pool, &config)?);

    // Crea il router
    let app = create_router(state).layer(CorsLayer::permissive());

    // Definisci l'indirizzo
    let addr: SocketAddr = format!("{}:{}", config.server_host, config.server_port).parse()?;
    info!("Server listening on http://{}", addr);

    // Crea il listener TCP
    let listener = TcpListener::bind(addr).await?;

    // Avvia il server
    axum::serve(listener, app).await?;

    Ok(())
}
