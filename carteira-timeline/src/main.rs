use std::net::SocketAddr;
use std::sync::Arc;

use carteira_core::config::CoreConfig;
use carteira_core::errors::CarteiraError;
use carteira_core::logging;
use carteira_timeline::auth::JwtIdentityResolver;
use carteira_timeline::repository::PostgresStore;
use carteira_timeline::{app, AppState};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    if let Err(err) = logging::init_tracing(None) {
        eprintln!("⚠️ failed to initialise tracing: {err}");
    }

    let config = load_timeline_config()?;
    let bind_addr: SocketAddr = config
        .http_bind
        .clone()
        .unwrap_or_else(|| "0.0.0.0:8084".to_string())
        .parse()?;

    let secret = config
        .jwt_secret
        .clone()
        .ok_or_else(|| CarteiraError::ConfigError("CARTEIRA_JWT_SECRET ausente".into()))?;

    let store = PostgresStore::from_config(&config).await?;
    let state = AppState {
        store: Arc::new(store),
        resolver: Arc::new(JwtIdentityResolver::new(&secret)),
    };

    let listener = TcpListener::bind(bind_addr).await?;
    let actual_addr = listener.local_addr()?;
    info!(%actual_addr, "starting carteira-timeline service");
    axum::serve(listener, app(state).into_make_service()).await?;

    Ok(())
}

fn load_timeline_config() -> Result<CoreConfig, CarteiraError> {
    CoreConfig::from_env_with_prefix("TIMELINE_")
        .or_else(|_| CoreConfig::from_env())
        .map_err(Into::into)
}

#[derive(Debug, thiserror::Error)]
enum ServerError {
    #[error("failed to bind timeline service: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid bind address: {0}")]
    Addr(#[from] std::net::AddrParseError),
    #[error("configuration error: {0}")]
    Config(#[from] CarteiraError),
}
