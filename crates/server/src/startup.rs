use std::sync::Arc;

use axum::Router;
use configs::AppConfig;
use sea_orm::DatabaseConnection;
use service::auth::repo::seaorm::SeaOrmStore;
use service::auth::repository::{AppRegistry, CredentialStore};
use service::auth::{AuthConfig, AuthService, DynAuthService};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::routes::{self, auth::ServerState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Wire the auth service to the database-backed stores.
pub fn build_state(db: DatabaseConnection, cfg: &AppConfig) -> ServerState {
    let store = Arc::new(SeaOrmStore::new(db));
    let users: Arc<dyn CredentialStore> = store.clone();
    let apps: Arc<dyn AppRegistry> = store;
    let auth: DynAuthService = AuthService::new(users, apps, AuthConfig { token_ttl: cfg.auth.token_ttl() });
    ServerState { auth: Arc::new(auth) }
}

pub fn build_app(state: ServerState, cfg: &AppConfig) -> Router {
    routes::build_router(state, build_cors(), cfg.server.request_timeout())
}

/// Public entry: connect storage, build the app and serve until a shutdown signal
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let db = models::db::connect_with_config(&cfg.database).await?;
    let app = build_app(build_state(db, &cfg), &cfg);

    let listener = TcpListener::bind((cfg.server.host.as_str(), cfg.server.port)).await?;
    let addr = listener.local_addr()?;
    info!(%addr, env = %cfg.env, token_ttl_secs = cfg.auth.token_ttl_secs, "server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("application stopped");
    Ok(())
}

/// Resolve on SIGINT or SIGTERM; in-flight requests are drained afterwards.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!(signal = "SIGINT", "stopping application"),
        _ = terminate => info!(signal = "SIGTERM", "stopping application"),
    }
}
