use std::sync::Arc;

use axum::Router;
use common::env::ensure_store_dir;
use configs::{AppConfig, ServiceKind};
use migration::{BookMigrator, MigratorTrait, ReviewMigrator, UserMigrator};
use service::{consistency::HttpBookRegistry, review_feed::HttpReviewFeed};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes;
use crate::state::{BookRegistryState, ReviewLedgerState, UserDirectoryState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Open the service's own store, bring its schema up to date and assemble
/// its router.
pub async fn build_app(kind: ServiceKind, cfg: &AppConfig) -> anyhow::Result<Router> {
    ensure_store_dir(&cfg.database.url).await?;
    let db = models::db::connect_with_config(&cfg.database).await?;
    let legacy = cfg.api.legacy_update_routes;

    let app = match kind {
        ServiceKind::BookRegistry => {
            BookMigrator::up(&db, None).await?;
            let state = BookRegistryState {
                db,
                existence: Arc::new(HttpBookRegistry::from_config(&cfg.book_registry)?),
                reviews: Arc::new(HttpReviewFeed::from_config(&cfg.review_ledger)?),
            };
            routes::book_registry_router(state, build_cors(), legacy)
        }
        ServiceKind::ReviewLedger => {
            ReviewMigrator::up(&db, None).await?;
            let state = ReviewLedgerState {
                db,
                existence: Arc::new(HttpBookRegistry::from_config(&cfg.book_registry)?),
            };
            routes::review_ledger_router(state, build_cors(), legacy)
        }
        ServiceKind::UserDirectory => {
            UserMigrator::up(&db, None).await?;
            routes::user_directory_router(UserDirectoryState { db }, build_cors())
        }
    };
    info!(
        service = kind.name(),
        event = "app_ready",
        book_registry = %cfg.book_registry.base_url,
        legacy_update_routes = legacy,
        "router assembled"
    );
    Ok(app)
}

async fn shutdown_signal(kind: ServiceKind) {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!(service = kind.name(), event = "shutdown_signal", "received Ctrl+C, draining connections");
    }
}

/// Build the app from an already loaded configuration and serve until Ctrl+C.
pub async fn run(kind: ServiceKind, cfg: AppConfig) -> anyhow::Result<()> {
    let app = build_app(kind, &cfg).await?;

    let listener = TcpListener::bind((cfg.server.host.as_str(), cfg.server.port)).await?;
    let addr = listener.local_addr()?;
    info!(service = kind.name(), event = "listening", %addr, "starting {}", kind.name());
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal(kind)).await?;
    info!(service = kind.name(), event = "stop", "server stopped");
    Ok(())
}
