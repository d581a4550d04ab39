use std::time::{Duration, Instant};

use configs::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

/// Open the pooled store handle shared by every request of a service.
pub async fn connect_with_config(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let started = Instant::now();
    let mut opt = ConnectOptions::new(cfg.url.clone());
    opt.max_connections(cfg.max_connections)
        .min_connections(cfg.min_connections)
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(cfg.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(cfg.max_lifetime_secs))
        .sqlx_logging(cfg.sqlx_logging);
    let db = Database::connect(opt).await?;
    info!(
        event = "db_open",
        max_connections = cfg.max_connections,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "store connection pool ready"
    );
    Ok(db)
}

/// In-memory store on a single pooled connection.
///
/// sqlx opens `sqlite::memory:` as a named shared-cache database, so pooled
/// connections see the same data, but the database is dropped once its last
/// connection closes. Pinning the pool at one connection keeps it alive for
/// the pool's lifetime.
pub async fn connect_memory() -> anyhow::Result<DatabaseConnection> {
    let mut cfg = DatabaseConfig::with_url("sqlite::memory:");
    cfg.max_connections = 1;
    cfg.min_connections = 1;
    connect_with_config(&cfg).await
}
