#![cfg(test)]
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;

/// Fresh in-memory store with `M`'s schema applied.
pub async fn get_db<M: MigratorTrait>() -> Result<DatabaseConnection, anyhow::Error> {
    let db = models::db::connect_memory().await?;
    M::up(&db, None).await?;
    Ok(db)
}
