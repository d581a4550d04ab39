use std::sync::Arc;

use sea_orm::DatabaseConnection;
use service::consistency::BookExistence;
use service::review_feed::ReviewFeed;

/// Book Registry state. `existence` points back at this registry's own read
/// endpoint; `reviews` reads the review ledger for HTML pages.
#[derive(Clone)]
pub struct BookRegistryState {
    pub db: DatabaseConnection,
    pub existence: Arc<dyn BookExistence>,
    pub reviews: Arc<dyn ReviewFeed>,
}

#[derive(Clone)]
pub struct ReviewLedgerState {
    pub db: DatabaseConnection,
    pub existence: Arc<dyn BookExistence>,
}

#[derive(Clone)]
pub struct UserDirectoryState {
    pub db: DatabaseConnection,
}
