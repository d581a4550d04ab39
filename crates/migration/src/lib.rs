//! Schema migrations, one migrator per store.
//!
//! The three services never share a database, so each runs only the
//! migrator for the store it owns.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_books;
mod m20240101_000002_create_reviews;
mod m20240101_000003_create_users;
mod m20240101_000004_add_review_indexes;

/// Migrations for the Book Registry store.
pub struct BookMigrator;

#[async_trait::async_trait]
impl MigratorTrait for BookMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20240101_000001_create_books::Migration)]
    }
}

/// Migrations for the Review Ledger store.
pub struct ReviewMigrator;

#[async_trait::async_trait]
impl MigratorTrait for ReviewMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000002_create_reviews::Migration),
            // Indexes should always be applied last
            Box::new(m20240101_000004_add_review_indexes::Migration),
        ]
    }
}

/// Migrations for the User Directory store.
pub struct UserMigrator;

#[async_trait::async_trait]
impl MigratorTrait for UserMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20240101_000003_create_users::Migration)]
    }
}
