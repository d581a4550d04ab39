//! Create `books` table.
//!
//! Owned by the Book Registry; the single source of truth for book existence.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Books::Table)
                    .if_not_exists()
                    .col(pk_auto(Books::Id))
                    .col(string(Books::Title))
                    .col(string(Books::Author))
                    .col(integer(Books::Year))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Books::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Books { Table, Id, Title, Author, Year }
