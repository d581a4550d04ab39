//! Create `reviews` table.
//!
//! `book_id` deliberately carries no foreign key: books live in another
//! service's store and are verified over HTTP before writes.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reviews::Table)
                    .if_not_exists()
                    .col(pk_auto(Reviews::Id))
                    .col(integer(Reviews::BookId))
                    .col(integer(Reviews::Rating))
                    .col(text(Reviews::Comment))
                    .col(string(Reviews::Reviewer))
                    .col(string_len(Reviews::Date, 10))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Reviews::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Reviews { Table, Id, BookId, Rating, Comment, Reviewer, Date }
