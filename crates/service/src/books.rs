//! Book Registry operations.
//!
//! Update and delete re-verify the book through the same [`BookExistence`]
//! contract the review ledger uses, pointed back at this registry's own read
//! endpoint.

use models::book::{self, BookFields, Entity as BookEntity};
use models::Submission;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};
use tracing::{info, instrument, warn};

use crate::consistency::{require_book, BookExistence};
use crate::errors::ServiceError;
use crate::observability;

/// List every book in identity order.
pub async fn list_books(db: &DatabaseConnection) -> Result<Vec<book::Model>, ServiceError> {
    BookEntity::find()
        .order_by_asc(book::Column::Id)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Get a book by id.
pub async fn get_book(db: &DatabaseConnection, id: i32) -> Result<Option<book::Model>, ServiceError> {
    BookEntity::find_by_id(id).one(db).await.map_err(|e| ServiceError::Db(e.to_string()))
}

/// Create a book from `title`, `author` and `year`.
pub async fn create_book(db: &DatabaseConnection, submission: &Submission) -> Result<book::Model, ServiceError> {
    let fields = BookFields::from_submission(submission)?;
    let created = book::create(db, &fields).await?;
    info!(id = created.id, title = %created.title, "book created");
    Ok(created)
}

/// Overwrite title, author and year once the registry confirms the book.
#[instrument(skip(db, registry, submission))]
pub async fn update_book(
    db: &DatabaseConnection,
    registry: &dyn BookExistence,
    id: i32,
    submission: &Submission,
) -> Result<book::Model, ServiceError> {
    let fields = BookFields::from_submission(submission)?;
    gate(registry, "update_book", id).await?;
    match book::overwrite(db, id, &fields).await? {
        Some(updated) => {
            info!(id, "book updated");
            Ok(updated)
        }
        None => {
            warn!(id, "book vanished between existence check and update");
            Err(ServiceError::not_found("book"))
        }
    }
}

/// Delete a book once the registry confirms it. Reviews that reference it
/// are left alone.
#[instrument(skip(db, registry))]
pub async fn delete_book(db: &DatabaseConnection, registry: &dyn BookExistence, id: i32) -> Result<(), ServiceError> {
    gate(registry, "delete_book", id).await?;
    if book::hard_delete(db, id).await? {
        info!(id, "book deleted");
        Ok(())
    } else {
        warn!(id, "book vanished between existence check and delete");
        Err(ServiceError::not_found("book"))
    }
}

async fn gate(registry: &dyn BookExistence, operation: &str, id: i32) -> Result<i32, ServiceError> {
    require_book(registry, &id.to_string()).await.inspect_err(|e| {
        if let ServiceError::UnverifiedBook { outcome, .. } = e {
            observability::record_blocked_mutation(operation, *outcome);
            warn!(id, %outcome, operation, "book mutation blocked by existence check");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consistency::{mock::StaticBookExistence, ExistenceCheck};
    use crate::test_support::get_db;
    use migration::BookMigrator;
    use models::errors::ModelError;

    fn dune() -> Submission {
        [("title", "Dune"), ("author", "Herbert"), ("year", "1965")].into_iter().collect()
    }

    #[tokio::test]
    async fn create_then_read_back() -> Result<(), anyhow::Error> {
        let db = get_db::<BookMigrator>().await?;
        let created = create_book(&db, &dune()).await?;
        let found = get_book(&db, created.id).await?.expect("book");
        assert_eq!((found.title.as_str(), found.author.as_str(), found.year), ("Dune", "Herbert", 1965));
        assert_eq!(list_books(&db).await?, vec![found]);
        Ok(())
    }

    #[tokio::test]
    async fn create_rejects_missing_and_empty() -> Result<(), anyhow::Error> {
        let db = get_db::<BookMigrator>().await?;
        let partial: Submission = [("title", "Dune")].into_iter().collect();
        assert!(matches!(
            create_book(&db, &partial).await,
            Err(ServiceError::Model(ModelError::MissingFields(_)))
        ));
        assert!(matches!(
            create_book(&db, &Submission::new()).await,
            Err(ServiceError::Model(ModelError::EmptySubmission))
        ));
        assert!(list_books(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn update_overwrites_all_fields_when_confirmed() -> Result<(), anyhow::Error> {
        let db = get_db::<BookMigrator>().await?;
        let created = create_book(&db, &dune()).await?;
        let registry = StaticBookExistence::with_books([created.id]);
        let change: Submission =
            [("title", "Children of Dune"), ("author", "F. Herbert"), ("year", "1976")].into_iter().collect();
        let updated = update_book(&db, &registry, created.id, &change).await?;
        assert_eq!(updated.title, "Children of Dune");
        assert_eq!(updated.author, "F. Herbert");
        assert_eq!(updated.year, 1976);
        assert_eq!(registry.calls(), vec![created.id.to_string()]);
        Ok(())
    }

    #[tokio::test]
    async fn mutations_blocked_when_registry_down() -> Result<(), anyhow::Error> {
        let db = get_db::<BookMigrator>().await?;
        let created = create_book(&db, &dune()).await?;
        let down = StaticBookExistence::unavailable();

        match delete_book(&db, &down, created.id).await {
            Err(ServiceError::UnverifiedBook { outcome, .. }) => {
                assert_eq!(outcome, ExistenceCheck::DependencyUnavailable)
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(update_book(&db, &down, created.id, &dune()).await.is_err());
        assert!(get_book(&db, created.id).await?.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn delete_unknown_book_reports_not_found() -> Result<(), anyhow::Error> {
        let db = get_db::<BookMigrator>().await?;
        let registry = StaticBookExistence::with_books(Vec::new());
        match delete_book(&db, &registry, 77).await {
            Err(ServiceError::UnverifiedBook { outcome, .. }) => assert_eq!(outcome, ExistenceCheck::NotFound),
            other => panic!("unexpected {other:?}"),
        }
        Ok(())
    }

    /// Registry confirmed the book but the row is gone by the time we write.
    #[tokio::test]
    async fn delete_race_surfaces_as_not_found() -> Result<(), anyhow::Error> {
        let db = get_db::<BookMigrator>().await?;
        let registry = StaticBookExistence::with_books([12]);
        assert!(matches!(delete_book(&db, &registry, 12).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn update_validates_before_calling_registry() -> Result<(), anyhow::Error> {
        let db = get_db::<BookMigrator>().await?;
        let registry = StaticBookExistence::with_books([1]);
        let bad_year: Submission = [("title", "X"), ("author", "Y"), ("year", "soon")].into_iter().collect();
        assert!(matches!(
            update_book(&db, &registry, 1, &bad_year).await,
            Err(ServiceError::Model(ModelError::InvalidField("year")))
        ));
        assert!(registry.calls().is_empty());
        Ok(())
    }
}
