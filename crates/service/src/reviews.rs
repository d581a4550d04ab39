//! Review Ledger operations.
//!
//! Create and update are gated on the book registry confirming the
//! referenced book; list and delete never consult it, so orphaned reviews
//! stay readable and deletable.

use models::review::{self, NewReview, ReviewRecord, ReviewUpdate, DATE_FORMAT};
use models::Submission;
use sea_orm::DatabaseConnection;
use tracing::{info, instrument, warn};

use crate::consistency::{require_book, BookExistence};
use crate::errors::ServiceError;
use crate::observability;

/// Today's date as stored on new reviews.
pub fn current_date() -> String {
    chrono::Local::now().format(DATE_FORMAT).to_string()
}

/// Reviews for a book, whether or not the book still exists.
pub async fn list_reviews(db: &DatabaseConnection, book_id: i32) -> Result<Vec<review::Model>, ServiceError> {
    Ok(review::list_by_book(db, book_id).await?)
}

/// Create a review dated today. Nothing is written unless the registry
/// confirms `book_id`.
#[instrument(skip_all)]
pub async fn create_review(
    db: &DatabaseConnection,
    registry: &dyn BookExistence,
    submission: &Submission,
) -> Result<review::Model, ServiceError> {
    let new = NewReview::from_submission(submission)?;
    let book_id = gate(registry, "create_review", &new.book_ref).await?;
    let record = ReviewRecord {
        book_id,
        rating: new.rating,
        comment: new.comment,
        reviewer: new.reviewer,
        date: current_date(),
    };
    let created = review::create(db, &record).await?;
    info!(id = created.id, book_id, "review created");
    Ok(created)
}

/// Overwrite every column of review `id`, including its date, once the
/// registry confirms the (possibly new) book reference.
#[instrument(skip(db, registry, submission))]
pub async fn update_review(
    db: &DatabaseConnection,
    registry: &dyn BookExistence,
    id: i32,
    submission: &Submission,
) -> Result<review::Model, ServiceError> {
    let update = ReviewUpdate::from_submission(submission)?;
    let book_id = gate(registry, "update_review", &update.book_ref).await?;
    let record = ReviewRecord {
        book_id,
        rating: update.rating,
        comment: update.comment,
        reviewer: update.reviewer,
        date: update.date,
    };
    let updated = review::overwrite(db, id, &record).await?.ok_or_else(|| ServiceError::not_found("review"))?;
    info!(id, book_id, "review updated");
    Ok(updated)
}

/// Delete by review id; returns whether a row was removed.
pub async fn delete_review(db: &DatabaseConnection, id: i32) -> Result<bool, ServiceError> {
    let removed = review::hard_delete(db, id).await?;
    info!(id, removed, "review delete");
    Ok(removed)
}

async fn gate(registry: &dyn BookExistence, operation: &str, book_ref: &str) -> Result<i32, ServiceError> {
    require_book(registry, book_ref).await.inspect_err(|e| {
        if let ServiceError::UnverifiedBook { outcome, .. } = e {
            observability::record_blocked_mutation(operation, *outcome);
            warn!(book_ref, %outcome, operation, "review mutation blocked by existence check");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consistency::{mock::StaticBookExistence, ExistenceCheck};
    use crate::test_support::get_db;
    use migration::ReviewMigrator;

    fn review_for(book_ref: &str) -> Submission {
        [("book_id", book_ref), ("rating", "4"), ("comment", "ok"), ("reviewer", "A")].into_iter().collect()
    }

    #[tokio::test]
    async fn create_for_known_book_is_dated_today() -> Result<(), anyhow::Error> {
        let db = get_db::<ReviewMigrator>().await?;
        let registry = StaticBookExistence::with_books([5]);
        let before = current_date();
        let created = create_review(&db, &registry, &review_for("5")).await?;
        let after = current_date();
        assert!(created.date == before || created.date == after);
        assert_eq!(created.book_id, 5);
        assert_eq!(list_reviews(&db, 5).await?, vec![created]);
        Ok(())
    }

    #[tokio::test]
    async fn client_supplied_date_is_ignored_on_create() -> Result<(), anyhow::Error> {
        let db = get_db::<ReviewMigrator>().await?;
        let registry = StaticBookExistence::with_books([5]);
        let mut s = review_for("5");
        s.insert("date", "1999-01-01");
        let created = create_review(&db, &registry, &s).await?;
        assert_ne!(created.date, "1999-01-01");
        Ok(())
    }

    #[tokio::test]
    async fn create_for_unknown_book_writes_nothing() -> Result<(), anyhow::Error> {
        let db = get_db::<ReviewMigrator>().await?;
        let registry = StaticBookExistence::with_books([5]);
        match create_review(&db, &registry, &review_for("999999")).await {
            Err(ServiceError::UnverifiedBook { outcome, .. }) => assert_eq!(outcome, ExistenceCheck::NotFound),
            other => panic!("unexpected {other:?}"),
        }
        assert!(list_reviews(&db, 999999).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn create_fails_closed_when_registry_down() -> Result<(), anyhow::Error> {
        let db = get_db::<ReviewMigrator>().await?;
        let down = StaticBookExistence::unavailable();
        assert!(create_review(&db, &down, &review_for("5")).await.is_err());
        assert!(list_reviews(&db, 5).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn malformed_reference_goes_to_registry() -> Result<(), anyhow::Error> {
        let db = get_db::<ReviewMigrator>().await?;
        let registry = StaticBookExistence::with_books([5]);
        let err = create_review(&db, &registry, &review_for("five")).await.unwrap_err();
        assert!(matches!(err, ServiceError::UnverifiedBook { outcome: ExistenceCheck::NotFound, .. }));
        assert_eq!(registry.calls(), vec!["five"]);
        Ok(())
    }

    #[tokio::test]
    async fn orphaned_reviews_survive_and_remain_readable() -> Result<(), anyhow::Error> {
        let db = get_db::<ReviewMigrator>().await?;
        let registry = StaticBookExistence::with_books([5]);
        let created = create_review(&db, &registry, &review_for("5")).await?;
        registry.forget(5);
        let first = list_reviews(&db, 5).await?;
        let second = list_reviews(&db, 5).await?;
        assert_eq!(first, vec![created]);
        assert_eq!(first, second);
        Ok(())
    }

    #[tokio::test]
    async fn update_rechecks_and_overwrites_everything() -> Result<(), anyhow::Error> {
        let db = get_db::<ReviewMigrator>().await?;
        let registry = StaticBookExistence::with_books([5, 6]);
        let created = create_review(&db, &registry, &review_for("5")).await?;

        let change: Submission = [
            ("book_id", "6"),
            ("rating", "2"),
            ("comment", "meh"),
            ("reviewer", "B"),
            ("date", "2020-02-02"),
        ]
        .into_iter()
        .collect();
        let updated = update_review(&db, &registry, created.id, &change).await?;
        assert_eq!(
            (updated.book_id, updated.rating, updated.comment.as_str(), updated.reviewer.as_str(), updated.date.as_str()),
            (6, 2, "meh", "B", "2020-02-02")
        );
        assert_eq!(registry.calls(), vec!["5", "6"]);

        registry.forget(6);
        assert!(matches!(
            update_review(&db, &registry, created.id, &change).await,
            Err(ServiceError::UnverifiedBook { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn update_unknown_review_is_not_found() -> Result<(), anyhow::Error> {
        let db = get_db::<ReviewMigrator>().await?;
        let registry = StaticBookExistence::with_books([5]);
        let mut s = review_for("5");
        s.insert("date", "2020-02-02");
        assert!(matches!(update_review(&db, &registry, 404, &s).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn delete_needs_no_registry() -> Result<(), anyhow::Error> {
        let db = get_db::<ReviewMigrator>().await?;
        let registry = StaticBookExistence::with_books([5]);
        let created = create_review(&db, &registry, &review_for("5")).await?;
        assert!(delete_review(&db, created.id).await?);
        assert!(!delete_review(&db, created.id).await?);
        assert!(list_reviews(&db, 5).await?.is_empty());
        Ok(())
    }
}
