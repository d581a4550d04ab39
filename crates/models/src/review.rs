use sea_orm::{entity::prelude::*, ActiveValue::{NotSet, Set, Unchanged}, DatabaseConnection, DbErr, QueryOrder};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::submission::Submission;

/// A review. `book_id` points into another service's store and is not
/// constrained here; it may outlive the book it names.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reviews")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub book_id: i32,
    pub rating: i32,
    pub comment: String,
    pub reviewer: String,
    pub date: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub const REQUIRED_FOR_CREATE: [&str; 4] = ["book_id", "rating", "comment", "reviewer"];
pub const REQUIRED_FOR_UPDATE: [&str; 5] = ["book_id", "rating", "comment", "reviewer", "date"];

/// Date format written into `reviews.date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A create request. The book reference stays raw until the registry has
/// vouched for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewReview {
    pub book_ref: String,
    pub rating: i32,
    pub comment: String,
    pub reviewer: String,
}

impl NewReview {
    pub fn from_submission(s: &Submission) -> Result<Self, ModelError> {
        s.require(&REQUIRED_FOR_CREATE)?;
        Ok(Self {
            book_ref: s.text("book_id")?,
            rating: s.integer("rating")?,
            comment: s.text("comment")?,
            reviewer: s.text("reviewer")?,
        })
    }
}

/// A full-overwrite update request, date included.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewUpdate {
    pub book_ref: String,
    pub rating: i32,
    pub comment: String,
    pub reviewer: String,
    pub date: String,
}

impl ReviewUpdate {
    pub fn from_submission(s: &Submission) -> Result<Self, ModelError> {
        s.require(&REQUIRED_FOR_UPDATE)?;
        Ok(Self {
            book_ref: s.text("book_id")?,
            rating: s.integer("rating")?,
            comment: s.text("comment")?,
            reviewer: s.text("reviewer")?,
            date: s.text("date")?,
        })
    }
}

/// Column values written by both insert and overwrite.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewRecord {
    pub book_id: i32,
    pub rating: i32,
    pub comment: String,
    pub reviewer: String,
    pub date: String,
}

pub async fn create(db: &DatabaseConnection, record: &ReviewRecord) -> Result<Model, ModelError> {
    let am = ActiveModel {
        id: NotSet,
        book_id: Set(record.book_id),
        rating: Set(record.rating),
        comment: Set(record.comment.clone()),
        reviewer: Set(record.reviewer.clone()),
        date: Set(record.date.clone()),
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

pub async fn list_by_book(db: &DatabaseConnection, book_id: i32) -> Result<Vec<Model>, ModelError> {
    Entity::find()
        .filter(Column::BookId.eq(book_id))
        .order_by_asc(Column::Id)
        .all(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}

/// Overwrite every column; `None` if no review has this id.
pub async fn overwrite(db: &DatabaseConnection, id: i32, record: &ReviewRecord) -> Result<Option<Model>, ModelError> {
    let am = ActiveModel {
        id: Unchanged(id),
        book_id: Set(record.book_id),
        rating: Set(record.rating),
        comment: Set(record.comment.clone()),
        reviewer: Set(record.reviewer.clone()),
        date: Set(record.date.clone()),
    };
    match am.update(db).await {
        Ok(m) => Ok(Some(m)),
        Err(DbErr::RecordNotUpdated) => Ok(None),
        Err(e) => Err(ModelError::Db(e.to_string())),
    }
}

pub async fn hard_delete(db: &DatabaseConnection, id: i32) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await.map_err(|e| ModelError::Db(e.to_string()))?;
    Ok(res.rows_affected > 0)
}
