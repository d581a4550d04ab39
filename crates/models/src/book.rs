use sea_orm::{entity::prelude::*, ActiveValue::{NotSet, Set, Unchanged}, DatabaseConnection, DbErr};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::submission::Submission;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub author: String,
    pub year: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub const REQUIRED_FIELDS: [&str; 3] = ["title", "author", "year"];

/// The three mutable columns; create and update both write all of them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BookFields {
    pub title: String,
    pub author: String,
    pub year: i32,
}

impl BookFields {
    pub fn from_submission(s: &Submission) -> Result<Self, ModelError> {
        s.require(&REQUIRED_FIELDS)?;
        Ok(Self {
            title: s.text("title")?,
            author: s.text("author")?,
            year: s.integer("year")?,
        })
    }
}

pub async fn create(db: &DatabaseConnection, fields: &BookFields) -> Result<Model, ModelError> {
    let am = ActiveModel {
        id: NotSet,
        title: Set(fields.title.clone()),
        author: Set(fields.author.clone()),
        year: Set(fields.year),
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

/// Overwrite every mutable column; `None` if the row is gone.
pub async fn overwrite(db: &DatabaseConnection, id: i32, fields: &BookFields) -> Result<Option<Model>, ModelError> {
    let am = ActiveModel {
        id: Unchanged(id),
        title: Set(fields.title.clone()),
        author: Set(fields.author.clone()),
        year: Set(fields.year),
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
