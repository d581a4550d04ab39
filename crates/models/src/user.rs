use sea_orm::{entity::prelude::*, ActiveValue::{NotSet, Set}, DatabaseConnection};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::submission::Submission;

/// A directory user. `pass` holds the credential exactly as submitted.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub username: String,
    pub email: String,
    pub pass: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub const REQUIRED_FIELDS: [&str; 2] = ["username", "email"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: Option<String>,
}

impl NewUser {
    pub fn from_submission(s: &Submission) -> Result<Self, ModelError> {
        s.require(&REQUIRED_FIELDS)?;
        Ok(Self {
            username: s.text("username")?,
            email: s.text("email")?,
            password: s.get("password").map(str::to_string),
        })
    }
}

pub async fn create(db: &DatabaseConnection, new_user: &NewUser) -> Result<Model, ModelError> {
    let am = ActiveModel {
        id: NotSet,
        username: Set(new_user.username.clone()),
        email: Set(new_user.email.clone()),
        pass: Set(new_user.password.clone()),
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}
