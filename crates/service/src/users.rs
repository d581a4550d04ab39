//! User Directory operations. No cross-service checks.

use models::user::{self, Entity as UserEntity, NewUser};
use models::Submission;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};
use tracing::info;

use crate::errors::ServiceError;

pub async fn list_users(db: &DatabaseConnection) -> Result<Vec<user::Model>, ServiceError> {
    UserEntity::find()
        .order_by_asc(user::Column::Id)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Create a user from `username` and `email`; `password` is optional and
/// stored unhashed.
pub async fn create_user(db: &DatabaseConnection, submission: &Submission) -> Result<user::Model, ServiceError> {
    let new_user = NewUser::from_submission(submission)?;
    let created = user::create(db, &new_user).await?;
    info!(id = created.id, username = %created.username, "user created");
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use migration::UserMigrator;
    use models::errors::ModelError;

    #[tokio::test]
    async fn user_crud_service() -> Result<(), anyhow::Error> {
        let db = get_db::<UserMigrator>().await?;
        let s: Submission = [("username", "ada"), ("email", "ada@example.com")].into_iter().collect();
        let created = create_user(&db, &s).await?;
        assert_eq!(list_users(&db).await?, vec![created]);

        let no_email: Submission = [("username", "bob")].into_iter().collect();
        assert!(matches!(
            create_user(&db, &no_email).await,
            Err(ServiceError::Model(ModelError::MissingFields(ref names))) if names == &vec!["email"]
        ));
        Ok(())
    }
}
