use axum::{extract::State, http::StatusCode, response::Html, Json};
use common::types::Acknowledgement;
use models::{errors::ModelError, user};
use service::{errors::ServiceError, users as user_service};

use crate::errors::JsonApiError;
use crate::extract::SubmittedFields;
use crate::html;
use crate::state::UserDirectoryState;

#[utoipa::path(get, path = "/api/users", tag = "users", responses((status = 200, description = "All users", body = [crate::openapi::UserDoc])))]
pub async fn list_users(State(state): State<UserDirectoryState>) -> Result<Json<Vec<user::Model>>, JsonApiError> {
    Ok(Json(user_service::list_users(&state.db).await?))
}

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "users",
    request_body = crate::openapi::UserInputDoc,
    responses(
        (status = 201, description = "User added", body = crate::openapi::AcknowledgementDoc),
        (status = 400, description = "Missing fields", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create_user(
    State(state): State<UserDirectoryState>,
    SubmittedFields(submission): SubmittedFields,
) -> Result<(StatusCode, Json<Acknowledgement>), JsonApiError> {
    match user_service::create_user(&state.db, &submission).await {
        Ok(created) => Ok((StatusCode::CREATED, Json(Acknowledgement::new(created.id, "User added successfully")))),
        Err(ServiceError::Model(ModelError::EmptySubmission)) => Err(JsonApiError::bad_request("No data provided")),
        Err(ServiceError::Model(ModelError::MissingFields(_))) => {
            Err(JsonApiError::bad_request("Missing required fields: username and email"))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn users_page(State(state): State<UserDirectoryState>) -> Result<Html<String>, JsonApiError> {
    let users = user_service::list_users(&state.db).await?;
    Ok(Html(html::users_page(&users)))
}
