use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use common::types::Acknowledgement;
use models::{review, submission::parse_integer, Submission};
use service::{errors::ServiceError, reviews as review_service};

use crate::errors::JsonApiError;
use crate::extract::SubmittedFields;
use crate::state::ReviewLedgerState;

/// Reviews referencing a book id. Never consults the registry; a reference
/// that is not an integer simply has no reviews.
#[utoipa::path(
    get,
    path = "/api/reviews/{id}",
    tag = "reviews",
    params(("id" = String, Path, description = "Book id")),
    responses((status = 200, description = "Reviews for the book", body = [crate::openapi::ReviewDoc]))
)]
pub async fn list_reviews(
    State(state): State<ReviewLedgerState>,
    Path(book_id): Path<String>,
) -> Result<Json<Vec<review::Model>>, JsonApiError> {
    let Some(book_id) = parse_integer(&book_id) else {
        return Ok(Json(Vec::new()));
    };
    Ok(Json(review_service::list_reviews(&state.db, book_id).await?))
}

#[utoipa::path(
    post,
    path = "/api/reviews",
    tag = "reviews",
    request_body = crate::openapi::ReviewInputDoc,
    responses(
        (status = 201, description = "Review added", body = crate::openapi::AcknowledgementDoc),
        (status = 400, description = "Missing or invalid fields", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Book not found or registry unavailable", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create_review(
    State(state): State<ReviewLedgerState>,
    SubmittedFields(submission): SubmittedFields,
) -> Result<(StatusCode, Json<Acknowledgement>), JsonApiError> {
    let created = review_service::create_review(&state.db, state.existence.as_ref(), &submission).await?;
    Ok((StatusCode::CREATED, Json(Acknowledgement::new(created.id, "Review added successfully"))))
}

/// `PUT /api/reviews/{id}` creates a new review; the path id is ignored.
pub async fn create_review_alias(
    state: State<ReviewLedgerState>,
    Path(_ignored): Path<String>,
    fields: SubmittedFields,
) -> Result<(StatusCode, Json<Acknowledgement>), JsonApiError> {
    create_review(state, fields).await
}

#[utoipa::path(
    patch,
    path = "/api/reviews/{id}",
    tag = "reviews",
    params(("id" = String, Path, description = "Review id")),
    request_body = crate::openapi::ReviewUpdateDoc,
    responses(
        (status = 200, description = "Review updated, or an error body when the book does not exist", body = crate::openapi::AcknowledgementDoc),
        (status = 400, description = "Missing or invalid fields", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Review not found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update_review(
    State(state): State<ReviewLedgerState>,
    Path(id): Path<String>,
    SubmittedFields(submission): SubmittedFields,
) -> Result<Json<Acknowledgement>, JsonApiError> {
    apply_update(&state, &id, &submission).await
}

/// Mutating GET kept for old clients: every field rides in the path.
pub async fn legacy_update_review(
    State(state): State<ReviewLedgerState>,
    Path((id, book_id, rating, comment, reviewer, date)): Path<(String, String, String, String, String, String)>,
) -> Result<Json<Acknowledgement>, JsonApiError> {
    let submission: Submission = [
        ("book_id", book_id),
        ("rating", rating),
        ("comment", comment),
        ("reviewer", reviewer),
        ("date", date),
    ]
    .into_iter()
    .collect();
    apply_update(&state, &id, &submission).await
}

async fn apply_update(
    state: &ReviewLedgerState,
    raw_id: &str,
    submission: &Submission,
) -> Result<Json<Acknowledgement>, JsonApiError> {
    let Some(id) = parse_integer(raw_id) else {
        return Err(JsonApiError::not_found("Review not found"));
    };
    match review_service::update_review(&state.db, state.existence.as_ref(), id, submission).await {
        Ok(updated) => Ok(Json(Acknowledgement::new(updated.id, "Review was updated successfully."))),
        Err(ServiceError::UnverifiedBook { .. }) => Err(JsonApiError::book_absent()),
        Err(ServiceError::NotFound(_)) => Err(JsonApiError::not_found("Review not found")),
        Err(e) => Err(e.into()),
    }
}

/// Deletes by review id without any existence check; succeeds whether or
/// not the row was there.
#[utoipa::path(
    delete,
    path = "/api/reviews/{id}",
    tag = "reviews",
    params(("id" = String, Path, description = "Review id")),
    responses(
        (status = 200, description = "Review deleted", body = crate::openapi::AcknowledgementDoc),
        (status = 404, description = "Review id is not an integer", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn delete_review(
    State(state): State<ReviewLedgerState>,
    Path(id): Path<String>,
) -> Result<Json<Acknowledgement>, JsonApiError> {
    let Some(id) = parse_integer(&id) else {
        return Err(JsonApiError::not_found("Review not found"));
    };
    review_service::delete_review(&state.db, id).await?;
    Ok(Json(Acknowledgement::new(id, "Review was deleted successfully.")))
}
