use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    Json,
};
use common::types::Acknowledgement;
use models::{book, submission::parse_integer, Submission};
use service::{books as book_service, errors::ServiceError};
use tracing::warn;

use crate::errors::JsonApiError;
use crate::extract::SubmittedFields;
use crate::html;
use crate::state::BookRegistryState;

#[utoipa::path(get, path = "/api/books", tag = "books", responses((status = 200, description = "All books", body = [crate::openapi::BookDoc])))]
pub async fn list_books(State(state): State<BookRegistryState>) -> Result<Json<Vec<book::Model>>, JsonApiError> {
    Ok(Json(book_service::list_books(&state.db).await?))
}

/// Also the endpoint other services probe for existence checks.
#[utoipa::path(
    get,
    path = "/api/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book id")),
    responses(
        (status = 200, description = "Book", body = crate::openapi::BookDoc),
        (status = 404, description = "Book not found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get_book(
    State(state): State<BookRegistryState>,
    Path(id): Path<String>,
) -> Result<Json<book::Model>, JsonApiError> {
    let Some(id) = parse_integer(&id) else {
        return Err(JsonApiError::not_found("Book not found"));
    };
    book_service::get_book(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("Book not found"))
}

#[utoipa::path(
    post,
    path = "/api/books",
    tag = "books",
    request_body = crate::openapi::BookInputDoc,
    responses(
        (status = 201, description = "Book added", body = crate::openapi::AcknowledgementDoc),
        (status = 400, description = "Missing or invalid fields", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create_book(
    State(state): State<BookRegistryState>,
    SubmittedFields(submission): SubmittedFields,
) -> Result<(StatusCode, Json<Acknowledgement>), JsonApiError> {
    let created = book_service::create_book(&state.db, &submission).await?;
    Ok((StatusCode::CREATED, Json(Acknowledgement::new(created.id, "Book added successfully"))))
}

/// `PUT /api/books/{id}` creates a new book; the path id is ignored.
pub async fn create_book_alias(
    state: State<BookRegistryState>,
    Path(_ignored): Path<String>,
    fields: SubmittedFields,
) -> Result<(StatusCode, Json<Acknowledgement>), JsonApiError> {
    create_book(state, fields).await
}

#[utoipa::path(
    patch,
    path = "/api/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book id")),
    request_body = crate::openapi::BookInputDoc,
    responses(
        (status = 200, description = "Book updated, or an error body when the book does not exist", body = crate::openapi::AcknowledgementDoc),
        (status = 400, description = "Missing or invalid fields", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update_book(
    State(state): State<BookRegistryState>,
    Path(id): Path<String>,
    SubmittedFields(submission): SubmittedFields,
) -> Result<Json<Acknowledgement>, JsonApiError> {
    apply_update(&state, &id, &submission).await
}

/// Mutating GET kept for old clients: every field rides in the path.
pub async fn legacy_update_book(
    State(state): State<BookRegistryState>,
    Path((id, title, author, year)): Path<(String, String, String, String)>,
) -> Result<Json<Acknowledgement>, JsonApiError> {
    let submission: Submission = [("title", title), ("author", author), ("year", year)].into_iter().collect();
    apply_update(&state, &id, &submission).await
}

async fn apply_update(
    state: &BookRegistryState,
    raw_id: &str,
    submission: &Submission,
) -> Result<Json<Acknowledgement>, JsonApiError> {
    let Some(id) = parse_integer(raw_id) else {
        return Err(JsonApiError::book_absent());
    };
    match book_service::update_book(&state.db, state.existence.as_ref(), id, submission).await {
        Ok(updated) => Ok(Json(Acknowledgement::new(updated.id, "Book was updated successfully."))),
        Err(ServiceError::UnverifiedBook { .. } | ServiceError::NotFound(_)) => Err(JsonApiError::book_absent()),
        Err(e) => Err(e.into()),
    }
}

#[utoipa::path(
    delete,
    path = "/api/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book id")),
    responses((status = 200, description = "Book deleted, or an error body when the book does not exist", body = crate::openapi::AcknowledgementDoc))
)]
pub async fn delete_book(
    State(state): State<BookRegistryState>,
    Path(id): Path<String>,
) -> Result<Json<Acknowledgement>, JsonApiError> {
    let Some(id) = parse_integer(&id) else {
        return Err(JsonApiError::book_absent());
    };
    match book_service::delete_book(&state.db, state.existence.as_ref(), id).await {
        Ok(()) => Ok(Json(Acknowledgement::new(id, "Book was deleted successfully."))),
        Err(ServiceError::UnverifiedBook { .. } | ServiceError::NotFound(_)) => Err(JsonApiError::book_absent()),
        Err(e) => Err(e.into()),
    }
}

pub async fn books_page(State(state): State<BookRegistryState>) -> Result<Html<String>, JsonApiError> {
    let books = book_service::list_books(&state.db).await?;
    Ok(Html(html::books_page(&books)))
}

pub async fn book_page(
    State(state): State<BookRegistryState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Html<String>), JsonApiError> {
    let found = match parse_integer(&id) {
        Some(id) => book_service::get_book(&state.db, id).await?,
        None => None,
    };
    let Some(book) = found else {
        return Ok((StatusCode::NOT_FOUND, Html(html::not_found_page("Book not found"))));
    };
    let reviews = match state.reviews.reviews_for(book.id).await {
        Ok(reviews) => Some(reviews),
        Err(e) => {
            warn!(book_id = book.id, error = %e, "rendering book page without reviews");
            None
        }
    };
    Ok((StatusCode::OK, Html(html::book_page(&book, reviews.as_deref()))))
}
