//! OpenAPI documents, one per service, served at `/api-docs/openapi.json`.
//! The doc structs mirror the wire shapes.

use axum::Json;
use utoipa::{OpenApi, ToSchema};

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(ToSchema)]
pub struct ErrorDoc {
    pub error: String,
}

#[derive(ToSchema)]
pub struct AcknowledgementDoc {
    pub id: i32,
    pub message: String,
}

#[derive(ToSchema)]
pub struct BookDoc {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub year: i32,
}

/// Form fields or a JSON object; `year` must be an integer.
#[derive(ToSchema)]
pub struct BookInputDoc {
    pub title: String,
    pub author: String,
    pub year: String,
}

#[derive(ToSchema)]
pub struct ReviewDoc {
    pub id: i32,
    pub book_id: i32,
    pub rating: i32,
    pub comment: String,
    pub reviewer: String,
    /// `YYYY-MM-DD`
    pub date: String,
}

/// The date is set by the server on create.
#[derive(ToSchema)]
pub struct ReviewInputDoc {
    pub book_id: String,
    pub rating: String,
    pub comment: String,
    pub reviewer: String,
}

#[derive(ToSchema)]
pub struct ReviewUpdateDoc {
    pub book_id: String,
    pub rating: String,
    pub comment: String,
    pub reviewer: String,
    pub date: String,
}

#[derive(ToSchema)]
pub struct UserDoc {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub pass: Option<String>,
}

#[derive(ToSchema)]
pub struct UserInputDoc {
    pub username: String,
    pub email: String,
    pub password: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::ops::health,
        crate::routes::books::list_books,
        crate::routes::books::get_book,
        crate::routes::books::create_book,
        crate::routes::books::update_book,
        crate::routes::books::delete_book,
    ),
    components(schemas(HealthResponse, ErrorDoc, AcknowledgementDoc, BookDoc, BookInputDoc)),
    tags((name = "ops"), (name = "books"))
)]
pub struct BookRegistryDoc;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::ops::health,
        crate::routes::reviews::list_reviews,
        crate::routes::reviews::create_review,
        crate::routes::reviews::update_review,
        crate::routes::reviews::delete_review,
    ),
    components(schemas(HealthResponse, ErrorDoc, AcknowledgementDoc, ReviewDoc, ReviewInputDoc, ReviewUpdateDoc)),
    tags((name = "ops"), (name = "reviews"))
)]
pub struct ReviewLedgerDoc;

#[derive(OpenApi)]
#[openapi(
    paths(crate::routes::ops::health, crate::routes::users::list_users, crate::routes::users::create_user),
    components(schemas(HealthResponse, ErrorDoc, AcknowledgementDoc, UserDoc, UserInputDoc)),
    tags((name = "ops"), (name = "users"))
)]
pub struct UserDirectoryDoc;

pub async fn book_registry_doc() -> Json<utoipa::openapi::OpenApi> {
    Json(BookRegistryDoc::openapi())
}

pub async fn review_ledger_doc() -> Json<utoipa::openapi::OpenApi> {
    Json(ReviewLedgerDoc::openapi())
}

pub async fn user_directory_doc() -> Json<utoipa::openapi::OpenApi> {
    Json(UserDirectoryDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_service_documents_its_own_paths() {
        let books = serde_json::to_value(BookRegistryDoc::openapi()).unwrap();
        assert!(books["paths"].get("/api/books/{id}").is_some());
        assert!(books["paths"].get("/api/reviews").is_none());

        let reviews = serde_json::to_value(ReviewLedgerDoc::openapi()).unwrap();
        assert!(reviews["paths"].get("/api/reviews").is_some());

        let users = serde_json::to_value(UserDirectoryDoc::openapi()).unwrap();
        assert!(users["paths"].get("/api/users").is_some());
        assert!(users["components"]["schemas"].get("UserDoc").is_some());
    }
}
