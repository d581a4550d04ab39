pub mod books;
pub mod ops;
pub mod reviews;
pub mod users;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::openapi;
use crate::state::{BookRegistryState, ReviewLedgerState, UserDirectoryState};

/// Book Registry: JSON API, HTML pages and operational endpoints.
pub fn book_registry_router(state: BookRegistryState, cors: CorsLayer, legacy_update_routes: bool) -> Router {
    let mut api = Router::new()
        .route("/api/books", get(books::list_books).post(books::create_book))
        .route(
            "/api/books/:id",
            get(books::get_book)
                .put(books::create_book_alias)
                .patch(books::update_book)
                .delete(books::delete_book),
        );
    if legacy_update_routes {
        api = api.route("/api/update/books/:id/:title/:author/:year", get(books::legacy_update_book));
    }

    let pages = Router::new()
        .route("/books", get(books::books_page))
        .route("/books/:id", get(books::book_page));

    let app = api
        .merge(pages)
        .with_state(state)
        .merge(ops::router(openapi::book_registry_doc));
    with_http_layers(app, cors)
}

/// Review Ledger: JSON API and operational endpoints.
pub fn review_ledger_router(state: ReviewLedgerState, cors: CorsLayer, legacy_update_routes: bool) -> Router {
    // GET takes a book id, the other verbs a review id; one path, one param name.
    let mut api = Router::new()
        .route("/api/reviews", post(reviews::create_review))
        .route(
            "/api/reviews/:id",
            get(reviews::list_reviews)
                .put(reviews::create_review_alias)
                .patch(reviews::update_review)
                .delete(reviews::delete_review),
        );
    if legacy_update_routes {
        api = api.route(
            "/api/update/books/:id/:book_id/:rating/:comment/:reviewer/:date",
            get(reviews::legacy_update_review),
        );
    }

    let app = api.with_state(state).merge(ops::router(openapi::review_ledger_doc));
    with_http_layers(app, cors)
}

/// User Directory: JSON API, HTML page and operational endpoints.
pub fn user_directory_router(state: UserDirectoryState, cors: CorsLayer) -> Router {
    let app = Router::new()
        .route("/api/users", get(users::list_users).post(users::create_user))
        .route("/users", get(users::users_page))
        .with_state(state)
        .merge(ops::router(openapi::user_directory_doc));
    with_http_layers(app, cors)
}

fn with_http_layers(app: Router, cors: CorsLayer) -> Router {
    app.layer(cors).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
            .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
    )
}
