use thiserror::Error;

use crate::consistency::ExistenceCheck;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Model(#[from] models::errors::ModelError),
    #[error("not found: {0}")]
    NotFound(String),
    /// The book registry did not vouch for the referenced book.
    #[error("book {book_ref} not verified: {outcome}")]
    UnverifiedBook { book_ref: String, outcome: ExistenceCheck },
    #[error("remote service error: {0}")]
    Remote(String),
    #[error("database error: {0}")]
    Db(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }
}
