use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("no fields submitted")]
    EmptySubmission,
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("invalid field: {0}")]
    InvalidField(&'static str),
    #[error("database error: {0}")]
    Db(String),
}
