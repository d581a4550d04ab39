use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Success envelope returned by every create/update/delete endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Acknowledgement {
    pub id: i32,
    pub message: String,
}

impl Acknowledgement {
    pub fn new(id: i32, message: impl Into<String>) -> Self {
        Self { id, message: message.into() }
    }
}

/// Error envelope; the message always travels under `"error"`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorBody {
    pub error: String,
}
