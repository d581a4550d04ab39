//! Service layer for the catalog services.
//! - `consistency`: the cross-service book existence check every book-referencing
//!   mutation is gated on.
//! - `books`, `reviews`, `users`: business operations over each owned store.
//! - `review_feed`: read-only pull of reviews for the book registry's HTML views.

pub mod errors;
pub mod observability;
pub mod consistency;
pub mod books;
pub mod reviews;
pub mod users;
pub mod review_feed;
#[cfg(test)]
pub mod test_support;
