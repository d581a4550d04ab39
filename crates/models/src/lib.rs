//! Entities and field handling for the three catalog stores.
//!
//! Each store is owned by exactly one service: `book` by the Book Registry,
//! `review` by the Review Ledger, `user` by the User Directory.

pub mod errors;
pub mod db;
pub mod submission;
pub mod book;
pub mod review;
pub mod user;

pub use submission::Submission;
