//! External book API collaborators.
//!
//! The [`BookApi`] trait is the seam between the UI flows and the remote
//! service: production code uses the reqwest-backed [`HttpApi`], tests use
//! the in-memory mock.

mod client;
#[cfg(test)]
pub(crate) mod mock;
mod types;

pub use client::HttpApi;
pub use types::{Book, LoginResponse, SearchRecord};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Login rejected by the server.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Lookup reported no matching book.
    #[error("Book not found")]
    NotFound,

    /// Any other non-success response.
    #[error("API error: {0}")]
    Api(String),

    /// Transport-level failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// The remote book service: login, title lookup, and search history.
#[async_trait]
pub trait BookApi: Send + Sync {
    /// Authenticate and return the server-assigned user id.
    async fn login(&self, username: &str, password: &str) -> Result<String, ApiError>;

    /// Resolve a free-text title to a book.
    async fn lookup_book(&self, title: &str) -> Result<Book, ApiError>;

    /// Log a search for the given user.
    async fn record_search(&self, title: &str, user_id: &str) -> Result<(), ApiError>;

    /// Fetch the user's search history, most recent first.
    async fn list_history(&self, user_id: &str) -> Result<Vec<SearchRecord>, ApiError>;

    /// Delete the user's entire search history.
    async fn clear_history(&self, user_id: &str) -> Result<(), ApiError>;
}
