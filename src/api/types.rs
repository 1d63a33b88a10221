//! Wire types for the book API.

use serde::{Deserialize, Serialize};

/// A book as returned by the lookup collaborator.
///
/// Immutable once fetched; the client never edits book metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub title: String,
    pub authors: Vec<String>,
    /// Cover image URL.
    pub image: String,
    pub description_short: String,
    pub description_long: String,
}

impl Book {
    /// Authors joined for display ("García Márquez, Vargas Llosa").
    #[must_use]
    pub fn authors_joined(&self) -> String {
        self.authors.join(", ")
    }
}

/// One logged search: the resolved book plus a server-supplied timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRecord {
    pub book: Book,
    pub searched_at: String,
}

/// Successful login response body.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub user_id: String,
}
