//! In-memory `BookApi` for component tests.

use super::{ApiError, Book, BookApi, SearchRecord};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Test double: resolves titles from a fixed table and keeps history
/// in memory, newest first.
#[derive(Default)]
pub(crate) struct MockApi {
    books: HashMap<String, Book>,
    history: Mutex<Vec<SearchRecord>>,
    pub lookup_calls: AtomicUsize,
    pub record_calls: AtomicUsize,
    pub clear_calls: AtomicUsize,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resolvable title.
    pub fn with_book(mut self, title: &str, book: Book) -> Self {
        self.books.insert(title.to_string(), book);
        self
    }

    pub fn lookup_count(&self) -> usize {
        self.lookup_calls.load(Ordering::SeqCst)
    }

    pub fn recorded(&self) -> Vec<SearchRecord> {
        self.history.lock().unwrap().clone()
    }
}

/// Build a minimal book for tests.
pub(crate) fn book(title: &str) -> Book {
    Book {
        title: title.to_string(),
        authors: vec!["Autor Anónimo".to_string()],
        image: format!("https://covers.example.com/{title}.jpg"),
        description_short: format!("{title} (short)"),
        description_long: format!("{title} (long)"),
    }
}

#[async_trait]
impl BookApi for MockApi {
    async fn login(&self, username: &str, password: &str) -> Result<String, ApiError> {
        if username == "admin" && password == "admin" {
            Ok("42".to_string())
        } else {
            Err(ApiError::InvalidCredentials)
        }
    }

    async fn lookup_book(&self, title: &str) -> Result<Book, ApiError> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);
        self.books.get(title).cloned().ok_or(ApiError::NotFound)
    }

    async fn record_search(&self, title: &str, _user_id: &str) -> Result<(), ApiError> {
        self.record_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(book) = self.books.get(title) {
            self.history.lock().unwrap().insert(
                0,
                SearchRecord {
                    book: book.clone(),
                    searched_at: "2026-01-05T10:30:00Z".to_string(),
                },
            );
        }
        Ok(())
    }

    async fn list_history(&self, _user_id: &str) -> Result<Vec<SearchRecord>, ApiError> {
        Ok(self.history.lock().unwrap().clone())
    }

    async fn clear_history(&self, _user_id: &str) -> Result<(), ApiError> {
        self.clear_calls.fetch_add(1, Ordering::SeqCst);
        self.history.lock().unwrap().clear();
        Ok(())
    }
}
