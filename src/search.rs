//! Search flow: free-text title to rendered card.
//!
//! Each dispatch gets a monotonically increasing sequence number. The event
//! consumer drops results whose number is no longer current, so a slow
//! earlier lookup can never overwrite a later one.

use crate::api::{ApiError, BookApi};
use crate::tui::UiEvent;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::warn;

/// Outcome of a dispatch attempt, before any network activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDispatch {
    /// Lookup started under this sequence number; show the indicator.
    Started(u64),
    /// Title was empty after trimming; nothing happened.
    EmptyInput,
    /// No session; the caller surfaces a login prompt.
    NoSession,
}

/// Dispatches title searches and tracks which one is current.
pub struct SearchFlow {
    api: Arc<dyn BookApi>,
    events: mpsc::UnboundedSender<UiEvent>,
    seq: u64,
}

impl SearchFlow {
    pub fn new(api: Arc<dyn BookApi>, events: mpsc::UnboundedSender<UiEvent>) -> Self {
        Self {
            api,
            events,
            seq: 0,
        }
    }

    /// Start a search for `title` on behalf of `user`.
    ///
    /// Guards run before any network call: an empty title is a no-op and a
    /// missing session never reaches the lookup.
    pub fn dispatch(&mut self, title: &str, user: Option<&str>) -> SearchDispatch {
        let title = title.trim();
        if title.is_empty() {
            return SearchDispatch::EmptyInput;
        }
        let Some(user) = user else {
            return SearchDispatch::NoSession;
        };

        self.seq += 1;
        let seq = self.seq;
        tokio::spawn(run(
            Arc::clone(&self.api),
            self.events.clone(),
            seq,
            title.to_string(),
            user.to_string(),
        ));
        SearchDispatch::Started(seq)
    }

    /// Whether `seq` is the most recently dispatched search.
    #[must_use]
    pub fn is_current(&self, seq: u64) -> bool {
        seq == self.seq
    }
}

async fn run(
    api: Arc<dyn BookApi>,
    events: mpsc::UnboundedSender<UiEvent>,
    seq: u64,
    title: String,
    user: String,
) {
    match api.lookup_book(&title).await {
        Ok(book) => {
            // Recording is fire-and-forget: a failure is logged, never
            // shown, and does not block the result.
            if let Err(err) = api.record_search(&title, &user).await {
                warn!(%title, %err, "failed to record search");
            }
            let _ = events.send(UiEvent::SearchResult { seq, book });
        }
        Err(ApiError::NotFound) => {
            let _ = events.send(UiEvent::SearchFailed {
                seq,
                message: "Book not found".to_string(),
            });
        }
        Err(err) => {
            let _ = events.send(UiEvent::SearchFailed {
                seq,
                message: err.to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{book, MockApi};

    fn flow_with(api: Arc<MockApi>) -> (SearchFlow, mpsc::UnboundedReceiver<UiEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (SearchFlow::new(api, tx), rx)
    }

    #[tokio::test]
    async fn test_blank_title_is_a_no_op() {
        let api = Arc::new(MockApi::new());
        let (mut flow, _rx) = flow_with(api.clone());

        assert_eq!(flow.dispatch("", Some("42")), SearchDispatch::EmptyInput);
        assert_eq!(flow.dispatch("   ", Some("42")), SearchDispatch::EmptyInput);
        assert_eq!(api.lookup_count(), 0);
    }

    #[tokio::test]
    async fn test_no_session_never_reaches_lookup() {
        let api = Arc::new(MockApi::new());
        let (mut flow, _rx) = flow_with(api.clone());

        assert_eq!(flow.dispatch("don quijote", None), SearchDispatch::NoSession);
        assert_eq!(api.lookup_count(), 0);
    }

    #[tokio::test]
    async fn test_successful_search_emits_result_and_records() {
        let api = Arc::new(MockApi::new().with_book("don quijote", book("Don Quijote")));
        let (tx, mut rx) = mpsc::unbounded_channel();

        run(api.clone(), tx, 1, "don quijote".to_string(), "42".to_string()).await;

        match rx.try_recv().unwrap() {
            UiEvent::SearchResult { seq, book } => {
                assert_eq!(seq, 1);
                assert_eq!(book.title, "Don Quijote");
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(api.recorded().len(), 1);
    }

    #[tokio::test]
    async fn test_miss_emits_not_found_message() {
        let api = Arc::new(MockApi::new());
        let (tx, mut rx) = mpsc::unbounded_channel();

        run(api, tx, 7, "inexistente".to_string(), "42".to_string()).await;

        match rx.try_recv().unwrap() {
            UiEvent::SearchFailed { seq, message } => {
                assert_eq!(seq, 7);
                assert_eq!(message, "Book not found");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_rapid_dispatches_make_earlier_seq_stale() {
        let api = Arc::new(
            MockApi::new()
                .with_book("uno", book("Uno"))
                .with_book("dos", book("Dos")),
        );
        let (mut flow, _rx) = flow_with(api);

        let first = flow.dispatch("uno", Some("42"));
        let second = flow.dispatch("dos", Some("42"));

        assert_eq!(first, SearchDispatch::Started(1));
        assert_eq!(second, SearchDispatch::Started(2));
        assert!(!flow.is_current(1));
        assert!(flow.is_current(2));
    }
}
