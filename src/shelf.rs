//! Random shelf loader.
//!
//! Resolves a fixed, ordered list of sample titles into cards shown after
//! login. Titles are fetched sequentially so cards always land in input
//! order; a title the lookup cannot resolve is skipped, not surfaced.

use crate::api::BookApi;
use crate::tui::UiEvent;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

/// Default shelf contents, from the original sample page.
pub const DEFAULT_TITLES: [&str; 3] = [
    "el nombre del viento",
    "don quijote de la mancha",
    "cien años de soledad",
];

/// Loads the fixed shelf of sample cards.
pub struct ShelfLoader {
    api: Arc<dyn BookApi>,
    events: mpsc::UnboundedSender<UiEvent>,
    titles: Vec<String>,
}

impl ShelfLoader {
    pub fn new(
        api: Arc<dyn BookApi>,
        events: mpsc::UnboundedSender<UiEvent>,
        titles: Vec<String>,
    ) -> Self {
        Self {
            api,
            events,
            titles,
        }
    }

    /// Fetch the shelf in the background, emitting one event per card.
    pub fn load(&self) {
        let api = Arc::clone(&self.api);
        let events = self.events.clone();
        let titles = self.titles.clone();
        tokio::spawn(run(api, events, titles));
    }
}

async fn run(
    api: Arc<dyn BookApi>,
    events: mpsc::UnboundedSender<UiEvent>,
    titles: Vec<String>,
) {
    for title in titles {
        match api.lookup_book(&title).await {
            Ok(book) => {
                if events.send(UiEvent::ShelfCard { book }).is_err() {
                    return;
                }
            }
            Err(err) => {
                // Partial failure policy: omit the card silently.
                debug!(%title, %err, "shelf lookup failed, skipping");
            }
        }
    }
}
