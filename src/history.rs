//! Per-user search history panel.

use crate::api::{BookApi, SearchRecord};
use crate::tui::terminal::{LineBuilder, StyledLine};
use crate::tui::UiEvent;
use chrono::{DateTime, Local};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::warn;

/// Fetches and clears the search history for the current session.
pub struct HistoryPanel {
    api: Arc<dyn BookApi>,
    events: mpsc::UnboundedSender<UiEvent>,
}

impl HistoryPanel {
    pub fn new(api: Arc<dyn BookApi>, events: mpsc::UnboundedSender<UiEvent>) -> Self {
        Self { api, events }
    }

    /// Refresh the panel. No-op without a session.
    pub fn refresh(&self, user: Option<&str>) {
        let Some(user) = user else { return };
        tokio::spawn(run_refresh(
            Arc::clone(&self.api),
            self.events.clone(),
            user.to_string(),
        ));
    }

    /// Delete every record for the current session, then refresh.
    pub fn clear(&self, user: Option<&str>) {
        let Some(user) = user else { return };
        let api = Arc::clone(&self.api);
        let events = self.events.clone();
        let user = user.to_string();
        tokio::spawn(async move {
            if let Err(err) = api.clear_history(&user).await {
                warn!(%err, "failed to clear history");
            }
            run_refresh(api, events, user).await;
        });
    }
}

async fn run_refresh(
    api: Arc<dyn BookApi>,
    events: mpsc::UnboundedSender<UiEvent>,
    user: String,
) {
    let event = match api.list_history(&user).await {
        Ok(records) => UiEvent::HistoryLoaded { records },
        Err(err) => {
            warn!(%err, "failed to load history");
            UiEvent::HistoryFailed {
                message: "Could not load history".to_string(),
            }
        }
    };
    let _ = events.send(event);
}

/// Render history records as numbered lines, most recent first.
#[must_use]
pub fn render_records(records: &[SearchRecord]) -> Vec<StyledLine> {
    if records.is_empty() {
        return vec![LineBuilder::new().dim("No searches yet").build()];
    }

    let mut lines = Vec::with_capacity(records.len() * 2);
    for (i, record) in records.iter().enumerate() {
        lines.push(
            LineBuilder::new()
                .bold(format!("{}. ", i + 1))
                .raw(&record.book.title)
                .raw(" – ")
                .raw(record.book.authors_joined())
                .build(),
        );
        lines.push(
            LineBuilder::new()
                .dim(format!("   {}", display_timestamp(&record.searched_at)))
                .build(),
        );
    }
    lines
}

/// Reformat server timestamps for display.
///
/// RFC 3339 values become local "YYYY-MM-DD HH:MM"; anything else is shown
/// as the server sent it.
fn display_timestamp(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => ts
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string(),
        Err(_) => raw.to_string(),
    }
}
