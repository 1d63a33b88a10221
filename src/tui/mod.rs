//! Terminal UI: application state, event handling, and rendering.

mod events;
mod render;
mod run;
pub mod terminal;

pub use run::run;

use crate::api::{Book, BookApi, SearchRecord};
use crate::card::Card;
use crate::history::HistoryPanel;
use crate::search::{SearchDispatch, SearchFlow};
use crate::session::Session;
use crate::shelf::ShelfLoader;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::warn;

/// Events emitted by background network tasks, drained on the UI task.
#[derive(Debug)]
pub enum UiEvent {
    LoggedIn { user_id: String },
    LoginFailed { message: String },
    /// One resolved shelf card, emitted in shelf order.
    ShelfCard { book: Book },
    SearchResult { seq: u64, book: Book },
    SearchFailed { seq: u64, message: String },
    HistoryLoaded { records: Vec<SearchRecord> },
    HistoryFailed { message: String },
}

/// The two view configurations: login form, or the full app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Browse,
}

/// Which login field receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Username,
    Password,
}

/// State of the search result area.
#[derive(Debug)]
pub enum ResultArea {
    Empty,
    /// Transient indicator while a lookup is in flight.
    Searching,
    /// Inline failure message replacing the indicator.
    Message(String),
    Card(Card),
}

/// State of the history section.
#[derive(Debug)]
pub enum HistoryView {
    Loading,
    Loaded(Vec<SearchRecord>),
    Failed(String),
}

/// Main TUI application state.
///
/// All mutable state lives here and is only touched from the UI task;
/// network tasks communicate back through the event channel.
pub struct App {
    pub screen: Screen,
    pub should_quit: bool,

    session: Session,
    api: Arc<dyn BookApi>,
    shelf: ShelfLoader,
    search: SearchFlow,
    history: HistoryPanel,
    events_tx: mpsc::UnboundedSender<UiEvent>,
    events_rx: mpsc::UnboundedReceiver<UiEvent>,

    // Login form
    pub username: String,
    pub password: String,
    pub login_field: LoginField,
    login_pending: bool,

    // Browse view
    pub search_input: String,
    pub shelf_cards: Vec<Card>,
    pub result: ResultArea,
    pub history_view: HistoryView,
    /// Focused card: shelf indices first, then the result card.
    pub focus: Option<usize>,
    pub scroll: u16,

    /// One-line status/prompt area (the alert() replacement).
    pub status: Option<String>,
}

impl App {
    /// Create the app. `session` should already be restored by the caller;
    /// a present session skips the login form entirely.
    pub fn new(api: Arc<dyn BookApi>, session: Session, shelf_titles: Vec<String>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let shelf = ShelfLoader::new(Arc::clone(&api), events_tx.clone(), shelf_titles);
        let search = SearchFlow::new(Arc::clone(&api), events_tx.clone());
        let history = HistoryPanel::new(Arc::clone(&api), events_tx.clone());

        let mut app = Self {
            screen: Screen::Login,
            should_quit: false,
            session,
            api,
            shelf,
            search,
            history,
            events_tx,
            events_rx,
            username: String::new(),
            password: String::new(),
            login_field: LoginField::Username,
            login_pending: false,
            search_input: String::new(),
            shelf_cards: Vec::new(),
            result: ResultArea::Empty,
            history_view: HistoryView::Loading,
            focus: None,
            scroll: 0,
            status: None,
        };

        if app.session.is_logged_in() {
            app.show_app();
        }
        app
    }

    /// The current user id, if logged in.
    pub fn user_id(&self) -> Option<&str> {
        self.session.user_id()
    }

    /// Drain pending events from background tasks.
    pub fn update(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply(event);
        }
    }

    fn apply(&mut self, event: UiEvent) {
        match event {
            UiEvent::LoggedIn { user_id } => {
                self.login_pending = false;
                self.status = None;
                self.password.clear();
                if let Err(err) = self.session.login(user_id) {
                    warn!(%err, "could not persist session");
                }
                self.show_app();
            }
            UiEvent::LoginFailed { message } => {
                self.login_pending = false;
                self.status = Some(message);
            }
            UiEvent::ShelfCard { book } => {
                if self.screen == Screen::Browse {
                    self.shelf_cards.push(Card::new(book));
                }
            }
            UiEvent::SearchResult { seq, book } => {
                // Stale responses (an earlier dispatch finishing late) are
                // dropped instead of overwriting the newer result.
                if self.screen == Screen::Browse && self.search.is_current(seq) {
                    self.result = ResultArea::Card(Card::new(book));
                    self.history.refresh(self.session.user_id());
                }
            }
            UiEvent::SearchFailed { seq, message } => {
                if self.screen == Screen::Browse && self.search.is_current(seq) {
                    self.result = ResultArea::Message(message);
                }
            }
            UiEvent::HistoryLoaded { records } => {
                if self.screen == Screen::Browse {
                    self.history_view = HistoryView::Loaded(records);
                }
            }
            UiEvent::HistoryFailed { message } => {
                if self.screen == Screen::Browse {
                    self.history_view = HistoryView::Failed(message);
                }
            }
        }
    }

    /// Submit the login form.
    pub(crate) fn submit_login(&mut self) {
        let username = self.username.trim().to_string();
        let password = self.password.trim().to_string();
        if username.is_empty() || password.is_empty() {
            self.status = Some("Enter both username and password".to_string());
            return;
        }
        if self.login_pending {
            return;
        }
        self.login_pending = true;
        self.status = Some("Logging in…".to_string());

        let api = Arc::clone(&self.api);
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let event = match api.login(&username, &password).await {
                Ok(user_id) => UiEvent::LoggedIn { user_id },
                Err(err) => UiEvent::LoginFailed {
                    message: err.to_string(),
                },
            };
            let _ = events.send(event);
        });
    }

    /// Submit the finder input.
    pub(crate) fn submit_search(&mut self) {
        let title = self.search_input.clone();
        match self.search.dispatch(&title, self.session.user_id()) {
            SearchDispatch::Started(_) => {
                self.result = ResultArea::Searching;
            }
            SearchDispatch::EmptyInput => {}
            SearchDispatch::NoSession => {
                self.status = Some("Log in first".to_string());
            }
        }
    }

    /// Clear the current user's history.
    pub(crate) fn clear_history(&mut self) {
        self.history.clear(self.session.user_id());
    }

    /// Log out and return to the login form.
    pub(crate) fn logout(&mut self) {
        if let Err(err) = self.session.logout() {
            warn!(%err, "could not clear persisted session");
        }
        self.hide_app();
    }

    /// Move card focus to the next card (shelf cards, then the result).
    pub(crate) fn cycle_focus(&mut self) {
        let count =
            self.shelf_cards.len() + usize::from(matches!(self.result, ResultArea::Card(_)));
        if count == 0 {
            self.focus = None;
            return;
        }
        self.focus = Some(self.focus.map_or(0, |i| (i + 1) % count));
    }

    /// Toggle the focused card's long description.
    pub(crate) fn toggle_focused(&mut self) {
        let Some(i) = self.focus else { return };
        if let Some(card) = self.shelf_cards.get_mut(i) {
            card.toggle();
        } else if let ResultArea::Card(card) = &mut self.result {
            card.toggle();
        }
    }

    /// Switch to the app view and kick off its initial loads.
    fn show_app(&mut self) {
        self.screen = Screen::Browse;
        self.shelf_cards.clear();
        self.result = ResultArea::Empty;
        self.history_view = HistoryView::Loading;
        self.focus = None;
        self.scroll = 0;
        self.shelf.load();
        self.history.refresh(self.session.user_id());
    }

    /// Switch back to the login form, dropping all per-session view state.
    fn hide_app(&mut self) {
        self.screen = Screen::Login;
        self.username.clear();
        self.password.clear();
        self.login_field = LoginField::Username;
        self.search_input.clear();
        self.shelf_cards.clear();
        self.result = ResultArea::Empty;
        self.history_view = HistoryView::Loading;
        self.focus = None;
        self.scroll = 0;
        self.status = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{book, MockApi};

    fn app_with(api: Arc<MockApi>, dir: &tempfile::TempDir) -> App {
        let session = Session::new(dir.path().join("session.json")).unwrap();
        let titles = vec!["uno".to_string()];
        App::new(api, session, titles)
    }

    #[tokio::test]
    async fn test_starts_on_login_screen_without_session() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_with(Arc::new(MockApi::new()), &dir);
        assert_eq!(app.screen, Screen::Login);
    }

    #[tokio::test]
    async fn test_restored_session_skips_login_form() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut session = Session::new(dir.path().join("session.json")).unwrap();
            session.login("42".to_string()).unwrap();
        }
        let mut session = Session::new(dir.path().join("session.json")).unwrap();
        session.restore().unwrap();
        let app = App::new(Arc::new(MockApi::new()), session, Vec::new());

        assert_eq!(app.screen, Screen::Browse);
        assert_eq!(app.user_id(), Some("42"));
    }

    #[tokio::test]
    async fn test_login_event_toggles_to_browse() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with(Arc::new(MockApi::new()), &dir);

        app.apply(UiEvent::LoggedIn {
            user_id: "42".to_string(),
        });
        assert_eq!(app.screen, Screen::Browse);

        app.logout();
        assert_eq!(app.screen, Screen::Login);
        assert_eq!(app.user_id(), None);
    }

    #[tokio::test]
    async fn test_empty_search_leaves_result_area_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with(Arc::new(MockApi::new()), &dir);
        app.apply(UiEvent::LoggedIn {
            user_id: "42".to_string(),
        });

        app.search_input = "   ".to_string();
        app.submit_search();
        assert!(matches!(app.result, ResultArea::Empty));
    }

    #[tokio::test]
    async fn test_stale_search_result_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(
            MockApi::new()
                .with_book("uno", book("Uno"))
                .with_book("dos", book("Dos")),
        );
        let mut app = app_with(api, &dir);
        app.apply(UiEvent::LoggedIn {
            user_id: "42".to_string(),
        });

        app.search_input = "uno".to_string();
        app.submit_search();
        app.search_input = "dos".to_string();
        app.submit_search();

        // First response arrives after the second dispatch: stale.
        app.apply(UiEvent::SearchResult {
            seq: 1,
            book: book("Uno"),
        });
        assert!(
            matches!(app.result, ResultArea::Searching),
            "stale result must not win the result area"
        );

        app.apply(UiEvent::SearchResult {
            seq: 2,
            book: book("Dos"),
        });
        match &app.result {
            ResultArea::Card(card) => assert_eq!(card.book.title, "Dos"),
            other => panic!("unexpected result area: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_shelf_card_ignored_on_login_screen() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with(Arc::new(MockApi::new()), &dir);

        app.apply(UiEvent::ShelfCard { book: book("Uno") });
        assert!(app.shelf_cards.is_empty());
    }

    #[tokio::test]
    async fn test_focus_cycles_over_shelf_and_result() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with(Arc::new(MockApi::new()), &dir);
        app.apply(UiEvent::LoggedIn {
            user_id: "42".to_string(),
        });
        app.apply(UiEvent::ShelfCard { book: book("Uno") });
        app.apply(UiEvent::ShelfCard { book: book("Dos") });
        app.search_input = "tres".to_string();
        app.submit_search();
        app.apply(UiEvent::SearchResult {
            seq: 1,
            book: book("Tres"),
        });

        app.cycle_focus();
        assert_eq!(app.focus, Some(0));
        app.cycle_focus();
        app.cycle_focus();
        assert_eq!(app.focus, Some(2));
        app.cycle_focus();
        assert_eq!(app.focus, Some(0));

        app.toggle_focused();
        assert!(app.shelf_cards[0].expanded);
    }

    #[tokio::test]
    async fn test_invalid_login_surfaces_status() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with(Arc::new(MockApi::new()), &dir);

        app.apply(UiEvent::LoginFailed {
            message: "Invalid credentials".to_string(),
        });
        assert_eq!(app.status.as_deref(), Some("Invalid credentials"));
        assert_eq!(app.screen, Screen::Login);
    }
}
