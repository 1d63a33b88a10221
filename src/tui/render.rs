//! Screen composition: app state to styled lines.
//!
//! Both views are composed into one line vector, then the scroll offset is
//! applied. The cursor position is tracked while composing so it survives
//! scrolling (hidden when its line is off-screen).

use crate::history;
use crate::tui::terminal::{LineBuilder, StyledLine, StyledSpan};
use crate::tui::{App, HistoryView, LoginField, ResultArea, Screen};
use crossterm::style::Color;
use unicode_width::UnicodeWidthStr;

const CARD_INDENT: usize = 2;

/// A composed frame: visible lines plus an optional cursor position.
pub(crate) struct Frame {
    pub lines: Vec<StyledLine>,
    pub cursor: Option<(u16, u16)>,
}

/// Render the current screen into a frame of `height` lines.
pub(crate) fn render(app: &App, width: u16, height: u16) -> Frame {
    let width = width.max(20) as usize;
    let (lines, cursor_at) = match app.screen {
        Screen::Login => login_view(app),
        Screen::Browse => browse_view(app, width),
    };

    // Apply scroll, clamped so the last line can always reach the top.
    let max_scroll = lines.len().saturating_sub(1) as u16;
    let scroll = app.scroll.min(max_scroll);
    let visible: Vec<StyledLine> = lines.into_iter().skip(scroll as usize).collect();

    let cursor = cursor_at.and_then(|(col, row)| {
        let row = row.checked_sub(scroll as usize)?;
        if row < height as usize {
            Some((col as u16, row as u16))
        } else {
            None
        }
    });

    Frame {
        lines: visible,
        cursor,
    }
}

/// The login form: {login visible, app hidden}.
fn login_view(app: &App) -> (Vec<StyledLine>, Option<(usize, usize)>) {
    let mut lines = vec![
        LineBuilder::new()
            .bold("estante")
            .dim(format!(" v{}", env!("CARGO_PKG_VERSION")))
            .build(),
        StyledLine::empty(),
        StyledLine::raw("Log in to your book shelf"),
        StyledLine::empty(),
    ];

    let masked: String = "•".repeat(app.password.chars().count());
    let username_row = lines.len();
    lines.push(field_line(
        "Username: ",
        &app.username,
        app.login_field == LoginField::Username,
    ));
    let password_row = lines.len();
    lines.push(field_line(
        "Password: ",
        &masked,
        app.login_field == LoginField::Password,
    ));

    lines.push(StyledLine::empty());
    if let Some(status) = &app.status {
        lines.push(StyledLine::new(vec![StyledSpan::colored(
            status,
            Color::Red,
        )]));
    } else {
        lines.push(StyledLine::empty());
    }
    lines.push(StyledLine::empty());
    lines.push(
        LineBuilder::new()
            .dim("Enter log in · Tab switch field · Ctrl+C quit")
            .build(),
    );

    let (row, value) = match app.login_field {
        LoginField::Username => (username_row, app.username.as_str()),
        LoginField::Password => (password_row, masked.as_str()),
    };
    let col = CARD_INDENT + UnicodeWidthStr::width("Username: ") + UnicodeWidthStr::width(value);
    (lines, Some((col, row)))
}

/// The app view: shelf, finder, and history sections.
fn browse_view(app: &App, width: usize) -> (Vec<StyledLine>, Option<(usize, usize)>) {
    let mut lines = vec![
        LineBuilder::new()
            .bold("estante")
            .dim(format!(" · user {}", app.user_id().unwrap_or("?")))
            .build(),
        StyledLine::empty(),
    ];

    // Shelf
    lines.push(section_header("Shelf"));
    if app.shelf_cards.is_empty() {
        lines.push(LineBuilder::new().dim("  Loading shelf…").build());
    }
    for (i, card) in app.shelf_cards.iter().enumerate() {
        push_card(&mut lines, card.render(width - CARD_INDENT), app.focus == Some(i));
    }
    lines.push(StyledLine::empty());

    // Finder
    lines.push(section_header("Find a book"));
    let input_row = lines.len();
    lines.push(
        LineBuilder::new()
            .colored("> ", Color::Cyan)
            .raw(&app.search_input)
            .build(),
    );
    let cursor = Some((
        2 + UnicodeWidthStr::width(app.search_input.as_str()),
        input_row,
    ));

    match &app.result {
        ResultArea::Empty => {}
        ResultArea::Searching => {
            lines.push(LineBuilder::new().dim("Searching…").build());
        }
        ResultArea::Message(message) => {
            lines.push(StyledLine::new(vec![StyledSpan::colored(
                message,
                Color::Red,
            )]));
        }
        ResultArea::Card(card) => {
            let focused = app.focus == Some(app.shelf_cards.len());
            push_card(&mut lines, card.render(width - CARD_INDENT), focused);
        }
    }
    lines.push(StyledLine::empty());

    // History
    lines.push(section_header("History"));
    match &app.history_view {
        HistoryView::Loading => {
            lines.push(LineBuilder::new().dim("Loading history…").build());
        }
        HistoryView::Loaded(records) => lines.extend(history::render_records(records)),
        HistoryView::Failed(message) => {
            lines.push(StyledLine::new(vec![StyledSpan::colored(
                message,
                Color::Red,
            )]));
        }
    }

    lines.push(StyledLine::empty());
    if let Some(status) = &app.status {
        lines.push(StyledLine::new(vec![StyledSpan::colored(
            status,
            Color::Red,
        )]));
    }
    lines.push(
        LineBuilder::new()
            .dim("Enter search · Tab focus card · Ctrl+O details · Ctrl+K clear history · Ctrl+L log out · Ctrl+C quit")
            .build(),
    );

    (lines, cursor)
}

fn section_header(title: &str) -> StyledLine {
    LineBuilder::new().bold(title).build()
}

fn field_line(label: &str, value: &str, active: bool) -> StyledLine {
    let marker = if active { "❯ " } else { "  " };
    LineBuilder::new()
        .colored(marker, Color::Cyan)
        .raw(label)
        .raw(value)
        .build()
}

/// Append card lines, indented, with a focus marker on the first line.
fn push_card(lines: &mut Vec<StyledLine>, card_lines: Vec<StyledLine>, focused: bool) {
    for (i, mut line) in card_lines.into_iter().enumerate() {
        let prefix = if i == 0 && focused { "❯ " } else { "  " };
        let mut prefixed = StyledLine::new(vec![StyledSpan::colored(prefix, Color::Cyan)]);
        prefixed.spans.append(&mut line.spans);
        lines.push(prefixed);
    }
    lines.push(StyledLine::empty());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{book, MockApi};
    use crate::session::Session;
    use crate::tui::UiEvent;
    use std::sync::Arc;

    fn flatten(lines: &[StyledLine]) -> String {
        lines
            .iter()
            .map(StyledLine::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn logged_in_app(dir: &tempfile::TempDir) -> App {
        let session = Session::new(dir.path().join("session.json")).unwrap();
        let mut app = App::new(Arc::new(MockApi::new()), session, Vec::new());
        app.apply(UiEvent::LoggedIn {
            user_id: "42".to_string(),
        });
        app
    }

    #[tokio::test]
    async fn test_login_view_shows_form_not_app_sections() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::new(dir.path().join("session.json")).unwrap();
        let app = App::new(Arc::new(MockApi::new()), session, Vec::new());

        let frame = render(&app, 80, 24);
        let text = flatten(&frame.lines);
        assert!(text.contains("Username:"));
        assert!(text.contains("Password:"));
        assert!(!text.contains("Shelf"));
        assert!(!text.contains("History"));
    }

    #[tokio::test]
    async fn test_password_is_masked() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::new(dir.path().join("session.json")).unwrap();
        let mut app = App::new(Arc::new(MockApi::new()), session, Vec::new());
        app.password = "secret".to_string();

        let text = flatten(&render(&app, 80, 24).lines);
        assert!(!text.contains("secret"));
        assert!(text.contains("••••••"));
    }

    #[tokio::test]
    async fn test_browse_view_shows_all_sections() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = logged_in_app(&dir);
        app.apply(UiEvent::ShelfCard { book: book("Uno") });
        app.apply(UiEvent::HistoryLoaded {
            records: Vec::new(),
        });

        let text = flatten(&render(&app, 80, 50).lines);
        assert!(text.contains("user 42"));
        assert!(text.contains("Shelf"));
        assert!(text.contains("Uno"));
        assert!(text.contains("Find a book"));
        assert!(text.contains("History"));
        assert!(text.contains("No searches yet"));
    }

    #[tokio::test]
    async fn test_searching_indicator_in_result_area() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = logged_in_app(&dir);
        app.result = ResultArea::Searching;

        let text = flatten(&render(&app, 80, 50).lines);
        assert!(text.contains("Searching…"));
    }

    #[tokio::test]
    async fn test_scroll_clamps_and_hides_cursor() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = logged_in_app(&dir);
        app.scroll = 500;

        let frame = render(&app, 80, 24);
        assert!(!frame.lines.is_empty());
        assert!(frame.cursor.is_none());
    }
}
