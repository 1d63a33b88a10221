//! Book card rendering.
//!
//! Pure mapping from a [`Book`] to styled lines, shared by the shelf and
//! the search result area. The long description sits behind an
//! expand/collapse toggle, like the `<details>` element it replaces.

use crate::api::Book;
use crate::tui::terminal::{LineBuilder, StyledLine, StyledSpan};
use crossterm::style::Color;
use unicode_width::UnicodeWidthStr;

/// A displayable book card.
#[derive(Debug, Clone)]
pub struct Card {
    pub book: Book,
    /// Whether the long description is shown.
    pub expanded: bool,
}

impl Card {
    /// Create a collapsed card for a book.
    #[must_use]
    pub fn new(book: Book) -> Self {
        Self {
            book,
            expanded: false,
        }
    }

    /// Toggle the long description.
    pub fn toggle(&mut self) {
        self.expanded = !self.expanded;
    }

    /// Render the card as styled lines, wrapped to `width` columns.
    #[must_use]
    pub fn render(&self, width: usize) -> Vec<StyledLine> {
        let width = width.max(20);
        let mut lines = Vec::new();

        lines.push(StyledLine::new(vec![StyledSpan::bold(&self.book.title)]));
        lines.push(StyledLine::new(vec![StyledSpan::colored(
            self.book.authors_joined(),
            Color::Cyan,
        )]));
        if !self.book.image.is_empty() {
            lines.push(StyledLine::new(vec![StyledSpan::dim(&self.book.image)]));
        }
        for chunk in wrap(&self.book.description_short, width) {
            lines.push(StyledLine::raw(chunk));
        }

        let marker = if self.expanded { "▾" } else { "▸" };
        lines.push(
            LineBuilder::new()
                .dim(format!("{marker} Full description"))
                .build(),
        );
        if self.expanded {
            for chunk in wrap(&self.book.description_long, width) {
                lines.push(StyledLine::new(vec![StyledSpan::raw(format!(
                    "  {chunk}"
                ))]));
            }
        }

        lines
    }
}

/// Greedy word wrap by display width.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        let word_width = UnicodeWidthStr::width(word);
        if current_width > 0 && current_width + 1 + word_width > width {
            out.push(std::mem::take(&mut current));
            current_width = 0;
        }
        if current_width > 0 {
            current.push(' ');
            current_width += 1;
        }
        current.push_str(word);
        current_width += word_width;
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}
