//! Direct crossterm terminal wrapper.
//!
//! Minimal abstraction for the alternate-screen UI: styled spans and lines
//! plus a full-frame synchronized redraw, so a frame never flickers while
//! sections (shelf, finder, history) repaint.

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute,
    style::{Attribute, Color, ContentStyle, StyledContent},
    terminal::{self, BeginSynchronizedUpdate, Clear, ClearType, EndSynchronizedUpdate},
};
use std::io::{self, Write};
use unicode_width::UnicodeWidthStr;

/// A styled span of text.
#[derive(Clone, Debug)]
pub struct StyledSpan {
    pub content: String,
    pub style: ContentStyle,
}

impl StyledSpan {
    /// Create an unstyled span.
    pub fn raw(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            style: ContentStyle::new(),
        }
    }

    /// Create a span with foreground color.
    pub fn colored(content: impl Into<String>, color: Color) -> Self {
        Self {
            content: content.into(),
            style: ContentStyle {
                foreground_color: Some(color),
                ..ContentStyle::default()
            },
        }
    }

    /// Create a dim span.
    pub fn dim(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            style: ContentStyle {
                attributes: Attribute::Dim.into(),
                ..ContentStyle::default()
            },
        }
    }

    /// Create a bold span.
    pub fn bold(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            style: ContentStyle {
                attributes: Attribute::Bold.into(),
                ..ContentStyle::default()
            },
        }
    }

    /// Write this span to a writer.
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let styled = StyledContent::new(self.style, &self.content);
        write!(w, "{}", styled)
    }
}

/// A line of styled text.
#[derive(Clone, Debug, Default)]
pub struct StyledLine {
    pub spans: Vec<StyledSpan>,
}

impl StyledLine {
    /// Create a new line from spans.
    pub fn new(spans: Vec<StyledSpan>) -> Self {
        Self { spans }
    }

    /// Create an empty line.
    pub fn empty() -> Self {
        Self { spans: Vec::new() }
    }

    /// Create a line from a single raw string.
    pub fn raw(content: impl Into<String>) -> Self {
        Self {
            spans: vec![StyledSpan::raw(content)],
        }
    }

    /// Push a span to this line.
    pub fn push(&mut self, span: StyledSpan) {
        self.spans.push(span);
    }

    /// Plain-text content of the line, all spans concatenated.
    #[must_use]
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.content.as_str()).collect()
    }

    /// Display width of the line.
    #[must_use]
    pub fn width(&self) -> usize {
        self.spans
            .iter()
            .map(|s| UnicodeWidthStr::width(s.content.as_str()))
            .sum()
    }

    /// Write this line to a writer.
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        for span in &self.spans {
            span.write_to(w)?;
        }
        Ok(())
    }
}

/// Builder for creating styled lines.
pub struct LineBuilder {
    line: StyledLine,
}

impl LineBuilder {
    /// Create a new line builder.
    pub fn new() -> Self {
        Self {
            line: StyledLine::empty(),
        }
    }

    /// Add a raw (unstyled) span.
    pub fn raw(mut self, content: impl Into<String>) -> Self {
        self.line.push(StyledSpan::raw(content));
        self
    }

    /// Add a colored span.
    pub fn colored(mut self, content: impl Into<String>, color: Color) -> Self {
        self.line.push(StyledSpan::colored(content, color));
        self
    }

    /// Add a dim span.
    pub fn dim(mut self, content: impl Into<String>) -> Self {
        self.line.push(StyledSpan::dim(content));
        self
    }

    /// Add a bold span.
    pub fn bold(mut self, content: impl Into<String>) -> Self {
        self.line.push(StyledSpan::bold(content));
        self
    }

    /// Build the line.
    pub fn build(self) -> StyledLine {
        self.line
    }
}

impl Default for LineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Terminal wrapper for direct crossterm rendering.
pub struct Terminal {
    width: u16,
    height: u16,
}

impl Terminal {
    /// Create a new terminal wrapper.
    pub fn new() -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self { width, height })
    }

    /// Update terminal size (call on resize event).
    pub fn update_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    /// Get terminal width.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Get terminal height.
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Redraw the whole frame inside a synchronized update.
    ///
    /// Callers scroll their content before drawing; lines beyond the
    /// terminal height are dropped. The cursor is parked at `cursor`, or
    /// hidden when no position is given.
    pub fn draw(&self, lines: &[StyledLine], cursor: Option<(u16, u16)>) -> io::Result<()> {
        let mut stdout = io::stdout();
        execute!(stdout, BeginSynchronizedUpdate, Hide)?;
        execute!(stdout, MoveTo(0, 0), Clear(ClearType::All))?;

        for (row, line) in lines.iter().take(self.height as usize).enumerate() {
            execute!(stdout, MoveTo(0, row as u16))?;
            line.write_to(&mut stdout)?;
        }

        if let Some((x, y)) = cursor {
            execute!(stdout, MoveTo(x, y), Show)?;
        }
        execute!(stdout, EndSynchronizedUpdate)?;
        stdout.flush()
    }
}
