//! Session transcript
//!
//! Ordered list of displayed chat messages. Entries are appended in display
//! order, never reordered, and never removed except the transient loading
//! placeholder shown while a request is in flight. Nothing is persisted; the
//! transcript lives for the page session only.

use crate::render;

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    /// The local user (typed or spoken input)
    User,
    /// The remote assistant
    Bot,
}

/// A single chat message, immutable once created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Raw message text (markdown source for bot messages)
    pub text: String,
    /// Message author
    pub sender: Sender,
}

/// A displayed transcript entry: the message plus its rendered HTML
#[derive(Debug, Clone)]
pub struct Entry {
    /// The underlying message
    pub message: Message,
    /// HTML as inserted into the display area
    pub html: String,
}

/// Ordered list of displayed chat messages for the session
#[derive(Debug, Default)]
pub struct Transcript {
    entries: Vec<Entry>,
    loading: bool,
}

impl Transcript {
    /// Create an empty transcript
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a user message; the text is escaped, never parsed as markup
    pub fn push_user(&mut self, text: &str) {
        self.entries.push(Entry {
            html: render::escape_text(text),
            message: Message {
                text: text.to_string(),
                sender: Sender::User,
            },
        });
        tracing::debug!(entries = self.entries.len(), "user message appended");
    }

    /// Append a bot message rendered from markdown
    pub fn push_bot(&mut self, text: &str) {
        self.entries.push(Entry {
            html: render::markdown_to_html(text),
            message: Message {
                text: text.to_string(),
                sender: Sender::Bot,
            },
        });
        tracing::debug!(entries = self.entries.len(), "bot message appended");
    }

    /// Show the transient loading placeholder
    pub fn show_loading(&mut self) {
        self.loading = true;
    }

    /// Remove the loading placeholder if present
    pub fn clear_loading(&mut self) {
        self.loading = false;
    }

    /// Whether the loading placeholder is currently displayed
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// All entries in display order
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// The newest entry, the one the display area scrolls to
    #[must_use]
    pub fn newest(&self) -> Option<&Entry> {
        self.entries.last()
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the transcript has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
