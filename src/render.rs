//! Message rendering
//!
//! Bot messages are markdown and rendered to HTML. User messages are plain
//! text and escaped, never interpreted as markup. Bot text may carry a pair
//! of sentinel markers delimiting a quoted devis section; they stay visible
//! in the rendered output but are stripped from the text handed to speech
//! synthesis.

use pulldown_cmark::{Options, Parser, html};
use pulldown_cmark_escape::escape_html;

/// Start marker of a quoted devis section in bot text
pub const DOC_START_MARKER: &str = "---DEVIS START---";

/// End marker of a quoted devis section in bot text
pub const DOC_END_MARKER: &str = "---DEVIS END---";

/// Render markdown source to HTML
#[must_use]
pub fn markdown_to_html(source: &str) -> String {
    let parser = Parser::new_ext(source, Options::empty());
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

/// Escape plain text for insertion into HTML
#[must_use]
pub fn escape_text(text: &str) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = escape_html(&mut out, text);
    out
}

/// Remove the devis markers from text before speech synthesis
#[must_use]
pub fn strip_document_markers(text: &str) -> String {
    text.replace(DOC_START_MARKER, "")
        .replace(DOC_END_MARKER, "")
}
