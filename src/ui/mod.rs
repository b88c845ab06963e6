//! Server-rendered HTML.
//!
//! Pages and fragments are plain strings built with `format!`; every piece of
//! visitor or endpoint text goes through [`escape_html`].
//!
//! # Structure
//!
//! - [`landing`]: page shell and welcome content
//! - [`widget`]: chat widget markup and the fragments streamed over SSE
//! - [`icons`]: inline SVG icons

pub mod icons;
pub mod landing;
pub mod widget;

/// Escape text for use in element content and quoted attribute values.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
