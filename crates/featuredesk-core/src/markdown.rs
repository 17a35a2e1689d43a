//! # Markdown Rendering
//!
//! Turns feature descriptions into HTML for display.
//!
//! Rendering is two-stage:
//! 1. `pulldown-cmark` with tables, strikethrough and footnotes. Raw HTML in
//!    the source is re-emitted as text, so it comes out escaped.
//! 2. An `ammonia` allow-list pass over the generated HTML.
//!
//! A [`MarkdownRenderer`] is built once and shared; it has no mutable state.

use ammonia::Builder;
use pulldown_cmark::{Event, Options, Parser, html};

/// Markdown-to-HTML renderer with a built-in sanitizer.
#[derive(Debug)]
pub struct MarkdownRenderer {
    options: Options,
    sanitizer: Builder<'static>,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer {
    /// Build a renderer with the standard extension set.
    #[must_use]
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_FOOTNOTES);

        let mut sanitizer = Builder::default();
        // Keep `language-*` classes on fenced code and leave links untouched.
        sanitizer
            .link_rel(None)
            .add_tag_attributes("code", &["class"]);

        Self { options, sanitizer }
    }

    /// Render Markdown to sanitized HTML. Blank input gives an empty string.
    #[must_use]
    pub fn render_to_html(&self, markdown: &str) -> String {
        if markdown.trim().is_empty() {
            return String::new();
        }

        let parser = Parser::new_ext(markdown, self.options).map(|event| match event {
            Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
            other => other,
        });

        let mut rendered = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut rendered, parser);

        self.sanitize_html(&rendered)
    }

    /// Strip everything outside the allow-list from `html`.
    /// Blank input gives an empty string.
    #[must_use]
    pub fn sanitize_html(&self, html: &str) -> String {
        if html.trim().is_empty() {
            return String::new();
        }
        self.sanitizer.clean(html).to_string()
    }
}
