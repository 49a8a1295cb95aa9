#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Rendering of user-authored problem and contest descriptions.
//!
//! Source text is split around fenced code blocks, parsed into a
//! [`Document`], rendered to HTML once and passed through an allow-list
//! sanitizer. Rendering is total: malformed markup degrades to literal text.

pub mod block;
pub mod clipboard;
pub mod fence;
pub mod html;
pub mod inline;
pub mod list;
pub mod options;
pub mod sanitize;
pub mod table;

use std::sync::LazyLock;

use ctfboard_markdown_models::{Block, Document};
use ctfboard_syntax::{CodeHighlighter, HighlightError};

pub use clipboard::clipboard_script;
pub use fence::{Segment, extract_code_blocks};
pub use inline::parse_inlines;
pub use options::RenderOptions;
pub use sanitize::sanitize_html;

static DEFAULT_RENDERER: LazyLock<MarkdownRenderer> = LazyLock::new(MarkdownRenderer::default);

/// Renders `markdown` to sanitized HTML with default options.
#[must_use]
pub fn render_markdown(markdown: &str) -> String {
    DEFAULT_RENDERER.render(markdown)
}

/// Parses `source` into a document tree.
#[must_use]
pub fn parse_document(source: &str) -> Document {
    let mut blocks = Vec::new();
    for segment in extract_code_blocks(source) {
        match segment {
            Segment::Text(text) => blocks.extend(block::parse_blocks(&text)),
            Segment::Code(code) => blocks.push(Block::CodeBlock(code)),
        }
    }

    log::debug!(
        "parse_document: {} bytes -> {} blocks",
        source.len(),
        blocks.len()
    );

    Document { blocks }
}

pub struct MarkdownRenderer {
    options: RenderOptions,
    highlighter: &'static CodeHighlighter,
}

impl MarkdownRenderer {
    #[must_use]
    pub fn new(options: RenderOptions) -> Self {
        Self::with_highlighter(options, CodeHighlighter::shared())
    }

    #[must_use]
    pub const fn with_highlighter(
        options: RenderOptions,
        highlighter: &'static CodeHighlighter,
    ) -> Self {
        Self {
            options,
            highlighter,
        }
    }

    /// Renders `source` to HTML, sanitized unless disabled in the options.
    #[must_use]
    pub fn render(&self, source: &str) -> String {
        if source.is_empty() {
            return String::new();
        }

        let html = self.render_unsanitized(source);
        if self.options.sanitize {
            sanitize_html(&html)
        } else {
            html
        }
    }

    /// Renders `source` to HTML without the sanitizer pass.
    #[must_use]
    pub fn render_unsanitized(&self, source: &str) -> String {
        self.render_document(&parse_document(source))
    }

    /// Renders an already parsed document without sanitizing it.
    #[must_use]
    pub fn render_document(&self, document: &Document) -> String {
        html::render_document(document, self.highlighter, &self.options)
    }

    /// CSS for the highlight classes in the configured theme.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured theme does not exist.
    pub fn stylesheet(&self) -> Result<String, HighlightError> {
        self.highlighter.stylesheet(&self.options.theme)
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}
