#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Syntax highlighting for fenced code blocks in `ctfboard` descriptions.
//!
//! Highlighted code is emitted as `<span class="hl-...">` runs so the page
//! stylesheet (see [`CodeHighlighter::stylesheet`]) controls the colors and
//! no inline `style` attribute has to survive sanitization.

use std::sync::LazyLock;

use syntect::highlighting::ThemeSet;
use syntect::html::{ClassStyle, ClassedHTMLGenerator, css_for_theme_with_class_style};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

/// Class naming used for highlight spans, e.g. `hl-keyword hl-control`.
pub const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hl-" };

/// Theme used when none is configured.
pub const DEFAULT_THEME: &str = "base16-ocean.dark";

static SHARED: LazyLock<CodeHighlighter> = LazyLock::new(CodeHighlighter::new);

/// Errors that can occur while highlighting.
#[derive(Debug, thiserror::Error)]
pub enum HighlightError {
    /// No syntax definition matches the language token.
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// No bundled theme has this name.
    #[error("Unknown theme: {0}")]
    UnknownTheme(String),

    /// syntect failed while parsing or generating output.
    #[error("Failed to highlight: {0}")]
    Syntect(#[from] syntect::Error),
}

pub struct CodeHighlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl CodeHighlighter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
        }
    }

    /// Process-wide highlighter, loaded on first use.
    #[must_use]
    pub fn shared() -> &'static Self {
        &SHARED
    }

    /// Looks up the syntax for a fence language token.
    ///
    /// Plain text is treated as unsupported: it gets no highlighting.
    #[must_use]
    pub fn find_syntax(&self, language: &str) -> Option<&SyntaxReference> {
        let token = normalize_language(language);
        if token.is_empty() {
            return None;
        }
        self.syntax_set
            .find_syntax_by_token(&token)
            .filter(|syntax| syntax.name != "Plain Text")
    }

    #[must_use]
    pub fn supports(&self, language: &str) -> bool {
        self.find_syntax(language).is_some()
    }

    /// Highlights `code` as classed HTML. The result is already escaped.
    ///
    /// # Errors
    ///
    /// * [`HighlightError::UnsupportedLanguage`] if no syntax matches `language`
    /// * [`HighlightError::Syntect`] if syntect fails on the input
    pub fn highlight_html(&self, language: &str, code: &str) -> Result<String, HighlightError> {
        let syntax = self
            .find_syntax(language)
            .ok_or_else(|| HighlightError::UnsupportedLanguage(language.to_string()))?;

        log::trace!("highlight_html: language={language} syntax={}", syntax.name);

        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntax_set, CLASS_STYLE);
        for line in LinesWithEndings::from(code) {
            generator.parse_html_for_line_which_includes_newline(line)?;
        }

        Ok(generator.finalize())
    }

    /// CSS rules for the highlight classes in the given theme.
    ///
    /// # Errors
    ///
    /// * [`HighlightError::UnknownTheme`] if `theme` is not a bundled theme
    /// * [`HighlightError::Syntect`] if the CSS cannot be generated
    pub fn stylesheet(&self, theme: &str) -> Result<String, HighlightError> {
        let theme = self
            .theme_set
            .themes
            .get(theme)
            .ok_or_else(|| HighlightError::UnknownTheme(theme.to_string()))?;

        Ok(css_for_theme_with_class_style(theme, CLASS_STYLE)?)
    }

    /// Names of the bundled themes, sorted.
    #[must_use]
    pub fn theme_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.theme_set.themes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for CodeHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps the names people actually write on fences to syntect tokens.
fn normalize_language(language: &str) -> String {
    let language = language.trim().to_ascii_lowercase();
    match language.as_str() {
        "shell" | "zsh" | "console" => "sh".to_string(),
        "javascript" | "node" => "js".to_string(),
        "python3" | "py3" => "py".to_string(),
        "c++" => "cpp".to_string(),
        "golang" => "go".to_string(),
        "c#" | "csharp" => "cs".to_string(),
        _ => language,
    }
}
