#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Document tree models for `ctfboard` description rendering.
//!
//! A description is parsed once into a [`Document`] of [`Block`]s whose text
//! content is made of [`Inline`] runs, and rendered once from that tree.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// A parsed description.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Document {
    pub blocks: Vec<Block>,
}

/// A run of inline content, e.g. one line of a paragraph.
pub type InlineRun = Vec<Inline>;

/// Block-level node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Heading {
        level: HeadingLevel,
        content: InlineRun,
    },
    /// Lines of a paragraph, rendered with line breaks between them.
    Paragraph { lines: Vec<InlineRun> },
    CodeBlock(CodeBlock),
    List(List),
    Table(Table),
    /// Lines of a blockquote, rendered with line breaks between them.
    Blockquote { lines: Vec<InlineRun> },
    Admonition {
        kind: AdmonitionKind,
        content: InlineRun,
    },
    ThematicBreak,
}

/// A fenced code block.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CodeBlock {
    /// Language token from the opening fence, if any.
    pub language: Option<String>,
    /// Raw code, lines joined with `\n`, no trailing newline.
    pub code: String,
}

/// Heading level in `1..=6`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub struct HeadingLevel(u8);

/// Error returned when a heading level is outside `1..=6`.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid heading level: {0}")]
pub struct InvalidHeadingLevel(pub u8);

impl HeadingLevel {
    /// # Errors
    ///
    /// Returns [`InvalidHeadingLevel`] if `level` is not in `1..=6`.
    pub const fn new(level: u8) -> Result<Self, InvalidHeadingLevel> {
        if matches!(level, 1..=6) {
            Ok(Self(level))
        } else {
            Err(InvalidHeadingLevel(level))
        }
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for HeadingLevel {
    type Error = InvalidHeadingLevel;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<HeadingLevel> for u8 {
    fn from(value: HeadingLevel) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    Unordered,
    Ordered,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct List {
    pub kind: ListKind,
    pub items: Vec<ListItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListItem {
    /// 1-based position of the item within its list.
    ///
    /// Ordered lists render this number instead of whatever the author typed.
    pub index: usize,
    pub content: InlineRun,
}

/// Column alignment taken from a table's separator row.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    #[default]
    None,
    Left,
    Center,
    Right,
}

impl Alignment {
    /// CSS class used for the aligned cell, if any.
    #[must_use]
    pub const fn class(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Left => Some("md-align-left"),
            Self::Center => Some("md-align-center"),
            Self::Right => Some("md-align-right"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Table {
    /// One entry per header column.
    pub alignments: Vec<Alignment>,
    pub header: Vec<InlineRun>,
    pub rows: Vec<Vec<InlineRun>>,
}

/// Callout box kind.
///
/// Accepts the English names and the Korean labels used on the platform,
/// ignoring ASCII case.
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Hash,
    EnumString,
    Display,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum AdmonitionKind {
    #[strum(to_string = "note", serialize = "참고")]
    Note,
    #[strum(to_string = "warning", serialize = "주의")]
    Warning,
    #[strum(to_string = "danger", serialize = "위험")]
    Danger,
}

impl AdmonitionKind {
    /// Title shown at the top of the box.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Note => "참고",
            Self::Warning => "주의",
            Self::Danger => "위험",
        }
    }
}

/// Inline node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Inline {
    Text { text: String },
    Code { code: String },
    Strong { children: InlineRun },
    Emphasis { children: InlineRun },
    Strikethrough { children: InlineRun },
    Highlight { children: InlineRun },
    Link { href: String, children: InlineRun },
    Image { src: String, alt: String },
    Autolink { url: String },
    Checkbox { checked: bool },
}

impl Inline {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Concatenated text content without markup.
    #[must_use]
    pub fn plain_text(&self) -> String {
        match self {
            Self::Text { text } => text.clone(),
            Self::Code { code } => code.clone(),
            Self::Autolink { url } => url.clone(),
            Self::Image { alt, .. } => alt.clone(),
            Self::Checkbox { .. } => String::new(),
            Self::Strong { children }
            | Self::Emphasis { children }
            | Self::Strikethrough { children }
            | Self::Highlight { children }
            | Self::Link { children, .. } => children.iter().map(Self::plain_text).collect(),
        }
    }
}
