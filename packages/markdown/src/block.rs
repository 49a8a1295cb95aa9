//! Line-oriented block parsing.
//!
//! Every line is classified on its own, then fed to a state machine that
//! groups paragraphs, blockquotes, lists and tables. Only one of those can be
//! open at a time; any line that does not continue the open group closes it.

use std::str::FromStr;
use std::sync::LazyLock;

use ctfboard_markdown_models::{
    AdmonitionKind, Alignment, Block, HeadingLevel, InlineRun, ListKind,
};
use regex::Regex;

use crate::inline::parse_inlines;
use crate::list::ListState;
use crate::table::{TableState, parse_separator, split_table_line};

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {0,3}(#{1,6})[ \t]+(\S.*?)[ \t]*$").unwrap());
static RULE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ {0,3}(?:(?:-[ \t]*){3,}|(?:\*[ \t]*){3,}|(?:_[ \t]*){3,})$").unwrap()
});
static ADMONITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {0,3}\[!?([^\]\s]+)\][ \t]*(.*)$").unwrap());
static QUOTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^ {0,3}>[ \t]?(.*)$").unwrap());
static UNORDERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {0,3}[-*+][ \t]+(.*)$").unwrap());
static ORDERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {0,3}\d{1,9}[.)][ \t]+(.*)$").unwrap());
static INDENTED_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?: {4,}| {0,3}\t)[ \t]*(?:[-*+]|\d{1,9}[.)])[ \t]+(.*)$").unwrap()
});

#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Blank,
    Heading(HeadingLevel, &'a str),
    Rule,
    Admonition(AdmonitionKind, &'a str),
    Quote(&'a str),
    Item(ListKind, &'a str),
    /// An item indented past a top-level one: content, then the whole line.
    IndentedItem(&'a str, &'a str),
    TableSeparator(Vec<Alignment>),
    TableRow(Vec<&'a str>),
    Text(&'a str),
}

fn classify(line: &str) -> Line<'_> {
    if line.trim().is_empty() {
        return Line::Blank;
    }

    if let Some(caps) = HEADING.captures(line) {
        let level = caps
            .get(1)
            .and_then(|m| u8::try_from(m.len()).ok())
            .and_then(|l| HeadingLevel::new(l).ok());
        if let Some(level) = level {
            let text = caps.get(2).map_or("", |m| m.as_str());
            return Line::Heading(level, strip_closing_hashes(text));
        }
    }

    if RULE.is_match(line) {
        return Line::Rule;
    }

    if let Some(caps) = ADMONITION.captures(line) {
        let body = caps.get(2).map_or("", |m| m.as_str());
        let kind = caps
            .get(1)
            .and_then(|m| AdmonitionKind::from_str(m.as_str()).ok());
        if let Some(kind) = kind.filter(|_| !body.starts_with('(')) {
            return Line::Admonition(kind, body);
        }
    }

    if let Some(caps) = QUOTE.captures(line) {
        return Line::Quote(caps.get(1).map_or("", |m| m.as_str()));
    }

    if let Some(caps) = UNORDERED_ITEM.captures(line) {
        return Line::Item(ListKind::Unordered, caps.get(1).map_or("", |m| m.as_str()));
    }

    if let Some(caps) = ORDERED_ITEM.captures(line) {
        return Line::Item(ListKind::Ordered, caps.get(1).map_or("", |m| m.as_str()));
    }

    if let Some(caps) = INDENTED_ITEM.captures(line) {
        return Line::IndentedItem(caps.get(1).map_or("", |m| m.as_str()), line.trim());
    }

    if let Some(cells) = split_table_line(line) {
        return parse_separator(&cells).map_or(Line::TableRow(cells), Line::TableSeparator);
    }

    Line::Text(line.trim())
}

/// Drops a closing `#` sequence such as in `## Title ##`.
fn strip_closing_hashes(text: &str) -> &str {
    let stripped = text.trim_end_matches('#');
    if stripped.len() < text.len() && stripped.ends_with([' ', '\t']) {
        stripped.trim_end()
    } else {
        text
    }
}

/// Which group a line continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Group {
    Paragraph,
    Quote,
    List,
    Table,
}

#[derive(Debug, Default)]
struct BlockParser {
    blocks: Vec<Block>,
    paragraph: Vec<InlineRun>,
    quote: Vec<InlineRun>,
    list: ListState,
    table: TableState,
}

impl BlockParser {
    fn feed(&mut self, line: Line<'_>) {
        match line {
            Line::Blank => self.close_all(),
            Line::Heading(level, text) => {
                self.close_all();
                self.blocks.push(Block::Heading {
                    level,
                    content: parse_inlines(text),
                });
            }
            Line::Rule => {
                self.close_all();
                self.blocks.push(Block::ThematicBreak);
            }
            Line::Admonition(kind, text) => {
                self.close_all();
                self.blocks.push(Block::Admonition {
                    kind,
                    content: parse_inlines(text),
                });
            }
            Line::Quote(text) => {
                self.close_except(Group::Quote);
                self.quote.push(parse_inlines(text));
            }
            Line::Item(kind, text) => {
                self.close_except(Group::List);
                if let Some(list) = self.list.item(kind, parse_inlines(text)) {
                    self.blocks.push(Block::List(list));
                }
            }
            Line::IndentedItem(text, line) => match self.list.kind() {
                Some(kind) => self.feed(Line::Item(kind, text)),
                None => self.feed(Line::Text(line)),
            },
            Line::TableSeparator(alignments) => {
                self.close_except(Group::Table);
                self.table.separator(alignments);
            }
            Line::TableRow(cells) => {
                self.close_except(Group::Table);
                self.table
                    .row(cells.into_iter().map(parse_inlines).collect());
            }
            Line::Text(text) => {
                self.close_except(Group::Paragraph);
                self.paragraph.push(parse_inlines(text));
            }
        }
    }

    fn close_except(&mut self, keep: Group) {
        for group in [Group::Paragraph, Group::Quote, Group::List, Group::Table] {
            if group != keep {
                self.close(group);
            }
        }
    }

    fn close_all(&mut self) {
        for group in [Group::Paragraph, Group::Quote, Group::List, Group::Table] {
            self.close(group);
        }
    }

    fn close(&mut self, group: Group) {
        let block = match group {
            Group::Paragraph if !self.paragraph.is_empty() => Some(Block::Paragraph {
                lines: std::mem::take(&mut self.paragraph),
            }),
            Group::Quote if !self.quote.is_empty() => Some(Block::Blockquote {
                lines: std::mem::take(&mut self.quote),
            }),
            Group::List => self.list.close().map(Block::List),
            Group::Table => self.table.close().map(Block::Table),
            Group::Paragraph | Group::Quote => None,
        };

        if let Some(block) = block {
            log::trace!("close: {group:?}");
            self.blocks.push(block);
        }
    }

    fn finish(mut self) -> Vec<Block> {
        self.close_all();
        self.blocks
    }
}

/// Parses a text segment (no fenced code) into blocks.
#[must_use]
pub fn parse_blocks(text: &str) -> Vec<Block> {
    let mut parser = BlockParser::default();
    for line in text.lines() {
        parser.feed(classify(line));
    }
    parser.finish()
}
