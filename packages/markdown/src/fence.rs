//! Fenced code block extraction.
//!
//! Runs before any other parsing so that code content is never seen by the
//! block or inline parsers.

use ctfboard_markdown_models::CodeBlock;

const FENCE: &str = "```";

/// A piece of the source: either ordinary text or a complete fenced block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Code(CodeBlock),
}

/// Splits `source` into text and code segments, in order of appearance.
///
/// An opening fence without a matching closing fence is left as text.
#[must_use]
pub fn extract_code_blocks(source: &str) -> Vec<Segment> {
    let lines: Vec<&str> = source.lines().collect();
    let mut segments = Vec::new();
    let mut text: Vec<&str> = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if let Some(language) = opening_fence(lines[i]) {
            let close = (i + 1..lines.len()).find(|&j| is_closing_fence(lines[j]));
            if let Some(close) = close {
                if !text.is_empty() {
                    segments.push(Segment::Text(text.join("\n")));
                    text.clear();
                }
                segments.push(Segment::Code(CodeBlock {
                    language,
                    code: lines[i + 1..close].join("\n"),
                }));
                i = close + 1;
                continue;
            }
            log::debug!("extract_code_blocks: unterminated fence at line {}", i + 1);
        }
        text.push(lines[i]);
        i += 1;
    }

    if !text.is_empty() {
        segments.push(Segment::Text(text.join("\n")));
    }

    segments
}

fn strip_indent(line: &str) -> Option<&str> {
    let trimmed = line.trim_start_matches(' ');
    (line.len() - trimmed.len() <= 3).then_some(trimmed)
}

/// Returns `Some(language)` if `line` opens a fence.
#[allow(clippy::option_option)]
fn opening_fence(line: &str) -> Option<Option<String>> {
    let rest = strip_indent(line)?.strip_prefix(FENCE)?;
    let info = rest.trim_start_matches('`').trim();
    if info.contains('`') {
        return None;
    }
    Some(info.split_whitespace().next().map(str::to_string))
}

fn is_closing_fence(line: &str) -> bool {
    strip_indent(line).is_some_and(|rest| {
        let rest = rest.trim_end();
        rest.len() >= FENCE.len() && rest.chars().all(|c| c == '`')
    })
}
