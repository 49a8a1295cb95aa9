//! Inline syntax parsing.
//!
//! A single left-to-right scan over one line of text. At each position the
//! constructs are tried in precedence order: escapes, code spans, images,
//! checkboxes, links, autolinks, `***`/`**`/`*`, `~~`, `==`. Anything that
//! does not close properly is kept as literal text.
//!
//! Every closing search that fails is remembered, so later openers of the
//! same kind fail without rescanning and a line is parsed in linear time.

use std::collections::HashMap;

use ctfboard_markdown_models::{Inline, InlineRun};

/// Characters a backslash turns into literals.
const ESCAPABLE: &str = "\\`*_{}[]()#+-.!|>~=";

/// Parses one line of inline content.
///
/// A leading `[ ]` or `[x]` becomes a checkbox.
#[must_use]
pub fn parse_inlines(text: &str) -> InlineRun {
    InlineParser::new(text, true, true).parse()
}

#[derive(Debug, Clone, Copy)]
enum Wrap {
    StrongEmphasis,
    Strong,
    Emphasis,
    Strikethrough,
    Highlight,
}

impl Wrap {
    fn into_inline(self, children: InlineRun) -> Inline {
        match self {
            Self::StrongEmphasis => Inline::Strong {
                children: vec![Inline::Emphasis { children }],
            },
            Self::Strong => Inline::Strong { children },
            Self::Emphasis => Inline::Emphasis { children },
            Self::Strikethrough => Inline::Strikethrough { children },
            Self::Highlight => Inline::Highlight { children },
        }
    }

    /// Single `*` only pairs at ASCII word boundaries, so `2*3` and `x*y*z`
    /// stay literal while `*강조*입니다` still works.
    const fn needs_word_boundary(self) -> bool {
        matches!(self, Self::Emphasis)
    }
}

struct InlineParser<'a> {
    src: &'a str,
    pos: usize,
    /// Cleared inside link text so anchors never nest.
    allow_links: bool,
    allow_checkbox: bool,
    nodes: InlineRun,
    text: String,
    /// Matching `]` for every `[` that has one.
    brackets: HashMap<usize, usize>,
    last_paren: Option<usize>,
    /// Earliest body start from which a delimiter had no closer.
    unclosed: HashMap<&'static str, usize>,
    /// Same for code spans, keyed by backtick run length.
    unclosed_code: HashMap<usize, usize>,
}

impl<'a> InlineParser<'a> {
    fn new(src: &'a str, allow_links: bool, allow_checkbox: bool) -> Self {
        Self {
            src,
            pos: 0,
            allow_links,
            allow_checkbox,
            nodes: Vec::new(),
            text: String::new(),
            brackets: match_brackets(src),
            last_paren: src.rfind(')'),
            unclosed: HashMap::new(),
            unclosed_code: HashMap::new(),
        }
    }

    fn parse(mut self) -> InlineRun {
        while self.pos < self.src.len() {
            if !self.try_construct() {
                let src = self.src;
                if let Some(c) = src[self.pos..].chars().next() {
                    self.text.push(c);
                    self.pos += c.len_utf8();
                }
            }
        }
        self.flush_text();
        self.nodes
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn flush_text(&mut self) {
        if !self.text.is_empty() {
            self.nodes.push(Inline::Text {
                text: std::mem::take(&mut self.text),
            });
        }
    }

    fn push_node(&mut self, node: Inline) {
        self.flush_text();
        self.nodes.push(node);
    }

    fn push_literal(&mut self, len: usize) {
        let src = self.src;
        self.text.push_str(&src[self.pos..self.pos + len]);
        self.pos += len;
    }

    fn try_construct(&mut self) -> bool {
        match self.rest().as_bytes().first() {
            Some(b'\\') => self.escape(),
            Some(b'`') => self.code_span(),
            Some(b'!') => self.image(),
            Some(b'[') => self.checkbox() || self.link(),
            Some(b'h') => self.autolink(),
            Some(b'*') => self.stars(),
            Some(b'~') => self.paired("~~", Wrap::Strikethrough),
            Some(b'=') => self.paired("==", Wrap::Highlight),
            _ => false,
        }
    }

    fn escape(&mut self) -> bool {
        match self.rest()[1..].chars().next() {
            Some(c) if ESCAPABLE.contains(c) => {
                self.text.push(c);
                self.pos += 2;
                true
            }
            _ => false,
        }
    }

    fn code_span(&mut self) -> bool {
        let rest = self.rest();
        let n = run_len(rest.as_bytes(), 0, b'`');
        let after = self.pos + n;
        let known_unclosed = self
            .unclosed_code
            .get(&n)
            .is_some_and(|&from| from <= after);
        let close = if known_unclosed {
            None
        } else {
            find_code_close(&rest[n..], n)
        };

        match close {
            Some(end) if end > 0 => {
                let code = strip_code_padding(&rest[n..n + end]).to_string();
                self.push_node(Inline::Code { code });
                self.pos += n + end + n;
            }
            _ => {
                self.unclosed_code.entry(n).or_insert(after);
                self.push_literal(n);
            }
        }
        true
    }

    /// Parses `[text](target)` with the `[` at `open`.
    ///
    /// Returns the text, the target (without any title) and the length
    /// consumed from `open`.
    fn bracket_target(&self, open: usize) -> Option<(&'a str, &'a str, usize)> {
        let close = *self.brackets.get(&open)?;
        if self.last_paren.is_none_or(|paren| paren < close + 2) {
            return None;
        }
        let src = self.src;
        let after = src[close + 1..].strip_prefix('(')?;
        let end = after.find(')')?;
        let target = after[..end].split_whitespace().next()?;
        Some((&src[open + 1..close], target, close - open + end + 3))
    }

    fn image(&mut self) -> bool {
        if !self.rest().starts_with("![") {
            return false;
        }
        let Some((alt, src, consumed)) = self.bracket_target(self.pos + 1) else {
            return false;
        };
        self.push_node(Inline::Image {
            src: src.to_string(),
            alt: alt.to_string(),
        });
        self.pos += 1 + consumed;
        true
    }

    fn checkbox(&mut self) -> bool {
        if !self.allow_checkbox || self.pos != 0 {
            return false;
        }
        let rest = self.rest();
        let checked = if rest.starts_with("[ ]") {
            false
        } else if rest.starts_with("[x]") || rest.starts_with("[X]") {
            true
        } else {
            return false;
        };
        if rest[3..].chars().next().is_some_and(|c| !c.is_whitespace()) {
            return false;
        }
        self.push_node(Inline::Checkbox { checked });
        self.pos += 3;
        true
    }

    /// Link text may hold images and emphasis but no further links.
    fn link(&mut self) -> bool {
        if !self.allow_links {
            return false;
        }
        let Some((text, href, consumed)) = self.bracket_target(self.pos) else {
            return false;
        };
        let children = if text.is_empty() {
            vec![Inline::text(href)]
        } else {
            InlineParser::new(text, false, false).parse()
        };
        self.push_node(Inline::Link {
            href: href.to_string(),
            children,
        });
        self.pos += consumed;
        true
    }

    fn autolink(&mut self) -> bool {
        if !self.allow_links {
            return false;
        }
        let rest = self.rest();
        let scheme_len = if rest.starts_with("https://") {
            "https://".len()
        } else if rest.starts_with("http://") {
            "http://".len()
        } else {
            return false;
        };
        if self.src[..self.pos]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_ascii_alphanumeric())
        {
            return false;
        }

        let len = rest
            .find(|c: char| {
                c.is_whitespace() || !c.is_ascii() || matches!(c, '<' | '>' | '"' | '`')
            })
            .unwrap_or(rest.len());
        let url = trim_url(&rest[..len]);
        if url.len() <= scheme_len {
            return false;
        }

        self.push_node(Inline::Autolink {
            url: url.to_string(),
        });
        self.pos += url.len();
        true
    }

    fn stars(&mut self) -> bool {
        let run = run_len(self.rest().as_bytes(), 0, b'*');
        let attempts = [
            ("***", Wrap::StrongEmphasis),
            ("**", Wrap::Strong),
            ("*", Wrap::Emphasis),
        ];
        for (delim, wrap) in attempts {
            if run >= delim.len() && self.delimited(delim, wrap) {
                return true;
            }
        }
        self.push_literal(run);
        true
    }

    fn paired(&mut self, delim: &'static str, wrap: Wrap) -> bool {
        let first = delim.as_bytes()[0];
        let run = run_len(self.rest().as_bytes(), 0, first);
        if run == delim.len() && self.delimited(delim, wrap) {
            return true;
        }
        if run > 1 {
            self.push_literal(run);
            return true;
        }
        false
    }

    fn delimited(&mut self, delim: &'static str, wrap: Wrap) -> bool {
        let word_boundary = wrap.needs_word_boundary();
        if word_boundary
            && self.src[..self.pos]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_ascii_alphanumeric())
        {
            return false;
        }

        let start = self.pos + delim.len();
        if self.unclosed.get(delim).is_some_and(|&from| from <= start) {
            return false;
        }
        let src = self.src;
        let body = &src[start..];
        if body.is_empty() || body.starts_with(char::is_whitespace) {
            return false;
        }
        let Some(end) = find_closing(body, delim, word_boundary) else {
            log::trace!("delimited: no closing {delim} after byte {start}");
            self.unclosed.entry(delim).or_insert(start);
            return false;
        };
        let children = InlineParser::new(&body[..end], self.allow_links, false).parse();
        self.push_node(wrap.into_inline(children));
        self.pos = start + end + delim.len();
        true
    }
}

fn run_len(bytes: &[u8], from: usize, byte: u8) -> usize {
    bytes[from..].iter().take_while(|&&b| b == byte).count()
}

/// Pairs every `[` with the `]` that balances it, skipping escapes.
fn match_brackets(src: &str) -> HashMap<usize, usize> {
    let bytes = src.as_bytes();
    let mut open = Vec::new();
    let mut pairs = HashMap::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b'[' => open.push(i),
            b']' => {
                if let Some(start) = open.pop() {
                    pairs.insert(start, i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    pairs
}

/// Finds a run of exactly `n` backticks in `after`.
fn find_code_close(after: &str, n: usize) -> Option<usize> {
    let bytes = after.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'`' {
            let run = run_len(bytes, i, b'`');
            if run == n {
                return Some(i);
            }
            i += run;
        } else {
            i += 1;
        }
    }
    None
}

fn strip_code_padding(code: &str) -> &str {
    if code.len() > 2 && code.starts_with(' ') && code.ends_with(' ') && !code.trim().is_empty() {
        &code[1..code.len() - 1]
    } else {
        code
    }
}

/// Finds the closing `delim` in `body`, skipping escapes and code spans.
///
/// The closing run must be exactly `delim` long and not preceded by
/// whitespace. With `word_boundary` it must also not be followed by an ASCII
/// letter or digit.
fn find_closing(body: &str, delim: &str, word_boundary: bool) -> Option<usize> {
    let bytes = body.as_bytes();
    let first = delim.as_bytes()[0];
    let mut unclosed_runs: Vec<usize> = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'`' => {
                let n = run_len(bytes, i, b'`');
                let close = if unclosed_runs.contains(&n) {
                    None
                } else {
                    find_code_close(&body[i + n..], n)
                };
                i += match close {
                    Some(end) => n + end + n,
                    None => {
                        unclosed_runs.push(n);
                        n
                    }
                };
            }
            b if b == first => {
                let run = run_len(bytes, i, first);
                let after_text = i > 0
                    && !body[..i]
                        .chars()
                        .next_back()
                        .is_some_and(char::is_whitespace);
                let at_boundary = !word_boundary
                    || !body[i + run..]
                        .chars()
                        .next()
                        .is_some_and(|c| c.is_ascii_alphanumeric());
                if run == delim.len() && after_text && at_boundary {
                    return Some(i);
                }
                i += run;
            }
            _ => i += 1,
        }
    }
    None
}

fn trim_url(mut url: &str) -> &str {
    while let Some(last) = url.chars().next_back() {
        let strip = match last {
            '.' | ',' | ';' | ':' | '!' | '?' | '\'' | '*' | '~' | '=' => true,
            ')' => url.matches(')').count() > url.matches('(').count(),
            _ => false,
        };
        if !strip {
            break;
        }
        url = &url[..url.len() - 1];
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Inline {
        Inline::text(s)
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(parse_inlines("문제 설명입니다"), vec![text("문제 설명입니다")]);
    }

    #[test]
    fn test_empty() {
        assert!(parse_inlines("").is_empty());
    }

    #[test]
    fn test_bold() {
        assert_eq!(
            parse_inlines("**bold** rest"),
            vec![
                Inline::Strong {
                    children: vec![text("bold")]
                },
                text(" rest"),
            ]
        );
    }

    #[test]
    fn test_triple_star_is_strong_emphasis_without_double_wrap() {
        assert_eq!(
            parse_inlines("***x***"),
            vec![Inline::Strong {
                children: vec![Inline::Emphasis {
                    children: vec![text("x")]
                }]
            }]
        );
    }

    #[test]
    fn test_emphasis() {
        assert_eq!(
            parse_inlines("*soft*"),
            vec![Inline::Emphasis {
                children: vec![text("soft")]
            }]
        );
    }

    #[test]
    fn test_lone_stars_stay_literal() {
        assert_eq!(parse_inlines("2 * 3 * 4"), vec![text("2 * 3 * 4")]);
        assert_eq!(parse_inlines("**unclosed"), vec![text("**unclosed")]);
    }

    #[test]
    fn test_code_span_protects_stars() {
        assert_eq!(
            parse_inlines("`a **b** c`"),
            vec![Inline::Code {
                code: "a **b** c".to_string()
            }]
        );
    }

    #[test]
    fn test_bold_does_not_close_inside_code_span() {
        assert_eq!(
            parse_inlines("**a `**` b**"),
            vec![Inline::Strong {
                children: vec![
                    text("a "),
                    Inline::Code {
                        code: "**".to_string()
                    },
                    text(" b"),
                ]
            }]
        );
    }

    #[test]
    fn test_double_backtick_code_span() {
        assert_eq!(
            parse_inlines("``a ` b``"),
            vec![Inline::Code {
                code: "a ` b".to_string()
            }]
        );
    }

    #[test]
    fn test_unclosed_backtick_is_literal() {
        assert_eq!(parse_inlines("a ` b"), vec![text("a ` b")]);
    }

    #[test]
    fn test_strikethrough_and_highlight() {
        assert_eq!(
            parse_inlines("~~old~~ ==new=="),
            vec![
                Inline::Strikethrough {
                    children: vec![text("old")]
                },
                text(" "),
                Inline::Highlight {
                    children: vec![text("new")]
                },
            ]
        );
    }

    #[test]
    fn test_comparison_operators_stay_literal() {
        assert_eq!(parse_inlines("if a == b"), vec![text("if a == b")]);
    }

    #[test]
    fn test_link() {
        assert_eq!(
            parse_inlines("[문제 링크](https://ctf.example/p/1)"),
            vec![Inline::Link {
                href: "https://ctf.example/p/1".to_string(),
                children: vec![text("문제 링크")],
            }]
        );
    }

    #[test]
    fn test_link_text_is_not_autolinked() {
        assert_eq!(
            parse_inlines("[https://a.example](https://a.example)"),
            vec![Inline::Link {
                href: "https://a.example".to_string(),
                children: vec![text("https://a.example")],
            }]
        );
    }

    #[test]
    fn test_image() {
        assert_eq!(
            parse_inlines("![diagram](/img/a.png)"),
            vec![Inline::Image {
                src: "/img/a.png".to_string(),
                alt: "diagram".to_string(),
            }]
        );
    }

    #[test]
    fn test_unterminated_link_is_literal() {
        assert_eq!(parse_inlines("[text](nowhere"), vec![text("[text](nowhere")]);
    }

    #[test]
    fn test_autolink_stops_at_korean_particle() {
        assert_eq!(
            parse_inlines("https://dreamhack.example/x에서 확인"),
            vec![
                Inline::Autolink {
                    url: "https://dreamhack.example/x".to_string()
                },
                text("에서 확인"),
            ]
        );
    }

    #[test]
    fn test_autolink_trims_trailing_punctuation() {
        assert_eq!(
            parse_inlines("see (http://a.example/b)."),
            vec![
                text("see ("),
                Inline::Autolink {
                    url: "http://a.example/b".to_string()
                },
                text(")."),
            ]
        );
    }

    #[test]
    fn test_scheme_only_is_not_autolink() {
        assert_eq!(parse_inlines("https:// "), vec![text("https:// ")]);
    }

    #[test]
    fn test_checkbox_at_start() {
        assert_eq!(
            parse_inlines("[x] done"),
            vec![Inline::Checkbox { checked: true }, text(" done")]
        );
        assert_eq!(
            parse_inlines("[ ] todo"),
            vec![Inline::Checkbox { checked: false }, text(" todo")]
        );
    }

    #[test]
    fn test_checkbox_only_at_start() {
        assert_eq!(parse_inlines("a [x] b"), vec![text("a [x] b")]);
    }

    #[test]
    fn test_escapes() {
        assert_eq!(parse_inlines(r"\*not bold\*"), vec![text("*not bold*")]);
        assert_eq!(parse_inlines(r"a \| b"), vec![text("a | b")]);
        assert_eq!(parse_inlines(r"C:\path"), vec![text(r"C:\path")]);
    }

    #[test]
    fn test_nested_bold_in_link() {
        assert_eq!(
            parse_inlines("[**hi**](/x)"),
            vec![Inline::Link {
                href: "/x".to_string(),
                children: vec![Inline::Strong {
                    children: vec![text("hi")]
                }],
            }]
        );
    }

    #[test]
    fn test_image_inside_link() {
        assert_eq!(
            parse_inlines("[![logo](/a.png)](https://x.example)"),
            vec![Inline::Link {
                href: "https://x.example".to_string(),
                children: vec![Inline::Image {
                    src: "/a.png".to_string(),
                    alt: "logo".to_string(),
                }],
            }]
        );
    }

    #[test]
    fn test_link_text_with_balanced_brackets() {
        assert_eq!(
            parse_inlines("[a [b] c](/x)"),
            vec![Inline::Link {
                href: "/x".to_string(),
                children: vec![text("a [b] c")],
            }]
        );
    }

    #[test]
    fn test_unbalanced_bracket_before_link() {
        assert_eq!(
            parse_inlines("[ [a](/x)"),
            vec![
                text("[ "),
                Inline::Link {
                    href: "/x".to_string(),
                    children: vec![text("a")],
                },
            ]
        );
    }

    #[test]
    fn test_arithmetic_stars_stay_literal() {
        assert_eq!(parse_inlines("2*3 and 4*5"), vec![text("2*3 and 4*5")]);
        assert_eq!(parse_inlines("x*y*z"), vec![text("x*y*z")]);
        assert_eq!(parse_inlines("char *p = *q;"), vec![text("char *p = *q;")]);
    }

    #[test]
    fn test_emphasis_before_korean_particle() {
        assert_eq!(
            parse_inlines("*중요*합니다"),
            vec![
                Inline::Emphasis {
                    children: vec![text("중요")]
                },
                text("합니다"),
            ]
        );
    }

    #[test]
    fn test_many_unclosed_openers_stay_literal() {
        let line = "*a **b ~~c ==d [f ![g (h ".repeat(200);
        assert_eq!(parse_inlines(&line), vec![text(&line)]);
    }
}
