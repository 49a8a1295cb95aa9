//! HTML rendering of a parsed [`Document`].

use ctfboard_markdown_models::{
    Alignment, Block, CodeBlock, Document, Inline, InlineRun, List, ListKind, Table,
};
use ctfboard_syntax::CodeHighlighter;

use crate::clipboard::{CODE_BLOCK_CLASS, COPY_BUTTON_CLASS, COPY_LABEL};
use crate::options::RenderOptions;

/// Renders `document` without sanitizing it.
#[must_use]
pub fn render_document(
    document: &Document,
    highlighter: &CodeHighlighter,
    options: &RenderOptions,
) -> String {
    let renderer = HtmlRenderer {
        highlighter,
        options,
    };
    let mut out = String::new();
    for (i, block) in document.blocks.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        renderer.block(&mut out, block);
    }
    out
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

struct HtmlRenderer<'a> {
    highlighter: &'a CodeHighlighter,
    options: &'a RenderOptions,
}

impl HtmlRenderer<'_> {
    fn block(&self, out: &mut String, block: &Block) {
        match block {
            Block::Heading { level, content } => {
                let n = level.get();
                out.push_str(&format!("<h{n}>"));
                self.inlines(out, content);
                out.push_str(&format!("</h{n}>"));
            }
            Block::Paragraph { lines } => {
                out.push_str("<p>");
                self.lines(out, lines);
                out.push_str("</p>");
            }
            Block::Blockquote { lines } => {
                out.push_str("<blockquote>");
                self.lines(out, lines);
                out.push_str("</blockquote>");
            }
            Block::Admonition { kind, content } => {
                out.push_str(&format!(
                    r#"<div class="md-admonition md-admonition-{kind}"><div class="md-admonition-title">{}</div><div class="md-admonition-body">"#,
                    kind.title()
                ));
                self.inlines(out, content);
                out.push_str("</div></div>");
            }
            Block::ThematicBreak => out.push_str("<hr>"),
            Block::List(list) => self.list(out, list),
            Block::Table(table) => self.table(out, table),
            Block::CodeBlock(code) => self.code_block(out, code),
        }
    }

    fn lines(&self, out: &mut String, lines: &[InlineRun]) {
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                out.push_str("<br>");
            }
            self.inlines(out, line);
        }
    }

    fn list(&self, out: &mut String, list: &List) {
        match list.kind {
            ListKind::Unordered => {
                out.push_str(r#"<ul class="md-ul">"#);
                for item in &list.items {
                    out.push_str("<li>");
                    self.inlines(out, &item.content);
                    out.push_str("</li>");
                }
                out.push_str("</ul>");
            }
            ListKind::Ordered => {
                out.push_str(r#"<ol class="md-ol">"#);
                for item in &list.items {
                    out.push_str(&format!(
                        r#"<li><span class="md-ol-index">{}.</span> "#,
                        item.index
                    ));
                    self.inlines(out, &item.content);
                    out.push_str("</li>");
                }
                out.push_str("</ol>");
            }
        }
    }

    fn table(&self, out: &mut String, table: &Table) {
        out.push_str("<table><thead><tr>");
        for (i, cell) in table.header.iter().enumerate() {
            self.cell(out, "th", table.alignments.get(i).copied(), cell);
        }
        out.push_str("</tr></thead>");

        if !table.rows.is_empty() {
            out.push_str("<tbody>");
            for row in &table.rows {
                out.push_str("<tr>");
                for (i, cell) in row.iter().enumerate() {
                    self.cell(out, "td", table.alignments.get(i).copied(), cell);
                }
                out.push_str("</tr>");
            }
            out.push_str("</tbody>");
        }

        out.push_str("</table>");
    }

    fn cell(&self, out: &mut String, tag: &str, alignment: Option<Alignment>, content: &[Inline]) {
        match alignment.and_then(Alignment::class) {
            Some(class) => out.push_str(&format!(r#"<{tag} class="{class}">"#)),
            None => out.push_str(&format!("<{tag}>")),
        }
        self.inlines(out, content);
        out.push_str(&format!("</{tag}>"));
    }

    fn code_block(&self, out: &mut String, block: &CodeBlock) {
        let language = block
            .language
            .as_deref()
            .map(str::to_ascii_lowercase)
            .filter(|language| self.highlighter.supports(language));

        let body = match &language {
            Some(language) if self.options.highlight => self
                .highlighter
                .highlight_html(language, &block.code)
                .unwrap_or_else(|e| {
                    log::warn!("Falling back to plain code block: {e}");
                    escape_html(&block.code)
                }),
            _ => escape_html(&block.code),
        };

        let label = language
            .as_deref()
            .unwrap_or(self.options.default_code_label.as_str());

        out.push_str(&format!(
            r#"<div class="{CODE_BLOCK_CLASS}"><div class="md-code-header"><span class="md-code-lang">{}</span><button type="button" class="{COPY_BUTTON_CLASS}">{COPY_LABEL}</button></div><pre>"#,
            escape_html(label)
        ));
        match &language {
            Some(language) => {
                out.push_str(&format!(r#"<code class="language-{}">"#, escape_html(language)));
            }
            None => out.push_str("<code>"),
        }
        out.push_str(&body);
        out.push_str("</code></pre></div>");
    }

    fn inlines(&self, out: &mut String, inlines: &[Inline]) {
        for inline in inlines {
            self.inline(out, inline);
        }
    }

    fn wrapped(&self, out: &mut String, tag: &str, children: &[Inline]) {
        out.push_str(&format!("<{tag}>"));
        self.inlines(out, children);
        out.push_str(&format!("</{tag}>"));
    }

    fn anchor_open(&self, out: &mut String, href: &str) {
        out.push_str(&format!(r#"<a href="{}""#, escape_html(href)));
        if self.options.links_open_in_new_tab {
            out.push_str(r#" target="_blank""#);
        }
        out.push('>');
    }

    fn inline(&self, out: &mut String, inline: &Inline) {
        match inline {
            Inline::Text { text } => out.push_str(&escape_html(text)),
            Inline::Code { code } => {
                out.push_str(&format!(
                    r#"<code class="md-inline-code">{}</code>"#,
                    escape_html(code)
                ));
            }
            Inline::Strong { children } => self.wrapped(out, "strong", children),
            Inline::Emphasis { children } => self.wrapped(out, "em", children),
            Inline::Strikethrough { children } => self.wrapped(out, "del", children),
            Inline::Highlight { children } => self.wrapped(out, "mark", children),
            Inline::Link { href, children } => {
                self.anchor_open(out, href);
                self.inlines(out, children);
                out.push_str("</a>");
            }
            Inline::Autolink { url } => {
                self.anchor_open(out, url);
                out.push_str(&escape_html(url));
                out.push_str("</a>");
            }
            Inline::Image { src, alt } => {
                out.push_str(&format!(
                    r#"<img src="{}" alt="{}">"#,
                    escape_html(src),
                    escape_html(alt)
                ));
            }
            Inline::Checkbox { checked } => {
                out.push_str(r#"<input type="checkbox" class="md-checkbox" disabled="""#);
                if *checked {
                    out.push_str(r#" checked="""#);
                }
                out.push('>');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use ctfboard_markdown_models::{AdmonitionKind, HeadingLevel, ListItem};

    use super::*;

    fn render(blocks: Vec<Block>) -> String {
        render_document(
            &Document { blocks },
            CodeHighlighter::shared(),
            &RenderOptions::default(),
        )
    }

    fn text(s: &str) -> InlineRun {
        vec![Inline::text(s)]
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<div>"), "&lt;div&gt;");
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html("\"test\""), "&quot;test&quot;");
    }

    #[test]
    fn test_heading() {
        let html = render(vec![Block::Heading {
            level: HeadingLevel::new(3).unwrap(),
            content: text("풀이"),
        }]);
        assert_eq!(html, "<h3>풀이</h3>");
    }

    #[test]
    fn test_paragraph_lines_use_line_breaks() {
        let html = render(vec![Block::Paragraph {
            lines: vec![text("a"), text("b")],
        }]);
        assert_eq!(html, "<p>a<br>b</p>");
    }

    #[test]
    fn test_ordered_list_renders_explicit_index() {
        let html = render(vec![Block::List(List {
            kind: ListKind::Ordered,
            items: vec![
                ListItem {
                    index: 1,
                    content: text("x"),
                },
                ListItem {
                    index: 2,
                    content: text("y"),
                },
            ],
        })]);
        assert_eq!(
            html,
            r#"<ol class="md-ol"><li><span class="md-ol-index">1.</span> x</li><li><span class="md-ol-index">2.</span> y</li></ol>"#
        );
    }

    #[test]
    fn test_table_without_body_omits_tbody() {
        let html = render(vec![Block::Table(Table {
            alignments: vec![Alignment::Center],
            header: vec![text("h")],
            rows: Vec::new(),
        })]);
        assert_eq!(
            html,
            r#"<table><thead><tr><th class="md-align-center">h</th></tr></thead></table>"#
        );
    }

    #[test]
    fn test_admonition() {
        let html = render(vec![Block::Admonition {
            kind: AdmonitionKind::Warning,
            content: text("flag 형식 확인"),
        }]);
        assert!(html.starts_with(r#"<div class="md-admonition md-admonition-warning">"#));
        assert!(html.contains(r#"<div class="md-admonition-title">주의</div>"#));
        assert!(html.contains("flag 형식 확인"));
    }

    #[test]
    fn test_plain_code_block_uses_generic_label() {
        let html = render(vec![Block::CodeBlock(CodeBlock {
            language: Some("made-up-lang".to_string()),
            code: "a < b && **c**".to_string(),
        })]);
        assert!(html.contains(r#"<span class="md-code-lang">code</span>"#));
        assert!(html.contains("<code>a &lt; b &amp;&amp; **c**</code>"));
        assert!(html.contains(r#"<button type="button" class="md-code-copy">복사</button>"#));
    }

    #[test]
    fn test_highlighted_code_block() {
        let html = render(vec![Block::CodeBlock(CodeBlock {
            language: Some("Rust".to_string()),
            code: "fn main() {}".to_string(),
        })]);
        assert!(html.contains(r#"<span class="md-code-lang">rust</span>"#));
        assert!(html.contains(r#"<code class="language-rust">"#));
        assert!(html.contains("hl-"));
    }

    #[test]
    fn test_highlight_disabled_keeps_label() {
        let options = RenderOptions {
            highlight: false,
            ..RenderOptions::default()
        };
        let html = render_document(
            &Document {
                blocks: vec![Block::CodeBlock(CodeBlock {
                    language: Some("python".to_string()),
                    code: "print(1)".to_string(),
                })],
            },
            CodeHighlighter::shared(),
            &options,
        );
        assert!(html.contains(r#"<span class="md-code-lang">python</span>"#));
        assert!(html.contains(r#"<code class="language-python">print(1)</code>"#));
    }

    #[test]
    fn test_links_open_in_new_tab_option() {
        let options = RenderOptions {
            links_open_in_new_tab: true,
            ..RenderOptions::default()
        };
        let html = render_document(
            &Document {
                blocks: vec![Block::Paragraph {
                    lines: vec![vec![Inline::Autolink {
                        url: "https://a.example".to_string(),
                    }]],
                }],
            },
            CodeHighlighter::shared(),
            &options,
        );
        assert_eq!(
            html,
            r#"<p><a href="https://a.example" target="_blank">https://a.example</a></p>"#
        );
    }

    #[test]
    fn test_checkbox() {
        let html = render(vec![Block::Paragraph {
            lines: vec![vec![Inline::Checkbox { checked: true }, Inline::text(" done")]],
        }]);
        assert_eq!(
            html,
            r#"<p><input type="checkbox" class="md-checkbox" disabled="" checked=""> done</p>"#
        );
    }
}
