//! Standalone HTML page output.

use ctfboard_markdown::html::escape_html;

/// Layout rules for the `md-` classes emitted by the renderer.
pub const BASE_STYLESHEET: &str = r".md-content { max-width: 48rem; margin: 2rem auto; padding: 0 1rem; line-height: 1.6; }
.md-content table { border-collapse: collapse; }
.md-content th, .md-content td { border: 1px solid #d0d7de; padding: 0.25rem 0.75rem; }
.md-align-left { text-align: left; }
.md-align-center { text-align: center; }
.md-align-right { text-align: right; }
.md-ol { list-style: none; padding-left: 1rem; }
.md-ol-index { font-variant-numeric: tabular-nums; margin-right: 0.25rem; }
.md-inline-code { padding: 0.1rem 0.3rem; border-radius: 4px; background: #eff1f3; }
.md-code-block { margin: 1rem 0; border: 1px solid #30363d; border-radius: 6px; overflow: hidden; }
.md-code-header { display: flex; justify-content: space-between; align-items: center; padding: 0.25rem 0.75rem; background: #21262d; color: #c9d1d9; font-size: 0.8rem; }
.md-code-copy { cursor: pointer; border: 0; background: transparent; color: inherit; }
.md-code-block pre { margin: 0; padding: 0.75rem; overflow-x: auto; background: #2b303b; color: #c0c5ce; }
.md-admonition { margin: 1rem 0; padding: 0.5rem 0.75rem; border-left: 4px solid; border-radius: 4px; }
.md-admonition-title { font-weight: bold; }
.md-admonition-note { border-color: #0969da; background: #ddf4ff; }
.md-admonition-warning { border-color: #9a6700; background: #fff8c5; }
.md-admonition-danger { border-color: #cf222e; background: #ffebe9; }
";

/// Wraps rendered `body` in a complete page with styles and the copy script.
#[must_use]
pub fn standalone_page(title: &str, body: &str, highlight_css: &str, script: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="ko">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{}</title>
<style>
{BASE_STYLESHEET}{highlight_css}
</style>
</head>
<body>
<article class="md-content">
{body}
</article>
<script>
{script}</script>
</body>
</html>
"#,
        escape_html(title)
    )
}
