//! Allow-list HTML sanitization.
//!
//! The renderer never emits anything outside this list. Anything a new
//! construct needs must be added here or it is silently stripped.

use std::collections::{HashMap, HashSet};

use ammonia::{Builder, UrlRelative};

const TAGS: &[&str] = &[
    "a",
    "blockquote",
    "br",
    "button",
    "code",
    "del",
    "div",
    "em",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "hr",
    "img",
    "input",
    "li",
    "mark",
    "ol",
    "p",
    "pre",
    "s",
    "span",
    "strong",
    "table",
    "tbody",
    "td",
    "th",
    "thead",
    "tr",
    "ul",
];

const TAG_ATTRIBUTES: &[(&str, &[&str])] = &[
    ("a", &["href", "target"]),
    ("img", &["src", "alt"]),
    ("input", &["type", "checked", "disabled"]),
    ("button", &["type"]),
];

const URL_SCHEMES: &[&str] = &["http", "https", "mailto"];

const LINK_REL: &str = "noopener noreferrer";

/// Builds the sanitizer with the fixed allow-list.
#[must_use]
pub fn sanitizer() -> Builder<'static> {
    let tag_attributes: HashMap<&str, HashSet<&str>> = TAG_ATTRIBUTES
        .iter()
        .map(|(tag, attributes)| (*tag, attributes.iter().copied().collect()))
        .collect();

    let mut builder = Builder::new();
    builder
        .tags(TAGS.iter().copied().collect())
        .generic_attributes(HashSet::from(["class"]))
        .tag_attributes(tag_attributes)
        .url_schemes(URL_SCHEMES.iter().copied().collect())
        .url_relative(UrlRelative::PassThrough)
        .link_rel(Some(LINK_REL));
    builder
}

/// Strips every tag and attribute not on the allow-list.
#[must_use]
pub fn sanitize_html(html: &str) -> String {
    sanitizer().clean(html).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_is_removed() {
        let html = sanitize_html("<p>hi</p><script>alert('xss')</script>");
        assert_eq!(html, "<p>hi</p>");
    }

    #[test]
    fn test_event_handlers_are_removed() {
        let html = sanitize_html(r#"<button type="button" onclick="steal()">x</button>"#);
        assert_eq!(html, r#"<button type="button">x</button>"#);
    }

    #[test]
    fn test_javascript_urls_are_removed() {
        let html = sanitize_html(r#"<a href="javascript:alert(1)">x</a>"#);
        assert!(!html.contains("javascript:"));
    }

    #[test]
    fn test_links_get_rel() {
        let html = sanitize_html(r#"<a href="https://example.com">x</a>"#);
        assert_eq!(
            html,
            r#"<a href="https://example.com" rel="noopener noreferrer">x</a>"#
        );
    }

    #[test]
    fn test_relative_urls_pass_through() {
        let html = sanitize_html(r#"<img src="/uploads/a.png" alt="a">"#);
        assert_eq!(html, r#"<img src="/uploads/a.png" alt="a">"#);
    }

    #[test]
    fn test_checkbox_survives() {
        let input = r#"<input type="checkbox" class="md-checkbox" disabled="" checked="">"#;
        assert_eq!(sanitize_html(input), input);
    }

    #[test]
    fn test_unknown_tags_and_style_are_stripped() {
        let html = sanitize_html(r#"<iframe src="x"></iframe><span style="color:red" class="c">t</span>"#);
        assert_eq!(html, r#"<span class="c">t</span>"#);
    }

    #[test]
    fn test_sanitizing_twice_is_stable() {
        let once = sanitize_html(r#"<p><a href="https://a.example">a</a> <b>bold?</b></p>"#);
        assert_eq!(sanitize_html(&once), once);
    }

    #[test]
    fn test_svg_is_stripped() {
        let html = sanitize_html(r#"<span class="c"><svg viewBox="0 0 1 1"><path d="M0 0"></path></svg></span>"#);
        assert_eq!(html, r#"<span class="c"></span>"#);
    }
}
