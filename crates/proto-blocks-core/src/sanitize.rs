//! Escaping and sanitizing collaborators used by every block renderer.
//!
//! Renderers never format user data directly. Plain text goes through
//! [`Sanitizer::escape_html`], attribute values through [`Sanitizer::escape_attr`],
//! URLs through [`Sanitizer::escape_url`] and rich-text fields through
//! [`Sanitizer::sanitize_rich_text`]. All four are total: bad input yields empty or
//! escaped output, never an error.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// The escaping primitives a renderer depends on.
pub trait Sanitizer: Send + Sync {
    /// Escape text for use between tags.
    fn escape_html(&self, text: &str) -> String;

    /// Escape text for use inside a double-quoted attribute value.
    fn escape_attr(&self, text: &str) -> String;

    /// Clean a URL for use in `href`/`src`. Disallowed schemes yield an empty string.
    fn escape_url(&self, url: &str) -> String;

    /// Strip unsafe markup from rich text while keeping inline formatting.
    fn sanitize_rich_text(&self, html: &str) -> String;
}

/// Schemes accepted by [`DefaultSanitizer::escape_url`].
pub const ALLOWED_PROTOCOLS: &[&str] = &[
    "http", "https", "ftp", "ftps", "mailto", "news", "irc", "gopher", "nntp", "feed",
    "telnet", "mms", "rtsp", "sms", "svn", "tel", "fax", "xmpp", "webcal", "urn",
];

/// Elements removed together with their content.
const STRIPPED_ELEMENTS: &[&str] = &["script", "style", "iframe", "object", "embed"];

/// Tags kept by [`DefaultSanitizer::sanitize_rich_text`].
const ALLOWED_TAGS: &[&str] = &[
    "a", "abbr", "b", "blockquote", "br", "cite", "code", "del", "em", "h1", "h2", "h3",
    "h4", "h5", "h6", "i", "li", "mark", "ol", "p", "s", "small", "span", "strong", "sub",
    "sup", "u", "ul",
];

/// Built-in sanitizer with conservative HTML and URL rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSanitizer;

impl DefaultSanitizer {
    /// Create a new sanitizer.
    pub fn new() -> Self {
        Self
    }
}

impl Sanitizer for DefaultSanitizer {
    fn escape_html(&self, text: &str) -> String {
        escape(text)
    }

    fn escape_attr(&self, text: &str) -> String {
        escape(text)
    }

    fn escape_url(&self, url: &str) -> String {
        clean_url(url)
    }

    fn sanitize_rich_text(&self, html: &str) -> String {
        kses(html)
    }
}

/// Escape HTML special characters including single quotes.
///
/// An `&` that already starts a character reference is left alone, so values that
/// pass through two escaping layers (a URL inside a style attribute) are not
/// double-encoded.
fn escape(s: &str) -> String {
    static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^&(?:[a-zA-Z][a-zA-Z0-9]{1,31}|#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6});")
            .expect("Invalid entity regex")
    });

    let mut out = String::with_capacity(s.len());
    for (i, c) in s.char_indices() {
        match c {
            '&' if ENTITY.is_match(&s[i..]) => out.push('&'),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            c => out.push(c),
        }
    }
    out
}

fn clean_url(url: &str) -> String {
    static DISALLOWED: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"[^-a-zA-Z0-9~+_.?#=!&;,/:%@$|*'()\[\]\x{80}-\x{10FFFF}]")
            .expect("Invalid url character regex")
    });

    let url = url.trim();
    if url.is_empty() {
        return String::new();
    }

    let url = url.replace(' ', "%20");
    let url = DISALLOWED.replace_all(&url, "");

    if let Some(scheme) = scheme_of(&url) {
        if !ALLOWED_PROTOCOLS.contains(&scheme.to_ascii_lowercase().as_str()) {
            return String::new();
        }
    }

    url.replace("&amp;", "&")
        .replace('&', "&#038;")
        .replace('\'', "&#039;")
}

/// Make an already escaped URL safe inside a quoted CSS `url('…')`.
///
/// The HTML parser decodes `&#039;` back into a quote before CSS sees it, so quotes,
/// parentheses, backslashes and whitespace are percent-encoded instead.
pub fn css_url(escaped_url: &str) -> String {
    let url = escaped_url.replace("&#039;", "%27");
    let mut out = String::with_capacity(url.len());
    for c in url.chars() {
        match c {
            '\'' => out.push_str("%27"),
            '"' => out.push_str("%22"),
            '(' => out.push_str("%28"),
            ')' => out.push_str("%29"),
            '\\' => out.push_str("%5C"),
            c if c.is_whitespace() => {
                let mut buf = [0; 4];
                for byte in c.encode_utf8(&mut buf).bytes() {
                    out.push_str(&format!("%{:02X}", byte));
                }
            }
            c => out.push(c),
        }
    }
    out
}

/// The scheme of a URL: text before the first `:` when no `/`, `?` or `#` precedes it.
fn scheme_of(url: &str) -> Option<&str> {
    let colon = url.find(':')?;
    let head = &url[..colon];
    if head.contains(['/', '?', '#']) {
        None
    } else {
        Some(head)
    }
}

fn kses(html: &str) -> String {
    static STRIPPED: LazyLock<Vec<Regex>> = LazyLock::new(|| {
        STRIPPED_ELEMENTS
            .iter()
            .map(|tag| {
                Regex::new(&format!(r"(?is)<{tag}\b[^>]*>.*?</{tag}\s*>"))
                    .expect("Invalid stripped element regex")
            })
            .collect()
    });

    // Comments, tags (with quoted attribute values that may hold `>`), or a stray `<`.
    static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r#"(?s)<!--.*?-->|<(/?)([a-zA-Z][a-zA-Z0-9]*)((?:[^>"']|"[^"]*"|'[^']*')*)>|<"#)
            .expect("Invalid tag regex")
    });

    let mut out = html.to_string();
    for re in STRIPPED.iter() {
        out = re.replace_all(&out, "").into_owned();
    }

    TOKEN
        .replace_all(&out, |caps: &Captures| {
            let Some(name) = caps.get(2) else {
                // A comment is dropped; a stray `<` is escaped.
                return if caps[0].starts_with("<!--") {
                    String::new()
                } else {
                    "&lt;".to_string()
                };
            };

            let name = name.as_str().to_ascii_lowercase();
            if !ALLOWED_TAGS.contains(&name.as_str()) {
                return String::new();
            }

            if &caps[1] == "/" {
                return format!("</{name}>");
            }

            let raw_attrs = caps.get(3).map(|m| m.as_str()).unwrap_or("");
            let self_closing = raw_attrs.trim_end().ends_with('/');
            let attrs = filter_attributes(&name, raw_attrs);

            if self_closing {
                format!("<{name}{attrs} />")
            } else {
                format!("<{name}{attrs}>")
            }
        })
        .into_owned()
}

/// Keep only allowlisted attributes on a kept tag, re-quoted and re-escaped.
fn filter_attributes(tag: &str, raw: &str) -> String {
    static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r#"([a-zA-Z_:][-a-zA-Z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+)))?"#)
            .expect("Invalid attribute regex")
    });

    let mut out = String::new();

    for caps in ATTR_RE.captures_iter(raw) {
        let name = caps[1].to_ascii_lowercase();
        let allowed = name == "class"
            || (tag == "a" && matches!(name.as_str(), "href" | "title" | "target" | "rel"))
            || (tag == "abbr" && name == "title");
        if !allowed {
            continue;
        }

        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map(|m| m.as_str())
            .unwrap_or("");

        let value = if name == "href" {
            let url = clean_url(value);
            if url.is_empty() {
                continue;
            }
            url
        } else {
            value
                .replace('"', "&quot;")
                .replace('<', "&lt;")
                .replace('>', "&gt;")
        };

        out.push_str(&format!(r#" {name}="{value}""#));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn escapes_html_special_characters() {
        let s = DefaultSanitizer::new();
        assert_eq!(
            s.escape_html(r#"<script>alert("x") & 'y'</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; &#039;y&#039;&lt;/script&gt;"
        );
    }

    #[test]
    fn does_not_double_encode_entities() {
        let s = DefaultSanitizer::new();
        assert_eq!(s.escape_attr("Tom &amp; Jerry &#038; &x"), "Tom &amp; Jerry &#038; &amp;x");
        assert_eq!(s.escape_attr("url('/a?b=1&#038;c=2')"), "url(&#039;/a?b=1&#038;c=2&#039;)");
    }

    #[test]
    fn css_url_cannot_close_the_string() {
        let s = DefaultSanitizer::new();
        let url = css_url(&s.escape_url("https://x.test/a.jpg');background:url(https://evil.test/t"));
        assert_eq!(url, "https://x.test/a.jpg%27%29;background:url%28https://evil.test/t");
        assert_eq!(css_url(&s.escape_url("/a b.jpg")), "/a%20b.jpg");
        assert_eq!(css_url("a\\b\"c"), "a%5Cb%22c");
    }

    #[test]
    fn keeps_safe_urls() {
        let s = DefaultSanitizer::new();
        assert_eq!(s.escape_url("https://example.com/a?b=1"), "https://example.com/a?b=1");
        assert_eq!(s.escape_url("/about"), "/about");
        assert_eq!(s.escape_url("#section"), "#section");
        assert_eq!(s.escape_url("mailto:hi@example.com"), "mailto:hi@example.com");
    }

    #[test]
    fn encodes_ampersands_and_spaces_in_urls() {
        let s = DefaultSanitizer::new();
        assert_eq!(s.escape_url(" /a b?x=1&y=2 "), "/a%20b?x=1&#038;y=2");
        assert_eq!(s.escape_url("/?x=1&amp;y=2"), "/?x=1&#038;y=2");
    }

    #[test]
    fn rejects_unsafe_schemes() {
        let s = DefaultSanitizer::new();
        assert_eq!(s.escape_url("javascript:alert(1)"), "");
        assert_eq!(s.escape_url("JavaScript:alert(1)"), "");
        assert_eq!(s.escape_url("java\tscript:alert(1)"), "");
        assert_eq!(s.escape_url("data:text/html;base64,xx"), "");
        assert_eq!(s.escape_url(""), "");
    }

    #[test]
    fn strips_quotes_and_brackets_from_urls() {
        let s = DefaultSanitizer::new();
        assert_eq!(s.escape_url(r#"/x"><script>"#), "/xscript");
    }

    #[test]
    fn rich_text_keeps_inline_formatting() {
        let s = DefaultSanitizer::new();
        assert_eq!(
            s.sanitize_rich_text("<p>Hello <strong>world</strong><br/></p>"),
            "<p>Hello <strong>world</strong><br /></p>"
        );
    }

    #[test]
    fn rich_text_drops_scripts_with_content() {
        let s = DefaultSanitizer::new();
        assert_eq!(
            s.sanitize_rich_text("Hi<script>alert(1)</script> there<style>p{}</style>"),
            "Hi there"
        );
    }

    #[test]
    fn rich_text_strips_unknown_tags_but_keeps_text() {
        let s = DefaultSanitizer::new();
        assert_eq!(
            s.sanitize_rich_text(r#"<div onclick="x()"><img src=x onerror=y>Text</div>"#),
            "Text"
        );
    }

    #[test]
    fn rich_text_filters_attributes() {
        let s = DefaultSanitizer::new();
        assert_eq!(
            s.sanitize_rich_text(
                r#"<a href="javascript:alert(1)" onclick="x()">a</a> <a href='/ok' class="c" target=_blank>b</a>"#
            ),
            r#"<a>a</a> <a href="/ok" class="c" target="_blank">b</a>"#
        );
    }

    #[test]
    fn rich_text_escapes_stray_brackets_and_drops_comments() {
        let s = DefaultSanitizer::new();
        assert_eq!(s.sanitize_rich_text("1 < 2<!-- hidden -->"), "1 &lt; 2");
        assert_eq!(s.sanitize_rich_text("<script src=x"), "&lt;script src=x");
    }
}
