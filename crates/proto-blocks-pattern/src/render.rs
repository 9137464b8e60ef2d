//! Render a parsed pattern document to HTML.

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Parser, Tag, TagEnd};

use proto_blocks_core::{BlockRegistry, RenderContext};

use crate::fence::{is_block_fence, names_block, BlockFence};
use crate::parser::{markdown_options, ParsedPattern};

/// The HTML of a rendered pattern document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedPattern {
    /// Page body HTML
    pub html: String,

    /// Number of blocks rendered
    pub blocks: usize,

    /// Names of invoked blocks with no registered renderer
    pub missing: Vec<String>,
}

/// Render a pattern's markdown, replacing each block fence with the block's HTML.
///
/// A block renders as a placeholder when its fence says `preview`, when the page
/// frontmatter sets `preview: true`, or when `force_preview` is set.
pub fn render_pattern(
    pattern: &ParsedPattern,
    registry: &BlockRegistry,
    force_preview: bool,
) -> RenderedPattern {
    let page_preview = force_preview || pattern.is_preview();

    let mut rendered = RenderedPattern::default();
    let mut fences = pattern.blocks.iter();
    let mut headings = pattern.toc.iter();
    let mut in_fence = false;

    let events = Parser::new_ext(&pattern.content, markdown_options()).filter_map(|event| {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(ref info))) if is_block_fence(info) => {
                in_fence = true;
                if !names_block(info) {
                    return None;
                }
                let fence = fences.next()?;
                Some(Event::Html(
                    render_fence(fence, registry, page_preview, &mut rendered).into(),
                ))
            }

            Event::End(TagEnd::CodeBlock) if in_fence => {
                in_fence = false;
                None
            }

            _ if in_fence => None,

            Event::Start(Tag::Heading {
                level,
                id,
                classes,
                attrs,
            }) => {
                let id = id.or_else(|| headings.next().map(|e| CowStr::from(e.id.clone())));
                Some(Event::Start(Tag::Heading {
                    level,
                    id,
                    classes,
                    attrs,
                }))
            }

            other => Some(other),
        }
    });

    let mut html_output = String::new();
    html::push_html(&mut html_output, events);
    rendered.html = html_output;

    rendered
}

fn render_fence(
    fence: &BlockFence,
    registry: &BlockRegistry,
    page_preview: bool,
    rendered: &mut RenderedPattern,
) -> String {
    let ctx = RenderContext::new(&fence.attributes)
        .with_inner_content(&fence.inner_content)
        .with_preview(page_preview || fence.preview);

    match registry.render(&fence.name, &ctx) {
        Ok(block_html) => {
            rendered.blocks += 1;
            format!(
                "<div class=\"proto-pattern__block\" data-block=\"{}\">{}</div>\n",
                registry.sanitizer().escape_attr(&fence.name),
                block_html
            )
        }
        Err(e) => {
            tracing::warn!("{} ({})", e, fence.id);
            rendered.missing.push(fence.name.clone());
            format!(
                "<!-- unknown block: {} -->\n",
                registry.sanitizer().escape_html(&fence.name)
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_pattern;
    use pretty_assertions::assert_eq;

    fn render(source: &str, force_preview: bool) -> RenderedPattern {
        let pattern = parse_pattern(source).unwrap();
        render_pattern(&pattern, &BlockRegistry::with_builtin_blocks(), force_preview)
    }

    #[test]
    fn replaces_fences_with_block_html() {
        let out = render(
            "# Cards\n\nIntro.\n\n```block card\ntitle: First\n```\n\nOutro.\n",
            false,
        );

        assert_eq!(out.blocks, 1);
        assert!(out.missing.is_empty());
        assert!(out.html.contains(r#"<h1 id="cards">Cards</h1>"#));
        assert!(out.html.contains(r#"<div class="proto-pattern__block" data-block="proto/card"><div class="proto-card"#));
        assert!(out.html.contains(r#"<h3 class="proto-card__title">First</h3>"#));
        assert!(out.html.contains("<p>Outro.</p>"));
        assert!(!out.html.contains("<pre>"));
        assert!(!out.html.contains("title: First"));
    }

    #[test]
    fn keeps_ordinary_code_blocks() {
        let out = render("```yaml\ntitle: x\n```\n", false);
        assert_eq!(out.blocks, 0);
        assert!(out.html.contains(r#"<pre><code class="language-yaml">title: x"#));
    }

    #[test]
    fn unknown_block_leaves_comment() {
        let out = render("```block accordion\n```\n\n```block card\n```\n", false);

        assert_eq!(out.blocks, 1);
        assert_eq!(out.missing, vec!["proto/accordion".to_string()]);
        assert!(out.html.contains("<!-- unknown block: proto/accordion -->"));
    }

    #[test]
    fn preview_sources_combine() {
        let source = "```block stats\n```\n";
        assert!(!render(source, false).html.contains("Happy Clients"));
        assert!(render(source, true).html.contains("Happy Clients"));

        let fence_flag = "```block stats preview\n```\n";
        assert!(render(fence_flag, false).html.contains("Happy Clients"));

        let page_flag = "---\ntitle: Stats\npreview: true\n---\n\n```block stats\n```\n";
        assert!(render(page_flag, false).html.contains("Happy Clients"));
    }

    #[test]
    fn passes_inner_content() {
        let out = render(
            "```block hero\ntitle: Hi\ninnerContent: \"<p class=\\\"lead\\\">Child</p>\"\n```\n",
            false,
        );
        assert!(out.html.contains(r#"<p class="lead">Child</p></div></section>"#));
    }

    #[test]
    fn nameless_fence_renders_nothing() {
        let out = render("```block\ntitle: x\n```\n\n```block card\ntitle: Kept\n```\n", false);
        assert_eq!(out.blocks, 1);
        assert!(out.html.contains("Kept"));
        assert!(!out.html.contains("title: x"));
    }

    #[test]
    fn heading_ids_follow_toc() {
        let out = render("## Usage\n\n## Usage\n", false);
        assert!(out.html.contains(r#"<h2 id="usage">Usage</h2>"#));
        assert!(out.html.contains(r#"<h2 id="usage-1">Usage</h2>"#));
    }
}
