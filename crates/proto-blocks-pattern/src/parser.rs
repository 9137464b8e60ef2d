//! Pattern document parser.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

use crate::fence::{is_block_fence, BlockFence};
use crate::frontmatter::{split_frontmatter, Frontmatter, FrontmatterError};

/// A parsed pattern document.
#[derive(Debug, Clone)]
pub struct ParsedPattern {
    /// Parsed frontmatter (if present)
    pub frontmatter: Option<Frontmatter>,

    /// Markdown content (without frontmatter)
    pub content: String,

    /// Block invocations in document order
    pub blocks: Vec<BlockFence>,

    /// Table of contents entries
    pub toc: Vec<TocEntry>,
}

impl ParsedPattern {
    /// Page title from frontmatter, falling back to the first heading.
    pub fn title(&self) -> Option<&str> {
        self.frontmatter
            .as_ref()
            .map(|fm| fm.title.as_str())
            .filter(|t| !t.is_empty())
            .or_else(|| self.toc.first().map(|entry| entry.title.as_str()))
    }

    /// Whether the page asks for every block to render as a placeholder.
    pub fn is_preview(&self) -> bool {
        self.frontmatter.as_ref().is_some_and(|fm| fm.preview)
    }
}

/// A table of contents entry.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TocEntry {
    /// Heading text
    pub title: String,
    /// Anchor ID
    pub id: String,
    /// Heading level (1-6)
    pub level: u8,
}

/// Errors that can occur when parsing a pattern document.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Frontmatter error: {0}")]
    Frontmatter(#[from] FrontmatterError),
}

/// Markdown extensions enabled for pattern documents.
pub(crate) fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
}

/// Parse a pattern document.
///
/// Extracts frontmatter and block invocations, and builds a table of contents.
pub fn parse_pattern(source: &str) -> Result<ParsedPattern, ParseError> {
    let split = split_frontmatter(source)?;
    let (frontmatter, content, line_offset) = (split.frontmatter, split.body, split.body_line);

    let mut blocks = Vec::new();
    let mut toc: Vec<TocEntry> = Vec::new();

    let mut current_fence: Option<(String, usize, String)> = None; // (info, line, body)
    let mut current_heading: Option<(u8, String)> = None;

    for (event, range) in Parser::new_ext(content, markdown_options()).into_offset_iter() {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) if is_block_fence(&info) => {
                let line = line_offset + content[..range.start].matches('\n').count() + 1;
                current_fence = Some((info.to_string(), line, String::new()));
            }

            Event::Text(text) | Event::Code(text) => {
                if let Some((_, _, ref mut body)) = current_fence {
                    body.push_str(&text);
                } else if let Some((_, ref mut title)) = current_heading {
                    title.push_str(&text);
                }
            }

            Event::End(TagEnd::CodeBlock) => {
                if let Some((info, line, body)) = current_fence.take() {
                    match BlockFence::parse(&info, &body, line) {
                        Some(fence) => blocks.push(fence),
                        None => tracing::warn!("Block fence at line {} has no block name", line),
                    }
                }
            }

            Event::Start(Tag::Heading { level, .. }) => {
                current_heading = Some((level as u8, String::new()));
            }

            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, title)) = current_heading.take() {
                    let id = unique_id(slugify(&title), &toc);
                    toc.push(TocEntry { title, id, level });
                }
            }

            _ => {}
        }
    }

    tracing::debug!(
        "Parsed pattern: {} blocks, {} headings",
        blocks.len(),
        toc.len()
    );

    Ok(ParsedPattern {
        frontmatter,
        content: content.to_string(),
        blocks,
        toc,
    })
}

/// Suffix repeated heading slugs with `-1`, `-2`, ...
fn unique_id(slug: String, toc: &[TocEntry]) -> String {
    let taken = |id: &str| toc.iter().any(|entry| entry.id == id);
    if !taken(&slug) {
        return slug;
    }

    let mut n = 1;
    loop {
        let candidate = format!("{}-{}", slug, n);
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Convert a heading to a URL-safe slug.
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c
            } else if c.is_whitespace() || c == '-' || c == '_' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|c| *c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_complete_pattern() {
        let source = r#"---
title: Landing
description: Hero with stats
---

# Landing

Intro paragraph.

```block hero
title: Welcome
overlayOpacity: 40
```

## Numbers

```block stats preview
columns: 3
```

```css
.not-a-block { color: red; }
```
"#;

        let doc = parse_pattern(source).unwrap();

        let fm = doc.frontmatter.as_ref().unwrap();
        assert_eq!(fm.title, "Landing");
        assert_eq!(fm.description, Some("Hero with stats".to_string()));

        assert_eq!(doc.blocks.len(), 2);

        let hero = &doc.blocks[0];
        assert_eq!(hero.name, "proto/hero");
        assert!(!hero.preview);
        assert_eq!(hero.attributes.str_or("title", ""), "Welcome");
        assert_eq!(hero.attributes.i64_or("overlayOpacity", 0), 40);
        assert_eq!(hero.line_number, 10);
        assert_eq!(hero.id, "block-10");

        let stats = &doc.blocks[1];
        assert_eq!(stats.name, "proto/stats");
        assert!(stats.preview);
        assert_eq!(stats.line_number, 17);

        assert_eq!(doc.toc.len(), 2);
        assert_eq!(doc.toc[0].title, "Landing");
        assert_eq!(doc.toc[0].level, 1);
        assert_eq!(doc.toc[0].id, "landing");
        assert_eq!(doc.toc[1].title, "Numbers");
        assert_eq!(doc.toc[1].level, 2);
    }

    #[test]
    fn parses_without_frontmatter() {
        let source = "# Just Markdown\n\nNo frontmatter.";

        let doc = parse_pattern(source).unwrap();

        assert!(doc.frontmatter.is_none());
        assert!(doc.blocks.is_empty());
        assert_eq!(doc.title(), Some("Just Markdown"));
        assert!(!doc.is_preview());
    }

    #[test]
    fn multi_line_bodies_are_accumulated() {
        let source = "```block header-nav\nnavItems:\n  - label: Home\n    url: /\n  - label: Blog\n    url: /blog\n```\n";

        let doc = parse_pattern(source).unwrap();

        assert_eq!(doc.blocks.len(), 1);
        assert_eq!(doc.blocks[0].line_number, 1);
        assert_eq!(doc.blocks[0].attributes.list("navItems").len(), 2);
    }

    #[test]
    fn nameless_fence_is_skipped() {
        let doc = parse_pattern("```block\ntitle: x\n```\n").unwrap();
        assert!(doc.blocks.is_empty());
    }

    #[test]
    fn repeated_headings_get_unique_ids() {
        let doc = parse_pattern("## Example\n\n## Example\n\n## Example\n").unwrap();
        let ids: Vec<_> = doc.toc.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["example", "example-1", "example-2"]);
    }

    #[test]
    fn heading_with_inline_code() {
        let doc = parse_pattern("## The `card` block\n").unwrap();
        assert_eq!(doc.toc[0].title, "The card block");
        assert_eq!(doc.toc[0].id, "the-card-block");
    }

    #[test]
    fn frontmatter_preview_flag() {
        let doc = parse_pattern("---\ntitle: Drafts\npreview: true\n---\n\nBody\n").unwrap();
        assert!(doc.is_preview());
        assert_eq!(doc.title(), Some("Drafts"));
    }

    #[test]
    fn slugify_works() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("API Reference"), "api-reference");
        assert_eq!(slugify("Card (Horizontal)"), "card-horizontal");
        assert_eq!(slugify("  Multiple   Spaces  "), "multiple-spaces");
    }
}
