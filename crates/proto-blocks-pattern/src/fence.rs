//! Block invocations written as fenced code blocks.
//!
//! ````markdown
//! ```block hero preview
//! title: Welcome
//! overlayOpacity: 40
//! innerContent: <p>Child markup</p>
//! ```
//! ````

use proto_blocks_core::{qualify, AttributeBag};
use serde_json::Value;

/// Info-string keyword that marks a block invocation.
pub const FENCE_KEYWORD: &str = "block";

/// Attribute key whose value becomes the block's inner content.
pub const INNER_CONTENT_KEY: &str = "innerContent";

/// A block invocation parsed from a fence.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockFence {
    /// Unique identifier for this invocation (format: block-{line_number})
    pub id: String,

    /// Qualified block name (e.g., "proto/card")
    pub name: String,

    /// Render as an editor placeholder
    pub preview: bool,

    /// Attributes from the fence body
    pub attributes: AttributeBag,

    /// Inner content taken from the reserved `innerContent` key
    pub inner_content: String,

    /// Raw fence body
    pub source: String,

    /// Line number of the opening fence (1-indexed)
    pub line_number: usize,
}

impl BlockFence {
    /// Parse a fence. Returns `None` when the info string is not a block invocation.
    pub fn parse(info: &str, source: &str, line_number: usize) -> Option<Self> {
        let mut words = info.split_whitespace();
        if words.next()? != FENCE_KEYWORD {
            return None;
        }

        let name = qualify(words.next()?);
        let preview = words.any(|w| w.eq_ignore_ascii_case("preview"));

        let mut attributes = parse_attributes(source, line_number);
        let inner_content = match attributes.remove(INNER_CONTENT_KEY) {
            Some(Value::String(s)) => s,
            _ => String::new(),
        };

        Some(Self {
            id: format!("block-{}", line_number),
            name,
            preview,
            attributes,
            inner_content,
            source: source.to_string(),
            line_number,
        })
    }
}

/// Check whether a fence info string opens a block invocation.
pub fn is_block_fence(info: &str) -> bool {
    info.split_whitespace().next() == Some(FENCE_KEYWORD)
}

/// Check whether a block fence also names the block to render.
pub fn names_block(info: &str) -> bool {
    is_block_fence(info) && info.split_whitespace().nth(1).is_some()
}

/// Parse a YAML fence body. A malformed body yields an empty bag.
fn parse_attributes(source: &str, line_number: usize) -> AttributeBag {
    if source.trim().is_empty() {
        return AttributeBag::new();
    }

    match serde_yaml::from_str::<Value>(source) {
        Ok(value @ Value::Object(_)) => AttributeBag::from_value(value),
        Ok(Value::Null) => AttributeBag::new(),
        Ok(_) => {
            tracing::warn!(
                "Block at line {} must hold a mapping of attributes; ignoring its body",
                line_number
            );
            AttributeBag::new()
        }
        Err(e) => {
            tracing::warn!("Invalid YAML in block at line {}: {}", line_number, e);
            AttributeBag::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn recognizes_block_fences() {
        assert!(is_block_fence("block card"));
        assert!(is_block_fence("block"));
        assert!(!is_block_fence("yaml"));
        assert!(!is_block_fence("blocks card"));

        assert!(names_block("block card"));
        assert!(!names_block("block"));
    }

    #[test]
    fn parses_name_and_flags() {
        let fence = BlockFence::parse("block card preview", "title: Hi\n", 12).unwrap();

        assert_eq!(fence.id, "block-12");
        assert_eq!(fence.name, "proto/card");
        assert!(fence.preview);
        assert_eq!(fence.attributes.str_or("title", ""), "Hi");
    }

    #[test]
    fn keeps_explicit_namespace() {
        let fence = BlockFence::parse("block acme/Gallery", "", 1).unwrap();
        assert_eq!(fence.name, "acme/gallery");
        assert!(!fence.preview);
        assert!(fence.attributes.is_empty());
    }

    #[test]
    fn missing_name_is_not_an_invocation() {
        assert!(BlockFence::parse("block", "title: x", 1).is_none());
        assert!(BlockFence::parse("rust", "fn main() {}", 1).is_none());
    }

    #[test]
    fn extracts_inner_content() {
        let source = "title: Hero\ninnerContent: \"<p>child</p>\"\n";
        let fence = BlockFence::parse("block hero", source, 3).unwrap();

        assert_eq!(fence.inner_content, "<p>child</p>");
        assert!(fence.attributes.get(INNER_CONTENT_KEY).is_none());
        assert_eq!(fence.attributes.len(), 1);
    }

    #[test]
    fn parses_nested_yaml() {
        let source = r#"
navItems:
  - label: Home
    url: /
  - label: Docs
    url: /docs
logo:
  url: /logo.svg
fixedPosition: true
"#;
        let fence = BlockFence::parse("block header-nav", source, 1).unwrap();

        let items = fence.attributes.list("navItems");
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].str_or("label", ""), "Docs");
        assert_eq!(fence.attributes.object("logo").str_or("url", ""), "/logo.svg");
        assert!(fence.attributes.bool_or("fixedPosition", false));
    }

    #[test]
    fn malformed_body_yields_empty_bag() {
        let fence = BlockFence::parse("block card", "title: [unclosed", 1).unwrap();
        assert!(fence.attributes.is_empty());

        let fence = BlockFence::parse("block card", "- a\n- b\n", 1).unwrap();
        assert!(fence.attributes.is_empty());
    }
}
