//! Pattern documents: markdown pages with embedded block invocations.
//!
//! A pattern document is a markdown file with optional YAML frontmatter. Fenced
//! code blocks whose info string starts with `block` are block invocations whose
//! body holds the block's attributes as YAML.

pub mod fence;
pub mod frontmatter;
pub mod parser;
pub mod render;

pub use fence::BlockFence;
pub use frontmatter::{Frontmatter, FrontmatterError};
pub use parser::{parse_pattern, ParseError, ParsedPattern, TocEntry};
pub use render::{render_pattern, RenderedPattern};
