//! Attribute-driven HTML renderers for proto content blocks.
//!
//! Each block (card, hero, stats, testimonial, header navigation) maps an
//! [`AttributeBag`] plus a preview flag into escaped HTML. Renderers are pure: the
//! same context always yields the same markup.

pub mod attributes;
pub mod blocks;
pub mod color;
pub mod markup;
pub mod registry;
pub mod sanitize;
pub mod traits;

pub use attributes::{AttributeBag, AttributeEnum, FromAttributes, Image, Link};
pub use color::{parse_hex, to_rgba, ColorError, Rgb};
pub use markup::{ClassList, StyleList, WrapperAttributes};
pub use registry::{qualify, BlockRegistry, NAMESPACE};
pub use sanitize::{css_url, DefaultSanitizer, Sanitizer};
pub use traits::{BlockRenderer, RenderContext, RenderError};
