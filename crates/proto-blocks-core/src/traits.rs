//! Trait definitions for block renderers.

use crate::attributes::AttributeBag;
use crate::markup::WrapperAttributes;
use crate::sanitize::Sanitizer;

/// Everything one render call sees. Built fresh per call and never mutated.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// Block attributes as handed over by the host
    pub attributes: &'a AttributeBag,

    /// Already-rendered child content (may be empty)
    pub inner_content: &'a str,

    /// True when rendering an editor placeholder rather than a live block
    pub is_preview: bool,

    /// Host attributes for the root element
    pub wrapper: &'a WrapperAttributes,
}

impl<'a> RenderContext<'a> {
    /// A live context with no inner content and no wrapper attributes.
    pub fn new(attributes: &'a AttributeBag) -> Self {
        static NO_WRAPPER: WrapperAttributes = WrapperAttributes {
            class: None,
            style: None,
            id: None,
            extra: Vec::new(),
        };

        Self {
            attributes,
            inner_content: "",
            is_preview: false,
            wrapper: &NO_WRAPPER,
        }
    }

    pub fn with_inner_content(mut self, inner_content: &'a str) -> Self {
        self.inner_content = inner_content;
        self
    }

    pub fn with_preview(mut self, is_preview: bool) -> Self {
        self.is_preview = is_preview;
        self
    }

    pub fn with_wrapper(mut self, wrapper: &'a WrapperAttributes) -> Self {
        self.wrapper = wrapper;
        self
    }

    /// Whether an optional field's wrapper element should be emitted.
    pub fn shows(&self, has_value: bool) -> bool {
        has_value || self.is_preview
    }
}

/// Errors surfaced by the registry.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Unknown block: {0}")]
    UnknownBlock(String),
}

/// A server-side renderer for one block type.
pub trait BlockRenderer: Send + Sync {
    /// Fully qualified block name (e.g., "proto/card")
    fn name(&self) -> &'static str;

    /// Human-readable title
    fn title(&self) -> &'static str;

    /// Render the block's HTML.
    fn render(&self, ctx: &RenderContext<'_>, sanitizer: &dyn Sanitizer) -> String;
}
