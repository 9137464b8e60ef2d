//! Block registry for looking up renderers by name.
//!
//! Holds the renderers and the sanitizer they share, and resolves both fully
//! qualified (`proto/card`) and short (`card`) block names.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::blocks::{Card, HeaderNav, Hero, Stats, Testimonial};
use crate::sanitize::{DefaultSanitizer, Sanitizer};
use crate::traits::{BlockRenderer, RenderContext, RenderError};

/// Namespace of the built-in blocks.
pub const NAMESPACE: &str = "proto";

/// A registry of block renderers.
pub struct BlockRegistry {
    /// Renderers by lowercase qualified name
    blocks: HashMap<String, Arc<dyn BlockRenderer>>,

    /// Registration order, for listing
    order: Vec<String>,

    sanitizer: Arc<dyn Sanitizer>,
}

impl BlockRegistry {
    /// Create an empty registry using the default sanitizer.
    pub fn new() -> Self {
        Self {
            blocks: HashMap::new(),
            order: Vec::new(),
            sanitizer: Arc::new(DefaultSanitizer),
        }
    }

    /// Create a registry with every built-in block registered.
    pub fn with_builtin_blocks() -> Self {
        let mut registry = Self::new();
        registry.register(Card);
        registry.register(Hero);
        registry.register(Stats);
        registry.register(Testimonial);
        registry.register(HeaderNav);
        registry
    }

    /// Replace the sanitizer shared by all renderers.
    pub fn with_sanitizer(mut self, sanitizer: Arc<dyn Sanitizer>) -> Self {
        self.sanitizer = sanitizer;
        self
    }

    /// Register a renderer, replacing any renderer with the same name.
    pub fn register(&mut self, renderer: impl BlockRenderer + 'static) {
        let key = renderer.name().to_lowercase();
        if self.blocks.insert(key.clone(), Arc::new(renderer)).is_none() {
            self.order.push(key);
        }
    }

    /// Look up a renderer by qualified or short name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&Arc<dyn BlockRenderer>> {
        let key = qualify(name);
        self.blocks.get(&key)
    }

    /// Check if a block exists.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Registered renderers in registration order.
    pub fn blocks(&self) -> impl Iterator<Item = &Arc<dyn BlockRenderer>> {
        self.order.iter().filter_map(|key| self.blocks.get(key))
    }

    /// Get all registered block names in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.blocks().map(|b| b.name()).collect()
    }

    /// The sanitizer handed to every renderer.
    pub fn sanitizer(&self) -> &dyn Sanitizer {
        self.sanitizer.as_ref()
    }

    /// Render a block by name.
    pub fn render(&self, name: &str, ctx: &RenderContext<'_>) -> Result<String, RenderError> {
        let renderer = self
            .get(name)
            .ok_or_else(|| RenderError::UnknownBlock(name.to_string()))?;

        tracing::debug!(
            "Rendering {} (preview: {}, {} attributes)",
            renderer.name(),
            ctx.is_preview,
            ctx.attributes.len()
        );

        Ok(renderer.render(ctx, self.sanitizer.as_ref()))
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::with_builtin_blocks()
    }
}

impl fmt::Debug for BlockRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockRegistry")
            .field("blocks", &self.order)
            .finish_non_exhaustive()
    }
}

/// Normalize a block name: lowercase, with the default namespace when none is given.
pub fn qualify(name: &str) -> String {
    let name = name.trim().to_lowercase();
    if name.contains('/') {
        name
    } else {
        format!("{}/{}", NAMESPACE, name)
    }
}
