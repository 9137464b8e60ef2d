//! Static site generator for proto block patterns.
//!
//! Builds a browsable pattern library from markdown pages with embedded block invocations.

pub mod assets;
pub mod builder;
pub mod templates;

pub use assets::{Asset, AssetError, AssetPipeline};
pub use builder::{
    is_pattern_file, BuildConfig, BuildError, BuildResult, Page, RenderedPage, StaticBuilder,
};
pub use templates::{NavItem, TemplateEngine};
