//! Static pattern library builder.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use walkdir::WalkDir;

use proto_blocks_core::BlockRegistry;
use proto_blocks_pattern::{parse_pattern, render_pattern, Frontmatter, ParsedPattern};

use crate::assets::{Asset, AssetPipeline};
use crate::templates::{Context, NavItem, TemplateEngine};

/// Pages without an explicit `order` sort after those with one.
const DEFAULT_ORDER: i32 = 999;

/// Configuration for building a pattern library.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Source patterns directory
    pub patterns_dir: PathBuf,

    /// Output directory
    pub output_dir: PathBuf,

    /// Minify CSS output
    pub minify: bool,

    /// Render every block as an editor placeholder
    pub preview: bool,

    /// Base URL for the site
    pub base_url: String,

    /// Site title
    pub title: String,

    /// Paths to CSS stylesheets to include
    pub styles: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            patterns_dir: PathBuf::from("patterns"),
            output_dir: PathBuf::from("dist"),
            minify: true,
            preview: false,
            base_url: "/".to_string(),
            title: "Block Patterns".to_string(),
            styles: vec![],
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of pages generated
    pub pages: usize,

    /// Number of blocks rendered
    pub blocks: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to read patterns: {0}")]
    ReadError(String),

    #[error("Failed to parse pattern: {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// A discovered pattern page.
#[derive(Debug, Clone)]
pub struct Page {
    /// Source file path
    pub source_path: PathBuf,

    /// Relative path from the patterns dir
    pub relative_path: PathBuf,

    /// Output file path
    pub output_path: PathBuf,

    /// Site URL
    pub url: String,

    /// Parsed document
    pub doc: ParsedPattern,
}

impl Page {
    fn order(&self) -> i32 {
        self.doc
            .frontmatter
            .as_ref()
            .and_then(|f| f.order)
            .unwrap_or(DEFAULT_ORDER)
    }

    fn in_nav(&self) -> bool {
        self.doc.frontmatter.as_ref().map_or(true, |f| f.nav)
    }

    /// Display title: frontmatter title, first heading, then the file stem.
    pub fn title(&self) -> String {
        match self.doc.title() {
            Some(title) => title.to_string(),
            None => self
                .relative_path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Untitled")
                .to_string(),
        }
    }
}

/// A page rendered to a full HTML document.
#[derive(Debug)]
pub struct RenderedPage {
    pub html: String,
    pub blocks: usize,
}

/// Static site builder.
pub struct StaticBuilder {
    config: BuildConfig,
    registry: Arc<BlockRegistry>,
    templates: TemplateEngine,
}

impl StaticBuilder {
    /// Create a new static builder with the built-in blocks.
    pub fn new(config: BuildConfig) -> Self {
        Self::with_registry(config, Arc::new(BlockRegistry::with_builtin_blocks()))
    }

    /// Create a builder rendering through the given registry.
    pub fn with_registry(config: BuildConfig, registry: Arc<BlockRegistry>) -> Self {
        Self {
            config,
            registry,
            templates: TemplateEngine::new(),
        }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Build the static site.
    pub async fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        let pages = self.discover_pages()?;
        let nav = self.build_navigation(&pages);

        tracing::info!(
            "Building {} pattern pages from {}",
            pages.len(),
            self.config.patterns_dir.display()
        );

        let results: Vec<Result<usize, BuildError>> = pages
            .par_iter()
            .map(|page| self.build_page(page, &nav))
            .collect();

        let mut total_blocks = 0;
        for result in results {
            total_blocks += result?;
        }

        self.generate_assets()?;

        let duration = start.elapsed();

        Ok(BuildResult {
            pages: pages.len(),
            blocks: total_blocks,
            duration_ms: duration.as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Discover all pattern pages, sorted by frontmatter order.
    pub fn discover_pages(&self) -> Result<Vec<Page>, BuildError> {
        let mut pages = Vec::new();

        if !self.config.patterns_dir.exists() {
            return Err(BuildError::ReadError(format!(
                "Patterns directory not found: {}",
                self.config.patterns_dir.display()
            )));
        }

        for entry in WalkDir::new(&self.config.patterns_dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            if !path.is_file() || !is_pattern_file(path) {
                continue;
            }

            let source = fs::read_to_string(path)
                .map_err(|e| BuildError::ReadError(format!("{}: {}", path.display(), e)))?;

            let doc = parse_pattern(&source).map_err(|e| BuildError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

            let relative_path = path
                .strip_prefix(&self.config.patterns_dir)
                .unwrap_or(path)
                .to_path_buf();

            let output_path = self.calculate_output_path(&relative_path, doc.frontmatter.as_ref());
            let url = self.path_to_url(&output_path);

            pages.push(Page {
                source_path: path.to_path_buf(),
                relative_path,
                output_path,
                url,
                doc,
            });
        }

        // Stable sort keeps file-name order among equal orders
        pages.sort_by_key(Page::order);

        Ok(pages)
    }

    /// Calculate the output file for a page.
    fn calculate_output_path(&self, relative: &Path, frontmatter: Option<&Frontmatter>) -> PathBuf {
        if let Some(slug) = frontmatter.and_then(|fm| fm.slug.as_deref()) {
            let slug = Path::new(slug.trim_matches('/'));
            if slug.components().all(|c| matches!(c, Component::Normal(_))) {
                return self.config.output_dir.join(slug).join("index.html");
            }
            tracing::warn!(
                "Ignoring slug {} for {}: it leaves the output directory",
                slug.display(),
                relative.display()
            );
        }

        let stem = relative
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("index");
        let parent = relative.parent().unwrap_or(Path::new(""));

        if stem == "index" {
            // patterns/index.md -> dist/index.html
            self.config.output_dir.join(parent).join("index.html")
        } else {
            // patterns/cards.md -> dist/cards/index.html
            self.config
                .output_dir
                .join(parent)
                .join(stem)
                .join("index.html")
        }
    }

    /// Convert an output path to its site URL.
    fn path_to_url(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.config.output_dir).unwrap_or(path);

        let url = relative
            .parent()
            .map(|p| {
                p.components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/")
            })
            .unwrap_or_default();

        if url.is_empty() {
            self.config.base_url.clone()
        } else {
            format!("{}{}/", self.config.base_url, url)
        }
    }

    /// Build navigation: root pages first, then one section per subdirectory.
    pub fn build_navigation(&self, pages: &[Page]) -> Vec<NavItem> {
        let mut nav = Vec::new();
        let mut sections: BTreeMap<PathBuf, Vec<NavItem>> = BTreeMap::new();

        for page in pages.iter().filter(|p| p.in_nav()) {
            let item = NavItem {
                title: page.title(),
                path: page.url.clone(),
                children: Vec::new(),
                active: false,
            };

            let parent = page.relative_path.parent().unwrap_or(Path::new(""));
            if parent.as_os_str().is_empty() {
                nav.push(item);
            } else {
                sections.entry(parent.to_path_buf()).or_default().push(item);
            }
        }

        for (dir, items) in sections {
            let dir_name = dir
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or("Section");

            let path = dir
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            nav.push(NavItem {
                title: capitalize(dir_name),
                path: format!("{}{}/", self.config.base_url, path),
                children: items,
                active: false,
            });
        }

        nav
    }

    /// Render a page to a complete HTML document.
    pub fn render_page(
        &self,
        page: &Page,
        nav: &[NavItem],
        live_reload: bool,
    ) -> Result<RenderedPage, BuildError> {
        let rendered = render_pattern(&page.doc, &self.registry, self.config.preview);
        if !rendered.missing.is_empty() {
            tracing::debug!(
                "{} unknown blocks in {}",
                rendered.missing.len(),
                page.source_path.display()
            );
        }

        let context = Context {
            title: page.title(),
            site_title: self.config.title.clone(),
            description: page
                .doc
                .frontmatter
                .as_ref()
                .and_then(|f| f.description.clone()),
            content: rendered.html,
            nav: NavItem::mark_active(nav, &page.url),
            toc: page.doc.toc.clone(),
            base_url: self.config.base_url.clone(),
            styles: self
                .config
                .styles
                .iter()
                .map(|s| format!("{}assets/{}", self.config.base_url, stylesheet_name(s)))
                .collect(),
            live_reload,
        };

        let html = self
            .templates
            .render_page("pattern.html", &context)
            .map_err(|e| BuildError::TemplateError(e.to_string()))?;

        Ok(RenderedPage {
            html,
            blocks: rendered.blocks,
        })
    }

    /// Render and write a single page. Returns the number of blocks rendered.
    fn build_page(&self, page: &Page, nav: &[NavItem]) -> Result<usize, BuildError> {
        let rendered = self.render_page(page, nav, false)?;

        if let Some(parent) = page.output_path.parent() {
            fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
        }

        fs::write(&page.output_path, rendered.html)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        tracing::debug!(
            "Wrote {} ({} blocks)",
            page.output_path.display(),
            rendered.blocks
        );

        Ok(rendered.blocks)
    }

    /// Write generated assets and copy configured stylesheets.
    fn generate_assets(&self) -> Result<(), BuildError> {
        let assets_dir = self.config.output_dir.join("assets");
        fs::create_dir_all(&assets_dir).map_err(|e| BuildError::WriteError(e.to_string()))?;

        for asset in Asset::ALL {
            let content = AssetPipeline::generate(asset, self.config.minify);
            fs::write(assets_dir.join(asset.file_name()), content)
                .map_err(|e| BuildError::WriteError(e.to_string()))?;
        }

        for style_path in &self.config.styles {
            let source_path = PathBuf::from(style_path);
            if !source_path.exists() {
                tracing::warn!("Stylesheet not found: {}", style_path);
                continue;
            }

            let content = fs::read_to_string(&source_path).map_err(|e| {
                BuildError::ReadError(format!("Failed to read stylesheet: {}", e))
            })?;
            let content = if self.config.minify {
                AssetPipeline::minify_css(&content).unwrap_or(content)
            } else {
                content
            };

            fs::write(assets_dir.join(stylesheet_name(style_path)), content)
                .map_err(|e| BuildError::WriteError(e.to_string()))?;
            tracing::info!("Copied stylesheet from {}", style_path);
        }

        Ok(())
    }
}

/// Whether a path is a pattern document.
pub fn is_pattern_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("md") | Some("markdown")
    )
}

/// File name a configured stylesheet is published under.
fn stylesheet_name(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|f| f.to_str())
        .unwrap_or("style.css")
}

/// Capitalize first letter of a string.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
