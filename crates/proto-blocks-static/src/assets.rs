//! Stylesheets and scripts shipped with every pattern site.

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

/// Errors from the asset pipeline.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("CSS parse error: {0}")]
    Parse(String),

    #[error("CSS minify error: {0}")]
    Minify(String),
}

/// A generated asset file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Asset {
    /// Page chrome: sidebar, content column, table of contents
    MainCss,
    /// Styles for the built-in blocks
    BlocksCss,
    /// Header navigation toggle
    BlocksJs,
}

impl Asset {
    pub const ALL: [Asset; 3] = [Asset::MainCss, Asset::BlocksCss, Asset::BlocksJs];

    /// File name under `assets/`.
    pub fn file_name(self) -> &'static str {
        match self {
            Asset::MainCss => "main.css",
            Asset::BlocksCss => "blocks.css",
            Asset::BlocksJs => "blocks.js",
        }
    }

    /// Look up an asset by its file name.
    pub fn from_file_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.file_name() == name)
    }

    /// MIME type for serving the asset.
    pub fn content_type(self) -> &'static str {
        match self {
            Asset::MainCss | Asset::BlocksCss => "text/css; charset=utf-8",
            Asset::BlocksJs => "application/javascript; charset=utf-8",
        }
    }

    pub fn is_css(self) -> bool {
        matches!(self, Asset::MainCss | Asset::BlocksCss)
    }

    /// Unprocessed source.
    pub fn source(self) -> &'static str {
        match self {
            Asset::MainCss => MAIN_CSS,
            Asset::BlocksCss => BLOCKS_CSS,
            Asset::BlocksJs => BLOCKS_JS,
        }
    }
}

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Produce an asset, minifying stylesheets when asked.
    ///
    /// A stylesheet that fails to minify is returned as written.
    pub fn generate(asset: Asset, minify: bool) -> String {
        let source = asset.source();
        if !(minify && asset.is_css()) {
            return source.to_string();
        }

        match Self::minify_css(source) {
            Ok(css) => css,
            Err(e) => {
                tracing::warn!("Serving {} unminified: {}", asset.file_name(), e);
                source.to_string()
            }
        }
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, AssetError> {
        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| AssetError::Parse(e.to_string()))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| AssetError::Minify(e.to_string()))?;

        Ok(minified.code)
    }
}

const MAIN_CSS: &str = r#"/* Pattern library chrome */

:root {
  --sidebar-width: 260px;
  --toc-width: 200px;
  --content-max-width: 1100px;
  --chrome-bg: #ffffff;
  --chrome-fg: #1e1e1e;
  --chrome-muted: #f4f4f5;
  --chrome-muted-fg: #5b5b66;
  --chrome-border: #e4e4e7;
  --chrome-accent: #2f5bea;
}

* {
  box-sizing: border-box;
}

body {
  margin: 0;
  font-family: system-ui, -apple-system, sans-serif;
  background: var(--chrome-bg);
  color: var(--chrome-fg);
  line-height: 1.6;
}

.layout {
  display: grid;
  grid-template-columns: var(--sidebar-width) 1fr;
  min-height: 100vh;
}

.sidebar {
  background: var(--chrome-muted);
  border-right: 1px solid var(--chrome-border);
  padding: 1.5rem;
  position: sticky;
  top: 0;
  height: 100vh;
  overflow-y: auto;
}

.nav-logo {
  display: block;
  margin-bottom: 1.5rem;
  font-weight: 700;
  font-size: 1.125rem;
  color: var(--chrome-fg);
  text-decoration: none;
}

.nav-list,
.nav-children {
  list-style: none;
  margin: 0;
  padding: 0;
}

.nav-children {
  margin-left: 1rem;
}

.nav-item a {
  display: block;
  padding: 0.375rem 0.75rem;
  border-radius: 0.375rem;
  color: var(--chrome-muted-fg);
  text-decoration: none;
}

.nav-item a:hover {
  color: var(--chrome-fg);
}

.nav-item.active > a {
  background: var(--chrome-accent);
  color: #ffffff;
}

.main {
  display: grid;
  grid-template-columns: 1fr var(--toc-width);
  gap: 2rem;
  padding: 2rem;
  max-width: calc(var(--content-max-width) + var(--toc-width) + 4rem);
}

.pattern h1 {
  font-size: 2.25rem;
  margin: 0 0 1.5rem;
}

.pattern h2 {
  font-size: 1.5rem;
  margin: 2.5rem 0 1rem;
  padding-bottom: 0.5rem;
  border-bottom: 1px solid var(--chrome-border);
}

.pattern pre {
  background: var(--chrome-muted);
  border: 1px solid var(--chrome-border);
  border-radius: 0.5rem;
  padding: 1rem;
  overflow-x: auto;
  font-size: 0.875rem;
}

.proto-pattern__block {
  border: 1px dashed var(--chrome-border);
  border-radius: 0.5rem;
  padding: 1.5rem;
  margin: 1.5rem 0;
}

.toc {
  position: sticky;
  top: 2rem;
  align-self: start;
  font-size: 0.875rem;
}

.toc ul {
  list-style: none;
  margin: 0;
  padding: 0;
}

.toc a {
  color: var(--chrome-muted-fg);
  text-decoration: none;
}

.toc-level-3 {
  padding-left: 1rem;
}

@media (max-width: 1024px) {
  .layout,
  .main {
    grid-template-columns: 1fr;
  }

  .sidebar {
    position: static;
    height: auto;
  }

  .toc {
    display: none;
  }
}
"#;

const BLOCKS_CSS: &str = r#"/* Built-in block styles */

.flex { display: flex; }
.flex-col { flex-direction: column; }
.flex-row { flex-direction: row; }
.flex-row-reverse { flex-direction: row-reverse; }
.relative { position: relative; }

/* Card */
.proto-card {
  overflow: hidden;
  border: 1px solid #e4e4e7;
  border-radius: 0.5rem;
  background: #ffffff;
}

.proto-card__image {
  margin: 0;
  min-height: 160px;
  background: #f4f4f5;
}

.proto-card--horizontal .proto-card__image {
  flex: 0 0 40%;
}

.proto-card__img {
  display: block;
  width: 100%;
  height: 100%;
  object-fit: cover;
}

.proto-card__body {
  display: flex;
  flex-direction: column;
  gap: 0.75rem;
  padding: 1.25rem;
}

.proto-card__body--overlay {
  position: absolute;
  inset: auto 0 0 0;
  background: linear-gradient(transparent, rgba(0, 0, 0, 0.75));
  color: #ffffff;
}

.proto-card__title {
  margin: 0;
  font-size: 1.25rem;
}

.proto-card__link {
  font-weight: 600;
}

/* Hero */
.proto-hero {
  position: relative;
  display: flex;
  padding: 4rem 2rem;
  background-size: cover;
  background-position: center;
}

.proto-hero--vertical-top { align-items: flex-start; }
.proto-hero--vertical-center { align-items: center; }
.proto-hero--vertical-bottom { align-items: flex-end; }
.proto-hero--content-left { justify-content: flex-start; text-align: left; }
.proto-hero--content-center { justify-content: center; text-align: center; }
.proto-hero--content-right { justify-content: flex-end; text-align: right; }

.proto-hero__overlay {
  position: absolute;
  inset: 0;
}

.proto-hero__content {
  position: relative;
  max-width: 48rem;
}

.proto-hero__title {
  margin: 0 0 1rem;
  font-size: 3rem;
  line-height: 1.1;
}

.proto-hero__subtitle {
  font-size: 1.25rem;
  opacity: 0.9;
}

/* Stats */
.proto-stats__grid {
  display: grid;
  gap: 2rem;
}

.proto-stats__item {
  text-align: center;
}

.proto-stats--boxed .proto-stats__item {
  padding: 1.5rem;
  border: 1px solid #e4e4e7;
  border-radius: 0.5rem;
}

.proto-stats--dividers .proto-stats__item + .proto-stats__item {
  border-left: 1px solid #e4e4e7;
}

.proto-stats__number {
  font-weight: 700;
  line-height: 1;
}

.proto-stats__label {
  margin-top: 0.5rem;
  color: #5b5b66;
}

/* Testimonial */
.proto-testimonial {
  margin: 0;
  padding: 2rem;
}

.proto-testimonial--card {
  border-radius: 0.75rem;
  background: #ffffff;
  box-shadow: 0 4px 16px rgba(0, 0, 0, 0.08);
}

.proto-testimonial__star {
  color: #d4d4d8;
}

.proto-testimonial__star--filled {
  color: #f5a623;
}

.proto-testimonial__quote {
  margin: 1rem 0;
  font-size: 1.125rem;
  font-style: italic;
}

.proto-testimonial__author {
  display: flex;
  align-items: center;
  gap: 0.75rem;
}

.proto-testimonial__avatar img {
  width: 48px;
  height: 48px;
  border-radius: 50%;
  object-fit: cover;
}

.proto-testimonial__name {
  display: block;
  font-style: normal;
  font-weight: 600;
}

.proto-testimonial__role {
  color: #5b5b66;
  font-size: 0.875rem;
}

/* Header navigation */
.proto-header-nav {
  background: #ffffff;
  border-bottom: 1px solid #e4e4e7;
}

.proto-header-nav--fixed {
  position: sticky;
  top: 0;
  z-index: 40;
}

.proto-header-nav__inner {
  display: flex;
  align-items: center;
  gap: 2rem;
  padding: 1rem 1.5rem;
}

.proto-header-nav__logo img {
  display: block;
  max-height: 40px;
}

.proto-header-nav__toggle {
  display: none;
  flex-direction: column;
  gap: 4px;
  border: 0;
  background: none;
  cursor: pointer;
}

.proto-header-nav__toggle-bar {
  display: block;
  width: 22px;
  height: 2px;
  background: currentColor;
}

.proto-header-nav__list {
  display: flex;
  gap: 1.5rem;
  list-style: none;
  margin: 0;
  padding: 0;
}

.proto-header-nav__link {
  color: inherit;
  text-decoration: none;
}

.proto-header-nav__item--active > .proto-header-nav__link {
  font-weight: 600;
}

.proto-header-nav__cta {
  margin-left: auto;
  padding: 0.5rem 1rem;
  border-radius: 0.375rem;
  background: #2f5bea;
  color: #ffffff;
  text-decoration: none;
}

@media (max-width: 768px) {
  .proto-header-nav__toggle {
    display: flex;
    margin-left: auto;
  }

  .proto-header-nav__nav {
    display: none;
    flex-basis: 100%;
  }

  .proto-header-nav--open .proto-header-nav__nav {
    display: block;
  }

  .proto-header-nav__inner {
    flex-wrap: wrap;
  }

  .proto-header-nav__list {
    flex-direction: column;
  }
}
"#;

const BLOCKS_JS: &str = r#"// Header navigation toggle
(function() {
  'use strict';

  document.querySelectorAll('.proto-header-nav').forEach(header => {
    const toggle = header.querySelector('.proto-header-nav__toggle');
    if (!toggle) return;

    toggle.addEventListener('click', () => {
      const open = header.classList.toggle('proto-header-nav--open');
      toggle.setAttribute('aria-expanded', open ? 'true' : 'false');
    });
  });
})();
"#;
