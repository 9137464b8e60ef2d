//! Project configuration (`blocks.toml`).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use proto_blocks_server::DevServerConfig;
use proto_blocks_static::BuildConfig;

/// Configuration file structure. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub patterns: PatternsConfig,
    pub build: BuildSettings,
    pub server: ServerSettings,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PatternsConfig {
    /// Source directory for pattern documents
    pub dir: String,
    /// Output directory for the built site
    pub output: String,
    pub title: String,
    pub base_url: String,
    /// Extra stylesheets to include on every page
    pub styles: Vec<String>,
}

impl Default for PatternsConfig {
    fn default() -> Self {
        Self {
            dir: "patterns".to_string(),
            output: "dist".to_string(),
            title: "Block Patterns".to_string(),
            base_url: "/".to_string(),
            styles: vec![],
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BuildSettings {
    pub minify: bool,
    /// Render every block as an editor placeholder
    pub preview: bool,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            minify: true,
            preview: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSettings {
    pub port: u16,
    pub host: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 7777,
            host: "127.0.0.1".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from `path`.
    ///
    /// A missing file yields the defaults; a malformed one is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No {} found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Static build settings, with command-line overrides applied.
    pub fn build_config(
        &self,
        output: Option<PathBuf>,
        no_minify: bool,
        preview: bool,
    ) -> BuildConfig {
        BuildConfig {
            patterns_dir: PathBuf::from(&self.patterns.dir),
            output_dir: output.unwrap_or_else(|| PathBuf::from(&self.patterns.output)),
            minify: self.build.minify && !no_minify,
            preview: self.build.preview || preview,
            base_url: normalize_base_url(&self.patterns.base_url),
            title: self.patterns.title.clone(),
            styles: self.patterns.styles.clone(),
        }
    }

    /// Dev server settings, with command-line overrides applied.
    pub fn dev_config(&self, port: Option<u16>, open: bool) -> DevServerConfig {
        DevServerConfig {
            patterns_dir: PathBuf::from(&self.patterns.dir),
            styles: self.patterns.styles.clone(),
            title: self.patterns.title.clone(),
            port: port.unwrap_or(self.server.port),
            host: self.server.host.clone(),
            open,
        }
    }
}

/// Base URLs always start and end with a slash.
fn normalize_base_url(base_url: &str) -> String {
    let trimmed = base_url.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = tempdir().unwrap();
        let config = Config::load(&temp.path().join("blocks.toml")).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.patterns.dir, "patterns");
        assert_eq!(config.server.port, 7777);
        assert!(config.build.minify);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("blocks.toml");
        fs::write(
            &path,
            "[patterns]\ntitle = \"Acme Blocks\"\nstyles = [\"theme.css\"]\n\n[server]\nport = 9000\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();

        assert_eq!(config.patterns.title, "Acme Blocks");
        assert_eq!(config.patterns.styles, vec!["theme.css".to_string()]);
        assert_eq!(config.patterns.output, "dist");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("blocks.toml");

        fs::write(&path, "[patterns\n").unwrap();
        assert!(Config::load(&path).is_err());

        fs::write(&path, "[server]\nport = \"high\"\n").unwrap();
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn command_line_overrides() {
        let config = Config::default();

        let build = config.build_config(Some(PathBuf::from("public")), true, true);
        assert_eq!(build.output_dir, PathBuf::from("public"));
        assert!(!build.minify);
        assert!(build.preview);

        let dev = config.dev_config(Some(8080), false);
        assert_eq!(dev.port, 8080);
        assert!(!dev.open);
        assert_eq!(config.dev_config(None, true).port, 7777);
    }

    #[test]
    fn normalizes_base_url() {
        assert_eq!(normalize_base_url("/"), "/");
        assert_eq!(normalize_base_url(""), "/");
        assert_eq!(normalize_base_url("docs"), "/docs/");
        assert_eq!(normalize_base_url("/docs/"), "/docs/");
    }
}
