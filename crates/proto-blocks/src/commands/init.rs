//! Scaffold a pattern library in the current project.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command.
pub fn run(config_path: &Path, yes: bool) -> Result<()> {
    let root = config_path.parent().unwrap_or(Path::new(""));
    let written = scaffold(root, config_path, yes)?;

    if written == 0 {
        tracing::warn!("Nothing written; files already exist. Use --yes to overwrite.");
        return Ok(());
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'proto-blocks dev' to start the development server.");
    Ok(())
}

/// Write the config and sample patterns. Returns the number of files written.
fn scaffold(root: &Path, config_path: &Path, overwrite: bool) -> Result<usize> {
    let patterns_dir = root.join("patterns");
    fs::create_dir_all(patterns_dir.join("marketing"))
        .context("Failed to create patterns directory")?;

    let files = [
        (config_path.to_path_buf(), DEFAULT_CONFIG),
        (patterns_dir.join("index.md"), DEFAULT_INDEX),
        (patterns_dir.join("cards.md"), DEFAULT_CARDS),
        (patterns_dir.join("marketing/landing.md"), DEFAULT_LANDING),
    ];

    let mut written = 0;
    for (path, content) in files {
        if path.exists() && !overwrite {
            tracing::debug!("Keeping existing {}", path.display());
            continue;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Created {}", path.display());
        written += 1;
    }

    Ok(written)
}

const DEFAULT_CONFIG: &str = r#"# proto-blocks configuration

[patterns]
# Source directory for pattern pages
dir = "patterns"

# Output directory for the built library
output = "dist"

title = "Block Patterns"

# Base URL (for deployment)
base_url = "/"

# Extra stylesheets included on every page
styles = []

[build]
minify = true

# Render every block as an editor placeholder
preview = false

[server]
port = 7777
host = "127.0.0.1"
"#;

const DEFAULT_INDEX: &str = r#"---
title: Welcome
order: 1
---

# Block Patterns

Each page in `patterns/` is markdown. A fenced block whose info string starts
with `block` renders a content block; its body is the block's attributes in YAML.

```block header-nav
navItems:
  - label: Home
    url: /
  - label: Cards
    url: /cards/
  - label: Landing
    url: /marketing/landing/
ctaButton:
  text: Get Started
  url: /cards/
```

Add `preview` after the block name to see the editor placeholder:

```block stats preview
```
"#;

const DEFAULT_CARDS: &str = r#"---
title: Cards
description: Card layouts and image positions
order: 2
---

# Cards

## Vertical

```block card
title: Vertical card
content: <p>Image on top, text below.</p>
image:
  url: https://picsum.photos/seed/proto/640/360
  alt: Sample image
link:
  url: /marketing/landing/
  text: See it in a page
```

## Horizontal

```block card
layout: horizontal
imagePosition: right
title: Horizontal card
content: <p>Image beside the text.</p>
image:
  url: https://picsum.photos/seed/blocks/640/360
```

## Overlay

```block card
layout: overlay
title: Overlay card
showLink: false
image:
  url: https://picsum.photos/seed/overlay/640/360
```
"#;

const DEFAULT_LANDING: &str = r##"---
title: Landing Page
order: 1
---

# Landing Page

```block hero
title: Build pages from blocks
subtitle: Hero, stats and testimonials composed in markdown.
backgroundColor: "#1e3a8a"
overlayOpacity: 40
minHeight: 50
innerContent: <p><a href="/cards/">Browse the cards</a></p>
```

## Numbers

```block stats
style: boxed
columns: 3
showDividers: true
stats:
  - number: 120
    suffix: +
    label: Blocks shipped
  - prefix: $
    number: 4
    suffix: M
    label: Saved in design time
  - number: 99
    suffix: "%"
    label: Uptime
```

## Customers

```block testimonial
style: card
quote: <p>We replaced three page builders with five blocks.</p>
authorName: Jordan Lee
authorTitle: Head of Web, Acme
rating: 4
```
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proto_blocks_pattern::parse_pattern;
    use tempfile::tempdir;

    #[test]
    fn scaffolds_config_and_patterns() {
        let temp = tempdir().unwrap();
        let config = temp.path().join("blocks.toml");

        let written = scaffold(temp.path(), &config, false).unwrap();

        assert_eq!(written, 4);
        assert!(config.exists());
        assert!(temp.path().join("patterns/index.md").exists());
        assert!(temp.path().join("patterns/marketing/landing.md").exists());
    }

    #[test]
    fn keeps_existing_files_unless_overwriting() {
        let temp = tempdir().unwrap();
        let config = temp.path().join("blocks.toml");
        fs::write(&config, "# mine\n").unwrap();

        assert_eq!(scaffold(temp.path(), &config, false).unwrap(), 3);
        assert_eq!(fs::read_to_string(&config).unwrap(), "# mine\n");

        assert_eq!(scaffold(temp.path(), &config, true).unwrap(), 4);
        assert_eq!(fs::read_to_string(&config).unwrap(), DEFAULT_CONFIG);
    }

    #[test]
    fn default_config_parses() {
        let config: crate::config::Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, crate::config::Config::default());
    }

    #[test]
    fn sample_patterns_only_use_known_blocks() {
        let registry = proto_blocks_core::BlockRegistry::with_builtin_blocks();

        for source in [DEFAULT_INDEX, DEFAULT_CARDS, DEFAULT_LANDING] {
            let doc = parse_pattern(source).unwrap();
            assert!(!doc.blocks.is_empty());
            for block in &doc.blocks {
                assert!(registry.contains(&block.name), "unknown block {}", block.name);
                assert!(!block.attributes.is_empty() || block.preview);
            }
        }
    }
}
