//! Render one block to stdout.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde_json::Value;

use proto_blocks_core::{AttributeBag, BlockRegistry, RenderContext, WrapperAttributes};

/// Options for the render command.
#[derive(Debug, Default)]
pub struct RenderOptions {
    pub block: String,
    /// JSON attribute file; `-` reads stdin
    pub attributes: Option<PathBuf>,
    pub inner: String,
    pub preview: bool,
    pub class: Option<String>,
    pub style: Option<String>,
}

/// Run the render command.
pub fn run(options: &RenderOptions) -> Result<()> {
    let source = match &options.attributes {
        None => None,
        Some(path) if path.as_os_str() == "-" => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read attributes from stdin")?;
            Some(input)
        }
        Some(path) => Some(
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?,
        ),
    };

    let registry = BlockRegistry::with_builtin_blocks();
    println!("{}", render(&registry, options, source.as_deref())?);
    Ok(())
}

/// Render the requested block with attributes parsed from `source`.
fn render(registry: &BlockRegistry, options: &RenderOptions, source: Option<&str>) -> Result<String> {
    let attributes = parse_attributes(source)?;

    let mut wrapper = WrapperAttributes::new();
    if let Some(class) = &options.class {
        wrapper = wrapper.with_class(class.as_str());
    }
    if let Some(style) = &options.style {
        wrapper = wrapper.with_style(style.as_str());
    }

    let ctx = RenderContext::new(&attributes)
        .with_inner_content(&options.inner)
        .with_preview(options.preview)
        .with_wrapper(&wrapper);

    registry.render(&options.block, &ctx).with_context(|| {
        format!(
            "Available blocks: {}",
            registry.names().join(", ")
        )
    })
}

fn parse_attributes(source: Option<&str>) -> Result<AttributeBag> {
    let Some(source) = source.filter(|s| !s.trim().is_empty()) else {
        return Ok(AttributeBag::new());
    };

    match serde_json::from_str(source).context("Attributes are not valid JSON")? {
        value @ Value::Object(_) => Ok(AttributeBag::from_value(value)),
        Value::Null => Ok(AttributeBag::new()),
        _ => bail!("Attributes must be a JSON object"),
    }
}
