//! Hero block: full-width section with background, overlay and headline.

use crate::attribute_enum;
use crate::attributes::{format_number, AttributeBag, AttributeEnum, FromAttributes};
use crate::color::{parse_hex, Rgb};
use crate::markup::{ClassList, StyleList};
use crate::sanitize::{css_url, Sanitizer};
use crate::traits::{BlockRenderer, RenderContext};

pub const DEFAULT_BACKGROUND_COLOR: &str = "#1e1e1e";
pub const DEFAULT_TEXT_COLOR: &str = "#ffffff";
pub const DEFAULT_OVERLAY_OPACITY: f64 = 70.0;
pub const DEFAULT_MIN_HEIGHT: f64 = 60.0;

attribute_enum! {
    /// Horizontal alignment of the hero content.
    pub enum ContentAlignment {
        #[default]
        Center => "center",
        Left => "left",
        Right => "right",
    }
}

attribute_enum! {
    /// Vertical alignment of the hero content.
    pub enum VerticalAlignment {
        #[default]
        Center => "center",
        Top => "top",
        Bottom => "bottom",
    }
}

/// Typed hero attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct HeroAttributes {
    pub title: String,
    /// Rich text
    pub subtitle: String,
    pub background_image: String,
    /// Validated hex color
    pub background_color: String,
    /// 0–100
    pub overlay_opacity: f64,
    /// Validated hex color
    pub text_color: String,
    pub content_alignment: ContentAlignment,
    /// Viewport height units
    pub min_height: f64,
    pub vertical_alignment: VerticalAlignment,
}

impl FromAttributes for HeroAttributes {
    fn from_attributes(bag: &AttributeBag) -> Self {
        Self {
            title: bag.str_or("title", ""),
            subtitle: bag.str_or("subtitle", ""),
            background_image: bag.object("backgroundImage").str_or("url", ""),
            background_color: hex_or(bag, "backgroundColor", DEFAULT_BACKGROUND_COLOR),
            overlay_opacity: bag.f64_or("overlayOpacity", DEFAULT_OVERLAY_OPACITY),
            text_color: hex_or(bag, "textColor", DEFAULT_TEXT_COLOR),
            content_alignment: ContentAlignment::read(bag, "contentAlignment"),
            min_height: bag.f64_or("minHeight", DEFAULT_MIN_HEIGHT),
            vertical_alignment: VerticalAlignment::read(bag, "verticalAlignment"),
        }
    }
}

impl Default for HeroAttributes {
    fn default() -> Self {
        Self::from_attributes(&AttributeBag::new())
    }
}

impl HeroAttributes {
    pub fn has_background_image(&self) -> bool {
        !self.background_image.trim().is_empty()
    }

    /// The overlay color: the background color at `overlay_opacity / 100`.
    pub fn overlay_color(&self) -> String {
        let alpha = self.overlay_opacity / 100.0;
        parse_hex(&self.background_color)
            .or_else(|e| {
                tracing::warn!("Hero overlay falls back to default color: {}", e);
                parse_hex(DEFAULT_BACKGROUND_COLOR)
            })
            .unwrap_or(Rgb { r: 0, g: 0, b: 0 })
            .to_rgba(alpha)
    }
}

/// Read a hex color, falling back to `default` when it is missing or malformed.
fn hex_or(bag: &AttributeBag, key: &str, default: &str) -> String {
    let value = bag.str_or(key, default);
    let value = value.trim();
    match parse_hex(value) {
        Ok(_) => value.to_string(),
        Err(e) => {
            tracing::warn!("Ignoring {}: {}", key, e);
            default.to_string()
        }
    }
}

/// Render a hero from typed attributes.
pub fn render_hero(attrs: &HeroAttributes, ctx: &RenderContext<'_>, s: &dyn Sanitizer) -> String {
    let has_image = attrs.has_background_image();

    let mut classes = ClassList::new(["proto-hero"]);
    classes
        .add(format!("proto-hero--content-{}", attrs.content_alignment.as_str()))
        .add(format!("proto-hero--vertical-{}", attrs.vertical_alignment.as_str()))
        .add_if(has_image, "proto-hero--has-image");

    let mut styles = StyleList::new();
    styles
        .push("min-height", format!("{}vh", format_number(attrs.min_height)))
        .push("background-color", attrs.background_color.as_str())
        .push("color", attrs.text_color.as_str())
        .push_if(
            has_image,
            "background-image",
            format!("url('{}')", css_url(&s.escape_url(&attrs.background_image))),
        );

    let mut html = format!("<section{}>", ctx.wrapper.merge(&classes, &styles, s));

    if ctx.shows(has_image) {
        html.push_str(&format!(
            r#"<div class="proto-hero__overlay" style="background-color: {}" aria-hidden="true"></div>"#,
            s.escape_attr(&attrs.overlay_color())
        ));
    }

    html.push_str(r#"<div class="proto-hero__content">"#);
    html.push_str(&format!(
        r#"<h1 class="proto-hero__title">{}</h1>"#,
        s.escape_html(&attrs.title)
    ));

    if ctx.shows(!attrs.subtitle.trim().is_empty()) {
        html.push_str(&format!(
            r#"<div class="proto-hero__subtitle">{}</div>"#,
            s.sanitize_rich_text(&attrs.subtitle)
        ));
    }

    html.push_str(ctx.inner_content);
    html.push_str("</div></section>");
    html
}

/// The `proto/hero` block.
#[derive(Debug, Default)]
pub struct Hero;

impl BlockRenderer for Hero {
    fn name(&self) -> &'static str {
        "proto/hero"
    }

    fn title(&self) -> &'static str {
        "Hero"
    }

    fn render(&self, ctx: &RenderContext<'_>, sanitizer: &dyn Sanitizer) -> String {
        render_hero(&HeroAttributes::from_attributes(ctx.attributes), ctx, sanitizer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitize::DefaultSanitizer;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn render(value: serde_json::Value, inner: &str, preview: bool) -> String {
        let bag = AttributeBag::from_value(value);
        Hero.render(
            &RenderContext::new(&bag)
                .with_inner_content(inner)
                .with_preview(preview),
            &DefaultSanitizer,
        )
    }

    #[test]
    fn applies_defaults() {
        let attrs = HeroAttributes::default();
        assert_eq!(attrs.background_color, "#1e1e1e");
        assert_eq!(attrs.text_color, "#ffffff");
        assert_eq!(attrs.overlay_opacity, 70.0);
        assert_eq!(attrs.min_height, 60.0);
        assert_eq!(attrs.overlay_color(), "rgba(30, 30, 30, 0.7)");
    }

    #[test]
    fn renders_minimal_live_hero() {
        let html = render(json!({ "title": "Welcome" }), "", false);
        assert_eq!(
            html,
            concat!(
                r#"<section class="proto-hero proto-hero--content-center proto-hero--vertical-center" "#,
                r#"style="min-height: 60vh; background-color: #1e1e1e; color: #ffffff">"#,
                r#"<div class="proto-hero__content"><h1 class="proto-hero__title">Welcome</h1></div></section>"#
            )
        );
    }

    #[test]
    fn renders_background_image_and_overlay() {
        let html = render(
            json!({
                "backgroundImage": { "url": "https://example.com/bg.jpg" },
                "backgroundColor": "#000",
                "overlayOpacity": 50,
                "contentAlignment": "left",
                "verticalAlignment": "bottom",
                "minHeight": 80
            }),
            "",
            false,
        );

        assert!(html.contains("proto-hero--content-left"));
        assert!(html.contains("proto-hero--vertical-bottom"));
        assert!(html.contains("proto-hero--has-image"));
        assert!(html.contains(
            "min-height: 80vh; background-color: #000; color: #ffffff; background-image: url(&#039;https://example.com/bg.jpg&#039;)"
        ));
        assert!(html.contains(r#"style="background-color: rgba(0, 0, 0, 0.5)""#));
    }

    #[test]
    fn malformed_colors_fall_back() {
        let attrs = HeroAttributes::from_attributes(&AttributeBag::from_value(json!({
            "backgroundColor": "red; background: url(x)",
            "textColor": "#12"
        })));
        assert_eq!(attrs.background_color, DEFAULT_BACKGROUND_COLOR);
        assert_eq!(attrs.text_color, DEFAULT_TEXT_COLOR);
    }

    #[test]
    fn subtitle_and_overlay_follow_preview_law() {
        let live = render(json!({}), "", false);
        assert!(!live.contains("proto-hero__subtitle"));
        assert!(!live.contains("proto-hero__overlay"));

        let preview = render(json!({}), "", true);
        assert!(preview.contains(r#"<div class="proto-hero__subtitle"></div>"#));
        assert!(preview.contains("proto-hero__overlay"));
    }

    #[test]
    fn emits_inner_content_after_subtitle() {
        let html = render(
            json!({ "subtitle": "<em>Sub</em>" }),
            r#"<div class="buttons"></div>"#,
            false,
        );
        assert!(html.contains(
            r#"<div class="proto-hero__subtitle"><em>Sub</em></div><div class="buttons"></div></div></section>"#
        ));
    }

    #[test]
    fn background_url_cannot_inject_declarations() {
        let html = render(
            json!({ "backgroundImage": { "url": "https://x.test/a.jpg');background:url(https://evil.test/t" } }),
            "",
            false,
        );
        assert!(html.contains("url(&#039;https://x.test/a.jpg%27%29;background:url%28https://evil.test/t&#039;)"));
        assert!(!html.contains("a.jpg&#039;)"));
    }

    #[test]
    fn overlay_uses_default_color_for_invalid_background() {
        let attrs = HeroAttributes {
            background_color: "not a color".to_string(),
            ..HeroAttributes::default()
        };
        assert_eq!(attrs.overlay_color(), "rgba(30, 30, 30, 0.7)");
    }

    #[test]
    fn unclamped_opacity_passes_through() {
        let attrs = HeroAttributes::from_attributes(&AttributeBag::from_value(json!({ "overlayOpacity": 150 })));
        assert_eq!(attrs.overlay_color(), "rgba(30, 30, 30, 1.5)");
    }
}
