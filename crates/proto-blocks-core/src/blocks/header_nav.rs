//! Header navigation block: logo, menu links and a call-to-action button.

use crate::attributes::{AttributeBag, FromAttributes, Image, Link};
use crate::markup::{optional_attr, ClassList, StyleList};
use crate::sanitize::Sanitizer;
use crate::traits::{BlockRenderer, RenderContext};

/// One menu link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavItem {
    pub label: String,
    pub url: String,
}

impl NavItem {
    fn sample(label: &str, url: &str) -> Self {
        Self {
            label: label.to_string(),
            url: url.to_string(),
        }
    }
}

impl FromAttributes for NavItem {
    fn from_attributes(bag: &AttributeBag) -> Self {
        Self {
            label: bag.str_or("label", ""),
            url: bag.str_or("url", "#"),
        }
    }
}

/// Links shown in the editor while the menu is still empty.
pub fn placeholder_nav_items() -> Vec<NavItem> {
    vec![
        NavItem::sample("Home", "/"),
        NavItem::sample("About", "/about"),
        NavItem::sample("Services", "/services"),
        NavItem::sample("Contact", "/contact"),
    ]
}

/// Typed header navigation attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderNavAttributes {
    pub fixed_position: bool,
    pub show_cta: bool,
    pub nav_items: Vec<NavItem>,
    pub cta_button: Link,
    pub logo: Image,
    pub home_url: String,
}

impl FromAttributes for HeaderNavAttributes {
    fn from_attributes(bag: &AttributeBag) -> Self {
        Self {
            fixed_position: bag.bool_or("fixedPosition", false),
            show_cta: bag.bool_or("showCta", true),
            nav_items: bag
                .list("navItems")
                .iter()
                .map(NavItem::from_attributes)
                .collect(),
            cta_button: Link::read(&bag.object("ctaButton"), "Get Started"),
            logo: Image::from_attributes(&bag.object("logo")),
            home_url: bag.str_or("homeUrl", "/"),
        }
    }
}

impl Default for HeaderNavAttributes {
    fn default() -> Self {
        Self::from_attributes(&AttributeBag::new())
    }
}

/// Render the header navigation from typed attributes.
pub fn render_header_nav(
    attrs: &HeaderNavAttributes,
    ctx: &RenderContext<'_>,
    s: &dyn Sanitizer,
) -> String {
    let mut classes = ClassList::new(["proto-header-nav"]);
    classes.add_if(attrs.fixed_position, "proto-header-nav--fixed");

    let placeholders;
    let items: &[NavItem] = if attrs.nav_items.is_empty() && ctx.is_preview {
        placeholders = placeholder_nav_items();
        &placeholders
    } else {
        &attrs.nav_items
    };

    let mut html = format!("<header{}>", ctx.wrapper.merge(&classes, &StyleList::new(), s));
    html.push_str(r#"<div class="proto-header-nav__inner">"#);

    if ctx.shows(attrs.logo.has_value()) {
        html.push_str(r#"<div class="proto-header-nav__logo">"#);
        if attrs.logo.has_value() {
            html.push_str(&format!(
                r#"<a class="proto-header-nav__logo-link" href="{}"><img src="{}" alt="{}" /></a>"#,
                s.escape_url(&attrs.home_url),
                s.escape_url(&attrs.logo.url),
                s.escape_attr(&attrs.logo.alt)
            ));
        }
        html.push_str("</div>");
    }

    html.push_str(concat!(
        r#"<button type="button" class="proto-header-nav__toggle" aria-expanded="false" aria-label="Toggle navigation">"#,
        r#"<span class="proto-header-nav__toggle-bar"></span>"#,
        r#"<span class="proto-header-nav__toggle-bar"></span>"#,
        r#"<span class="proto-header-nav__toggle-bar"></span>"#,
        "</button>"
    ));

    html.push_str(r#"<nav class="proto-header-nav__nav" aria-label="Main navigation">"#);
    html.push_str(r#"<ul class="proto-header-nav__list">"#);

    for (index, item) in items.iter().enumerate() {
        // The first link is the active one, whatever the current page is.
        let active = index == 0;
        let mut item_classes = ClassList::new(["proto-header-nav__item"]);
        item_classes.add_if(active, "proto-header-nav__item--active");

        html.push_str(&format!(
            r#"<li class="{}"><a class="proto-header-nav__link" href="{}"{}>{}</a></li>"#,
            item_classes.render(),
            s.escape_url(&item.url),
            if active { r#" aria-current="page""# } else { "" },
            s.escape_html(&item.label)
        ));
    }

    html.push_str("</ul></nav>");

    if attrs.show_cta {
        let cta = &attrs.cta_button;
        let href = s.escape_url(if cta.has_value() { cta.url.as_str() } else { "#" });
        html.push_str(&format!(
            r#"<a class="proto-header-nav__cta" href="{}"{}{}>{}</a>"#,
            href,
            optional_attr("target", &s.escape_attr(&cta.target)),
            optional_attr("rel", &s.escape_attr(&cta.rel)),
            s.escape_html(&cta.text)
        ));
    }

    html.push_str("</div></header>");
    html
}

/// The `proto/header-nav` block.
#[derive(Debug, Default)]
pub struct HeaderNav;

impl BlockRenderer for HeaderNav {
    fn name(&self) -> &'static str {
        "proto/header-nav"
    }

    fn title(&self) -> &'static str {
        "Header Navigation"
    }

    fn render(&self, ctx: &RenderContext<'_>, sanitizer: &dyn Sanitizer) -> String {
        render_header_nav(
            &HeaderNavAttributes::from_attributes(ctx.attributes),
            ctx,
            sanitizer,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitize::DefaultSanitizer;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn render(value: serde_json::Value, preview: bool) -> String {
        let bag = AttributeBag::from_value(value);
        HeaderNav.render(&RenderContext::new(&bag).with_preview(preview), &DefaultSanitizer)
    }

    fn list_items(html: &str) -> Vec<&str> {
        html.split("<li").skip(1).collect()
    }

    #[test]
    fn only_first_item_is_current() {
        let html = render(
            json!({ "navItems": [
                { "label": "One", "url": "/one" },
                { "label": "Two", "url": "/two" },
                { "label": "Three", "url": "/three" }
            ]}),
            false,
        );

        let items = list_items(&html);
        assert_eq!(items.len(), 3);
        assert!(items[0].contains(r#"aria-current="page""#));
        assert!(items[0].contains("proto-header-nav__item--active"));
        for item in &items[1..] {
            assert!(!item.contains("aria-current"));
            assert!(!item.contains("--active"));
        }
    }

    #[test]
    fn preview_substitutes_placeholder_links() {
        let html = render(json!({}), true);
        let items = list_items(&html);
        assert_eq!(items.len(), 4);
        assert!(items[0].contains(r#"href="/" aria-current="page">Home</a>"#));
        assert!(items[3].contains(r#"href="/contact">Contact</a>"#));
    }

    #[test]
    fn live_empty_menu_has_no_items() {
        let html = render(json!({ "navItems": [] }), false);
        assert!(list_items(&html).is_empty());
        assert!(html.contains(r#"<ul class="proto-header-nav__list"></ul>"#));
    }

    #[test]
    fn renders_logo_and_cta() {
        let html = render(
            json!({
                "fixedPosition": true,
                "logo": { "url": "/logo.svg", "alt": "Acme" },
                "ctaButton": { "url": "/signup", "text": "Sign up", "target": "_blank" }
            }),
            false,
        );

        assert!(html.starts_with(r#"<header class="proto-header-nav proto-header-nav--fixed">"#));
        assert!(html.contains(
            r#"<div class="proto-header-nav__logo"><a class="proto-header-nav__logo-link" href="/"><img src="/logo.svg" alt="Acme" /></a></div>"#
        ));
        assert!(html.contains(
            r#"<a class="proto-header-nav__cta" href="/signup" target="_blank" rel="noopener noreferrer">Sign up</a></div></header>"#
        ));
    }

    #[test]
    fn logo_follows_preview_law_and_cta_follows_flag() {
        let live = render(json!({ "showCta": false }), false);
        assert!(!live.contains("proto-header-nav__logo"));
        assert!(!live.contains("proto-header-nav__cta"));

        let preview = render(json!({}), true);
        assert!(preview.contains(r#"<div class="proto-header-nav__logo"></div>"#));
        assert!(preview.contains(r##"<a class="proto-header-nav__cta" href="#">Get Started</a>"##));
    }

    #[test]
    fn neutralizes_script_urls() {
        let html = render(
            json!({ "navItems": [{ "label": "x", "url": "javascript:alert(1)" }] }),
            false,
        );
        assert!(!html.contains("javascript:"));
    }

    #[test]
    fn defaults() {
        let attrs = HeaderNavAttributes::default();
        assert!(!attrs.fixed_position);
        assert!(attrs.show_cta);
        assert_eq!(attrs.cta_button.text, "Get Started");
        assert_eq!(attrs.home_url, "/");
    }
}
