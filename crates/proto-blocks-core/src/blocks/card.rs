//! Card block: image, title, rich content and an optional link.

use crate::attribute_enum;
use crate::attributes::{AttributeBag, AttributeEnum, FromAttributes, Image, Link};
use crate::markup::{optional_attr, ClassList, StyleList};
use crate::sanitize::Sanitizer;
use crate::traits::{BlockRenderer, RenderContext};

attribute_enum! {
    /// How image and body are arranged.
    pub enum CardLayout {
        #[default]
        Vertical => "vertical",
        Horizontal => "horizontal",
        Overlay => "overlay",
    }
}

attribute_enum! {
    /// Where the image sits relative to the body.
    pub enum ImagePosition {
        #[default]
        Top => "top",
        Left => "left",
        Right => "right",
    }
}

/// Typed card attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct CardAttributes {
    pub layout: CardLayout,
    pub image_position: ImagePosition,
    pub show_link: bool,
    pub image: Image,
    pub title: String,
    /// Rich text
    pub content: String,
    pub link: Link,
}

impl FromAttributes for CardAttributes {
    fn from_attributes(bag: &AttributeBag) -> Self {
        Self {
            layout: CardLayout::read(bag, "layout"),
            image_position: ImagePosition::read(bag, "imagePosition"),
            show_link: bag.bool_or("showLink", true),
            image: Image::from_attributes(&bag.object("image")),
            title: bag.str_or("title", ""),
            content: bag.str_or("content", ""),
            link: Link::read(&bag.object("link"), "Read more"),
        }
    }
}

impl Default for CardAttributes {
    fn default() -> Self {
        Self::from_attributes(&AttributeBag::new())
    }
}

/// Class tokens for the card root.
pub fn card_classes(attrs: &CardAttributes) -> ClassList {
    let mut classes = ClassList::new(["proto-card"]);
    classes
        .add(format!("proto-card--{}", attrs.layout.as_str()))
        .add(format!("proto-card--image-{}", attrs.image_position.as_str()))
        .add("flex");

    match attrs.layout {
        CardLayout::Vertical => {
            classes.add("flex-col");
        }
        CardLayout::Horizontal => {
            classes
                .add("flex-row")
                .add_if(attrs.image_position == ImagePosition::Right, "flex-row-reverse");
        }
        CardLayout::Overlay => {
            classes.add("relative");
        }
    }

    classes
}

/// Render a card from typed attributes.
pub fn render_card(attrs: &CardAttributes, ctx: &RenderContext<'_>, s: &dyn Sanitizer) -> String {
    let classes = card_classes(attrs);
    let mut html = format!("<div{}>", ctx.wrapper.merge(&classes, &StyleList::new(), s));

    if ctx.shows(attrs.image.has_value()) {
        html.push_str(r#"<figure class="proto-card__image">"#);
        if attrs.image.has_value() {
            html.push_str(&format!(
                r#"<img class="proto-card__img" src="{}" alt="{}" loading="lazy" />"#,
                s.escape_url(&attrs.image.url),
                s.escape_attr(&attrs.image.alt)
            ));
        }
        html.push_str("</figure>");
    }

    let mut body = ClassList::new(["proto-card__body"]);
    body.add_if(attrs.layout == CardLayout::Overlay, "proto-card__body--overlay");
    html.push_str(&format!(r#"<div class="{}">"#, body.render()));

    html.push_str(&format!(
        r#"<h3 class="proto-card__title">{}</h3>"#,
        s.escape_html(&attrs.title)
    ));

    if ctx.shows(!attrs.content.trim().is_empty()) {
        html.push_str(&format!(
            r#"<div class="proto-card__content">{}</div>"#,
            s.sanitize_rich_text(&attrs.content)
        ));
    }

    if attrs.show_link && ctx.shows(attrs.link.has_value()) {
        html.push_str(&format!(
            r#"<a class="proto-card__link" href="{}"{}{}>{}</a>"#,
            s.escape_url(&attrs.link.url),
            optional_attr("target", &s.escape_attr(&attrs.link.target)),
            optional_attr("rel", &s.escape_attr(&attrs.link.rel)),
            s.escape_html(&attrs.link.text)
        ));
    }

    html.push_str("</div></div>");
    html
}

/// The `proto/card` block.
#[derive(Debug, Default)]
pub struct Card;

impl BlockRenderer for Card {
    fn name(&self) -> &'static str {
        "proto/card"
    }

    fn title(&self) -> &'static str {
        "Card"
    }

    fn render(&self, ctx: &RenderContext<'_>, sanitizer: &dyn Sanitizer) -> String {
        render_card(&CardAttributes::from_attributes(ctx.attributes), ctx, sanitizer)
    }
}
