//! Testimonial block: quote, star rating and author attribution.

use crate::attribute_enum;
use crate::attributes::{AttributeBag, AttributeEnum, FromAttributes, Image};
use crate::markup::{ClassList, StyleList};
use crate::sanitize::Sanitizer;
use crate::traits::{BlockRenderer, RenderContext};

/// Number of star glyphs in a rating.
pub const RATING_STARS: i64 = 5;

attribute_enum! {
    /// Visual treatment of the testimonial.
    pub enum TestimonialStyle {
        #[default]
        Default => "default",
        Card => "card",
        Minimal => "minimal",
    }
}

/// Typed testimonial attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct TestimonialAttributes {
    pub style: TestimonialStyle,
    pub show_avatar: bool,
    pub show_rating: bool,
    pub rating: i64,
    /// Rich text
    pub quote: String,
    pub author_name: String,
    pub author_title: String,
    pub author_image: Image,
}

impl FromAttributes for TestimonialAttributes {
    fn from_attributes(bag: &AttributeBag) -> Self {
        Self {
            style: TestimonialStyle::read(bag, "style"),
            show_avatar: bag.bool_or("showAvatar", true),
            show_rating: bag.bool_or("showRating", true),
            rating: bag.i64_or("rating", 5),
            quote: bag.str_or("quote", ""),
            author_name: bag.str_or("authorName", ""),
            author_title: bag.str_or("authorTitle", ""),
            author_image: Image::from_attributes(&bag.object("authorImage")),
        }
    }
}

impl Default for TestimonialAttributes {
    fn default() -> Self {
        Self::from_attributes(&AttributeBag::new())
    }
}

/// Five star glyphs; position `i` (1-based) is filled when `i <= rating`.
///
/// The rating is not clamped: anything above five fills every star and anything
/// below one fills none.
pub fn render_rating(rating: i64) -> String {
    let mut html = format!(
        r#"<div class="proto-testimonial__rating" role="img" aria-label="Rated {} out of {}">"#,
        rating, RATING_STARS
    );

    for position in 1..=RATING_STARS {
        if position <= rating {
            html.push_str(r#"<span class="proto-testimonial__star proto-testimonial__star--filled" aria-hidden="true">★</span>"#);
        } else {
            html.push_str(r#"<span class="proto-testimonial__star proto-testimonial__star--empty" aria-hidden="true">☆</span>"#);
        }
    }

    html.push_str("</div>");
    html
}

/// Render a testimonial from typed attributes.
pub fn render_testimonial(
    attrs: &TestimonialAttributes,
    ctx: &RenderContext<'_>,
    s: &dyn Sanitizer,
) -> String {
    let mut classes = ClassList::new(["proto-testimonial"]);
    classes
        .add(format!("proto-testimonial--{}", attrs.style.as_str()))
        .add_if(attrs.show_avatar, "proto-testimonial--with-avatar");

    let mut html = format!("<figure{}>", ctx.wrapper.merge(&classes, &StyleList::new(), s));

    if attrs.show_rating {
        html.push_str(&render_rating(attrs.rating));
    }

    html.push_str(&format!(
        r#"<blockquote class="proto-testimonial__quote">{}</blockquote>"#,
        s.sanitize_rich_text(&attrs.quote)
    ));

    html.push_str(r#"<figcaption class="proto-testimonial__author">"#);

    if attrs.show_avatar && ctx.shows(attrs.author_image.has_value()) {
        html.push_str(r#"<div class="proto-testimonial__avatar">"#);
        if attrs.author_image.has_value() {
            let alt = if attrs.author_image.alt.is_empty() {
                &attrs.author_name
            } else {
                &attrs.author_image.alt
            };
            html.push_str(&format!(
                r#"<img src="{}" alt="{}" loading="lazy" />"#,
                s.escape_url(&attrs.author_image.url),
                s.escape_attr(alt)
            ));
        }
        html.push_str("</div>");
    }

    html.push_str(r#"<div class="proto-testimonial__meta">"#);
    html.push_str(&format!(
        r#"<cite class="proto-testimonial__name">{}</cite>"#,
        s.escape_html(&attrs.author_name)
    ));
    if ctx.shows(!attrs.author_title.is_empty()) {
        html.push_str(&format!(
            r#"<span class="proto-testimonial__role">{}</span>"#,
            s.escape_html(&attrs.author_title)
        ));
    }
    html.push_str("</div></figcaption></figure>");
    html
}

/// The `proto/testimonial` block.
#[derive(Debug, Default)]
pub struct Testimonial;

impl BlockRenderer for Testimonial {
    fn name(&self) -> &'static str {
        "proto/testimonial"
    }

    fn title(&self) -> &'static str {
        "Testimonial"
    }

    fn render(&self, ctx: &RenderContext<'_>, sanitizer: &dyn Sanitizer) -> String {
        render_testimonial(
            &TestimonialAttributes::from_attributes(ctx.attributes),
            ctx,
            sanitizer,
        )
    }
}
