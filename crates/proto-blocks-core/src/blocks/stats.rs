//! Stats block: a grid of counters with optional prefix and suffix.

use crate::attribute_enum;
use crate::attributes::{format_number, AttributeBag, AttributeEnum, FromAttributes};
use crate::markup::{ClassList, StyleList};
use crate::sanitize::Sanitizer;
use crate::traits::{BlockRenderer, RenderContext};

attribute_enum! {
    /// Visual treatment of the counters.
    pub enum StatsStyle {
        #[default]
        Default => "default",
        Boxed => "boxed",
        Minimal => "minimal",
    }
}

/// One counter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatItem {
    pub id: String,
    pub number: String,
    pub prefix: String,
    pub suffix: String,
    pub label: String,
}

impl StatItem {
    fn sample(id: &str, prefix: &str, number: &str, suffix: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            number: number.to_string(),
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
            label: label.to_string(),
        }
    }
}

impl FromAttributes for StatItem {
    fn from_attributes(bag: &AttributeBag) -> Self {
        Self {
            id: bag.str_or("id", ""),
            number: bag.str_or("number", ""),
            prefix: bag.str_or("prefix", ""),
            suffix: bag.str_or("suffix", ""),
            label: bag.str_or("label", ""),
        }
    }
}

/// Counters shown in the editor while the list is still empty.
pub fn placeholder_stats() -> Vec<StatItem> {
    vec![
        StatItem::sample("stat-1", "", "500", "+", "Happy Clients"),
        StatItem::sample("stat-2", "", "10", "K+", "Downloads"),
        StatItem::sample("stat-3", "", "99", "%", "Satisfaction"),
        StatItem::sample("stat-4", "$", "2", "M", "Revenue"),
    ]
}

/// Typed stats attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsAttributes {
    pub stats: Vec<StatItem>,
    pub columns: i64,
    pub style: StatsStyle,
    /// Pixels
    pub number_size: f64,
    pub show_dividers: bool,
}

impl FromAttributes for StatsAttributes {
    fn from_attributes(bag: &AttributeBag) -> Self {
        Self {
            stats: bag
                .list("stats")
                .iter()
                .map(StatItem::from_attributes)
                .collect(),
            columns: bag.i64_or("columns", 4),
            style: StatsStyle::read(bag, "style"),
            number_size: bag.f64_or("numberSize", 48.0),
            show_dividers: bag.bool_or("showDividers", false),
        }
    }
}

impl Default for StatsAttributes {
    fn default() -> Self {
        Self::from_attributes(&AttributeBag::new())
    }
}

/// Render the stats block from typed attributes.
pub fn render_stats(attrs: &StatsAttributes, ctx: &RenderContext<'_>, s: &dyn Sanitizer) -> String {
    // A zero or negative count would produce an invalid `repeat()`.
    let columns = attrs.columns.max(1);

    let mut classes = ClassList::new(["proto-stats"]);
    classes
        .add(format!("proto-stats--{}", attrs.style.as_str()))
        .add(format!("proto-stats--columns-{}", columns))
        .add_if(attrs.show_dividers, "proto-stats--dividers");

    let placeholders;
    let items: &[StatItem] = if attrs.stats.is_empty() && ctx.is_preview {
        placeholders = placeholder_stats();
        &placeholders
    } else {
        &attrs.stats
    };

    let mut html = format!("<div{}>", ctx.wrapper.merge(&classes, &StyleList::new(), s));
    html.push_str(&format!(
        r#"<div class="proto-stats__grid" style="grid-template-columns: repeat({}, minmax(0, 1fr))">"#,
        columns
    ));

    let number_style = format!("font-size: {}px", format_number(attrs.number_size));

    for item in items {
        let id_attr = if item.id.is_empty() {
            String::new()
        } else {
            format!(r#" data-stat-id="{}""#, s.escape_attr(&item.id))
        };

        html.push_str(&format!(r#"<div class="proto-stats__item"{}>"#, id_attr));
        html.push_str(&format!(
            r#"<div class="proto-stats__number" style="{}">"#,
            number_style
        ));

        if ctx.shows(!item.prefix.is_empty()) {
            html.push_str(&format!(
                r#"<span class="proto-stats__prefix">{}</span>"#,
                s.escape_html(&item.prefix)
            ));
        }
        html.push_str(&format!(
            r#"<span class="proto-stats__value">{}</span>"#,
            s.escape_html(&item.number)
        ));
        if ctx.shows(!item.suffix.is_empty()) {
            html.push_str(&format!(
                r#"<span class="proto-stats__suffix">{}</span>"#,
                s.escape_html(&item.suffix)
            ));
        }

        html.push_str("</div>");
        html.push_str(&format!(
            r#"<div class="proto-stats__label">{}</div>"#,
            s.escape_html(&item.label)
        ));
        html.push_str("</div>");
    }

    html.push_str("</div></div>");
    html
}

/// The `proto/stats` block.
#[derive(Debug, Default)]
pub struct Stats;

impl BlockRenderer for Stats {
    fn name(&self) -> &'static str {
        "proto/stats"
    }

    fn title(&self) -> &'static str {
        "Stats Counter"
    }

    fn render(&self, ctx: &RenderContext<'_>, sanitizer: &dyn Sanitizer) -> String {
        render_stats(&StatsAttributes::from_attributes(ctx.attributes), ctx, sanitizer)
    }
}
