//! Template engine for rendering pattern pages.

use minijinja::{context, Environment};
use proto_blocks_pattern::TocEntry;

/// A navigation item.
#[derive(Debug, Clone, serde::Serialize)]
pub struct NavItem {
    /// Display title
    pub title: String,
    /// URL path
    pub path: String,
    /// Child items
    pub children: Vec<NavItem>,
    /// Whether this is the active page
    pub active: bool,
}

impl NavItem {
    /// Copy of the tree with the item at `path` marked active.
    pub fn mark_active(items: &[NavItem], path: &str) -> Vec<NavItem> {
        items
            .iter()
            .map(|item| NavItem {
                active: item.path == path,
                children: Self::mark_active(&item.children, path),
                ..item.clone()
            })
            .collect()
    }
}

/// Context for rendering a page template.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct Context {
    pub title: String,
    pub site_title: String,
    pub description: Option<String>,
    /// Rendered pattern HTML
    pub content: String,
    pub nav: Vec<NavItem>,
    pub toc: Vec<TocEntry>,
    pub base_url: String,
    /// Extra stylesheet URLs
    pub styles: Vec<String>,
    /// Include the hot reload client
    pub live_reload: bool,
}

const TEMPLATES: [(&str, &str); 3] = [
    ("base.html", BASE_TEMPLATE),
    ("pattern.html", PATTERN_TEMPLATE),
    ("nav.html", NAV_TEMPLATE),
];

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the built-in templates.
    pub fn new() -> Self {
        let mut env = Environment::new();
        for (name, source) in TEMPLATES {
            env.add_template(name, source)
                .expect("built-in templates are valid");
        }
        Self { env }
    }

    /// Render a page using the specified template.
    pub fn render_page(&self, template: &str, ctx: &Context) -> Result<String, minijinja::Error> {
        self.env.get_template(template)?.render(context! {
            title => &ctx.title,
            site_title => &ctx.site_title,
            description => &ctx.description,
            content => &ctx.content,
            nav => &ctx.nav,
            toc => &ctx.toc,
            base_url => &ctx.base_url,
            styles => &ctx.styles,
            live_reload => ctx.live_reload,
        })
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ title }} - {{ site_title }}</title>
  {% if description %}<meta name="description" content="{{ description }}">
  {% endif %}<link rel="stylesheet" href="{{ base_url }}assets/main.css">
  <link rel="stylesheet" href="{{ base_url }}assets/blocks.css">
  {% for style in styles %}<link rel="stylesheet" href="{{ style }}">
  {% endfor %}
</head>
<body>
  <div class="layout">
    <nav class="sidebar">
      {% include "nav.html" %}
    </nav>
    <main class="main">
      {% block content %}{% endblock %}
    </main>
  </div>
  <script src="{{ base_url }}assets/blocks.js"></script>
  {% if live_reload %}<script src="/__hmr.js"></script>{% endif %}
</body>
</html>"##;

const PATTERN_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<article class="pattern">
  {{ content | safe }}
</article>

{% if toc %}
<aside class="toc">
  <h2>On this page</h2>
  <ul>
  {% for entry in toc %}
    <li class="toc-level-{{ entry.level }}">
      <a href="#{{ entry.id }}">{{ entry.title }}</a>
    </li>
  {% endfor %}
  </ul>
</aside>
{% endif %}
{% endblock %}"##;

const NAV_TEMPLATE: &str = r##"<a href="{{ base_url }}" class="nav-logo">{{ site_title }}</a>
<ul class="nav-list">
{% for item in nav %}
  <li class="nav-item{% if item.active %} active{% endif %}">
    <a href="{{ item.path }}">{{ item.title }}</a>
    {% if item.children %}
    <ul class="nav-children">
      {% for child in item.children %}
      <li class="nav-item{% if child.active %} active{% endif %}">
        <a href="{{ child.path }}">{{ child.title }}</a>
      </li>
      {% endfor %}
    </ul>
    {% endif %}
  </li>
{% endfor %}
</ul>"##;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn item(title: &str, path: &str, children: Vec<NavItem>) -> NavItem {
        NavItem {
            title: title.to_string(),
            path: path.to_string(),
            children,
            active: false,
        }
    }

    #[test]
    fn renders_pattern_page() {
        let engine = TemplateEngine::new();

        let ctx = Context {
            title: "Cards".to_string(),
            site_title: "Block Patterns".to_string(),
            description: Some("Card layouts".to_string()),
            content: r#"<div class="proto-card"></div>"#.to_string(),
            toc: vec![TocEntry {
                title: "Overlay".to_string(),
                id: "overlay".to_string(),
                level: 2,
            }],
            base_url: "/".to_string(),
            ..Default::default()
        };

        let html = engine.render_page("pattern.html", &ctx).unwrap();

        assert!(html.contains("<title>Cards - Block Patterns</title>"));
        assert!(html.contains(r#"<meta name="description" content="Card layouts">"#));
        assert!(html.contains(r#"<div class="proto-card"></div>"#));
        assert!(html.contains(r##"<a href="#overlay">Overlay</a>"##));
        assert!(html.contains("assets/blocks.css"));
        assert!(html.contains("assets/blocks.js"));
        assert!(!html.contains("__hmr.js"));
    }

    #[test]
    fn renders_navigation() {
        let engine = TemplateEngine::new();

        let nav = vec![
            item("Home", "/", vec![]),
            item(
                "Marketing",
                "/marketing/",
                vec![item("Landing", "/marketing/landing/", vec![])],
            ),
        ];

        let ctx = Context {
            title: "Landing".to_string(),
            site_title: "Patterns".to_string(),
            nav: NavItem::mark_active(&nav, "/marketing/landing/"),
            base_url: "/".to_string(),
            ..Default::default()
        };

        let html = engine.render_page("pattern.html", &ctx).unwrap();

        assert!(html.contains("Marketing"));
        assert_eq!(html.matches("nav-item active").count(), 1);
        let active = html.split("nav-item active").nth(1).unwrap();
        let label = active.split("</a>").next().unwrap();
        assert!(label.ends_with(">Landing"));
    }

    #[test]
    fn escapes_titles_and_injects_reload_client() {
        let engine = TemplateEngine::new();

        let ctx = Context {
            title: "<b>Bold</b>".to_string(),
            site_title: "Docs".to_string(),
            base_url: "/".to_string(),
            live_reload: true,
            ..Default::default()
        };

        let html = engine.render_page("pattern.html", &ctx).unwrap();

        assert!(!html.contains("<b>Bold</b>"));
        assert!(html.contains(r#"<script src="/__hmr.js"></script>"#));
    }

    #[test]
    fn mark_active_is_exclusive() {
        let nav = vec![item("A", "/a/", vec![]), item("B", "/b/", vec![])];
        let marked = NavItem::mark_active(&nav, "/b/");
        assert!(!marked[0].active);
        assert!(marked[1].active);
    }
}
