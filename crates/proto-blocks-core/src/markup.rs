//! Class and style accumulation, and merging with host wrapper attributes.

use crate::sanitize::Sanitizer;

/// An ordered set of CSS class tokens.
///
/// Tokens only accumulate: adding a token never removes an earlier one, and a token
/// already present is not added twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList {
    tokens: Vec<String>,
}

impl ClassList {
    /// Start from a fixed base set.
    pub fn new<I, S>(base: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = Self::default();
        for token in base {
            list.add(token);
        }
        list
    }

    /// Add every whitespace-separated token in `token`.
    pub fn add(&mut self, token: impl Into<String>) -> &mut Self {
        let token = token.into();
        for t in token.split_whitespace() {
            if !self.tokens.iter().any(|existing| existing == t) {
                self.tokens.push(t.to_string());
            }
        }
        self
    }

    /// Add `token` when `condition` holds.
    pub fn add_if(&mut self, condition: bool, token: impl Into<String>) -> &mut Self {
        if condition {
            self.add(token);
        }
        self
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    /// Space-joined tokens.
    pub fn render(&self) -> String {
        self.tokens.join(" ")
    }
}

/// An ordered list of `property: value` declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleList {
    declarations: Vec<(String, String)>,
}

impl StyleList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a declaration. Order is preserved; duplicates are kept so later wins.
    pub fn push(&mut self, property: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.declarations.push((property.into(), value.into()));
        self
    }

    pub fn push_if(
        &mut self,
        condition: bool,
        property: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        if condition {
            self.push(property, value);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Declarations joined with `; `.
    pub fn render(&self) -> String {
        self.declarations
            .iter()
            .map(|(p, v)| format!("{}: {}", p, v))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Attributes the host attaches to a block's root element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WrapperAttributes {
    /// Host classes, emitted before the block's own
    pub class: Option<String>,
    /// Host inline style, emitted before the block's own declarations
    pub style: Option<String>,
    /// Anchor id
    pub id: Option<String>,
    /// Any other attributes, in insertion order
    pub extra: Vec<(String, String)>,
}

impl WrapperAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((name.into(), value.into()));
        self
    }

    /// Render the root element's attribute string, leading space included.
    ///
    /// Host classes come first and the block's classes are appended; the same holds
    /// for styles. Extra attribute names that are not plain identifiers are dropped.
    pub fn merge(&self, classes: &ClassList, styles: &StyleList, sanitizer: &dyn Sanitizer) -> String {
        let mut merged = ClassList::default();
        if let Some(host) = &self.class {
            merged.add(host.as_str());
        }
        for token in classes.iter() {
            merged.add(token);
        }

        let host_style = self
            .style
            .as_deref()
            .map(|s| s.trim().trim_end_matches(';').trim())
            .filter(|s| !s.is_empty());
        let style = match (host_style, styles.is_empty()) {
            (Some(host), true) => host.to_string(),
            (Some(host), false) => format!("{}; {}", host, styles.render()),
            (None, _) => styles.render(),
        };

        let mut out = String::new();
        if !merged.is_empty() {
            out.push_str(&format!(r#" class="{}""#, sanitizer.escape_attr(&merged.render())));
        }
        if !style.is_empty() {
            out.push_str(&format!(r#" style="{}""#, sanitizer.escape_attr(&style)));
        }
        if let Some(id) = self.id.as_deref().filter(|id| !id.is_empty()) {
            out.push_str(&format!(r#" id="{}""#, sanitizer.escape_attr(id)));
        }
        for (name, value) in &self.extra {
            if is_attribute_name(name) && !matches!(name.as_str(), "class" | "style" | "id") {
                out.push_str(&format!(r#" {}="{}""#, name, sanitizer.escape_attr(value)));
            }
        }
        out
    }
}

fn is_attribute_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':'))
}

/// Render a single `name="value"` pair with a leading space, or nothing when empty.
pub(crate) fn optional_attr(name: &str, value: &str) -> String {
    if value.is_empty() {
        String::new()
    } else {
        format!(r#" {}="{}""#, name, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitize::DefaultSanitizer;
    use pretty_assertions::assert_eq;

    #[test]
    fn classes_accumulate_in_order() {
        let mut classes = ClassList::new(["proto-card", "flex"]);
        classes.add("flex-row").add_if(false, "hidden").add("flex");
        assert_eq!(classes.render(), "proto-card flex flex-row");
    }

    #[test]
    fn styles_keep_order_and_duplicates() {
        let mut styles = StyleList::new();
        styles.push("color", "red").push("min-height", "60vh").push("color", "blue");
        assert_eq!(styles.render(), "color: red; min-height: 60vh; color: blue");
    }

    #[test]
    fn host_classes_come_first() {
        let wrapper = WrapperAttributes::new()
            .with_class("wp-block-proto-card alignwide")
            .with_style("margin-top: 2rem;");
        let mut styles = StyleList::new();
        styles.push("color", "#fff");

        let attrs = wrapper.merge(&ClassList::new(["proto-card"]), &styles, &DefaultSanitizer);

        assert_eq!(
            attrs,
            r#" class="wp-block-proto-card alignwide proto-card" style="margin-top: 2rem; color: #fff""#
        );
    }

    #[test]
    fn emits_id_and_extra_attributes() {
        let wrapper = WrapperAttributes::new()
            .with_id("hero-1")
            .with_attribute("data-align", "wide")
            .with_attribute("onclick\"", "x")
            .with_attribute("class", "ignored");

        let attrs = wrapper.merge(&ClassList::new(["a"]), &StyleList::new(), &DefaultSanitizer);

        assert_eq!(attrs, r#" class="a" id="hero-1" data-align="wide""#);
    }

    #[test]
    fn escapes_host_values() {
        let wrapper = WrapperAttributes::new().with_class(r#"x" onload="y"#);
        let attrs = wrapper.merge(&ClassList::default(), &StyleList::new(), &DefaultSanitizer);
        assert!(!attrs.contains(r#"" onload"#));
    }
}
