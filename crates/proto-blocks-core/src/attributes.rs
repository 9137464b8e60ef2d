//! Attribute bags and the typed values read from them.
//!
//! An [`AttributeBag`] is whatever the host hands over: no key is guaranteed and
//! values may have the wrong type. Every accessor takes a default and falls back to
//! it instead of failing, so a block always renders.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A read-only map of block attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeBag(Map<String, Value>);

impl AttributeBag {
    /// Create an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a bag from a JSON value. Anything but an object yields an empty bag.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    /// Insert a value, returning the bag. Convenient for building fixtures.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Remove and return a value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Raw access to a value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Read a string. Numbers and booleans are stringified.
    pub fn str_or(&self, key: &str, default: &str) -> String {
        match self.0.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => default.to_string(),
        }
    }

    /// Read a number. Numeric strings are accepted.
    pub fn f64_or(&self, key: &str, default: f64) -> f64 {
        match self.0.get(key) {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(default),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(default),
            _ => default,
        }
    }

    /// Read an integer. Fractional values are truncated toward zero.
    pub fn i64_or(&self, key: &str, default: i64) -> i64 {
        match self.0.get(key) {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
                .unwrap_or(default),
            Some(Value::String(s)) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().map(|f| f.trunc() as i64))
                    .unwrap_or(default)
            }
            _ => default,
        }
    }

    /// Read a boolean. Accepts `"true"`/`"false"`/`"1"`/`"0"` and numbers.
    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        match self.0.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(default),
            Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" | "" => false,
                _ => default,
            },
            _ => default,
        }
    }

    /// Read a nested object. Missing or mistyped values yield an empty bag.
    pub fn object(&self, key: &str) -> AttributeBag {
        match self.0.get(key) {
            Some(Value::Object(map)) => Self(map.clone()),
            _ => Self::default(),
        }
    }

    /// Read a list of objects in order. Entries that are not objects are skipped.
    pub fn list(&self, key: &str) -> Vec<AttributeBag> {
        match self.0.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| match item {
                    Value::Object(map) => Some(Self(map.clone())),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl From<Map<String, Value>> for AttributeBag {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Build a typed attribute struct from a bag, applying defaults.
pub trait FromAttributes: Sized {
    fn from_attributes(bag: &AttributeBag) -> Self;
}

/// Discrete-valued attributes. Unknown values fall back to the default variant.
pub trait AttributeEnum: Sized + Default + Copy + 'static {
    /// All variants with their attribute values.
    const VARIANTS: &'static [(&'static str, Self)];

    /// Parse an attribute value.
    fn parse(value: &str) -> Self {
        Self::VARIANTS
            .iter()
            .find(|(name, _)| *name == value)
            .map(|(_, v)| *v)
            .unwrap_or_default()
    }

    /// Read from a bag, defaulting when missing or unknown.
    fn read(bag: &AttributeBag, key: &str) -> Self {
        match bag.get(key) {
            Some(Value::String(s)) => Self::parse(s.trim()),
            _ => Self::default(),
        }
    }
}

/// Declare an [`AttributeEnum`] with its attribute values and an `as_str` accessor.
#[macro_export]
macro_rules! attribute_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            #[default]
            $default:ident => $default_str:literal,
            $($variant:ident => $str:literal),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        $vis enum $name {
            #[default]
            $default,
            $($variant),*
        }

        impl $name {
            /// The attribute value, also used in modifier class names.
            pub fn as_str(&self) -> &'static str {
                match self {
                    Self::$default => $default_str,
                    $(Self::$variant => $str),*
                }
            }
        }

        impl $crate::attributes::AttributeEnum for $name {
            const VARIANTS: &'static [(&'static str, Self)] = &[
                ($default_str, Self::$default),
                $(($str, Self::$variant)),*
            ];
        }
    };
}

/// An image reference (`{url, alt}`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Image {
    pub url: String,
    pub alt: String,
}

impl Image {
    pub fn has_value(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

impl FromAttributes for Image {
    fn from_attributes(bag: &AttributeBag) -> Self {
        Self {
            url: bag.str_or("url", ""),
            alt: bag.str_or("alt", ""),
        }
    }
}

/// A link or button target (`{url, text, target, rel}`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Link {
    pub url: String,
    pub text: String,
    pub target: String,
    pub rel: String,
}

impl Link {
    /// Read a link, using `default_text` when no text is set.
    pub fn read(bag: &AttributeBag, default_text: &str) -> Self {
        let text = bag.str_or("text", "");
        let target = bag.str_or("target", "");
        let mut rel = bag.str_or("rel", "");

        if rel.is_empty() && target == "_blank" {
            rel = "noopener noreferrer".to_string();
        }

        Self {
            url: bag.str_or("url", ""),
            text: if text.is_empty() {
                default_text.to_string()
            } else {
                text
            },
            target,
            rel,
        }
    }

    pub fn has_value(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

/// Format a number the way it was most likely written: `60`, not `60.0`.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}
