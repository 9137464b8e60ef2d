//! Hex color decoding and `rgba()` formatting.

/// An opaque RGB color decoded from a hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Format as a CSS `rgba()` value.
    ///
    /// The alpha value is written as given. It is not clamped to `[0, 1]`.
    pub fn to_rgba(self, alpha: f64) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, alpha)
    }
}

/// Errors that can occur when decoding a color.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    #[error("Invalid color: {0:?} (expected 3 or 6 hex digits)")]
    InvalidColor(String),
}

/// Decode a `#rgb` or `#rrggbb` color. The leading `#` is optional.
pub fn parse_hex(hex: &str) -> Result<Rgb, ColorError> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);

    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidColor(hex.to_string()));
    }

    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => return Err(ColorError::InvalidColor(hex.to_string())),
    };

    // All digits are ASCII hex at this point, so the slices land on char boundaries.
    let channel = |i: usize| {
        u8::from_str_radix(&expanded[i..i + 2], 16)
            .map_err(|_| ColorError::InvalidColor(hex.to_string()))
    };

    Ok(Rgb {
        r: channel(0)?,
        g: channel(2)?,
        b: channel(4)?,
    })
}

/// Convert a hex color and an opacity fraction into `rgba(R, G, B, A)`.
pub fn to_rgba(hex: &str, alpha: f64) -> Result<String, ColorError> {
    Ok(parse_hex(hex)?.to_rgba(alpha))
}
