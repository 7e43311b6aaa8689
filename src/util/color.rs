//! `#RRGGBB` hex color parsing and formatting.
//!
//! Records carry colors as hex strings; everything downstream works in linear
//! `[f32; 3]` RGB with channels in `[0, 1]`.

/// Neutral gray used for elements without a palette entry.
pub const FALLBACK_RGB: [f32; 3] = [0.5, 0.5, 0.5];

/// Parse a `#RRGGBB` string into RGB channels in `[0, 1]`.
///
/// Returns `None` for anything that is not exactly a `#` followed by six hex
/// digits. Surrounding whitespace is ignored.
#[must_use]
pub fn parse_hex(s: &str) -> Option<[f32; 3]> {
    let digits = s.trim().strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| {
        u8::from_str_radix(&digits[i..i + 2], 16)
            .ok()
            .map(|v| f32::from(v) / 255.0)
    };
    Some([channel(0)?, channel(2)?, channel(4)?])
}

/// Format RGB channels as an uppercase `#RRGGBB` string.
#[must_use]
pub fn to_hex(rgb: [f32; 3]) -> String {
    let byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!("#{:02X}{:02X}{:02X}", byte(rgb[0]), byte(rgb[1]), byte(rgb[2]))
}

/// Channel-wise average of two colors.
#[must_use]
pub fn mix(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        (a[0] + b[0]) * 0.5,
        (a[1] + b[1]) * 0.5,
        (a[2] + b[2]) * 0.5,
    ]
}
