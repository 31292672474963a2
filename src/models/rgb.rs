//! RGB color handling with hex parsing and HSL conversion.

// Allow small types passed by reference for API consistency
#![allow(clippy::trivially_copy_pass_by_ref)]
// Allow intentional type casts for color math
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
// Allow float comparisons in HSL conversion (standard algorithms)
#![allow(clippy::float_cmp)]

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{TokenError, TokenResult};

/// 8-bit sRGB color value.
///
/// Every accepted color literal is reduced to this form before anything is
/// derived from it, which is what makes equivalent notations compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RgbColor {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl RgbColor {
    /// Creates a new `RgbColor` from individual channel values.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses an `RgbColor` from a CSS hex string.
    ///
    /// Supports `#rgb`, `#rgba`, `#rrggbb` and `#rrggbbaa` (the leading `#` is
    /// optional, alpha digits are validated and then ignored).
    ///
    /// # Examples
    ///
    /// ```
    /// use tokenkit::models::RgbColor;
    ///
    /// let color = RgbColor::from_hex("#FF0000").unwrap();
    /// assert_eq!(color, RgbColor::new(255, 0, 0));
    ///
    /// let color = RgbColor::from_hex("0f0").unwrap();
    /// assert_eq!(color, RgbColor::new(0, 255, 0));
    /// ```
    pub fn from_hex(hex: &str) -> TokenResult<Self> {
        let trimmed = hex.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TokenError::invalid_color(hex, "hex colors may only contain 0-9 and a-f"));
        }

        let channel = |range: std::ops::Range<usize>| -> TokenResult<u8> {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|e| TokenError::invalid_color(hex, e.to_string()))
        };
        // Short forms repeat each digit: "f80" is "ff8800".
        let short = |idx: usize| -> TokenResult<u8> { Ok(channel(idx..idx + 1)? * 17) };

        match digits.len() {
            3 | 4 => Ok(Self::new(short(0)?, short(1)?, short(2)?)),
            6 | 8 => Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            n => Err(TokenError::invalid_color(
                hex,
                format!("expected 3, 4, 6 or 8 hex digits, found {n}"),
            )),
        }
    }

    /// Converts the color to a lowercase `#rrggbb` string.
    ///
    /// # Examples
    ///
    /// ```
    /// use tokenkit::models::RgbColor;
    ///
    /// assert_eq!(RgbColor::new(0, 128, 255).to_hex(), "#0080ff");
    /// ```
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Converts the color to HSL.
    ///
    /// # Returns
    ///
    /// A tuple `(h, s, l)` where:
    /// - `h` (Hue): 0.0-360.0 degrees (0.0 for grayscale)
    /// - `s` (Saturation): 0.0-1.0
    /// - `l` (Lightness): 0.0-1.0
    #[must_use]
    #[allow(clippy::many_single_char_names)] // Standard RGB/HSL color model uses single-char names
    pub fn to_hsl(&self) -> (f64, f64, f64) {
        let r = f64::from(self.r) / 255.0;
        let g = f64::from(self.g) / 255.0;
        let b = f64::from(self.b) / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let l = (max + min) / 2.0;

        if delta == 0.0 {
            return (0.0, 0.0, l);
        }

        let s = delta / (1.0 - (2.0 * l - 1.0).abs());

        let h = if max == r {
            60.0 * (((g - b) / delta) % 6.0)
        } else if max == g {
            60.0 * (((b - r) / delta) + 2.0)
        } else {
            60.0 * (((r - g) / delta) + 4.0)
        };

        let h = if h < 0.0 { h + 360.0 } else { h };

        (h, s.min(1.0), l)
    }

    /// Creates an `RgbColor` from HSL.
    ///
    /// * `h` - Hue in degrees (wrapped into 0.0-360.0)
    /// * `s` - Saturation (0.0-1.0, clamped)
    /// * `l` - Lightness (0.0-1.0, clamped)
    ///
    /// # Examples
    ///
    /// ```
    /// use tokenkit::models::RgbColor;
    ///
    /// assert_eq!(RgbColor::from_hsl(0.0, 1.0, 0.5), RgbColor::new(255, 0, 0));
    /// assert_eq!(RgbColor::from_hsl(120.0, 1.0, 0.5), RgbColor::new(0, 255, 0));
    /// ```
    #[must_use]
    #[allow(clippy::many_single_char_names)]
    pub fn from_hsl(h: f64, s: f64, l: f64) -> Self {
        let h = h.rem_euclid(360.0);
        let s = s.clamp(0.0, 1.0);
        let l = l.clamp(0.0, 1.0);

        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let h_prime = h / 60.0;
        let x = c * (1.0 - ((h_prime % 2.0) - 1.0).abs());
        let m = l - c / 2.0;

        let (r, g, b) = if h_prime < 1.0 {
            (c, x, 0.0)
        } else if h_prime < 2.0 {
            (x, c, 0.0)
        } else if h_prime < 3.0 {
            (0.0, c, x)
        } else if h_prime < 4.0 {
            (0.0, x, c)
        } else if h_prime < 5.0 {
            (x, 0.0, c)
        } else {
            (c, 0.0, x)
        };

        Self {
            r: ((r + m) * 255.0).round().clamp(0.0, 255.0) as u8,
            g: ((g + m) * 255.0).round().clamp(0.0, 255.0) as u8,
            b: ((b + m) * 255.0).round().clamp(0.0, 255.0) as u8,
        }
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
