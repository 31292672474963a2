//! Derived color values and the fixed set of shade modifiers.

#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use serde::{Deserialize, Serialize};
use std::fmt;

use super::RgbColor;

/// Structured color derived from one color literal.
///
/// All fields are computed eagerly from the canonical RGB triple, so two
/// literals naming the same sRGB color produce identical values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorValue {
    /// Hue in whole degrees (0-359)
    pub h: u16,
    /// Saturation in whole percent (0-100)
    pub s: u8,
    /// Lightness in whole percent (0-100)
    pub l: u8,
    /// Saturation with a percent suffix, e.g. "100%"
    pub s_perc: String,
    /// Lightness with a percent suffix, e.g. "50%"
    pub l_perc: String,
    /// Lowercase `#rrggbb`
    pub hex: String,
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl ColorValue {
    /// Builds a color value from an sRGB triple.
    #[must_use]
    pub fn from_rgb(rgb: RgbColor) -> Self {
        let (h, s, l) = rgb.to_hsl();
        let h = (h.round() as u16) % 360;
        let s = (s * 100.0).round().clamp(0.0, 100.0) as u8;
        let l = (l * 100.0).round().clamp(0.0, 100.0) as u8;

        Self {
            h,
            s,
            l,
            s_perc: format!("{s}%"),
            l_perc: format!("{l}%"),
            hex: rgb.to_hex(),
            r: rgb.r,
            g: rgb.g,
            b: rgb.b,
        }
    }

    /// Returns the RGB triple this value was derived from.
    #[must_use]
    pub const fn rgb(&self) -> RgbColor {
        RgbColor::new(self.r, self.g, self.b)
    }

    /// Formats the value as `hsl(h, s%, l%)`.
    #[must_use]
    pub fn to_hsl_string(&self) -> String {
        format!("hsl({}, {}, {})", self.h, self.s_perc, self.l_perc)
    }

    /// Formats the value as `rgb(r, g, b)`.
    #[must_use]
    pub fn to_rgb_string(&self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

impl fmt::Display for ColorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex)
    }
}

/// Shade modifiers applied to every base color.
///
/// Each modifier owns a dependent saturation setting named
/// `<color>-<modifier>-s`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorModifier {
    /// Near-white tint
    UltraLight,
    /// Light tint
    Light,
    /// Mid tone
    Medium,
    /// Dark shade
    Dark,
    /// Near-black shade
    UltraDark,
    /// Interactive hover state
    Hover,
    /// Complementary hue
    Comp,
}

impl ColorModifier {
    /// Every modifier, in a fixed order.
    pub const ALL: [Self; 7] = [
        Self::UltraLight,
        Self::Light,
        Self::Medium,
        Self::Dark,
        Self::UltraDark,
        Self::Hover,
        Self::Comp,
    ];

    /// Kebab-case name used in setting keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UltraLight => "ultra-light",
            Self::Light => "light",
            Self::Medium => "medium",
            Self::Dark => "dark",
            Self::UltraDark => "ultra-dark",
            Self::Hover => "hover",
            Self::Comp => "comp",
        }
    }

    /// Parses a kebab-case modifier name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == name)
    }

    /// Key of the saturation setting this modifier controls for `color_name`.
    ///
    /// ```
    /// use tokenkit::models::ColorModifier;
    ///
    /// assert_eq!(ColorModifier::Dark.saturation_key("primary"), "primary-dark-s");
    /// ```
    #[must_use]
    pub fn saturation_key(self, color_name: &str) -> String {
        format!("{}-{}-s", color_name, self.as_str())
    }
}

impl fmt::Display for ColorModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgb_red() {
        let value = ColorValue::from_rgb(RgbColor::new(255, 0, 0));
        assert_eq!(value.h, 0);
        assert_eq!(value.s, 100);
        assert_eq!(value.l, 50);
        assert_eq!(value.s_perc, "100%");
        assert_eq!(value.l_perc, "50%");
        assert_eq!(value.hex, "#ff0000");
        assert_eq!(value.to_hsl_string(), "hsl(0, 100%, 50%)");
        assert_eq!(value.to_rgb_string(), "rgb(255, 0, 0)");
    }

    #[test]
    fn test_hue_never_reaches_360() {
        // Hue 359.6 rounds up and must wrap back to 0.
        let value = ColorValue::from_rgb(RgbColor::new(255, 0, 2));
        assert!(value.h < 360);
    }

    #[test]
    fn test_modifier_names_roundtrip() {
        for modifier in ColorModifier::ALL {
            assert_eq!(ColorModifier::from_name(modifier.as_str()), Some(modifier));
        }
        assert_eq!(ColorModifier::from_name("extra"), None);
    }

    #[test]
    fn test_modifier_serde_uses_kebab_case() {
        let json = serde_json::to_string(&ColorModifier::UltraDark).unwrap();
        assert_eq!(json, "\"ultra-dark\"");
    }
}
