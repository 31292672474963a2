//! Color derivation.
//!
//! Turns a single color literal into a [`ColorValue`] and derives the fixed
//! set of tonal variants used to populate dependent shade settings.
//! Everything here is pure: the same literal always yields the same value.

pub mod literal;

pub use literal::{is_non_derivable, parse_color};

use crate::error::TokenResult;
use crate::models::{ColorModifier, ColorValue, RgbColor};

/// Lightness targets (percent) for the fixed-lightness modifiers.
const ULTRA_LIGHT_L: u8 = 95;
const LIGHT_L: u8 = 85;
const MEDIUM_L: u8 = 65;
const DARK_L: u8 = 30;
const ULTRA_DARK_L: u8 = 10;

/// Lightness shift applied for the hover state.
const HOVER_SHIFT: u8 = 10;

/// Derives the structured value of a color literal.
///
/// # Examples
///
/// ```
/// use tokenkit::color::derive;
///
/// let red = derive("#ff0000").unwrap();
/// assert_eq!((red.h, red.s, red.l), (0, 100, 50));
/// assert_eq!(derive("rgb(255, 0, 0)").unwrap(), red);
/// ```
///
/// # Errors
///
/// Returns [`crate::error::TokenError::InvalidColor`] if the literal cannot be parsed.
pub fn derive(literal: &str) -> TokenResult<ColorValue> {
    parse_color(literal).map(ColorValue::from_rgb)
}

/// Derives the shade of `base` for one modifier.
#[must_use]
pub fn tonal_variant(base: &ColorValue, modifier: ColorModifier) -> ColorValue {
    let (h, s, l) = (f64::from(base.h), f64::from(base.s), base.l);

    let (hue, lightness) = match modifier {
        ColorModifier::UltraLight => (h, ULTRA_LIGHT_L),
        ColorModifier::Light => (h, LIGHT_L),
        ColorModifier::Medium => (h, MEDIUM_L),
        ColorModifier::Dark => (h, DARK_L),
        ColorModifier::UltraDark => (h, ULTRA_DARK_L),
        ColorModifier::Hover => {
            let shifted = if l >= HOVER_SHIFT { l - HOVER_SHIFT } else { l + HOVER_SHIFT };
            (h, shifted)
        }
        ColorModifier::Comp => (h + 180.0, l),
    };

    ColorValue::from_rgb(RgbColor::from_hsl(
        hue,
        s / 100.0,
        f64::from(lightness) / 100.0,
    ))
}

/// Derives every tonal variant of `base`, in [`ColorModifier::ALL`] order.
#[must_use]
pub fn tonal_variants(base: &ColorValue) -> Vec<(ColorModifier, ColorValue)> {
    ColorModifier::ALL
        .into_iter()
        .map(|modifier| (modifier, tonal_variant(base, modifier)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_is_deterministic() {
        let first = derive("#3a7bd5").unwrap();
        let second = derive("#3a7bd5").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_equivalent_notations_derive_equal_values() {
        let hex = derive("#ff0000").unwrap();
        assert_eq!(derive("#F00").unwrap(), hex);
        assert_eq!(derive("rgb(255, 0, 0)").unwrap(), hex);
        assert_eq!(derive("hsl(0, 100%, 50%)").unwrap(), hex);
        assert_eq!(derive("hsl(360deg 100% 50%)").unwrap(), hex);
    }

    #[test]
    fn test_derive_fields() {
        let value = derive("#336699").unwrap();
        assert_eq!(value.hex, "#336699");
        assert_eq!((value.r, value.g, value.b), (0x33, 0x66, 0x99));
        assert_eq!(value.h, 210);
        assert_eq!(value.s, 50);
        assert_eq!(value.l, 40);
        assert_eq!(value.s_perc, "50%");
        assert_eq!(value.l_perc, "40%");
    }

    #[test]
    fn test_derive_invalid_literal() {
        assert!(derive("#12").is_err());
        assert!(derive("banana").is_err());
    }

    #[test]
    fn test_fixed_lightness_variants() {
        let base = derive("#ff0000").unwrap();
        assert_eq!(tonal_variant(&base, ColorModifier::Dark).l, 30);
        assert_eq!(tonal_variant(&base, ColorModifier::UltraLight).l, 95);
        assert_eq!(tonal_variant(&base, ColorModifier::UltraDark).h, 0);
    }

    #[test]
    fn test_hover_shifts_lightness() {
        let base = derive("#ff0000").unwrap();
        assert_eq!(tonal_variant(&base, ColorModifier::Hover).l, 40);

        let black = derive("black").unwrap();
        assert_eq!(tonal_variant(&black, ColorModifier::Hover).l, 10);
    }

    #[test]
    fn test_complement_rotates_hue() {
        let base = derive("#ff0000").unwrap();
        let comp = tonal_variant(&base, ColorModifier::Comp);
        assert_eq!(comp.h, 180);
        assert_eq!(comp.hex, "#00ffff");
    }

    #[test]
    fn test_tonal_variants_cover_all_modifiers() {
        let base = derive("#336699").unwrap();
        let variants = tonal_variants(&base);
        assert_eq!(variants.len(), ColorModifier::ALL.len());
        assert_eq!(variants[0].0, ColorModifier::UltraLight);
        assert_eq!(variants[6].0, ColorModifier::Comp);
    }
}
