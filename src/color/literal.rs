//! CSS color literal parsing.
//!
//! Reduces hex, `rgb()`/`rgba()`, `hsl()`/`hsla()` and the `black`/`white`
//! keywords to an 8-bit [`RgbColor`].

#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use crate::error::{TokenError, TokenResult};
use crate::models::RgbColor;

/// Keywords that are valid CSS color values but carry no hue to derive from.
pub const NON_DERIVABLE_KEYWORDS: &[&str] = &[
    "transparent",
    "currentcolor",
    "inherit",
    "initial",
    "unset",
    "revert",
    "revert-layer",
];

/// Parses a CSS color literal into its sRGB triple.
///
/// # Examples
///
/// ```
/// use tokenkit::color::parse_color;
/// use tokenkit::models::RgbColor;
///
/// assert_eq!(parse_color("rgb(255, 0, 0)").unwrap(), RgbColor::new(255, 0, 0));
/// assert_eq!(parse_color("hsl(120deg 100% 50%)").unwrap(), RgbColor::new(0, 255, 0));
/// assert!(parse_color("not-a-color").is_err());
/// ```
pub fn parse_color(literal: &str) -> TokenResult<RgbColor> {
    let normalized = literal.trim().to_ascii_lowercase();

    if normalized.is_empty() {
        return Err(TokenError::invalid_color(literal, "empty color literal"));
    }

    if normalized.starts_with('#') {
        return RgbColor::from_hex(&normalized).map_err(|e| match e {
            TokenError::InvalidColor { reason, .. } => TokenError::invalid_color(literal, reason),
            other => other,
        });
    }

    match normalized.as_str() {
        "black" => return Ok(RgbColor::new(0, 0, 0)),
        "white" => return Ok(RgbColor::new(255, 255, 255)),
        keyword if NON_DERIVABLE_KEYWORDS.contains(&keyword) => {
            return Err(TokenError::invalid_color(
                literal,
                format!("'{keyword}' has no derivable color"),
            ));
        }
        _ => {}
    }

    if let Some(args) = function_args(&normalized, &["rgba", "rgb"]) {
        return parse_rgb_args(literal, &args);
    }

    if let Some(args) = function_args(&normalized, &["hsla", "hsl"]) {
        return parse_hsl_args(literal, &args);
    }

    Err(TokenError::invalid_color(literal, "unrecognized color syntax"))
}

/// Returns true if `value` is a keyword or reference that intentionally has no
/// color to derive (e.g. `transparent`, `var(--x)`).
#[must_use]
pub fn is_non_derivable(value: &str) -> bool {
    let normalized = value.trim().to_ascii_lowercase();
    normalized.is_empty()
        || normalized.starts_with("var(")
        || NON_DERIVABLE_KEYWORDS.contains(&normalized.as_str())
}

/// Splits `name(a, b, c)` / `name(a b c / d)` into its argument list.
fn function_args(normalized: &str, names: &[&str]) -> Option<Vec<String>> {
    let name = names.iter().find(|name| normalized.starts_with(*name))?;
    let inner = normalized[name.len()..]
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')?;

    Some(
        inner
            .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

fn parse_number(literal: &str, raw: &str) -> TokenResult<f64> {
    let value: f64 = raw
        .parse()
        .map_err(|_| TokenError::invalid_color(literal, format!("'{raw}' is not a number")))?;

    if !value.is_finite() {
        return Err(TokenError::invalid_color(
            literal,
            format!("'{raw}' is not a finite number"),
        ));
    }

    Ok(value)
}

fn check_arity(literal: &str, args: &[String]) -> TokenResult<()> {
    if args.len() == 3 || args.len() == 4 {
        Ok(())
    } else {
        Err(TokenError::invalid_color(
            literal,
            format!("expected 3 or 4 components, found {}", args.len()),
        ))
    }
}

fn parse_rgb_args(literal: &str, args: &[String]) -> TokenResult<RgbColor> {
    check_arity(literal, args)?;

    let channel = |raw: &str| -> TokenResult<u8> {
        let value = match raw.strip_suffix('%') {
            Some(percent) => parse_number(literal, percent)? * 255.0 / 100.0,
            None => parse_number(literal, raw)?,
        };
        Ok(value.round().clamp(0.0, 255.0) as u8)
    };

    Ok(RgbColor::new(
        channel(&args[0])?,
        channel(&args[1])?,
        channel(&args[2])?,
    ))
}

fn parse_hsl_args(literal: &str, args: &[String]) -> TokenResult<RgbColor> {
    check_arity(literal, args)?;

    let hue_raw = args[0].strip_suffix("deg").unwrap_or(args[0].as_str());
    let hue = parse_number(literal, hue_raw)?;

    let percent = |raw: &str| -> TokenResult<f64> {
        let number = parse_number(literal, raw.strip_suffix('%').unwrap_or(raw))?;
        Ok(number.clamp(0.0, 100.0) / 100.0)
    };

    Ok(RgbColor::from_hsl(hue, percent(&args[1])?, percent(&args[2])?))
}
