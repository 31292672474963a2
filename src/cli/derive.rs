//! Color derivation command.

use crate::cli::common::{print_json, CliResult};
use crate::color;
use crate::models::{ColorModifier, ColorValue};
use clap::Args;
use serde::Serialize;

/// Derive a color value and its tonal variants
#[derive(Args, Debug)]
pub struct DeriveArgs {
    /// Color literal (hex, rgb(), hsl(), black, white)
    #[arg(value_name = "COLOR")]
    color: String,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize, Debug)]
struct VariantOutput {
    modifier: ColorModifier,
    #[serde(flatten)]
    value: ColorValue,
}

#[derive(Serialize, Debug)]
struct DeriveOutput {
    input: String,
    value: ColorValue,
    variants: Vec<VariantOutput>,
}

impl DeriveArgs {
    /// Execute derive command
    pub fn execute(&self) -> CliResult<()> {
        let value = color::derive(&self.color)?;
        let variants = color::tonal_variants(&value);

        if self.json {
            return print_json(&DeriveOutput {
                input: self.color.clone(),
                value,
                variants: variants
                    .into_iter()
                    .map(|(modifier, value)| VariantOutput { modifier, value })
                    .collect(),
            });
        }

        println!("{}", self.color);
        println!("  hex: {}", value.hex);
        println!("  rgb: {}", value.to_rgb_string());
        println!("  hsl: {}", value.to_hsl_string());
        println!();
        println!("Variants:");
        for (modifier, variant) in variants {
            println!(
                "  {:<12} {}  {}",
                modifier.as_str(),
                variant.hex,
                variant.to_hsl_string()
            );
        }

        Ok(())
    }
}
