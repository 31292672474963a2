//! CSS generation collaborators.
//!
//! A generator turns a settings snapshot plus the flat expansion table into
//! stylesheet files and reports how many it wrote.

use anyhow::Result;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::settings_store::base_color_name;
use super::write_atomic;
use crate::color::{self, is_non_derivable};
use crate::constants::{APP_BINARY_NAME, EXPANSIONS_CSS_FILE, TOKENS_CSS_FILE};
use crate::expansions::{expand, ExpansionEntry, ExpansionSettings, ExpansionTable};
use crate::models::{ColorValue, SettingsSnapshot};

/// Produces stylesheet artifacts from settings.
pub trait CssGenerator {
    /// Writes the artifacts and returns the number of files produced.
    fn generate(&self, snapshot: &SettingsSnapshot, table: &ExpansionTable) -> Result<usize>;
}

/// Generator that writes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopGenerator;

impl CssGenerator for NoopGenerator {
    fn generate(&self, _snapshot: &SettingsSnapshot, _table: &ExpansionTable) -> Result<usize> {
        Ok(0)
    }
}

/// Writes `tokens.css` (custom properties) and `expansions.css` (utility
/// classes) into an output directory.
#[derive(Debug, Clone)]
pub struct VariablesCssGenerator {
    output_dir: PathBuf,
    settings: ExpansionSettings,
}

impl VariablesCssGenerator {
    /// Creates a generator writing into `output_dir`.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>, settings: ExpansionSettings) -> Self {
        Self {
            output_dir: output_dir.into(),
            settings,
        }
    }

    /// Directory the artifacts are written to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Renders the custom-property stylesheet.
    #[must_use]
    pub fn render_tokens(&self, snapshot: &SettingsSnapshot) -> String {
        let mut css = header();
        css.push_str(":root {\n");

        for (key, value) in snapshot.iter() {
            if !is_css_ident(key) {
                debug!("not emitting setting '{key}': not a valid custom property name");
                continue;
            }
            let _ = writeln!(css, "  --{key}: {value};");
        }

        for (key, value) in snapshot.iter() {
            let Some(name) = base_color_name(key) else {
                continue;
            };
            if is_non_derivable(value) || !is_css_ident(name) {
                continue;
            }
            match color::derive(value) {
                Ok(base) => write_color_components(&mut css, snapshot, name, &base),
                Err(e) => warn!("not emitting components for '{key}': {e}"),
            }
        }

        css.push_str("}\n");
        css
    }

    /// Renders the utility-class stylesheet, one class per literal expansion.
    #[must_use]
    pub fn render_expansions(&self, table: &ExpansionTable) -> String {
        let mut css = header();

        for (key, entry) in &table.expansions {
            let ExpansionEntry::Literal(body) = entry else {
                continue;
            };
            let class = key.trim_start_matches(self.settings.start_character);
            if !is_css_ident(class) {
                continue;
            }
            match expand(body, table, &self.settings, None) {
                Ok(output) => {
                    let _ = writeln!(css, ".{class} {{ {} }}", output.text.trim());
                }
                Err(e) => warn!("not emitting class '.{class}': {e}"),
            }
        }

        css
    }
}

impl CssGenerator for VariablesCssGenerator {
    fn generate(&self, snapshot: &SettingsSnapshot, table: &ExpansionTable) -> Result<usize> {
        let tokens = self.output_dir.join(TOKENS_CSS_FILE);
        write_atomic(&tokens, &self.render_tokens(snapshot))?;

        let expansions = self.output_dir.join(EXPANSIONS_CSS_FILE);
        write_atomic(&expansions, &self.render_expansions(table))?;

        debug!("wrote {} and {}", tokens.display(), expansions.display());
        Ok(2)
    }
}

fn header() -> String {
    format!("/* Generated by {APP_BINARY_NAME}. Do not edit. */\n")
}

/// Emits `--<name>-h/-s/-l` and one `hsl()` property per tonal variant.
/// Properties already present as explicit settings are left to them.
fn write_color_components(
    css: &mut String,
    snapshot: &SettingsSnapshot,
    name: &str,
    base: &ColorValue,
) {
    let mut emit = |property: String, value: String| {
        if !snapshot.contains_key(&property) {
            let _ = writeln!(css, "  --{property}: {value};");
        }
    };

    emit(format!("{name}-h"), base.h.to_string());
    emit(format!("{name}-s"), base.s_perc.clone());
    emit(format!("{name}-l"), base.l_perc.clone());

    for (modifier, variant) in color::tonal_variants(base) {
        let saturation = snapshot
            .get(&modifier.saturation_key(name))
            .map_or_else(|| variant.s.to_string(), |s| s.trim().trim_end_matches('%').to_string());
        emit(
            format!("{name}-{modifier}"),
            format!("hsl({}, {}%, {}%)", variant.h, saturation, variant.l),
        );
    }
}

fn is_css_ident(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
