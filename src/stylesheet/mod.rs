//! Stylesheet introspection.
//!
//! Looks up what a generated stylesheet actually contains: the literal rule
//! text for a class, or the literal value of a custom property declared at
//! `:root`. Sheets are reached through the [`StylesheetSource`] trait so the
//! same lookups run against files, in-memory CSS or test doubles. A sheet that
//! cannot be read is skipped, never fatal.

mod parse;

pub use parse::{CssFile, ParsedStylesheet};

use parse::split_declarations;

use regex::Regex;
use thiserror::Error;
use tracing::{debug, warn};

use crate::expansions::VariableLookup;

/// Kind of a top-level rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// Selector plus declaration block
    Style,
    /// `@media`, `@import`, ... kept as one opaque rule
    AtRule,
}

/// One top-level CSS rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssRule {
    /// Selector (or at-rule prelude) with whitespace collapsed
    pub selector: String,
    /// Literal source text of the whole rule
    pub css_text: String,
    /// Rule kind
    pub kind: RuleKind,
}

impl CssRule {
    /// Text between the outermost braces, if the rule has a block.
    #[must_use]
    pub fn declarations(&self) -> Option<&str> {
        let open = self.css_text.find('{')?;
        let close = self.css_text.rfind('}').filter(|close| *close > open);
        Some(match close {
            Some(close) => &self.css_text[open + 1..close],
            None => &self.css_text[open + 1..],
        })
    }
}

/// A stylesheet whose rules could not be listed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("stylesheet '{id}' is not readable: {reason}")]
pub struct AccessError {
    /// Identifier of the sheet
    pub id: String,
    /// Why access failed
    pub reason: String,
}

/// A queryable stylesheet.
pub trait StylesheetSource {
    /// Identifier matched against the allow-list (a file stem, a tag id, ...).
    fn id(&self) -> &str;

    /// Lists the sheet's top-level rules in source order.
    fn list_rules(&self) -> Result<Vec<CssRule>, AccessError>;
}

/// Returns the literal text of the first rule whose selector is exactly
/// `.class_name`. A leading `.` on `class_name` is accepted.
///
/// Sheets are scanned in order; unreadable sheets are skipped.
#[must_use]
pub fn find_class_rule(sheets: &[&dyn StylesheetSource], class_name: &str) -> Option<String> {
    let selector = format!(".{}", class_name.trim().trim_start_matches('.'));

    readable_rules(sheets).find_map(|rule| {
        (rule.kind == RuleKind::Style && rule.selector == selector).then_some(rule.css_text)
    })
}

/// Returns the value text, with its trailing `;`, of a custom property declared
/// in a `:root` rule.
///
/// `variable_name` may be given with or without its leading dashes.
///
/// # Examples
///
/// ```
/// use tokenkit::stylesheet::{find_root_variable, ParsedStylesheet, StylesheetSource};
///
/// let sheet = ParsedStylesheet::parse("tokens", ":root { --primary-h: 210; }");
/// let sheets: [&dyn StylesheetSource; 1] = [&sheet];
/// assert_eq!(find_root_variable(&sheets, "primary-h").as_deref(), Some("210;"));
/// ```
#[must_use]
pub fn find_root_variable(sheets: &[&dyn StylesheetSource], variable_name: &str) -> Option<String> {
    let name = normalize_variable_name(variable_name);
    if name == "--" {
        return None;
    }

    let pattern = format!(r"^{}\s*:", regex::escape(&name));
    let declaration_name = match Regex::new(&pattern) {
        Ok(regex) => regex,
        Err(e) => {
            warn!("cannot build lookup pattern for {name}: {e}");
            return None;
        }
    };

    readable_rules(sheets)
        .filter(|rule| rule.kind == RuleKind::Style && rule.selector.starts_with(":root"))
        .find_map(|rule| {
            let block = rule.declarations()?;
            split_declarations(block).into_iter().find_map(|declaration| {
                let found = declaration_name.find(&declaration)?;
                Some(format!("{};", declaration[found.end()..].trim()))
            })
        })
}

/// `primary-h`, `--primary-h` and `-primary-h ` all become `--primary-h`.
#[must_use]
pub fn normalize_variable_name(name: &str) -> String {
    format!("--{}", name.trim_start_matches('-').trim_end())
}

fn readable_rules<'a>(sheets: &'a [&'a dyn StylesheetSource]) -> impl Iterator<Item = CssRule> + 'a {
    sheets.iter().flat_map(|sheet| match sheet.list_rules() {
        Ok(rules) => rules,
        Err(e) => {
            warn!("skipping stylesheet: {e}");
            Vec::new()
        }
    })
}

/// The stylesheets trusted for introspection.
///
/// Sources whose identifier does not start with one of the allow-list
/// prefixes are ignored. An empty allow-list admits every source.
pub struct StylesheetSet {
    sources: Vec<Box<dyn StylesheetSource>>,
    allow_list: Vec<String>,
}

impl StylesheetSet {
    /// Creates an empty set with the given allow-list.
    #[must_use]
    pub fn new(allow_list: Vec<String>) -> Self {
        Self {
            sources: Vec::new(),
            allow_list,
        }
    }

    /// Adds a source. Sources are scanned in insertion order.
    pub fn push(&mut self, source: impl StylesheetSource + 'static) {
        self.sources.push(Box::new(source));
    }

    /// Returns true if `id` passes the allow-list.
    #[must_use]
    pub fn is_allowed(&self, id: &str) -> bool {
        self.allow_list.is_empty()
            || self
                .allow_list
                .iter()
                .any(|prefix| id.starts_with(prefix.as_str()))
    }

    /// The allowed sources, in order.
    #[must_use]
    pub fn allowed(&self) -> Vec<&dyn StylesheetSource> {
        self.sources
            .iter()
            .map(|source| &**source)
            .filter(|source| {
                let allowed = self.is_allowed(source.id());
                if !allowed {
                    debug!("stylesheet '{}' is not on the allow-list", source.id());
                }
                allowed
            })
            .collect()
    }

    /// See [`find_class_rule`].
    #[must_use]
    pub fn find_class_rule(&self, class_name: &str) -> Option<String> {
        find_class_rule(&self.allowed(), class_name)
    }

    /// See [`find_root_variable`].
    #[must_use]
    pub fn find_root_variable(&self, variable_name: &str) -> Option<String> {
        find_root_variable(&self.allowed(), variable_name)
    }

    /// Number of sources, allowed or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Returns true if no source was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl VariableLookup for StylesheetSet {
    fn lookup_variable(&self, name: &str) -> Option<String> {
        self.find_root_variable(name)
    }
}
