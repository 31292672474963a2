//! CSS macro expansions.
//!
//! Expansion tables map short macro names (written as `@name` in authored CSS)
//! to longer declarations or to wrapper templates. This module provides:
//!
//! - [`ExpansionRegistry`]: merges categorized sources into one flat table plus
//!   a cheatsheet tree for documentation and search
//! - [`expand`]: rewrites macro tokens in arbitrary text using a table
//!
//! Tables are plain values built once and passed to whoever needs them; there
//! is no process-wide registry.

pub mod registry;
pub mod resolver;

pub use registry::{
    builtin_sources, load_source_file, parse_source, CheatsheetNode, Collision,
    ExpansionRegistry, ExpansionSource, NodeType,
};
pub use resolver::{expand, ExpansionOutput, VariableLookup};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::DEFAULT_START_CHARACTER;

/// One expansion definition.
///
/// In source documents a literal is a plain string; a wrapper reference is an
/// object naming the wrapper plus one string per template slot:
///
/// ```json
/// { "wrapper": "breakpoint-m", "content": "flex-direction: column;" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExpansionEntry {
    /// CSS text substituted verbatim
    Literal(String),
    /// Template reference whose slots are expanded recursively
    Wrapped(WrapperRef),
}

/// Reference from an expansion to a wrapper template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrapperRef {
    /// Name of the wrapper in the table's `wrappers` map
    pub wrapper: String,
    /// Slot name to slot text, filled into `{{slot}}` placeholders
    #[serde(flatten)]
    pub slots: BTreeMap<String, String>,
}

/// Flat expansion table produced by merging every source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpansionTable {
    /// Macro name to entry
    #[serde(default)]
    pub expansions: BTreeMap<String, ExpansionEntry>,
    /// Wrapper name to template text
    #[serde(default)]
    pub wrappers: BTreeMap<String, String>,
}

impl ExpansionTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a literal expansion.
    pub fn insert_literal(&mut self, name: impl Into<String>, css: impl Into<String>) {
        self.expansions
            .insert(name.into(), ExpansionEntry::Literal(css.into()));
    }

    /// Adds a wrapper template.
    pub fn insert_wrapper(&mut self, name: impl Into<String>, template: impl Into<String>) {
        self.wrappers.insert(name.into(), template.into());
    }

    /// Adds an expansion that wraps `content` in the named wrapper.
    pub fn insert_wrapped(
        &mut self,
        name: impl Into<String>,
        wrapper: impl Into<String>,
        content: impl Into<String>,
    ) {
        let mut slots = BTreeMap::new();
        slots.insert("content".to_string(), content.into());
        self.expansions.insert(
            name.into(),
            ExpansionEntry::Wrapped(WrapperRef {
                wrapper: wrapper.into(),
                slots,
            }),
        );
    }

    /// Finds the entry for a macro token, trying the full token (with its start
    /// character) first and then the bare name.
    #[must_use]
    pub fn lookup<'a>(&'a self, token: &'a str, bare: &'a str) -> Option<(&'a str, &'a ExpansionEntry)> {
        self.expansions
            .get_key_value(token)
            .or_else(|| self.expansions.get_key_value(bare))
            .map(|(key, entry)| (key.as_str(), entry))
    }
}

/// Process-wide expansion behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpansionSettings {
    /// Character marking a macro reference
    pub start_character: char,
    /// Look unresolved macros up in the live stylesheet
    pub fallback_to_stylesheet: bool,
}

impl Default for ExpansionSettings {
    fn default() -> Self {
        Self {
            start_character: DEFAULT_START_CHARACTER,
            fallback_to_stylesheet: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_deserializes_literal_and_wrapper() {
        let literal: ExpansionEntry = serde_json::from_str(r#""gap: 1rem;""#).unwrap();
        assert_eq!(literal, ExpansionEntry::Literal("gap: 1rem;".into()));

        let wrapped: ExpansionEntry =
            serde_json::from_str(r#"{"wrapper": "bp-m", "content": "@gap-s"}"#).unwrap();
        match wrapped {
            ExpansionEntry::Wrapped(reference) => {
                assert_eq!(reference.wrapper, "bp-m");
                assert_eq!(reference.slots["content"], "@gap-s");
            }
            ExpansionEntry::Literal(_) => panic!("expected a wrapper reference"),
        }
    }

    #[test]
    fn test_lookup_prefers_full_token() {
        let mut table = ExpansionTable::new();
        table.insert_literal("@gap", "gap: 2rem;");
        table.insert_literal("gap", "gap: 1rem;");

        let (key, entry) = table.lookup("@gap", "gap").unwrap();
        assert_eq!(key, "@gap");
        assert_eq!(entry, &ExpansionEntry::Literal("gap: 2rem;".into()));

        let (key, _) = table.lookup("@other", "gap").unwrap();
        assert_eq!(key, "gap");
    }

    #[test]
    fn test_default_settings() {
        let settings = ExpansionSettings::default();
        assert_eq!(settings.start_character, '@');
        assert!(!settings.fallback_to_stylesheet);
    }
}
