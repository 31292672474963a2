//! Expansion table registry.
//!
//! Categorized expansion sources are merged, in a fixed order, into one flat
//! [`ExpansionTable`] and a [`CheatsheetNode`] tree that mirrors it. The
//! built-in sources are embedded JSON documents.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use super::{expand, ExpansionEntry, ExpansionOutput, ExpansionSettings, ExpansionTable, VariableLookup};
use crate::error::{TokenError, TokenResult};

/// Built-in sources in load order. Later sources win on key collisions.
const BUILTIN_SOURCES: [(&str, &str); 6] = [
    ("color", include_str!("data/color.json")),
    ("grid", include_str!("data/grid.json")),
    ("ipsum", include_str!("data/ipsum.json")),
    ("media-query", include_str!("data/media_query.json")),
    ("misc", include_str!("data/misc.json")),
    ("js", include_str!("data/js.json")),
];

/// Label of the cheatsheet root node.
const CHEATSHEET_ROOT_LABEL: &str = "Expansions";

/// One categorized expansion source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpansionSource {
    /// Category name shown in the cheatsheet
    pub label: String,
    /// Macro name to entry
    #[serde(default)]
    pub expansions: BTreeMap<String, ExpansionEntry>,
    /// Wrapper name to template text
    #[serde(default)]
    pub wrappers: BTreeMap<String, String>,
}

/// Kind of a cheatsheet node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// The single root
    Root,
    /// One node per source
    Category,
    /// One leaf per macro
    Expansion,
}

/// Node of the hierarchical cheatsheet view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheatsheetNode {
    /// Root title, category label or macro name
    pub label: String,
    /// Node kind
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Resolved entry, present on expansion leaves
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<ExpansionEntry>,
    /// Child nodes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<CheatsheetNode>,
}

impl CheatsheetNode {
    fn branch(label: &str, node_type: NodeType) -> Self {
        Self {
            label: label.to_string(),
            node_type,
            entry: None,
            children: Vec::new(),
        }
    }

    fn leaf(name: &str, entry: ExpansionEntry) -> Self {
        Self {
            label: name.to_string(),
            node_type: NodeType::Expansion,
            entry: Some(entry),
            children: Vec::new(),
        }
    }

    /// Iterates over every expansion leaf below this node, depth first.
    pub fn leaves(&self) -> Box<dyn Iterator<Item = &CheatsheetNode> + '_> {
        if self.node_type == NodeType::Expansion {
            Box::new(std::iter::once(self))
        } else {
            Box::new(self.children.iter().flat_map(CheatsheetNode::leaves))
        }
    }
}

/// A macro name defined by more than one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collision {
    /// Colliding macro or wrapper name
    pub name: String,
    /// Label of the source that defined it first
    pub overridden: String,
    /// Label of the source whose definition was kept
    pub winner: String,
}

/// Merged expansion table plus its cheatsheet and settings.
///
/// Built once from an explicit list of sources and read thereafter. Pass it
/// (or its [`ExpansionTable`]) to whatever needs to expand macros.
#[derive(Debug, Clone)]
pub struct ExpansionRegistry {
    table: ExpansionTable,
    cheatsheet: CheatsheetNode,
    settings: ExpansionSettings,
    collisions: Vec<Collision>,
}

impl ExpansionRegistry {
    /// Builds the registry from the embedded sources.
    pub fn builtin(settings: ExpansionSettings) -> TokenResult<Self> {
        Ok(Self::from_sources(builtin_sources()?, settings))
    }

    /// Merges `sources` in the given order.
    ///
    /// Keys defined by an earlier source are overwritten by later ones. Each
    /// overwrite is logged as a warning and recorded in [`Self::collisions`];
    /// the cheatsheet lists the key only under the source that won.
    ///
    /// # Examples
    ///
    /// ```
    /// use tokenkit::expansions::{parse_source, ExpansionRegistry, ExpansionSettings};
    ///
    /// let spacing = parse_source(r#"{"label": "Spacing", "expansions": {"gap-s": "gap: 1rem;"}}"#, "inline").unwrap();
    /// let registry = ExpansionRegistry::from_sources(vec![spacing], ExpansionSettings::default());
    /// assert!(registry.table().expansions.contains_key("gap-s"));
    /// assert_eq!(registry.cheatsheet().children[0].label, "Spacing");
    /// ```
    #[must_use]
    pub fn from_sources(sources: Vec<ExpansionSource>, settings: ExpansionSettings) -> Self {
        let mut table = ExpansionTable::default();
        let mut categories: Vec<CheatsheetNode> = Vec::with_capacity(sources.len());
        let mut labels: Vec<String> = Vec::with_capacity(sources.len());
        let mut origin: HashMap<String, usize> = HashMap::new();
        let mut wrapper_origin: HashMap<String, usize> = HashMap::new();
        let mut collisions = Vec::new();

        for (index, source) in sources.into_iter().enumerate() {
            let mut category = CheatsheetNode::branch(&source.label, NodeType::Category);

            for (name, entry) in source.expansions {
                if let Some(previous) = origin.insert(name.clone(), index) {
                    warn!(
                        "expansion '{}' from '{}' overrides the definition from '{}'",
                        name, source.label, labels[previous]
                    );
                    categories[previous]
                        .children
                        .retain(|leaf| leaf.label != name);
                    collisions.push(Collision {
                        name: name.clone(),
                        overridden: labels[previous].clone(),
                        winner: source.label.clone(),
                    });
                }
                category.children.push(CheatsheetNode::leaf(&name, entry.clone()));
                table.expansions.insert(name, entry);
            }

            for (name, template) in source.wrappers {
                if let Some(previous) = wrapper_origin.insert(name.clone(), index) {
                    warn!(
                        "wrapper '{}' from '{}' overrides the definition from '{}'",
                        name, source.label, labels[previous]
                    );
                    collisions.push(Collision {
                        name: name.clone(),
                        overridden: labels[previous].clone(),
                        winner: source.label.clone(),
                    });
                }
                table.wrappers.insert(name, template);
            }

            debug!(
                "loaded expansion source '{}' ({} expansions)",
                source.label,
                category.children.len()
            );
            labels.push(source.label);
            categories.push(category);
        }

        let mut cheatsheet = CheatsheetNode::branch(CHEATSHEET_ROOT_LABEL, NodeType::Root);
        cheatsheet.children = categories;

        Self {
            table,
            cheatsheet,
            settings,
            collisions,
        }
    }

    /// The merged flat table.
    #[must_use]
    pub const fn table(&self) -> &ExpansionTable {
        &self.table
    }

    /// The cheatsheet tree mirroring the flat table.
    #[must_use]
    pub const fn cheatsheet(&self) -> &CheatsheetNode {
        &self.cheatsheet
    }

    /// Settings this registry was built with.
    #[must_use]
    pub const fn settings(&self) -> ExpansionSettings {
        self.settings
    }

    /// Key collisions seen while merging.
    #[must_use]
    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }

    /// Finds cheatsheet leaves whose name contains `query` (case-insensitive).
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&CheatsheetNode> {
        let query = query.to_lowercase();
        self.cheatsheet
            .leaves()
            .filter(|leaf| leaf.label.to_lowercase().contains(&query))
            .collect()
    }

    /// Expands `source` with this registry's table and settings.
    pub fn expand(
        &self,
        source: &str,
        lookup: Option<&dyn VariableLookup>,
    ) -> TokenResult<ExpansionOutput> {
        expand(source, &self.table, &self.settings, lookup)
    }
}

/// Parses one source document. `origin` names it in error messages.
pub fn parse_source(json: &str, origin: &str) -> TokenResult<ExpansionSource> {
    serde_json::from_str(json).map_err(|e| TokenError::ExpansionSource {
        label: origin.to_string(),
        reason: e.to_string(),
    })
}

/// Reads and parses a source document from disk.
pub fn load_source_file(path: &Path) -> TokenResult<ExpansionSource> {
    let origin = path.display().to_string();
    let json = fs::read_to_string(path).map_err(|e| TokenError::ExpansionSource {
        label: origin.clone(),
        reason: e.to_string(),
    })?;
    parse_source(&json, &origin)
}

/// Parses the embedded sources in their fixed load order.
pub fn builtin_sources() -> TokenResult<Vec<ExpansionSource>> {
    BUILTIN_SOURCES
        .iter()
        .map(|(name, json)| parse_source(json, name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn source(label: &str, entries: &[(&str, &str)]) -> ExpansionSource {
        ExpansionSource {
            label: label.to_string(),
            expansions: entries
                .iter()
                .map(|(k, v)| ((*k).to_string(), ExpansionEntry::Literal((*v).to_string())))
                .collect(),
            wrappers: BTreeMap::new(),
        }
    }

    #[test]
    fn test_builtin_sources_load_in_order() {
        let sources = builtin_sources().expect("embedded sources should parse");
        let labels: Vec<&str> = sources.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Color", "Grid", "Ipsum", "Media Queries", "Miscellaneous", "JS"]
        );
    }

    #[test]
    fn test_builtin_registry_has_no_collisions() {
        let registry = ExpansionRegistry::builtin(ExpansionSettings::default()).unwrap();
        assert!(registry.collisions().is_empty());
        assert!(registry.table().expansions.contains_key("gap-s"));
        assert!(registry.table().wrappers.contains_key("breakpoint-m"));
    }

    #[test]
    fn test_cheatsheet_mirrors_flat_table() {
        let registry = ExpansionRegistry::builtin(ExpansionSettings::default()).unwrap();
        let leaves: Vec<&CheatsheetNode> = registry.cheatsheet().leaves().collect();

        assert_eq!(leaves.len(), registry.table().expansions.len());

        let names: HashSet<&str> = leaves.iter().map(|leaf| leaf.label.as_str()).collect();
        assert_eq!(names.len(), leaves.len(), "each key appears exactly once");

        for leaf in leaves {
            assert_eq!(leaf.node_type, NodeType::Expansion);
            assert_eq!(
                leaf.entry.as_ref(),
                registry.table().expansions.get(&leaf.label)
            );
        }
    }

    #[test]
    fn test_collision_last_write_wins() {
        let first = source("First", &[("gap", "gap: 1rem;"), ("only-first", "a: b;")]);
        let second = source("Second", &[("gap", "gap: 2rem;")]);

        let registry =
            ExpansionRegistry::from_sources(vec![first, second], ExpansionSettings::default());

        assert_eq!(
            registry.table().expansions["gap"],
            ExpansionEntry::Literal("gap: 2rem;".into())
        );
        assert_eq!(
            registry.collisions(),
            &[Collision {
                name: "gap".into(),
                overridden: "First".into(),
                winner: "Second".into(),
            }]
        );

        let categories = &registry.cheatsheet().children;
        assert_eq!(categories[0].children.len(), 1);
        assert_eq!(categories[0].children[0].label, "only-first");
        assert_eq!(categories[1].children[0].label, "gap");
    }

    #[test]
    fn test_cheatsheet_serializes_type_tag() {
        let registry = ExpansionRegistry::from_sources(
            vec![source("Spacing", &[("gap-s", "gap: 1rem;")])],
            ExpansionSettings::default(),
        );
        let json = serde_json::to_value(registry.cheatsheet()).unwrap();
        assert_eq!(json["label"], "Expansions");
        assert_eq!(json["type"], "root");
        assert_eq!(json["children"][0]["type"], "category");
        assert_eq!(json["children"][0]["children"][0]["type"], "expansion");
        assert_eq!(json["children"][0]["children"][0]["entry"], "gap: 1rem;");
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let registry = ExpansionRegistry::builtin(ExpansionSettings::default()).unwrap();
        let results = registry.search("GAP-");
        assert!(results.iter().any(|leaf| leaf.label == "gap-s"));
        assert!(results.iter().all(|leaf| leaf.label.contains("gap-")));
    }

    #[test]
    fn test_builtin_wrapper_expansion() {
        let registry = ExpansionRegistry::builtin(ExpansionSettings::default()).unwrap();
        let out = registry.expand(".x { @grid-1-m }", None).unwrap();
        assert_eq!(
            out.text,
            ".x { @media (max-width: 768px) { display: grid; grid-template-columns: repeat(1, minmax(0, 1fr)); } }"
        );
        assert!(out.is_complete());
    }

    #[test]
    fn test_parse_source_reports_origin() {
        let err = parse_source("{ not json", "custom.json").unwrap_err();
        assert!(err.to_string().contains("custom.json"));
    }

    #[test]
    fn test_load_source_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("extra.json");
        fs::write(&path, r#"{"label": "Extra", "expansions": {"x": "y: z;"}}"#).unwrap();

        let source = load_source_file(&path).unwrap();
        assert_eq!(source.label, "Extra");
        assert!(load_source_file(&dir.path().join("missing.json")).is_err());
    }
}
