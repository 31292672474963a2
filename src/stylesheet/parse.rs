//! Minimal top-level CSS rule splitter.
//!
//! Only splits a sheet into its top-level rules; declarations are not parsed.
//! Comments between rules are dropped, comments inside a rule stay in its text.
//! Declaration blocks are split on demand by [`split_declarations`].

use std::fs;
use std::path::{Path, PathBuf};

use super::{AccessError, CssRule, RuleKind, StylesheetSource};

/// A stylesheet parsed from CSS text held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedStylesheet {
    id: String,
    rules: Vec<CssRule>,
}

impl ParsedStylesheet {
    /// Splits `css` into its top-level rules.
    ///
    /// # Examples
    ///
    /// ```
    /// use tokenkit::stylesheet::{ParsedStylesheet, StylesheetSource};
    ///
    /// let sheet = ParsedStylesheet::parse("tokens", ":root { --gap: 1rem; } .card { gap: var(--gap); }");
    /// let rules = sheet.list_rules().unwrap();
    /// assert_eq!(rules[1].selector, ".card");
    /// ```
    #[must_use]
    pub fn parse(id: impl Into<String>, css: &str) -> Self {
        Self {
            id: id.into(),
            rules: split_rules(css),
        }
    }

    /// Parsed rules in source order.
    #[must_use]
    pub fn rules(&self) -> &[CssRule] {
        &self.rules
    }
}

impl StylesheetSource for ParsedStylesheet {
    fn id(&self) -> &str {
        &self.id
    }

    fn list_rules(&self) -> Result<Vec<CssRule>, AccessError> {
        Ok(self.rules.clone())
    }
}

/// A stylesheet on disk, read each time its rules are listed.
///
/// A missing or unreadable file surfaces as an [`AccessError`], which scans
/// skip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssFile {
    id: String,
    path: PathBuf,
}

impl CssFile {
    /// Wraps `path`, using its file stem as the identifier.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let id = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { id, path }
    }

    /// Wraps `path` under an explicit identifier.
    #[must_use]
    pub fn with_id(id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
        }
    }

    /// Path of the file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StylesheetSource for CssFile {
    fn id(&self) -> &str {
        &self.id
    }

    fn list_rules(&self) -> Result<Vec<CssRule>, AccessError> {
        let css = fs::read_to_string(&self.path).map_err(|e| AccessError {
            id: self.id.clone(),
            reason: format!("{}: {e}", self.path.display()),
        })?;
        Ok(split_rules(&css))
    }
}

/// Splits CSS text into top-level rules.
fn split_rules(css: &str) -> Vec<CssRule> {
    let bytes = css.as_bytes();
    let mut rules = Vec::new();
    let mut pos = 0;

    loop {
        pos = skip_trivia(css, pos);
        if pos >= bytes.len() {
            break;
        }

        let start = pos;
        let Some((prelude_end, terminator)) = find_prelude_end(css, pos) else {
            // Trailing garbage without a block or terminator.
            break;
        };

        let end = if terminator == b'{' {
            find_block_end(css, prelude_end + 1)
        } else {
            prelude_end + 1
        };

        let selector = collapse_whitespace(&strip_comments(&css[start..prelude_end]));
        let kind = if selector.starts_with('@') {
            RuleKind::AtRule
        } else {
            RuleKind::Style
        };

        if !selector.is_empty() {
            rules.push(CssRule {
                selector,
                css_text: css[start..end].to_string(),
                kind,
            });
        }

        pos = end;
    }

    rules
}

/// Skips whitespace and comments starting at `pos`.
fn skip_trivia(css: &str, mut pos: usize) -> usize {
    let bytes = css.as_bytes();
    loop {
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if css[pos..].starts_with("/*") {
            pos = css[pos + 2..]
                .find("*/")
                .map_or(bytes.len(), |offset| pos + 2 + offset + 2);
        } else {
            return pos;
        }
    }
}

/// Finds the `{` opening a block or the `;` ending a statement at-rule.
fn find_prelude_end(css: &str, mut pos: usize) -> Option<(usize, u8)> {
    let bytes = css.as_bytes();
    while pos < bytes.len() {
        match bytes[pos] {
            b'{' | b';' => return Some((pos, bytes[pos])),
            b'"' | b'\'' => pos = skip_string(bytes, pos),
            b'/' if bytes.get(pos + 1) == Some(&b'*') => pos = skip_comment(css, pos),
            _ => pos += 1,
        }
    }
    None
}

/// Returns the offset just past the `}` closing the block opened before `pos`.
/// An unterminated block runs to the end of the input.
fn find_block_end(css: &str, mut pos: usize) -> usize {
    let bytes = css.as_bytes();
    let mut depth = 1usize;
    while pos < bytes.len() {
        match bytes[pos] {
            b'{' => {
                depth += 1;
                pos += 1;
            }
            b'}' => {
                depth -= 1;
                pos += 1;
                if depth == 0 {
                    return pos;
                }
            }
            b'"' | b'\'' => pos = skip_string(bytes, pos),
            b'/' if bytes.get(pos + 1) == Some(&b'*') => pos = skip_comment(css, pos),
            _ => pos += 1,
        }
    }
    bytes.len()
}

fn skip_string(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut pos = start + 1;
    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' => pos += 2,
            b if b == quote => return pos + 1,
            _ => pos += 1,
        }
    }
    bytes.len()
}

fn skip_comment(css: &str, start: usize) -> usize {
    css[start + 2..]
        .find("*/")
        .map_or(css.len(), |offset| start + 2 + offset + 2)
}

fn strip_comments(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut pos = 0;
    while pos < bytes.len() {
        match bytes[pos] {
            b'"' | b'\'' => pos = skip_string(bytes, pos),
            b'/' if bytes.get(pos + 1) == Some(&b'*') => {
                out.push_str(&text[copied..pos]);
                pos = skip_comment(text, pos);
                copied = pos;
            }
            _ => pos += 1,
        }
    }
    out.push_str(&text[copied.min(text.len())..]);
    out
}

/// Splits a declaration block into trimmed declarations.
///
/// Comments are removed first. A `;` inside a string or inside parentheses
/// does not end a declaration.
pub(super) fn split_declarations(block: &str) -> Vec<String> {
    let text = strip_comments(block);
    let bytes = text.as_bytes();
    let mut declarations = Vec::new();
    let mut start = 0;
    let mut depth = 0usize;
    let mut pos = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            b'"' | b'\'' => {
                pos = skip_string(bytes, pos);
                continue;
            }
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            b';' if depth == 0 => {
                push_declaration(&mut declarations, &text[start..pos]);
                start = pos + 1;
            }
            _ => {}
        }
        pos += 1;
    }
    push_declaration(&mut declarations, &text[start..]);

    declarations
}

fn push_declaration(declarations: &mut Vec<String>, text: &str) {
    let text = text.trim();
    if !text.is_empty() {
        declarations.push(text.to_string());
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_top_level_rules() {
        let css = "/* header */\n:root { --primary-h: 210; }\n\n.card{padding:1rem}\n";
        let rules = split_rules(css);

        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].selector, ":root");
        assert_eq!(rules[0].css_text, ":root { --primary-h: 210; }");
        assert_eq!(rules[1].selector, ".card");
        assert_eq!(rules[1].css_text, ".card{padding:1rem}");
        assert_eq!(rules[1].kind, RuleKind::Style);
    }

    #[test]
    fn test_at_rule_blocks_are_opaque() {
        let css = "@media (max-width: 768px) { .card { padding: 0; } }\n.card { padding: 1rem; }";
        let rules = split_rules(css);

        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].kind, RuleKind::AtRule);
        assert_eq!(rules[0].selector, "@media (max-width: 768px)");
        assert!(rules[0].css_text.ends_with("} }"));
        assert_eq!(rules[1].css_text, ".card { padding: 1rem; }");
    }

    #[test]
    fn test_split_declarations() {
        let block = " --a: 1; /* --b: 2; */ --c: \"x;/*y*/\" ; --d: url(a;b) ;; --e:3 ";
        assert_eq!(
            split_declarations(block),
            vec!["--a: 1", "--c: \"x;/*y*/\"", "--d: url(a;b)", "--e:3"]
        );
    }

    #[test]
    fn test_statement_at_rule_and_strings() {
        let css = "@import url(\"a;b.css\");\n.icon::before { content: \"}\"; }";
        let rules = split_rules(css);

        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].selector, "@import url(\"a;b.css\")");
        assert_eq!(rules[0].kind, RuleKind::AtRule);
        assert_eq!(rules[1].css_text, ".icon::before { content: \"}\"; }");
    }

    #[test]
    fn test_comments_inside_rules_are_kept() {
        let css = ".a /* note */ { color: red; /* inline */ }";
        let rules = split_rules(css);
        assert_eq!(rules[0].selector, ".a");
        assert_eq!(rules[0].css_text, css);
    }

    #[test]
    fn test_unterminated_block_runs_to_end() {
        let rules = split_rules(".a { color: red;");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].css_text, ".a { color: red;");
    }

    #[test]
    fn test_css_file_missing_is_access_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let sheet = CssFile::new(dir.path().join("tokens.css"));
        assert_eq!(sheet.id(), "tokens");

        let err = sheet.list_rules().unwrap_err();
        assert_eq!(err.id, "tokens");
    }

    #[test]
    fn test_css_file_reads_rules() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("tokens.css");
        fs::write(&path, ":root { --gap: 1rem; }").unwrap();

        let rules = CssFile::new(&path).list_rules().unwrap();
        assert_eq!(rules.len(), 1);
    }
}
