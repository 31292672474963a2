//! Macro expansion over authored CSS text.
//!
//! Tokens are the start character followed by an identifier made of ASCII
//! letters, digits, `-` and `_`. They are resolved left to right against the
//! expansion table; text outside a token is copied byte for byte.

use tracing::{debug, warn};

use super::{ExpansionEntry, ExpansionSettings, ExpansionTable, WrapperRef};
use crate::error::{TokenError, TokenResult};

/// CSS at-rule keywords passed through untouched when the start character is `@`.
const CSS_AT_RULES: &[&str] = &[
    "media",
    "supports",
    "container",
    "layer",
    "import",
    "keyframes",
    "font-face",
    "page",
    "charset",
    "namespace",
    "property",
    "font-feature-values",
    "counter-style",
    "document",
    "scope",
    "starting-style",
];

/// Source of CSS custom-property values used when a macro is not in the table.
pub trait VariableLookup {
    /// Returns the literal value text declared for `name` (a `--`-prefixed
    /// custom property name), if any.
    fn lookup_variable(&self, name: &str) -> Option<String>;
}

impl<F> VariableLookup for F
where
    F: Fn(&str) -> Option<String>,
{
    fn lookup_variable(&self, name: &str) -> Option<String> {
        self(name)
    }
}

/// Result of expanding one input string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionOutput {
    /// Expanded text
    pub text: String,
    /// Tokens left in place because nothing resolved them, in order of first
    /// appearance, each written with its start character
    pub unresolved: Vec<String>,
}

impl ExpansionOutput {
    /// Returns true if every macro token was resolved.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Expands every macro token in `source`.
///
/// Literal entries are substituted verbatim. Wrapper entries fill their
/// template's `{{slot}}` placeholders and expand the result again, failing with
/// [`TokenError::CyclicExpansion`] if a wrapper chain revisits a macro. Tokens
/// missing from the table are looked up through `lookup` when
/// `settings.fallback_to_stylesheet` is set, and otherwise left in place and
/// reported in [`ExpansionOutput::unresolved`].
///
/// # Examples
///
/// ```
/// use tokenkit::expansions::{expand, ExpansionSettings, ExpansionTable};
///
/// let mut table = ExpansionTable::new();
/// table.insert_literal("@gap-s", "gap: 1rem;");
///
/// let out = expand("div{ @gap-s }", &table, &ExpansionSettings::default(), None).unwrap();
/// assert_eq!(out.text, "div{ gap: 1rem; }");
/// assert!(out.is_complete());
/// ```
pub fn expand(
    source: &str,
    table: &ExpansionTable,
    settings: &ExpansionSettings,
    lookup: Option<&dyn VariableLookup>,
) -> TokenResult<ExpansionOutput> {
    let mut resolver = Resolver {
        table,
        settings,
        lookup,
        chain: Vec::new(),
        unresolved: Vec::new(),
    };

    let text = resolver.expand_text(source)?;

    if !resolver.unresolved.is_empty() {
        warn!(
            "{} unresolved macro(s): {}",
            resolver.unresolved.len(),
            resolver.unresolved.join(", ")
        );
    }

    Ok(ExpansionOutput {
        text,
        unresolved: resolver.unresolved,
    })
}

struct Resolver<'a> {
    table: &'a ExpansionTable,
    settings: &'a ExpansionSettings,
    lookup: Option<&'a dyn VariableLookup>,
    /// Macro keys currently being expanded through wrappers
    chain: Vec<String>,
    unresolved: Vec<String>,
}

impl Resolver<'_> {
    fn expand_text(&mut self, source: &str) -> TokenResult<String> {
        let start = self.settings.start_character;
        let mut output = String::with_capacity(source.len());
        let mut copied_up_to = 0;
        let mut cursor = 0;

        while let Some(offset) = source[cursor..].find(start) {
            let token_start = cursor + offset;
            let name_start = token_start + start.len_utf8();
            let name_len = source[name_start..]
                .find(|c: char| !is_identifier_char(c))
                .unwrap_or(source.len() - name_start);

            if name_len == 0 {
                cursor = name_start;
                continue;
            }

            let token_end = name_start + name_len;
            let token = &source[token_start..token_end];
            let bare = &source[name_start..token_end];

            output.push_str(&source[copied_up_to..token_start]);
            match self.resolve_token(token, bare)? {
                Some(replacement) => output.push_str(&replacement),
                None => output.push_str(token),
            }

            copied_up_to = token_end;
            cursor = token_end;
        }

        output.push_str(&source[copied_up_to..]);
        Ok(output)
    }

    fn resolve_token(&mut self, token: &str, bare: &str) -> TokenResult<Option<String>> {
        let table = self.table;
        if let Some((key, entry)) = table.lookup(token, bare) {
            debug!("expanding {token} via table key '{key}'");
            return match entry {
                ExpansionEntry::Literal(css) => Ok(Some(css.clone())),
                ExpansionEntry::Wrapped(reference) => self.expand_wrapper(token, reference),
            };
        }

        if self.settings.start_character == '@' && CSS_AT_RULES.contains(&bare) {
            return Ok(None);
        }

        if self.settings.fallback_to_stylesheet {
            if let Some(lookup) = self.lookup {
                let variable = if bare.starts_with("--") {
                    bare.to_string()
                } else {
                    format!("--{bare}")
                };
                if let Some(value) = lookup.lookup_variable(&variable) {
                    debug!("expanding {token} from stylesheet variable {variable}");
                    return Ok(Some(value));
                }
            }
        }

        if !self.unresolved.iter().any(|seen| seen == token) {
            self.unresolved.push(token.to_string());
        }
        Ok(None)
    }

    fn expand_wrapper(&mut self, token: &str, reference: &WrapperRef) -> TokenResult<Option<String>> {
        if self.chain.iter().any(|visited| visited == token) {
            let mut chain = self.chain.clone();
            chain.push(token.to_string());
            return Err(TokenError::CyclicExpansion { chain });
        }

        let table = self.table;
        let Some(template) = table.wrappers.get(&reference.wrapper) else {
            warn!(
                "macro {token} references unknown wrapper '{}'",
                reference.wrapper
            );
            if !self.unresolved.iter().any(|seen| seen == token) {
                self.unresolved.push(token.to_string());
            }
            return Ok(None);
        };

        let filled = fill_template(template, reference, token);

        self.chain.push(token.to_string());
        let expanded = self.expand_text(&filled);
        self.chain.pop();

        expanded.map(Some)
    }
}

/// Replaces `{{slot}}` placeholders with the reference's slot text.
///
/// Placeholders without a matching slot are replaced with nothing.
fn fill_template(template: &str, reference: &WrapperRef, token: &str) -> String {
    let mut filled = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        let Some(close) = rest[open + 2..].find("}}") else {
            break;
        };
        let slot = rest[open + 2..open + 2 + close].trim();

        filled.push_str(&rest[..open]);
        match reference.slots.get(slot) {
            Some(text) => filled.push_str(text),
            None => debug!("macro {token}: wrapper slot '{slot}' left empty"),
        }
        rest = &rest[open + 2 + close + 2..];
    }

    filled.push_str(rest);
    filled
}

const fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}
