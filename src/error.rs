//! Error taxonomy for settings updates and macro expansion.
//!
//! Library entry points that callers need to match on return [`TokenError`].
//! File handling and CLI glue keep using `anyhow` and convert at the boundary.

use thiserror::Error;

/// Why a settings update was rejected before anything was merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidInputReason {
    /// The update contained no entries.
    Empty,
    /// The update was not a key/value mapping.
    NotAMapping,
    /// A value had a type that cannot be stored as a setting.
    UnsupportedValue {
        /// Key carrying the offending value
        key: String,
    },
}

impl std::fmt::Display for InvalidInputReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "update contains no settings"),
            Self::NotAMapping => write!(f, "update must be a mapping of setting keys to values"),
            Self::UnsupportedValue { key } => {
                write!(f, "value for '{key}' must be a string, number or boolean")
            }
        }
    }
}

/// Errors raised by the token engine.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Malformed or empty settings update. Recovered as a logged no-op by callers.
    #[error("invalid settings update: {reason}")]
    InvalidInput {
        /// What was wrong with the update
        reason: InvalidInputReason,
    },

    /// A color literal could not be parsed.
    #[error("invalid color {}'{value}': {reason}", .key.as_deref().map(|k| format!("for '{k}' ")).unwrap_or_default())]
    InvalidColor {
        /// Setting key the literal came from, when known
        key: Option<String>,
        /// The literal as supplied
        value: String,
        /// Parser diagnostic
        reason: String,
    },

    /// A wrapper expansion referenced itself, directly or transitively.
    #[error("cyclic expansion: {}", .chain.join(" -> "))]
    CyclicExpansion {
        /// Macro names visited, ending with the repeated one
        chain: Vec<String>,
    },

    /// The persistence collaborator failed; nothing was merged.
    #[error("failed to persist settings: {0:#}")]
    Persistence(anyhow::Error),

    /// The CSS generation collaborator failed after the settings were saved.
    #[error("failed to regenerate stylesheets: {0:#}")]
    Generation(anyhow::Error),

    /// An expansion source document could not be read.
    #[error("invalid expansion source '{label}': {reason}")]
    ExpansionSource {
        /// Label or origin of the source
        label: String,
        /// Parser diagnostic
        reason: String,
    },
}

/// User-facing classification of a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    /// There was nothing to apply.
    NothingToDo,
    /// The caller's input was malformed.
    InvalidInput,
    /// A value could not be derived (bad color, cyclic macro).
    DerivationFailure,
    /// Storage or generation failed.
    Internal,
}

impl TokenError {
    /// Builds an [`TokenError::InvalidColor`] for a literal without a setting key.
    pub fn invalid_color(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidColor {
            key: None,
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Attaches the originating setting key to an [`TokenError::InvalidColor`].
    #[must_use]
    pub fn with_key(self, setting_key: &str) -> Self {
        match self {
            Self::InvalidColor { value, reason, .. } => Self::InvalidColor {
                key: Some(setting_key.to_string()),
                value,
                reason,
            },
            other => other,
        }
    }

    /// Classifies this error for end users.
    pub fn feedback(&self) -> Feedback {
        match self {
            Self::InvalidInput {
                reason: InvalidInputReason::Empty,
            } => Feedback::NothingToDo,
            Self::InvalidInput { .. } | Self::ExpansionSource { .. } => Feedback::InvalidInput,
            Self::InvalidColor { .. } | Self::CyclicExpansion { .. } => Feedback::DerivationFailure,
            Self::Persistence(_) | Self::Generation(_) => Feedback::Internal,
        }
    }
}

/// Result alias for engine operations.
pub type TokenResult<T> = Result<T, TokenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_color_message_includes_key() {
        let err = TokenError::invalid_color("#zz", "bad hex digit").with_key("color-primary");
        assert_eq!(
            err.to_string(),
            "invalid color for 'color-primary' '#zz': bad hex digit"
        );
    }

    #[test]
    fn test_invalid_color_message_without_key() {
        let err = TokenError::invalid_color("nope", "unrecognized color syntax");
        assert_eq!(err.to_string(), "invalid color 'nope': unrecognized color syntax");
    }

    #[test]
    fn test_cyclic_message_lists_chain() {
        let err = TokenError::CyclicExpansion {
            chain: vec!["@a".into(), "@b".into(), "@a".into()],
        };
        assert_eq!(err.to_string(), "cyclic expansion: @a -> @b -> @a");
    }

    #[test]
    fn test_feedback_classification() {
        let empty = TokenError::InvalidInput {
            reason: InvalidInputReason::Empty,
        };
        assert_eq!(empty.feedback(), Feedback::NothingToDo);

        let not_map = TokenError::InvalidInput {
            reason: InvalidInputReason::NotAMapping,
        };
        assert_eq!(not_map.feedback(), Feedback::InvalidInput);

        let color = TokenError::invalid_color("x", "y");
        assert_eq!(color.feedback(), Feedback::DerivationFailure);

        let io = TokenError::Persistence(anyhow::anyhow!("disk full"));
        assert_eq!(io.feedback(), Feedback::Internal);
    }
}
