//! Error kinds raised by the state core.
//!
//! Edge code (`main`, fetchers, the poller) uses [`anyhow`]; everything the
//! core can reject has a distinguishable variant here.

use thiserror::Error;

/// A value the application was wired with makes no sense. Fatal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("unknown form process state: {0}")]
    UnknownProcessState(String),
}

/// A setter was called with ids that do not match the current state.
///
/// The state is never partially updated when one of these is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("no source with id '{0}'")]
    UnknownSource(String),

    #[error("no post with id '{0}'")]
    UnknownPost(String),

    #[error("a source with link '{0}' already exists")]
    DuplicateSource(String),

    #[error("unsupported language '{0}'")]
    UnsupportedLanguage(String),

    #[error("post '{post}' does not belong to source '{source_id}'")]
    ForeignPost { post: String, source_id: String },
}

/// A feed link typed into the form was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("not a valid URL")]
    Malformed,

    #[error("feed already added")]
    Duplicate,
}

impl ValidationError {
    /// Translation key shown beneath the input.
    pub fn key(&self) -> &'static str {
        match self {
            ValidationError::Malformed => "form.error.url",
            ValidationError::Duplicate => "form.error.duplicate",
        }
    }
}
