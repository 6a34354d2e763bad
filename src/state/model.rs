//! The application data model.
//!
//! Plain data only: every mutation goes through [`crate::state::Store`], which
//! owns an [`AppState`] and reports each write as a [`crate::state::Change`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::error::ConfigurationError;

pub type SourceId = String;
pub type PostId = String;

/// Lifecycle of the "add feed" form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessState {
    /// Waiting for input; also the state right after a successful add.
    #[default]
    Filling,
    /// A subscribe request is in flight.
    Sending,
    /// The last subscribe request failed.
    Failed,
}

impl ProcessState {
    pub fn as_str(self) -> &'static str {
        match self {
            ProcessState::Filling => "filling",
            ProcessState::Sending => "sending",
            ProcessState::Failed => "failed",
        }
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProcessState {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "filling" => Ok(ProcessState::Filling),
            "sending" => Ok(ProcessState::Sending),
            "failed" => Ok(ProcessState::Failed),
            other => Err(ConfigurationError::UnknownProcessState(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub input: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    pub valid: bool,
    pub process_state: ProcessState,
    pub fields: FormFields,
    /// Translation key of the current validation message, if any.
    pub error: Option<String>,
}

/// A followed feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub id: SourceId,
    pub title: String,
    pub description: String,
    /// Feed URL; unique across all sources.
    pub link: String,
    pub last_polled_at: DateTime<Utc>,
}

/// One discovered item belonging to a [`Source`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: PostId,
    pub source_id: SourceId,
    pub title: String,
    pub description: String,
    pub link: String,
    pub published: Option<DateTime<Utc>>,
    /// Read is terminal: once `false` it never becomes `true` again.
    pub unread: bool,
}

/// Posts discovered for one source by a single poll cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    pub source_id: SourceId,
    pub new_posts: Vec<Post>,
}

/// A failure that happened outside the core (fetch, parse, network).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutOfBandError {
    pub name: String,
    pub message: String,
}

impl OutOfBandError {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub form: Form,
    pub sources: Vec<Source>,
    pub active_source_id: Option<SourceId>,
    pub posts: Vec<Post>,
    pub language: String,
    /// Transient: set by a poll delivery and cleared once aggregated.
    pub last_update: Option<Update>,
}

impl AppState {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            form: Form::default(),
            sources: Vec::new(),
            active_source_id: None,
            posts: Vec::new(),
            language: language.into(),
            last_update: None,
        }
    }

    pub fn source(&self, id: &str) -> Option<&Source> {
        self.sources.iter().find(|s| s.id == id)
    }

    pub fn post(&self, id: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    pub fn is_active(&self, source_id: &str) -> bool {
        self.active_source_id.as_deref() == Some(source_id)
    }

    /// Posts of the active source, in collection order.
    pub fn active_posts(&self) -> impl Iterator<Item = &Post> {
        let active = self.active_source_id.as_deref();
        self.posts
            .iter()
            .filter(move |p| Some(p.source_id.as_str()) == active)
    }

    pub fn has_link(&self, link: &str) -> bool {
        self.sources.iter().any(|s| s.link == link)
    }
}
