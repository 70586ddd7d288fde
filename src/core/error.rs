//! Error types for the logging pipeline

use std::fmt;

pub type Result<T> = std::result::Result<T, LogmanError>;

#[derive(Debug, thiserror::Error)]
pub enum LogmanError {
    /// IO error from a sink write
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Timestamp field could not be parsed
    #[error("invalid time field: {0}")]
    TimeParse(#[from] chrono::ParseError),

    /// A render strategy was asked for a field the message does not carry
    #[error("no field with key '{field}'")]
    NoField { field: String },

    /// A dispatch target is not in the configured level set
    #[error("level '{name}' is not configured")]
    LevelNotConfigured { name: String },

    /// Post-setup control referenced a level that does not exist
    #[error("logman has no level '{name}'")]
    UnknownLevel { name: String },

    /// Post-setup control referenced a writer the level does not bind
    #[error("level '{level}' has no writer '{writer}'")]
    NoWriter { level: String, writer: String },

    /// A writer key could not be resolved to an open sink
    #[error("failed to open writer '{key}'")]
    WriterOpen { key: String },

    /// Ordered collection of failures from a multi-writer dispatch
    #[error(transparent)]
    Aggregate(#[from] ErrorStack),
}

impl LogmanError {
    /// Create a missing-field render error
    pub fn no_field(field: impl Into<String>) -> Self {
        LogmanError::NoField {
            field: field.into(),
        }
    }

    /// Create a not-configured dispatch error
    pub fn level_not_configured(name: impl Into<String>) -> Self {
        LogmanError::LevelNotConfigured { name: name.into() }
    }

    /// Create an unknown-level configuration error
    pub fn unknown_level(name: impl Into<String>) -> Self {
        LogmanError::UnknownLevel { name: name.into() }
    }

    /// Create an unknown-writer configuration error
    pub fn no_writer(level: impl Into<String>, writer: impl Into<String>) -> Self {
        LogmanError::NoWriter {
            level: level.into(),
            writer: writer.into(),
        }
    }

    /// Create a writer-open error
    pub fn writer_open(key: impl Into<String>) -> Self {
        LogmanError::WriterOpen { key: key.into() }
    }

    /// Join collected errors under a context line. Returns `None` when the
    /// collection is empty, so a clean dispatch stays `Ok`.
    pub fn join(context: impl Into<String>, causes: Vec<LogmanError>) -> Option<Self> {
        if causes.is_empty() {
            return None;
        }
        Some(LogmanError::Aggregate(ErrorStack {
            context: context.into(),
            causes,
        }))
    }

    /// The underlying causes when this is an aggregate, empty otherwise.
    pub fn causes(&self) -> &[LogmanError] {
        match self {
            LogmanError::Aggregate(stack) => &stack.causes,
            _ => &[],
        }
    }
}

/// An ordered list of failures joined under one context line.
///
/// `Display` renders the context followed by one cause per line, matching
/// the historical human-readable joined form; `causes()` exposes the list
/// for programmatic inspection.
#[derive(Debug)]
pub struct ErrorStack {
    context: String,
    causes: Vec<LogmanError>,
}

impl ErrorStack {
    pub fn causes(&self) -> &[LogmanError] {
        &self.causes
    }
}

impl fmt::Display for ErrorStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.context)?;
        for cause in &self.causes {
            write!(f, "\n{}", cause)?;
        }
        Ok(())
    }
}

impl std::error::Error for ErrorStack {}
