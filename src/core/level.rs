//! Logging level definitions
//!
//! A `LoggingLevel` describes one severity: its name and display tag, the
//! numeric importance used for filtering, whether caller information is
//! attached, whether the process terminates once the batch is written, and
//! the writer→formatter map its messages are routed through.

use crate::core::formatter::{Formatter, REQUEST_SHORT_TIME};
use crate::core::writer::{STDERR, STDOUT};
use std::collections::HashMap;

// Standard level names.
pub const FATAL: &str = "fatal";
pub const ERROR: &str = "error";
pub const WARN: &str = "warn";
pub const INFO: &str = "info";
pub const DEBUG: &str = "debug";
pub const TRACE: &str = "trace";
pub const PING: &str = "ping";

pub const STD_LEVELS: &[&str] = &[TRACE, DEBUG, INFO, WARN, ERROR, FATAL];

// Importance bounds: a message is delivered when its level's importance is
// at or above the configured minimum. NONE and ALL are the disable/enable
// sentinels.
pub const IMPORTANCE_NONE: i32 = 100;
pub const IMPORTANCE_FATAL: i32 = 99;
pub const IMPORTANCE_ERROR: i32 = 80;
pub const IMPORTANCE_WARN: i32 = 70;
pub const IMPORTANCE_INFO: i32 = 50;
pub const IMPORTANCE_DEBUG: i32 = 30;
pub const IMPORTANCE_TRACE: i32 = 10;
pub const IMPORTANCE_PING: i32 = 1;
pub const IMPORTANCE_ALL: i32 = 0;

#[derive(Clone)]
pub struct LoggingLevel {
    name: String,
    tag: String,
    importance: i32,
    caller_info: bool,
    exit_when_done: bool,
    writers: HashMap<String, Formatter>,
}

impl LoggingLevel {
    /// A bare level: tag equals the name, INFO importance, no caller info,
    /// no termination, no writers.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            tag: name.clone(),
            name,
            importance: IMPORTANCE_INFO,
            caller_info: false,
            exit_when_done: false,
            writers: HashMap::new(),
        }
    }

    /// Override the display tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    #[must_use]
    pub fn with_importance(mut self, importance: i32) -> Self {
        self.importance = importance;
        self
    }

    #[must_use]
    pub fn with_caller_info(mut self, caller_info: bool) -> Self {
        self.caller_info = caller_info;
        self
    }

    /// Terminate the process once every writer of the batch was attempted.
    #[must_use]
    pub fn with_exit_when_done(mut self, exit: bool) -> Self {
        self.exit_when_done = exit;
        self
    }

    /// Bind a writer key to a formatter. Writer keys are unique within a
    /// level; binding an existing key replaces its formatter.
    #[must_use]
    pub fn with_writer(mut self, key: impl Into<String>, formatter: Formatter) -> Self {
        self.writers.insert(key.into(), formatter);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn importance(&self) -> i32 {
        self.importance
    }

    pub fn caller_info(&self) -> bool {
        self.caller_info
    }

    pub fn exit_when_done(&self) -> bool {
        self.exit_when_done
    }

    pub fn writers(&self) -> &HashMap<String, Formatter> {
        &self.writers
    }

    pub(crate) fn writers_mut(&mut self) -> &mut HashMap<String, Formatter> {
        &mut self.writers
    }

    // Standard severities.

    pub fn fatal() -> Self {
        Self::new(FATAL)
            .with_importance(IMPORTANCE_FATAL)
            .with_caller_info(true)
            .with_exit_when_done(true)
            .with_writer(
                STDOUT,
                Formatter::new().with_requested_fields(REQUEST_SHORT_TIME),
            )
    }

    pub fn error() -> Self {
        Self::new(ERROR)
            .with_importance(IMPORTANCE_ERROR)
            .with_caller_info(true)
            .with_writer(
                STDOUT,
                Formatter::new().with_requested_fields(REQUEST_SHORT_TIME),
            )
    }

    pub fn warn() -> Self {
        Self::new(WARN)
            .with_importance(IMPORTANCE_WARN)
            .with_writer(
                STDERR,
                Formatter::new().with_requested_fields(REQUEST_SHORT_TIME),
            )
    }

    pub fn info() -> Self {
        Self::new(INFO)
            .with_importance(IMPORTANCE_INFO)
            .with_writer(
                STDERR,
                Formatter::new().with_requested_fields(REQUEST_SHORT_TIME),
            )
    }

    pub fn debug() -> Self {
        Self::new(DEBUG)
            .with_importance(IMPORTANCE_DEBUG)
            .with_writer(
                STDERR,
                Formatter::new().with_requested_fields(REQUEST_SHORT_TIME),
            )
    }

    pub fn trace() -> Self {
        Self::new(TRACE)
            .with_importance(IMPORTANCE_TRACE)
            .with_caller_info(true)
            .with_writer(
                STDERR,
                Formatter::new().with_requested_fields(REQUEST_SHORT_TIME),
            )
    }

    /// The ping level carries no writers of its own.
    pub fn ping() -> Self {
        Self::new(PING)
            .with_importance(IMPORTANCE_PING)
            .with_caller_info(true)
    }
}

/// The default level set. Ping is constructible but not part of it.
pub fn default_levels() -> Vec<LoggingLevel> {
    vec![
        LoggingLevel::fatal(),
        LoggingLevel::error(),
        LoggingLevel::warn(),
        LoggingLevel::info(),
        LoggingLevel::debug(),
        LoggingLevel::trace(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_importance_total_order() {
        assert!(IMPORTANCE_FATAL > IMPORTANCE_ERROR);
        assert!(IMPORTANCE_ERROR > IMPORTANCE_WARN);
        assert!(IMPORTANCE_WARN > IMPORTANCE_INFO);
        assert!(IMPORTANCE_INFO > IMPORTANCE_DEBUG);
        assert!(IMPORTANCE_DEBUG > IMPORTANCE_TRACE);
        assert!(IMPORTANCE_TRACE > IMPORTANCE_PING);
        assert!(IMPORTANCE_NONE > IMPORTANCE_FATAL);
        assert!(IMPORTANCE_PING > IMPORTANCE_ALL);
    }

    #[test]
    fn test_new_level_defaults() {
        let lvl = LoggingLevel::new("audit");
        assert_eq!(lvl.name(), "audit");
        assert_eq!(lvl.tag(), "audit");
        assert_eq!(lvl.importance(), IMPORTANCE_INFO);
        assert!(!lvl.caller_info());
        assert!(!lvl.exit_when_done());
        assert!(lvl.writers().is_empty());
    }

    #[test]
    fn test_builder_overrides() {
        let lvl = LoggingLevel::new("audit")
            .with_tag("AUDIT")
            .with_importance(85)
            .with_caller_info(true);
        assert_eq!(lvl.tag(), "AUDIT");
        assert_eq!(lvl.importance(), 85);
        assert!(lvl.caller_info());
    }

    #[test]
    fn test_writer_keys_unique() {
        let lvl = LoggingLevel::new("audit")
            .with_writer("out.log", Formatter::new())
            .with_writer("out.log", Formatter::json());
        assert_eq!(lvl.writers().len(), 1);
    }

    #[test]
    fn test_default_levels_exclude_ping() {
        let levels = default_levels();
        assert_eq!(levels.len(), 6);
        assert!(levels.iter().all(|l| l.name() != PING));
        let fatal = levels.iter().find(|l| l.name() == FATAL).expect("fatal");
        assert!(fatal.exit_when_done());
        assert!(fatal.caller_info());
    }
}
