//! Logging configuration and message dispatch
//!
//! `Logman` is the explicit configuration object: the level table, the
//! minimum importance, the registered sinks and the start timestamp.
//! Dispatch routes a message through every requested level's
//! writer→formatter pairs, collecting per-writer failures without
//! aborting the siblings.
//!
//! Concurrent dispatch from multiple threads is not coordinated beyond the
//! level-table lock; callers needing a stable interleaving must serialize
//! access themselves.

use crate::colorizer::{style, Colorize, Value};
use crate::core::error::{LogmanError, Result};
use crate::core::formatter::Formatter;
use crate::core::level::{
    default_levels, LoggingLevel, DEBUG, ERROR, FATAL, IMPORTANCE_ALL, IMPORTANCE_NONE, INFO,
    PING, TRACE, WARN,
};
use crate::core::message::{Message, KEY_FILE, KEY_LEVEL, KEY_LINE, KEY_TIME};
use crate::core::writer::{resolve_writer, MemorySink, STDERR, STDOUT};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::io::Write;
use std::panic::Location;
use std::sync::Arc;

pub struct Logman {
    app_name: String,
    min_importance: i32,
    levels: RwLock<HashMap<String, LoggingLevel>>,
    sinks: HashMap<String, MemorySink>,
    started: DateTime<Utc>,
}

impl Logman {
    /// The default configuration: standard levels, everything enabled,
    /// no colorizer.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> LogmanBuilder {
        LogmanBuilder::new()
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn started(&self) -> DateTime<Utc> {
        self.started
    }

    /// Dispatch a message to the named levels.
    ///
    /// Unknown level names are recorded as errors and skipped; levels below
    /// the minimum importance are skipped silently. Per-writer failures are
    /// collected into one aggregate error, never aborting sibling writers.
    /// If any written level demands termination, the process exits with
    /// status 1 after every write in the batch was attempted.
    #[track_caller]
    pub fn process_message(&self, msg: &mut Message, levels: &[&str]) -> Result<()> {
        self.dispatch(msg, levels, Location::caller())
    }

    fn dispatch(
        &self,
        msg: &mut Message,
        level_names: &[&str],
        caller: &'static Location<'static>,
    ) -> Result<()> {
        let mut stack = Vec::new();
        let mut fatal_called = false;
        {
            let levels = self.levels.read();
            for name in level_names {
                let Some(lvl) = levels.get(*name) else {
                    stack.push(LogmanError::level_not_configured(*name));
                    continue;
                };
                if lvl.importance() < self.min_importance {
                    continue;
                }
                msg.set_field(KEY_LEVEL, Value::from(lvl.tag()));
                if lvl.caller_info() {
                    if msg.value(KEY_FILE).is_none() {
                        msg.set_field(KEY_FILE, Value::from(caller.file()));
                    }
                    if msg.value(KEY_LINE).is_none() {
                        msg.set_field(KEY_LINE, Value::from(caller.line()));
                    }
                    // callerFuncName stays caller-supplied; renders treat
                    // it as optional.
                }
                if let Err(err) = self.write_level(lvl, msg) {
                    stack.push(err);
                }
                if lvl.exit_when_done() {
                    fatal_called = true;
                }
            }
        }
        let aggregated = LogmanError::join("processing message failed", stack);
        if fatal_called {
            // Termination runs even when sibling writers failed, and only
            // after every write in the batch was attempted.
            std::process::exit(1);
        }
        match aggregated {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn write_level(&self, lvl: &LoggingLevel, msg: &Message) -> Result<()> {
        let mut stack = Vec::new();
        let msg_time = msg.value(KEY_TIME).map(Value::to_string).unwrap_or_default();
        for (key, formatter) in lvl.writers() {
            let mut writer =
                match resolve_writer(key, &self.sinks, &msg_time, &self.app_name, lvl.name()) {
                    Ok(writer) => writer,
                    Err(err) => {
                        stack.push(err);
                        continue;
                    }
                };
            let text = formatter.format(msg, true, &self.app_name, self.started);
            let body = text.strip_suffix('\n').unwrap_or(&text);
            let line = format!("{}\n", body);
            if let Err(err) = writer.write_all(line.as_bytes()) {
                stack.push(err.into());
            }
        }
        match LogmanError::join("writing message failed", stack) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    // Post-setup control. Configuration errors surface immediately.

    /// Bind (or replace) a writer on an existing level.
    pub fn set_level_writer(&self, level: &str, writer: &str, formatter: Formatter) -> Result<()> {
        let mut levels = self.levels.write();
        let lvl = levels
            .get_mut(level)
            .ok_or_else(|| LogmanError::unknown_level(level))?;
        lvl.writers_mut().insert(writer.to_string(), formatter);
        Ok(())
    }

    /// Drop every writer from the named levels.
    pub fn reset_writers(&self, level_names: &[&str]) -> Result<()> {
        let mut levels = self.levels.write();
        for name in level_names {
            let lvl = levels
                .get_mut(*name)
                .ok_or_else(|| LogmanError::unknown_level(*name))?;
            lvl.writers_mut().clear();
        }
        Ok(())
    }

    /// Remove one writer binding from a level.
    pub fn remove_writer(&self, level: &str, writer: &str) -> Result<()> {
        let mut levels = self.levels.write();
        let lvl = levels
            .get_mut(level)
            .ok_or_else(|| LogmanError::unknown_level(level))?;
        if lvl.writers_mut().remove(writer).is_none() {
            return Err(LogmanError::no_writer(level, writer));
        }
        Ok(())
    }

    // Convenience wrappers over process_message.

    /// Format and dispatch at INFO.
    #[track_caller]
    pub fn printf(&self, format: &str, args: &[Value]) -> Result<()> {
        self.dispatch(
            &mut Message::new(format, args.to_vec()),
            &[INFO],
            Location::caller(),
        )
    }

    /// Dispatch the space-joined arguments at INFO.
    #[track_caller]
    pub fn println(&self, args: &[Value]) -> Result<()> {
        let format = vec!["%v"; args.len()].join(" ");
        self.dispatch(
            &mut Message::new(format, args.to_vec()),
            &[INFO],
            Location::caller(),
        )
    }

    #[track_caller]
    pub fn info(&self, format: &str, args: &[Value]) -> Result<()> {
        self.dispatch(
            &mut Message::new(format, args.to_vec()),
            &[INFO],
            Location::caller(),
        )
    }

    #[track_caller]
    pub fn warn(&self, format: &str, args: &[Value]) -> Result<()> {
        self.dispatch(
            &mut Message::new(format, args.to_vec()),
            &[WARN],
            Location::caller(),
        )
    }

    /// Format and dispatch at ERROR.
    #[track_caller]
    pub fn errorf(&self, format: &str, args: &[Value]) -> Result<()> {
        self.dispatch(
            &mut Message::new(format, args.to_vec()),
            &[ERROR],
            Location::caller(),
        )
    }

    /// Dispatch an existing error's text at ERROR.
    #[track_caller]
    pub fn error(&self, err: impl std::fmt::Display) -> Result<()> {
        self.dispatch(
            &mut Message::new(err.to_string(), vec![]),
            &[ERROR],
            Location::caller(),
        )
    }

    /// Format and dispatch at FATAL. With the default fatal level the
    /// process terminates after the batch is written.
    #[track_caller]
    pub fn fatalf(&self, format: &str, args: &[Value]) -> Result<()> {
        self.dispatch(
            &mut Message::new(format, args.to_vec()),
            &[FATAL],
            Location::caller(),
        )
    }

    /// Dispatch a prepared message at DEBUG. Comments go to stderr even
    /// when the message itself is filtered out.
    #[track_caller]
    pub fn debug(&self, mut msg: Message, comments: &[&str]) -> Result<()> {
        for comment in comments {
            eprintln!("#{}", style::paint_fg(253, comment));
        }
        self.dispatch(&mut msg, &[DEBUG], Location::caller())
    }

    /// Dispatch a prepared message at TRACE. Comments go to stderr even
    /// when the message itself is filtered out.
    #[track_caller]
    pub fn trace(&self, mut msg: Message, comments: &[&str]) -> Result<()> {
        for comment in comments {
            eprintln!("#{}", style::paint_fg(253, comment));
        }
        self.dispatch(&mut msg, &[TRACE], Location::caller())
    }

    /// Dispatch an empty message at PING. Processing failures are printed
    /// to stderr instead of returned.
    #[track_caller]
    pub fn ping(&self, comments: &[&str]) -> Result<()> {
        let mut msg = Message::new("", vec![]);
        if let Err(err) = self.dispatch(&mut msg, &[PING], Location::caller()) {
            eprintln!("ping error: {}", err);
        }
        for comment in comments {
            eprintln!("{}", style::paint_fg(239, comment));
        }
        Ok(())
    }
}

impl Default for Logman {
    fn default() -> Self {
        Self::new()
    }
}

pub struct LogmanBuilder {
    app_name: String,
    min_importance: i32,
    levels: Vec<LoggingLevel>,
    colorizer: Option<Arc<dyn Colorize>>,
    global_writers: Vec<(String, Formatter)>,
    sinks: HashMap<String, MemorySink>,
}

impl LogmanBuilder {
    fn new() -> Self {
        Self {
            app_name: String::new(),
            min_importance: IMPORTANCE_ALL,
            levels: Vec::new(),
            colorizer: None,
            global_writers: Vec::new(),
            sinks: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = name.into();
        self
    }

    /// Minimum importance a level must reach to be delivered. Clamped into
    /// the [ALL, NONE] sentinel range.
    #[must_use]
    pub fn with_min_importance(mut self, importance: i32) -> Self {
        self.min_importance = importance.clamp(IMPORTANCE_ALL, IMPORTANCE_NONE);
        self
    }

    /// Add custom levels. A level sharing a standard name overrides the
    /// default definition.
    #[must_use]
    pub fn with_levels<I>(mut self, levels: I) -> Self
    where
        I: IntoIterator<Item = LoggingLevel>,
    {
        self.levels.extend(levels);
        self
    }

    /// Color scheme shared by every stdout/stderr formatter that has no
    /// custom colorizer of its own.
    #[must_use]
    pub fn with_colorizer(mut self, colorizer: Arc<dyn Colorize>) -> Self {
        self.colorizer = Some(colorizer);
        self
    }

    /// Bind a writer on every level that does not already use the key.
    /// Useful to set up one logfile for everything.
    #[must_use]
    pub fn with_global_writer(mut self, key: impl Into<String>, formatter: Formatter) -> Self {
        self.global_writers.push((key.into(), formatter));
        self
    }

    /// Bind a JSON writer on every level, one file per message under the
    /// given directory.
    #[must_use]
    pub fn with_json_writer(mut self, dir: impl Into<String>) -> Self {
        self.global_writers.push((dir.into(), Formatter::json()));
        self
    }

    /// Register a named in-memory sink usable as a writer key.
    #[must_use]
    pub fn with_sink(mut self, name: impl Into<String>, sink: MemorySink) -> Self {
        self.sinks.insert(name.into(), sink);
        self
    }

    pub fn build(self) -> Logman {
        let mut levels: HashMap<String, LoggingLevel> = default_levels()
            .into_iter()
            .map(|lvl| (lvl.name().to_string(), lvl))
            .collect();
        for lvl in self.levels {
            levels.insert(lvl.name().to_string(), lvl);
        }

        // Console formatters pick up the shared colorizer unless they
        // carry a custom one; global writers added below keep their own.
        if let Some(colorizer) = &self.colorizer {
            for lvl in levels.values_mut() {
                for (key, formatter) in lvl.writers_mut().iter_mut() {
                    if key == STDOUT || key == STDERR {
                        formatter.set_shared_colorizer(Arc::clone(colorizer));
                    }
                }
            }
        }

        for (key, formatter) in &self.global_writers {
            for lvl in levels.values_mut() {
                if !lvl.writers().contains_key(key) {
                    lvl.writers_mut().insert(key.clone(), formatter.clone());
                }
            }
        }

        Logman {
            app_name: self.app_name,
            min_importance: self.min_importance,
            levels: RwLock::new(levels),
            sinks: self.sinks,
            started: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::level::{IMPORTANCE_ERROR, IMPORTANCE_INFO};

    fn sink_logman(sink: &MemorySink) -> Logman {
        let level = LoggingLevel::new("capture")
            .with_importance(IMPORTANCE_INFO)
            .with_writer("mem", Formatter::new());
        Logman::builder()
            .with_app_name("test")
            .with_levels([level])
            .with_sink("mem", sink.clone())
            .build()
    }

    #[test]
    fn test_dispatch_writes_to_sink() {
        let sink = MemorySink::new();
        let lm = sink_logman(&sink);
        let mut msg = Message::new("x=%v", vec![Value::from(5i64)]);
        lm.process_message(&mut msg, &["capture"]).expect("dispatch");

        let out = sink.contents();
        assert!(out.contains("x=5"));
        assert!(out.ends_with('\n'));
        // Dispatch injected the severity tag.
        assert_eq!(msg.value(KEY_LEVEL), Some(&Value::from("capture")));
    }

    #[test]
    fn test_below_minimum_is_silent() {
        let sink = MemorySink::new();
        let level = LoggingLevel::new("quiet")
            .with_importance(IMPORTANCE_INFO)
            .with_writer("mem", Formatter::new());
        let lm = Logman::builder()
            .with_levels([level])
            .with_sink("mem", sink.clone())
            .with_min_importance(IMPORTANCE_ERROR)
            .build();

        let mut msg = Message::new("dropped", vec![]);
        lm.process_message(&mut msg, &["quiet"]).expect("no error");
        assert_eq!(sink.contents(), "");
    }

    #[test]
    fn test_unknown_level_is_an_error() {
        let lm = Logman::new();
        let mut msg = Message::new("m", vec![]);
        let err = lm
            .process_message(&mut msg, &["no-such-level"])
            .expect_err("unknown level");
        assert_eq!(err.causes().len(), 1);
        assert!(matches!(
            err.causes()[0],
            LogmanError::LevelNotConfigured { .. }
        ));
    }

    #[test]
    fn test_min_importance_clamped() {
        let lm = Logman::builder().with_min_importance(500).build();
        assert_eq!(lm.min_importance, IMPORTANCE_NONE);
        let lm = Logman::builder().with_min_importance(-3).build();
        assert_eq!(lm.min_importance, IMPORTANCE_ALL);
    }

    #[test]
    fn test_caller_info_injected_when_requested() {
        let sink = MemorySink::new();
        let level = LoggingLevel::new("traced")
            .with_caller_info(true)
            .with_writer("mem", Formatter::new());
        let lm = Logman::builder()
            .with_levels([level])
            .with_sink("mem", sink.clone())
            .build();

        let mut msg = Message::new("m", vec![]);
        lm.process_message(&mut msg, &["traced"]).expect("dispatch");
        assert!(msg.value(KEY_FILE).is_some());
        assert!(msg.value(KEY_LINE).is_some());
    }

    #[test]
    fn test_caller_info_not_overwritten() {
        let level = LoggingLevel::new("traced")
            .with_caller_info(true)
            .with_writer("mem", Formatter::new());
        let lm = Logman::builder()
            .with_levels([level])
            .with_sink("mem", MemorySink::new())
            .build();

        let mut msg = Message::new("m", vec![]);
        msg.set_field(KEY_FILE, Value::from("preset.rs"));
        lm.process_message(&mut msg, &["traced"]).expect("dispatch");
        assert_eq!(msg.value(KEY_FILE), Some(&Value::from("preset.rs")));
    }

    #[test]
    fn test_global_writer_skips_existing_binding() {
        let own = MemorySink::new();
        let shared = MemorySink::new();
        let level = LoggingLevel::new("custom")
            .with_importance(IMPORTANCE_INFO)
            .with_writer("shared", Formatter::new());
        let lm = Logman::builder()
            .with_levels([level])
            .with_sink("own", own.clone())
            .with_sink("shared", shared.clone())
            .with_global_writer("shared", Formatter::json())
            .with_global_writer("own", Formatter::new())
            .build();

        let mut msg = Message::new("hello", vec![]);
        lm.process_message(&mut msg, &["custom"]).expect("dispatch");

        // The level's own binding for "shared" stayed (plain text, not JSON).
        assert!(!shared.contents().contains("{\"app\""));
        assert!(own.contents().contains("hello"));
    }

    #[test]
    fn test_post_setup_control() {
        let sink = MemorySink::new();
        let lm = Logman::builder().with_sink("mem", sink.clone()).build();

        assert!(matches!(
            lm.set_level_writer("ghost", "mem", Formatter::new()),
            Err(LogmanError::UnknownLevel { .. })
        ));
        assert!(matches!(
            lm.remove_writer(INFO, "mem"),
            Err(LogmanError::NoWriter { .. })
        ));

        lm.set_level_writer(INFO, "mem", Formatter::new())
            .expect("bind writer");
        lm.info("routed", &[]).expect("dispatch");
        assert!(sink.contents().contains("routed"));

        lm.remove_writer(INFO, "mem").expect("unbind");
        lm.reset_writers(&[INFO]).expect("reset");
        sink.clear();
        lm.info("gone", &[]).expect("dispatch");
        assert_eq!(sink.contents(), "");
    }

    #[test]
    fn test_println_joins_args() {
        let sink = MemorySink::new();
        let lm = Logman::builder().with_sink("mem", sink.clone()).build();
        lm.set_level_writer(INFO, "mem", Formatter::new())
            .expect("bind writer");

        lm.println(&[Value::from("a"), Value::from(1i64)])
            .expect("dispatch");
        assert!(sink.contents().contains("a 1"));
    }
}
