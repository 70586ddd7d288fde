//! Logging macros for ergonomic message dispatch.
//!
//! The macros build a [`Message`](crate::Message) from a `%v` template and
//! dispatch it on a [`Logman`](crate::Logman) handle, converting every
//! argument through [`Value::from`](crate::Value).
//!
//! # Examples
//!
//! ```
//! use logman::{info, Logman};
//!
//! let lm = Logman::new();
//! info!(lm, "server listening on port %v", 8080).ok();
//! ```

/// Dispatch a `%v`-formatted message on an explicit level.
///
/// # Examples
///
/// ```
/// # use logman::Logman;
/// # let lm = Logman::new();
/// use logman::logf;
/// logf!(lm, logman::core::level::INFO, "status %v", "ready").ok();
/// ```
#[macro_export]
macro_rules! logf {
    ($logman:expr, $level:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        $logman.process_message(
            &mut $crate::Message::new($fmt, vec![$($crate::Value::from($arg)),*]),
            &[$level],
        )
    };
}

/// Dispatch an info-level message.
///
/// # Examples
///
/// ```
/// # use logman::Logman;
/// # let lm = Logman::new();
/// use logman::info;
/// info!(lm, "processed %v items", 100).ok();
/// ```
#[macro_export]
macro_rules! info {
    ($logman:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::logf!($logman, $crate::core::level::INFO, $fmt $(, $arg)*)
    };
}

/// Dispatch a warn-level message.
///
/// # Examples
///
/// ```
/// # use logman::Logman;
/// # let lm = Logman::new();
/// use logman::warn;
/// warn!(lm, "retry %v of %v", 3, 5).ok();
/// ```
#[macro_export]
macro_rules! warn {
    ($logman:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::logf!($logman, $crate::core::level::WARN, $fmt $(, $arg)*)
    };
}

/// Dispatch an error-level message.
///
/// # Examples
///
/// ```
/// # use logman::Logman;
/// # let lm = Logman::new();
/// use logman::errorf;
/// errorf!(lm, "connection to %v failed", "db:5432").ok();
/// ```
#[macro_export]
macro_rules! errorf {
    ($logman:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::logf!($logman, $crate::core::level::ERROR, $fmt $(, $arg)*)
    };
}

/// Dispatch a fatal-level message. With the default fatal level the
/// process terminates after the batch is written.
///
/// # Examples
///
/// ```no_run
/// # use logman::Logman;
/// # let lm = Logman::new();
/// use logman::fatalf;
/// fatalf!(lm, "unrecoverable: %v", "disk full").ok();
/// ```
#[macro_export]
macro_rules! fatalf {
    ($logman:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::logf!($logman, $crate::core::level::FATAL, $fmt $(, $arg)*)
    };
}

#[cfg(test)]
mod tests {
    use crate::core::formatter::Formatter;
    use crate::core::level::INFO;
    use crate::core::logman::Logman;
    use crate::core::writer::MemorySink;

    #[test]
    fn test_logf_macro_dispatches() {
        let sink = MemorySink::new();
        let lm = Logman::builder().with_sink("mem", sink.clone()).build();
        lm.set_level_writer(INFO, "mem", Formatter::new())
            .expect("bind writer");

        logf!(lm, INFO, "x=%v", 5).expect("dispatch");
        assert!(sink.contents().contains("x=5"));
    }

    #[test]
    fn test_level_macros_accept_mixed_args() {
        let sink = MemorySink::new();
        let lm = Logman::builder().with_sink("mem", sink.clone()).build();
        lm.set_level_writer(INFO, "mem", Formatter::new())
            .expect("bind writer");

        info!(lm, "%v %v %v", "a", 2, true).expect("dispatch");
        assert!(sink.contents().contains("a 2 true"));
    }
}
