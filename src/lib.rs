//! # Logman
//!
//! A structured, color-aware logging library: messages tagged with a
//! severity level are routed to zero or more sinks, rendered through a
//! configurable field pipeline, optionally colorized by value type or by
//! severity.
//!
//! ## Features
//!
//! - **Per-level routing**: every level owns its writer→formatter map
//! - **Value tokenizer**: arbitrary values render as typed, colorable tokens
//! - **256-color schemes**: per-type and per-severity palette indices
//! - **Graceful degradation**: writer and render failures never abort
//!   sibling writers

pub mod colorizer;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::colorizer::{ColorKey, ColorRole, ColorScheme, Colorize, Value};
    pub use crate::core::{
        ErrorStack, FieldRender, Formatter, Logman, LogmanBuilder, LogmanError, LoggingLevel,
        MemorySink, Message, Result,
    };
}

pub use colorizer::{tokenize, ColorKey, ColorRole, ColorScheme, Colorize, Token, Value};
pub use core::{
    default_levels, ErrorStack, FieldRender, Formatter, Logman, LogmanBuilder, LogmanError,
    LoggingLevel, MemorySink, Message, RenderContext, Result, STDERR, STDOUT,
};
