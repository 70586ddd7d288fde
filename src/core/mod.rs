//! Core message, level, formatting and dispatch types

pub mod error;
pub mod formatter;
pub mod level;
pub mod logman;
pub mod message;
pub mod writer;

pub use error::{ErrorStack, LogmanError, Result};
pub use formatter::{
    FieldRender, Formatter, RenderContext, REQUEST_FULL, REQUEST_MEDIUM, REQUEST_MESSAGE_ONLY,
    REQUEST_SHORT_REPORT, REQUEST_SHORT_SINCE, REQUEST_SHORT_TIME,
};
pub use level::{default_levels, LoggingLevel};
pub use logman::{Logman, LogmanBuilder};
pub use message::Message;
pub use writer::{MemorySink, STDERR, STDOUT};
