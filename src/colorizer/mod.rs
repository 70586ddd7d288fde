//! Value tokenization and color schemes
//!
//! This module turns arbitrary [`Value`]s into flat token sequences and
//! renders them with 256-color terminal styling, either per-token by
//! runtime type or forced to a single severity color pair.

pub mod colorize;
pub mod scheme;
pub mod style;
pub mod token;
pub mod value;

pub use colorize::Colorize;
pub use scheme::{ColorKey, ColorRole, ColorScheme};
pub use token::{tokenize, Token};
pub use value::Value;
