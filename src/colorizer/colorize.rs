//! Colorized value rendering
//!
//! Two entry points over a [`ColorScheme`]: type-driven coloring, where
//! every token of the tokenized value resolves its own color pair from its
//! type tag, and key-forced coloring, where one explicit color pair styles
//! the value's plain textual form.

use super::scheme::{ColorKey, ColorRole, ColorScheme};
use super::style;
use super::token::tokenize;
use super::value::Value;

/// Colorized rendering of arbitrary values.
pub trait Colorize: Send + Sync {
    /// Render `value` with per-token colors inferred from each token's
    /// runtime type tag.
    fn colorize_by_type(&self, value: &Value) -> String;

    /// Render `value` once, styled with the color pair named by `keys`.
    /// Missing roles fall back to the `base` key; keys whose role is
    /// neither foreground nor background are ignored.
    fn colorize_by_keys(&self, value: &Value, keys: &[ColorKey]) -> String;
}

impl Colorize for ColorScheme {
    fn colorize_by_type(&self, value: &Value) -> String {
        let mut tokens = tokenize(value);
        let last = tokens.len().saturating_sub(1);
        let mut out = String::new();
        for (i, tok) in tokens.iter_mut().enumerate() {
            if i == last {
                tok.text = tok.text.trim_end().to_string();
            }
            tok.text = tok.text.replace("interface {}", "interface{}");
            tok.fg = self.get(&ColorKey::fg(tok.tag.as_str()));
            tok.bg = self.get(&ColorKey::bg(tok.tag.as_str()));
            out.push_str(&style::paint(tok.fg, tok.bg, &tok.text));
        }
        out
    }

    fn colorize_by_keys(&self, value: &Value, keys: &[ColorKey]) -> String {
        let mut fg_key = ColorKey::fg("base");
        let mut bg_key = ColorKey::bg("base");
        for key in keys {
            match key.role() {
                ColorRole::Foreground => fg_key = ColorKey::fg(key.name()),
                ColorRole::Background => bg_key = ColorKey::bg(key.name()),
                ColorRole::Field => continue,
            }
        }
        style::paint(self.get(&fg_key), self.get(&bg_key), &value.to_string())
    }
}
