//! Color key table
//!
//! Maps `(role, name)` keys to 256-value palette indices. The table is
//! sparse: only explicitly configured keys and the built-in default set
//! exist; everything else falls back to fixed role defaults.

use std::collections::HashMap;

/// Which half of a color pair a key addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorRole {
    Foreground,
    Background,
    /// Whole-field coloring. Reserved; no built-in keys use it.
    Field,
}

/// Lookup key into a [`ColorScheme`]: a role plus a type or severity tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColorKey {
    role: ColorRole,
    name: String,
}

impl ColorKey {
    pub fn new(role: ColorRole, name: impl Into<String>) -> Self {
        Self {
            role,
            name: name.into(),
        }
    }

    pub fn fg(name: impl Into<String>) -> Self {
        Self::new(ColorRole::Foreground, name)
    }

    pub fn bg(name: impl Into<String>) -> Self {
        Self::new(ColorRole::Background, name)
    }

    pub fn field(name: impl Into<String>) -> Self {
        Self::new(ColorRole::Field, name)
    }

    pub fn role(&self) -> ColorRole {
        self.role
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Sparse mapping from color keys to 256-palette indices.
#[derive(Debug, Clone, Default)]
pub struct ColorScheme {
    color256: HashMap<ColorKey, u8>,
}

impl ColorScheme {
    /// An empty table: every lookup falls back to the role default.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in table covering every primitive and structural type tag,
    /// the severity tags, the caller tag and the `base` pair.
    pub fn default_scheme() -> Self {
        let mut scheme = Self::new();

        scheme.set_color(ColorKey::fg("base"), 7);
        scheme.set_color(ColorKey::bg("base"), 0);

        scheme.set_color(ColorKey::fg("string"), 208);
        scheme.set_color(ColorKey::fg("bool"), 12);
        for tag in ["i8", "i16", "i32", "i64", "u8", "u16", "u32", "u64"] {
            scheme.set_color(ColorKey::fg(tag), 120);
        }
        scheme.set_color(ColorKey::fg("f32"), 9);
        scheme.set_color(ColorKey::fg("f64"), 9);

        scheme.set_color(ColorKey::fg("struct"), 221);
        scheme.set_color(ColorKey::fg("slice"), 14);
        scheme.set_color(ColorKey::fg("interface"), 2);
        scheme.set_color(ColorKey::fg("nil"), 12);
        scheme.set_color(ColorKey::fg("map"), 14);
        scheme.set_color(ColorKey::fg("ptr"), 221);
        scheme.set_color(ColorKey::fg("func"), 36);
        scheme.set_color(ColorKey::fg("chan"), 2);

        scheme.set_color(ColorKey::fg("fatal"), 88);
        scheme.set_color(ColorKey::fg("error"), 196);
        scheme.set_color(ColorKey::fg("warn"), 184);
        scheme.set_color(ColorKey::fg("info"), 112);
        scheme.set_color(ColorKey::fg("debug"), 244);
        scheme.set_color(ColorKey::fg("trace"), 230);
        scheme.set_color(ColorKey::fg("ping"), 40);

        scheme.set_color(ColorKey::fg("caller"), 244);

        scheme
    }

    /// Merge a set of overrides into the table. Later entries win for the
    /// same key; unrelated keys are untouched.
    #[must_use]
    pub fn with_colors<I>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = (ColorKey, u8)>,
    {
        for (key, value) in colors {
            self.set_color(key, value);
        }
        self
    }

    /// Set or overwrite a single entry.
    pub fn set_color(&mut self, key: ColorKey, value: u8) {
        self.color256.insert(key, value);
    }

    /// Resolve a key to its palette index, falling back to the fixed role
    /// default when the key is not configured: 7 for foregrounds, 0 for
    /// backgrounds. Field-role keys have no meaningful default.
    pub fn get(&self, key: &ColorKey) -> u8 {
        if let Some(value) = self.color256.get(key) {
            return *value;
        }
        match key.role {
            ColorRole::Foreground => 7,
            ColorRole::Background => 0,
            ColorRole::Field => 10,
        }
    }
}
