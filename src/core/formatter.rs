//! Field formatting pipeline
//!
//! A `Formatter` resolves an ordered list of requested field names against a
//! message, one render strategy per field, and concatenates the results.
//! Unregistered fields degrade to `name=value`; a strategy failure aborts
//! the loop and returns the partial output with the error inlined; the
//! `json` pseudo-field short-circuits everything and renders the whole
//! message as one JSON object.

use crate::colorizer::{ColorKey, Colorize, Value};
use crate::core::error::{LogmanError, Result};
use crate::core::level::{DEBUG, ERROR, FATAL, TRACE};
use crate::core::message::{
    render_format, Message, KEY_CALLER_LONG, KEY_CALLER_SHORT, KEY_FILE, KEY_FUNC, KEY_JSON,
    KEY_LEVEL, KEY_LINE, KEY_MESSAGE, KEY_SINCE, KEY_TIME,
};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

// Requested-field presets.
pub const REQUEST_MESSAGE_ONLY: &[&str] = &[KEY_MESSAGE];
pub const REQUEST_SHORT_TIME: &[&str] = &[KEY_TIME, KEY_LEVEL, KEY_MESSAGE];
pub const REQUEST_SHORT_SINCE: &[&str] = &[KEY_SINCE, KEY_LEVEL, KEY_MESSAGE];
pub const REQUEST_SHORT_REPORT: &[&str] = &[KEY_SINCE, KEY_MESSAGE];
pub const REQUEST_MEDIUM: &[&str] = &[KEY_TIME, KEY_LEVEL, KEY_MESSAGE, KEY_CALLER_SHORT];
pub const REQUEST_FULL: &[&str] = &[KEY_TIME, KEY_SINCE, KEY_LEVEL, KEY_MESSAGE, KEY_CALLER_LONG];

/// Per-render context: the colorizer in effect (if any) and the
/// configuration-wide values renders need.
pub struct RenderContext<'a> {
    pub colors: Option<&'a dyn Colorize>,
    pub app_name: &'a str,
    pub started: DateTime<Utc>,
}

/// One render strategy per field name.
pub trait FieldRender: Send + Sync {
    fn render(&self, msg: &Message, ctx: &RenderContext<'_>) -> Result<String>;
}

fn display_or_nil(value: Option<&Value>) -> String {
    value
        .map(Value::to_string)
        .unwrap_or_else(|| "<nil>".to_string())
}

fn level_tag(msg: &Message) -> String {
    display_or_nil(msg.value(KEY_LEVEL))
}

#[derive(Clone)]
pub struct Formatter {
    requested: Vec<String>,
    renders: HashMap<String, Arc<dyn FieldRender>>,
    colorizer: Option<Arc<dyn Colorize>>,
    custom_colorizer: bool,
}

impl Formatter {
    /// Formatter with the built-in render strategies and the short
    /// since/level/message field list.
    pub fn new() -> Self {
        let mut renders: HashMap<String, Arc<dyn FieldRender>> = HashMap::new();
        renders.insert(KEY_TIME.to_string(), Arc::new(TimeRender));
        renders.insert(KEY_SINCE.to_string(), Arc::new(SinceRender));
        renders.insert(KEY_LEVEL.to_string(), Arc::new(LevelRender));
        renders.insert(KEY_MESSAGE.to_string(), Arc::new(MessageRender));
        renders.insert(KEY_CALLER_SHORT.to_string(), Arc::new(CallerShortRender));
        renders.insert(KEY_CALLER_LONG.to_string(), Arc::new(CallerLongRender));
        Self {
            requested: REQUEST_SHORT_SINCE.iter().map(|s| s.to_string()).collect(),
            renders,
            colorizer: None,
            custom_colorizer: false,
        }
    }

    /// Formatter rendering the whole message as one JSON object.
    pub fn json() -> Self {
        Self::new()
            .with_requested_fields(&[KEY_JSON])
            .with_render(KEY_JSON, JsonRender)
    }

    /// Replace the requested-field list.
    #[must_use]
    pub fn with_requested_fields(mut self, fields: &[&str]) -> Self {
        self.requested = fields.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Register or replace a render strategy for a field.
    #[must_use]
    pub fn with_render<R>(mut self, field: impl Into<String>, render: R) -> Self
    where
        R: FieldRender + 'static,
    {
        self.renders.insert(field.into(), Arc::new(render));
        self
    }

    /// Pin a formatter-local colorizer. A colorizer set here is never
    /// overwritten by the configuration-wide one during setup wiring.
    #[must_use]
    pub fn with_colorizer(mut self, colorizer: Arc<dyn Colorize>) -> Self {
        self.colorizer = Some(colorizer);
        self.custom_colorizer = true;
        self
    }

    pub(crate) fn set_shared_colorizer(&mut self, colorizer: Arc<dyn Colorize>) {
        if !self.custom_colorizer {
            self.colorizer = Some(colorizer);
        }
    }

    /// Resolve every requested field in order and concatenate the rendered
    /// pieces, separator-delimited.
    pub fn format(
        &self,
        msg: &Message,
        color: bool,
        app_name: &str,
        started: DateTime<Utc>,
    ) -> String {
        let mut output = String::new();
        for field in &self.requested {
            match self.renders.get(field.as_str()) {
                None => {
                    output.push_str(&format!(
                        "{}={}",
                        field,
                        display_or_nil(msg.value(field))
                    ));
                    output.push(' ');
                }
                Some(render) => {
                    if field == KEY_JSON {
                        return match std_json(msg, app_name) {
                            Ok(text) => text,
                            Err(err) => err.to_string(),
                        };
                    }
                    let ctx = RenderContext {
                        colors: if color {
                            self.colorizer.as_deref()
                        } else {
                            None
                        },
                        app_name,
                        started,
                    };
                    match render.render(msg, &ctx) {
                        Ok(text) => {
                            output.push_str(&text);
                            output.push(' ');
                        }
                        Err(err) => return format!("{}!<> {}", output, err),
                    }
                }
            }
        }
        output
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}

/// `[YYYY-MM-DD HH:MM:SS.mmm]`, parsed back from the message's `time`
/// field; colorized by severity foreground.
struct TimeRender;

impl FieldRender for TimeRender {
    fn render(&self, msg: &Message, ctx: &RenderContext<'_>) -> Result<String> {
        let raw = display_or_nil(msg.value(KEY_TIME));
        let trimmed = raw.strip_prefix('[').unwrap_or(&raw);
        let trimmed = trimmed.strip_suffix(']').unwrap_or(trimmed);
        let tm = DateTime::parse_from_rfc3339(trimmed)?;
        let text = tm.format("%Y-%m-%d %H:%M:%S%.3f").to_string();
        let text = match ctx.colors {
            None => text,
            Some(colors) => colors.colorize_by_keys(
                &Value::from(text.as_str()),
                &[ColorKey::fg(level_tag(msg))],
            ),
        };
        Ok(format!("[{}]", text))
    }
}

/// `[S.mmm]` seconds elapsed since the configuration's start time,
/// colorized by severity foreground.
struct SinceRender;

impl FieldRender for SinceRender {
    fn render(&self, msg: &Message, ctx: &RenderContext<'_>) -> Result<String> {
        let elapsed = Utc::now().signed_duration_since(ctx.started);
        let secs = elapsed.num_milliseconds() as f64 / 1000.0;
        match ctx.colors {
            None => Ok(format!("[{:.3}]", secs)),
            Some(colors) => {
                let text = format!("{:.3}", secs);
                let colored = colors.colorize_by_keys(
                    &Value::from(text.as_str()),
                    &[ColorKey::fg(level_tag(msg))],
                );
                Ok(format!("[{}]", colored))
            }
        }
    }
}

/// `[tag]`, colorized by the severity's foreground and background pair.
struct LevelRender;

impl FieldRender for LevelRender {
    fn render(&self, msg: &Message, ctx: &RenderContext<'_>) -> Result<String> {
        let level = msg
            .value(KEY_LEVEL)
            .ok_or_else(|| LogmanError::no_field(KEY_LEVEL))?;
        match ctx.colors {
            None => Ok(format!("[{}]", level)),
            Some(colors) => {
                let tag = level.to_string();
                Ok(format!(
                    "[{}]",
                    colors.colorize_by_keys(
                        level,
                        &[ColorKey::fg(tag.as_str()), ColorKey::bg(tag.as_str())],
                    )
                ))
            }
        }
    }
}

/// The message template with each positional argument colorized by its
/// runtime type and spliced back in at its substitution point.
struct MessageRender;

impl FieldRender for MessageRender {
    fn render(&self, msg: &Message, ctx: &RenderContext<'_>) -> Result<String> {
        let parts: Vec<String> = match ctx.colors {
            None => msg.input_args().iter().map(Value::to_string).collect(),
            Some(colors) => msg
                .input_args()
                .iter()
                .map(|arg| colors.colorize_by_type(arg))
                .collect(),
        };
        Ok(render_format(msg.format_str(), &parts))
    }
}

/// `\n  [caller=basename:line]`, colorized by the `caller` pair.
struct CallerShortRender;

impl FieldRender for CallerShortRender {
    fn render(&self, msg: &Message, ctx: &RenderContext<'_>) -> Result<String> {
        let file = msg
            .value(KEY_FILE)
            .ok_or_else(|| LogmanError::no_field(KEY_FILE))?
            .to_string();
        let line = msg
            .value(KEY_LINE)
            .ok_or_else(|| LogmanError::no_field(KEY_LINE))?;
        let base = match Path::new(&file).file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => file.clone(),
        };
        let text = format!("\n  [caller={}:{}]", base, line);
        Ok(colorize_caller(ctx, text))
    }
}

/// `\n  [caller=file:line]` plus ` [func=name]` when the message carries a
/// caller function name.
struct CallerLongRender;

impl FieldRender for CallerLongRender {
    fn render(&self, msg: &Message, ctx: &RenderContext<'_>) -> Result<String> {
        let file = msg
            .value(KEY_FILE)
            .ok_or_else(|| LogmanError::no_field(KEY_FILE))?;
        let line = msg
            .value(KEY_LINE)
            .ok_or_else(|| LogmanError::no_field(KEY_LINE))?;
        let mut text = format!("\n  [caller={}:{}]", file, line);
        if let Some(func) = msg.value(KEY_FUNC) {
            text.push_str(&format!(" [func={}]", func));
        }
        Ok(colorize_caller(ctx, text))
    }
}

fn colorize_caller(ctx: &RenderContext<'_>, text: String) -> String {
    match ctx.colors {
        None => text,
        Some(colors) => colors.colorize_by_keys(
            &Value::from(text.as_str()),
            &[ColorKey::fg("caller"), ColorKey::bg("caller")],
        ),
    }
}

/// Whole-message JSON rendering for the `json` pseudo-field.
struct JsonRender;

impl FieldRender for JsonRender {
    fn render(&self, msg: &Message, ctx: &RenderContext<'_>) -> Result<String> {
        std_json(msg, ctx.app_name)
    }
}

#[derive(serde::Serialize)]
struct JsonLog<'a> {
    app: &'a str,
    level: String,
    message: String,
    time: String,
    #[serde(rename = "logman keys", skip_serializing_if = "Option::is_none")]
    keys: Option<BTreeMap<String, String>>,
    #[serde(rename = "input arguments", skip_serializing_if = "Option::is_none")]
    args: Option<BTreeMap<String, String>>,
}

fn std_json(msg: &Message, app_name: &str) -> Result<String> {
    let level = level_tag(msg);
    let time = display_or_nil(msg.value(KEY_TIME));
    let parts: Vec<String> = msg.input_args().iter().map(Value::to_string).collect();
    let message = render_format(msg.format_str(), &parts);

    // Non-reserved fields ride along for the diagnostic severities only.
    let mut keys: Option<BTreeMap<String, String>> = None;
    if matches!(level.as_str(), ERROR | FATAL | DEBUG | TRACE) {
        for key in msg.fields() {
            if matches!(key.as_str(), KEY_TIME | KEY_LEVEL | KEY_MESSAGE) {
                continue;
            }
            keys.get_or_insert_with(BTreeMap::new)
                .insert(key.clone(), display_or_nil(msg.value(&key)));
        }
    }

    let args = if matches!(level.as_str(), FATAL | TRACE) && !msg.input_args().is_empty() {
        Some(
            msg.input_args()
                .iter()
                .enumerate()
                .map(|(i, arg)| (format!("arg[{}]", i), arg.to_string()))
                .collect(),
        )
    } else {
        None
    };

    let record = JsonLog {
        app: app_name,
        level,
        message,
        time,
        keys,
        args,
    };
    Ok(serde_json::to_string(&record)?)
}
