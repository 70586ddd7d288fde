//! Writer resolution and sinks
//!
//! A writer key is either a well-known stream name, the name of a
//! registered in-memory sink, or a filesystem path. Paths naming an
//! existing directory get one file per message; files are opened for
//! append (created if absent) per individual write and closed on drop —
//! there is no handle cache.

use crate::core::error::{LogmanError, Result};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

// Well-known writer keys.
pub const STDOUT: &str = "stdout";
pub const STDERR: &str = "stderr";

/// Shared in-memory sink, used to capture dispatched output in tests and
/// tooling. Cloning shares the underlying buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).into_owned()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

impl Write for MemorySink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn open_append(path: &Path) -> io::Result<std::fs::File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Resolve a writer key to an open sink for one write.
///
/// Resolution order: well-known stream names, registered in-memory sinks,
/// then the filesystem. `msg_time` (the message's RFC 3339 `time` field)
/// names the per-message file for directory sinks; an unparseable time
/// falls back to now.
pub(crate) fn resolve_writer(
    key: &str,
    sinks: &HashMap<String, MemorySink>,
    msg_time: &str,
    app_name: &str,
    level_name: &str,
) -> Result<Box<dyn Write>> {
    match key {
        STDOUT => return Ok(Box::new(io::stdout())),
        STDERR => return Ok(Box::new(io::stderr())),
        _ => {}
    }
    if let Some(sink) = sinks.get(key) {
        return Ok(Box::new(sink.clone()));
    }

    let path = Path::new(key);
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_dir() => {
            let nanos = DateTime::parse_from_rfc3339(msg_time)
                .ok()
                .and_then(|t| t.timestamp_nanos_opt())
                .unwrap_or_else(|| Utc::now().timestamp_nanos_opt().unwrap_or_default());
            let file = path.join(format!("{}_{}_{}.lmm", nanos, app_name, level_name));
            match open_append(&file) {
                Ok(f) => Ok(Box::new(f)),
                Err(_) => Err(LogmanError::writer_open(key)),
            }
        }
        Ok(meta) if meta.is_file() => match open_append(path) {
            Ok(f) => Ok(Box::new(f)),
            Err(_) => Err(LogmanError::writer_open(key)),
        },
        // Neither file nor directory (sockets, devices): not a usable sink.
        Ok(_) => Err(LogmanError::writer_open(key)),
        // Absent but possibly creatable.
        Err(_) => match open_append(path) {
            Ok(f) => Ok(Box::new(f)),
            Err(_) => Err(LogmanError::writer_open(key)),
        },
    }
}
