use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::Mutex;

use crate::trace::trace::TraceEvent;

/// Appends trace events to a JSONL file. Any I/O problem disables tracing
/// with a warning instead of failing the operation being traced.
pub struct TraceLogger {
    file: Option<Mutex<File>>,
}

impl TraceLogger {
    pub fn new(path: &str) -> Self {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path);

        match file {
            Ok(f) => Self {
                file: Some(Mutex::new(f)),
            },
            Err(e) => {
                eprintln!("Warning: could not open trace file '{}': {}", path, e);
                Self { file: None }
            }
        }
    }

    pub fn disabled() -> Self {
        Self { file: None }
    }

    /// Open `path` when given, otherwise a no-op logger.
    pub fn from_path(path: Option<&str>) -> Self {
        path.map(Self::new).unwrap_or_else(Self::disabled)
    }

    pub fn is_enabled(&self) -> bool {
        self.file.is_some()
    }

    pub fn log(&self, event: &TraceEvent) {
        let Some(file) = &self.file else {
            return;
        };
        if let Err(reason) = Self::append(file, event) {
            eprintln!("Warning: trace event dropped ({})", reason);
        }
    }

    fn append(file: &Mutex<File>, event: &TraceEvent) -> Result<(), String> {
        let json = serde_json::to_string(event).map_err(|e| format!("serialize: {}", e))?;
        let mut guard = file.lock().map_err(|e| format!("lock poisoned: {}", e))?;
        writeln!(guard, "{}", json).map_err(|e| format!("write: {}", e))
    }
}
