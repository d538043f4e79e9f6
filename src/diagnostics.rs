// diagnostics.rs - Per-run logging sink handed to every component

use std::fmt::Debug;
use std::sync::Mutex;

/// Severity of a diagnostic message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

/// Sink for the messages one pipeline run produces.
///
/// Components never log through global state: they receive a `&dyn Diagnostics`
/// and report through it, so a run (or a test) decides where messages go.
pub trait Diagnostics: Send + Sync + Debug {
    fn emit(&self, level: Level, message: &str);

    fn info(&self, message: &str) {
        self.emit(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.emit(Level::Warn, message);
    }

    fn error(&self, message: &str) {
        self.emit(Level::Error, message);
    }
}

/// Forwards every message to `tracing`, tagged with the run name
#[derive(Debug, Clone)]
pub struct TracingDiagnostics {
    run: String,
}

impl TracingDiagnostics {
    pub fn new(run: impl Into<String>) -> Self {
        Self { run: run.into() }
    }
}

impl Diagnostics for TracingDiagnostics {
    fn emit(&self, level: Level, message: &str) {
        match level {
            Level::Info => tracing::info!(run = %self.run, "{}", message),
            Level::Warn => tracing::warn!(run = %self.run, "{}", message),
            Level::Error => tracing::error!(run = %self.run, "{}", message),
        }
    }
}

/// Keeps messages in memory; used by tests to assert on clamps and aborts
#[derive(Debug, Default)]
pub struct MemoryDiagnostics {
    records: Mutex<Vec<(Level, String)>>,
}

impl MemoryDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<(Level, String)> {
        self.records
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Messages at `level` containing `needle`
    pub fn matching(&self, level: Level, needle: &str) -> Vec<String> {
        self.records()
            .into_iter()
            .filter(|(l, m)| *l == level && m.contains(needle))
            .map(|(_, m)| m)
            .collect()
    }
}

impl Diagnostics for MemoryDiagnostics {
    fn emit(&self, level: Level, message: &str) {
        if let Ok(mut records) = self.records.lock() {
            records.push((level, message.to_string()));
        }
    }
}
