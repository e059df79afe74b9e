//! Logging sink used by every cleanup operation.
//!
//! Operations never print directly; they report through a [`Reporter`] so
//! callers decide where warnings and deletion notices end up.

use std::sync::Mutex;

/// Severity of a reported message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
}

pub trait Reporter: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
}

/// Forwards messages to the `tracing` subscriber installed by the binary.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn info(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
    }
}

/// Keeps every message in memory.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    entries: Mutex<Vec<(Level, String)>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(Level, String)> {
        self.lock().clone()
    }

    pub fn messages(&self, level: Level) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.messages(Level::Warn)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(Level, String)>> {
        // A poisoned log is still a readable log.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn push(&self, level: Level, message: &str) {
        self.lock().push((level, message.to_string()));
    }
}

impl Reporter for MemoryReporter {
    fn info(&self, message: &str) {
        self.push(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.push(Level::Warn, message);
    }
}
