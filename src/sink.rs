//! Logging sinks.
//!
//! The renderer's output goes to a [`Sink`]: two severities, nothing else. The
//! default [`LogSink`] writes through the `log` facade under the stable
//! [`PROFILING_LOGGER`] target, so integrators can bind that name to any
//! backend. [`MemorySink`] buffers output for inspection, which is what the
//! tests use.

use std::fmt::Display;
use std::sync::Mutex;

/// The stable logger name profiling output is written under.
pub const PROFILING_LOGGER: &str = "ProfilingLogger";

/// External logging capability consumed by the interceptor. Implementations
/// must be safe for concurrent writes.
pub trait Sink: Send + Sync {
    /// Appends one rendered record (or short notice) at INFO level.
    fn info(&self, text: &str);
    /// Reports an instrumentation failure at ERROR level.
    fn error(&self, text: &str, cause: &dyn Display);
}

/// Writes through the `log` facade under the [`PROFILING_LOGGER`] target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl Sink for LogSink {
    fn info(&self, text: &str) {
        log::info!(target: PROFILING_LOGGER, "{text}");
    }

    fn error(&self, text: &str, cause: &dyn Display) {
        log::error!(target: PROFILING_LOGGER, "{text}: {cause}");
    }
}

/// Buffers sink writes in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    messages: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything written so far, in write order.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().expect("Mutex poisoned").clone()
    }

    /// Drains and returns everything written so far.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.messages.lock().expect("Mutex poisoned"))
    }
}

impl Sink for MemorySink {
    fn info(&self, text: &str) {
        self.messages
            .lock()
            .expect("Mutex poisoned")
            .push(text.to_string());
    }

    fn error(&self, text: &str, cause: &dyn Display) {
        self.messages
            .lock()
            .expect("Mutex poisoned")
            .push(format!("ERROR {text}: {cause}"));
    }
}
