//! Logging listener for event observation.

use skel_core::{BoxError, Event, Flow, Listener};
use tracing::Level;

/// A listener that logs every event it sees and never halts.
#[derive(Debug, Clone, Copy)]
pub struct LoggingListener {
    level: Level,
}

impl LoggingListener {
    /// Logs at `DEBUG`.
    pub fn new() -> Self {
        Self {
            level: Level::DEBUG,
        }
    }

    /// Logs at the given level.
    pub fn with_level(level: Level) -> Self {
        Self { level }
    }

    /// Level events are logged at.
    pub fn level(&self) -> Level {
        self.level
    }
}

impl Default for LoggingListener {
    fn default() -> Self {
        Self::new()
    }
}

impl Listener for LoggingListener {
    fn on_event(&self, event: &Event<'_>) -> Result<Flow, BoxError> {
        let kind = event.kind();
        match self.level {
            Level::ERROR => tracing::error!(event = %kind, ?event, "lifecycle event"),
            Level::WARN => tracing::warn!(event = %kind, ?event, "lifecycle event"),
            Level::INFO => tracing::info!(event = %kind, ?event, "lifecycle event"),
            Level::DEBUG => tracing::debug!(event = %kind, ?event, "lifecycle event"),
            _ => tracing::trace!(event = %kind, ?event, "lifecycle event"),
        }
        Ok(Flow::Continue)
    }
}
