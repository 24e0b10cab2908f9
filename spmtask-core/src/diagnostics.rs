//! User-visible diagnostic output channel.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use tracing::warn;

/// Name of the channel diagnostics are reported under.
pub const CHANNEL_NAME: &str = "SwiftPM Task Auto Detection";

/// Append-only text channel for stderr and failure narratives.
///
/// Observational only; nothing on the discovery path reads it back.
pub trait DiagnosticSink: Send + Sync {
    fn append_line(&self, line: &str);

    /// Asks the host to bring the channel into view. Only used on failure paths.
    fn reveal(&self);
}

/// Sink that buffers lines in memory, for hosts that display them later.
#[derive(Debug, Default)]
pub struct OutputChannel {
    lines: Mutex<Vec<String>>,
    reveals: AtomicUsize,
}

impl OutputChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> &'static str {
        CHANNEL_NAME
    }

    /// Snapshot of every line appended so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.lines
            .lock()
            .map(|lines| lines.is_empty())
            .unwrap_or(true)
    }

    pub fn reveal_count(&self) -> usize {
        self.reveals.load(Ordering::SeqCst)
    }

    pub fn was_revealed(&self) -> bool {
        self.reveal_count() > 0
    }
}

impl DiagnosticSink for OutputChannel {
    fn append_line(&self, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line.to_string());
        }
    }

    fn reveal(&self) {
        self.reveals.fetch_add(1, Ordering::SeqCst);
    }
}

/// Sink that forwards every line to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn append_line(&self, line: &str) {
        warn!(channel = CHANNEL_NAME, "{}", line);
    }

    fn reveal(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_channel_records_lines_and_reveals() {
        let channel = OutputChannel::new();
        assert!(channel.is_empty());
        assert!(!channel.was_revealed());

        channel.append_line("warning: unused dependency");
        channel.append_line("Auto detecting Swift Package Tasks failed.");
        channel.reveal();

        assert_eq!(channel.name(), CHANNEL_NAME);
        assert_eq!(channel.lines().len(), 2);
        assert_eq!(channel.reveal_count(), 1);
    }

    #[test]
    fn test_sinks_are_interchangeable() {
        let sinks: Vec<Box<dyn DiagnosticSink>> =
            vec![Box::new(OutputChannel::new()), Box::new(TracingSink)];
        for sink in &sinks {
            sink.append_line("error: manifest parse failure");
            sink.reveal();
        }
    }
}
