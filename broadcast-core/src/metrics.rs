use chrono::{Local, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{error, info};

use crate::outcome::Outcome;

/// Maximum number of retained log entries.
pub const LOG_CAPACITY: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => f.write_str("INFO"),
            Severity::Success => f.write_str("SUCCESS"),
            Severity::Error => f.write_str("FAILED"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub message: String,
    pub severity: Severity,
    /// Local wall clock, display only. Ordering is positional.
    pub time: String,
}

impl LogEntry {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
            time: Local::now().format("%H:%M:%S").to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub timestamp: String,
    pub success: u64,
    pub failed: u64,
    pub attempts: u64,
    pub cycles: u64,
    pub success_rate: f64,
    pub uptime_secs: u64,
    pub log_len: usize,
}

/// Bounded newest-first log plus monotonic counters.
///
/// Not synchronized on its own: the run controller keeps it behind the same
/// lock as the configuration and run state.
#[derive(Debug)]
pub struct LogSink {
    entries: VecDeque<LogEntry>,
    success: u64,
    failed: u64,
    cycles: u64,
    start_time: Instant,
}

impl Default for LogSink {
    fn default() -> Self {
        Self {
            entries: VecDeque::with_capacity(LOG_CAPACITY),
            success: 0,
            failed: 0,
            cycles: 0,
            start_time: Instant::now(),
        }
    }
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend an entry, evicting the oldest beyond [`LOG_CAPACITY`].
    pub fn append(&mut self, entry: LogEntry) {
        match entry.severity {
            Severity::Error => error!(target: "task_result", "[{}] {}", entry.severity, entry.message),
            _ => info!(target: "task_result", "[{}] {}", entry.severity, entry.message),
        }

        self.entries.push_front(entry);
        self.entries.truncate(LOG_CAPACITY);
    }

    pub fn push(&mut self, message: impl Into<String>, severity: Severity) {
        self.append(LogEntry::new(message, severity));
    }

    /// Log an outcome and bump the matching counter.
    pub fn record(&mut self, outcome: &Outcome) {
        if outcome.is_success() {
            self.success += 1;
            self.push(outcome.message(), Severity::Success);
        } else {
            self.failed += 1;
            self.push(outcome.message(), Severity::Error);
        }
    }

    pub fn finish_cycle(&mut self) {
        self.cycles += 1;
    }

    /// Empties the log. Counters are untouched.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries, newest first.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn success_count(&self) -> u64 {
        self.success
    }

    pub fn failed_count(&self) -> u64 {
        self.failed
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let attempts = self.success + self.failed;
        MetricsSnapshot {
            timestamp: Utc::now().to_rfc3339(),
            success: self.success,
            failed: self.failed,
            attempts,
            cycles: self.cycles,
            success_rate: if attempts > 0 {
                self.success as f64 / attempts as f64 * 100.0
            } else {
                0.0
            },
            uptime_secs: self.uptime().as_secs(),
            log_len: self.entries.len(),
        }
    }
}

impl MetricsSnapshot {
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }

    pub async fn export_to_file(&self, path: &str) -> std::io::Result<()> {
        tokio::fs::write(path, self.to_json()).await
    }
}
