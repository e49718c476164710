//! Human-readable status lines for a pipeline run.
//!
//! Every entry is printed with a level prefix, to stdout unless
//! [`route_status_to_stderr`] was called, and mirrored as a `debug` tracing
//! event.

use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

static STATUS_TO_STDERR: AtomicBool = AtomicBool::new(false);

/// Send status lines to stderr, keeping stdout for machine-readable output.
pub fn route_status_to_stderr(enabled: bool) {
    STATUS_TO_STDERR.store(enabled, Ordering::Relaxed);
}

pub fn status_to_stderr() -> bool {
    STATUS_TO_STDERR.load(Ordering::Relaxed)
}

/// Log level for status display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A single status line
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Nesting depth (three spaces per level)
    pub indent: u8,
}

impl LogEntry {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Info, message: message.into(), indent: 0 }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Success, message: message.into(), indent: 0 }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Warning, message: message.into(), indent: 0 }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Error, message: message.into(), indent: 0 }
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }

    /// Print the line and forward it to the tracing subscriber.
    pub fn emit(&self) {
        if status_to_stderr() {
            eprintln!("{}", self);
        } else {
            println!("{}", self);
        }
        tracing::debug!(status = ?self.level, indent = self.indent, "{}", self.message);
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.level {
            LogLevel::Info => "   ",
            LogLevel::Success => "   ✓",
            LogLevel::Warning => "   ⚠️",
            LogLevel::Error => "   ❌",
        };
        let indent = "   ".repeat(self.indent as usize);
        write!(f, "{}{} {}", indent, prefix, self.message)
    }
}

/// Convenient logging functions
pub fn log_info(msg: impl Into<String>) {
    LogEntry::info(msg).emit();
}

pub fn log_success(msg: impl Into<String>) {
    LogEntry::success(msg).emit();
}

pub fn log_warning(msg: impl Into<String>) {
    LogEntry::warning(msg).emit();
}

pub fn log_error(msg: impl Into<String>) {
    LogEntry::error(msg).emit();
}

pub fn log_info_indent(msg: impl Into<String>, indent: u8) {
    LogEntry::info(msg).with_indent(indent).emit();
}
