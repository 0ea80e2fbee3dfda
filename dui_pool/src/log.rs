//! Logging system for the DUI pool
//!
//! This module provides a small pluggable logging layer with:
//! - Customizable logger via Logger trait
//! - Severity levels (Trace, Debug, Info, Warn, Error)
//! - Colored console output by default
//! - A process-wide logger slot guarded by a RwLock
//! - File and line information for detailed ERROR logs

use colored::*;
use std::sync::{Arc, OnceLock, RwLock};
use std::time::SystemTime;
use chrono::{DateTime, Local};

/// Logger trait for custom logging implementations
///
/// Implement this trait to capture pool and surface events elsewhere
/// (file, host console, test buffer, ...).
///
/// # Example
///
/// ```no_run
/// use dui_pool::dui::log::{Logger, LogEntry};
///
/// struct HostConsole;
///
/// impl Logger for HostConsole {
///     fn log(&self, entry: &LogEntry) {
///         // Forward to the host console...
///     }
/// }
/// ```
pub trait Logger: Send + Sync {
    /// Log an entry
    fn log(&self, entry: &LogEntry);
}

/// Log entry containing all information about a log message
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Severity level
    pub severity: LogSeverity,

    /// Timestamp when the log was created
    pub timestamp: SystemTime,

    /// Source module (e.g., "dui::SlotPool", "dui::Dui")
    pub source: String,

    /// Log message
    pub message: String,

    /// Source file (only for detailed ERROR logs)
    pub file: Option<&'static str>,

    /// Source line (only for detailed ERROR logs)
    pub line: Option<u32>,
}

impl LogEntry {
    /// Create an entry stamped with the current time, without location
    pub fn new(severity: LogSeverity, source: &str, message: String) -> Self {
        Self {
            severity,
            timestamp: SystemTime::now(),
            source: source.to_string(),
            message,
            file: None,
            line: None,
        }
    }
}

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogSeverity {
    /// Very verbose information (slot scans, native calls)
    Trace,

    /// Development/debugging information (per-surface debug output)
    Debug,

    /// Important informational messages
    Info,

    /// Warning messages (teardown hiccups, ignored releases)
    Warn,

    /// Error messages (with file:line details)
    Error,
}

/// Default logger implementation using colored console output
///
/// Format:
/// - Normal: `[timestamp] [SEVERITY] [source] message`
/// - Error: `[timestamp] [ERROR] [source] message (file:line)`
pub struct DefaultLogger;

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        let datetime: DateTime<Local> = entry.timestamp.into();
        let timestamp = datetime.format("%Y-%m-%d %H:%M:%S%.3f").to_string();

        let severity_str = match entry.severity {
            LogSeverity::Trace => "TRACE".bright_black(),
            LogSeverity::Debug => "DEBUG".cyan(),
            LogSeverity::Info => "INFO ".green(),
            LogSeverity::Warn => "WARN ".yellow(),
            LogSeverity::Error => "ERROR".red().bold(),
        };

        let source = entry.source.bright_blue();

        if let (Some(file), Some(line)) = (entry.file, entry.line) {
            println!(
                "[{}] [{}] [{}] {} ({}:{})",
                timestamp,
                severity_str,
                source,
                entry.message,
                file,
                line
            );
        } else {
            println!(
                "[{}] [{}] [{}] {}",
                timestamp,
                severity_str,
                source,
                entry.message
            );
        }
    }
}

// ===== PROCESS-WIDE LOGGER =====

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Arc<dyn Logger>>> = OnceLock::new();

fn logger_slot() -> &'static RwLock<Arc<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Arc::new(DefaultLogger)))
}

/// Replace the process-wide logger
pub fn set_logger<L: Logger + 'static>(logger: L) {
    if let Ok(mut lock) = logger_slot().write() {
        *lock = Arc::new(logger);
    }
}

/// Reset the process-wide logger to `DefaultLogger`
pub fn reset_logger() {
    if let Ok(mut lock) = logger_slot().write() {
        *lock = Arc::new(DefaultLogger);
    }
}

/// Shared handle to the logger currently installed
///
/// Contexts capture this at construction and hand it to debug-enabled
/// surfaces, so later `set_logger` calls do not affect them.
pub fn current_logger() -> Arc<dyn Logger> {
    match logger_slot().read() {
        Ok(lock) => lock.clone(),
        Err(_) => Arc::new(DefaultLogger),
    }
}

/// Log a message without file:line (used by dui_info!, dui_warn!, ...)
pub fn log(severity: LogSeverity, source: &str, message: String) {
    if let Ok(lock) = logger_slot().read() {
        lock.log(&LogEntry::new(severity, source, message));
    }
}

/// Log a message with file:line information (used by dui_error!)
pub fn log_detailed(
    severity: LogSeverity,
    source: &str,
    message: String,
    file: &'static str,
    line: u32,
) {
    if let Ok(lock) = logger_slot().read() {
        lock.log(&LogEntry {
            severity,
            timestamp: SystemTime::now(),
            source: source.to_string(),
            message,
            file: Some(file),
            line: Some(line),
        });
    }
}

// ===== LOGGING MACROS =====

/// Log a TRACE message (very verbose, typically disabled)
#[macro_export]
macro_rules! dui_trace {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::log(
            $crate::dui::log::LogSeverity::Trace,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a DEBUG message
#[macro_export]
macro_rules! dui_debug {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::log(
            $crate::dui::log::LogSeverity::Debug,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an INFO message
///
/// # Example
///
/// ```ignore
/// dui_info!("dui::SlotPool", "Pool initialized with {} slots", capacity);
/// ```
#[macro_export]
macro_rules! dui_info {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::log(
            $crate::dui::log::LogSeverity::Info,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a WARN message
#[macro_export]
macro_rules! dui_warn {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::log(
            $crate::dui::log::LogSeverity::Warn,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an ERROR message with file:line information
#[macro_export]
macro_rules! dui_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::log_detailed(
            $crate::dui::log::LogSeverity::Error,
            $source,
            format!($($arg)*),
            file!(),
            line!()
        )
    };
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
