//! Integration tests for the logging system
//!
//! These tests swap the process-wide logger, so they run serially.
//!
//! Run with: cargo test --test logging_integration_tests


use backend_test_utils::test_context;
use dui_pool::dui::log::{self, Logger, LogEntry, LogSeverity};
use dui_pool::dui::{DuiDesc, PoolContext};
use std::sync::{mpsc, Arc, Mutex, OnceLock, Weak};
use std::thread;
use std::time::Duration;
use serial_test::serial;

// ============================================================================
// TEST LOGGER IMPLEMENTATION
// ============================================================================

/// Test logger that captures log entries for verification
struct TestLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogger {
    fn new() -> (Self, Arc<Mutex<Vec<LogEntry>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        (Self { entries: entries.clone() }, entries)
    }
}

impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

fn install() -> Arc<Mutex<Vec<LogEntry>>> {
    let (logger, entries) = TestLogger::new();
    log::set_logger(logger);
    entries
}

// ============================================================================
// LOGGING TESTS
// ============================================================================

#[test]
#[serial]
fn test_integration_pool_initialization_logged() {
    let entries = install();
    let (ctx, _journal) = test_context(3);

    let _dui = ctx.create_dui(DuiDesc::new("nui://hud", 64, 64)).unwrap();

    let captured = entries.lock().unwrap();
    assert!(captured.iter().any(|e| e.severity == LogSeverity::Info
        && e.source == "dui::SlotPool"
        && e.message.contains("3 slots")));
    drop(captured);

    log::reset_logger();
}

#[test]
#[serial]
fn test_integration_exhaustion_logged_as_warning() {
    let entries = install();
    let (ctx, _journal) = test_context(1);

    let _held = ctx.create_dui(DuiDesc::new("nui://hud", 64, 64)).unwrap();
    assert!(ctx.create_dui(DuiDesc::new("nui://hud", 64, 64)).is_err());

    let captured = entries.lock().unwrap();
    let warning = captured.iter()
        .find(|e| e.severity == LogSeverity::Warn)
        .expect("exhaustion warning");
    assert_eq!(warning.message, "No available texture slots in pool (max 1)");
    drop(captured);

    log::reset_logger();
}

#[test]
#[serial]
fn test_integration_debug_surface_uses_context_logger() {
    // The context captures the logger installed at its creation
    let entries = install();
    let (ctx, _journal) = test_context(2);
    log::reset_logger();

    let dui = ctx.create_dui(DuiDesc::new("nui://hud", 64, 64).with_debug(true)).unwrap();
    let id = dui.id().to_string();
    dui.remove();

    let captured = entries.lock().unwrap();
    let debug: Vec<_> = captured.iter()
        .filter(|e| e.severity == LogSeverity::Debug)
        .map(|e| e.message.clone())
        .collect();
    assert_eq!(debug, vec![
        format!("Dui {} created (slot 0)", id),
        format!("Dui {} removed (slot 0 released)", id),
    ]);
}

#[test]
#[serial]
fn test_integration_session_end_logged() {
    let entries = install();
    let (ctx, _journal) = test_context(2);
    let _a = ctx.create_dui(DuiDesc::new("nui://a", 64, 64)).unwrap();
    let _b = ctx.create_dui(DuiDesc::new("nui://b", 64, 64)).unwrap();

    ctx.on_session_end("dui");

    let captured = entries.lock().unwrap();
    assert!(captured.iter().any(|e| e.severity == LogSeverity::Info
        && e.message == "Session 'dui' ended, removed 2 dui(s)"));
    drop(captured);

    log::reset_logger();
}

/// Logger that reads the pool's slot usage while logging
struct PoolStatusLogger {
    context: Arc<OnceLock<Weak<PoolContext>>>,
    entries: Arc<Mutex<Vec<(String, String, usize)>>>,
}

impl Logger for PoolStatusLogger {
    fn log(&self, entry: &LogEntry) {
        let used = self.context.get()
            .and_then(Weak::upgrade)
            .map_or(0, |ctx| ctx.used_slot_count());
        self.entries.lock().unwrap().push((entry.source.clone(), entry.message.clone(), used));
    }
}

#[test]
#[serial]
fn test_integration_global_logger_may_query_context() {
    let context = Arc::new(OnceLock::new());
    let entries = Arc::new(Mutex::new(Vec::new()));
    log::set_logger(PoolStatusLogger { context: context.clone(), entries: entries.clone() });
    let (ctx, _journal) = test_context(1);
    context.set(Arc::downgrade(&ctx)).unwrap();

    let (done, finished) = mpsc::channel();
    let worker = ctx.clone();
    thread::spawn(move || {
        let dui = worker.create_dui(DuiDesc::new("nui://hud", 64, 64)).unwrap();
        assert!(worker.create_dui(DuiDesc::new("nui://hud", 64, 64)).is_err());
        dui.remove();
        done.send(()).unwrap();
    });
    let finished = finished.recv_timeout(Duration::from_secs(5));
    log::reset_logger();
    finished.expect("pool logging blocked on a logger that queries the context");

    let entries = entries.lock().unwrap();
    let pool: Vec<(&str, usize)> = entries.iter()
        .filter(|(source, _, _)| source == "dui::SlotPool")
        .map(|(_, message, used)| (message.as_str(), *used))
        .collect();
    assert_eq!(pool, vec![
        ("Pool 'dui_pool' initialized with 1 slots", 1),
        ("Acquired slot 0 (v1)", 1),
        ("No available texture slots in pool (max 1)", 1),
        ("Released slot 0", 0),
    ]);
}
