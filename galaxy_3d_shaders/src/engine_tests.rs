//! Unit tests for the Engine logging facade
//!
//! IMPORTANT: the logger is a global OnceLock shared across all tests.
//! Tests that swap it are marked #[serial] and restore the default logger.

use std::sync::{Arc, Mutex};
use serial_test::serial;
use crate::galaxy3d::Engine;
use crate::galaxy3d::log::{Logger, LogEntry, LogSeverity};

// ============================================================================
// TEST HELPERS
// ============================================================================

/// Test logger that captures log entries for verification
#[derive(Clone)]
struct TestLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogger {
    fn new() -> Self {
        Self { entries: Arc::new(Mutex::new(Vec::new())) }
    }

    /// Entries logged by these tests; other tests may log concurrently
    fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.source == "galaxy3d::Test")
            .cloned()
            .collect()
    }
}

impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

// ============================================================================
// LOGGER TESTS
// ============================================================================

#[test]
#[serial]
fn test_set_logger_receives_entries() {
    let logger = TestLogger::new();
    Engine::set_logger(logger.clone());

    Engine::log(LogSeverity::Info, "galaxy3d::Test", "hello".to_string());

    let entries = logger.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].severity, LogSeverity::Info);
    assert_eq!(entries[0].source, "galaxy3d::Test");
    assert_eq!(entries[0].message, "hello");
    assert!(entries[0].file.is_none());

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_log_detailed_carries_location() {
    let logger = TestLogger::new();
    Engine::set_logger(logger.clone());

    Engine::log_detailed(LogSeverity::Error, "galaxy3d::Test", "boom".to_string(), "src/x.rs", 12);

    let entries = logger.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].file, Some("src/x.rs"));
    assert_eq!(entries[0].line, Some(12));

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_macros_route_through_engine() {
    let logger = TestLogger::new();
    Engine::set_logger(logger.clone());

    crate::engine_trace!("galaxy3d::Test", "t {}", 1);
    crate::engine_debug!("galaxy3d::Test", "d {}", 2);
    crate::engine_info!("galaxy3d::Test", "i {}", 3);
    crate::engine_warn!("galaxy3d::Test", "w {}", 4);
    crate::engine_error!("galaxy3d::Test", "e {}", 5);

    let entries = logger.entries();
    let severities: Vec<LogSeverity> = entries.iter().map(|e| e.severity).collect();
    assert_eq!(
        severities,
        vec![LogSeverity::Trace, LogSeverity::Debug, LogSeverity::Info, LogSeverity::Warn, LogSeverity::Error]
    );
    assert_eq!(entries[2].message, "i 3");
    assert!(entries[4].file.is_some());
    assert!(entries[3].file.is_none());

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_reset_logger_detaches_custom_logger() {
    let logger = TestLogger::new();
    Engine::set_logger(logger.clone());
    Engine::reset_logger();

    Engine::log(LogSeverity::Warn, "galaxy3d::Test", "after reset".to_string());
    assert!(logger.entries().is_empty());
}
