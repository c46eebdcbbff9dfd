//! Unit tests for the Hal logging hub
//!
//! The logger is a global shared across all tests: every test here is #[serial].

use crate::galaxy3d::Hal;
use crate::galaxy3d::log::{LogEntry, LogSeverity, Logger};
use serial_test::serial;
use std::sync::{Arc, Mutex};

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
        // Other unit tests log concurrently through the same global logger
        if entry.source == "galaxy3d::hal::test" {
            self.entries.lock().unwrap().push(entry.clone());
        }
    }
}

#[test]
#[serial]
fn test_set_logger_receives_entries() {
    let (logger, entries) = TestLogger::new();
    Hal::set_logger(logger);

    crate::hal_info!("galaxy3d::hal::test", "hello {}", 1);
    crate::hal_error!("galaxy3d::hal::test", "boom");

    let logged = entries.lock().unwrap();
    assert_eq!(logged.len(), 2);
    assert_eq!(logged[0].message, "hello 1");
    assert!(logged[0].file.is_none());
    assert_eq!(logged[1].severity, LogSeverity::Error);
    assert!(logged[1].line.is_some());
    drop(logged);

    Hal::reset_logger();
}

#[test]
#[serial]
fn test_min_severity_filters_entries() {
    let (logger, entries) = TestLogger::new();
    Hal::set_logger(logger);
    Hal::set_min_severity(LogSeverity::Warn);

    crate::hal_debug!("galaxy3d::hal::test", "dropped");
    crate::hal_info!("galaxy3d::hal::test", "dropped");
    crate::hal_warn!("galaxy3d::hal::test", "kept");

    assert_eq!(entries.lock().unwrap().len(), 1);
    assert_eq!(Hal::min_severity(), LogSeverity::Warn);

    Hal::reset_logger();
    assert_eq!(Hal::min_severity(), LogSeverity::Trace);
}

#[test]
#[serial]
fn test_reset_logger_detaches_custom_logger() {
    let (logger, entries) = TestLogger::new();
    Hal::set_logger(logger);
    Hal::reset_logger();

    crate::hal_trace!("galaxy3d::hal::test", "goes to the console");
    assert!(entries.lock().unwrap().is_empty());
}
