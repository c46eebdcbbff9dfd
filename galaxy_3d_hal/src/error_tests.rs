//! Unit tests for error.rs
//!
//! Tests all Error variants, their Display output and the error macros.

use crate::error::{Error, Result};
use crate::galaxy3d::Hal;
use crate::galaxy3d::log::{LogEntry, LogSeverity, Logger};
use serial_test::serial;
use std::sync::{Arc, Mutex};

// ============================================================================
// ERROR DISPLAY TESTS
// ============================================================================

#[test]
fn test_invalid_argument_display() {
    let err = Error::InvalidArgument("zero width".to_string());
    assert_eq!(format!("{}", err), "Invalid argument: zero width");
}

#[test]
fn test_device_creation_failed_display() {
    let err = Error::DeviceCreationFailed("no adapter".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Device creation failed"));
    assert!(display.contains("no adapter"));
}

#[test]
fn test_context_creation_failed_display() {
    let err = Error::ContextCreationFailed("share lists".to_string());
    assert!(format!("{}", err).starts_with("Context creation failed"));
}

#[test]
fn test_device_lost_display() {
    let err = Error::DeviceLost("fence wait".to_string());
    assert_eq!(format!("{}", err), "Device lost: fence wait");
}

#[test]
fn test_out_of_memory_display() {
    assert_eq!(format!("{}", Error::OutOfMemory), "Out of GPU memory");
}

#[test]
fn test_error_is_std_error() {
    let err: Box<dyn std::error::Error> = Box::new(Error::BackendError("x".to_string()));
    assert!(err.to_string().contains("Backend error"));
}

#[test]
fn test_result_question_mark_propagates() {
    fn inner() -> Result<u32> {
        Err(Error::OutOfMemory)
    }
    fn outer() -> Result<u32> {
        let v = inner()?;
        Ok(v + 1)
    }
    assert_eq!(outer(), Err(Error::OutOfMemory));
}

// ============================================================================
// MACRO TESTS
// ============================================================================

struct CaptureLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl Logger for CaptureLogger {
    fn log(&self, entry: &LogEntry) {
        // Other unit tests log concurrently through the same global logger
        if entry.source == "galaxy3d::test" {
            self.entries.lock().unwrap().push(entry.clone());
        }
    }
}

#[test]
#[serial]
fn test_hal_err_logs_and_builds_variant() {
    let entries = Arc::new(Mutex::new(Vec::new()));
    Hal::set_logger(CaptureLogger { entries: entries.clone() });

    let err = crate::hal_err!(InvalidArgument, "galaxy3d::test", "bad value {}", 7);
    assert_eq!(err, Error::InvalidArgument("bad value 7".to_string()));

    let logged = entries.lock().unwrap();
    assert_eq!(logged.len(), 1);
    assert_eq!(logged[0].severity, LogSeverity::Error);
    assert_eq!(logged[0].source, "galaxy3d::test");
    assert!(logged[0].file.is_some());
    drop(logged);

    Hal::reset_logger();
}

#[test]
#[serial]
fn test_hal_bail_returns_early() {
    let entries = Arc::new(Mutex::new(Vec::new()));
    Hal::set_logger(CaptureLogger { entries: entries.clone() });

    fn check(width: u32) -> Result<u32> {
        if width == 0 {
            crate::hal_bail!(InvalidArgument, "galaxy3d::test", "width must be > 0");
        }
        Ok(width)
    }

    assert_eq!(check(4), Ok(4));
    assert!(matches!(check(0), Err(Error::InvalidArgument(_))));
    assert_eq!(entries.lock().unwrap().len(), 1);

    Hal::reset_logger();
}

#[test]
#[serial]
fn test_hal_warn_err_logs_at_warn() {
    let entries = Arc::new(Mutex::new(Vec::new()));
    Hal::set_logger(CaptureLogger { entries: entries.clone() });

    let err = crate::hal_warn_err!(DeviceCreationFailed, "galaxy3d::test", "level refused");
    assert!(matches!(err, Error::DeviceCreationFailed(_)));
    assert_eq!(entries.lock().unwrap()[0].severity, LogSeverity::Warn);

    Hal::reset_logger();
}
