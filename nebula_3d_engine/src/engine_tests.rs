//! Unit tests for the Engine context manager
//!
//! Tests initialization, graphics device management, and logging APIs.
//!
//! IMPORTANT: ENGINE_STATE is a global OnceLock shared across all tests.
//! All tests are marked with #[serial] to run sequentially and avoid RwLock
//! poisoning.

use crate::nebula3d::{Engine, Error};
use crate::graphics_device::mock_graphics_device::MockGraphicsDevice;
use crate::nebula3d::log::{Logger, LogEntry, LogSeverity};
use std::sync::{Arc, Mutex};
use serial_test::serial;

// ============================================================================
// TEST HELPERS
// ============================================================================

/// Test logger that captures log entries for verification
struct TestLogger {
    entries: Arc<Mutex<Vec<String>>>,
}

impl TestLogger {
    fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        let mut entries = self.entries.lock().unwrap();
        entries.push(format!("{:?}: {}", entry.severity, entry.message));
    }
}

/// Setup function to reset engine state before each test
///
/// Note: ENGINE_STATE is a OnceLock, so once initialized it stays initialized.
/// We always call initialize() (idempotent) and use reset_for_testing() to
/// clear the registered device.
fn setup() {
    Engine::reset_for_testing();
    let _ = Engine::initialize(); // Always initialize (idempotent)
}

// ============================================================================
// INITIALIZATION AND SHUTDOWN TESTS
// ============================================================================

#[test]
#[serial]
fn test_engine_initialize() {
    setup();
    // Initialize is idempotent, so calling it again should succeed
    let result = Engine::initialize();
    assert!(result.is_ok());
}

#[test]
#[serial]
fn test_multiple_initialize_calls_idempotent() {
    setup();

    Engine::initialize().unwrap();
    Engine::initialize().unwrap();
    Engine::initialize().unwrap();

    // Engine should still work normally
    let result = Engine::create_graphics_device(MockGraphicsDevice::new());
    assert!(result.is_ok());
}

#[test]
#[serial]
fn test_shutdown_clears_graphics_device() {
    setup();

    Engine::create_graphics_device(MockGraphicsDevice::new()).unwrap();
    assert!(Engine::graphics_device().is_ok());

    Engine::shutdown();

    // Device should not exist after shutdown
    assert!(Engine::graphics_device().is_err());

    // Re-initialize for next tests
    Engine::initialize().unwrap();
}

#[test]
#[serial]
fn test_shutdown_idempotent() {
    setup();

    // Multiple shutdown calls should be safe
    Engine::shutdown();
    Engine::shutdown();
    Engine::shutdown();

    // Re-initialize for next tests
    Engine::initialize().unwrap();
}

#[test]
#[serial]
fn test_reset_for_testing() {
    setup();

    Engine::create_graphics_device(MockGraphicsDevice::new()).unwrap();

    // Reset should clear everything
    Engine::reset_for_testing();

    assert!(Engine::graphics_device().is_err());
}

// ============================================================================
// GRAPHICS DEVICE API TESTS
// ============================================================================

#[test]
#[serial]
fn test_create_graphics_device_success() {
    setup();

    let result = Engine::create_graphics_device(MockGraphicsDevice::new());
    assert!(result.is_ok());
}

#[test]
#[serial]
fn test_create_graphics_device_duplicate_fails() {
    setup();

    Engine::create_graphics_device(MockGraphicsDevice::new()).unwrap();

    // Creating a second device should fail
    let result = Engine::create_graphics_device(MockGraphicsDevice::new());
    assert!(result.is_err());
    match result {
        Err(Error::InitializationFailed(msg)) => {
            assert!(msg.contains("already exists"));
        }
        _ => panic!("Expected InitializationFailed error"),
    }
}

#[test]
#[serial]
fn test_graphics_device_retrieval_success() {
    setup();

    Engine::create_graphics_device(MockGraphicsDevice::new()).unwrap();

    let first = Engine::graphics_device().unwrap();
    let second = Engine::graphics_device().unwrap();

    // Should be the same Arc (same pointer)
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
#[serial]
fn test_graphics_device_not_created_fails() {
    setup();
    // Don't create a device

    let result = Engine::graphics_device();
    assert!(result.is_err());
    match result {
        Err(Error::InitializationFailed(msg)) => {
            assert!(msg.contains("not created"));
        }
        _ => panic!("Expected InitializationFailed error"),
    }
}

#[test]
#[serial]
fn test_destroy_graphics_device_success() {
    setup();

    Engine::create_graphics_device(MockGraphicsDevice::new()).unwrap();
    assert!(Engine::graphics_device().is_ok());

    let result = Engine::destroy_graphics_device();
    assert!(result.is_ok());

    assert!(Engine::graphics_device().is_err());
}

#[test]
#[serial]
fn test_graphics_device_lifecycle() {
    setup();

    // Create, destroy, create again cycle
    Engine::create_graphics_device(MockGraphicsDevice::new()).unwrap();
    Engine::destroy_graphics_device().unwrap();

    // Should be able to create again
    let result = Engine::create_graphics_device(MockGraphicsDevice::new());
    assert!(result.is_ok());
}

#[test]
#[serial]
fn test_graphics_device_returned_is_usable() {
    setup();

    Engine::create_graphics_device(MockGraphicsDevice::new()).unwrap();

    let device = Engine::graphics_device().unwrap();

    // Lock the device (simulates actual usage)
    let _guard = device.lock().unwrap();
    // If we get here without panic, the device is usable
}

#[test]
#[serial]
fn test_error_messages_logged() {
    setup();

    let test_logger = TestLogger::new();
    let entries_ref = test_logger.entries.clone();
    Engine::set_logger(test_logger);

    // Trigger log_and_return_error() via a duplicate device registration
    let _ = Engine::create_graphics_device(MockGraphicsDevice::new());
    let result = Engine::create_graphics_device(MockGraphicsDevice::new());
    assert!(result.is_err());

    // Error should have been logged
    let entries = entries_ref.lock().unwrap();
    assert!(entries.iter().any(|e| e.contains("Error")));
    assert!(entries.iter().any(|e| e.contains("already exists")));

    drop(entries);
    Engine::reset_logger();
}

// ============================================================================
// LOGGING API TESTS
// ============================================================================

#[test]
#[serial]
fn test_default_logger_logs_without_panic() {
    setup();

    // Default logger should work without explicit setup
    Engine::log(LogSeverity::Info, "test", "Test message".to_string());
    Engine::log(LogSeverity::Error, "test", "Error message".to_string());
    Engine::log(LogSeverity::Warn, "test", "Warning message".to_string());

    // If we get here without panic, logging works
}

#[test]
#[serial]
fn test_set_custom_logger() {
    setup();

    let test_logger = TestLogger::new();
    let entries_ref = test_logger.entries.clone();

    Engine::set_logger(test_logger);

    // Log some messages
    Engine::log(LogSeverity::Info, "test", "Message 1".to_string());
    Engine::log(LogSeverity::Warn, "test", "Message 2".to_string());

    // Verify messages were captured
    {
        let entries = entries_ref.lock().unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].contains("Info"));
        assert!(entries[0].contains("Message 1"));
        assert!(entries[1].contains("Warn"));
        assert!(entries[1].contains("Message 2"));
    }

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_reset_logger_to_default() {
    setup();

    // Set custom logger
    let test_logger = TestLogger::new();
    let entries_ref = test_logger.entries.clone();
    Engine::set_logger(test_logger);

    // Reset to default
    Engine::reset_logger();

    // Log a message
    Engine::log(LogSeverity::Info, "test", "After reset".to_string());

    // Custom logger should NOT receive this message (default logger is active)
    let entries = entries_ref.lock().unwrap();
    assert_eq!(entries.len(), 0);
}

#[test]
#[serial]
fn test_log_detailed_with_file_line() {
    setup();

    let test_logger = TestLogger::new();
    let entries_ref = test_logger.entries.clone();
    Engine::set_logger(test_logger);

    Engine::log_detailed(
        LogSeverity::Error,
        "nebula3d::test",
        "Detailed error".to_string(),
        "test.rs",
        42,
    );

    // Verify message was logged
    {
        let entries = entries_ref.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].contains("Error"));
        assert!(entries[0].contains("Detailed error"));
    }

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_custom_logger_receives_all_severities() {
    setup();

    let test_logger = TestLogger::new();
    let entries_ref = test_logger.entries.clone();
    Engine::set_logger(test_logger);

    Engine::log(LogSeverity::Trace, "test", "Trace".to_string());
    Engine::log(LogSeverity::Debug, "test", "Debug".to_string());
    Engine::log(LogSeverity::Info, "test", "Info".to_string());
    Engine::log(LogSeverity::Warn, "test", "Warn".to_string());
    Engine::log(LogSeverity::Error, "test", "Error".to_string());

    {
        let entries = entries_ref.lock().unwrap();
        assert_eq!(entries.len(), 5);
    }

    Engine::reset_logger();
}

// ============================================================================
// INTEGRATION TESTS
// ============================================================================

#[test]
#[serial]
fn test_full_engine_lifecycle() {
    setup();

    // Create device
    Engine::create_graphics_device(MockGraphicsDevice::new()).unwrap();
    let device = Engine::graphics_device().unwrap();

    // Use device
    let _guard = device.lock().unwrap();
    drop(_guard);

    // Cleanup
    Engine::destroy_graphics_device().unwrap();
    Engine::shutdown();

    // Re-initialize for next tests
    Engine::initialize().unwrap();
}

#[test]
#[serial]
fn test_concurrent_device_access() {
    setup();

    Engine::create_graphics_device(MockGraphicsDevice::new()).unwrap();
    let device = Engine::graphics_device().unwrap();

    // Spawn multiple threads accessing the same device
    let handles: Vec<_> = (0..5)
        .map(|i| {
            let device_clone = device.clone();
            std::thread::spawn(move || {
                for _ in 0..10 {
                    let _guard = device_clone.lock().unwrap();
                    // Simulate some work
                    std::thread::sleep(std::time::Duration::from_micros(1));
                }
                i
            })
        })
        .collect();

    // Wait for all threads
    for handle in handles {
        handle.join().unwrap();
    }

    // If we get here without deadlock or panic, concurrent access works
}
