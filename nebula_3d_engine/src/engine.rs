//! Nebula3D Engine - process-wide context for engine subsystems
//!
//! This module provides explicit init/teardown for the engine's shared state:
//! the graphics device singleton and the logging sink. It uses thread-safe
//! static storage with RwLock for safe concurrent access.

use std::sync::{OnceLock, RwLock, Arc, Mutex};
use std::time::SystemTime;
use crate::graphics_device::GraphicsDevice;
use crate::error::{Result, Error};
use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};

// ===== INTERNAL STATE =====

/// Global engine state storage
static ENGINE_STATE: OnceLock<EngineState> = OnceLock::new();

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

/// Internal state structure holding all engine singletons
struct EngineState {
    /// Graphics device singleton (wrapped in Mutex for thread-safe mutable access)
    graphics_device: RwLock<Option<Arc<Mutex<dyn GraphicsDevice>>>>,
}

impl EngineState {
    /// Create a new empty engine state
    fn new() -> Self {
        Self {
            graphics_device: RwLock::new(None),
        }
    }
}

// ===== PUBLIC API =====

/// Main engine context manager
///
/// Manages the lifecycle of the engine's shared subsystems (graphics device,
/// logging sink) behind explicit `initialize`/`shutdown` calls.
///
/// # Example
///
/// ```no_run
/// use nebula_3d_engine::nebula3d::Engine;
/// use nebula_3d_engine_renderer_vulkan::nebula3d::VulkanGraphicsDevice;
///
/// // Initialize engine
/// Engine::initialize()?;
///
/// // Create graphics device singleton
/// Engine::create_graphics_device(VulkanGraphicsDevice::new(Default::default())?)?;
///
/// // Access the device globally
/// let device = Engine::graphics_device()?;
///
/// // Cleanup
/// Engine::shutdown();
/// # Ok::<(), nebula_3d_engine::nebula3d::Error>(())
/// ```
pub struct Engine;

impl Engine {
    /// Helper to log errors before returning them (internal use)
    ///
    /// This ensures all Engine errors are automatically logged with proper
    /// severity and source information.
    fn log_and_return_error(error: Error) -> Error {
        match &error {
            Error::InitializationFailed(msg) => {
                crate::engine_error!("nebula3d::Engine", "Initialization failed: {}", msg);
            }
            Error::BackendError(msg) => {
                crate::engine_error!("nebula3d::Engine", "Backend error: {}", msg);
            }
            _ => {
                crate::engine_error!("nebula3d::Engine", "Engine error: {}", error);
            }
        }
        error
    }

    /// Initialize the engine
    ///
    /// This must be called once at application startup before creating any
    /// subsystems. Calling it again is a no-op.
    ///
    /// # Errors
    ///
    /// Currently always succeeds, but returns Result for future extensibility.
    pub fn initialize() -> Result<()> {
        ENGINE_STATE.get_or_init(EngineState::new);
        Ok(())
    }

    /// Shutdown the entire engine and drop all singletons
    ///
    /// This should be called at application shutdown, after the graphics
    /// device has been torn down (all device handles dropped). After calling
    /// this, subsystems must be recreated before use.
    pub fn shutdown() {
        if let Some(state) = ENGINE_STATE.get() {
            if let Ok(mut device) = state.graphics_device.write() {
                *device = None;
            }
        }
    }

    /// Create and register the graphics device singleton
    ///
    /// This is a simplified API that automatically wraps the device in
    /// `Arc<Mutex<_>>` and registers it as a global singleton.
    ///
    /// # Arguments
    ///
    /// * `device` - Any type implementing the GraphicsDevice trait
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The engine is not initialized
    /// - A graphics device already exists
    /// - The device lock is poisoned
    pub fn create_graphics_device<D: GraphicsDevice + 'static>(device: D) -> Result<()> {
        // Wrap in Arc<Mutex<dyn GraphicsDevice>>
        let arc_device: Arc<Mutex<dyn GraphicsDevice>> = Arc::new(Mutex::new(device));

        // Register as singleton
        Self::register_graphics_device(arc_device)?;

        crate::engine_info!("nebula3d::Engine", "Graphics device singleton created successfully");

        Ok(())
    }

    /// Register a graphics device singleton (internal use)
    ///
    /// Called internally by create_graphics_device(). Marked pub(crate) to
    /// allow access from other modules if needed.
    pub(crate) fn register_graphics_device(device: Arc<Mutex<dyn GraphicsDevice>>) -> Result<()> {
        let state = ENGINE_STATE.get()
            .ok_or_else(|| Self::log_and_return_error(
                Error::InitializationFailed("Engine not initialized. Call Engine::initialize() first.".to_string())
            ))?;

        let mut lock = state.graphics_device.write()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("Graphics device lock poisoned".to_string())
            ))?;

        if lock.is_some() {
            return Err(Self::log_and_return_error(
                Error::InitializationFailed("Graphics device already exists. Call Engine::destroy_graphics_device() first.".to_string())
            ));
        }

        *lock = Some(device);
        Ok(())
    }

    /// Get the graphics device singleton
    ///
    /// This provides global access to the graphics device after it has been
    /// created.
    ///
    /// # Returns
    ///
    /// A shared pointer to the device wrapped in a Mutex for thread-safe access
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The engine is not initialized
    /// - The graphics device has not been created
    ///
    /// # Example
    ///
    /// ```no_run
    /// use nebula_3d_engine::nebula3d::Engine;
    ///
    /// let device = Engine::graphics_device()?;
    /// let device_guard = device.lock().unwrap();
    /// // Use device_guard...
    /// # Ok::<(), nebula_3d_engine::nebula3d::Error>(())
    /// ```
    pub fn graphics_device() -> Result<Arc<Mutex<dyn GraphicsDevice>>> {
        let state = ENGINE_STATE.get()
            .ok_or_else(|| Self::log_and_return_error(
                Error::InitializationFailed("Engine not initialized. Call Engine::initialize() first.".to_string())
            ))?;

        let lock = state.graphics_device.read()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("Graphics device lock poisoned".to_string())
            ))?;

        lock.clone()
            .ok_or_else(|| Self::log_and_return_error(
                Error::InitializationFailed("Graphics device not created. Call Engine::create_graphics_device() first.".to_string())
            ))
    }

    /// Destroy the graphics device singleton
    ///
    /// Removes the device singleton, allowing a new one to be created.
    /// Existing references remain valid until dropped; GPU teardown happens
    /// when the last handle drops, not here.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine is not initialized
    pub fn destroy_graphics_device() -> Result<()> {
        let state = ENGINE_STATE.get()
            .ok_or_else(|| Self::log_and_return_error(
                Error::InitializationFailed("Engine not initialized".to_string())
            ))?;

        let mut lock = state.graphics_device.write()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("Graphics device lock poisoned".to_string())
            ))?;

        *lock = None;

        crate::engine_info!("nebula3d::Engine", "Graphics device singleton destroyed");

        Ok(())
    }

    /// Reset all singletons for testing (only available in test builds)
    #[cfg(test)]
    pub fn reset_for_testing() {
        if let Some(state) = ENGINE_STATE.get() {
            if let Ok(mut device) = state.graphics_device.write() {
                *device = None;
            }
        }
    }

    // ===== LOGGING API =====

    /// Set a custom logger
    ///
    /// Replace the default logger with a custom implementation (file logger,
    /// capture logger for tests, etc.)
    ///
    /// # Arguments
    ///
    /// * `logger` - Any type implementing the Logger trait
    ///
    /// # Example
    ///
    /// ```no_run
    /// use nebula_3d_engine::nebula3d::{Engine, log::{Logger, LogEntry}};
    ///
    /// struct FileLogger;
    /// impl Logger for FileLogger {
    ///     fn log(&self, entry: &LogEntry) {
    ///         // Write to file...
    ///     }
    /// }
    ///
    /// Engine::set_logger(FileLogger);
    /// ```
    pub fn set_logger<L: Logger + 'static>(logger: L) {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(mut lock) = logger_lock.write() {
            *lock = Box::new(logger);
        }
    }

    /// Reset logger to default (DefaultLogger)
    pub fn reset_logger() {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(mut lock) = logger_lock.write() {
            *lock = Box::new(DefaultLogger);
        }
    }

    /// Internal logging method (for simple logs without file:line)
    ///
    /// Used by macros like engine_info!, engine_warn!, etc. Works before
    /// `initialize` - the sink is independent of engine state.
    ///
    /// # Arguments
    ///
    /// * `severity` - Log severity level
    /// * `source` - Source module (e.g., "nebula3d::Engine")
    /// * `message` - Log message
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(lock) = logger_lock.read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: None,
                line: None,
            });
        }
    }

    /// Internal logging method with file:line information (for ERROR logs)
    ///
    /// Used by the engine_error! and engine_err! macros to include source
    /// location.
    ///
    /// # Arguments
    ///
    /// * `severity` - Log severity level (typically Error)
    /// * `source` - Source module (e.g., "nebula3d::vulkan")
    /// * `message` - Log message
    /// * `file` - Source file path
    /// * `line` - Source line number
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(lock) = logger_lock.read() {
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
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
