//! Logging abstraction
//!
//! Provides unified logging macros for the crate. Every macro forwards to
//! the [`log`] facade; which backend (if any) receives the records is up to
//! the application, the library never installs a logger.
//!
//! The facade is re-exported here so the macros expand correctly in crates
//! that do not depend on `log` themselves.
//!
//! ```
//! rt_taskmon::log_info!("task {} released", 3);
//! ```

#[doc(hidden)]
pub use log;

/// Log error message
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        $crate::core::logging::log::error!(target: "rt_taskmon", $($arg)*);
    }};
}

/// Log warning message
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        $crate::core::logging::log::warn!(target: "rt_taskmon", $($arg)*);
    }};
}

/// Log informational message
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        $crate::core::logging::log::info!(target: "rt_taskmon", $($arg)*);
    }};
}

/// Log debug message
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        $crate::core::logging::log::debug!(target: "rt_taskmon", $($arg)*);
    }};
}

/// Log trace message
#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => {{
        $crate::core::logging::log::trace!(target: "rt_taskmon", $($arg)*);
    }};
}
