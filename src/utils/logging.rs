//! Conditional logging macros gated on a module-level `ENABLE_LOGS` flag.
//!
//! Modules with chatty paths declare `const ENABLE_LOGS: bool = true;` and pull
//! the macros in with `use crate::{log_info, log_warn, log_error};`. Flipping
//! the const silences that module without touching call sites.

/// Info-level logging, compiled out of modules that set `ENABLE_LOGS` to false.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

/// Warn-level logging, gated the same way as [`log_info!`].
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}

/// Error-level logging, gated the same way as [`log_info!`].
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::error!($($arg)*);
        }
    };
}
