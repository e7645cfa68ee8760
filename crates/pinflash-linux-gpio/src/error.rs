//! Error types for the Linux GPIO backend

use thiserror::Error;

/// Errors raised while opening the GPIO lines.
///
/// Once the lines are requested, per-pin I/O failures are logged rather
/// than returned: a lost edge mid-transfer is not recoverable anyway.
#[derive(Debug, Error)]
pub enum LinuxGpioError {
    /// No GPIO chip device path was given.
    #[error("no GPIO chip specified, expected a /dev/gpiochipN path")]
    NoDevice,

    /// No line offsets were given.
    #[error("no GPIO lines specified")]
    NoLines,

    /// Requesting the GPIO lines from the kernel failed.
    #[error("failed to request GPIO lines: {0}")]
    LineRequestFailed(#[source] gpiocdev::Error),
}

/// Result type for Linux GPIO operations
pub type Result<T> = std::result::Result<T, LinuxGpioError>;
