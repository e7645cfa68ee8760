//! Error types for pinflash-core
//!
//! A closed, no_std compatible error type. Rejection errors (`Busy`,
//! `AddressInvalid`) are raised before any bus activity; `Timeout` means a
//! command was issued but the busy-poll budget ran out before the chip
//! reported ready.

use core::fmt;

/// Core error type - no_std compatible, Copy for efficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A register write did not stick. Reserved for status register
    /// programming; the current command set never reports it.
    WriteRegFailed,
    /// The busy-poll budget was exhausted while waiting for an erase or
    /// program to complete.
    Timeout,
    /// A previous erase or program is still in progress.
    Busy,
    /// Quad I/O was requested but the quad enable bit is not set. Reserved;
    /// the single-I/O command set never reports it.
    QuadNotEnabled,
    /// The target address lies beyond the chip capacity.
    AddressInvalid,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WriteRegFailed => write!(f, "register write failed"),
            Self::Timeout => write!(f, "busy-poll budget exhausted"),
            Self::Busy => write!(f, "a previous operation is still in progress"),
            Self::QuadNotEnabled => write!(f, "quad mode is not enabled"),
            Self::AddressInvalid => write!(f, "address beyond chip capacity"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type alias using the core Error type
pub type Result<T> = core::result::Result<T, Error>;
