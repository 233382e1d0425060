//! Error types for the DP83640 driver
//!
//! Errors are organized by domain for better diagnostics:
//! - [`ConfigError`]: Identification and configuration failures
//! - [`IoError`]: Register transport and integrity failures
//!
//! The unified [`Error`] enum wraps both and is returned by most driver
//! methods.
//!
//! Protocol-level conditions are values, not errors: a late trigger is a
//! [`TriggerStatus`](crate::ptp::TriggerStatus), queue overflow is an
//! `overflow` count on the next timestamp, and a foreign frame is `None`
//! from status frame recognition.

// =============================================================================
// Configuration Errors
// =============================================================================

/// Configuration and identification errors
///
/// Raised before any register is touched when a parameter does not fit its
/// hardware field, or during probe when the device is not recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Invalid configuration parameter (value does not fit its field)
    InvalidConfig,
    /// Invalid PHY address (must be 0-31)
    InvalidPhyAddress,
    /// Port index beyond the device's port count
    InvalidPort,
    /// Trigger number out of range (must be 0-7)
    InvalidTrigger,
    /// Event number out of range (must be 0-7)
    InvalidEvent,
    /// GPIO connection out of range (must be 0-12)
    InvalidGpio,
    /// PHYIDR1 did not carry the expected OUI
    UnsupportedDevice,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ConfigError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConfigError::InvalidConfig => "invalid configuration",
            ConfigError::InvalidPhyAddress => "invalid PHY address",
            ConfigError::InvalidPort => "invalid port index",
            ConfigError::InvalidTrigger => "invalid trigger number",
            ConfigError::InvalidEvent => "invalid event number",
            ConfigError::InvalidGpio => "invalid GPIO connection",
            ConfigError::UnsupportedDevice => "unsupported device",
        }
    }
}

// =============================================================================
// I/O Errors
// =============================================================================

/// Register transport and integrity errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IoError {
    /// Operation timed out
    Timeout,
    /// PHY communication error (MDIO or control frame failure)
    PhyError,
    /// Buffer too small for the requested field
    BufferTooSmall,
    /// The PHY rejected a control frame checksum
    ChecksumMismatch,
}

impl core::fmt::Display for IoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl IoError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            IoError::Timeout => "operation timed out",
            IoError::PhyError => "PHY communication error",
            IoError::BufferTooSmall => "buffer too small",
            IoError::ChecksumMismatch => "control frame checksum mismatch",
        }
    }
}

// =============================================================================
// Unified Error Type
// =============================================================================

/// This enum wraps all domain-specific errors for unified error handling.
///
/// Match on the inner domain error for specific handling:
/// ```ignore
/// match result {
///     Err(Error::Config(ConfigError::InvalidTrigger)) => { /* ... */ }
///     Err(Error::Io(IoError::ChecksumMismatch)) => { /* ... */ }
///     _ => {}
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Configuration error
    Config(ConfigError),
    /// I/O error
    Io(IoError),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Config(e) => write!(f, "config: {}", e.as_str()),
            Error::Io(e) => write!(f, "io: {}", e.as_str()),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<IoError> for Error {
    fn from(e: IoError) -> Self {
        Error::Io(e)
    }
}

/// Result type alias for driver operations
pub type Result<T> = core::result::Result<T, Error>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = core::result::Result<T, ConfigError>;

/// Result type alias for I/O operations
pub type IoResult<T> = core::result::Result<T, IoError>;

// =============================================================================
// Unit Tests
// =============================================================================
