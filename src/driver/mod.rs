//! Core driver components for the DP83848/849/640 PHY family.
//!
//! - [`config`] - Configuration types and builder patterns
//! - [`device`] - Probing, identification and reset of a PHY package
//! - [`port`] - Per-port handle that every register operation goes through
//! - [`error`] - Error types and result aliases
//!
//! # Example
//!
//! ```ignore
//! use ph_dp83640::driver::{Device, ProbeConfig};
//!
//! let device = Device::probe(PagedMdio::new(mdio), 1, ProbeConfig::new())?;
//! let port = device.port(0)?;
//! ```

// Submodules
pub mod config;
pub mod device;
pub mod error;
pub mod port;

// Re-exports for convenience
pub use config::{
    ClockOutputConfig, ClockSource, ControlFrameConfig, FirstByteFilter, MiscConfig, ProbeConfig,
    PsfConfig, PsfSourceMac, ReceiveConfig, SecondsLength, TimestampLayout, TransmitConfig,
};
pub use device::{
    Capabilities, Capability, Device, DeviceInfo, DeviceType, IntegrityFault, IntegrityHook,
    MAX_PORTS,
};
pub use error::{ConfigError, ConfigResult, Error, IoError, IoResult, Result};
pub use port::Port;
