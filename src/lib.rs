//! DP83848/849/640 PHY Driver
//!
//! A `no_std`, `no_alloc` driver for the Texas Instruments (National
//! Semiconductor) DP83848, DP83849 and DP83640 Ethernet PHYs, including the
//! DP83640's IEEE 1588 hardware clock and timestamping engine.
//!
//! # Architecture
//!
//! The driver is organized into four layers:
//!
//! 1. **Device Layer** ([`driver`]): Probing, identification, reset, and the
//!    [`Port`] handle every operation goes through
//! 2. **PTP Layer** ([`ptp`]): Hardware clock, triggers, events and
//!    timestamps
//! 3. **Status Frame Layer** ([`psf`]): Recognition and decoding of PHY
//!    Status Frames
//! 4. **HAL Layer** ([`hal`]): Register transports (MDIO or PHY Control
//!    Frames)
//!
//! Concurrency is handled in [`sync`]: each device has a register scope that
//! makes one register transaction (page select included) atomic, and a
//! multi-op scope that makes a sequence of them atomic.
//!
//! ## Register Addressing
//!
//! Registers are named by a paged index, `page << 5 | register`. Indices
//! 0x00-0x1F are visible on every page; the transport takes care of page
//! selection for the rest.
//!
//! # Supported PHY Chips
//!
//! - DP83848: single port
//! - DP83849: dual port
//! - DP83640: single port with IEEE 1588
//!
//! # Features
//!
//! - `defmt`: Enable defmt formatting and driver logging
//! - `smoltcp`: Enable smoltcp wire helpers for status frames
//!
//! # Example
//!
//! ```ignore
//! use ph_dp83640::{Device, PagedMdio, ProbeConfig, PtpTime};
//!
//! // Your MdioBus implementation (from the MAC driver)
//! let mdio = /* your MdioBus implementation */;
//!
//! let device = Device::probe(PagedMdio::new(mdio), 1, ProbeConfig::new())?;
//! let port = device.port(0)?;
//!
//! port.enable_clock(true)?;
//! port.set_clock(PtpTime::new(1_700_000_000, 0))?;
//!
//! let now = port.read_clock()?;
//! ```

#![no_std]
#![deny(missing_docs)]
#![deny(unsafe_code)]
// Clippy lint levels live here.
#![deny(clippy::correctness)]
#![warn(
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::cloned_instead_of_copied,
    clippy::explicit_iter_loop,
    clippy::implicit_clone,
    clippy::inconsistent_struct_constructor,
    clippy::manual_assert,
    clippy::manual_let_else,
    clippy::match_same_arms,
    clippy::needless_pass_by_value,
    clippy::semicolon_if_nothing_returned,
    clippy::uninlined_format_args,
    clippy::unnested_or_patterns,
    clippy::std_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::alloc_instead_of_core
)]
#![allow(
    clippy::mod_module_files,
    clippy::self_named_module_files,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::struct_excessive_bools,
    clippy::fn_params_excessive_bools,
    clippy::type_complexity,
    clippy::must_use_candidate,
    clippy::assertions_on_constants,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_lossless,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::module_name_repetitions,
    clippy::wildcard_imports,
    clippy::items_after_statements
)]

// =============================================================================
// Modules
// =============================================================================

pub mod driver;
pub mod hal;
pub mod psf;
pub mod ptp;
pub mod sync;

// Internal implementation details (pub(crate) only)
mod internal;

#[cfg(feature = "smoltcp")]
#[cfg_attr(docsrs, doc(cfg(feature = "smoltcp")))]
pub mod integration;

// Test utilities (only available during testing)
#[cfg(test)]
pub mod testing;

pub use driver::error;

// =============================================================================
// Re-exports
// =============================================================================

pub use driver::config::{
    ClockOutputConfig, ClockSource, ControlFrameConfig, FirstByteFilter, MiscConfig, ProbeConfig,
    PsfConfig, PsfSourceMac, ReceiveConfig, SecondsLength, TimestampLayout, TransmitConfig,
};
pub use driver::device::{
    Capabilities, Capability, Device, DeviceInfo, DeviceType, IntegrityFault, IntegrityHook,
};
pub use driver::error::{ConfigError, ConfigResult, Error, IoError, IoResult, Result};
pub use driver::port::Port;

pub use hal::{
    ControlFrameBus, ControlFrameCommand, ControlFrameLink, ControlFrameOp, MdioBus, PagedMdio,
    RegisterAccess, RegisterIndex,
};

pub use psf::{EventReport, PhyMessage, StatusFrameError, StatusMessages};
pub use ptp::{
    EventCapture, EventConfig, OverflowPolicy, PtpStatus, PtpTime, RateAdjustment, RateDirection,
    RxTimestamp, StatusQueue, TriggerArm, TriggerBehavior, TriggerStatus, TxTimestamp,
};

/// Shared driver constants.
pub mod constants {
    pub use crate::internal::constants::{
        // 1588 resources
        DUAL_WIDTH_TRIGGERS,
        MAX_GPIO,
        MAX_RATE,
        NUM_EVENTS,
        NUM_TRIGGERS,
        // Timing
        PIN_INPUT_DELAY_NS,
        RESET_POLL_INTERVAL_US,
        // Status frames
        PSF_IPV4_DEST_MAC,
        PSF_L2_DEST_MAC,
        PSF_SOURCE_MACS,
    };
    pub use crate::ptp::time::{RX_LATENCY_NS, STEP_LATENCY_NS, TX_LATENCY_NS};
}
