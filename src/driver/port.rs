//! Port handle
//!
//! A [`Port`] is one PHY inside a [`Device`]. It is the handle every 1588,
//! status frame and management operation is called on; the PTP and PSF
//! modules extend it with their own `impl` blocks.
//!
//! Ports are cheap shared borrows of the device. The configuration a port
//! must remember (status frame framing, receive timestamp layout, control
//! frame settings) is held by the device on the port's behalf, so handles
//! for the same port always agree.

use super::config::{ControlFrameConfig, PsfConfig, TimestampLayout};
use super::device::{Device, IntegrityFault, PortState};
use crate::error::{IoError, Result};
use crate::hal::register::RegisterAccess;
use crate::internal::phy_regs::dp83640::{pcfcr, reg};
use crate::internal::phy_regs::standard::{bmcr, phy_reg};

/// Handle for one port of a [`Device`]
pub struct Port<'d, B: RegisterAccess> {
    device: &'d Device<B>,
    index: u8,
    phy_addr: u8,
}

impl<'d, B: RegisterAccess> Port<'d, B> {
    pub(crate) fn new(device: &'d Device<B>, index: u8, phy_addr: u8) -> Self {
        Self {
            device,
            index,
            phy_addr,
        }
    }

    /// Index of the port within its device
    #[must_use]
    pub fn index(&self) -> u8 {
        self.index
    }

    /// MDIO address of the port
    #[must_use]
    pub fn phy_address(&self) -> u8 {
        self.phy_addr
    }

    /// The device this port belongs to
    #[must_use]
    pub fn device(&self) -> &'d Device<B> {
        self.device
    }

    // =========================================================================
    // Register Access
    // =========================================================================

    /// Read a paged register
    ///
    /// Bits 7:5 of `index` select the page; bit 15 selects the extended
    /// page set.
    pub fn read_register(&self, index: u16) -> Result<u16> {
        self.read(index)
    }

    /// Write a paged register
    pub fn write_register(&self, index: u16, value: u16) -> Result<()> {
        self.write(index, value)
    }

    /// Read-modify-write a paged register under the multi-op scope
    ///
    /// Returns the value written.
    pub fn modify_register<F>(&self, index: u16, f: F) -> Result<u16>
    where
        F: FnOnce(u16) -> u16,
    {
        self.multi_op(|| self.device.scope().modify(self.phy_addr, index, f))
    }

    #[inline]
    pub(crate) fn read(&self, index: u16) -> Result<u16> {
        self.device.scope().read(self.phy_addr, index)
    }

    #[inline]
    pub(crate) fn write(&self, index: u16, value: u16) -> Result<()> {
        self.device.scope().write(self.phy_addr, index, value)
    }

    #[inline]
    pub(crate) fn multi_op<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce() -> Result<R>,
    {
        self.device.scope().multi_op(f)
    }

    pub(crate) fn state(&self) -> PortState {
        self.device.port_state(self.index).get()
    }

    pub(crate) fn update_state<F>(&self, f: F)
    where
        F: FnOnce(&mut PortState),
    {
        self.device.port_state(self.index).with(f);
    }

    // =========================================================================
    // Remembered Configuration
    // =========================================================================

    /// Status frame configuration last applied to this port
    #[must_use]
    pub fn status_frame_config(&self) -> PsfConfig {
        self.state().psf
    }

    /// Receive timestamp layout last applied to this port
    #[must_use]
    pub fn timestamp_layout(&self) -> TimestampLayout {
        self.state().layout
    }

    /// Management interface configuration last applied to this port
    #[must_use]
    pub fn control_frame_config(&self) -> ControlFrameConfig {
        self.state().control_frames
    }

    // =========================================================================
    // Power and Management Interface
    // =========================================================================

    /// Power the port up or down
    ///
    /// A powered-down port still answers register accesses.
    pub fn set_power_mode(&self, power_on: bool) -> Result<()> {
        self.modify_register(phy_reg::BMCR, |value| {
            if power_on {
                value & !bmcr::POWER_DOWN
            } else {
                value | bmcr::POWER_DOWN
            }
        })?;
        Ok(())
    }

    /// Enable or disable register access over PHY control frames
    ///
    /// Enabling writes the whole of PCFCR. Disabling clears only the enable
    /// bit and leaves the rest of the register alone.
    pub fn set_management_interface(&self, config: ControlFrameConfig) -> Result<()> {
        config.validate()?;

        if config.enabled {
            self.write(reg::PCFCR, config.pcfcr())?;
        } else {
            self.modify_register(reg::PCFCR, |value| value & !pcfcr::PCF_EN)?;
        }
        self.update_state(|state| state.control_frames = config);

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "PHY {} control frames {}",
            self.phy_addr,
            if config.enabled { "enabled" } else { "disabled" }
        );
        Ok(())
    }

    /// Check the outcome of the last control frame
    ///
    /// Returns whether the PHY accepted it. A checksum failure is a
    /// hardware integrity fault: the device's
    /// [`IntegrityHook`](super::device::IntegrityHook) is notified and
    /// `IoError::ChecksumMismatch` is returned.
    pub fn control_frame_status(&self) -> Result<bool> {
        let status = self.read(reg::PCFCR)?;
        if status & pcfcr::STS_ERR != 0 {
            self.device.notify_integrity_fault(IntegrityFault {
                phy_addr: self.phy_addr,
                status,
            });
            return Err(IoError::ChecksumMismatch.into());
        }
        Ok(status & pcfcr::STS_OK != 0)
    }

    /// Status frames for register reads, then control frames on
    pub(crate) fn bring_up_control_frames(&self) -> Result<()> {
        self.set_status_frame_config(PsfConfig::control_frame_default())?;
        self.set_management_interface(ControlFrameConfig::enabled())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
