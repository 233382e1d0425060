//! MDIO (Management Data Input/Output) HAL
//!
//! [`MdioBus`] is the raw Clause 22 transport supplied by the host (a MAC's
//! SMI block, a bit-banged pair of GPIOs, a USB bridge). [`PagedMdio`] layers
//! the DP83640 page-select protocol on top of it and implements
//! [`RegisterAccess`].

use crate::error::{ConfigError, Result};
use crate::hal::register::{RegisterAccess, RegisterIndex};

// =============================================================================
// MDIO Constants
// =============================================================================

/// Maximum valid PHY address (5-bit field)
pub const MAX_PHY_ADDR: u8 = 31;

// =============================================================================
// MDIO Bus Trait
// =============================================================================

/// Trait for MDIO bus operations
///
/// This trait can be implemented by different backends, allowing the driver
/// to work with any MDIO implementation.
pub trait MdioBus {
    /// Read a PHY register
    fn read(&mut self, phy_addr: u8, reg_addr: u8) -> Result<u16>;

    /// Write a PHY register
    fn write(&mut self, phy_addr: u8, reg_addr: u8, value: u16) -> Result<()>;
}

// =============================================================================
// Paged MDIO
// =============================================================================

/// Register façade over a Clause 22 MDIO bus
///
/// Registers above PAGESEL are reached by first writing the page number to
/// PAGESEL and then accessing the register within the page. The two writes
/// are sequential transactions issued from one call; the device's register
/// scope keeps other traffic out from between them.
#[derive(Debug)]
pub struct PagedMdio<M> {
    mdio: M,
}

impl<M: MdioBus> PagedMdio<M> {
    /// Wrap an MDIO bus
    pub const fn new(mdio: M) -> Self {
        Self { mdio }
    }

    /// Borrow the underlying bus
    pub fn inner(&self) -> &M {
        &self.mdio
    }

    /// Mutably borrow the underlying bus
    pub fn inner_mut(&mut self) -> &mut M {
        &mut self.mdio
    }

    /// Release the underlying bus
    pub fn into_inner(self) -> M {
        self.mdio
    }

    fn select_page(&mut self, phy_addr: u8, index: RegisterIndex) -> Result<()> {
        let pagesel = index.page_select();
        self.mdio
            .write(phy_addr, pagesel.register(), index.page_select_value())
    }

    fn check_addr(phy_addr: u8) -> Result<()> {
        if phy_addr > MAX_PHY_ADDR {
            return Err(ConfigError::InvalidPhyAddress.into());
        }
        Ok(())
    }
}

impl<M: MdioBus> RegisterAccess for PagedMdio<M> {
    fn read_register(&mut self, phy_addr: u8, index: RegisterIndex) -> Result<u16> {
        Self::check_addr(phy_addr)?;
        if index.needs_page_select() {
            self.select_page(phy_addr, index)?;
        }
        self.mdio.read(phy_addr, index.register())
    }

    fn write_register(&mut self, phy_addr: u8, index: RegisterIndex, value: u16) -> Result<()> {
        Self::check_addr(phy_addr)?;
        if index.needs_page_select() {
            self.select_page(phy_addr, index)?;
        }
        self.mdio.write(phy_addr, index.register(), value)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
