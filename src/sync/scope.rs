//! Per-device exclusion scopes
//!
//! Two scopes guard a device's register traffic:
//!
//! - The **register scope** covers one logical register transaction,
//!   including any page-select write the transport issues for it.
//! - The **multi-op scope** covers an operation made of several transactions
//!   that must not interleave with other multi-op callers (clock
//!   read/step/set, rate get/set, trigger arm, timestamp and event
//!   retrieval).
//!
//! Each device has its own pair, so devices never wait on each other.
//! Critical sections are only taken to hand the transport out and to update
//! the multi-op claim: the transport call itself, a control frame reply wait
//! or a reset poll all run with interrupts enabled.
//!
//! Neither scope is reentrant. A multi-op must not start another multi-op
//! on the same device, and a transport must not call back into its device.

use crate::error::Result;
use crate::hal::register::{RegisterAccess, RegisterIndex};
use crate::sync::primitives::{ClaimFlag, CriticalSectionCell};

/// A register transport shared between the ports of one device
pub struct RegisterScope<B> {
    /// `None` while a transaction has the transport checked out
    bus: CriticalSectionCell<Option<B>>,
    multi_op: ClaimFlag,
}

/// Transport checked out of a scope; put back on drop
struct Lease<'a, B> {
    slot: &'a CriticalSectionCell<Option<B>>,
    bus: Option<B>,
}

impl<B> Drop for Lease<'_, B> {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.take() {
            self.slot.with(|slot| *slot = Some(bus));
        }
    }
}

impl<B: RegisterAccess> RegisterScope<B> {
    /// Take ownership of a transport
    pub const fn new(bus: B) -> Self {
        Self {
            bus: CriticalSectionCell::new(Some(bus)),
            multi_op: ClaimFlag::new(),
        }
    }

    /// Read one register under the register scope
    #[inline]
    pub fn read(&self, phy_addr: u8, index: u16) -> Result<u16> {
        self.with_bus(|bus| bus.read_register(phy_addr, RegisterIndex::new(index)))
    }

    /// Write one register under the register scope
    #[inline]
    pub fn write(&self, phy_addr: u8, index: u16, value: u16) -> Result<()> {
        self.with_bus(|bus| bus.write_register(phy_addr, RegisterIndex::new(index), value))
    }

    /// Read-modify-write one register
    ///
    /// The read and the write are two register transactions; wrap the call
    /// in [`multi_op`](Self::multi_op) when other callers may touch the same
    /// register.
    pub fn modify<F>(&self, phy_addr: u8, index: u16, f: F) -> Result<u16>
    where
        F: FnOnce(u16) -> u16,
    {
        let value = f(self.read(phy_addr, index)?);
        self.write(phy_addr, index, value)?;
        Ok(value)
    }

    /// Run `f` under the multi-op scope
    ///
    /// Waits, spinning, while another caller holds this device's multi-op
    /// scope.
    #[inline]
    pub fn multi_op<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce() -> Result<R>,
    {
        let _claim = self.multi_op.claim();
        f()
    }

    /// Run `f` with the transport itself, under the register scope
    ///
    /// Waits, spinning, while another transaction has the transport.
    pub fn with_bus<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut B) -> R,
    {
        let mut lease = Lease {
            slot: &self.bus,
            bus: None,
        };
        let bus = loop {
            if let Some(bus) = self.bus.with(Option::take) {
                break bus;
            }
            core::hint::spin_loop();
        };
        f(lease.bus.insert(bus))
    }

    /// Release the transport
    pub fn into_inner(self) -> B {
        // Every lease borrows the scope and puts the transport back on drop,
        // so the slot is full once the scope is owned
        match self.bus.into_inner() {
            Some(bus) => bus,
            None => unreachable!("transport still checked out"),
        }
    }
}
