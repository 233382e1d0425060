//! Register access façade
//!
//! Every driver operation names registers by a 16-bit [`RegisterIndex`].
//! The page lives in the index itself, so callers never issue page-select
//! writes; the transport behind [`RegisterAccess`] decides how the page
//! reaches the PHY (a separate page-select transaction over MDIO, or a field
//! of the command word over control frames).

use crate::error::Result;
use crate::internal::phy_regs::dp83640::reg;

// =============================================================================
// Register Index
// =============================================================================

/// A paged register index
///
/// | Bits | Meaning |
/// |------|---------|
/// | 15 | Extended page set |
/// | 7:5 | Page |
/// | 4:0 | Register within the page |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterIndex(u16);

impl RegisterIndex {
    /// Extended page set flag
    pub const EXTENDED: u16 = 1 << 15;
    /// Page field mask
    pub const PAGE_MASK: u16 = 0x00E0;
    /// Page field shift
    pub const PAGE_SHIFT: u16 = 5;
    /// Register field mask
    pub const REGISTER_MASK: u16 = 0x001F;

    /// Wrap a raw index
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    /// Raw 16-bit index
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Page number (0-7)
    pub const fn page(self) -> u8 {
        ((self.0 & Self::PAGE_MASK) >> Self::PAGE_SHIFT) as u8
    }

    /// Clause 22 register address within the page
    pub const fn register(self) -> u8 {
        (self.0 & Self::REGISTER_MASK) as u8
    }

    /// Whether the index belongs to the extended page set
    pub const fn is_extended(self) -> bool {
        self.0 & Self::EXTENDED != 0
    }

    /// Whether reaching this register over MDIO needs a page-select write
    ///
    /// Registers at or below PAGESEL are visible from every page.
    pub const fn needs_page_select(self) -> bool {
        (self.0 & !Self::EXTENDED) > reg::PAGESEL
    }

    /// The page-select register of this index's page set
    pub const fn page_select(self) -> Self {
        Self(reg::PAGESEL | (self.0 & Self::EXTENDED))
    }

    /// Page-select value for this index
    pub const fn page_select_value(self) -> u16 {
        (self.0 & Self::PAGE_MASK) >> Self::PAGE_SHIFT
    }
}

impl From<u16> for RegisterIndex {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

// =============================================================================
// Register Access Trait
// =============================================================================

/// Single-register transactions on a paged PHY
///
/// One call is one logical register transaction, even when the transport
/// needs two physical accesses to perform it. The caller (the device's
/// register-access scope) guarantees that nothing interleaves with it.
pub trait RegisterAccess {
    /// Read a register
    fn read_register(&mut self, phy_addr: u8, index: RegisterIndex) -> Result<u16>;

    /// Write a register
    fn write_register(&mut self, phy_addr: u8, index: RegisterIndex, value: u16) -> Result<()>;
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_splits_page_and_register() {
        let index = RegisterIndex::new(reg::PTP_CTL);
        assert_eq!(index.page(), 4);
        assert_eq!(index.register(), 0x14);

        let index = RegisterIndex::new(reg::PTP_RXHASH);
        assert_eq!(index.page(), 6);
        assert_eq!(index.register(), 0x1F);
    }

    #[test]
    fn low_registers_do_not_need_page_select() {
        assert!(!RegisterIndex::new(0x00).needs_page_select());
        assert!(!RegisterIndex::new(reg::PAGESEL).needs_page_select());
        assert!(RegisterIndex::new(reg::PHYCR2).needs_page_select());
        assert!(RegisterIndex::new(reg::PTP_TDR).needs_page_select());
    }

    #[test]
    fn extended_flag_is_carried_to_page_select() {
        let index = RegisterIndex::new(RegisterIndex::EXTENDED | 0xB4);
        assert!(index.is_extended());
        assert!(index.needs_page_select());
        assert_eq!(
            index.page_select().raw(),
            RegisterIndex::EXTENDED | reg::PAGESEL
        );
        assert_eq!(index.page_select_value(), 5);
        assert!(!index.page_select().needs_page_select());
    }
}
