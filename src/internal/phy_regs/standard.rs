//! IEEE 802.3 PHY Register Definitions
//!
//! The Clause 22 registers this driver touches, plus the identifier values
//! used to recognise the DP83848/849/640 family.
//!
//! | Register | Name | Description |
//! |----------|------|-------------|
//! | 0 | BMCR | Basic Mode Control |
//! | 2 | PHYIDR1 | PHY Identifier 1 |
//! | 3 | PHYIDR2 | PHY Identifier 2 |

// =============================================================================
// Standard PHY Register Addresses
// =============================================================================

/// Standard PHY register addresses (IEEE 802.3 Clause 22)
pub mod phy_reg {
    /// Basic Mode Control Register
    pub const BMCR: u16 = 0;
    /// PHY Identifier 1
    pub const PHYIDR1: u16 = 2;
    /// PHY Identifier 2
    pub const PHYIDR2: u16 = 3;
}

// =============================================================================
// BMCR - Basic Mode Control Register (Register 0)
// =============================================================================

/// BMCR (Basic Mode Control Register) bits
pub mod bmcr {
    /// Soft reset - self-clearing
    pub const RESET: u16 = 1 << 15;
    /// Power down
    pub const POWER_DOWN: u16 = 1 << 11;
}

// =============================================================================
// PHYIDR1 / PHYIDR2
// =============================================================================

/// PHY identifier fields
pub mod phy_id {
    /// National Semiconductor OUI as it appears in PHYIDR1
    pub const NATIONAL_OUI: u16 = 0x2000;
    /// Model number mask in PHYIDR2
    pub const MODEL_MASK: u16 = 0x03F0;
    /// Model number shift in PHYIDR2
    pub const MODEL_SHIFT: u16 = 4;
    /// Revision mask in PHYIDR2
    pub const REVISION_MASK: u16 = 0x000F;

    /// DP83848 (masked PHYIDR2 model field)
    pub const MODEL_DP83848: u16 = 0x0090;
    /// DP83848 mini package
    pub const MODEL_DP83848_MINI: u16 = 0x00C0;
    /// DP83849 dual port
    pub const MODEL_DP83849: u16 = 0x00A0;
    /// DP83640 precision PHYTER
    pub const MODEL_DP83640: u16 = 0x00E0;
}
