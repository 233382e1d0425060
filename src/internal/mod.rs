//! Internal Implementation Details
//!
//! Types in this module are not part of the public API and may change
//! without notice between minor versions.
//!
//! # Contents
//!
//! - [`constants`]: Internal constants and magic numbers
//! - [`phy_regs`]: Clause 22 and DP83640 paged register definitions

pub(crate) mod constants;
pub(crate) mod phy_regs;
