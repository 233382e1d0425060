//! Hardware Abstraction Layer
//!
//! Register transports for the PHY. The driver only ever talks to a
//! [`RegisterAccess`] implementation; which physical channel carries the
//! transaction is the host's choice.
//!
//! # Modules
//!
//! - [`register`]: Paged register index and the register façade trait
//! - [`mdio`]: Clause 22 MDIO bus trait and the page-selecting façade
//! - [`pcf`]: PHY control frame command encoding and façade

pub mod mdio;
pub mod pcf;
pub mod register;

// Re-export commonly used types
pub use mdio::{MdioBus, PagedMdio};
pub use pcf::{ControlFrameBus, ControlFrameCommand, ControlFrameLink, ControlFrameOp};
pub use register::{RegisterAccess, RegisterIndex};
