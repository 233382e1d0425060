//! IEEE 1588 Hardware Clock
//!
//! Operations on the DP83640's 1588 clock and its timestamping engine. Each
//! submodule adds methods to [`Port`](crate::driver::port::Port):
//!
//! - [`clock`]: enable, read, set, step and rate-adjust the clock, clock
//!   output and miscellaneous 1588 settings
//! - [`trigger`]: the eight GPIO output triggers
//! - [`event`]: the eight GPIO input event timestampers
//! - [`timestamp`]: transmit and receive timestamp FIFOs, and timestamps
//!   inserted into received frames
//!
//! and supporting types:
//!
//! - [`time`]: [`PtpTime`] and latency constants
//! - [`hash`]: the PHY's sourcePortIdentity hash
//! - [`queue`]: a bounded queue for decoded status
//!
//! Only the DP83640 has the 1588 block; on other parts these registers do
//! not exist.

pub mod clock;
pub mod event;
pub mod hash;
pub mod queue;
pub mod time;
pub mod timestamp;
pub mod trigger;

pub use clock::{RateAdjustment, RateDirection};
pub use event::{EventCapture, EventConfig, PtpStatus};
pub use hash::source_id_hash;
pub use queue::{OverflowPolicy, StatusQueue};
pub use time::PtpTime;
pub use timestamp::{RxTimestamp, TxTimestamp};
pub use trigger::{TriggerArm, TriggerBehavior, TriggerStatus};
