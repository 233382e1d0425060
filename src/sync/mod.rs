//! Synchronization and Concurrency Support
//!
//! - **Primitives** (`primitives`): [`CriticalSectionCell`], ISR-safe
//!   interior mutability, and [`ClaimFlag`], an ownership flag held across
//!   long operations with interrupts enabled
//! - **Scopes** (`scope`): [`RegisterScope`], the per-device register and
//!   multi-op exclusion scopes
//!
//! The critical-section implementation is supplied by the platform (a HAL
//! crate on target, the `std` feature of `critical-section` on host).
//!
//! # Example
//!
//! ```ignore
//! use ph_dp83640::sync::RegisterScope;
//!
//! let scope = RegisterScope::new(PagedMdio::new(mdio));
//! let (lo, hi) = scope.multi_op(|| {
//!     let lo = scope.read(0, 0x98)?;
//!     let hi = scope.read(0, 0x99)?;
//!     Ok((lo, hi))
//! })?;
//! ```

mod primitives;
mod scope;

pub use primitives::{Claim, ClaimFlag, CriticalSectionCell};
pub use scope::RegisterScope;
