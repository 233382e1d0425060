//! Synchronization primitives for ISR-safe access.
//!
//! Low-level primitives used by the device's exclusion scopes.

use core::cell::RefCell;
use critical_section::Mutex;

/// Cell providing interior mutability with critical section protection.
///
/// Combines `critical_section::Mutex` with `RefCell` for safe mutable access
/// from both normal code and interrupt handlers. The cell is `Sync` whenever
/// `T` is `Send`.
pub struct CriticalSectionCell<T> {
    inner: Mutex<RefCell<T>>,
}

impl<T> CriticalSectionCell<T> {
    /// Create a new cell (const, suitable for static initialization).
    pub const fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(value)),
        }
    }

    /// Execute a closure with exclusive mutable access.
    ///
    /// Interrupts are disabled for the duration of the closure.
    ///
    /// # Panics
    ///
    /// Panics if called re-entrantly from inside another `with` on the same
    /// cell.
    #[inline]
    pub fn with<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        critical_section::with(|cs| {
            let mut value = self.inner.borrow_ref_mut(cs);
            f(&mut value)
        })
    }

    /// Consume the cell and return the value.
    pub fn into_inner(self) -> T {
        self.inner.into_inner().into_inner()
    }
}

impl<T: Copy> CriticalSectionCell<T> {
    /// Copy the current value out.
    #[inline]
    pub fn get(&self) -> T {
        critical_section::with(|cs| *self.inner.borrow_ref(cs))
    }

    /// Replace the current value.
    #[inline]
    pub fn set(&self, value: T) {
        self.with(|slot| *slot = value);
    }
}

// =============================================================================
// Claim Flag
// =============================================================================

/// Ownership flag for locks that are held across long operations.
///
/// Only the flag update runs in a critical section, so interrupts stay
/// enabled while the claim is held. A claim is not reentrant: claiming a
/// flag already held by the same context spins forever.
pub struct ClaimFlag {
    held: CriticalSectionCell<bool>,
}

impl ClaimFlag {
    /// Create an unclaimed flag.
    pub const fn new() -> Self {
        Self {
            held: CriticalSectionCell::new(false),
        }
    }

    /// Claim the flag if it is free.
    #[must_use]
    pub fn try_claim(&self) -> Option<Claim<'_>> {
        let won = self.held.with(|held| !core::mem::replace(held, true));
        won.then_some(Claim { flag: self })
    }

    /// Claim the flag, spinning until it is free.
    pub fn claim(&self) -> Claim<'_> {
        loop {
            if let Some(claim) = self.try_claim() {
                return claim;
            }
            core::hint::spin_loop();
        }
    }
}

impl Default for ClaimFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// A held [`ClaimFlag`]; dropping it releases the flag.
#[must_use = "the flag is released as soon as the claim is dropped"]
pub struct Claim<'a> {
    flag: &'a ClaimFlag,
}

impl Drop for Claim<'_> {
    fn drop(&mut self) {
        self.flag.held.set(false);
    }
}
