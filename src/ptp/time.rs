//! Hardware clock time values and latency constants

use crate::internal::constants::NANOS_PER_SEC;

/// Delay from the transmit timestamp point to the wire
///
/// Add to transmit timestamps. The driver does not apply it.
pub const TX_LATENCY_NS: u32 = 10;

/// Delay from the wire to the receive timestamp point
///
/// Subtract from receive timestamps. The driver does not apply it.
pub const RX_LATENCY_NS: u32 = 210;

/// Time the PHY takes to apply a clock step
///
/// Add to the step amount before calling
/// [`Port::step_clock`](crate::driver::port::Port::step_clock).
pub const STEP_LATENCY_NS: u32 = 16;

/// A reading of the 1588 hardware clock
///
/// `nanoseconds` is below one second for every value the PHY produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PtpTime {
    /// Seconds
    pub seconds: u32,
    /// Nanoseconds within the second
    pub nanoseconds: u32,
}

impl PtpTime {
    /// Clock epoch
    pub const ZERO: Self = Self {
        seconds: 0,
        nanoseconds: 0,
    };

    /// Create a time value
    #[must_use]
    pub const fn new(seconds: u32, nanoseconds: u32) -> Self {
        Self {
            seconds,
            nanoseconds,
        }
    }

    /// Whether the nanoseconds field is below one second
    #[must_use]
    pub const fn is_normalized(&self) -> bool {
        self.nanoseconds < NANOS_PER_SEC
    }

    /// Move the time back by `ns`, borrowing seconds when needed
    ///
    /// Clamps at [`PtpTime::ZERO`] instead of wrapping below the epoch.
    #[must_use]
    pub const fn saturating_sub_nanos(self, ns: u32) -> Self {
        Self::from_total_nanos(self.total_nanos().saturating_sub(ns as u64))
    }

    /// Move the time forward by `ns`, carrying into seconds
    ///
    /// The seconds field wraps at 2^32. An unnormalised nanoseconds field is
    /// carried as well.
    #[must_use]
    pub const fn wrapping_add_nanos(self, ns: u32) -> Self {
        let total = self.nanoseconds as u64 + ns as u64;
        Self::new(
            self.seconds
                .wrapping_add((total / NANOS_PER_SEC as u64) as u32),
            (total % NANOS_PER_SEC as u64) as u32,
        )
    }

    const fn total_nanos(self) -> u64 {
        self.seconds as u64 * NANOS_PER_SEC as u64 + self.nanoseconds as u64
    }

    const fn from_total_nanos(total: u64) -> Self {
        Self::new(
            (total / NANOS_PER_SEC as u64) as u32,
            (total % NANOS_PER_SEC as u64) as u32,
        )
    }

    /// Split into the four 16-bit words the PHY exchanges, in transfer order:
    /// nanoseconds low, nanoseconds high, seconds low, seconds high
    #[must_use]
    pub const fn to_words(self) -> [u16; 4] {
        [
            self.nanoseconds as u16,
            (self.nanoseconds >> 16) as u16,
            self.seconds as u16,
            (self.seconds >> 16) as u16,
        ]
    }

    /// Assemble from words in transfer order
    #[must_use]
    pub const fn from_words(words: [u16; 4]) -> Self {
        Self {
            nanoseconds: words[0] as u32 | ((words[1] as u32) << 16),
            seconds: words[2] as u32 | ((words[3] as u32) << 16),
        }
    }
}
