//! Event capture and PTP status polling
//!
//! Eight event units timestamp edges on GPIO inputs. Captures queue up in
//! the PHY and are drained one report at a time with [`Port::next_event`].
//! Edges that arrive at the same clock tick are bundled into one report,
//! so a report carries a mask of events rather than a single number.
//!
//! Reported times are compensated for the input pin delay
//! ([`PIN_INPUT_DELAY_NS`]).

use super::time::PtpTime;
use crate::driver::config::check_gpio;
use crate::driver::port::Port;
use crate::error::{ConfigError, ConfigResult, Result};
use crate::hal::register::RegisterAccess;
use crate::internal::constants::{NUM_EVENTS, PIN_INPUT_DELAY_NS};
use crate::internal::phy_regs::dp83640::{ptp_edata, ptp_ests, ptp_evnt, ptp_sts, reg};

/// Check an event number
pub(crate) const fn check_event(event: u8) -> ConfigResult<()> {
    if event >= NUM_EVENTS {
        return Err(ConfigError::InvalidEvent);
    }
    Ok(())
}

// =============================================================================
// Status
// =============================================================================

/// Pending work reported by PTP_STS
///
/// Poll before draining timestamps or events; the getters do not check
/// for themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PtpStatus {
    /// A transmit timestamp is waiting
    pub tx_timestamp: bool,
    /// A receive timestamp is waiting
    pub rx_timestamp: bool,
    /// A trigger with notification enabled has completed
    pub trigger_done: bool,
    /// An event report is waiting
    pub event: bool,
}

impl PtpStatus {
    /// Decode PTP_STS
    #[must_use]
    pub const fn from_raw(sts: u16) -> Self {
        Self {
            tx_timestamp: sts & ptp_sts::TXTS_RDY != 0,
            rx_timestamp: sts & ptp_sts::RXTS_RDY != 0,
            trigger_done: sts & ptp_sts::TRIG_DONE != 0,
            event: sts & ptp_sts::EVENT_RDY != 0,
        }
    }

    /// Nothing pending
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !(self.tx_timestamp || self.rx_timestamp || self.trigger_done || self.event)
    }
}

// =============================================================================
// Event Types
// =============================================================================

/// Edge detection settings for one event unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EventConfig {
    /// Input GPIO (0 disconnects the unit)
    pub gpio: u8,
    /// Capture rising edges
    pub rise: bool,
    /// Capture falling edges
    pub fall: bool,
    /// Capture once, then stop
    pub single: bool,
}

impl EventConfig {
    /// Capture both edges on `gpio` continuously
    #[must_use]
    pub const fn both_edges(gpio: u8) -> Self {
        Self {
            gpio,
            rise: true,
            fall: true,
            single: false,
        }
    }

    /// Select the edges to capture
    #[must_use]
    pub const fn with_edges(mut self, rise: bool, fall: bool) -> Self {
        self.rise = rise;
        self.fall = fall;
        self
    }

    /// Single-shot capture
    #[must_use]
    pub const fn with_single(mut self, single: bool) -> Self {
        self.single = single;
        self
    }

    /// Edge bits of PTP_EVNT
    #[must_use]
    pub const fn edge_bits(&self) -> u16 {
        let mut reg = 0;
        if self.rise {
            reg |= ptp_evnt::RISE;
        }
        if self.fall {
            reg |= ptp_evnt::FALL;
        }
        if self.single {
            reg |= ptp_evnt::SINGLE;
        }
        reg
    }
}

/// One event report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EventCapture {
    /// Events captured at `time`, bit `n` for event `n`
    pub events: u8,
    /// Rising edge flags, bit `n` for event `n`
    pub rising: u8,
    /// Capture time, compensated for the input delay
    pub time: PtpTime,
    /// Reports lost to queue overflow before this one (0-7)
    pub missed: u8,
}

/// Split event status bits into (events, rising) masks
///
/// `status` is the PTP_ESTS value (or the status bits of a status frame
/// event message). `extended` is the extended status word that follows it
/// when several events fired together.
#[must_use]
pub const fn event_masks(status: u16, extended: Option<u16>) -> (u8, u8) {
    match extended {
        Some(word) => {
            let mut events = 0u8;
            let mut rising = 0u8;
            let mut n = 0;
            while n < NUM_EVENTS {
                let pair = word >> (n as u16 * ptp_edata::BITS_PER_EVENT);
                if pair & ptp_edata::DET != 0 {
                    events |= 1 << n;
                }
                if pair & ptp_edata::RISE != 0 {
                    rising |= 1 << n;
                }
                n += 1;
            }
            (events, rising)
        }
        None => {
            let n = (status & ptp_ests::EVNT_NUM_MASK) >> ptp_ests::EVNT_NUM_SHIFT;
            let rising = if status & ptp_ests::EVNT_RF != 0 {
                1 << n
            } else {
                0
            };
            (1 << n, rising)
        }
    }
}

/// Missed event count from event status bits
#[must_use]
pub const fn missed_events(status: u16) -> u8 {
    ((status & ptp_ests::EVNTS_MISSED_MASK) >> ptp_ests::EVNTS_MISSED_SHIFT) as u8
}

// =============================================================================
// Event Operations
// =============================================================================

impl<B: RegisterAccess> Port<'_, B> {
    /// Read PTP_STS
    pub fn poll_status(&self) -> Result<PtpStatus> {
        Ok(PtpStatus::from_raw(self.read(reg::PTP_STS)?))
    }

    /// Configure an event unit
    ///
    /// The unit is first connected with its edges cleared, then the edge
    /// settings are applied.
    pub fn set_event_config(&self, event: u8, config: EventConfig) -> Result<()> {
        check_event(event)?;
        check_gpio(config.gpio)?;

        let select = ((config.gpio as u16) << ptp_evnt::GPIO_SHIFT)
            | ((event as u16) << ptp_evnt::SEL_SHIFT)
            | ptp_evnt::WR;
        self.write(reg::PTP_EVNT, select)?;
        self.write(reg::PTP_EVNT, select | config.edge_bits())
    }

    /// Take the next event report
    ///
    /// Returns `None` when no event is queued. Call after
    /// [`poll_status`](Self::poll_status) reports an event.
    pub fn next_event(&self) -> Result<Option<EventCapture>> {
        self.multi_op(|| {
            let status = self.read(reg::PTP_ESTS)?;
            let missed = missed_events(status);

            if status & ptp_ests::EVENT_DET == 0 {
                return Ok(None);
            }

            let extended = if status & ptp_ests::MULT_EVENT != 0 {
                Some(self.read(reg::PTP_EDATA)?)
            } else {
                None
            };
            let (events, rising) = event_masks(status, extended);

            let mut words = [0u16; 4];
            for word in &mut words {
                *word = self.read(reg::PTP_EDATA)?;
            }

            Ok(Some(EventCapture {
                events,
                rising,
                time: PtpTime::from_words(words).saturating_sub_nanos(PIN_INPUT_DELAY_NS),
                missed,
            }))
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
