//! Trigger engine
//!
//! Eight trigger generators drive GPIO outputs at scheduled clock times.
//! Each trigger is configured once with [`Port::set_trigger_config`], then
//! armed, polled and cancelled as often as needed. Re-arming an armed
//! trigger replaces its schedule.
//!
//! ```text
//! Idle ──arm──► Armed ──► Expired | Late
//!                 │
//!                 └──cancel──► Cancelled
//! ```
//!
//! Triggers 0 and 1 carry a second pulse width, so a periodic signal on
//! them can have an uneven duty cycle.

use super::time::PtpTime;
use crate::driver::config::check_gpio;
use crate::driver::port::Port;
use crate::error::{ConfigError, ConfigResult, Result};
use crate::hal::register::RegisterAccess;
use crate::internal::constants::{DUAL_WIDTH_TRIGGERS, NUM_TRIGGERS};
use crate::internal::phy_regs::dp83640::{ptp_ctl, ptp_trig, ptp_tsts, reg, trig_arm, ts_word};

/// Check a trigger number
pub(crate) const fn check_trigger(trigger: u8) -> ConfigResult<()> {
    if trigger >= NUM_TRIGGERS {
        return Err(ConfigError::InvalidTrigger);
    }
    Ok(())
}

/// PTP_CTL trigger select field
const fn select(trigger: u8) -> u16 {
    (trigger as u16) << ptp_ctl::TRIG_SEL_SHIFT
}

// =============================================================================
// Types
// =============================================================================

/// How a trigger drives its output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TriggerBehavior {
    /// Generate a pulse instead of an edge
    pub pulse: bool,
    /// Repeat every period
    pub periodic: bool,
    /// Fire immediately when armed after its expiry time
    pub trigger_if_late: bool,
    /// Report completion in PTP_STS and status frames
    pub notify: bool,
    /// Toggle the output instead of driving a fixed level
    pub toggle: bool,
}

impl TriggerBehavior {
    /// Single edge, no notification
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pulse: false,
            periodic: false,
            trigger_if_late: false,
            notify: false,
            toggle: false,
        }
    }

    /// Periodic pulse train
    #[must_use]
    pub const fn periodic_pulse() -> Self {
        Self {
            pulse: true,
            periodic: true,
            ..Self::new()
        }
    }

    /// Fire immediately when armed late
    #[must_use]
    pub const fn with_trigger_if_late(mut self, enabled: bool) -> Self {
        self.trigger_if_late = enabled;
        self
    }

    /// Report completion
    #[must_use]
    pub const fn with_notify(mut self, enabled: bool) -> Self {
        self.notify = enabled;
        self
    }

    /// Toggle mode
    #[must_use]
    pub const fn with_toggle(mut self, enabled: bool) -> Self {
        self.toggle = enabled;
        self
    }

    /// Behavior bits of PTP_TRIG
    #[must_use]
    pub const fn to_bits(self) -> u16 {
        let mut reg = 0;
        if self.pulse {
            reg |= ptp_trig::PULSE;
        }
        if self.periodic {
            reg |= ptp_trig::PER;
        }
        if self.trigger_if_late {
            reg |= ptp_trig::IF_LATE;
        }
        if self.notify {
            reg |= ptp_trig::NOTIFY;
        }
        if self.toggle {
            reg |= ptp_trig::TOGGLE;
        }
        reg
    }
}

/// Schedule loaded into a trigger
///
/// Pulse widths are 32-bit values with seconds in bits 31:30 and
/// nanoseconds in bits 29:0 (see [`TriggerArm::pulse_width`]). For edge
/// signals on triggers 0 and 1, `pulse_width2` is instead a 16-bit seconds
/// field paired with a 30-bit nanoseconds `pulse_width`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TriggerArm {
    /// Clock time at which the trigger fires
    pub expire: PtpTime,
    /// Output level set on arming (high means a falling edge at expiry;
    /// ignored in toggle mode)
    pub initial_state: bool,
    /// Hold off arming until the seconds counter rolls over to 0
    pub wait_for_rollover: bool,
    /// First (or only) pulse width
    pub pulse_width: u32,
    /// Second pulse width, used by triggers 0 and 1 only
    pub pulse_width2: u32,
}

impl TriggerArm {
    /// Fire at `expire` with no pulse width
    #[must_use]
    pub const fn at(expire: PtpTime) -> Self {
        Self {
            expire,
            initial_state: false,
            wait_for_rollover: false,
            pulse_width: 0,
            pulse_width2: 0,
        }
    }

    /// Set both pulse widths
    #[must_use]
    pub const fn with_pulse_widths(mut self, first: u32, second: u32) -> Self {
        self.pulse_width = first;
        self.pulse_width2 = second;
        self
    }

    /// Set the initial output level
    #[must_use]
    pub const fn with_initial_state(mut self, high: bool) -> Self {
        self.initial_state = high;
        self
    }

    /// Wait for the seconds rollover before arming
    #[must_use]
    pub const fn with_wait_for_rollover(mut self, wait: bool) -> Self {
        self.wait_for_rollover = wait;
        self
    }

    /// Pack a pulse width from seconds (0-3) and nanoseconds
    ///
    /// Returns `None` if either part does not fit.
    #[must_use]
    pub const fn pulse_width(seconds: u8, nanoseconds: u32) -> Option<u32> {
        if seconds > 3 || nanoseconds >= 1 << 30 {
            return None;
        }
        Some(((seconds as u32) << 30) | nanoseconds)
    }
}

/// Result of polling a trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TriggerStatus {
    /// Fired on time, or late with `trigger_if_late` set
    Expired,
    /// Still waiting for its expiry time
    Pending,
    /// Armed after its expiry time without `trigger_if_late`
    Late,
}

impl TriggerStatus {
    /// Decode one trigger's bits from PTP_TSTS
    #[must_use]
    pub const fn from_tsts(tsts: u16, trigger: u8) -> Self {
        let bits = tsts >> (trigger as u16 * ptp_tsts::BITS_PER_TRIGGER);
        if bits & ptp_tsts::ACTIVE != 0 {
            Self::Pending
        } else if bits & ptp_tsts::ERROR != 0 {
            Self::Late
        } else {
            Self::Expired
        }
    }
}

// =============================================================================
// Trigger Operations
// =============================================================================

impl<B: RegisterAccess> Port<'_, B> {
    /// Configure a trigger's behavior and output GPIO (0 leaves it
    /// unconnected)
    pub fn set_trigger_config(&self, trigger: u8, behavior: TriggerBehavior, gpio: u8) -> Result<()> {
        check_trigger(trigger)?;
        check_gpio(gpio)?;

        let value = behavior.to_bits()
            | ((gpio as u16) << ptp_trig::GPIO_SHIFT)
            | ((trigger as u16) << ptp_trig::CSEL_SHIFT)
            | ptp_trig::WR;
        self.write(reg::PTP_TRIG, value)
    }

    /// Load a schedule into a trigger and enable it
    ///
    /// # Errors
    ///
    /// `ConfigError::InvalidTrigger` for triggers above 7,
    /// `ConfigError::InvalidConfig` if the expiry nanoseconds are not below
    /// one second.
    pub fn arm_trigger(&self, trigger: u8, arm: TriggerArm) -> Result<()> {
        check_trigger(trigger)?;
        if !arm.expire.is_normalized() {
            return Err(ConfigError::InvalidConfig.into());
        }

        let [ns_lo, ns_hi, sec_lo, sec_hi] = arm.expire.to_words();
        let mut ns_hi = ns_hi & ts_word::NS_HI_MASK;
        if arm.initial_state {
            ns_hi |= trig_arm::INITIAL_STATE;
        }
        if arm.wait_for_rollover {
            ns_hi |= trig_arm::WAIT_ROLLOVER;
        }

        self.multi_op(|| {
            self.write(reg::PTP_CTL, select(trigger) | ptp_ctl::TRIG_LOAD)?;
            for word in [
                ns_lo,
                ns_hi,
                sec_lo,
                sec_hi,
                arm.pulse_width as u16,
                (arm.pulse_width >> 16) as u16,
            ] {
                self.write(reg::PTP_TDR, word)?;
            }
            if trigger < DUAL_WIDTH_TRIGGERS {
                self.write(reg::PTP_TDR, arm.pulse_width2 as u16)?;
                self.write(reg::PTP_TDR, (arm.pulse_width2 >> 16) as u16)?;
            }
            self.write(reg::PTP_CTL, select(trigger) | ptp_ctl::TRIG_EN)
        })?;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "PHY {} trigger {} armed for {}.{:09}",
            self.phy_address(),
            trigger,
            arm.expire.seconds,
            arm.expire.nanoseconds
        );
        Ok(())
    }

    /// Poll a trigger
    ///
    /// Needs no preceding status poll.
    pub fn trigger_status(&self, trigger: u8) -> Result<TriggerStatus> {
        check_trigger(trigger)?;
        let tsts = self.multi_op(|| self.read(reg::PTP_TSTS))?;
        Ok(TriggerStatus::from_tsts(tsts, trigger))
    }

    /// Disable a trigger
    ///
    /// A trigger whose expiry is close may fire before the cancel lands.
    pub fn cancel_trigger(&self, trigger: u8) -> Result<()> {
        check_trigger(trigger)?;
        self.multi_op(|| self.write(reg::PTP_CTL, select(trigger) | ptp_ctl::TRIG_DIS))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
