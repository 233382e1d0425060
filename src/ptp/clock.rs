//! 1588 hardware clock control
//!
//! This module extends [`Port`] with the clock operations: read, step, set,
//! rate adjustment, and the clock output and miscellaneous configuration
//! that shares page 6 with them.
//!
//! Clock values move through the PTP_TDR data register four words at a time
//! (nanoseconds low/high, seconds low/high). The PHY advances an internal
//! pointer on every access, so each transfer runs under the device's
//! multi-op scope.
//!
//! # Example
//!
//! ```ignore
//! port.enable_clock(true)?;
//! port.set_clock(PtpTime::new(1_700_000_000, 0))?;
//!
//! // Slow the clock by 100 ppb for 1 ms
//! port.set_temp_rate_duration(125_000)?;
//! port.set_rate(RateAdjustment::temporary(430, RateDirection::Slower))?;
//! ```

use super::time::PtpTime;
use crate::driver::config::{ClockOutputConfig, MiscConfig, check_gpio};
use crate::driver::port::Port;
use crate::error::{ConfigError, Result};
use crate::hal::register::RegisterAccess;
use crate::internal::constants::MAX_RATE;
use crate::internal::phy_regs::dp83640::{phycr2, ptp_ctl, ptp_rate, reg};

/// Bits of PTP_GPIOMON carrying GPIO input levels (GPIO12 in bit 11)
const GPIOMON_MASK: u16 = 0x0FFF;

// =============================================================================
// Rate Adjustment
// =============================================================================

/// Direction of a rate adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RateDirection {
    /// Add the magnitude every cycle
    #[default]
    Faster,
    /// Subtract the magnitude every cycle
    Slower,
}

/// Clock frequency adjustment
///
/// `magnitude` is a 26-bit count of 2^-32 ns added to or subtracted from
/// the clock every 8 ns reference cycle (about +/-1950 ppm at full scale).
///
/// The PHY holds a normal and a temporary rate. A temporary rate overrides
/// the normal one for the duration set with
/// [`Port::set_temp_rate_duration`], then the PHY falls back to the normal
/// rate by itself. Setting the normal rate leaves an active temporary rate
/// alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RateAdjustment {
    /// Adjustment per reference cycle in 2^-32 ns (26 bits)
    pub magnitude: u32,
    /// Temporary rate instead of the normal rate
    pub temporary: bool,
    /// Direction of the adjustment
    pub direction: RateDirection,
}

impl RateAdjustment {
    /// Normal rate adjustment
    #[must_use]
    pub const fn normal(magnitude: u32, direction: RateDirection) -> Self {
        Self {
            magnitude,
            temporary: false,
            direction,
        }
    }

    /// Temporary rate adjustment
    #[must_use]
    pub const fn temporary(magnitude: u32, direction: RateDirection) -> Self {
        Self {
            magnitude,
            temporary: true,
            direction,
        }
    }

    /// PTP_RATEH value
    #[must_use]
    pub const fn high_word(&self) -> u16 {
        let mut reg = (self.magnitude >> ptp_rate::HI_SHIFT) as u16 & ptp_rate::HI_MASK;
        if self.temporary {
            reg |= ptp_rate::TEMP;
        }
        if matches!(self.direction, RateDirection::Slower) {
            reg |= ptp_rate::DIR;
        }
        reg
    }

    /// PTP_RATEL value
    #[must_use]
    pub const fn low_word(&self) -> u16 {
        self.magnitude as u16
    }

    /// Reassemble from PTP_RATEH and PTP_RATEL
    #[must_use]
    pub const fn from_words(high: u16, low: u16) -> Self {
        Self {
            magnitude: (((high & ptp_rate::HI_MASK) as u32) << ptp_rate::HI_SHIFT) | low as u32,
            temporary: high & ptp_rate::TEMP != 0,
            direction: if high & ptp_rate::DIR != 0 {
                RateDirection::Slower
            } else {
                RateDirection::Faster
            },
        }
    }
}

// =============================================================================
// Clock Operations
// =============================================================================

impl<B: RegisterAccess> Port<'_, B> {
    /// Start or stop the 1588 clock
    pub fn enable_clock(&self, enable: bool) -> Result<()> {
        self.write(
            reg::PTP_CTL,
            if enable {
                ptp_ctl::ENABLE
            } else {
                ptp_ctl::DISABLE
            },
        )
    }

    /// Read the current clock value
    pub fn read_clock(&self) -> Result<PtpTime> {
        self.multi_op(|| {
            self.write(reg::PTP_CTL, ptp_ctl::RD_CLK)?;
            let mut words = [0u16; 4];
            for word in &mut words {
                *word = self.read(reg::PTP_TDR)?;
            }
            Ok(PtpTime::from_words(words))
        })
    }

    /// Step the clock by `delta`, backwards when `negative` is set
    ///
    /// Negative steps are sent as the 32-bit two's complement of each field.
    /// The PHY takes [`STEP_LATENCY_NS`](super::time::STEP_LATENCY_NS) to
    /// apply a step; fold that into `delta` before calling.
    ///
    /// # Errors
    ///
    /// `ConfigError::InvalidConfig` if `delta.nanoseconds` is not below one
    /// second.
    pub fn step_clock(&self, delta: PtpTime, negative: bool) -> Result<()> {
        if !delta.is_normalized() {
            return Err(ConfigError::InvalidConfig.into());
        }

        let words = if negative {
            PtpTime::new(
                delta.seconds.wrapping_neg(),
                delta.nanoseconds.wrapping_neg(),
            )
            .to_words()
        } else {
            delta.to_words()
        };

        self.multi_op(|| self.load_time_data(words, ptp_ctl::STEP_CLK))
    }

    /// Load an absolute clock value
    ///
    /// # Errors
    ///
    /// `ConfigError::InvalidConfig` if `time.nanoseconds` is not below one
    /// second.
    pub fn set_clock(&self, time: PtpTime) -> Result<()> {
        if !time.is_normalized() {
            return Err(ConfigError::InvalidConfig.into());
        }
        self.multi_op(|| self.load_time_data(time.to_words(), ptp_ctl::LOAD_CLK))
    }

    /// Four PTP_TDR writes followed by a PTP_CTL command
    fn load_time_data(&self, words: [u16; 4], command: u16) -> Result<()> {
        for word in words {
            self.write(reg::PTP_TDR, word)?;
        }
        self.write(reg::PTP_CTL, command)
    }

    /// Program the normal or temporary rate
    ///
    /// # Errors
    ///
    /// `ConfigError::InvalidConfig` if the magnitude exceeds 26 bits.
    pub fn set_rate(&self, rate: RateAdjustment) -> Result<()> {
        if rate.magnitude > MAX_RATE {
            return Err(ConfigError::InvalidConfig.into());
        }
        self.multi_op(|| {
            self.write(reg::PTP_RATEH, rate.high_word())?;
            self.write(reg::PTP_RATEL, rate.low_word())
        })
    }

    /// Read back the rate registers
    pub fn rate(&self) -> Result<RateAdjustment> {
        self.multi_op(|| {
            let high = self.read(reg::PTP_RATEH)?;
            let low = self.read(reg::PTP_RATEL)?;
            Ok(RateAdjustment::from_words(high, low))
        })
    }

    /// Set how many reference cycles a temporary rate lasts (26 bits, up to
    /// about 536 ms)
    ///
    /// # Errors
    ///
    /// `ConfigError::InvalidConfig` if the duration exceeds 26 bits.
    pub fn set_temp_rate_duration(&self, cycles: u32) -> Result<()> {
        if cycles > MAX_RATE {
            return Err(ConfigError::InvalidConfig.into());
        }
        self.multi_op(|| {
            self.write(
                reg::PTP_TRDH,
                (cycles >> ptp_rate::HI_SHIFT) as u16 & ptp_rate::HI_MASK,
            )?;
            self.write(reg::PTP_TRDL, cycles as u16)
        })
    }

    // =========================================================================
    // Clock Output and Miscellaneous
    // =========================================================================

    /// Configure the clock output and the reference clock source
    ///
    /// Also gates the 25 MHz PHYCR2 clock output: it runs only while the
    /// PTP output is enabled.
    pub fn set_clock_output(&self, config: ClockOutputConfig) -> Result<()> {
        config.validate()?;
        self.write(reg::PTP_COC, config.coc())?;
        self.write(reg::PTP_CLKSRC, config.clksrc())?;
        self.modify_register(reg::PHYCR2, |value| {
            if config.enabled {
                value & !phycr2::CLK_OUT_DIS
            } else {
                value | phycr2::CLK_OUT_DIS
            }
        })?;
        Ok(())
    }

    /// Route the PTP interrupt to a GPIO (0 disconnects it)
    pub fn set_gpio_interrupt(&self, gpio: u8) -> Result<()> {
        check_gpio(gpio)?;
        self.write(reg::PTP_INTCTL, gpio as u16)
    }

    /// Program the PTP EtherType, message offset and SFD strobe GPIOs
    pub fn set_misc_config(&self, config: MiscConfig) -> Result<()> {
        config.validate()?;
        self.write(reg::PTP_ETR, config.ether_type)?;
        self.write(reg::PTP_OFF, config.ptp_offset as u16)?;
        self.write(reg::PTP_SFDCFG, config.sfdcfg())
    }

    /// Current GPIO input levels, GPIO1 in bit 0 through GPIO12 in bit 11
    pub fn gpio_status(&self) -> Result<u16> {
        Ok(self.read(reg::PTP_GPIOMON)? & GPIOMON_MASK)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec;

    use super::*;
    use crate::driver::config::{ClockSource, ProbeConfig};
    use crate::driver::device::Device;
    use crate::error::{ConfigError, Error};
    use crate::hal::mdio::PagedMdio;
    use crate::testing::MockPhy;

    fn device() -> Device<PagedMdio<MockPhy>> {
        let phy = MockPhy::new();
        phy.setup_dp83640(0);
        Device::probe(PagedMdio::new(phy), 0, ProbeConfig::new()).unwrap()
    }

    fn phy<R>(device: &Device<PagedMdio<MockPhy>>, f: impl FnOnce(&MockPhy) -> R) -> R {
        device.with_bus(|bus| f(bus.inner()))
    }

    #[test]
    fn enable_writes_command() {
        let device = device();
        let port = device.port(0).unwrap();

        port.enable_clock(true).unwrap();
        port.enable_clock(false).unwrap();

        assert_eq!(
            phy(&device, |p| p.writes_to(0, reg::PTP_CTL)),
            vec![ptp_ctl::ENABLE, ptp_ctl::DISABLE]
        );
    }

    #[test]
    fn set_then_read_returns_same_time() {
        let device = device();
        let port = device.port(0).unwrap();

        for time in [
            PtpTime::ZERO,
            PtpTime::new(1, 999_999_999),
            PtpTime::new(0x0001_FFFF, 0x0001_0000),
            PtpTime::new(u32::MAX, 123_456_789),
        ] {
            port.set_clock(time).unwrap();
            assert_eq!(port.read_clock().unwrap(), time);
        }
    }

    #[test]
    fn set_clock_writes_data_then_load() {
        let device = device();
        let port = device.port(0).unwrap();
        phy(&device, MockPhy::clear_writes);

        port.set_clock(PtpTime::new(0x0003_0004, 0x0001_0002)).unwrap();

        assert_eq!(
            phy(&device, MockPhy::get_index_writes),
            vec![
                (0, reg::PTP_TDR, 0x0002),
                (0, reg::PTP_TDR, 0x0001),
                (0, reg::PTP_TDR, 0x0004),
                (0, reg::PTP_TDR, 0x0003),
                (0, reg::PTP_CTL, ptp_ctl::LOAD_CLK),
            ]
        );
    }

    #[test]
    fn read_clock_latches_before_reading() {
        let device = device();
        let port = device.port(0).unwrap();
        phy(&device, |p| p.set_clock(0, 42, 7));

        assert_eq!(port.read_clock().unwrap(), PtpTime::new(42, 7));
        assert_eq!(
            phy(&device, |p| p.writes_to(0, reg::PTP_CTL)),
            vec![ptp_ctl::RD_CLK]
        );
    }

    #[test]
    fn opposite_steps_cancel() {
        let device = device();
        let port = device.port(0).unwrap();
        let start = PtpTime::new(100, 500_000_000);

        for delta in [
            PtpTime::new(3, 700_000_000),
            PtpTime::new(0, 1),
            PtpTime::new(200, 0),
            PtpTime::new(0, 999_999_999),
        ] {
            port.set_clock(start).unwrap();
            port.step_clock(delta, false).unwrap();
            port.step_clock(delta, true).unwrap();
            assert_eq!(port.read_clock().unwrap(), start, "delta {:?}", delta);

            port.step_clock(delta, true).unwrap();
            port.step_clock(delta, false).unwrap();
            assert_eq!(port.read_clock().unwrap(), start, "delta {:?}", delta);
        }
    }

    #[test]
    fn negative_step_sends_twos_complement() {
        let device = device();
        let port = device.port(0).unwrap();
        phy(&device, MockPhy::clear_writes);

        port.step_clock(PtpTime::new(1, 10), true).unwrap();

        assert_eq!(
            phy(&device, |p| p.writes_to(0, reg::PTP_TDR)),
            vec![0xFFF6, 0xFFFF, 0xFFFF, 0xFFFF]
        );
        assert_eq!(
            phy(&device, |p| p.writes_to(0, reg::PTP_CTL)),
            vec![ptp_ctl::STEP_CLK]
        );
    }

    #[test]
    fn negative_zero_step_is_zero() {
        let device = device();
        let port = device.port(0).unwrap();
        phy(&device, MockPhy::clear_writes);

        port.step_clock(PtpTime::ZERO, true).unwrap();

        assert_eq!(
            phy(&device, |p| p.writes_to(0, reg::PTP_TDR)),
            vec![0, 0, 0, 0]
        );
    }

    #[test]
    fn unnormalized_times_are_rejected() {
        let device = device();
        let port = device.port(0).unwrap();
        let bad = PtpTime::new(0, 1_000_000_000);

        assert_eq!(
            port.set_clock(bad),
            Err(Error::Config(ConfigError::InvalidConfig))
        );
        assert_eq!(
            port.step_clock(bad, false),
            Err(Error::Config(ConfigError::InvalidConfig))
        );
        assert!(phy(&device, MockPhy::get_index_writes).is_empty());
    }

    #[test]
    fn rate_round_trips() {
        let device = device();
        let port = device.port(0).unwrap();

        for rate in [
            RateAdjustment::normal(0, RateDirection::Faster),
            RateAdjustment::normal(343_597, RateDirection::Faster),
            RateAdjustment::temporary(687_194, RateDirection::Slower),
            RateAdjustment::temporary(MAX_RATE, RateDirection::Faster),
            RateAdjustment::normal(0x0001_0000, RateDirection::Slower),
        ] {
            port.set_rate(rate).unwrap();
            assert_eq!(port.rate().unwrap(), rate);
        }
    }

    #[test]
    fn rate_writes_high_then_low() {
        let device = device();
        let port = device.port(0).unwrap();
        phy(&device, MockPhy::clear_writes);

        port.set_rate(RateAdjustment::temporary(0x03FF_1234, RateDirection::Slower))
            .unwrap();

        assert_eq!(
            phy(&device, MockPhy::get_index_writes),
            vec![
                (0, reg::PTP_RATEH, ptp_rate::DIR | ptp_rate::TEMP | 0x03FF),
                (0, reg::PTP_RATEL, 0x1234),
            ]
        );
    }

    #[test]
    fn rate_rejects_wide_magnitude() {
        let device = device();
        let port = device.port(0).unwrap();
        assert_eq!(
            port.set_rate(RateAdjustment::normal(MAX_RATE + 1, RateDirection::Faster)),
            Err(Error::Config(ConfigError::InvalidConfig))
        );
    }

    #[test]
    fn temp_rate_duration_writes_high_then_low() {
        let device = device();
        let port = device.port(0).unwrap();
        phy(&device, MockPhy::clear_writes);

        port.set_temp_rate_duration(125_000).unwrap();

        assert_eq!(
            phy(&device, MockPhy::get_index_writes),
            vec![(0, reg::PTP_TRDH, 0x0001), (0, reg::PTP_TRDL, 0xE848)]
        );
        assert!(port.set_temp_rate_duration(1 << 26).is_err());
    }

    #[test]
    fn clock_output_gates_phycr2() {
        let device = device();
        let port = device.port(0).unwrap();

        port.set_clock_output(ClockOutputConfig::new().with_output(10))
            .unwrap();
        assert_eq!(phy(&device, |p| p.get_register(0, reg::PHYCR2)), Some(0));
        assert_eq!(
            phy(&device, |p| p.get_register(0, reg::PTP_COC)),
            Some(0x800A)
        );

        port.set_clock_output(ClockOutputConfig::new().with_source(ClockSource::External, 20))
            .unwrap();
        assert_eq!(
            phy(&device, |p| p.get_register(0, reg::PHYCR2)),
            Some(phycr2::CLK_OUT_DIS)
        );
        assert_eq!(
            phy(&device, |p| p.get_register(0, reg::PTP_CLKSRC)),
            Some(0x8014)
        );
    }

    #[test]
    fn gpio_interrupt_and_misc() {
        let device = device();
        let port = device.port(0).unwrap();

        port.set_gpio_interrupt(12).unwrap();
        assert_eq!(
            port.set_gpio_interrupt(13),
            Err(Error::Config(ConfigError::InvalidGpio))
        );
        port.set_misc_config(MiscConfig::new().with_sfd_gpios(1, 2))
            .unwrap();

        assert_eq!(phy(&device, |p| p.get_register(0, reg::PTP_INTCTL)), Some(12));
        assert_eq!(phy(&device, |p| p.get_register(0, reg::PTP_ETR)), Some(0x88F7));
        assert_eq!(phy(&device, |p| p.get_register(0, reg::PTP_SFDCFG)), Some(0x12));
    }

    #[test]
    fn gpio_status_masks_levels() {
        let device = device();
        let port = device.port(0).unwrap();
        phy(&device, |p| p.set_register(0, reg::PTP_GPIOMON, 0xF801));

        assert_eq!(port.gpio_status().unwrap(), 0x0801);
    }
}
