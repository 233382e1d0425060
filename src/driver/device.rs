//! PHY device handle
//!
//! A [`Device`] is one physical PHY package found at a base MDIO address.
//! It owns the register transport and the two exclusion scopes every port of
//! the package shares, identifies the part, and hands out [`Port`] handles.
//!
//! There is no global device list: the host owns each `Device` it probes,
//! and ports borrow it, so a device cannot be dropped while a port is alive.
//!
//! # Example
//!
//! ```ignore
//! use ph_dp83640::{Device, PagedMdio, ProbeConfig};
//!
//! let device = Device::probe(PagedMdio::new(mdio), 1, ProbeConfig::new())?;
//! defmt::info!("found {} rev {}", device.info().device_type, device.info().revision);
//!
//! let port = device.port(0)?;
//! port.enable_clock(true)?;
//! ```

use embedded_hal::delay::DelayNs;

use super::config::{ControlFrameConfig, ProbeConfig, PsfConfig, TimestampLayout};
use super::port::Port;
use crate::error::{ConfigError, Result};
use crate::hal::register::RegisterAccess;
use crate::internal::constants::{MAX_PHY_ADDR, RESET_POLL_INTERVAL_US};
use crate::internal::phy_regs::dp83640::reg;
use crate::internal::phy_regs::standard::{bmcr, phy_id, phy_reg};
use crate::sync::{CriticalSectionCell, RegisterScope};

/// Most ports any supported package has
pub const MAX_PORTS: usize = 2;

// =============================================================================
// Identification
// =============================================================================

/// Supported PHY parts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceType {
    /// DP83848 single-port PHY (and its mini package)
    Dp83848,
    /// DP83849 dual-port PHY
    Dp83849,
    /// DP83640 precision PHY with IEEE 1588 support
    Dp83640,
    /// National part with an unrecognised model number
    Unknown,
}

impl DeviceType {
    /// Classify a PHYIDR2 model field (already masked, not shifted)
    #[must_use]
    pub const fn from_model(model: u16) -> Self {
        match model {
            phy_id::MODEL_DP83848 | phy_id::MODEL_DP83848_MINI => DeviceType::Dp83848,
            phy_id::MODEL_DP83849 => DeviceType::Dp83849,
            phy_id::MODEL_DP83640 => DeviceType::Dp83640,
            _ => DeviceType::Unknown,
        }
    }

    /// Number of ports in the package
    #[must_use]
    pub const fn num_ports(self) -> u8 {
        match self {
            DeviceType::Dp83849 => 2,
            _ => 1,
        }
    }

    /// Number of extended register pages
    #[must_use]
    pub const fn ext_register_pages(self) -> u8 {
        match self {
            DeviceType::Dp83849 => 3,
            DeviceType::Dp83640 => 7,
            _ => 1,
        }
    }

    /// Optional features of the part
    #[must_use]
    pub const fn capabilities(self) -> Capabilities {
        match self {
            DeviceType::Dp83849 => Capabilities::NONE
                .with(Capability::Tdr)
                .with(Capability::LinkQuality)
                .with(Capability::MiiPortConfig),
            DeviceType::Dp83640 => Capabilities::NONE
                .with(Capability::Tdr)
                .with(Capability::LinkQuality)
                .with(Capability::MiiRegisterAccess),
            _ => Capabilities::NONE,
        }
    }

    /// Part name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            DeviceType::Dp83848 => "DP83848",
            DeviceType::Dp83849 => "DP83849",
            DeviceType::Dp83640 => "DP83640",
            DeviceType::Unknown => "unknown",
        }
    }
}

/// Optional device feature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Capability {
    /// Time domain reflectometry cable diagnostics
    Tdr = 0x01,
    /// Link quality monitoring
    LinkQuality = 0x02,
    /// Per-port MII configuration
    MiiPortConfig = 0x04,
    /// Register access over control frames
    MiiRegisterAccess = 0x08,
}

/// Set of [`Capability`] flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Capabilities(u8);

impl Capabilities {
    /// No optional features
    pub const NONE: Self = Self(0);

    /// Add a capability
    #[must_use]
    pub const fn with(self, capability: Capability) -> Self {
        Self(self.0 | capability as u8)
    }

    /// Whether a capability is present
    #[must_use]
    pub const fn contains(self, capability: Capability) -> bool {
        self.0 & capability as u8 != 0
    }

    /// Raw flag bits
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }
}

/// Identification of a probed device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceInfo {
    /// Part
    pub device_type: DeviceType,
    /// Model number from PHYIDR2
    pub model_number: u8,
    /// Silicon revision from PHYIDR2
    pub revision: u8,
    /// Number of ports
    pub num_ports: u8,
    /// Number of extended register pages
    pub ext_register_pages: u8,
    /// Optional features
    pub capabilities: Capabilities,
}

impl DeviceInfo {
    /// Decode PHYIDR2
    #[must_use]
    pub const fn from_idr2(idr2: u16) -> Self {
        let model = idr2 & phy_id::MODEL_MASK;
        let device_type = DeviceType::from_model(model);
        Self {
            device_type,
            model_number: (model >> phy_id::MODEL_SHIFT) as u8,
            revision: (idr2 & phy_id::REVISION_MASK) as u8,
            num_ports: device_type.num_ports(),
            ext_register_pages: device_type.ext_register_pages(),
            capabilities: device_type.capabilities(),
        }
    }

    /// Placeholder used before identification completes
    const UNIDENTIFIED: Self = Self {
        device_type: DeviceType::Unknown,
        model_number: 0,
        revision: 0,
        num_ports: 1,
        ext_register_pages: 1,
        capabilities: Capabilities::NONE,
    };
}

// =============================================================================
// Integrity Notification
// =============================================================================

/// A control frame the PHY rejected because its checksum did not match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IntegrityFault {
    /// Port that reported the fault
    pub phy_addr: u8,
    /// PCFCR contents when the fault was seen
    pub status: u16,
}

/// Out-of-band notification of a management channel integrity fault
///
/// Runs in the caller's context, inside no exclusion scope.
pub type IntegrityHook = fn(IntegrityFault);

// =============================================================================
// Port State
// =============================================================================

/// Configuration a port remembers between calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PortState {
    /// Last status frame configuration applied
    pub psf: PsfConfig,
    /// Last receive timestamp layout applied
    pub layout: TimestampLayout,
    /// Last management interface configuration applied
    pub control_frames: ControlFrameConfig,
}

impl PortState {
    const fn new() -> Self {
        Self {
            psf: PsfConfig::new(),
            layout: TimestampLayout {
                insert: false,
                append: false,
                seconds_length: super::config::SecondsLength::One,
                nanoseconds_offset: 0,
                seconds_offset: 0,
            },
            control_frames: ControlFrameConfig::new(),
        }
    }
}

// =============================================================================
// Device
// =============================================================================

/// One probed PHY package
pub struct Device<B: RegisterAccess> {
    scope: RegisterScope<B>,
    base_address: u8,
    info: DeviceInfo,
    ports: [CriticalSectionCell<PortState>; MAX_PORTS],
    integrity_hook: CriticalSectionCell<Option<IntegrityHook>>,
}

impl<B: RegisterAccess> Device<B> {
    /// Identify the PHY at `base_address` and prepare its ports
    ///
    /// Port `n` answers at MDIO address `base_address + n`. Every port has
    /// its page select reset to page 0. With
    /// [`ProbeConfig::control_frames`] set, each port is first given the
    /// status frame configuration needed to return register reads and has
    /// control frames enabled.
    ///
    /// # Errors
    ///
    /// - `ConfigError::InvalidPhyAddress` if a port address exceeds 31
    /// - `ConfigError::UnsupportedDevice` if PHYIDR1 is not the National OUI
    /// - Any transport error
    pub fn probe(bus: B, base_address: u8, config: ProbeConfig) -> Result<Self> {
        if base_address > MAX_PHY_ADDR {
            return Err(ConfigError::InvalidPhyAddress.into());
        }

        let mut device = Self {
            scope: RegisterScope::new(bus),
            base_address,
            info: DeviceInfo::UNIDENTIFIED,
            ports: [const { CriticalSectionCell::new(PortState::new()) }; MAX_PORTS],
            integrity_hook: CriticalSectionCell::new(None),
        };

        // Reads only come back over status frames in control frame mode
        if config.control_frames {
            device.port(0)?.bring_up_control_frames()?;
        }

        let idr1 = device.scope.read(base_address, phy_reg::PHYIDR1)?;
        if idr1 != phy_id::NATIONAL_OUI {
            #[cfg(feature = "defmt")]
            defmt::warn!("PHY {} is not a National part (IDR1={:#06x})", base_address, idr1);
            return Err(ConfigError::UnsupportedDevice.into());
        }

        let idr2 = device.scope.read(base_address, phy_reg::PHYIDR2)?;
        let info = DeviceInfo::from_idr2(idr2);
        if base_address as u16 + info.num_ports as u16 - 1 > MAX_PHY_ADDR as u16 {
            return Err(ConfigError::InvalidPhyAddress.into());
        }
        device.info = info;

        #[cfg(feature = "defmt")]
        defmt::info!(
            "{} at PHY {}: model {:#x} rev {}, {} port(s)",
            info.device_type.as_str(),
            base_address,
            info.model_number,
            info.revision,
            info.num_ports
        );

        for index in 0..info.num_ports {
            let port = device.port(index)?;
            // Port 0 was brought up before identification
            if config.control_frames && index != 0 {
                port.bring_up_control_frames()?;
            }
            port.write(reg::PAGESEL, 0)?;
        }

        Ok(device)
    }

    /// Identification gathered at probe
    #[must_use]
    pub fn info(&self) -> &DeviceInfo {
        &self.info
    }

    /// Whether the part has an optional feature
    #[must_use]
    pub fn is_capable(&self, capability: Capability) -> bool {
        self.info.capabilities.contains(capability)
    }

    /// MDIO address of port 0
    #[must_use]
    pub fn base_address(&self) -> u8 {
        self.base_address
    }

    /// Handle for one port
    ///
    /// # Errors
    ///
    /// `ConfigError::InvalidPort` if `index` is not below the port count.
    pub fn port(&self, index: u8) -> Result<Port<'_, B>> {
        if index >= self.info.num_ports {
            return Err(ConfigError::InvalidPort.into());
        }
        Ok(Port::new(self, index, self.base_address + index))
    }

    /// Reset the device and all of its ports
    ///
    /// Sets BMCR reset on port 0 and polls until the PHY clears it (about
    /// 1.2 ms), pausing `RESET_POLL_INTERVAL_US` between polls. The poll has
    /// no timeout; wrap the call if the PHY may not respond.
    pub fn reset<D: DelayNs>(&self, delay: &mut D) -> Result<()> {
        let phy = self.base_address;
        self.scope.multi_op(|| {
            self.scope.modify(phy, phy_reg::BMCR, |value| value | bmcr::RESET)?;
            while self.scope.read(phy, phy_reg::BMCR)? & bmcr::RESET != 0 {
                delay.delay_us(RESET_POLL_INTERVAL_US);
            }
            Ok(())
        })?;

        #[cfg(feature = "defmt")]
        defmt::info!("PHY {} reset complete", phy);
        Ok(())
    }

    /// Register (or clear) the integrity fault notification
    pub fn set_integrity_hook(&self, hook: Option<IntegrityHook>) {
        self.integrity_hook.set(hook);
    }

    /// Run `f` with the register transport
    ///
    /// Holds the register scope for the duration of `f`.
    pub fn with_bus<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut B) -> R,
    {
        self.scope.with_bus(f)
    }

    /// Release the register transport
    pub fn release(self) -> B {
        self.scope.into_inner()
    }

    // =========================================================================
    // Crate Internals
    // =========================================================================

    pub(crate) fn scope(&self) -> &RegisterScope<B> {
        &self.scope
    }

    pub(crate) fn port_state(&self, index: u8) -> &CriticalSectionCell<PortState> {
        &self.ports[index as usize]
    }

    pub(crate) fn notify_integrity_fault(&self, fault: IntegrityFault) {
        #[cfg(feature = "defmt")]
        defmt::error!(
            "control frame checksum error on PHY {} (PCFCR={:#06x})",
            fault.phy_addr,
            fault.status
        );

        if let Some(hook) = self.integrity_hook.get() {
            hook(fault);
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::error::Error;
    use crate::hal::mdio::PagedMdio;
    use crate::internal::phy_regs::dp83640::{pcfcr, psf_cfg0};
    use crate::ptp::time::PtpTime;
    use crate::testing::{MockDelay, MockPhy};
    use std::sync::Barrier;
    use std::thread;
    use std::time::{Duration, Instant};

    fn probe_dp83640(phy: MockPhy, config: ProbeConfig) -> Result<Device<PagedMdio<MockPhy>>> {
        phy.setup_dp83640(1);
        Device::probe(PagedMdio::new(phy), 1, config)
    }

    #[test]
    fn device_type_from_model() {
        assert_eq!(DeviceType::from_model(0x0090), DeviceType::Dp83848);
        assert_eq!(DeviceType::from_model(0x00C0), DeviceType::Dp83848);
        assert_eq!(DeviceType::from_model(0x00A0), DeviceType::Dp83849);
        assert_eq!(DeviceType::from_model(0x00E0), DeviceType::Dp83640);
        assert_eq!(DeviceType::from_model(0x00F0), DeviceType::Unknown);
    }

    #[test]
    fn info_from_idr2_dp83640() {
        let info = DeviceInfo::from_idr2(0x5CE1);
        assert_eq!(info.device_type, DeviceType::Dp83640);
        assert_eq!(info.model_number, 0x0E);
        assert_eq!(info.revision, 1);
        assert_eq!(info.num_ports, 1);
        assert_eq!(info.ext_register_pages, 7);
        assert!(info.capabilities.contains(Capability::MiiRegisterAccess));
        assert!(!info.capabilities.contains(Capability::MiiPortConfig));
        assert_eq!(info.capabilities.bits(), 0x0B);
    }

    #[test]
    fn info_from_idr2_dp83849() {
        let info = DeviceInfo::from_idr2(0x5CA2);
        assert_eq!(info.device_type, DeviceType::Dp83849);
        assert_eq!(info.num_ports, 2);
        assert_eq!(info.ext_register_pages, 3);
        assert_eq!(info.capabilities.bits(), 0x07);
    }

    #[test]
    fn probe_identifies_and_selects_page_zero() {
        let device = probe_dp83640(MockPhy::new(), ProbeConfig::new()).unwrap();

        assert_eq!(device.info().device_type, DeviceType::Dp83640);
        assert!(device.is_capable(Capability::Tdr));
        assert!(!device.is_capable(Capability::MiiPortConfig));
        let writes = device.with_bus(|bus| bus.inner().get_writes());
        assert_eq!(writes, std::vec![(1, 0x13, 0)]);
    }

    #[test]
    fn probe_rejects_foreign_oui() {
        let phy = MockPhy::new();
        phy.set_raw(0, 0, 0x02, 0x0007);
        let result = Device::probe(PagedMdio::new(phy), 0, ProbeConfig::new());
        assert_eq!(
            result.err(),
            Some(Error::Config(ConfigError::UnsupportedDevice))
        );
    }

    #[test]
    fn probe_rejects_bad_address() {
        let result = Device::probe(PagedMdio::new(MockPhy::new()), 32, ProbeConfig::new());
        assert_eq!(
            result.err(),
            Some(Error::Config(ConfigError::InvalidPhyAddress))
        );
    }

    #[test]
    fn probe_dual_port_device_selects_page_on_each_port() {
        let phy = MockPhy::new();
        phy.setup_device(4, 0x5CA2);
        let device = Device::probe(PagedMdio::new(phy), 4, ProbeConfig::new()).unwrap();

        assert_eq!(device.info().num_ports, 2);
        assert_eq!(device.port(1).unwrap().phy_address(), 5);
        let writes = device.with_bus(|bus| bus.inner().get_writes());
        assert_eq!(writes, std::vec![(4, 0x13, 0), (5, 0x13, 0)]);
    }

    #[test]
    fn probe_with_control_frames_brings_up_status_frames() {
        let device =
            probe_dp83640(MockPhy::new(), ProbeConfig::new().with_control_frames(true)).unwrap();

        device.with_bus(|bus| {
            let phy = bus.inner();
            assert_eq!(
                phy.get_register(1, reg::PSF_CFG0),
                Some(psf_cfg0::PCFR_EN | psf_cfg0::IPV4 | (7 << 8))
            );
            assert_eq!(phy.get_register(1, reg::PSF_CFG1), Some(0x02FF));
            assert_eq!(phy.get_register(1, reg::PSF_CFG2), Some(0x2211));
            assert_eq!(phy.get_register(1, reg::PSF_CFG3), Some(0x4433));
            assert_eq!(phy.get_register(1, reg::PCFCR), Some(pcfcr::PCF_EN | (15 << 1)));
        });
        let port = device.port(0).unwrap();
        assert!(port.status_frame_config().control_frame_reads);
        assert!(port.control_frame_config().enabled);
    }

    #[test]
    fn probe_with_control_frames_configures_each_port_once() {
        let phy = MockPhy::new();
        phy.setup_device(4, 0x5CA2);
        let device = Device::probe(
            PagedMdio::new(phy),
            4,
            ProbeConfig::new().with_control_frames(true),
        )
        .unwrap();

        device.with_bus(|bus| {
            let phy = bus.inner();
            for addr in [4, 5] {
                assert_eq!(phy.writes_to(addr, reg::PCFCR).len(), 1);
                assert_eq!(phy.writes_to(addr, reg::PSF_CFG0).len(), 1);
            }
        });
    }

    #[test]
    fn clock_read_is_not_held_up_by_another_device() {
        let busy = probe_dp83640(MockPhy::new(), ProbeConfig::new()).unwrap();
        let idle = probe_dp83640(MockPhy::new(), ProbeConfig::new()).unwrap();
        idle.with_bus(|bus| bus.inner().set_clock(1, 12, 345));
        let held = Barrier::new(2);

        thread::scope(|s| {
            s.spawn(|| {
                let port = busy.port(0).unwrap();
                port.multi_op(|| {
                    held.wait();
                    thread::sleep(Duration::from_millis(500));
                    Ok(())
                })
            });

            held.wait();
            let begin = Instant::now();
            let now = idle.port(0).unwrap().read_clock().unwrap();
            assert!(begin.elapsed() < Duration::from_millis(100));
            assert_eq!(now, PtpTime::new(12, 345));
        });
    }

    #[test]
    fn reset_of_one_device_leaves_another_usable() {
        let phy = MockPhy::new();
        phy.set_reset_latency(50);
        let resetting = probe_dp83640(phy, ProbeConfig::new()).unwrap();
        let other = probe_dp83640(MockPhy::new(), ProbeConfig::new()).unwrap();

        thread::scope(|s| {
            s.spawn(|| resetting.reset(&mut MockDelay::new()));
            other.port(0).unwrap().write(reg::PTP_RATEL, 0x0042).unwrap();
        });

        assert_eq!(other.port(0).unwrap().read(reg::PTP_RATEL), Ok(0x0042));
    }

    #[test]
    fn port_index_is_checked() {
        let device = probe_dp83640(MockPhy::new(), ProbeConfig::new()).unwrap();
        assert!(device.port(0).is_ok());
        assert_eq!(
            device.port(1).err(),
            Some(Error::Config(ConfigError::InvalidPort))
        );
    }

    #[test]
    fn reset_polls_until_bit_clears() {
        let phy = MockPhy::new();
        phy.set_reset_latency(3);
        let device = probe_dp83640(phy, ProbeConfig::new()).unwrap();
        let mut delay = MockDelay::new();

        device.reset(&mut delay).unwrap();

        assert_eq!(delay.total_ns(), 4 * RESET_POLL_INTERVAL_US as u64 * 1000);
        let bmcr = device.with_bus(|bus| bus.inner().get_raw(1, 0, 0)).unwrap();
        assert_eq!(bmcr & bmcr::RESET, 0);
        assert_eq!(bmcr, 0x3100);
    }

    #[test]
    fn release_returns_transport() {
        let device = probe_dp83640(MockPhy::new(), ProbeConfig::new()).unwrap();
        let bus = device.release();
        assert_eq!(bus.inner().get_raw(1, 0, 0x02), Some(0x2000));
    }
}
