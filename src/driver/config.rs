//! Configuration types for the DP83640 driver
//!
//! Each programmable block of the PHY gets one plain configuration struct
//! with a `const fn new()`, `with_*` builders, `validate()` and the register
//! encoders the port uses to program it. Validation runs before the first
//! register write, so a rejected configuration never leaves a block half
//! programmed.

use crate::error::{ConfigError, ConfigResult};
use crate::internal::constants::{
    MAX_GPIO, PCF_DEFAULT_BUF_SIZE, PCF_DEFAULT_MIN_PREAMBLE, PCF_DEFAULT_PSF_IP,
    PSF_IP_HEADER_WORDS, PSF_SOURCE_MACS, PTP_VERSION_2,
};
use crate::internal::phy_regs::dp83640::{
    byte0, clksrc, coc, pcfcr, psf_cfg0, psf_cfg1, psf_ip, rxcfg0, rxcfg3, rxcfg4, rxhash,
    sfdcfg, txcfg0,
};

/// Largest value of a 4-bit field
const NIBBLE_MAX: u8 = 0x0F;

/// Reject GPIO connections the PHY does not have
pub(crate) const fn check_gpio(gpio: u8) -> ConfigResult<()> {
    if gpio > MAX_GPIO {
        Err(ConfigError::InvalidGpio)
    } else {
        Ok(())
    }
}

const fn check_nibble(value: u8) -> ConfigResult<()> {
    if value > NIBBLE_MAX {
        Err(ConfigError::InvalidConfig)
    } else {
        Ok(())
    }
}

// =============================================================================
// First-Byte Filter
// =============================================================================

/// Match on the first byte of the PTP message
///
/// A set bit in `mask` enables matching on the same bit of `data`. A zero
/// mask disables the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FirstByteFilter {
    /// Bits to compare
    pub mask: u8,
    /// Expected bit values
    pub data: u8,
}

impl FirstByteFilter {
    /// Create a filter
    #[must_use]
    pub const fn new(mask: u8, data: u8) -> Self {
        Self { mask, data }
    }

    /// PTP_TXCFG1 / PTP_RXCFG1 value
    #[must_use]
    pub const fn to_bits(self) -> u16 {
        ((self.mask as u16) << byte0::MASK_SHIFT) | ((self.data as u16) << byte0::DATA_SHIFT)
    }
}

// =============================================================================
// Transmit Timestamping
// =============================================================================

/// Transmit timestamp configuration (PTP_TXCFG0/1)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransmitConfig {
    /// Capture transmit timestamps
    pub timestamp: bool,
    /// Detect PTP over IPv4/UDP
    pub ipv4: bool,
    /// Detect PTP over IPv6/UDP
    pub ipv6: bool,
    /// Detect PTP over layer 2
    pub layer2: bool,
    /// Only timestamp frames sent to the IEEE 1588 multicast addresses
    pub ip1588_filter: bool,
    /// Insert the transmit time into one-step Sync messages
    pub one_step_sync: bool,
    /// Insert the Delay_Req timestamp into Delay_Resp messages
    pub delay_req_insert: bool,
    /// NTP timestamping instead of PTP
    pub ntp: bool,
    /// Ignore the two-step flag for one-step operation
    pub ignore_two_step: bool,
    /// Check the CRC of one-step frames
    pub one_step_crc: bool,
    /// Fix up the UDP checksum of one-step frames
    pub one_step_checksum: bool,
    /// PTP version to timestamp (1-15, 0 disables version checking)
    pub ptp_version: u8,
    /// First-byte filter
    pub first_byte: FirstByteFilter,
}

impl Default for TransmitConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TransmitConfig {
    /// Timestamping disabled, PTP version 2
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timestamp: false,
            ipv4: false,
            ipv6: false,
            layer2: false,
            ip1588_filter: false,
            one_step_sync: false,
            delay_req_insert: false,
            ntp: false,
            ignore_two_step: false,
            one_step_crc: false,
            one_step_checksum: false,
            ptp_version: PTP_VERSION_2,
            first_byte: FirstByteFilter { mask: 0, data: 0 },
        }
    }

    /// Enable or disable transmit timestamping
    #[must_use]
    pub const fn with_timestamp(mut self, enabled: bool) -> Self {
        self.timestamp = enabled;
        self
    }

    /// Select the transports to detect
    #[must_use]
    pub const fn with_transports(mut self, ipv4: bool, ipv6: bool, layer2: bool) -> Self {
        self.ipv4 = ipv4;
        self.ipv6 = ipv6;
        self.layer2 = layer2;
        self
    }

    /// Restrict timestamping to the IEEE 1588 multicast addresses
    #[must_use]
    pub const fn with_ip1588_filter(mut self, enabled: bool) -> Self {
        self.ip1588_filter = enabled;
        self
    }

    /// Enable one-step Sync operation
    #[must_use]
    pub const fn with_one_step_sync(mut self, enabled: bool) -> Self {
        self.one_step_sync = enabled;
        self
    }

    /// Set the PTP version
    #[must_use]
    pub const fn with_ptp_version(mut self, version: u8) -> Self {
        self.ptp_version = version;
        self
    }

    /// Set the first-byte filter
    #[must_use]
    pub const fn with_first_byte(mut self, mask: u8, data: u8) -> Self {
        self.first_byte = FirstByteFilter::new(mask, data);
        self
    }

    /// Check field widths
    pub const fn validate(&self) -> ConfigResult<()> {
        check_nibble(self.ptp_version)
    }

    /// PTP_TXCFG0 value
    #[must_use]
    pub const fn txcfg0(&self) -> u16 {
        let mut reg = 0u16;
        if self.one_step_sync {
            reg |= txcfg0::SYNC_1STEP;
        }
        if self.delay_req_insert {
            reg |= txcfg0::DR_INSERT;
        }
        if self.ntp {
            reg |= txcfg0::NTP_TS_EN;
        }
        if self.ignore_two_step {
            reg |= txcfg0::IGNORE_2STEP;
        }
        if self.one_step_crc {
            reg |= txcfg0::CRC_1STEP;
        }
        if self.one_step_checksum {
            reg |= txcfg0::CHK_1STEP;
        }
        if self.ip1588_filter {
            reg |= txcfg0::IP1588_EN;
        }
        if self.layer2 {
            reg |= txcfg0::L2_EN;
        }
        if self.ipv6 {
            reg |= txcfg0::IPV6_EN;
        }
        if self.ipv4 {
            reg |= txcfg0::IPV4_EN;
        }
        if self.timestamp {
            reg |= txcfg0::TS_EN;
        }
        reg | ((self.ptp_version as u16) << txcfg0::PTP_VER_SHIFT)
    }
}

// =============================================================================
// Receive Timestamping
// =============================================================================

/// Width of the seconds field the PHY inserts into received frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SecondsLength {
    /// Least significant byte only
    #[default]
    One = 0,
    /// Two bytes
    Two = 1,
    /// Three bytes
    Three = 2,
    /// Full 32-bit seconds
    Four = 3,
}

impl SecondsLength {
    /// Field width in bytes
    #[must_use]
    pub const fn bytes(self) -> usize {
        self as usize + 1
    }
}

/// Where received timestamps are placed inside frames
///
/// Remembered by the port so timestamps can be pulled back out of frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimestampLayout {
    /// Timestamps are written into received frames
    pub insert: bool,
    /// Timestamps are appended after the PTP message instead of replacing
    /// fields inside it
    pub append: bool,
    /// Width of the seconds field
    pub seconds_length: SecondsLength,
    /// Byte offset of the nanoseconds field
    pub nanoseconds_offset: u8,
    /// Byte offset of the seconds field
    pub seconds_offset: u8,
}

/// Receive timestamp configuration (PTP_RXCFG0-4, PTP_RXHASH)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReceiveConfig {
    /// Capture receive timestamps
    pub timestamp: bool,
    /// Detect PTP over IPv4/UDP
    pub ipv4: bool,
    /// Detect PTP over IPv6/UDP
    pub ipv6: bool,
    /// Detect PTP over layer 2
    pub layer2: bool,
    /// Accept IEEE 1588 multicast addresses 0, 1 and 2 (224.0.1.129-131)
    pub ip1588_addresses: [bool; 3],
    /// Only timestamp frames in `domain`
    pub domain_filter: bool,
    /// Ignore messages from alternate masters
    pub alternate_master_disable: bool,
    /// Only timestamp frames from `user_ip`
    pub user_ip_filter: bool,
    /// Slave mode filtering
    pub slave: bool,
    /// Timestamp frames with UDP checksum errors
    pub accept_udp_errors: bool,
    /// Timestamp frames with CRC errors
    pub accept_crc_errors: bool,
    /// Fix up the IPv4 UDP checksum after insertion
    pub ipv4_udp_modify: bool,
    /// Insert the seconds field as well as nanoseconds
    pub insert_seconds: bool,
    /// Only timestamp frames whose source identity hashes to `source_hash`
    pub source_hash_filter: bool,
    /// PTP version to timestamp (0-15)
    pub ptp_version: u8,
    /// First-byte filter
    pub first_byte: FirstByteFilter,
    /// User IP address
    pub user_ip: u32,
    /// Minimum inter-frame gap for insertion (0-15)
    pub min_ifg: u8,
    /// PTP domain
    pub domain: u8,
    /// Source identity hash (12 bits)
    pub source_hash: u16,
    /// Timestamp insertion layout
    pub layout: TimestampLayout,
}

impl Default for ReceiveConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ReceiveConfig {
    /// Timestamping disabled, PTP version 2
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timestamp: false,
            ipv4: false,
            ipv6: false,
            layer2: false,
            ip1588_addresses: [false; 3],
            domain_filter: false,
            alternate_master_disable: false,
            user_ip_filter: false,
            slave: false,
            accept_udp_errors: false,
            accept_crc_errors: false,
            ipv4_udp_modify: false,
            insert_seconds: false,
            source_hash_filter: false,
            ptp_version: PTP_VERSION_2,
            first_byte: FirstByteFilter { mask: 0, data: 0 },
            user_ip: 0,
            min_ifg: 0,
            domain: 0,
            source_hash: 0,
            layout: TimestampLayout {
                insert: false,
                append: false,
                seconds_length: SecondsLength::One,
                nanoseconds_offset: 0,
                seconds_offset: 0,
            },
        }
    }

    /// Enable or disable receive timestamping
    #[must_use]
    pub const fn with_timestamp(mut self, enabled: bool) -> Self {
        self.timestamp = enabled;
        self
    }

    /// Select the transports to detect
    #[must_use]
    pub const fn with_transports(mut self, ipv4: bool, ipv6: bool, layer2: bool) -> Self {
        self.ipv4 = ipv4;
        self.ipv6 = ipv6;
        self.layer2 = layer2;
        self
    }

    /// Set the PTP version
    #[must_use]
    pub const fn with_ptp_version(mut self, version: u8) -> Self {
        self.ptp_version = version;
        self
    }

    /// Filter on a PTP domain
    #[must_use]
    pub const fn with_domain(mut self, domain: u8) -> Self {
        self.domain_filter = true;
        self.domain = domain;
        self
    }

    /// Filter on a source IP address
    #[must_use]
    pub const fn with_user_ip(mut self, ip: u32) -> Self {
        self.user_ip_filter = true;
        self.user_ip = ip;
        self
    }

    /// Filter on a source identity hash
    #[must_use]
    pub const fn with_source_hash(mut self, hash: u16) -> Self {
        self.source_hash_filter = true;
        self.source_hash = hash;
        self
    }

    /// Insert timestamps into received frames
    #[must_use]
    pub const fn with_insertion(mut self, layout: TimestampLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Check field widths
    pub const fn validate(&self) -> ConfigResult<()> {
        if self.ptp_version > NIBBLE_MAX
            || self.min_ifg > NIBBLE_MAX
            || self.source_hash > rxhash::HASH_MASK
            || (self.layout.nanoseconds_offset as u16) > rxcfg4::OFF_MASK
            || (self.layout.seconds_offset as u16) > rxcfg4::OFF_MASK
        {
            return Err(ConfigError::InvalidConfig);
        }
        Ok(())
    }

    /// PTP_RXCFG0 value (without the user IP half select)
    #[must_use]
    pub const fn rxcfg0(&self) -> u16 {
        let mut reg = 0u16;
        if self.domain_filter {
            reg |= rxcfg0::DOMAIN_EN;
        }
        if self.alternate_master_disable {
            reg |= rxcfg0::ALT_MAST_DIS;
        }
        if self.user_ip_filter {
            reg |= rxcfg0::USER_IP_EN;
        }
        if self.slave {
            reg |= rxcfg0::RX_SLAVE;
        }
        if self.ip1588_addresses[0] {
            reg |= rxcfg0::IP1588_EN0;
        }
        if self.ip1588_addresses[1] {
            reg |= rxcfg0::IP1588_EN1;
        }
        if self.ip1588_addresses[2] {
            reg |= rxcfg0::IP1588_EN2;
        }
        if self.layer2 {
            reg |= rxcfg0::L2_EN;
        }
        if self.ipv6 {
            reg |= rxcfg0::IPV6_EN;
        }
        if self.ipv4 {
            reg |= rxcfg0::IPV4_EN;
        }
        if self.timestamp {
            reg |= rxcfg0::TS_EN;
        }
        reg | ((self.ptp_version as u16) << rxcfg0::PTP_VER_SHIFT)
    }

    /// PTP_RXCFG3 value
    #[must_use]
    pub const fn rxcfg3(&self) -> u16 {
        let mut reg = 0u16;
        if self.accept_udp_errors {
            reg |= rxcfg3::ACC_UDP;
        }
        if self.accept_crc_errors {
            reg |= rxcfg3::ACC_CRC;
        }
        if self.layout.append {
            reg |= rxcfg3::TS_APPEND;
        }
        if self.layout.insert {
            reg |= rxcfg3::TS_INSERT;
        }
        reg | ((self.min_ifg as u16) << rxcfg3::TS_MIN_IFG_SHIFT)
            | (self.domain as u16 & rxcfg3::DOMAIN_MASK)
    }

    /// PTP_RXCFG4 value
    #[must_use]
    pub const fn rxcfg4(&self) -> u16 {
        let mut reg = 0u16;
        if self.ipv4_udp_modify {
            reg |= rxcfg4::IPV4_UDP_MOD;
        }
        if self.insert_seconds {
            reg |= rxcfg4::TS_SEC_EN;
        }
        reg | ((self.layout.seconds_length as u16) << rxcfg4::TS_SEC_LEN_SHIFT)
            | ((self.layout.nanoseconds_offset as u16) << rxcfg4::NS_OFF_SHIFT)
            | ((self.layout.seconds_offset as u16) << rxcfg4::SEC_OFF_SHIFT)
    }

    /// PTP_RXHASH value
    #[must_use]
    pub const fn rxhash(&self) -> u16 {
        let reg = self.source_hash & rxhash::HASH_MASK;
        if self.source_hash_filter {
            reg | rxhash::HASH_EN
        } else {
            reg
        }
    }
}

// =============================================================================
// PHY Status Frames
// =============================================================================

/// Source MAC address of status frames (PSF_CFG0 selector)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PsfSourceMac {
    /// 08:00:17:0B:6B:0F
    #[default]
    Primary = 0,
    /// 08:00:17:00:00:00
    Vendor = 1,
    /// 01:00:00:00:00:00, the multicast bit of the destination
    Multicast = 2,
    /// 00:00:00:00:00:00
    Zero = 3,
}

impl PsfSourceMac {
    /// The address frames from this selector carry
    #[must_use]
    pub const fn address(self) -> [u8; 6] {
        PSF_SOURCE_MACS[self as usize]
    }
}

/// PHY status frame configuration (PSF_CFG0-4)
///
/// The port keeps the last applied configuration: the source MAC, framing
/// and byte order it implies are what status frame recognition and decoding
/// check against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PsfConfig {
    /// Payload words are little-endian
    pub little_endian: bool,
    /// Status frames are IPv4/UDP instead of layer 2
    pub ipv4: bool,
    /// Report transmit timestamps
    pub tx_timestamps: bool,
    /// Report receive timestamps
    pub rx_timestamps: bool,
    /// Report trigger completion
    pub triggers: bool,
    /// Report events
    pub events: bool,
    /// Report status frame errors
    pub errors: bool,
    /// Deliver control frame read responses
    pub control_frame_reads: bool,
    /// Source MAC selector
    pub source_mac: PsfSourceMac,
    /// Minimum preamble before a status frame (0-7)
    pub min_preamble: u8,
    /// PTP header reserved field (0-15)
    pub ptp_reserved: u8,
    /// PTP header version (0-15)
    pub ptp_version: u8,
    /// PTP header transport specific field (0-15)
    pub transport_specific: u8,
    /// PTP header message type (0-15)
    pub message_type: u8,
    /// IPv4 source address, most significant byte first
    pub source_ip: u32,
}

impl Default for PsfConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl PsfConfig {
    /// All reports disabled, layer 2 big-endian framing
    #[must_use]
    pub const fn new() -> Self {
        Self {
            little_endian: false,
            ipv4: false,
            tx_timestamps: false,
            rx_timestamps: false,
            triggers: false,
            events: false,
            errors: false,
            control_frame_reads: false,
            source_mac: PsfSourceMac::Primary,
            min_preamble: 0,
            ptp_reserved: 0,
            ptp_version: PTP_VERSION_2,
            transport_specific: 0,
            message_type: 0,
            source_ip: 0,
        }
    }

    /// Configuration applied at probe when control frames are the only path
    /// to the PHY: read responses over IPv4 framing
    #[must_use]
    pub const fn control_frame_default() -> Self {
        Self {
            ipv4: true,
            control_frame_reads: true,
            min_preamble: PCF_DEFAULT_MIN_PREAMBLE,
            transport_specific: NIBBLE_MAX,
            message_type: NIBBLE_MAX,
            source_ip: PCF_DEFAULT_PSF_IP,
            ..Self::new()
        }
    }

    /// Select the reports carried by status frames
    #[must_use]
    pub const fn with_reports(
        mut self,
        tx_timestamps: bool,
        rx_timestamps: bool,
        triggers: bool,
        events: bool,
    ) -> Self {
        self.tx_timestamps = tx_timestamps;
        self.rx_timestamps = rx_timestamps;
        self.triggers = triggers;
        self.events = events;
        self
    }

    /// Report status frame errors
    #[must_use]
    pub const fn with_errors(mut self, enabled: bool) -> Self {
        self.errors = enabled;
        self
    }

    /// Use IPv4/UDP framing from `source_ip`
    #[must_use]
    pub const fn with_ipv4(mut self, source_ip: u32) -> Self {
        self.ipv4 = true;
        self.source_ip = source_ip;
        self
    }

    /// Set the payload byte order
    #[must_use]
    pub const fn with_little_endian(mut self, enabled: bool) -> Self {
        self.little_endian = enabled;
        self
    }

    /// Set the source MAC selector
    #[must_use]
    pub const fn with_source_mac(mut self, source_mac: PsfSourceMac) -> Self {
        self.source_mac = source_mac;
        self
    }

    /// Set the minimum preamble
    #[must_use]
    pub const fn with_min_preamble(mut self, min_preamble: u8) -> Self {
        self.min_preamble = min_preamble;
        self
    }

    /// Set the PTP header fields of status frames
    #[must_use]
    pub const fn with_ptp_header(
        mut self,
        reserved: u8,
        version: u8,
        transport_specific: u8,
        message_type: u8,
    ) -> Self {
        self.ptp_reserved = reserved;
        self.ptp_version = version;
        self.transport_specific = transport_specific;
        self.message_type = message_type;
        self
    }

    /// Check field widths
    pub const fn validate(&self) -> ConfigResult<()> {
        if self.min_preamble > (psf_cfg0::MIN_PRE_MASK >> psf_cfg0::MIN_PRE_SHIFT) as u8 {
            return Err(ConfigError::InvalidConfig);
        }
        if self.ptp_reserved > NIBBLE_MAX
            || self.ptp_version > NIBBLE_MAX
            || self.transport_specific > NIBBLE_MAX
            || self.message_type > NIBBLE_MAX
        {
            return Err(ConfigError::InvalidConfig);
        }
        Ok(())
    }

    /// Source MAC address status frames will carry
    #[must_use]
    pub const fn source_mac_address(&self) -> [u8; 6] {
        self.source_mac.address()
    }

    /// PSF_CFG0 value
    #[must_use]
    pub const fn cfg0(&self) -> u16 {
        let mut reg = 0u16;
        if self.little_endian {
            reg |= psf_cfg0::ENDIAN;
        }
        if self.ipv4 {
            reg |= psf_cfg0::IPV4;
        }
        if self.tx_timestamps {
            reg |= psf_cfg0::TXTS_EN;
        }
        if self.rx_timestamps {
            reg |= psf_cfg0::RXTS_EN;
        }
        if self.triggers {
            reg |= psf_cfg0::TRIG_EN;
        }
        if self.events {
            reg |= psf_cfg0::EVNT_EN;
        }
        if self.errors {
            reg |= psf_cfg0::ERR_EN;
        }
        if self.control_frame_reads {
            reg |= psf_cfg0::PCFR_EN;
        }
        reg | ((self.source_mac as u16) << psf_cfg0::MAC_SRC_SHIFT)
            | ((self.min_preamble as u16) << psf_cfg0::MIN_PRE_SHIFT)
    }

    /// PSF_CFG1 value
    #[must_use]
    pub const fn cfg1(&self) -> u16 {
        ((self.ptp_reserved as u16) << psf_cfg1::RESERVED_SHIFT)
            | ((self.ptp_version as u16) << psf_cfg1::VERSION_SHIFT)
            | ((self.transport_specific as u16) << psf_cfg1::TRANSPORT_SHIFT)
            | ((self.message_type as u16) << psf_cfg1::MESSAGE_TYPE_SHIFT)
    }

    /// PSF_CFG2 value: IP address bytes 0 and 1
    #[must_use]
    pub const fn cfg2(&self) -> u16 {
        let ip = self.source_ip;
        (((ip & 0xFF) as u16) << psf_ip::LO_SHIFT) | ((((ip >> 8) & 0xFF) as u16) << psf_ip::HI_SHIFT)
    }

    /// PSF_CFG3 value: IP address bytes 2 and 3
    #[must_use]
    pub const fn cfg3(&self) -> u16 {
        let ip = self.source_ip;
        ((((ip >> 16) & 0xFF) as u16) << psf_ip::LO_SHIFT)
            | ((((ip >> 24) & 0xFF) as u16) << psf_ip::HI_SHIFT)
    }

    /// PSF_CFG4 value: partial IPv4 header checksum
    ///
    /// One's-complement sum of the fixed header words and the byte-swapped
    /// source address halves, folded to 16 bits. The PHY completes the
    /// checksum, so the result is not complemented.
    #[must_use]
    pub const fn ip_checksum(&self) -> u16 {
        let ip = self.source_ip;
        let mut sum = 0u32;
        let mut i = 0;
        while i < PSF_IP_HEADER_WORDS.len() {
            sum += PSF_IP_HEADER_WORDS[i] as u32;
            i += 1;
        }
        sum += ((ip & 0x0000_00FF) << 8) | ((ip & 0x0000_FF00) >> 8);
        sum += ((ip & 0x00FF_0000) >> 8) | ((ip & 0xFF00_0000) >> 24);
        while sum > 0xFFFF {
            sum = (sum & 0xFFFF) + (sum >> 16);
        }
        sum as u16
    }
}

// =============================================================================
// Clock Output
// =============================================================================

/// PTP reference clock source (PTP_CLKSRC)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ClockSource {
    /// 125 MHz from the internal PGM
    #[default]
    Internal = 0,
    /// Divide-by-N from the internal 125 MHz PGM
    DivideByN = 1,
    /// External reference clock
    External = 2,
}

/// Clock output and reference configuration (PTP_COC, PTP_CLKSRC, PHYCR2)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockOutputConfig {
    /// Drive the PTP clock output
    pub enabled: bool,
    /// Output the frequency-controlled oscillator instead of the PGM
    pub select: bool,
    /// Fast rise/fall times on the output
    pub speed_select: bool,
    /// Output divider from the internal 250 MHz clock (2-255)
    pub divide_by: u8,
    /// Reference clock source
    pub source: ClockSource,
    /// Reference clock period in nanoseconds (8-127; ignored for
    /// [`ClockSource::Internal`])
    pub source_period: u8,
}

impl Default for ClockOutputConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockOutputConfig {
    /// Smallest divider that keeps the output running
    pub const MIN_DIVIDE_BY: u8 = 2;
    /// Smallest reference period the PHY accepts
    pub const MIN_SOURCE_PERIOD: u8 = 8;

    /// Output disabled, 25 MHz divider, internal reference
    #[must_use]
    pub const fn new() -> Self {
        Self {
            enabled: false,
            select: false,
            speed_select: false,
            divide_by: 10,
            source: ClockSource::Internal,
            source_period: Self::MIN_SOURCE_PERIOD,
        }
    }

    /// Enable the output with a divider
    #[must_use]
    pub const fn with_output(mut self, divide_by: u8) -> Self {
        self.enabled = true;
        self.divide_by = divide_by;
        self
    }

    /// Select the reference source
    #[must_use]
    pub const fn with_source(mut self, source: ClockSource, period_ns: u8) -> Self {
        self.source = source;
        self.source_period = period_ns;
        self
    }

    /// Check field ranges
    pub const fn validate(&self) -> ConfigResult<()> {
        if self.divide_by < Self::MIN_DIVIDE_BY {
            return Err(ConfigError::InvalidConfig);
        }
        if (self.source_period as u16) > clksrc::PERIOD_MASK {
            return Err(ConfigError::InvalidConfig);
        }
        if !matches!(self.source, ClockSource::Internal)
            && self.source_period < Self::MIN_SOURCE_PERIOD
        {
            return Err(ConfigError::InvalidConfig);
        }
        Ok(())
    }

    /// PTP_COC value
    #[must_use]
    pub const fn coc(&self) -> u16 {
        let mut reg = self.divide_by as u16 & coc::CLKDIV_MASK;
        if self.enabled {
            reg |= coc::CLKOUT_EN;
        }
        if self.select {
            reg |= coc::CLKOUT_SEL;
        }
        if self.speed_select {
            reg |= coc::CLKOUT_SPSEL;
        }
        reg
    }

    /// PTP_CLKSRC value
    #[must_use]
    pub const fn clksrc(&self) -> u16 {
        ((self.source as u16) << clksrc::SRC_SHIFT) | (self.source_period as u16 & clksrc::PERIOD_MASK)
    }
}

// =============================================================================
// Miscellaneous
// =============================================================================

/// Miscellaneous PTP configuration (PTP_ETR, PTP_OFF, PTP_SFDCFG)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MiscConfig {
    /// EtherType identifying layer 2 PTP messages
    pub ether_type: u16,
    /// Offset of the PTP message from the EtherType (layer 2) or the end of
    /// the UDP header
    pub ptp_offset: u8,
    /// GPIO carrying the transmit start-of-frame strobe (0 disables)
    pub tx_sfd_gpio: u8,
    /// GPIO carrying the receive start-of-frame strobe (0 disables)
    pub rx_sfd_gpio: u8,
}

impl Default for MiscConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl MiscConfig {
    /// IEEE 1588 EtherType, no offset, strobes disabled
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ether_type: 0x88F7,
            ptp_offset: 0,
            tx_sfd_gpio: 0,
            rx_sfd_gpio: 0,
        }
    }

    /// Route the start-of-frame strobes to GPIOs
    #[must_use]
    pub const fn with_sfd_gpios(mut self, tx: u8, rx: u8) -> Self {
        self.tx_sfd_gpio = tx;
        self.rx_sfd_gpio = rx;
        self
    }

    /// Check GPIO ranges
    pub const fn validate(&self) -> ConfigResult<()> {
        if let Err(e) = check_gpio(self.tx_sfd_gpio) {
            return Err(e);
        }
        check_gpio(self.rx_sfd_gpio)
    }

    /// PTP_SFDCFG value
    #[must_use]
    pub const fn sfdcfg(&self) -> u16 {
        ((self.tx_sfd_gpio as u16) << sfdcfg::TX_GPIO_SHIFT)
            | ((self.rx_sfd_gpio as u16) << sfdcfg::RX_GPIO_SHIFT)
    }
}

// =============================================================================
// Management Interface
// =============================================================================

/// PHY control frame configuration (PCFCR)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlFrameConfig {
    /// Accept control frames
    pub enabled: bool,
    /// Match control frames on 08:00:17:00:00:00 instead of
    /// 08:00:17:0B:6B:0F
    pub alternate_destination: bool,
    /// Bytes the PHY buffers before forwarding a possible control frame
    /// (0-15)
    pub buffer_size: u8,
}

impl Default for ControlFrameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlFrameConfig {
    /// Control frames disabled
    #[must_use]
    pub const fn new() -> Self {
        Self {
            enabled: false,
            alternate_destination: false,
            buffer_size: 0,
        }
    }

    /// Control frames enabled with the largest buffer
    #[must_use]
    pub const fn enabled() -> Self {
        Self {
            enabled: true,
            alternate_destination: false,
            buffer_size: PCF_DEFAULT_BUF_SIZE,
        }
    }

    /// Set the buffer size
    #[must_use]
    pub const fn with_buffer_size(mut self, size: u8) -> Self {
        self.buffer_size = size;
        self
    }

    /// Select the alternate destination address
    #[must_use]
    pub const fn with_alternate_destination(mut self, alternate: bool) -> Self {
        self.alternate_destination = alternate;
        self
    }

    /// Check field widths
    pub const fn validate(&self) -> ConfigResult<()> {
        check_nibble(self.buffer_size)
    }

    /// PCFCR value when enabling
    #[must_use]
    pub const fn pcfcr(&self) -> u16 {
        let mut reg = pcfcr::PCF_EN | (((self.buffer_size as u16) << pcfcr::BUF_SHIFT) & pcfcr::BUF_MASK);
        if self.alternate_destination {
            reg |= pcfcr::DA_SEL;
        }
        reg
    }
}

// =============================================================================
// Probe
// =============================================================================

/// Options for [`Device::probe`](crate::driver::device::Device::probe)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ProbeConfig {
    /// Control frames are the only path to the PHY: every port is brought
    /// up with [`PsfConfig::control_frame_default`] and control frames
    /// enabled
    pub control_frames: bool,
}

impl ProbeConfig {
    /// Plain MDIO probe
    #[must_use]
    pub const fn new() -> Self {
        Self {
            control_frames: false,
        }
    }

    /// Bring ports up for control-frame-only access
    #[must_use]
    pub const fn with_control_frames(mut self, enabled: bool) -> Self {
        self.control_frames = enabled;
        self
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gpio_range_is_checked() {
        assert_eq!(check_gpio(0), Ok(()));
        assert_eq!(check_gpio(12), Ok(()));
        assert_eq!(check_gpio(13), Err(ConfigError::InvalidGpio));
    }

    #[test]
    fn transmit_config_encodes_options_and_version() {
        let config = TransmitConfig::new()
            .with_timestamp(true)
            .with_transports(true, false, true)
            .with_first_byte(0x0F, 0x02);

        assert_eq!(
            config.txcfg0(),
            txcfg0::TS_EN | txcfg0::IPV4_EN | txcfg0::L2_EN | (2 << 1)
        );
        assert_eq!(config.first_byte.to_bits(), 0x0F02);
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(
            config.with_ptp_version(16).validate(),
            Err(ConfigError::InvalidConfig)
        );
    }

    #[test]
    fn receive_config_encodes_layout() {
        let config = ReceiveConfig::new()
            .with_timestamp(true)
            .with_domain(0x12)
            .with_source_hash(0xABC)
            .with_insertion(TimestampLayout {
                insert: true,
                append: true,
                seconds_length: SecondsLength::Three,
                nanoseconds_offset: 10,
                seconds_offset: 5,
            });

        assert_eq!(
            config.rxcfg0(),
            rxcfg0::DOMAIN_EN | rxcfg0::TS_EN | (2 << 1)
        );
        assert_eq!(
            config.rxcfg3(),
            rxcfg3::TS_APPEND | rxcfg3::TS_INSERT | 0x12
        );
        assert_eq!(config.rxcfg4(), (2 << 12) | (10 << 6) | 5);
        assert_eq!(config.rxhash(), rxhash::HASH_EN | 0xABC);
    }

    #[test]
    fn receive_config_rejects_wide_offsets() {
        let mut config = ReceiveConfig::new();
        config.layout.nanoseconds_offset = 64;
        assert_eq!(config.validate(), Err(ConfigError::InvalidConfig));

        let config = ReceiveConfig::new().with_source_hash(0x1000);
        assert_eq!(config.validate(), Err(ConfigError::InvalidConfig));
    }

    #[test]
    fn seconds_length_bytes() {
        assert_eq!(SecondsLength::One.bytes(), 1);
        assert_eq!(SecondsLength::Two.bytes(), 2);
        assert_eq!(SecondsLength::Three.bytes(), 3);
        assert_eq!(SecondsLength::Four.bytes(), 4);
    }

    #[test]
    fn psf_source_mac_table() {
        assert_eq!(
            PsfSourceMac::Primary.address(),
            [0x08, 0x00, 0x17, 0x0B, 0x6B, 0x0F]
        );
        assert_eq!(
            PsfSourceMac::Vendor.address(),
            [0x08, 0x00, 0x17, 0x00, 0x00, 0x00]
        );
        assert_eq!(
            PsfSourceMac::Multicast.address(),
            [0x01, 0x00, 0x00, 0x00, 0x00, 0x00]
        );
        assert_eq!(PsfSourceMac::Zero.address(), [0; 6]);
    }

    #[test]
    fn psf_control_frame_default_registers() {
        let config = PsfConfig::control_frame_default();

        assert_eq!(config.cfg0(), psf_cfg0::PCFR_EN | psf_cfg0::IPV4 | (7 << 8));
        assert_eq!(config.cfg1(), 0x02FF);
        assert_eq!(config.cfg2(), 0x2211);
        assert_eq!(config.cfg3(), 0x4433);
        assert_eq!(config.source_mac_address(), PsfSourceMac::Primary.address());
    }

    #[test]
    fn psf_ip_checksum_folds_carries() {
        // 0x4500 + 0x0111 + 0xE000 + 0x0181 + 0x1122 + 0x3344 = 0x16BF8
        let config = PsfConfig::control_frame_default();
        assert_eq!(config.ip_checksum(), 0x6BF9);

        // Without an address the fixed words alone: 0x12792 -> 0x2793
        assert_eq!(PsfConfig::new().ip_checksum(), 0x2793);
    }

    #[test]
    fn psf_config_rejects_wide_fields() {
        assert_eq!(
            PsfConfig::new().with_min_preamble(8).validate(),
            Err(ConfigError::InvalidConfig)
        );
        assert_eq!(
            PsfConfig::new().with_ptp_header(0, 16, 0, 0).validate(),
            Err(ConfigError::InvalidConfig)
        );
        assert_eq!(PsfConfig::control_frame_default().validate(), Ok(()));
    }

    #[test]
    fn clock_output_divider_and_source() {
        let config = ClockOutputConfig::new()
            .with_output(25)
            .with_source(ClockSource::External, 40);

        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.coc(), coc::CLKOUT_EN | 25);
        assert_eq!(config.clksrc(), (2 << 14) | 40);

        assert_eq!(
            ClockOutputConfig::new().with_output(1).validate(),
            Err(ConfigError::InvalidConfig)
        );
        assert_eq!(
            ClockOutputConfig::new()
                .with_source(ClockSource::DivideByN, 4)
                .validate(),
            Err(ConfigError::InvalidConfig)
        );
    }

    #[test]
    fn misc_config_checks_gpios() {
        let config = MiscConfig::new().with_sfd_gpios(3, 4);
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.sfdcfg(), 0x0034);
        assert_eq!(
            MiscConfig::new().with_sfd_gpios(13, 0).validate(),
            Err(ConfigError::InvalidGpio)
        );
    }

    #[test]
    fn control_frame_register_value() {
        assert_eq!(
            ControlFrameConfig::enabled().pcfcr(),
            pcfcr::PCF_EN | (15 << 1)
        );
        assert_eq!(
            ControlFrameConfig::enabled()
                .with_alternate_destination(true)
                .with_buffer_size(3)
                .pcfcr(),
            pcfcr::PCF_EN | (3 << 1) | pcfcr::DA_SEL
        );
        assert_eq!(
            ControlFrameConfig::enabled().with_buffer_size(16).validate(),
            Err(ConfigError::InvalidConfig)
        );
    }
}
