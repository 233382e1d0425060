//! DP83640 Extended Register Definitions
//!
//! Register indices in this module carry their page in bits 7:5, matching
//! [`RegisterIndex`](crate::hal::register::RegisterIndex): `0x94` is page 4,
//! register `0x14`. The page-select side write is performed by the register
//! façade, never by callers.
//!
//! # Module Organization
//!
//! - `reg`: Register indices (pages 0, 4, 5 and 6)
//! - `ptp_ctl`, `ptp_sts`, `ptp_tsts`, `ptp_rate`, `ptp_ests`, `ptp_edata`:
//!   page 4 clock/status fields
//! - `ptp_trig`, `ptp_evnt`, `txcfg0`, `rxcfg0`, `rxcfg3`, `rxcfg4`,
//!   `byte0`, `psf_cfg0`: page 5 configuration fields
//! - `coc`, `psf_cfg1`, `psf_ip`, `sfdcfg`, `clksrc`, `rxhash`: page 6 fields
//! - `phycr2`, `pcfcr`: page 0 vendor fields
//!
//! # References
//!
//! - DP83640 Precision PHYTER datasheet (SNOSAY8)

// =============================================================================
// Register Indices
// =============================================================================

/// Extended register indices
pub mod reg {
    /// Page select register (unpaged)
    pub const PAGESEL: u16 = 0x13;
    /// PHY Control Register 2 (page 0)
    pub const PHYCR2: u16 = 0x1C;
    /// PHY Control Frames Configuration Register (page 0)
    pub const PCFCR: u16 = 0x1F;

    /// PTP Control
    pub const PTP_CTL: u16 = 0x94;
    /// PTP Time Data
    pub const PTP_TDR: u16 = 0x95;
    /// PTP Status
    pub const PTP_STS: u16 = 0x96;
    /// PTP Trigger Status
    pub const PTP_TSTS: u16 = 0x97;
    /// PTP Rate Low
    pub const PTP_RATEL: u16 = 0x98;
    /// PTP Rate High
    pub const PTP_RATEH: u16 = 0x99;
    /// PTP Transmit Timestamp
    pub const PTP_TXTS: u16 = 0x9C;
    /// PTP Receive Timestamp
    pub const PTP_RXTS: u16 = 0x9D;
    /// PTP Event Status
    pub const PTP_ESTS: u16 = 0x9E;
    /// PTP Event Data
    pub const PTP_EDATA: u16 = 0x9F;

    /// PTP Trigger Configuration
    pub const PTP_TRIG: u16 = 0xB4;
    /// PTP Event Configuration
    pub const PTP_EVNT: u16 = 0xB5;
    /// PTP Transmit Configuration 0
    pub const PTP_TXCFG0: u16 = 0xB6;
    /// PTP Transmit Configuration 1
    pub const PTP_TXCFG1: u16 = 0xB7;
    /// PHY Status Frame Configuration 0
    pub const PSF_CFG0: u16 = 0xB8;
    /// PTP Receive Configuration 0
    pub const PTP_RXCFG0: u16 = 0xB9;
    /// PTP Receive Configuration 1
    pub const PTP_RXCFG1: u16 = 0xBA;
    /// PTP Receive Configuration 2
    pub const PTP_RXCFG2: u16 = 0xBB;
    /// PTP Receive Configuration 3
    pub const PTP_RXCFG3: u16 = 0xBC;
    /// PTP Receive Configuration 4
    pub const PTP_RXCFG4: u16 = 0xBD;
    /// PTP Temporary Rate Duration Low
    pub const PTP_TRDL: u16 = 0xBE;
    /// PTP Temporary Rate Duration High
    pub const PTP_TRDH: u16 = 0xBF;

    /// PTP Clock Output Control
    pub const PTP_COC: u16 = 0xD4;
    /// PHY Status Frame Configuration 1
    pub const PSF_CFG1: u16 = 0xD5;
    /// PHY Status Frame Configuration 2
    pub const PSF_CFG2: u16 = 0xD6;
    /// PHY Status Frame Configuration 3
    pub const PSF_CFG3: u16 = 0xD7;
    /// PHY Status Frame Configuration 4
    pub const PSF_CFG4: u16 = 0xD8;
    /// PTP SFD Configuration
    pub const PTP_SFDCFG: u16 = 0xD9;
    /// PTP Interrupt Control
    pub const PTP_INTCTL: u16 = 0xDA;
    /// PTP Clock Source
    pub const PTP_CLKSRC: u16 = 0xDB;
    /// PTP Ethernet Type
    pub const PTP_ETR: u16 = 0xDC;
    /// PTP Offset
    pub const PTP_OFF: u16 = 0xDD;
    /// PTP GPIO Monitor
    pub const PTP_GPIOMON: u16 = 0xDE;
    /// PTP Receive Hash
    pub const PTP_RXHASH: u16 = 0xDF;
}

// =============================================================================
// Page 4 - Clock and Status
// =============================================================================

/// PTP_CTL command bits
pub mod ptp_ctl {
    /// Trigger select field shift
    pub const TRIG_SEL_SHIFT: u16 = 10;
    /// Trigger select field mask
    pub const TRIG_SEL_MASK: u16 = 0x1C00;
    /// Disable selected trigger
    pub const TRIG_DIS: u16 = 1 << 9;
    /// Enable selected trigger
    pub const TRIG_EN: u16 = 1 << 8;
    /// Load selected trigger from PTP_TDR
    pub const TRIG_LOAD: u16 = 1 << 6;
    /// Latch clock into PTP_TDR for reading
    pub const RD_CLK: u16 = 1 << 5;
    /// Load clock from PTP_TDR
    pub const LOAD_CLK: u16 = 1 << 4;
    /// Step clock by PTP_TDR value
    pub const STEP_CLK: u16 = 1 << 3;
    /// Enable the 1588 clock
    pub const ENABLE: u16 = 1 << 2;
    /// Disable the 1588 clock
    pub const DISABLE: u16 = 1 << 1;
}

/// PTP_STS bits
pub mod ptp_sts {
    /// Transmit timestamp available
    pub const TXTS_RDY: u16 = 1 << 11;
    /// Receive timestamp available
    pub const RXTS_RDY: u16 = 1 << 10;
    /// Trigger done
    pub const TRIG_DONE: u16 = 1 << 9;
    /// Event timestamp available
    pub const EVENT_RDY: u16 = 1 << 8;
    /// Transmit timestamp interrupt enable
    pub const TXTS_IE: u16 = 1 << 3;
    /// Trigger interrupt enable
    pub const TRIG_IE: u16 = 1 << 1;
}

/// PTP_TSTS layout: two bits per trigger
pub mod ptp_tsts {
    /// Bits occupied by each trigger
    pub const BITS_PER_TRIGGER: u16 = 2;
    /// Trigger still active (not yet expired)
    pub const ACTIVE: u16 = 1 << 0;
    /// Trigger expired late
    pub const ERROR: u16 = 1 << 1;
}

/// PTP_RATEH / PTP_TRDH fields
pub mod ptp_rate {
    /// Rate direction (set = slower)
    pub const DIR: u16 = 1 << 15;
    /// Temporary rate
    pub const TEMP: u16 = 1 << 14;
    /// High bits of the rate or duration
    pub const HI_MASK: u16 = 0x03FF;
    /// Shift of the high bits within the 26-bit value
    pub const HI_SHIFT: u32 = 16;
}

/// PTP_ESTS fields
pub mod ptp_ests {
    /// Events missed field mask
    pub const EVNTS_MISSED_MASK: u16 = 0x0700;
    /// Events missed field shift
    pub const EVNTS_MISSED_SHIFT: u16 = 8;
    /// Timestamp length field mask (PSF event messages)
    pub const TS_LEN_MASK: u16 = 0x00C0;
    /// Timestamp length field shift
    pub const TS_LEN_SHIFT: u16 = 6;
    /// Rising edge
    pub const EVNT_RF: u16 = 1 << 5;
    /// Event number mask
    pub const EVNT_NUM_MASK: u16 = 0x001C;
    /// Event number shift
    pub const EVNT_NUM_SHIFT: u16 = 2;
    /// Multiple events detected
    pub const MULT_EVENT: u16 = 1 << 1;
    /// Event detected
    pub const EVENT_DET: u16 = 1 << 0;
}

/// Extended event status word (first PTP_EDATA read on multi-event)
pub mod ptp_edata {
    /// Bits occupied by each event
    pub const BITS_PER_EVENT: u16 = 2;
    /// Event detected
    pub const DET: u16 = 1 << 0;
    /// Event was a rising edge
    pub const RISE: u16 = 1 << 1;
}

/// Timestamp words shared by PTP_TXTS, PTP_RXTS and PSF timestamp messages
pub mod ts_word {
    /// Overflow counter in the nanoseconds-high word
    pub const OVERFLOW_MASK: u16 = 0xC000;
    /// Overflow counter shift
    pub const OVERFLOW_SHIFT: u16 = 14;
    /// Nanoseconds-high bits
    pub const NS_HI_MASK: u16 = 0x3FFF;
    /// Message type in the type/hash word
    pub const MSG_TYPE_SHIFT: u16 = 12;
    /// Source hash in the type/hash word
    pub const HASH_MASK: u16 = 0x0FFF;
}

/// Trigger arm words written to PTP_TDR
pub mod trig_arm {
    /// Initial output state (in the expire nanoseconds-high word)
    pub const INITIAL_STATE: u16 = 1 << 15;
    /// Wait for a seconds rollover before arming
    pub const WAIT_ROLLOVER: u16 = 1 << 14;
}

// =============================================================================
// Page 5 - Configuration
// =============================================================================

/// PTP_TRIG fields
pub mod ptp_trig {
    /// Pulse output
    pub const PULSE: u16 = 1 << 15;
    /// Periodic output
    pub const PER: u16 = 1 << 14;
    /// Fire immediately if armed late
    pub const IF_LATE: u16 = 1 << 13;
    /// Report trigger completion
    pub const NOTIFY: u16 = 1 << 12;
    /// GPIO connection shift
    pub const GPIO_SHIFT: u16 = 8;
    /// Toggle mode
    pub const TOGGLE: u16 = 1 << 7;
    /// Trigger select shift
    pub const CSEL_SHIFT: u16 = 1;
    /// Write strobe
    pub const WR: u16 = 1 << 0;
}

/// PTP_EVNT fields
pub mod ptp_evnt {
    /// Detect rising edges
    pub const RISE: u16 = 1 << 14;
    /// Detect falling edges
    pub const FALL: u16 = 1 << 13;
    /// Single-shot capture
    pub const SINGLE: u16 = 1 << 12;
    /// GPIO connection shift
    pub const GPIO_SHIFT: u16 = 8;
    /// Event select shift
    pub const SEL_SHIFT: u16 = 1;
    /// Write strobe
    pub const WR: u16 = 1 << 0;
}

/// PTP_TXCFG0 bits
pub mod txcfg0 {
    /// One-step Sync insertion
    pub const SYNC_1STEP: u16 = 1 << 15;
    /// Insert Delay_Req timestamp into Delay_Resp
    pub const DR_INSERT: u16 = 1 << 13;
    /// NTP timestamping
    pub const NTP_TS_EN: u16 = 1 << 12;
    /// Ignore two-step flag
    pub const IGNORE_2STEP: u16 = 1 << 11;
    /// Check CRC on one-step
    pub const CRC_1STEP: u16 = 1 << 10;
    /// UDP checksum update on one-step
    pub const CHK_1STEP: u16 = 1 << 9;
    /// Enable IEEE 1588 address filtering
    pub const IP1588_EN: u16 = 1 << 8;
    /// Layer 2 timestamping
    pub const L2_EN: u16 = 1 << 7;
    /// IPv6 timestamping
    pub const IPV6_EN: u16 = 1 << 6;
    /// IPv4 timestamping
    pub const IPV4_EN: u16 = 1 << 5;
    /// PTP version shift
    pub const PTP_VER_SHIFT: u16 = 1;
    /// Transmit timestamp enable
    pub const TS_EN: u16 = 1 << 0;
}

/// First-byte filter (PTP_TXCFG1 and PTP_RXCFG1)
pub mod byte0 {
    /// Mask shift
    pub const MASK_SHIFT: u16 = 8;
    /// Data shift
    pub const DATA_SHIFT: u16 = 0;
}

/// PSF_CFG0 bits
pub mod psf_cfg0 {
    /// MAC source address selector shift
    pub const MAC_SRC_SHIFT: u16 = 11;
    /// Minimum preamble shift
    pub const MIN_PRE_SHIFT: u16 = 8;
    /// Minimum preamble mask
    pub const MIN_PRE_MASK: u16 = 0x0700;
    /// Little-endian status frame payload
    pub const ENDIAN: u16 = 1 << 7;
    /// IPv4/UDP framing
    pub const IPV4: u16 = 1 << 6;
    /// PHY control frame read responses
    pub const PCFR_EN: u16 = 1 << 5;
    /// Error messages
    pub const ERR_EN: u16 = 1 << 4;
    /// Transmit timestamp messages
    pub const TXTS_EN: u16 = 1 << 3;
    /// Receive timestamp messages
    pub const RXTS_EN: u16 = 1 << 2;
    /// Trigger messages
    pub const TRIG_EN: u16 = 1 << 1;
    /// Event messages
    pub const EVNT_EN: u16 = 1 << 0;
}

/// PTP_RXCFG0 bits
pub mod rxcfg0 {
    /// Domain match
    pub const DOMAIN_EN: u16 = 1 << 15;
    /// Alternate master disable
    pub const ALT_MAST_DIS: u16 = 1 << 14;
    /// Selects which half of the user IP address PTP_RXCFG2 holds
    pub const USER_IP_SEL: u16 = 1 << 13;
    /// User IP address filter
    pub const USER_IP_EN: u16 = 1 << 12;
    /// Slave mode filtering
    pub const RX_SLAVE: u16 = 1 << 11;
    /// IEEE 1588 multicast address 2
    pub const IP1588_EN2: u16 = 1 << 10;
    /// IEEE 1588 multicast address 1
    pub const IP1588_EN1: u16 = 1 << 9;
    /// IEEE 1588 multicast address 0
    pub const IP1588_EN0: u16 = 1 << 8;
    /// Layer 2 timestamping
    pub const L2_EN: u16 = 1 << 7;
    /// IPv6 timestamping
    pub const IPV6_EN: u16 = 1 << 6;
    /// IPv4 timestamping
    pub const IPV4_EN: u16 = 1 << 5;
    /// PTP version shift
    pub const PTP_VER_SHIFT: u16 = 1;
    /// Receive timestamp enable
    pub const TS_EN: u16 = 1 << 0;
}

/// PTP_RXCFG3 fields
pub mod rxcfg3 {
    /// Minimum inter-frame gap shift
    pub const TS_MIN_IFG_SHIFT: u16 = 12;
    /// Accept UDP checksum errors
    pub const ACC_UDP: u16 = 1 << 11;
    /// Accept CRC errors
    pub const ACC_CRC: u16 = 1 << 10;
    /// Append timestamp after the PTP message
    pub const TS_APPEND: u16 = 1 << 9;
    /// Insert timestamp into the PTP message
    pub const TS_INSERT: u16 = 1 << 8;
    /// PTP domain mask
    pub const DOMAIN_MASK: u16 = 0x00FF;
}

/// PTP_RXCFG4 fields
pub mod rxcfg4 {
    /// IPv4 UDP checksum modification
    pub const IPV4_UDP_MOD: u16 = 1 << 15;
    /// Insert seconds field
    pub const TS_SEC_EN: u16 = 1 << 14;
    /// Seconds field length shift
    pub const TS_SEC_LEN_SHIFT: u16 = 12;
    /// Nanoseconds field offset shift
    pub const NS_OFF_SHIFT: u16 = 6;
    /// Seconds field offset shift
    pub const SEC_OFF_SHIFT: u16 = 0;
    /// Offset field width mask (both offsets)
    pub const OFF_MASK: u16 = 0x003F;
}

// =============================================================================
// Page 6 - Output, Status Frames and Misc
// =============================================================================

/// PTP_COC fields
pub mod coc {
    /// Clock output enable
    pub const CLKOUT_EN: u16 = 1 << 15;
    /// Clock output source select
    pub const CLKOUT_SEL: u16 = 1 << 14;
    /// Clock output speed select
    pub const CLKOUT_SPSEL: u16 = 1 << 13;
    /// Divide-by mask
    pub const CLKDIV_MASK: u16 = 0x00FF;
}

/// PSF_CFG1 fields
pub mod psf_cfg1 {
    /// PTP reserved field shift
    pub const RESERVED_SHIFT: u16 = 12;
    /// PTP version shift
    pub const VERSION_SHIFT: u16 = 8;
    /// Transport specific shift
    pub const TRANSPORT_SHIFT: u16 = 4;
    /// Message type shift
    pub const MESSAGE_TYPE_SHIFT: u16 = 0;
}

/// PSF_CFG2 / PSF_CFG3 IP source address byte placement
pub mod psf_ip {
    /// Low byte of each register
    pub const LO_SHIFT: u16 = 0;
    /// High byte of each register
    pub const HI_SHIFT: u16 = 8;
}

/// PTP_SFDCFG fields
pub mod sfdcfg {
    /// Transmit SFD GPIO shift
    pub const TX_GPIO_SHIFT: u16 = 4;
    /// Receive SFD GPIO shift
    pub const RX_GPIO_SHIFT: u16 = 0;
}

/// PTP_CLKSRC fields
pub mod clksrc {
    /// Clock source shift
    pub const SRC_SHIFT: u16 = 14;
    /// Clock source period mask
    pub const PERIOD_MASK: u16 = 0x007F;
}

/// PTP_RXHASH fields
pub mod rxhash {
    /// Source identity hash filter enable
    pub const HASH_EN: u16 = 1 << 12;
    /// Hash value mask
    pub const HASH_MASK: u16 = 0x0FFF;
}

// =============================================================================
// Page 0 - Vendor Control
// =============================================================================

/// PHYCR2 bits
pub mod phycr2 {
    /// Disable the 25 MHz clock output
    pub const CLK_OUT_DIS: u16 = 1 << 1;
}

/// PCFCR bits
pub mod pcfcr {
    /// PHY control frames enabled
    pub const PCF_EN: u16 = 1 << 0;
    /// Buffer size shift
    pub const BUF_SHIFT: u16 = 1;
    /// Buffer size mask
    pub const BUF_MASK: u16 = 0x001E;
    /// Destination address select
    pub const DA_SEL: u16 = 1 << 8;
    /// Last control frame accepted
    pub const STS_OK: u16 = 1 << 14;
    /// Last control frame failed its checksum
    pub const STS_ERR: u16 = 1 << 15;
}
