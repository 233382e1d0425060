//! Centralized Constants
//!
//! Magic numbers shared by the PTP, status frame and device modules.
//!
//! # Organization
//!
//! - **Hardware limits**: trigger/event/GPIO counts, field widths
//! - **Timing**: latency compensation and reset polling
//! - **Status frames**: framing addresses, EtherTypes and payload offsets
//! - **Defaults**: control frame bring-up values
//!
//! Register bit definitions live in [`phy_regs`](super::phy_regs).

// =============================================================================
// Hardware Limits
// =============================================================================

/// Number of trigger generators
pub const NUM_TRIGGERS: u8 = 8;

/// Number of event capture units
pub const NUM_EVENTS: u8 = 8;

/// Highest GPIO connection number (0 disconnects)
pub const MAX_GPIO: u8 = 12;

/// Triggers with a second pulse-width register pair
pub const DUAL_WIDTH_TRIGGERS: u8 = 2;

/// Largest rate or duration value (26 bits)
pub const MAX_RATE: u32 = (1 << 26) - 1;

/// Highest valid MDIO address
pub const MAX_PHY_ADDR: u8 = 31;

/// Nanoseconds per second
pub const NANOS_PER_SEC: u32 = 1_000_000_000;

// =============================================================================
// Timing
// =============================================================================

/// Event input pin delay and edge detection time
pub const PIN_INPUT_DELAY_NS: u32 = 35;

/// Delay between BMCR polls while a reset completes
pub const RESET_POLL_INTERVAL_US: u32 = 10;

// =============================================================================
// Status Frames
// =============================================================================

/// Length of a PTP event message, used to locate appended timestamps
pub const PTP_EVENT_PACKET_LENGTH: usize = 93;

/// Destination MAC of IPv4/UDP status frames
pub const PSF_IPV4_DEST_MAC: [u8; 6] = [0x01, 0x00, 0x5E, 0x00, 0x01, 0x81];

/// Destination MAC of layer 2 status frames
pub const PSF_L2_DEST_MAC: [u8; 6] = [0x01, 0x1B, 0x19, 0x00, 0x00, 0x00];

/// EtherType bytes of IPv4/UDP status frames
pub const PSF_IPV4_ETHERTYPE: [u8; 2] = [0x08, 0x00];

/// EtherType bytes of layer 2 status frames
pub const PSF_L2_ETHERTYPE: [u8; 2] = [0x88, 0xF7];

/// Minimum IPv4/UDP status frame length
pub const PSF_IPV4_MIN_LEN: usize = 50;

/// Minimum layer 2 status frame length
pub const PSF_L2_MIN_LEN: usize = 22;

/// Payload offset of IPv4/UDP status frames
pub const PSF_IPV4_PAYLOAD_OFFSET: usize = 44;

/// Payload offset of layer 2 status frames
pub const PSF_L2_PAYLOAD_OFFSET: usize = 16;

/// Fixed 16-bit words of the status frame IPv4 header used for PSF_CFG4
pub const PSF_IP_HEADER_WORDS: [u16; 4] = [0x4500, 0x0111, 0xE000, 0x0181];

/// Source MACs selectable for status frames, indexed by the PSF_CFG0 selector
pub const PSF_SOURCE_MACS: [[u8; 6]; 4] = [
    [0x08, 0x00, 0x17, 0x0B, 0x6B, 0x0F],
    [0x08, 0x00, 0x17, 0x00, 0x00, 0x00],
    [0x01, 0x00, 0x00, 0x00, 0x00, 0x00],
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
];

// =============================================================================
// Control Frame Defaults
// =============================================================================

/// Control frame buffer size used when bringing up a control-frame-only port
pub const PCF_DEFAULT_BUF_SIZE: u8 = 15;

/// Status frame source IP used when bringing up a control-frame-only port
pub const PCF_DEFAULT_PSF_IP: u32 = 0x4433_2211;

/// Minimum preamble used when bringing up a control-frame-only port
pub const PCF_DEFAULT_MIN_PREAMBLE: u8 = 7;

/// PTP version used by default status frame headers
pub const PTP_VERSION_2: u8 = 2;
