//! PHY Control Frame (PCF) transport
//!
//! When MDIO is not wired to the host, the DP83640 accepts register writes
//! and read requests embedded in Ethernet frames on its transmit path. Each
//! request is a single 32-bit command word, sent in network byte order:
//!
//! | Bits | Field |
//! |------|-------|
//! | 31:30 | `01` write, `10` read |
//! | 29:25 | PHY address |
//! | 24:21 | Page |
//! | 20:16 | Register |
//! | 15:0 | Value (zero for reads) |
//!
//! The page travels inside the command, so no page-select transaction is
//! issued. Read responses come back as register-read messages in PHY status
//! frames; the host's [`ControlFrameLink`] waits for them.

use crate::error::Result;
use crate::hal::register::{RegisterAccess, RegisterIndex};

/// Operation carried by a control frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlFrameOp {
    /// Register write
    Write,
    /// Register read request
    Read,
}

/// Decoded PHY control frame command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlFrameCommand {
    /// Operation
    pub op: ControlFrameOp,
    /// PHY address (5 bits)
    pub phy_addr: u8,
    /// Page (4 bits)
    pub page: u8,
    /// Register within the page (5 bits)
    pub register: u8,
    /// Value to write (zero for reads)
    pub value: u16,
}

impl ControlFrameCommand {
    const WRITE: u32 = 0x4000_0000;
    const READ: u32 = 0x8000_0000;
    const OP_MASK: u32 = 0xC000_0000;

    /// Build a write command for a paged register
    pub const fn write(phy_addr: u8, index: RegisterIndex, value: u16) -> Self {
        Self {
            op: ControlFrameOp::Write,
            phy_addr: phy_addr & 0x1F,
            page: ((index.raw() >> 5) & 0x0F) as u8,
            register: index.register(),
            value,
        }
    }

    /// Build a read request for a paged register
    pub const fn read(phy_addr: u8, index: RegisterIndex) -> Self {
        Self {
            op: ControlFrameOp::Read,
            phy_addr: phy_addr & 0x1F,
            page: ((index.raw() >> 5) & 0x0F) as u8,
            register: index.register(),
            value: 0,
        }
    }

    /// Encode to the 32-bit command word
    pub const fn to_word(&self) -> u32 {
        let op = match self.op {
            ControlFrameOp::Write => Self::WRITE,
            ControlFrameOp::Read => Self::READ,
        };
        op | ((self.phy_addr as u32 & 0x1F) << 25)
            | ((self.page as u32 & 0x0F) << 21)
            | ((self.register as u32 & 0x1F) << 16)
            | self.value as u32
    }

    /// Encode to wire bytes (network order)
    pub const fn to_bytes(&self) -> [u8; 4] {
        self.to_word().to_be_bytes()
    }

    /// Decode wire bytes
    ///
    /// Returns `None` when the operation bits are neither read nor write.
    pub const fn from_bytes(bytes: [u8; 4]) -> Option<Self> {
        let word = u32::from_be_bytes(bytes);
        let op = match word & Self::OP_MASK {
            Self::WRITE => ControlFrameOp::Write,
            Self::READ => ControlFrameOp::Read,
            _ => return None,
        };
        Some(Self {
            op,
            phy_addr: ((word >> 25) & 0x1F) as u8,
            page: ((word >> 21) & 0x0F) as u8,
            register: ((word >> 16) & 0x1F) as u8,
            value: word as u16,
        })
    }
}

/// Host side of the control frame channel
///
/// `send` wraps the command in a control frame and transmits it. `request`
/// does the same for a read and returns the value carried by the matching
/// register-read status message.
pub trait ControlFrameLink {
    /// Transmit a write command
    fn send(&mut self, command: [u8; 4]) -> Result<()>;

    /// Transmit a read command and wait for its response
    fn request(&mut self, command: [u8; 4]) -> Result<u16>;
}

/// Register façade over a control frame link
///
/// Reads only work while read responses are enabled in the status frame
/// configuration (`PsfConfig::control_frame_responses`).
#[derive(Debug)]
pub struct ControlFrameBus<L> {
    link: L,
}

impl<L: ControlFrameLink> ControlFrameBus<L> {
    /// Wrap a link
    pub const fn new(link: L) -> Self {
        Self { link }
    }

    /// Borrow the underlying link
    pub fn inner(&self) -> &L {
        &self.link
    }

    /// Mutably borrow the underlying link
    pub fn inner_mut(&mut self) -> &mut L {
        &mut self.link
    }

    /// Release the underlying link
    pub fn into_inner(self) -> L {
        self.link
    }
}

impl<L: ControlFrameLink> RegisterAccess for ControlFrameBus<L> {
    fn read_register(&mut self, phy_addr: u8, index: RegisterIndex) -> Result<u16> {
        let command = ControlFrameCommand::read(phy_addr, index);
        self.link.request(command.to_bytes())
    }

    fn write_register(&mut self, phy_addr: u8, index: RegisterIndex, value: u16) -> Result<()> {
        let command = ControlFrameCommand::write(phy_addr, index, value);
        self.link.send(command.to_bytes())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
