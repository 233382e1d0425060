//! Status frame message stream
//!
//! A status frame payload is a sequence of messages, each starting with a
//! 16-bit header whose top nibble gives the message type. The stream ends at
//! four zero bytes, at an unknown type, or where the payload runs out. All
//! words use the byte order chosen in
//! [`PsfConfig::little_endian`](crate::driver::config::PsfConfig::little_endian).
//!
//! | Type | Message            | Bytes                        |
//! |------|--------------------|------------------------------|
//! | 0x1  | Transmit timestamp | 10                           |
//! | 0x2  | Receive timestamp  | 14                           |
//! | 0x3  | Trigger status     | 4                            |
//! | 0x4  | Event timestamp    | 4-12, set by the header      |
//! | 0x5  | Error              | 2                            |
//! | 0x6  | Register read      | 4                            |

use super::frame::status_frame_payload;
use crate::driver::config::PsfConfig;
use crate::driver::port::Port;
use crate::hal::register::RegisterAccess;
use crate::internal::phy_regs::dp83640::ptp_ests;
use crate::ptp::event::{event_masks, missed_events};
use crate::ptp::queue::StatusQueue;
use crate::ptp::time::PtpTime;
use crate::ptp::timestamp::{RxTimestamp, TxTimestamp, decode_timestamp_words, decode_type_hash};

/// Header type nibble
mod kind {
    pub const TX: u16 = 0x1;
    pub const RX: u16 = 0x2;
    pub const TRIGGER: u16 = 0x3;
    pub const EVENT: u16 = 0x4;
    pub const ERROR: u16 = 0x5;
    pub const REG_READ: u16 = 0x6;
}

/// Low 12 bits of a header
const HEADER_DATA_MASK: u16 = 0x0FFF;

/// Register read header fields
const REG_INDEX_MASK: u16 = 0x001F;
const REG_PAGE_MASK: u16 = 0x00E0;
const REG_PAGE_SHIFT: u16 = 5;

// =============================================================================
// Messages
// =============================================================================

/// Event report carried by a status frame
///
/// The time is as reported, without input delay compensation. Short
/// reports leave the upper fields zero: see [`EventReport::status`] bits
/// 7:6 for how many timestamp words were sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EventReport {
    /// Event status bits, laid out as PTP_ESTS
    pub status: u16,
    /// Extended status word, present when several events fired together
    pub extended: Option<u16>,
    /// Capture time
    pub time: PtpTime,
}

impl EventReport {
    /// Events captured, bit `n` for event `n`
    #[must_use]
    pub const fn events(&self) -> u8 {
        event_masks(self.status, self.extended).0
    }

    /// Rising edge flags, bit `n` for event `n`
    #[must_use]
    pub const fn rising(&self) -> u8 {
        event_masks(self.status, self.extended).1
    }

    /// Reports lost before this one (0-7)
    #[must_use]
    pub const fn missed(&self) -> u8 {
        missed_events(self.status)
    }
}

/// Status frame generation error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusFrameError {
    /// The PHY ran out of status frame buffer space
    BufferOverflow,
    /// The PHY's pending frame counter overflowed
    CounterOverflow,
    /// Unrecognised error code
    Other(u16),
}

impl StatusFrameError {
    const fn from_code(code: u16) -> Self {
        match code {
            0x000 => Self::BufferOverflow,
            0x001 => Self::CounterOverflow,
            other => Self::Other(other),
        }
    }
}

/// One decoded status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PhyMessage {
    /// Transmit timestamp
    TxTimestamp(TxTimestamp),
    /// Receive timestamp
    RxTimestamp(RxTimestamp),
    /// Trigger status, laid out as PTP_TSTS
    Trigger {
        /// Status bits
        status: u16,
    },
    /// Event report
    Event(EventReport),
    /// Status frame error
    Error(StatusFrameError),
    /// Response to a control frame register read
    RegisterRead {
        /// Register page
        page: u8,
        /// Register number within the page
        register: u8,
        /// Register value
        value: u16,
    },
}

impl PhyMessage {
    /// Paged register index of a register read response
    #[must_use]
    pub const fn register_index(&self) -> Option<u16> {
        match self {
            Self::RegisterRead { page, register, .. } => {
                Some(((*page as u16) << REG_PAGE_SHIFT) | *register as u16)
            }
            _ => None,
        }
    }
}

// =============================================================================
// Decoder
// =============================================================================

/// Read the word at byte offset `at`
fn word(buf: &[u8], at: usize, little_endian: bool) -> Option<u16> {
    let bytes = [*buf.get(at)?, *buf.get(at + 1)?];
    Some(if little_endian {
        u16::from_le_bytes(bytes)
    } else {
        u16::from_be_bytes(bytes)
    })
}

/// Timestamp words at byte offset `at`, in transfer order
fn timestamp_words(buf: &[u8], at: usize, little_endian: bool) -> Option<[u16; 4]> {
    Some([
        word(buf, at, little_endian)?,
        word(buf, at + 2, little_endian)?,
        word(buf, at + 4, little_endian)?,
        word(buf, at + 6, little_endian)?,
    ])
}

/// Decode the message at the start of `buf`
///
/// Returns the message and its length in bytes, or `None` at the end of the
/// stream. A message cut short by the end of `buf` also ends the stream.
#[must_use]
pub fn parse_next(buf: &[u8], little_endian: bool) -> Option<(PhyMessage, usize)> {
    if buf.get(..4).is_some_and(|marker| marker == [0; 4]) {
        return None;
    }

    let header = word(buf, 0, little_endian)?;
    let data = header & HEADER_DATA_MASK;

    match header >> 12 {
        kind::TX => {
            let (time, overflow) = decode_timestamp_words(timestamp_words(buf, 2, little_endian)?);
            Some((PhyMessage::TxTimestamp(TxTimestamp { time, overflow }), 10))
        }
        kind::RX => {
            let (time, overflow) = decode_timestamp_words(timestamp_words(buf, 2, little_endian)?);
            let sequence_id = word(buf, 10, little_endian)?;
            let (message_type, source_hash) = decode_type_hash(word(buf, 12, little_endian)?);
            Some((
                PhyMessage::RxTimestamp(RxTimestamp {
                    time,
                    overflow,
                    sequence_id,
                    message_type,
                    source_hash,
                }),
                14,
            ))
        }
        kind::TRIGGER => {
            let status = word(buf, 2, little_endian)?;
            Some((PhyMessage::Trigger { status }, 4))
        }
        kind::EVENT => parse_event(buf, data, little_endian),
        kind::ERROR => Some((PhyMessage::Error(StatusFrameError::from_code(data)), 2)),
        kind::REG_READ => {
            let value = word(buf, 2, little_endian)?;
            Some((
                PhyMessage::RegisterRead {
                    page: ((data & REG_PAGE_MASK) >> REG_PAGE_SHIFT) as u8,
                    register: (data & REG_INDEX_MASK) as u8,
                    value,
                },
                4,
            ))
        }
        _ => None,
    }
}

/// Event message: status, optional extended word, then 1-4 timestamp words
fn parse_event(buf: &[u8], status: u16, little_endian: bool) -> Option<(PhyMessage, usize)> {
    let mut at = 2;
    let extended = if status & ptp_ests::MULT_EVENT != 0 {
        let word = word(buf, at, little_endian)?;
        at += 2;
        Some(word)
    } else {
        None
    };

    // Words beyond nanoseconds-low: 0 to 3
    let extra = ((status & ptp_ests::TS_LEN_MASK) >> ptp_ests::TS_LEN_SHIFT) as usize;
    let mut words = [0u16; 4];
    for slot in words.iter_mut().take(extra + 1) {
        *slot = word(buf, at, little_endian)?;
        at += 2;
    }

    Some((
        PhyMessage::Event(EventReport {
            status,
            extended,
            time: PtpTime::from_words(words),
        }),
        at,
    ))
}

/// Iterator over the messages of a status frame payload
#[derive(Debug, Clone)]
pub struct StatusMessages<'a> {
    remaining: &'a [u8],
    little_endian: bool,
}

impl<'a> StatusMessages<'a> {
    /// Iterate over `payload`
    #[must_use]
    pub const fn new(payload: &'a [u8], little_endian: bool) -> Self {
        Self {
            remaining: payload,
            little_endian,
        }
    }

    /// Iterate over the messages of `frame` if it is a status frame under
    /// `config`
    #[must_use]
    pub fn from_frame(config: &PsfConfig, frame: &'a [u8]) -> Option<Self> {
        status_frame_payload(config, frame).map(|payload| Self::new(payload, config.little_endian))
    }
}

impl Iterator for StatusMessages<'_> {
    type Item = PhyMessage;

    fn next(&mut self) -> Option<PhyMessage> {
        match parse_next(self.remaining, self.little_endian) {
            Some((message, len)) => {
                self.remaining = self.remaining.get(len..).unwrap_or(&[]);
                Some(message)
            }
            None => {
                self.remaining = &[];
                None
            }
        }
    }
}

impl<B: RegisterAccess> Port<'_, B> {
    /// Iterate over the messages of `frame` if it is a status frame from
    /// this port
    #[must_use]
    pub fn status_messages<'a>(&self, frame: &'a [u8]) -> Option<StatusMessages<'a>> {
        StatusMessages::from_frame(&self.status_frame_config(), frame)
    }

    /// Decode every message of a status frame into `queue`
    ///
    /// Returns the number of messages decoded, 0 if `frame` is not a status
    /// frame from this port. Messages the queue could not hold are counted
    /// in its dropped counter.
    pub fn collect_status_messages<const N: usize>(
        &self,
        frame: &[u8],
        queue: &mut StatusQueue<PhyMessage, N>,
    ) -> usize {
        let Some(messages) = self.status_messages(frame) else {
            return 0;
        };

        let mut count = 0;
        for message in messages {
            queue.push(message);
            count += 1;
        }

        #[cfg(feature = "defmt")]
        defmt::trace!("PHY {} status frame: {} messages", self.phy_address(), count);
        count
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
