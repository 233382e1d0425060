//! Transmit and receive timestamps
//!
//! The PHY timestamps PTP event messages as they cross the MII and queues
//! the results in two small FIFOs. Each entry carries a 2-bit overflow
//! count: the number of entries lost before it, saturating at 3. Overflow
//! is never an error; check the count on the entry you get back.
//!
//! Receive timestamps can also be written straight into received frames
//! (see [`TimestampLayout`]) and pulled back out with
//! [`Port::timestamp_from_frame`].
//!
//! Latency compensation is left to the caller: add
//! [`TX_LATENCY_NS`](super::time::TX_LATENCY_NS) to transmit timestamps and
//! subtract [`RX_LATENCY_NS`](super::time::RX_LATENCY_NS) from receive
//! timestamps.

use super::time::PtpTime;
use crate::driver::config::{ReceiveConfig, TimestampLayout, TransmitConfig};
use crate::driver::port::Port;
use crate::error::{IoError, Result};
use crate::hal::register::RegisterAccess;
use crate::internal::constants::PTP_EVENT_PACKET_LENGTH;
use crate::internal::phy_regs::dp83640::{reg, rxcfg0, ts_word};

// =============================================================================
// Types
// =============================================================================

/// Transmit timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TxTimestamp {
    /// Time the message left the MAC interface
    pub time: PtpTime,
    /// Entries lost before this one (0-3)
    pub overflow: u8,
}

/// Receive timestamp with the identity of the message it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RxTimestamp {
    /// Time the message arrived at the MAC interface
    pub time: PtpTime,
    /// Entries lost before this one (0-3)
    pub overflow: u8,
    /// PTP sequenceId of the message
    pub sequence_id: u16,
    /// PTP messageType (4 bits)
    pub message_type: u8,
    /// Source identity hash (12 bits, see [`source_id_hash`](super::hash::source_id_hash))
    pub source_hash: u16,
}

/// Decode the four timestamp words shared by the FIFOs and status frames
///
/// The second word carries the overflow count in its top two bits.
#[must_use]
pub(crate) const fn decode_timestamp_words(words: [u16; 4]) -> (PtpTime, u8) {
    let overflow = ((words[1] & ts_word::OVERFLOW_MASK) >> ts_word::OVERFLOW_SHIFT) as u8;
    let time = PtpTime::from_words([words[0], words[1] & ts_word::NS_HI_MASK, words[2], words[3]]);
    (time, overflow)
}

/// Split the message type / source hash word
#[must_use]
pub(crate) const fn decode_type_hash(word: u16) -> (u8, u16) {
    ((word >> ts_word::MSG_TYPE_SHIFT) as u8, word & ts_word::HASH_MASK)
}

// =============================================================================
// Timestamp Operations
// =============================================================================

impl<B: RegisterAccess> Port<'_, B> {
    /// Program transmit timestamping
    pub fn set_transmit_config(&self, config: TransmitConfig) -> Result<()> {
        config.validate()?;
        self.write(reg::PTP_TXCFG0, config.txcfg0())?;
        self.write(reg::PTP_TXCFG1, config.first_byte.to_bits())?;

        #[cfg(feature = "defmt")]
        defmt::debug!("PHY {} TXCFG0={:#06x}", self.phy_address(), config.txcfg0());
        Ok(())
    }

    /// Program receive timestamping
    ///
    /// The port remembers the insertion layout for
    /// [`timestamp_from_frame`](Self::timestamp_from_frame).
    pub fn set_receive_config(&self, config: ReceiveConfig) -> Result<()> {
        config.validate()?;
        let cfg0 = config.rxcfg0();

        self.multi_op(|| {
            // PTP_RXCFG2 holds one half of the user IP, picked by USER_IP_SEL
            self.write(reg::PTP_RXCFG0, cfg0)?;
            self.write(reg::PTP_RXCFG2, (config.user_ip >> 16) as u16)?;
            self.write(reg::PTP_RXCFG0, cfg0 | rxcfg0::USER_IP_SEL)?;
            self.write(reg::PTP_RXCFG2, config.user_ip as u16)?;
            self.write(reg::PTP_RXCFG0, cfg0)?;

            self.write(reg::PTP_RXCFG1, config.first_byte.to_bits())?;
            self.write(reg::PTP_RXCFG3, config.rxcfg3())?;
            self.write(reg::PTP_RXCFG4, config.rxcfg4())?;
            self.write(reg::PTP_RXHASH, config.rxhash())
        })?;
        self.update_state(|state| state.layout = config.layout);

        #[cfg(feature = "defmt")]
        defmt::debug!("PHY {} RXCFG0={:#06x}", self.phy_address(), cfg0);
        Ok(())
    }

    /// Take the next transmit timestamp
    ///
    /// Call after [`poll_status`](Self::poll_status) reports one; an empty
    /// FIFO reads as zeros.
    pub fn transmit_timestamp(&self) -> Result<TxTimestamp> {
        self.multi_op(|| {
            let (time, overflow) = decode_timestamp_words(self.read_words(reg::PTP_TXTS)?);
            Ok(TxTimestamp { time, overflow })
        })
    }

    /// Take the next receive timestamp
    ///
    /// Call after [`poll_status`](Self::poll_status) reports one.
    pub fn receive_timestamp(&self) -> Result<RxTimestamp> {
        self.multi_op(|| {
            let (time, overflow) = decode_timestamp_words(self.read_words(reg::PTP_RXTS)?);
            let sequence_id = self.read(reg::PTP_RXTS)?;
            let (message_type, source_hash) = decode_type_hash(self.read(reg::PTP_RXTS)?);
            Ok(RxTimestamp {
                time,
                overflow,
                sequence_id,
                message_type,
                source_hash,
            })
        })
    }

    fn read_words(&self, index: u16) -> Result<[u16; 4]> {
        let mut words = [0u16; 4];
        for word in &mut words {
            *word = self.read(index)?;
        }
        Ok(words)
    }

    /// Pull an inserted receive timestamp out of a frame
    ///
    /// Fields are read little-endian and zeroed afterwards, so a frame
    /// that was not stamped reads back as zero next time. Returns `None`
    /// when insertion is not enabled on this port.
    ///
    /// # Errors
    ///
    /// `IoError::BufferTooSmall` if a field lies past the end of `frame`.
    pub fn timestamp_from_frame(&self, frame: &mut [u8]) -> Result<Option<PtpTime>> {
        extract_timestamp(&self.timestamp_layout(), frame)
    }
}

/// Frame timestamp extraction for a given layout
pub(crate) fn extract_timestamp(layout: &TimestampLayout, frame: &mut [u8]) -> Result<Option<PtpTime>> {
    if !layout.insert {
        return Ok(None);
    }

    let (ns_at, sec_at) = if layout.append {
        let ns_at = PTP_EVENT_PACKET_LENGTH + layout.nanoseconds_offset as usize;
        (ns_at, ns_at + layout.seconds_offset as usize)
    } else {
        (layout.nanoseconds_offset as usize, layout.seconds_offset as usize)
    };
    let sec_len = layout.seconds_length.bytes();

    let ns_field = frame.get_mut(ns_at..ns_at + 4).ok_or(IoError::BufferTooSmall)?;
    let mut ns_bytes = [0u8; 4];
    ns_bytes.copy_from_slice(ns_field);
    ns_field.fill(0);

    let sec_field = frame
        .get_mut(sec_at..sec_at + sec_len)
        .ok_or(IoError::BufferTooSmall)?;
    let mut sec_bytes = [0u8; 4];
    sec_bytes[..sec_len].copy_from_slice(sec_field);
    sec_field.fill(0);

    Ok(Some(PtpTime::new(
        u32::from_le_bytes(sec_bytes),
        u32::from_le_bytes(ns_bytes),
    )))
}

// =============================================================================
// Unit Tests
// =============================================================================
