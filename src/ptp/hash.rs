//! Source identity hash
//!
//! The PHY reduces the 10-byte sourcePortIdentity of a PTP message to a
//! 12-bit hash. The same hash is reported with every receive timestamp and
//! can be programmed as a receive filter, so together with the sequenceId it
//! ties a timestamp to the frame that produced it.

/// IEEE 802.3 CRC-32 polynomial
const CRC32_POLY: u32 = 0x04C1_1DB7;

/// Offset of sourcePortIdentity within a PTP message
const SOURCE_PORT_IDENTITY_OFFSET: usize = 20;

/// Length of sourcePortIdentity
pub const SOURCE_PORT_IDENTITY_LEN: usize = 10;

/// Hash a sourcePortIdentity the way the PHY does
///
/// CRC-32 (IEEE 802.3 polynomial, initial value all ones, data bits fed
/// LSB first, no final complement), keeping the top 12 bits.
#[must_use]
pub const fn source_id_hash(identity: &[u8; SOURCE_PORT_IDENTITY_LEN]) -> u16 {
    let mut crc: u32 = 0xFFFF_FFFF;
    let mut i = 0;
    while i < SOURCE_PORT_IDENTITY_LEN {
        let mut data = identity[i];
        let mut bit = 0;
        while bit < 8 {
            let feedback = (data as u32 & 1) ^ (crc >> 31);
            crc <<= 1;
            if feedback != 0 {
                crc ^= CRC32_POLY;
            }
            data >>= 1;
            bit += 1;
        }
        i += 1;
    }
    (crc >> 20) as u16
}

/// Hash the sourcePortIdentity of a PTP message
///
/// `message` starts at the PTP header. Returns `None` if it is too short to
/// hold the identity.
#[must_use]
pub fn message_source_hash(message: &[u8]) -> Option<u16> {
    let identity = message
        .get(SOURCE_PORT_IDENTITY_OFFSET..SOURCE_PORT_IDENTITY_OFFSET + SOURCE_PORT_IDENTITY_LEN)?;
    let mut bytes = [0u8; SOURCE_PORT_IDENTITY_LEN];
    bytes.copy_from_slice(identity);
    Some(source_id_hash(&bytes))
}
