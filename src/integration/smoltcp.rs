//! smoltcp Wire Integration
#![cfg_attr(docsrs, doc(cfg(feature = "smoltcp")))]
//!
//! Helpers for picking PHY status frames out of the receive path when the
//! host stack is [smoltcp](https://docs.rs/smoltcp). Status frames share the
//! MII with ordinary traffic, so the host checks each received frame before
//! handing it to the interface.
//!
//! # Example
//!
//! ```ignore
//! use smoltcp::wire::EthernetFrame;
//! use ph_dp83640::integration::smoltcp::status_messages;
//!
//! let config = port.status_frame_config();
//! let frame = EthernetFrame::new_checked(&rx_buf[..len])?;
//! if let Some(messages) = status_messages(&config, &frame) {
//!     for message in messages {
//!         handle(message);
//!     }
//! } else {
//!     // Ordinary frame: pass to smoltcp
//! }
//! ```

use crate::driver::config::PsfConfig;
use crate::internal::constants::{PSF_IPV4_ETHERTYPE, PSF_L2_ETHERTYPE};
use crate::psf::frame::{status_frame_destination, status_frame_payload};
use crate::psf::message::StatusMessages;

use smoltcp::wire::{EthernetAddress, EthernetFrame, EthernetProtocol};

/// Destination address of status frames under `config`
pub fn destination_address(config: &PsfConfig) -> EthernetAddress {
    EthernetAddress(status_frame_destination(config))
}

/// Source address of status frames under `config`
pub fn source_address(config: &PsfConfig) -> EthernetAddress {
    EthernetAddress(config.source_mac_address())
}

/// EtherType of status frames under `config`
pub fn ethertype(config: &PsfConfig) -> EthernetProtocol {
    let bytes = if config.ipv4 {
        PSF_IPV4_ETHERTYPE
    } else {
        PSF_L2_ETHERTYPE
    };
    EthernetProtocol::from(u16::from_be_bytes(bytes))
}

/// Check whether `frame` carries the header of a status frame
///
/// Only the Ethernet header is checked; use [`status_messages`] to also
/// check the length and get at the messages.
pub fn is_status_frame<T: AsRef<[u8]>>(config: &PsfConfig, frame: &EthernetFrame<T>) -> bool {
    frame.dst_addr() == destination_address(config)
        && frame.src_addr() == source_address(config)
        && frame.ethertype() == ethertype(config)
}

/// Iterate over the messages of `frame` if it is a status frame
pub fn status_messages<'a, T: AsRef<[u8]>>(
    config: &PsfConfig,
    frame: &'a EthernetFrame<T>,
) -> Option<StatusMessages<'a>> {
    if !is_status_frame(config, frame) {
        return None;
    }
    let payload = status_frame_payload(config, frame.as_ref())?;
    Some(StatusMessages::new(payload, config.little_endian))
}
