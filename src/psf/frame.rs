//! Status frame configuration and recognition
//!
//! The PHY can report timestamps, trigger completions, events, errors and
//! control frame read responses by injecting PHY Status Frames into the
//! receive path. A status frame is either a layer 2 frame to
//! 01:1B:19:00:00:00 with EtherType 0x88F7, or an IPv4/UDP frame to
//! 01:00:5E:00:01:81 (224.0.1.129). Its source MAC is the one selected in
//! [`PsfConfig::source_mac`].
//!
//! Recognition checks addresses and EtherType only; any frame that does not
//! match is left to the normal receive path.

use crate::driver::config::PsfConfig;
use crate::driver::port::Port;
use crate::error::Result;
use crate::hal::register::RegisterAccess;
use crate::internal::constants::{
    PSF_IPV4_DEST_MAC, PSF_IPV4_ETHERTYPE, PSF_IPV4_MIN_LEN, PSF_IPV4_PAYLOAD_OFFSET,
    PSF_L2_DEST_MAC, PSF_L2_ETHERTYPE, PSF_L2_MIN_LEN, PSF_L2_PAYLOAD_OFFSET,
};
use crate::internal::phy_regs::dp83640::reg;

/// Framing expected for a status frame configuration
struct Framing {
    min_len: usize,
    destination: [u8; 6],
    ether_type: [u8; 2],
    payload_offset: usize,
}

impl Framing {
    const IPV4: Self = Self {
        min_len: PSF_IPV4_MIN_LEN,
        destination: PSF_IPV4_DEST_MAC,
        ether_type: PSF_IPV4_ETHERTYPE,
        payload_offset: PSF_IPV4_PAYLOAD_OFFSET,
    };

    const LAYER2: Self = Self {
        min_len: PSF_L2_MIN_LEN,
        destination: PSF_L2_DEST_MAC,
        ether_type: PSF_L2_ETHERTYPE,
        payload_offset: PSF_L2_PAYLOAD_OFFSET,
    };

    const fn for_config(config: &PsfConfig) -> &'static Self {
        if config.ipv4 { &Self::IPV4 } else { &Self::LAYER2 }
    }
}

/// Destination MAC of status frames under `config`
#[must_use]
pub const fn status_frame_destination(config: &PsfConfig) -> [u8; 6] {
    Framing::for_config(config).destination
}

/// Return the message payload if `frame` is a status frame under `config`
///
/// `frame` starts at the destination MAC.
#[must_use]
pub fn status_frame_payload<'a>(config: &PsfConfig, frame: &'a [u8]) -> Option<&'a [u8]> {
    let framing = Framing::for_config(config);

    if frame.len() < framing.min_len {
        return None;
    }
    if frame[0..6] != framing.destination
        || frame[6..12] != config.source_mac_address()
        || frame[12..14] != framing.ether_type
    {
        return None;
    }
    frame.get(framing.payload_offset..)
}

impl<B: RegisterAccess> Port<'_, B> {
    /// Program status frame generation
    ///
    /// The port remembers `config`; recognition and message decoding use
    /// its framing, source MAC and byte order.
    pub fn set_status_frame_config(&self, config: PsfConfig) -> Result<()> {
        config.validate()?;

        self.multi_op(|| {
            self.write(reg::PSF_CFG0, config.cfg0())?;
            self.write(reg::PSF_CFG1, config.cfg1())?;
            self.write(reg::PSF_CFG2, config.cfg2())?;
            self.write(reg::PSF_CFG3, config.cfg3())?;
            self.write(reg::PSF_CFG4, config.ip_checksum())
        })?;
        self.update_state(|state| state.psf = config);

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "PHY {} status frames: PSF_CFG0={:#06x} ({})",
            self.phy_address(),
            config.cfg0(),
            if config.ipv4 { "IPv4" } else { "L2" }
        );
        Ok(())
    }

    /// Return the message payload if `frame` is a status frame from this
    /// port
    #[must_use]
    pub fn status_frame_payload<'a>(&self, frame: &'a [u8]) -> Option<&'a [u8]> {
        status_frame_payload(&self.status_frame_config(), frame)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
