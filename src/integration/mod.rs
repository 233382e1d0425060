//! External Stack Integrations
//!
//! - **smoltcp** (`smoltcp`): status frame recognition on smoltcp wire types
//!   - `EthernetAddress` / `EthernetProtocol` for the status frame header
//!   - Message iteration straight from an `EthernetFrame`
//!   - Requires `smoltcp` feature
//!
//! # Example
//!
//! ```ignore
//! use ph_dp83640::integration::smoltcp::status_messages;
//!
//! let frame = EthernetFrame::new_checked(buf)?;
//! if let Some(messages) = status_messages(&port.status_frame_config(), &frame) {
//!     // Status frame: do not hand to the interface
//! }
//! ```

pub mod smoltcp;

pub use smoltcp::{is_status_frame, status_messages};
