//! PHY Status Frames
//!
//! - [`frame`]: status frame configuration and recognition
//! - [`message`]: decoding the messages a status frame carries

pub mod frame;
pub mod message;

pub use frame::{status_frame_destination, status_frame_payload};
pub use message::{EventReport, PhyMessage, StatusFrameError, StatusMessages, parse_next};
