//! PHY Register Definitions
//!
//! Register definitions for the PHY accessed through the register façade.
//!
//! # Module Organization
//!
//! - [`standard`] - IEEE 802.3 Clause 22 registers used by this driver
//! - [`dp83640`] - Paged PTP, status frame and control frame registers

pub mod dp83640;
pub mod standard;
