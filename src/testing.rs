//! Testing utilities and mock implementations
//!
//! Mock hardware for exercising the driver on the host.
//!
//! Only available when running `cargo test`.

// Note: The #[cfg(test)] attribute is applied in lib.rs where this module is declared
#![allow(missing_docs)]
#![allow(clippy::std_instead_of_core, clippy::std_instead_of_alloc)]

extern crate std;

use core::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::vec::Vec;

use crate::error::Result;
use crate::hal::mdio::MdioBus;
use crate::internal::phy_regs::dp83640::{ptp_ctl, reg};
use crate::internal::phy_regs::standard::{bmcr, phy_reg};

const NANOS: i64 = 1_000_000_000;

/// PAGESEL register address
const PAGESEL: u8 = reg::PAGESEL as u8;

// Page 4 register addresses within the page
const TDR: u8 = (reg::PTP_TDR & 0x1F) as u8;
const CTL: u8 = (reg::PTP_CTL & 0x1F) as u8;
const TXTS: u8 = (reg::PTP_TXTS & 0x1F) as u8;
const RXTS: u8 = (reg::PTP_RXTS & 0x1F) as u8;
const ESTS: u8 = (reg::PTP_ESTS & 0x1F) as u8;
const EDATA: u8 = (reg::PTP_EDATA & 0x1F) as u8;

// =============================================================================
// PTP Model
// =============================================================================

/// Behavioural model of one port's 1588 block
#[derive(Debug, Default)]
struct PtpModel {
    seconds: u32,
    nanoseconds: u32,
    /// Words written to PTP_TDR since the last command
    data_in: Vec<u16>,
    /// Words latched for reading from PTP_TDR
    data_out: VecDeque<u16>,
    txts: VecDeque<u16>,
    rxts: VecDeque<u16>,
    ests: VecDeque<u16>,
    edata: VecDeque<u16>,
    /// Trigger selected by the last TRIG_LOAD
    loading: Option<u8>,
    /// Words loaded into each trigger when it was enabled
    armed: HashMap<u8, Vec<u16>>,
    /// Triggers disabled through PTP_CTL
    cancelled: Vec<u8>,
}

impl PtpModel {
    fn command(&mut self, value: u16) {
        let trigger = ((value & ptp_ctl::TRIG_SEL_MASK) >> ptp_ctl::TRIG_SEL_SHIFT) as u8;

        if value & ptp_ctl::LOAD_CLK != 0 {
            let (sec, ns) = Self::time_from(&self.data_in);
            self.seconds = sec;
            self.nanoseconds = ns;
            self.data_in.clear();
        }
        if value & ptp_ctl::STEP_CLK != 0 {
            let (sec, ns) = Self::time_from(&self.data_in);
            let mut total = self.nanoseconds as i64 + (ns as i32) as i64;
            let mut seconds = self.seconds.wrapping_add(sec);
            while total < 0 {
                total += NANOS;
                seconds = seconds.wrapping_sub(1);
            }
            while total >= NANOS {
                total -= NANOS;
                seconds = seconds.wrapping_add(1);
            }
            self.seconds = seconds;
            self.nanoseconds = total as u32;
            self.data_in.clear();
        }
        if value & ptp_ctl::RD_CLK != 0 {
            self.data_out.clear();
            self.data_out.extend([
                self.nanoseconds as u16,
                (self.nanoseconds >> 16) as u16,
                self.seconds as u16,
                (self.seconds >> 16) as u16,
            ]);
        }
        if value & ptp_ctl::TRIG_LOAD != 0 {
            self.loading = Some(trigger);
            self.data_in.clear();
        }
        if value & ptp_ctl::TRIG_EN != 0 && self.loading == Some(trigger) {
            self.armed.insert(trigger, core::mem::take(&mut self.data_in));
            self.loading = None;
        }
        if value & ptp_ctl::TRIG_DIS != 0 {
            self.cancelled.push(trigger);
        }
    }

    fn time_from(words: &[u16]) -> (u32, u32) {
        let word = |i: usize| words.get(i).copied().unwrap_or(0) as u32;
        (word(2) | (word(3) << 16), word(0) | (word(1) << 16))
    }
}

// =============================================================================
// Mock PHY
// =============================================================================

/// Mock DP83640 on an MDIO bus
///
/// Models the page-select register, per-page register storage, the PTP
/// data register (load/step/read clock, trigger loading) and the timestamp
/// and event FIFOs. All raw MDIO writes are logged.
///
/// # Example
///
/// ```ignore
/// let phy = MockPhy::new();
/// phy.setup_dp83640(0);
/// let device = Device::probe(PagedMdio::new(phy), 0, ProbeConfig::new())?;
/// ```
#[derive(Debug, Default)]
pub struct MockPhy {
    /// Register values: (phy_addr, page, reg_addr) -> value
    registers: RefCell<HashMap<(u8, u8, u8), u16>>,
    /// Selected page per PHY
    pages: RefCell<HashMap<u8, u8>>,
    /// Record of raw writes: (phy_addr, reg_addr, value)
    write_log: RefCell<Vec<(u8, u8, u16)>>,
    /// Record of resolved writes: (phy_addr, paged index, value)
    index_log: RefCell<Vec<(u8, u16, u16)>>,
    /// 1588 block per PHY
    ptp: RefCell<HashMap<u8, PtpModel>>,
    /// BMCR reads remaining before a reset self-clears
    reset_reads: RefCell<u32>,
}

impl MockPhy {
    /// Create a new mock PHY
    pub fn new() -> Self {
        Self::default()
    }

    fn key(page: u8, reg_addr: u8) -> (u8, u8) {
        // Registers up to PAGESEL are visible from every page
        if reg_addr <= PAGESEL {
            (0, reg_addr)
        } else {
            (page, reg_addr)
        }
    }

    fn page(&self, phy_addr: u8) -> u8 {
        self.pages.borrow().get(&phy_addr).copied().unwrap_or(0)
    }

    /// Set a register on a given page
    pub fn set_raw(&self, phy_addr: u8, page: u8, reg_addr: u8, value: u16) {
        let (page, reg_addr) = Self::key(page, reg_addr);
        self.registers
            .borrow_mut()
            .insert((phy_addr, page, reg_addr), value);
    }

    /// Get a register on a given page
    pub fn get_raw(&self, phy_addr: u8, page: u8, reg_addr: u8) -> Option<u16> {
        let (page, reg_addr) = Self::key(page, reg_addr);
        self.registers
            .borrow()
            .get(&(phy_addr, page, reg_addr))
            .copied()
    }

    /// Set a register by paged index
    pub fn set_register(&self, phy_addr: u8, index: u16, value: u16) {
        self.set_raw(phy_addr, ((index >> 5) & 0x7) as u8, (index & 0x1F) as u8, value);
    }

    /// Get a register by paged index
    pub fn get_register(&self, phy_addr: u8, index: u16) -> Option<u16> {
        self.get_raw(phy_addr, ((index >> 5) & 0x7) as u8, (index & 0x1F) as u8)
    }

    /// All raw MDIO writes, page selects included
    pub fn get_writes(&self) -> Vec<(u8, u8, u16)> {
        self.write_log.borrow().clone()
    }

    /// Writes resolved to paged indices, page selects excluded
    pub fn get_index_writes(&self) -> Vec<(u8, u16, u16)> {
        self.index_log.borrow().clone()
    }

    /// Values written to one paged register, in order
    pub fn writes_to(&self, phy_addr: u8, index: u16) -> Vec<u16> {
        self.index_log
            .borrow()
            .iter()
            .filter(|w| w.0 == phy_addr && w.1 == index)
            .map(|w| w.2)
            .collect()
    }

    /// Clear the write logs
    pub fn clear_writes(&self) {
        self.write_log.borrow_mut().clear();
        self.index_log.borrow_mut().clear();
    }

    /// Number of BMCR reads a reset stays asserted for
    pub fn set_reset_latency(&self, reads: u32) {
        *self.reset_reads.borrow_mut() = reads;
    }

    /// Setup identifier registers for a part (`idr2` as read from PHYIDR2)
    pub fn setup_device(&self, phy_addr: u8, idr2: u16) {
        self.set_raw(phy_addr, 0, phy_reg::PHYIDR1 as u8, 0x2000);
        self.set_raw(phy_addr, 0, phy_reg::PHYIDR2 as u8, idr2);
        self.set_raw(phy_addr, 0, phy_reg::BMCR as u8, 0x3100);
    }

    /// Setup a DP83640 (PHYIDR2 0x5CE1, revision 1)
    pub fn setup_dp83640(&self, phy_addr: u8) {
        self.setup_device(phy_addr, 0x5CE1);
    }

    // =========================================================================
    // PTP Model Access
    // =========================================================================

    fn with_ptp<R>(&self, phy_addr: u8, f: impl FnOnce(&mut PtpModel) -> R) -> R {
        let mut ptp = self.ptp.borrow_mut();
        f(ptp.entry(phy_addr).or_default())
    }

    /// Set the hardware clock directly
    pub fn set_clock(&self, phy_addr: u8, seconds: u32, nanoseconds: u32) {
        self.with_ptp(phy_addr, |ptp| {
            ptp.seconds = seconds;
            ptp.nanoseconds = nanoseconds;
        });
    }

    /// Current hardware clock
    pub fn clock(&self, phy_addr: u8) -> (u32, u32) {
        self.with_ptp(phy_addr, |ptp| (ptp.seconds, ptp.nanoseconds))
    }

    /// Words loaded into a trigger when it was enabled
    pub fn armed_trigger(&self, phy_addr: u8, trigger: u8) -> Option<Vec<u16>> {
        self.with_ptp(phy_addr, |ptp| ptp.armed.get(&trigger).cloned())
    }

    /// Triggers cancelled through PTP_CTL, in order
    pub fn cancelled_triggers(&self, phy_addr: u8) -> Vec<u8> {
        self.with_ptp(phy_addr, |ptp| ptp.cancelled.clone())
    }

    /// Capture a transmit timestamp
    ///
    /// The hardware stamps each entry with the number of entries still
    /// unread when it was captured, saturating at 3.
    pub fn push_tx_timestamp(&self, phy_addr: u8, seconds: u32, nanoseconds: u32) {
        self.with_ptp(phy_addr, |ptp| {
            let overflow = (ptp.txts.len() / 4).min(3) as u16;
            ptp.txts.extend(Self::timestamp_words(seconds, nanoseconds, overflow));
        });
    }

    /// Capture a receive timestamp
    pub fn push_rx_timestamp(
        &self,
        phy_addr: u8,
        seconds: u32,
        nanoseconds: u32,
        sequence_id: u16,
        message_type: u8,
        source_hash: u16,
    ) {
        self.with_ptp(phy_addr, |ptp| {
            let overflow = (ptp.rxts.len() / 6).min(3) as u16;
            ptp.rxts.extend(Self::timestamp_words(seconds, nanoseconds, overflow));
            ptp.rxts.push_back(sequence_id);
            ptp.rxts
                .push_back(((message_type as u16) << 12) | (source_hash & 0x0FFF));
        });
    }

    /// Capture an event report
    ///
    /// `ests` is returned by the next PTP_ESTS read; `extended` (if any) and
    /// the timestamp follow on PTP_EDATA.
    pub fn push_event(
        &self,
        phy_addr: u8,
        ests: u16,
        extended: Option<u16>,
        seconds: u32,
        nanoseconds: u32,
    ) {
        self.with_ptp(phy_addr, |ptp| {
            ptp.ests.push_back(ests);
            if let Some(word) = extended {
                ptp.edata.push_back(word);
            }
            ptp.edata.extend([
                nanoseconds as u16,
                (nanoseconds >> 16) as u16,
                seconds as u16,
                (seconds >> 16) as u16,
            ]);
        });
    }

    fn timestamp_words(seconds: u32, nanoseconds: u32, overflow: u16) -> [u16; 4] {
        [
            nanoseconds as u16,
            (overflow << 14) | ((nanoseconds >> 16) as u16 & 0x3FFF),
            seconds as u16,
            (seconds >> 16) as u16,
        ]
    }
}

impl MdioBus for MockPhy {
    fn read(&mut self, phy_addr: u8, reg_addr: u8) -> Result<u16> {
        let page = self.page(phy_addr);

        if page == 4 {
            let fifo = self.with_ptp(phy_addr, |ptp| match reg_addr {
                TDR => Some(ptp.data_out.pop_front().unwrap_or(0)),
                TXTS => Some(ptp.txts.pop_front().unwrap_or(0)),
                RXTS => Some(ptp.rxts.pop_front().unwrap_or(0)),
                ESTS => Some(ptp.ests.pop_front().unwrap_or(0)),
                EDATA => Some(ptp.edata.pop_front().unwrap_or(0)),
                _ => None,
            });
            if let Some(value) = fifo {
                return Ok(value);
            }
        }

        let value = self.get_raw(phy_addr, page, reg_addr).unwrap_or(0);

        if reg_addr == phy_reg::BMCR as u8 && value & bmcr::RESET != 0 {
            let mut remaining = self.reset_reads.borrow_mut();
            if *remaining == 0 {
                self.set_raw(phy_addr, 0, reg_addr, value & !bmcr::RESET);
            } else {
                *remaining -= 1;
            }
        }

        Ok(value)
    }

    fn write(&mut self, phy_addr: u8, reg_addr: u8, value: u16) -> Result<()> {
        self.write_log
            .borrow_mut()
            .push((phy_addr, reg_addr, value));

        if reg_addr == PAGESEL {
            self.pages.borrow_mut().insert(phy_addr, (value & 0x7) as u8);
            self.set_raw(phy_addr, 0, reg_addr, value);
            return Ok(());
        }

        let page = self.page(phy_addr);
        let index = if reg_addr > PAGESEL {
            ((page as u16) << 5) | reg_addr as u16
        } else {
            reg_addr as u16
        };
        self.index_log
            .borrow_mut()
            .push((phy_addr, index, value));

        if page == 4 && reg_addr == TDR {
            self.with_ptp(phy_addr, |ptp| ptp.data_in.push(value));
            return Ok(());
        }
        if page == 4 && reg_addr == CTL {
            self.with_ptp(phy_addr, |ptp| ptp.command(value));
        }

        self.set_raw(phy_addr, page, reg_addr, value);
        Ok(())
    }
}

// =============================================================================
// Mock Delay
// =============================================================================

/// Mock delay for testing without actual timing
///
/// Records delays for verification without actually waiting.
#[derive(Debug, Default)]
pub struct MockDelay {
    /// Total nanoseconds delayed
    total_ns: RefCell<u64>,
}

impl MockDelay {
    /// Create a new mock delay
    pub fn new() -> Self {
        Self::default()
    }

    /// Get total nanoseconds that were "delayed"
    pub fn total_ns(&self) -> u64 {
        *self.total_ns.borrow()
    }
}

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        *self.total_ns.borrow_mut() += ns as u64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec;

    #[test]
    fn mock_page_select_routes_writes() {
        let mut phy = MockPhy::new();

        phy.write(0, PAGESEL, 5).unwrap();
        phy.write(0, 0x14, 0xABCD).unwrap();
        phy.write(0, PAGESEL, 6).unwrap();
        phy.write(0, 0x14, 0x1111).unwrap();

        assert_eq!(phy.get_register(0, 0xB4), Some(0xABCD));
        assert_eq!(phy.get_register(0, 0xD4), Some(0x1111));
        assert_eq!(
            phy.get_index_writes(),
            vec![(0, 0xB4, 0xABCD), (0, 0xD4, 0x1111)]
        );
    }

    #[test]
    fn mock_low_registers_ignore_page() {
        let mut phy = MockPhy::new();
        phy.setup_dp83640(1);
        phy.write(1, PAGESEL, 4).unwrap();

        assert_eq!(phy.read(1, 0x02).unwrap(), 0x2000);
        assert_eq!(phy.read(1, 0x03).unwrap(), 0x5CE1);
    }

    #[test]
    fn mock_clock_read_latches_four_words() {
        let mut phy = MockPhy::new();
        phy.set_clock(0, 0x0001_0002, 0x0003_0004);
        phy.write(0, PAGESEL, 4).unwrap();
        phy.write(0, CTL, ptp_ctl::RD_CLK).unwrap();

        let words: Vec<u16> = (0..4).map(|_| phy.read(0, TDR).unwrap()).collect();
        assert_eq!(words, vec![0x0004, 0x0003, 0x0002, 0x0001]);
    }

    #[test]
    fn mock_reset_self_clears() {
        let mut phy = MockPhy::new();
        phy.set_reset_latency(2);
        phy.write(0, 0, bmcr::RESET).unwrap();

        assert_ne!(phy.read(0, 0).unwrap() & bmcr::RESET, 0);
        assert_ne!(phy.read(0, 0).unwrap() & bmcr::RESET, 0);
        assert_ne!(phy.read(0, 0).unwrap() & bmcr::RESET, 0);
        assert_eq!(phy.read(0, 0).unwrap() & bmcr::RESET, 0);
    }
}
