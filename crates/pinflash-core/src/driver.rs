//! Command-level flash driver
//!
//! Frames every command as chip select low, opcode, optional address and
//! data, chip select high, on top of the bit-bang engine. Mutating
//! operations validate the address and the busy flag before any bus
//! activity, issue WREN in its own frame, and poll the status register
//! afterwards against a per-operation budget.

use crate::bitbang::BitbangSpi;
use crate::chip::{Addressing, ChipProfile};
use crate::error::{Error, Result};
use crate::gpio::{GpioBus, PinAssignment};
use crate::spi::{opcodes, AddressWidth, Security, Status};

/// Clock cycles the RES command needs before the chip emits its electronic
/// ID byte.
const RES_DUMMY_CYCLES: u8 = 24;

/// Bit-banged SPI NOR flash driver.
///
/// The chip is a singleton behind this driver; access is exclusive and
/// non-reentrant, the caller serializes operations.
pub struct Flash<B> {
    spi: BitbangSpi<B>,
    profile: ChipProfile,
}

impl<B: GpioBus> Flash<B> {
    /// Create a driver over `bus`. Call [`init`](Self::init) once before
    /// any other operation.
    pub fn new(bus: B, pins: PinAssignment, profile: ChipProfile) -> Self {
        Self {
            spi: BitbangSpi::new(bus, pins),
            profile,
        }
    }

    /// Configure all control and data lines and wait out chip power-up.
    pub fn init(&mut self) {
        log::debug!(
            "init: {} ({} bytes)",
            self.profile.name,
            self.profile.total_size
        );
        self.spi.init();
    }

    /// The profile this driver was built with.
    pub fn profile(&self) -> &ChipProfile {
        &self.profile
    }

    /// Access the underlying GPIO bus.
    pub fn bus(&self) -> &B {
        self.spi.bus()
    }

    /// Mutable access to the underlying GPIO bus.
    pub fn bus_mut(&mut self) -> &mut B {
        self.spi.bus_mut()
    }

    // ========================================================================
    // Register and identification commands
    // ========================================================================

    /// Read the status register (RDSR).
    pub fn read_status(&mut self) -> Status {
        self.spi.select();
        self.spi.send_byte(opcodes::RDSR);
        let value = self.spi.read_byte();
        self.spi.deselect();
        Status::from_bits_retain(value)
    }

    /// Read the security register (RDSCUR).
    pub fn read_security(&mut self) -> Security {
        self.spi.select();
        self.spi.send_byte(opcodes::RDSCUR);
        let value = self.spi.read_byte();
        self.spi.deselect();
        Security::from_bits_retain(value)
    }

    /// Set the write enable latch (WREN). The latch self-clears after one
    /// erase or program command, so this is issued immediately before each.
    pub fn write_enable(&mut self) {
        self.spi.select();
        self.spi.send_byte(opcodes::WREN);
        self.spi.deselect();
    }

    /// Clear the write enable latch (WRDI).
    pub fn write_disable(&mut self) {
        self.spi.select();
        self.spi.send_byte(opcodes::WRDI);
        self.spi.deselect();
    }

    /// Read the 24-bit JEDEC identification (RDID), packed big-endian:
    /// manufacturer, memory type, capacity.
    pub fn read_jedec_id(&mut self) -> u32 {
        self.spi.select();
        self.spi.send_byte(opcodes::RDID);
        let mut id = 0u32;
        for _ in 0..3 {
            id = (id << 8) | u32::from(self.spi.read_byte());
        }
        self.spi.deselect();
        id
    }

    /// Read the one-byte electronic signature (RES). The chip emits 24
    /// padding cycles before the ID byte.
    pub fn read_electronic_id(&mut self) -> u8 {
        self.spi.select();
        self.spi.send_byte(opcodes::RES);
        self.spi.run_dummy_cycles(RES_DUMMY_CYCLES);
        let id = self.spi.read_byte();
        self.spi.deselect();
        id
    }

    /// Enter deep power-down (DP). Only RES/RDP is honored until released.
    pub fn power_down(&mut self) {
        self.spi.select();
        self.spi.send_byte(opcodes::DP);
        self.spi.deselect();
    }

    /// Release from deep power-down (RDP).
    pub fn release_power_down(&mut self) {
        self.spi.select();
        self.spi.send_byte(opcodes::RDP);
        self.spi.deselect();
    }

    // ========================================================================
    // Busy polling
    // ========================================================================

    /// Whether an erase or program is still executing in the chip.
    pub fn is_busy(&mut self) -> bool {
        self.read_status().bits() & self.profile.busy_mask != 0
    }

    /// Poll the busy flag until it clears or `budget` iterations elapse.
    ///
    /// Returns `true` once the chip reports ready, `false` on budget
    /// exhaustion. Iterations are not time units; budgets come from
    /// clock-cycle estimates in the profile. A `false` means "the chip did
    /// not finish within the budget", not a wall-clock timeout.
    pub fn wait_ready(&mut self, budget: u32) -> bool {
        let mut elapsed: u32 = 0;
        while self.is_busy() {
            if elapsed >= budget {
                return false;
            }
            elapsed += 1;
        }
        true
    }

    // ========================================================================
    // Addressing
    // ========================================================================

    /// Resolve the address width for the next command.
    fn address_width(&mut self) -> AddressWidth {
        match self.profile.addressing {
            Addressing::ThreeByte => AddressWidth::ThreeByte,
            Addressing::FourByte => AddressWidth::FourByte,
            Addressing::Detect => {
                if self.read_security().bits() & self.profile.four_byte_mask != 0 {
                    AddressWidth::FourByte
                } else {
                    AddressWidth::ThreeByte
                }
            }
        }
    }

    /// Clock out an address, high byte first.
    fn send_address(&mut self, address: u32, width: AddressWidth) {
        let mut buf = [0u8; 4];
        for &byte in width.encode(address, &mut buf) {
            self.spi.send_byte(byte);
        }
    }

    // ========================================================================
    // Erase / program / read
    // ========================================================================

    /// Erase the sector containing `addr`.
    pub fn sector_erase(&mut self, addr: u32) -> Result<()> {
        if addr > self.profile.total_size {
            return Err(Error::AddressInvalid);
        }
        if self.is_busy() {
            return Err(Error::Busy);
        }
        let width = self.address_width();
        self.write_enable();

        self.spi.select();
        self.spi.send_byte(opcodes::SE);
        self.send_address(addr, width);
        self.spi.deselect();

        if self.wait_ready(self.profile.erase_budget) {
            Ok(())
        } else {
            log::warn!(
                "sector_erase: still busy after {} polls",
                self.profile.erase_budget
            );
            Err(Error::Timeout)
        }
    }

    /// Erase the whole chip.
    pub fn chip_erase(&mut self) -> Result<()> {
        if self.is_busy() {
            return Err(Error::Busy);
        }
        self.write_enable();

        self.spi.select();
        self.spi.send_byte(opcodes::CE);
        self.spi.deselect();

        if self.wait_ready(self.profile.chip_erase_budget) {
            Ok(())
        } else {
            log::warn!(
                "chip_erase: still busy after {} polls",
                self.profile.chip_erase_budget
            );
            Err(Error::Timeout)
        }
    }

    /// Program up to one page at `addr` (PP).
    ///
    /// `data` must not cross a page boundary: the chip wraps within the
    /// page and overwrites its start. [`write`](Self::write) handles the
    /// splitting for arbitrary spans.
    pub fn page_program(&mut self, addr: u32, data: &[u8]) -> Result<()> {
        if addr > self.profile.total_size {
            return Err(Error::AddressInvalid);
        }
        if self.is_busy() {
            return Err(Error::Busy);
        }
        let width = self.address_width();
        self.write_enable();

        self.spi.select();
        self.spi.send_byte(opcodes::PP);
        self.send_address(addr, width);
        for &byte in data {
            self.spi.send_byte(byte);
        }
        self.spi.deselect();

        if self.wait_ready(self.profile.program_budget) {
            Ok(())
        } else {
            log::warn!(
                "page_program: still busy after {} polls",
                self.profile.program_budget
            );
            Err(Error::Timeout)
        }
    }

    /// Program an arbitrary span, split into page-confined chunks.
    ///
    /// The target region must be erased first. Stops at the first failing
    /// page; earlier pages stay programmed.
    pub fn write(&mut self, addr: u32, data: &[u8]) -> Result<()> {
        let mut offset = 0usize;
        for (chunk_addr, len) in PageChunks::new(addr, data.len(), self.profile.page_size) {
            self.page_program(chunk_addr, &data[offset..offset + len])?;
            offset += len;
        }
        Ok(())
    }

    /// Read `buf.len()` bytes starting at `addr` (READ). No page constraint
    /// and no busy gate; succeeds once the transfer completes.
    pub fn read(&mut self, addr: u32, buf: &mut [u8]) -> Result<()> {
        if addr > self.profile.total_size {
            return Err(Error::AddressInvalid);
        }
        let width = self.address_width();

        self.spi.select();
        self.spi.send_byte(opcodes::READ);
        self.send_address(addr, width);
        for byte in buf.iter_mut() {
            *byte = self.spi.read_byte();
        }
        self.spi.deselect();

        Ok(())
    }
}

/// Splits an (address, length) span into page-confined chunks.
///
/// Yields `(address, length)` pairs: a first partial chunk up to the next
/// page boundary (a full page when the address is aligned), then whole
/// pages, then the remainder. The union of yielded ranges is exactly the
/// input span and no chunk crosses a page boundary.
#[derive(Debug, Clone)]
pub struct PageChunks {
    addr: u32,
    remaining: usize,
    page_size: u32,
}

impl PageChunks {
    /// Chunk `len` bytes starting at `addr` into pages of `page_size`.
    pub fn new(addr: u32, len: usize, page_size: u32) -> Self {
        debug_assert!(page_size > 0);
        Self {
            addr,
            remaining: len,
            page_size,
        }
    }
}

impl Iterator for PageChunks {
    type Item = (u32, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let to_page_end = (self.page_size - self.addr % self.page_size) as usize;
        let len = core::cmp::min(to_page_end, self.remaining);
        let chunk = (self.addr, len);
        self.addr += len as u32;
        self.remaining -= len;
        Some(chunk)
    }
}

#[cfg(test)]
mod tests {
    use super::PageChunks;
    use std::vec::Vec;

    fn chunks(addr: u32, len: usize) -> Vec<(u32, usize)> {
        PageChunks::new(addr, len, 256).collect()
    }

    #[test]
    fn aligned_write_crossing_one_boundary() {
        assert_eq!(chunks(0, 300), [(0, 256), (256, 44)]);
    }

    #[test]
    fn short_write_inside_first_page() {
        assert_eq!(chunks(10, 5), [(10, 5)]);
    }

    #[test]
    fn unaligned_write_crossing_boundary() {
        assert_eq!(chunks(250, 20), [(250, 6), (256, 14)]);
    }

    #[test]
    fn zero_length_yields_nothing() {
        assert!(chunks(123, 0).is_empty());
    }

    #[test]
    fn aligned_multi_page() {
        assert_eq!(chunks(512, 600), [(512, 256), (768, 256), (1024, 88)]);
    }

    #[test]
    fn exact_page_is_one_chunk() {
        assert_eq!(chunks(256, 256), [(256, 256)]);
    }

    #[test]
    fn chunks_cover_span_without_crossing_pages() {
        for &(addr, len) in &[
            (0u32, 1usize),
            (255, 2),
            (256, 256),
            (257, 1000),
            (4095, 4097),
        ] {
            let parts = chunks(addr, len);
            let mut expect = addr;
            let mut total = 0;
            for &(a, l) in &parts {
                assert_eq!(a, expect, "chunks must be contiguous");
                assert!(l > 0 && l <= 256);
                assert_eq!(
                    a / 256,
                    (a + l as u32 - 1) / 256,
                    "chunk crosses a page boundary"
                );
                expect = a + l as u32;
                total += l;
            }
            assert_eq!(total, len);
        }
    }
}
