//! pinflash-dummy - In-memory flash chip emulator for testing
//!
//! Emulates a 25-series NOR chip at the GPIO pin level: it implements
//! [`GpioBus`], watches the clock and chip-select lines the driver wiggles,
//! decodes the bit-banged command stream and answers on the data-out line.
//! Useful for testing the driver without real hardware.
//!
//! The decoder follows SPI mode 0: incoming bits are sampled on rising
//! clock edges, the output shifter advances on falling edges, and a new
//! output byte is fetched lazily the first time the master samples the
//! data-out line after the previous byte drained. Erase and program
//! commands take effect when chip select rises, as on real silicon.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;

use pinflash_core::spi::opcodes;
use pinflash_core::{GpioBus, PinAssignment, PinId, Pull};

/// Geometry and identity of the emulated chip.
#[derive(Debug, Clone)]
pub struct DummyConfig {
    /// 24-bit JEDEC identification returned by RDID.
    pub jedec_id: u32,
    /// Electronic signature returned by RES.
    pub electronic_id: u8,
    /// Flash size in bytes.
    pub size: usize,
    /// Page size for programming.
    pub page_size: usize,
    /// Sector size for smallest erase.
    pub sector_size: usize,
    /// Whether the chip runs in 4-byte address mode. Mirrored into the
    /// security register 4-byte bit.
    pub four_byte_addr: bool,
    /// How many status reads report busy after a program command.
    pub program_busy_reads: u32,
    /// How many status reads report busy after an erase command.
    pub erase_busy_reads: u32,
}

impl Default for DummyConfig {
    fn default() -> Self {
        Self {
            jedec_id: 0x00C2_2015, // MX25L1606E
            electronic_id: 0x14,
            size: 2 * 1024 * 1024,
            page_size: 256,
            sector_size: 4096,
            four_byte_addr: false,
            program_busy_reads: 2,
            erase_busy_reads: 4,
        }
    }
}

/// What the decoder does with the next complete input byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Waiting for the opcode byte of a new frame.
    Opcode,
    /// Collecting address bytes for the given opcode.
    Address(u8),
    /// Swallowing the padding the RES command clocks through.
    ResPadding,
    /// Buffering page program payload.
    Program,
    /// Streaming the flash array out.
    EmitData,
    /// Repeating the status register.
    EmitStatus,
    /// Repeating the security register.
    EmitSecurity,
    /// Draining a fixed response, then zeros.
    EmitQueue,
    /// Frame understood (or chip powered down), nothing more to say.
    Ignore,
}

/// Array mutation deferred until chip select rises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    None,
    Program,
    SectorErase(u32),
    ChipErase,
}

/// Pin-level dummy flash chip.
///
/// Plug it into the driver as its [`GpioBus`] and drive it like hardware.
pub struct DummyFlash {
    config: DummyConfig,
    pins: PinAssignment,
    data: Vec<u8>,

    // Line levels as last driven by the master
    cs: bool,
    sck: bool,
    mosi: bool,

    // Input shifter, sampled on rising clock edges
    in_shift: u8,
    in_bits: u8,
    // Output shifter, advanced on falling edges, refilled on demand
    out_shift: u8,
    out_bits: u8,

    phase: Phase,
    pending: Pending,
    addr_acc: u32,
    addr_got: u8,
    padding_bytes: u8,
    page_addr: u32,
    page_buf: Vec<u8>,
    read_ptr: usize,
    queue: Vec<u8>,
    queue_pos: usize,

    write_enabled: bool,
    powered_down: bool,
    busy_reads: u32,

    // Observability for tests
    transactions: usize,
    clock_edges: u64,
}

impl DummyFlash {
    /// Create a new dummy flash, fully erased (all 0xFF).
    pub fn new(config: DummyConfig, pins: PinAssignment) -> Self {
        let data = vec![0xFF; config.size];
        Self {
            config,
            pins,
            data,
            cs: true,
            sck: false,
            mosi: false,
            in_shift: 0,
            in_bits: 0,
            out_shift: 0,
            out_bits: 0,
            phase: Phase::Opcode,
            pending: Pending::None,
            addr_acc: 0,
            addr_got: 0,
            padding_bytes: 0,
            page_addr: 0,
            page_buf: Vec::new(),
            read_ptr: 0,
            queue: Vec::new(),
            queue_pos: 0,
            write_enabled: false,
            powered_down: false,
            busy_reads: 0,
            transactions: 0,
            clock_edges: 0,
        }
    }

    /// Create a dummy flash with pre-filled data.
    pub fn with_data(config: DummyConfig, pins: PinAssignment, initial_data: &[u8]) -> Self {
        let mut flash = Self::new(config, pins);
        let len = core::cmp::min(initial_data.len(), flash.data.len());
        flash.data[..len].copy_from_slice(&initial_data[..len]);
        flash
    }

    /// The flash array contents.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable access to the flash array.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// The configuration.
    pub fn config(&self) -> &DummyConfig {
        &self.config
    }

    /// Number of command frames seen (chip select assertions).
    pub fn transactions(&self) -> usize {
        self.transactions
    }

    /// Number of clock edges seen while selected.
    pub fn clock_edges(&self) -> u64 {
        self.clock_edges
    }

    /// Whether the write enable latch is currently set.
    pub fn is_write_enabled(&self) -> bool {
        self.write_enabled
    }

    /// Whether the chip is in deep power-down.
    pub fn is_powered_down(&self) -> bool {
        self.powered_down
    }

    /// Pretend an operation is in flight: the next `reads` status reads
    /// report busy.
    pub fn set_busy_reads(&mut self, reads: u32) {
        self.busy_reads = reads;
    }

    // ------------------------------------------------------------------
    // Frame and edge handling
    // ------------------------------------------------------------------

    fn start_frame(&mut self) {
        self.transactions += 1;
        self.phase = Phase::Opcode;
        self.pending = Pending::None;
        self.in_shift = 0;
        self.in_bits = 0;
        self.out_shift = 0;
        self.out_bits = 0;
    }

    fn end_frame(&mut self) {
        match self.pending {
            Pending::Program => self.commit_program(),
            Pending::SectorErase(addr) => self.commit_sector_erase(addr),
            Pending::ChipErase => self.commit_chip_erase(),
            Pending::None => {}
        }
        self.pending = Pending::None;
        self.phase = Phase::Opcode;
    }

    fn rising_edge(&mut self) {
        if self.cs {
            return;
        }
        self.clock_edges += 1;
        self.in_shift = (self.in_shift << 1) | u8::from(self.mosi);
        self.in_bits += 1;
        if self.in_bits == 8 {
            let byte = self.in_shift;
            self.in_shift = 0;
            self.in_bits = 0;
            self.on_byte(byte);
        }
    }

    fn falling_edge(&mut self) {
        if self.cs {
            return;
        }
        self.clock_edges += 1;
        if self.out_bits > 0 {
            self.out_shift <<= 1;
            self.out_bits -= 1;
        }
    }

    /// Level the master sees on the data-out line. Fetches the next
    /// response byte when the previous one has drained.
    fn sample_out(&mut self) -> bool {
        if self.cs {
            return false;
        }
        if self.out_bits == 0 {
            self.out_shift = self.next_out_byte();
            self.out_bits = 8;
        }
        self.out_shift & 0x80 != 0
    }

    // ------------------------------------------------------------------
    // Decoder
    // ------------------------------------------------------------------

    fn addr_len(&self) -> u8 {
        if self.config.four_byte_addr {
            4
        } else {
            3
        }
    }

    fn on_byte(&mut self, byte: u8) {
        match self.phase {
            Phase::Opcode => self.on_opcode(byte),
            Phase::Address(opcode) => {
                self.addr_acc = (self.addr_acc << 8) | u32::from(byte);
                self.addr_got += 1;
                if self.addr_got == self.addr_len() {
                    let addr = self.addr_acc % self.config.size as u32;
                    self.on_address_complete(opcode, addr);
                }
            }
            Phase::ResPadding => {
                self.padding_bytes += 1;
                if self.padding_bytes == 3 {
                    self.queue = vec![self.config.electronic_id];
                    self.queue_pos = 0;
                    self.phase = Phase::EmitQueue;
                    // Discard stale output alignment from the padding
                    self.out_shift = 0;
                    self.out_bits = 0;
                }
            }
            Phase::Program => self.page_buf.push(byte),
            // Bytes clocked in during an output phase are don't-care
            Phase::EmitData
            | Phase::EmitStatus
            | Phase::EmitSecurity
            | Phase::EmitQueue
            | Phase::Ignore => {}
        }
    }

    fn on_opcode(&mut self, opcode: u8) {
        if self.powered_down && opcode != opcodes::RES {
            self.phase = Phase::Ignore;
            return;
        }
        self.phase = match opcode {
            opcodes::RDSR => Phase::EmitStatus,
            opcodes::RDSCUR => Phase::EmitSecurity,
            opcodes::WREN => {
                self.write_enabled = true;
                Phase::Ignore
            }
            opcodes::WRDI => {
                self.write_enabled = false;
                Phase::Ignore
            }
            opcodes::RDID => {
                let id = self.config.jedec_id;
                self.queue = vec![(id >> 16) as u8, (id >> 8) as u8, id as u8];
                self.queue_pos = 0;
                Phase::EmitQueue
            }
            opcodes::RES => {
                self.powered_down = false;
                self.padding_bytes = 0;
                Phase::ResPadding
            }
            opcodes::READ | opcodes::PP | opcodes::SE => {
                self.addr_acc = 0;
                self.addr_got = 0;
                Phase::Address(opcode)
            }
            opcodes::CE | opcodes::CE_C7 => {
                self.pending = Pending::ChipErase;
                Phase::Ignore
            }
            opcodes::DP => {
                self.powered_down = true;
                Phase::Ignore
            }
            other => {
                log::debug!("dummy: unknown opcode {:#04x}", other);
                Phase::Ignore
            }
        };
    }

    fn on_address_complete(&mut self, opcode: u8, addr: u32) {
        self.phase = match opcode {
            opcodes::READ => {
                self.read_ptr = addr as usize;
                Phase::EmitData
            }
            opcodes::PP => {
                self.page_addr = addr;
                self.page_buf.clear();
                self.pending = Pending::Program;
                Phase::Program
            }
            opcodes::SE => {
                self.pending = Pending::SectorErase(addr);
                Phase::Ignore
            }
            _ => Phase::Ignore,
        };
    }

    fn next_out_byte(&mut self) -> u8 {
        match self.phase {
            Phase::EmitStatus => self.status_byte(),
            Phase::EmitSecurity => self.security_byte(),
            Phase::EmitQueue => {
                if self.queue_pos < self.queue.len() {
                    let byte = self.queue[self.queue_pos];
                    self.queue_pos += 1;
                    byte
                } else {
                    0
                }
            }
            Phase::EmitData => {
                let byte = self.data[self.read_ptr];
                self.read_ptr = (self.read_ptr + 1) % self.config.size;
                byte
            }
            _ => 0,
        }
    }

    fn status_byte(&mut self) -> u8 {
        let mut status = 0u8;
        if self.busy_reads > 0 {
            status |= opcodes::SR_WIP;
            self.busy_reads -= 1;
        }
        if self.write_enabled {
            status |= opcodes::SR_WEL;
        }
        status
    }

    fn security_byte(&self) -> u8 {
        if self.config.four_byte_addr {
            opcodes::SCUR_4BYTE
        } else {
            0
        }
    }

    // ------------------------------------------------------------------
    // Array mutations, applied at chip select release
    // ------------------------------------------------------------------

    fn commit_program(&mut self) {
        if !self.write_enabled {
            return;
        }
        let page = self.config.page_size;
        let base = self.page_addr as usize & !(page - 1);
        let offset = self.page_addr as usize % page;
        // Programming only clears bits; bytes past the page end wrap to
        // its start, as on real hardware
        for (i, &byte) in self.page_buf.iter().enumerate() {
            self.data[base + (offset + i) % page] &= byte;
        }
        self.write_enabled = false;
        self.busy_reads = self.config.program_busy_reads;
    }

    fn commit_sector_erase(&mut self, addr: u32) {
        if !self.write_enabled {
            return;
        }
        let sector = self.config.sector_size;
        let base = addr as usize & !(sector - 1);
        for byte in &mut self.data[base..base + sector] {
            *byte = 0xFF;
        }
        self.write_enabled = false;
        self.busy_reads = self.config.erase_busy_reads;
    }

    fn commit_chip_erase(&mut self) {
        if !self.write_enabled {
            return;
        }
        for byte in &mut self.data {
            *byte = 0xFF;
        }
        self.write_enabled = false;
        self.busy_reads = self.config.erase_busy_reads;
    }
}

impl GpioBus for DummyFlash {
    fn configure_output(&mut self, _pin: PinId) {}

    fn configure_input(&mut self, _pin: PinId, _pull: Pull) {}

    fn set_high(&mut self, pin: PinId) {
        if pin == self.pins.sck {
            if !self.sck {
                self.sck = true;
                self.rising_edge();
            }
        } else if pin == self.pins.cs {
            if !self.cs {
                self.cs = true;
                self.end_frame();
            }
        } else if pin == self.pins.mosi {
            self.mosi = true;
        }
    }

    fn set_low(&mut self, pin: PinId) {
        if pin == self.pins.sck {
            if self.sck {
                self.sck = false;
                self.falling_edge();
            }
        } else if pin == self.pins.cs {
            if self.cs {
                self.cs = false;
                self.start_frame();
            }
        } else if pin == self.pins.mosi {
            self.mosi = false;
        }
    }

    fn read(&mut self, pin: PinId) -> bool {
        if pin == self.pins.miso {
            self.sample_out()
        } else {
            false
        }
    }

    fn delay_ms(&mut self, _ms: u32) {}
}
