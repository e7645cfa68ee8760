//! Chip profiles
//!
//! Everything chip-specific lives here: geometry, identification, register
//! masks and busy-poll budgets. Masks are carried as data rather than
//! hardcoded so a profile can describe parts whose detection bits differ.

use crate::spi::opcodes;

/// How the driver picks between 3- and 4-byte addressing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Addressing {
    /// Always send 3-byte addresses.
    ThreeByte,
    /// Always send 4-byte addresses.
    FourByte,
    /// Query the security register before every addressed command. The
    /// mode can change at runtime, so the answer is never cached.
    #[default]
    Detect,
}

// Busy-poll budgets are iteration counts, not time units. A budget estimates
// how many poll-loop iterations fit in a chip's worst-case operation time,
// assuming one iteration costs roughly
// CLK_PERIOD_NS * MIN_CYCLES_PER_INST * LOOP_INST_COUNT nanoseconds.
const CLK_PERIOD_NS: u64 = 20;
const MIN_CYCLES_PER_INST: u64 = 12;
const LOOP_INST_COUNT: u64 = 8;

const fn poll_budget(worst_case_ns: u64) -> u32 {
    (worst_case_ns / (CLK_PERIOD_NS * MIN_CYCLES_PER_INST * LOOP_INST_COUNT)) as u32
}

/// Worst-case page program time, tPP (3 ms).
const T_PP_NS: u64 = 3_000_000;
/// Worst-case sector erase time, tSE (200 ms).
const T_SE_NS: u64 = 200_000_000;
/// Worst-case chip erase time, tCE (20 s).
const T_CE_NS: u64 = 20_000_000_000;

/// Static description of one flash part plus driver tuning for it.
#[derive(Debug, Clone)]
pub struct ChipProfile {
    /// Vendor part name.
    pub name: &'static str,
    /// 24-bit JEDEC identification, packed big-endian (manufacturer,
    /// memory type, capacity).
    pub jedec_id: u32,
    /// Capacity in bytes.
    pub total_size: u32,
    /// Program page size in bytes.
    pub page_size: u32,
    /// Smallest erase unit in bytes.
    pub sector_size: u32,
    /// Address width selection.
    pub addressing: Addressing,
    /// Status register bit meaning "write in progress".
    pub busy_mask: u8,
    /// Security register bit meaning "4-byte address mode active".
    pub four_byte_mask: u8,
    /// Poll budget for page program.
    pub program_budget: u32,
    /// Poll budget for sector erase.
    pub erase_budget: u32,
    /// Poll budget for chip erase.
    pub chip_erase_budget: u32,
}

impl ChipProfile {
    /// Macronix MX25L1606E: 2MB, 256-byte pages, 4KB sectors.
    pub const fn mx25l1606e() -> Self {
        Self {
            name: "MX25L1606E",
            jedec_id: 0x00C2_2015,
            total_size: 2 * 1024 * 1024,
            page_size: 256,
            sector_size: 4096,
            addressing: Addressing::Detect,
            busy_mask: opcodes::SR_WIP,
            four_byte_mask: opcodes::SCUR_4BYTE,
            program_budget: poll_budget(T_PP_NS),
            erase_budget: poll_budget(T_SE_NS),
            chip_erase_budget: poll_budget(T_CE_NS),
        }
    }
}

impl Default for ChipProfile {
    fn default() -> Self {
        Self::mx25l1606e()
    }
}
