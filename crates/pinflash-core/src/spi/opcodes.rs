//! SPI flash opcodes
//!
//! Single-I/O command set as implemented by Macronix MX25 and compatible
//! 25-series parts.

// ============================================================================
// Write control
// ============================================================================

/// Write Enable - sets the write enable latch
pub const WREN: u8 = 0x06;
/// Write Disable - clears the write enable latch
pub const WRDI: u8 = 0x04;

// ============================================================================
// Register access
// ============================================================================

/// Read Status Register
pub const RDSR: u8 = 0x05;
/// Write Status Register
pub const WRSR: u8 = 0x01;
/// Read Security Register
pub const RDSCUR: u8 = 0x2B;
/// Write Security Register
pub const WRSCUR: u8 = 0x2F;

// ============================================================================
// Identification
// ============================================================================

/// Read JEDEC ID (manufacturer + device, 3 bytes)
pub const RDID: u8 = 0x9F;
/// Read Electronic Manufacturer and Device ID
pub const REMS: u8 = 0x90;
/// Read Electronic Signature (also releases deep power-down)
pub const RES: u8 = 0xAB;

// ============================================================================
// Read
// ============================================================================

/// Normal read
pub const READ: u8 = 0x03;
/// Fast read (one dummy byte after the address)
pub const FAST_READ: u8 = 0x0B;

// ============================================================================
// Program
// ============================================================================

/// Page Program (up to one page, wraps within the page)
pub const PP: u8 = 0x02;

// ============================================================================
// Erase
// ============================================================================

/// Sector Erase (4KB)
pub const SE: u8 = 0x20;
/// Block Erase (64KB)
pub const BE: u8 = 0xD8;
/// Chip Erase
pub const CE: u8 = 0x60;
/// Chip Erase (alternative opcode)
pub const CE_C7: u8 = 0xC7;

// ============================================================================
// Power management
// ============================================================================

/// Deep Power-Down
pub const DP: u8 = 0xB9;
/// Release from Deep Power-Down (same opcode as RES)
pub const RDP: u8 = 0xAB;

// ============================================================================
// Status register bits
// ============================================================================

/// Write In Progress - erase/program executing
pub const SR_WIP: u8 = 0x01;
/// Write Enable Latch
pub const SR_WEL: u8 = 0x02;
/// Quad Enable
pub const SR_QE: u8 = 0x40;

// ============================================================================
// Security register bits
// ============================================================================

/// Chip is in 4-byte address mode
pub const SCUR_4BYTE: u8 = 0x04;
/// Write protect selection (individual block lock mode)
pub const SCUR_WPSEL: u8 = 0x80;
