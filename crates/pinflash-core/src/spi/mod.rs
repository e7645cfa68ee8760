//! SPI flash command vocabulary
//!
//! Opcodes, address encoding and typed register views shared by the
//! command layer and the test emulator.

mod address;
pub mod opcodes;
mod status;

pub use address::AddressWidth;
pub use status::{Security, Status};
