//! pinflash-core - Bit-banged SPI NOR flash driver
//!
//! Drives a 25-series NOR flash chip through six raw GPIO lines, generating
//! the SPI protocol in software: one bit per clock cycle, MSB first, mode 0.
//! Intended for targets that only have GPIO set/clear/read and a millisecond
//! delay available, with no hardware SPI peripheral.
//!
//! The hardware is reached through the [`GpioBus`] capability trait, so the
//! same driver runs against the Linux character device backend, an in-memory
//! emulator, or a bare-metal HAL.
//!
//! # Example
//!
//! ```ignore
//! use pinflash_core::{ChipProfile, Flash, PinAssignment};
//!
//! let pins = PinAssignment { cs: 4, sck: 5, mosi: 11, miso: 12, wp: 13, hold: 14 };
//! let mut flash = Flash::new(bus, pins, ChipProfile::mx25l1606e());
//! flash.init();
//! assert_eq!(flash.read_jedec_id(), 0xC22015);
//! flash.sector_erase(0)?;
//! flash.write(0, b"hello")?;
//! ```

#![no_std]
#![warn(missing_docs)]

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod bitbang;
pub mod chip;
pub mod driver;
pub mod error;
pub mod gpio;
pub mod spi;

pub use chip::{Addressing, ChipProfile};
pub use driver::{Flash, PageChunks};
pub use error::{Error, Result};
pub use gpio::{GpioBus, PinAssignment, PinId, Pull};
pub use spi::{AddressWidth, Security, Status};
