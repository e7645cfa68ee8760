//! pinflash-linux-gpio - Linux GPIO backend for pinflash
//!
//! Drives a NOR flash chip wired to raw GPIO lines through the Linux GPIO
//! character device interface (`/dev/gpiochipN`), using the gpiocdev crate.
//!
//! Wiring (all six flash lines are GPIO-driven, including WP# and HOLD#):
//!
//! | Flash pin | Role                   |
//! |-----------|------------------------|
//! | CS#       | Chip select, active low|
//! | SCLK      | Serial clock           |
//! | SI        | Data in (our MOSI)     |
//! | SO        | Data out (our MISO)    |
//! | WP#       | Write protect          |
//! | HOLD#     | Hold                   |
//!
//! # Example
//!
//! ```no_run
//! use pinflash_core::{ChipProfile, Flash, PinAssignment};
//! use pinflash_linux_gpio::{LinuxGpioBus, LinuxGpioConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pins = PinAssignment { cs: 25, sck: 11, mosi: 10, miso: 9, wp: 7, hold: 8 };
//! let config = LinuxGpioConfig::for_pins("/dev/gpiochip0", &pins);
//! let bus = LinuxGpioBus::open(&config)?;
//!
//! let mut flash = Flash::new(bus, pins, ChipProfile::mx25l1606e());
//! flash.init();
//! println!("JEDEC ID: {:#08x}", flash.read_jedec_id());
//! # Ok(())
//! # }
//! ```

mod bus;
mod error;

pub use bus::{LinuxGpioBus, LinuxGpioConfig};
pub use error::{LinuxGpioError, Result};
