//! GPIO capability trait
//!
//! The driver never touches hardware directly. It is handed an object
//! implementing [`GpioBus`], which provides the handful of pin primitives
//! bit-banging needs. Backends exist for the Linux GPIO character device
//! and for an in-memory chip emulator used in tests.

/// Identifies a single GPIO line (chip-relative offset on Linux).
pub type PinId = u32;

/// Input bias applied when configuring a pin as an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pull {
    /// No bias, line floats.
    #[default]
    None,
    /// Pull-up resistor enabled.
    Up,
    /// Pull-down resistor enabled.
    Down,
}

/// Raw pin primitives the bit-bang engine runs on.
///
/// Methods are infallible at this level: backends that can fail (e.g. the
/// Linux character device) log the error and carry on, since a lost edge is
/// not recoverable mid-transfer anyway.
pub trait GpioBus {
    /// Configure `pin` as a push-pull output.
    fn configure_output(&mut self, pin: PinId);

    /// Configure `pin` as an input with the given bias.
    fn configure_input(&mut self, pin: PinId, pull: Pull);

    /// Drive `pin` high.
    fn set_high(&mut self, pin: PinId);

    /// Drive `pin` low.
    fn set_low(&mut self, pin: PinId);

    /// Drive `pin` to the given level.
    fn set_level(&mut self, pin: PinId, high: bool) {
        if high {
            self.set_high(pin);
        } else {
            self.set_low(pin);
        }
    }

    /// Sample the current level of `pin`.
    fn read(&mut self, pin: PinId) -> bool;

    /// Block for at least `ms` milliseconds.
    fn delay_ms(&mut self, ms: u32);
}

/// Which GPIO line plays which SPI role.
///
/// WP and HOLD are driven high (deasserted) at init and never toggled; they
/// still need pins so the lines don't float.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinAssignment {
    /// Chip select, active low.
    pub cs: PinId,
    /// Serial clock.
    pub sck: PinId,
    /// Master out, flash data in.
    pub mosi: PinId,
    /// Master in, flash data out.
    pub miso: PinId,
    /// Write protect, active low.
    pub wp: PinId,
    /// Hold, active low.
    pub hold: PinId,
}
