//! Linux GPIO character device bus
//!
//! Implements the driver's [`GpioBus`] capability on top of gpiocdev. All
//! six flash lines are requested as one group; the driver's init sequence
//! settles directions through `configure_output` / `configure_input`, which
//! map to line reconfiguration.

use std::thread;
use std::time::Duration;

use gpiocdev::line::{Bias, Offset, Value};
use gpiocdev::request::{Config, Request};

use pinflash_core::{GpioBus, PinAssignment, PinId, Pull};

use crate::error::{LinuxGpioError, Result};

/// Configuration for opening the GPIO lines.
#[derive(Debug, Clone, Default)]
pub struct LinuxGpioConfig {
    /// Device path (e.g., "/dev/gpiochip0")
    pub device: String,
    /// Line offsets the driver will use.
    pub lines: Vec<Offset>,
}

impl LinuxGpioConfig {
    /// Configuration for `device` using the given line offsets.
    pub fn new(device: impl Into<String>, lines: &[Offset]) -> Self {
        Self {
            device: device.into(),
            lines: lines.to_vec(),
        }
    }

    /// Configuration for `device` covering all lines of a pin assignment.
    pub fn for_pins(device: impl Into<String>, pins: &PinAssignment) -> Self {
        Self::new(
            device,
            &[pins.cs, pins.sck, pins.mosi, pins.miso, pins.wp, pins.hold],
        )
    }
}

/// GPIO character device bus for bit-banged SPI.
pub struct LinuxGpioBus {
    request: Request,
}

impl LinuxGpioBus {
    /// Request the configured lines, all as inputs initially. The flash
    /// driver reconfigures directions during its init sequence.
    pub fn open(config: &LinuxGpioConfig) -> Result<Self> {
        if config.device.is_empty() {
            return Err(LinuxGpioError::NoDevice);
        }
        if config.lines.is_empty() {
            return Err(LinuxGpioError::NoLines);
        }

        log::debug!("linux_gpio: opening {}", config.device);

        let mut req_config = Config::default();
        for &line in &config.lines {
            req_config.with_line(line).as_input();
        }

        let request = Request::from_config(req_config)
            .on_chip(&config.device)
            .with_consumer("pinflash")
            .request()
            .map_err(LinuxGpioError::LineRequestFailed)?;

        log::info!(
            "linux_gpio: opened {} ({} lines)",
            config.device,
            config.lines.len()
        );

        Ok(Self { request })
    }
}

impl GpioBus for LinuxGpioBus {
    fn configure_output(&mut self, pin: PinId) {
        let mut cfg = Config::default();
        cfg.with_line(pin).as_output(Value::Inactive);
        if let Err(e) = self.request.reconfigure(&cfg) {
            log::error!("Failed to configure line {} as output: {}", pin, e);
        }
    }

    fn configure_input(&mut self, pin: PinId, pull: Pull) {
        let bias = match pull {
            Pull::None => Bias::Disabled,
            Pull::Up => Bias::PullUp,
            Pull::Down => Bias::PullDown,
        };
        let mut cfg = Config::default();
        cfg.with_line(pin).as_input().with_bias(bias);
        if let Err(e) = self.request.reconfigure(&cfg) {
            log::error!("Failed to configure line {} as input: {}", pin, e);
        }
    }

    fn set_high(&mut self, pin: PinId) {
        if let Err(e) = self.request.set_value(pin, Value::Active) {
            log::error!("Failed to set line {} high: {}", pin, e);
        }
    }

    fn set_low(&mut self, pin: PinId) {
        if let Err(e) = self.request.set_value(pin, Value::Inactive) {
            log::error!("Failed to set line {} low: {}", pin, e);
        }
    }

    fn read(&mut self, pin: PinId) -> bool {
        match self.request.value(pin) {
            Ok(Value::Active) => true,
            Ok(Value::Inactive) => false,
            Err(e) => {
                log::error!("Failed to read line {}: {}", pin, e);
                false
            }
        }
    }

    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}
