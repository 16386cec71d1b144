//! RP2350 glue between the decision engine and the real peripherals

use co2_color_monitor::monitor::Clock;
use embassy_embedded_hal::shared_bus::asynch::i2c::I2cDevice;
use embassy_rp::{
    i2c::{Async, I2c},
    peripherals::I2C0,
};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_time::Instant;

pub mod buttons;
pub mod neopixel;
pub mod oled;
pub mod wake;

/// One device on the shared I2C0 bus
pub type SharedI2c = I2cDevice<'static, NoopRawMutex, I2c<'static, I2C0, Async>>;

/// A peripheral did not answer during startup
#[derive(Debug, Clone, Copy, defmt::Format)]
pub struct PeripheralFault;

/// Clock backed by the embassy time driver
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
