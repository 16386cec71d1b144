//! Compile-time configuration for the CO2 monitor
//!
//! Thresholds, timings and brightness levels are fixed policy and live here so
//! they can be tuned in one place. The band table itself is in
//! [`crate::classifier::STANDARD_BANDS`].
//!
//! Pin map (RP2350 board):
//!
//! | Function                | Pin    |
//! |-------------------------|--------|
//! | I2C0 SDA (SCD30, OLED)  | GPIO16 |
//! | I2C0 SCL (SCD30, OLED)  | GPIO17 |
//! | SCD30 data ready        | GPIO18 |
//! | Display toggle button   | GPIO19 |
//! | Indicator toggle button | GPIO20 |
//! | NeoPixel data (PIO0)    | GPIO21 |

use core::num::NonZeroU32;

use embassy_time::Duration;

/// Minimum spacing between two accepted button edges; also the settling time before a toggle is acted on
pub const DEBOUNCE_INTERVAL: Duration = Duration::from_millis(100);

/// Indicator brightness used to flash a band change
pub const BRIGHT: u8 = 50;

/// Indicator brightness while the band stays the same
pub const DIM: u8 = 5;

/// How long each colour of a startup failure blink is held
pub const BLINK_DURATION: Duration = Duration::from_millis(500);

/// Wait after power-up so the SCD30 can answer the first init attempt
pub const SENSOR_POWER_UP_DELAY: Duration = Duration::from_millis(10);

/// The SSD1306 may report success right after power-up and stay blank, so give it time first
pub const DISPLAY_POWER_UP_DELAY: Duration = Duration::from_millis(100);

/// SCD30 continuous measurement interval in seconds
pub const MEASUREMENT_INTERVAL_SECS: u16 = 2;

/// Ambient pressure passed to the SCD30 when starting measurements, 0 disables compensation
pub const AMBIENT_PRESSURE_MBAR: u16 = 0;

/// Poll interval while the data-ready pin stays high, e.g. after a failed read
pub const READY_RECHECK_INTERVAL: Duration = Duration::from_millis(250);

/// How peripheral acquisition behaves at startup
pub const STARTUP_RETRY: RetryPolicy = RetryPolicy::Forever;

/// Left margin of every display line, columns 0 and 1 are cut off on the panel
pub const DISPLAY_LEFT_MARGIN: i32 = 2;

/// Height of one text line on the display
pub const LINE_HEIGHT: i32 = 8;

/// Number of text lines a reading occupies
pub const DISPLAY_LINES: usize = 4;

/// Capacity of one formatted display line
pub const LINE_CAPACITY: usize = 32;

/// Banner shown once the peripherals are up but no reading has arrived
pub const WAITING_MESSAGE: &str = "Waiting for sensor";

/// Banner shown when a read fails after the sensor signalled data ready
pub const READ_ERROR_MESSAGE: &str = "Error reading sensor data";

/// Retry policy for acquiring a peripheral at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RetryPolicy {
    /// Keep trying until the peripheral answers, the device is useless without it
    Forever,
    /// Give up after this many failed attempts
    Attempts(NonZeroU32),
}

impl RetryPolicy {
    /// Whether another attempt is allowed after `failed` attempts have failed
    pub const fn allows_another(self, failed: u32) -> bool {
        match self {
            Self::Forever => true,
            Self::Attempts(limit) => failed < limit.get(),
        }
    }
}
