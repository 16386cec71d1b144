//! Peripheral acquisition at power-up
//!
//! The sensor and the display are retried according to a [`RetryPolicy`].
//! Every failed attempt blinks a pattern on the indicator that tells which
//! peripheral is missing.

use embedded_hal_async::delay::DelayNs;

use crate::{
    classifier::Rgb,
    config::{BLINK_DURATION, DIM, RetryPolicy, WAITING_MESSAGE},
    display::TextDisplay,
    error::Error,
    indicator::Indicator,
};

/// A peripheral the device cannot run without
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Peripheral {
    /// The CO2 sensor
    Sensor,
    /// The text display
    Display,
}

impl Peripheral {
    /// Colours blinked after a failed attempt
    pub const fn blink_pattern(self) -> [Rgb; 2] {
        match self {
            Self::Sensor => [Rgb::BLUE, Rgb::PURPLE],
            Self::Display => [Rgb::ORANGE, Rgb::BLUE],
        }
    }

    /// Error reported when a bounded policy runs out
    const fn error(self, attempts: u32) -> Error {
        match self {
            Self::Sensor => Error::SensorInit { attempts },
            Self::Display => Error::DisplayInit { attempts },
        }
    }
}

/// Shows the startup colour while peripherals come up
pub async fn announce_power_up<I: Indicator>(indicator: &mut I) {
    indicator.set(Rgb::PURPLE, DIM).await;
}

/// Clears the startup colour and tells the user a first reading is pending
pub async fn announce_ready<I: Indicator, D: TextDisplay>(indicator: &mut I, display: &mut D) {
    indicator.set(Rgb::BLACK, 0).await;
    display.show_message(WAITING_MESSAGE).await;
}

/// Blinks each colour of a pattern for [`BLINK_DURATION`]
pub async fn blink<I: Indicator, D: DelayNs>(indicator: &mut I, delay: &mut D, pattern: [Rgb; 2]) {
    #[allow(clippy::cast_possible_truncation)]
    let hold_ms = BLINK_DURATION.as_millis() as u32;
    for color in pattern {
        indicator.set(color, DIM).await;
        delay.delay_ms(hold_ms).await;
    }
}

/// Runs `attempt` until it succeeds or the policy gives up
pub async fn acquire<T, E, I, D, F>(
    peripheral: Peripheral,
    policy: RetryPolicy,
    indicator: &mut I,
    delay: &mut D,
    mut attempt: F,
) -> Result<T, Error>
where
    I: Indicator,
    D: DelayNs,
    F: AsyncFnMut() -> Result<T, E>,
{
    let mut failed: u32 = 0;
    loop {
        if let Ok(value) = attempt().await {
            info!("{} ready after {} failed attempts", peripheral, failed);
            return Ok(value);
        }

        failed = failed.saturating_add(1);
        warn!("{} init failed, attempt {}", peripheral, failed);
        blink(indicator, delay, peripheral.blink_pattern()).await;

        if !policy.allows_another(failed) {
            error!("giving up on {} after {} attempts", peripheral, failed);
            return Err(peripheral.error(failed));
        }
    }
}
