//! The main loop: sensor polling, deduplication and output updates
//!
//! Every wake-up runs one [`Monitor::step`]: poll the sensor, read if data is
//! ready, then update display and indicator when the reading is new or a
//! debounced toggle is waiting. Afterwards the loop sleeps until the next
//! wake source fires.

use embassy_time::Instant;
use embedded_hal_async::i2c::I2c;

use crate::{
    config::READ_ERROR_MESSAGE,
    debounce::Toggles,
    display::{DisplayController, TextDisplay},
    error::ReadError,
    indicator::{Indicator, IndicatorController},
    measurement::{Measurement, Reading},
    read_gate::ReadGate,
    scd30::Scd30,
};

/// Source of CO2, temperature and humidity samples
#[allow(async_fn_in_trait)]
pub trait Sensor {
    /// Non-blocking check for a new sample
    async fn data_ready(&mut self) -> bool;
    /// Reads the new sample
    async fn read(&mut self) -> Result<Reading, ReadError>;
}

/// Monotonic millisecond clock
pub trait Clock {
    /// Current time
    fn now(&self) -> Instant;
}

/// Low-power wait
#[allow(async_fn_in_trait)]
pub trait Wake {
    /// Blocks until any wake source fires, or until `deadline` when one is given
    async fn sleep_until_wake(&mut self, deadline: Option<Instant>);
}

impl<I2C: I2c> Sensor for Scd30<I2C> {
    async fn data_ready(&mut self) -> bool {
        match self.is_data_ready().await {
            Ok(ready) => ready,
            Err(e) => {
                warn!("SCD30 data ready query failed: {}", e);
                false
            }
        }
    }

    async fn read(&mut self) -> Result<Reading, ReadError> {
        Self::read(self).await
    }
}

/// Lifecycle of the main loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// No successful read yet, outputs show the startup banner
    WaitingForFirstRead,
    /// At least one reading exists, terminal state
    Running,
}

/// What one iteration did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    /// Nothing has been read yet
    WaitingForFirstRead,
    /// A read failed, outputs were left alone apart from the error banner
    ReadFailed(ReadError),
    /// A new reading was processed
    Processed {
        /// Sequence of the processed reading
        sequence: u32,
    },
    /// No new reading, but a toggle was applied to the latest one
    Toggled,
    /// Woken without new data or toggles
    Duplicate,
}

/// Owns the collaborators and all decision state of the device
pub struct Monitor<'t, S, I, D> {
    /// CO2 sensor
    sensor: S,
    /// RGB pixel
    indicator: I,
    /// Text display
    display: D,
    /// Toggle channels shared with the button context
    toggles: &'t Toggles,
    /// Deduplicates processing of the same reading
    gate: ReadGate,
    /// Number of successful reads so far
    sequence: u32,
    /// Latest successful reading
    latest: Option<Measurement>,
    /// Indicator decisions
    indicator_controller: IndicatorController,
    /// Display decisions
    display_controller: DisplayController,
}

impl<'t, S: Sensor, I: Indicator, D: TextDisplay> Monitor<'t, S, I, D> {
    /// Creates the loop with both outputs enabled and nothing read yet
    pub const fn new(sensor: S, indicator: I, display: D, toggles: &'t Toggles) -> Self {
        Self::with_controllers(
            sensor,
            indicator,
            display,
            toggles,
            IndicatorController::new(),
            DisplayController::new(),
        )
    }

    /// Creates the loop with custom controllers, e.g. a different band table
    pub const fn with_controllers(
        sensor: S,
        indicator: I,
        display: D,
        toggles: &'t Toggles,
        indicator_controller: IndicatorController,
        display_controller: DisplayController,
    ) -> Self {
        Self {
            sensor,
            indicator,
            display,
            toggles,
            gate: ReadGate::new(),
            sequence: 0,
            latest: None,
            indicator_controller,
            display_controller,
        }
    }

    /// Where the loop is in its lifecycle
    pub const fn phase(&self) -> Phase {
        if self.latest.is_some() {
            Phase::Running
        } else {
            Phase::WaitingForFirstRead
        }
    }

    /// Latest successful reading
    pub const fn latest(&self) -> Option<Measurement> {
        self.latest
    }

    /// Indicator controller, for inspecting its state
    pub const fn indicator_controller(&self) -> &IndicatorController {
        &self.indicator_controller
    }

    /// Display controller, for inspecting its state
    pub const fn display_controller(&self) -> &DisplayController {
        &self.display_controller
    }

    /// Mutable access to the outputs, e.g. for startup banners
    pub const fn outputs(&mut self) -> (&mut I, &mut D) {
        (&mut self.indicator, &mut self.display)
    }

    /// Runs one iteration of the loop
    pub async fn step(&mut self, now: Instant) -> Step {
        if self.sensor.data_ready().await {
            match self.sensor.read().await {
                Ok(reading) => {
                    self.sequence = self.sequence.saturating_add(1);
                    let measurement = Measurement::new(reading, self.sequence);
                    debug!("read #{}: {}", self.sequence, measurement);
                    self.latest = Some(measurement);
                }
                Err(e) => {
                    warn!("reading sensor data failed: {}", e);
                    self.display_controller
                        .message(READ_ERROR_MESSAGE)
                        .apply(&mut self.display)
                        .await;
                    return Step::ReadFailed(e);
                }
            }
        }

        let Some(measurement) = self.latest else {
            return Step::WaitingForFirstRead;
        };

        let fresh = self.gate.advance(measurement.sequence);
        let display_toggle = self.toggles.display.consume(now);
        let indicator_toggle = self.toggles.indicator.consume(now);

        if fresh || display_toggle.is_some() {
            self.display_controller
                .update(&measurement, display_toggle)
                .apply(&mut self.display)
                .await;
        }
        if fresh || indicator_toggle.is_some() {
            self.indicator_controller
                .update(&measurement, indicator_toggle)
                .apply(&mut self.indicator)
                .await;
        }

        if fresh {
            Step::Processed {
                sequence: measurement.sequence,
            }
        } else if display_toggle.is_some() || indicator_toggle.is_some() {
            Step::Toggled
        } else {
            trace!("woken without new data");
            Step::Duplicate
        }
    }

    /// Runs one iteration, then waits for the next wake source
    pub async fn cycle<C: Clock, W: Wake>(&mut self, clock: &C, wake: &mut W) -> Step {
        let step = self.step(clock.now()).await;
        wake.sleep_until_wake(self.wake_deadline(step)).await;
        step
    }

    /// Runs the loop forever
    pub async fn run<C: Clock, W: Wake>(&mut self, clock: &C, wake: &mut W) -> ! {
        info!("monitor running");
        loop {
            self.cycle(clock, wake).await;
        }
    }

    /// Settle deadline to sleep towards, if the step could consume toggles
    ///
    /// Before the first reading and after a failed read toggles stay pending,
    /// so their deadline may already be over and would never be cleared.
    fn wake_deadline(&self, step: Step) -> Option<Instant> {
        match step {
            Step::WaitingForFirstRead | Step::ReadFailed(_) => None,
            Step::Processed { .. } | Step::Toggled | Step::Duplicate => self.toggles.settle_deadline(),
        }
    }
}
