//! RGB indicator decisions
//!
//! The indicator shows the colour of the current CO2 band. It flashes at
//! [`BRIGHT`] whenever the band differs from the last one shown and sits at
//! [`DIM`] while the band stays put, so attention is drawn exactly at band
//! transitions and never by in-band noise.

use crate::{
    classifier::{BandTable, ColorBand, Rgb, STANDARD_BANDS},
    config::{BRIGHT, DIM},
    debounce::ToggleEvent,
    measurement::Measurement,
};

/// Output side of the indicator
#[allow(async_fn_in_trait)]
pub trait Indicator {
    /// Writes colour and brightness in one go and shows them
    async fn set(&mut self, color: Rgb, brightness: u8);
}

/// What the indicator should do after an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IndicatorCommand {
    /// Show a colour at a brightness
    Show {
        /// Colour of the current band
        color: Rgb,
        /// [`BRIGHT`] on a band change, [`DIM`] otherwise
        brightness: u8,
    },
    /// Switch the pixel off
    Off,
    /// Leave the pixel as it is
    Hold,
}

impl IndicatorCommand {
    /// Applies the command to an indicator
    pub async fn apply<I: Indicator>(self, indicator: &mut I) {
        match self {
            Self::Show { color, brightness } => indicator.set(color, brightness).await,
            Self::Off => indicator.set(Rgb::BLACK, 0).await,
            Self::Hold => {}
        }
    }
}

/// State owned by the indicator controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IndicatorState {
    /// Whether the indicator is switched on
    pub enabled: bool,
    /// Band shown last, `None` before the first reading and after the indicator was switched off
    pub previous_band: Option<ColorBand>,
}

impl IndicatorState {
    /// Enabled, nothing shown yet
    pub const fn new() -> Self {
        Self {
            enabled: true,
            previous_band: None,
        }
    }
}

impl Default for IndicatorState {
    fn default() -> Self {
        Self::new()
    }
}

/// Decides colour and brightness of the indicator
pub struct IndicatorController {
    /// Enable flag and last band
    state: IndicatorState,
    /// Breakpoints used to pick the band
    bands: BandTable,
}

impl IndicatorController {
    /// Controller using the standard band table
    pub const fn new() -> Self {
        Self::with_bands(STANDARD_BANDS)
    }

    /// Controller using a custom band table
    pub const fn with_bands(bands: BandTable) -> Self {
        Self {
            state: IndicatorState::new(),
            bands,
        }
    }

    /// Current state
    pub const fn state(&self) -> IndicatorState {
        self.state
    }

    /// Handles a toggle and a measurement
    pub fn update(&mut self, measurement: &Measurement, toggle: Option<ToggleEvent>) -> IndicatorCommand {
        if toggle.is_some() {
            self.state.enabled = !self.state.enabled;
            if !self.state.enabled {
                info!("indicator switched off");
                // Forget the band so switching back on always flashes bright.
                self.state.previous_band = None;
                return IndicatorCommand::Off;
            }
            info!("indicator switched on");
        }

        if !self.state.enabled {
            return IndicatorCommand::Hold;
        }

        let band = self.bands.classify(measurement.co2_ppm);
        let brightness = if self.state.previous_band == Some(band) {
            DIM
        } else {
            info!("CO2 band {} -> {} at {} ppm", self.state.previous_band, band, measurement.co2_ppm);
            BRIGHT
        };
        self.state.previous_band = Some(band);

        IndicatorCommand::Show {
            color: band.color(),
            brightness,
        }
    }
}

impl Default for IndicatorController {
    fn default() -> Self {
        Self::new()
    }
}
