//! Text display decisions
//!
//! A reading is shown as four independently formatted lines:
//!
//! ```text
//! 612 ppm CO2
//! 21.4 C | 70.5 F
//! 45% relative humidity
//! Good indoor air
//! ```

use core::fmt::{self, Write};

use heapless::{String, Vec};

use crate::{
    classifier::{BandTable, STANDARD_BANDS},
    config::{DISPLAY_LINES, LINE_CAPACITY},
    debounce::ToggleEvent,
    measurement::Measurement,
};

/// One formatted display line
pub type Line = String<LINE_CAPACITY>;

/// All lines of one rendered reading
pub type Lines = Vec<Line, DISPLAY_LINES>;

/// Shown instead of a CO2 value too wide for its line
const CO2_PLACEHOLDER: &str = "-- ppm CO2";

/// Shown instead of a temperature too wide for its line
const TEMPERATURE_PLACEHOLDER: &str = "-- C | -- F";

/// Shown instead of a humidity too wide for its line
const HUMIDITY_PLACEHOLDER: &str = "--% relative humidity";

/// Output side of the display
#[allow(async_fn_in_trait)]
pub trait TextDisplay {
    /// Blanks the panel
    async fn clear(&mut self);
    /// Draws the lines top to bottom, replacing whatever was shown
    async fn render(&mut self, lines: &[Line]);
    /// Replaces the panel content with a single status message
    async fn show_message(&mut self, text: &str);
}

/// What the display should do after an update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayCommand {
    /// Draw a reading
    Render(Lines),
    /// Show a status or error banner
    Message(&'static str),
    /// Blank the panel
    Clear,
    /// Leave the panel as it is
    Hold,
}

impl DisplayCommand {
    /// Applies the command to a display
    pub async fn apply<D: TextDisplay>(&self, display: &mut D) {
        match self {
            Self::Render(lines) => display.render(lines).await,
            Self::Message(text) => display.show_message(text).await,
            Self::Clear => display.clear().await,
            Self::Hold => {}
        }
    }
}

/// State owned by the display controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayState {
    /// Whether the display is switched on
    pub enabled: bool,
}

impl DisplayState {
    /// Enabled
    pub const fn new() -> Self {
        Self { enabled: true }
    }
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::new()
    }
}

/// Decides what the text display shows
pub struct DisplayController {
    /// Enable flag
    state: DisplayState,
    /// Breakpoints used for the description line
    bands: BandTable,
}

impl DisplayController {
    /// Controller using the standard band table
    pub const fn new() -> Self {
        Self::with_bands(STANDARD_BANDS)
    }

    /// Controller using a custom band table
    pub const fn with_bands(bands: BandTable) -> Self {
        Self {
            state: DisplayState::new(),
            bands,
        }
    }

    /// Current state
    pub const fn state(&self) -> DisplayState {
        self.state
    }

    /// Handles a toggle and a measurement
    pub fn update(&mut self, measurement: &Measurement, toggle: Option<ToggleEvent>) -> DisplayCommand {
        if toggle.is_some() {
            self.state.enabled = !self.state.enabled;
            if !self.state.enabled {
                info!("display switched off");
                return DisplayCommand::Clear;
            }
            info!("display switched on");
        }

        if !self.state.enabled {
            return DisplayCommand::Hold;
        }

        DisplayCommand::Render(self.format(measurement))
    }

    /// Status banner, suppressed while the display is switched off
    pub const fn message(&self, text: &'static str) -> DisplayCommand {
        if self.state.enabled {
            DisplayCommand::Message(text)
        } else {
            DisplayCommand::Hold
        }
    }

    /// Formats the four lines of a reading
    fn format(&self, measurement: &Measurement) -> Lines {
        [
            field(
                format_args!("{} ppm CO2", measurement.co2_whole_ppm()),
                CO2_PLACEHOLDER,
            ),
            field(
                format_args!(
                    "{:.1} C | {:.1} F",
                    measurement.temperature_c,
                    measurement.temperature_f()
                ),
                TEMPERATURE_PLACEHOLDER,
            ),
            field(
                format_args!("{:.0}% relative humidity", measurement.relative_humidity_pct),
                HUMIDITY_PLACEHOLDER,
            ),
            Line::try_from(self.bands.classify(measurement.co2_ppm).description()).unwrap_or_default(),
        ]
        .into_iter()
        .collect()
    }
}

/// Formats one line, or the placeholder when the value does not fit
fn field(args: fmt::Arguments<'_>, placeholder: &str) -> Line {
    let mut line = Line::new();
    if line.write_fmt(args).is_err() {
        return Line::try_from(placeholder).unwrap_or_default();
    }
    line
}

impl Default for DisplayController {
    fn default() -> Self {
        Self::new()
    }
}
