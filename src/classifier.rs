//! CO2 severity classification
//!
//! A CO2 concentration is mapped to a [`ColorBand`] by scanning an ascending
//! table of breakpoints: the first breakpoint the value is strictly below
//! wins, everything else lands in the table's terminal band.
//!
//! Reference points behind [`STANDARD_BANDS`]:
//!
//! * 350-400 ppm: normal background concentration in outdoor air
//! * 870 ppm: ASHRAE indoor steady-state recommendation
//! * 900-2000 ppm: complaints of drowsiness and poor air
//! * 2000-5000 ppm: headaches, sleepiness, stale and stuffy air
//! * 5000 ppm: workplace exposure limit (8-hour TWA) in most jurisdictions
//! * the SCD30 is only specified as accurate up to 10000 ppm

/// An RGB colour with 8 bits per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Rgb {
    /// Creates a colour from its channels
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// All channels off
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// White
    pub const WHITE: Self = Self::new(255, 255, 255);
    /// Blue
    pub const BLUE: Self = Self::new(0, 0, 255);
    /// Green
    pub const GREEN: Self = Self::new(0, 255, 0);
    /// Yellow
    pub const YELLOW: Self = Self::new(255, 255, 0);
    /// Orange
    pub const ORANGE: Self = Self::new(255, 128, 0);
    /// Red
    pub const RED: Self = Self::new(255, 0, 0);
    /// Hot pink
    pub const HOT_PINK: Self = Self::new(255, 0, 128);
    /// Magenta
    pub const MAGENTA: Self = Self::new(255, 0, 255);
    /// Purple, used while the device is starting up
    pub const PURPLE: Self = Self::new(128, 0, 128);
}

/// A discrete CO2 severity category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ColorBand {
    /// Very good outdoor air
    White,
    /// Typical outdoor air
    Blue,
    /// Good indoor air
    Green,
    /// Borderline indoor air
    Yellow,
    /// Poor indoor air
    Orange,
    /// Stale and stuffy
    Red,
    /// Above the workplace exposure limit
    HotPink,
    /// Beyond the sensor's accurate range
    Magenta,
}

impl ColorBand {
    /// The indicator colour of this band
    pub const fn color(self) -> Rgb {
        match self {
            Self::White => Rgb::WHITE,
            Self::Blue => Rgb::BLUE,
            Self::Green => Rgb::GREEN,
            Self::Yellow => Rgb::YELLOW,
            Self::Orange => Rgb::ORANGE,
            Self::Red => Rgb::RED,
            Self::HotPink => Rgb::HOT_PINK,
            Self::Magenta => Rgb::MAGENTA,
        }
    }

    /// Short description, fits one 21 character display line
    pub const fn description(self) -> &'static str {
        match self {
            Self::White => "Very good outdoor air",
            Self::Blue => "Typical outdoor air",
            Self::Green => "Good indoor air",
            Self::Yellow => "Borderline indoor air",
            Self::Orange => "Poor indoor air",
            Self::Red => "Bad - stale & stuffy",
            Self::HotPink => "Above exposure limit",
            Self::Magenta => "Too high for accuracy",
        }
    }
}

/// Upper (exclusive) CO2 bound of a band
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    /// Readings strictly below this value (ppm) belong to `band`
    pub below_ppm: f32,
    /// The band for readings under `below_ppm`
    pub band: ColorBand,
}

impl Breakpoint {
    /// Creates a breakpoint
    pub const fn new(below_ppm: f32, band: ColorBand) -> Self {
        Self { below_ppm, band }
    }
}

/// Ordered breakpoint table plus the band for values past the last breakpoint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandTable {
    /// Breakpoints in strictly ascending order
    breakpoints: &'static [Breakpoint],
    /// Band for values at or above the highest breakpoint
    terminal: ColorBand,
}

impl BandTable {
    /// Creates a table, panics at compile time when used in a const and the breakpoints are not strictly ascending
    pub const fn new(breakpoints: &'static [Breakpoint], terminal: ColorBand) -> Self {
        let mut i = 1;
        while i < breakpoints.len() {
            assert!(
                breakpoints[i - 1].below_ppm < breakpoints[i].below_ppm,
                "breakpoints must be strictly ascending"
            );
            i += 1;
        }
        Self { breakpoints, terminal }
    }

    /// Maps a CO2 concentration to its band
    ///
    /// Total over all floats: values that are not below any breakpoint,
    /// including NaN, map to the terminal band.
    pub fn classify(&self, co2_ppm: f32) -> ColorBand {
        self.breakpoints
            .iter()
            .find(|bp| co2_ppm < bp.below_ppm)
            .map_or(self.terminal, |bp| bp.band)
    }

    /// The breakpoints in ascending order
    pub const fn breakpoints(&self) -> &'static [Breakpoint] {
        self.breakpoints
    }

    /// The highest-severity band
    pub const fn terminal(&self) -> ColorBand {
        self.terminal
    }
}

/// Canonical 8-band table of the current hardware revision
pub const STANDARD_BANDS: BandTable = BandTable::new(
    &[
        Breakpoint::new(350.0, ColorBand::White),
        Breakpoint::new(400.0, ColorBand::Blue),
        Breakpoint::new(870.0, ColorBand::Green),
        Breakpoint::new(1000.0, ColorBand::Yellow),
        Breakpoint::new(2000.0, ColorBand::Orange),
        Breakpoint::new(5000.0, ColorBand::Red),
        Breakpoint::new(9999.0, ColorBand::HotPink),
    ],
    ColorBand::Magenta,
);

/// Classifies with the standard table and returns the band with its description
pub fn classify(co2_ppm: f32) -> (ColorBand, &'static str) {
    let band = STANDARD_BANDS.classify(co2_ppm);
    (band, band.description())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typical_outdoor_air_is_blue() {
        let (band, description) = classify(375.0);
        assert_eq!(band, ColorBand::Blue);
        assert_eq!(band.color(), Rgb::BLUE);
        assert_eq!(description, "Typical outdoor air");
    }

    #[test]
    fn boundary_belongs_to_upper_band() {
        for bp in STANDARD_BANDS.breakpoints() {
            assert_eq!(STANDARD_BANDS.classify(bp.below_ppm - 0.5), bp.band);
            assert_ne!(STANDARD_BANDS.classify(bp.below_ppm), bp.band);
            assert_ne!(STANDARD_BANDS.classify(bp.below_ppm + 0.5), bp.band);
        }
    }

    #[test]
    fn same_band_inside_interval() {
        assert_eq!(classify(400.0).0, classify(869.9).0);
        assert_eq!(classify(1000.0).0, classify(1999.0).0);
        assert_eq!(classify(0.0).0, classify(349.9).0);
    }

    #[test]
    fn every_band_is_reachable_in_order() {
        let probes = [100.0, 375.0, 450.0, 950.0, 1500.0, 3000.0, 7000.0, 12_000.0];
        let bands = probes.map(|ppm| STANDARD_BANDS.classify(ppm));
        assert_eq!(
            bands,
            [
                ColorBand::White,
                ColorBand::Blue,
                ColorBand::Green,
                ColorBand::Yellow,
                ColorBand::Orange,
                ColorBand::Red,
                ColorBand::HotPink,
                ColorBand::Magenta,
            ]
        );
        assert!(bands.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn large_and_odd_values_map_to_terminal_band() {
        assert_eq!(classify(9999.0).0, ColorBand::Magenta);
        assert_eq!(classify(1.0e9).0, ColorBand::Magenta);
        assert_eq!(classify(f32::INFINITY).0, ColorBand::Magenta);
        assert_eq!(classify(f32::NAN).0, ColorBand::Magenta);
    }

    #[test]
    fn negative_values_map_to_lowest_band() {
        assert_eq!(classify(-5.0).0, ColorBand::White);
    }

    #[test]
    fn descriptions_fit_one_display_line() {
        for bp in STANDARD_BANDS.breakpoints() {
            assert!(bp.band.description().len() <= 21);
        }
        assert!(STANDARD_BANDS.terminal().description().len() <= 21);
    }

    #[test]
    fn alternative_table_can_be_swapped_in() {
        const OUTDOOR: BandTable = BandTable::new(
            &[
                Breakpoint::new(250.0, ColorBand::White),
                Breakpoint::new(400.0, ColorBand::Blue),
                Breakpoint::new(1000.0, ColorBand::Green),
            ],
            ColorBand::Red,
        );
        assert_eq!(OUTDOOR.classify(300.0), ColorBand::Blue);
        assert_eq!(OUTDOOR.classify(1000.0), ColorBand::Red);
        assert_eq!(STANDARD_BANDS.classify(300.0), ColorBand::White);
    }
}
