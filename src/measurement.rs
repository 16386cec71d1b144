//! Sensor readings as they flow through the main loop

/// One successful sensor sample, before it is numbered by the main loop
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    /// CO2 concentration in ppm
    pub co2_ppm: f32,
    /// Temperature in degrees Celsius
    pub temperature_c: f32,
    /// Relative humidity in percent
    pub relative_humidity_pct: f32,
}

/// A numbered, immutable sensor sample
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Measurement {
    /// CO2 concentration in ppm
    pub co2_ppm: f32,
    /// Temperature in degrees Celsius
    pub temperature_c: f32,
    /// Relative humidity in percent
    pub relative_humidity_pct: f32,
    /// Number of the successful read that produced this sample, starting at 1
    pub sequence: u32,
}

impl Measurement {
    /// Numbers a reading
    pub const fn new(reading: Reading, sequence: u32) -> Self {
        Self {
            co2_ppm: reading.co2_ppm,
            temperature_c: reading.temperature_c,
            relative_humidity_pct: reading.relative_humidity_pct,
            sequence,
        }
    }

    /// Temperature converted to degrees Fahrenheit
    pub fn temperature_f(&self) -> f32 {
        self.temperature_c * (9.0 / 5.0) + 32.0
    }

    /// CO2 rounded to whole ppm, negative and NaN readings clamp to 0
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn co2_whole_ppm(&self) -> u32 {
        if self.co2_ppm > 0.0 {
            (self.co2_ppm + 0.5) as u32
        } else {
            0
        }
    }
}
