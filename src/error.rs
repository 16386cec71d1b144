//! Error types for the monitor
//!
//! All variants carry only fixed-size data so they stay `Copy` and can be
//! logged with `defmt` on target.

use core::fmt;

/// Top-level error type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The CO2 sensor never answered its init sequence
    SensorInit {
        /// Number of failed attempts before giving up
        attempts: u32,
    },
    /// The display never initialized
    DisplayInit {
        /// Number of failed attempts before giving up
        attempts: u32,
    },
}

/// Why a sensor read failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadError {
    /// The I2C transfer failed
    Bus,
    /// A sensor word did not match its checksum
    Crc,
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus => f.write_str("bus transfer failed"),
            Self::Crc => f.write_str("checksum mismatch"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SensorInit { attempts } => write!(f, "sensor init failed after {attempts} attempts"),
            Self::DisplayInit { attempts } => write!(f, "display init failed after {attempts} attempts"),
        }
    }
}
