//! Measurement-to-indication engine of the CO2 monitor
//!
//! Everything here is hardware independent and runs on the host under
//! `cargo test`. The firmware in `main.rs` wires these pieces to the RP2350
//! peripherals.
//!
//! Data flow:
//!
//! ```text
//! sensor -> ReadGate -> { classifier -> IndicatorController, DisplayController }
//! buttons -> ToggleChannel -> { IndicatorController, DisplayController }
//! ```

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod classifier;
pub mod config;
pub mod debounce;
pub mod display;
pub mod error;
pub mod indicator;
pub mod measurement;
pub mod monitor;
pub mod read_gate;
pub mod scd30;
pub mod startup;

pub use classifier::{BandTable, ColorBand, Rgb, STANDARD_BANDS, classify};
pub use debounce::{ChannelId, ToggleChannel, ToggleEvent, Toggles};
pub use error::{Error, ReadError};
pub use measurement::{Measurement, Reading};
pub use monitor::{Monitor, Phase, Step};
