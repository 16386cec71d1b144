//! Async driver for the Sensirion SCD30 CO2/temperature/humidity sensor
//!
//! Every 16-bit word on the wire is followed by a CRC-8 (polynomial 0x31,
//! init 0xFF). Measurements are three big-endian `f32`s, each split into two
//! checksummed words.

use crc_all::Crc;
use embedded_hal_async::i2c::I2c;

use crate::{error::ReadError, measurement::Reading};

/// Fixed I2C address of the SCD30
const SENSOR_ADDR: u8 = 0x61;

/// Length of one measurement frame: three floats of two words each
const MEASUREMENT_FRAME_LEN: usize = 18;

/// SCD30 command words
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Start continuous measurement, argument is the ambient pressure in mbar
    StartContinuousMeasurement,
    /// Set the measurement interval in seconds
    SetMeasurementInterval,
    /// Query whether a new measurement is available
    DataReady,
    /// Read the latest measurement
    ReadMeasurement,
    /// Enable or disable automatic self-calibration
    AutomaticSelfCalibration,
    /// Read the firmware version
    ReadFirmwareVersion,
}

impl Command {
    /// The raw command word
    pub const fn raw(self) -> u16 {
        match self {
            Self::StartContinuousMeasurement => 0x0010,
            Self::SetMeasurementInterval => 0x4600,
            Self::DataReady => 0x0202,
            Self::ReadMeasurement => 0x0300,
            Self::AutomaticSelfCalibration => 0x5306,
            Self::ReadFirmwareVersion => 0xd100,
        }
    }
}

/// Sensirion CRC-8
pub struct SensirionCrc {
    /// Configured CRC engine
    inner: Crc<u8>,
}

impl SensirionCrc {
    /// Creates the CRC engine with Sensirion's parameters
    pub fn new() -> Self {
        Self {
            inner: Crc::<u8>::new(0x31, 8, 0xff, 0x00, false),
        }
    }

    /// Checksum of `input`
    pub fn calculate(&mut self, input: &[u8]) -> u8 {
        self.inner.init();
        self.inner.update(input);
        self.inner.finish()
    }

    /// Checks one `[msb, lsb, crc]` triple and returns the word
    pub fn checked_word(&mut self, triple: &[u8]) -> Result<u16, ReadError> {
        match triple {
            [msb, lsb, crc] if self.calculate(&[*msb, *lsb]) == *crc => Ok(u16::from_be_bytes([*msb, *lsb])),
            _ => Err(ReadError::Crc),
        }
    }
}

impl Default for SensirionCrc {
    fn default() -> Self {
        Self::new()
    }
}

/// Decodes a measurement frame into a reading
pub fn decode_measurement(frame: &[u8; MEASUREMENT_FRAME_LEN], crc: &mut SensirionCrc) -> Result<Reading, ReadError> {
    Ok(Reading {
        co2_ppm: decode_f32(&frame[..6], crc)?,
        temperature_c: decode_f32(&frame[6..12], crc)?,
        relative_humidity_pct: decode_f32(&frame[12..], crc)?,
    })
}

/// Decodes one float made of two checksummed words
fn decode_f32(slice: &[u8], crc: &mut SensirionCrc) -> Result<f32, ReadError> {
    if slice.len() != 6 {
        return Err(ReadError::Crc);
    }
    let high = crc.checked_word(&slice[..3])?.to_be_bytes();
    let low = crc.checked_word(&slice[3..])?.to_be_bytes();
    Ok(f32::from_be_bytes([high[0], high[1], low[0], low[1]]))
}

/// SCD30 on an async I2C bus
pub struct Scd30<I2C> {
    /// The I2C device
    bus: I2C,
    /// Checksum engine
    crc: SensirionCrc,
}

impl<I2C: I2c> Scd30<I2C> {
    /// Wraps an I2C device, no bus traffic happens here
    pub fn new(bus: I2C) -> Self {
        Self {
            bus,
            crc: SensirionCrc::new(),
        }
    }

    /// Probes the sensor and puts it into continuous measurement
    ///
    /// Self-calibration is switched off so the baseline does not drift
    /// indoors. Returns the firmware version.
    pub async fn begin(&mut self, interval_secs: u16, pressure_mbar: u16) -> Result<u16, ReadError> {
        let version = self.read_word(Command::ReadFirmwareVersion).await?;
        self.write_word(Command::AutomaticSelfCalibration, 0).await?;
        self.write_word(Command::SetMeasurementInterval, interval_secs).await?;
        self.write_word(Command::StartContinuousMeasurement, pressure_mbar)
            .await?;
        info!(
            "SCD30 firmware {}.{} measuring every {}s",
            version >> 8,
            version & 0xff,
            interval_secs
        );
        Ok(version)
    }

    /// Whether a new measurement can be read
    pub async fn is_data_ready(&mut self) -> Result<bool, ReadError> {
        Ok(self.read_word(Command::DataReady).await? == 1)
    }

    /// Reads the latest measurement
    pub async fn read(&mut self) -> Result<Reading, ReadError> {
        let mut frame = [0u8; MEASUREMENT_FRAME_LEN];
        self.bus
            .write(SENSOR_ADDR, &Command::ReadMeasurement.raw().to_be_bytes())
            .await
            .map_err(|_| ReadError::Bus)?;
        self.bus
            .read(SENSOR_ADDR, &mut frame)
            .await
            .map_err(|_| ReadError::Bus)?;
        decode_measurement(&frame, &mut self.crc)
    }

    /// Sends a command and reads back one checksummed word
    async fn read_word(&mut self, command: Command) -> Result<u16, ReadError> {
        self.bus
            .write(SENSOR_ADDR, &command.raw().to_be_bytes())
            .await
            .map_err(|_| ReadError::Bus)?;
        let mut buffer = [0u8; 3];
        self.bus
            .read(SENSOR_ADDR, &mut buffer)
            .await
            .map_err(|_| ReadError::Bus)?;
        self.crc.checked_word(&buffer)
    }

    /// Sends a command with one checksummed argument word
    async fn write_word(&mut self, command: Command, word: u16) -> Result<(), ReadError> {
        let mut buffer = [0u8; 5];
        buffer[..2].copy_from_slice(&command.raw().to_be_bytes());
        buffer[2..4].copy_from_slice(&word.to_be_bytes());
        buffer[4] = self.crc.calculate(&buffer[2..4]);
        self.bus
            .write(SENSOR_ADDR, &buffer)
            .await
            .map_err(|_| ReadError::Bus)
    }
}
