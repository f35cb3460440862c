// Copyright 2024, F. Stan
//
// Licensed under the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>,
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::path::PathBuf;
use std::time::Duration;

/// BCM number of the MQ-7 digital output pin
pub const GAS_PIN: u8 = 17;
/// BCM number of the DHT22 data pin
pub const CLIMATE_PIN: u8 = 4;
/// Log file, relative to the working directory
pub const LOG_PATH: &str = "data.csv";

/// Fixed parameters of the logger.
///
/// The binary always runs with `Settings::default()`. Tests build their own
/// to point at a temporary directory.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub gas_pin: u8,
    pub climate_pin: u8,
    pub log_path: PathBuf,
    /// Heater stabilisation pause before the first sample
    pub warmup: Duration,
    /// Pause after a recoverable sensor fault
    pub retry_delay: Duration,
    /// Pause between two logged samples
    pub interval: Duration,
    /// Hours added to local time when stamping a reading
    pub utc_offset_hours: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gas_pin: GAS_PIN,
            climate_pin: CLIMATE_PIN,
            log_path: PathBuf::from(LOG_PATH),
            warmup: Duration::from_secs(2),
            retry_delay: Duration::from_secs(2),
            interval: Duration::from_secs(60),
            utc_offset_hours: 7,
        }
    }
}
