// Copyright 2024, F. Stan
//
// Licensed under the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>,
// This file may not be copied, modified, or distributed
// except according to those terms.

//! MQ-7 gas alarm and DHT22 temperature/humidity logger
//!
//! Samples both sensors on a Raspberry Pi every minute, prints a status
//! line and appends one row to `data.csv` in the working directory.
//!
//! Wiring (BCM numbering):
//!
//! - MQ-7 module DOUT on GPIO 17, active low
//! - DHT22 data line on GPIO 4, with pull-up
//!
//! ## Basic Example
//!
//! Running the logger with the deployed constants
//!
//!```no_run
//!use mq7_logger::dht22::Dht22;
//!use mq7_logger::mq7::Mq7;
//!use mq7_logger::sensor_loop::{SensorLoop, SystemClock};
//!use mq7_logger::settings::Settings;
//!
//!fn main() -> Result<(), mq7_logger::error::LoggerError> {
//!    let settings = Settings::default();
//!    let gas = Mq7::new(settings.gas_pin)?;
//!    let climate = Dht22::new(settings.climate_pin)
//!        .map_err(mq7_logger::error::LoggerError::Sensor)?;
//!
//!    let mut logger = SensorLoop::new(settings, climate, gas, SystemClock, std::io::stdout());
//!    match logger.run() {
//!        Ok(never) => match never {},
//!        Err(e) => Err(e),
//!    }
//!}
//!```
//!

/// Append-only CSV log file
pub mod csv_log;
/// DHT22 single wire driver
pub mod dht22;
pub mod error;
/// MQ-7 digital alarm input
pub mod mq7;
/// Reading entity and its console/CSV renderings
pub mod reading;
pub mod sensor_loop;
pub mod settings;
