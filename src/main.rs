// Copyright 2024, F. Stan
//
// Licensed under the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>,
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::io;

use log::error;
use mq7_logger::dht22::Dht22;
use mq7_logger::error::LoggerError;
use mq7_logger::mq7::Mq7;
use mq7_logger::sensor_loop::{SensorLoop, SystemClock};
use mq7_logger::settings::Settings;

fn main() -> Result<(), LoggerError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::default();
    let gas = Mq7::new(settings.gas_pin)?;
    let climate = Dht22::new(settings.climate_pin).map_err(LoggerError::Sensor)?;

    let mut logger = SensorLoop::new(settings, climate, gas, SystemClock, io::stdout());
    match logger.run() {
        Ok(never) => match never {},
        Err(e) => {
            error!("stopping: {e}");
            Err(e)
        }
    }
}
