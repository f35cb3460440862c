// Copyright 2024, F. Stan
//
// Licensed under the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>,
// This file may not be copied, modified, or distributed
// except according to those terms.

//! The sampling loop.
//!
//! One state, `Sampling`, repeated forever. Every pass through [`SensorLoop::step`]
//! ends in exactly one of three ways:
//!
//! - [`Step::Logged`]: a full reading was printed and appended to the log,
//! - [`Step::Retry`]: the DHT22 reported a transient fault, nothing was written
//!   and the retry delay has already elapsed,
//! - `Err(_)`: a fatal fault. The climate sensor has been released.

use std::convert::Infallible;
use std::io::Write;
use std::thread;
use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use log::{error, info, warn};

use crate::csv_log::CsvLog;
use crate::dht22::ClimateSensor;
use crate::error::{LoggerError, Result};
use crate::mq7::GasAlarm;
use crate::reading::{shift_timestamp, Reading};
use crate::settings::Settings;

/// Wall clock and sleep, swapped out in tests
pub trait Clock {
    /// Local wall clock time
    fn now(&self) -> NaiveDateTime;
    fn sleep(&mut self, duration: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn sleep(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Outcome of one iteration
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Logged(Reading),
    Retry(String),
}

pub struct SensorLoop<S, G, C, W> {
    settings: Settings,
    climate: S,
    gas: G,
    clock: C,
    console: W,
    log: CsvLog,
}

impl<S, G, C, W> SensorLoop<S, G, C, W>
where
    S: ClimateSensor,
    G: GasAlarm,
    C: Clock,
    W: Write,
{
    pub fn new(settings: Settings, climate: S, gas: G, clock: C, console: W) -> Self {
        let log = CsvLog::new(settings.log_path.clone());
        SensorLoop {
            settings,
            climate,
            gas,
            clock,
            console,
            log,
        }
    }

    /// Warm-up pause, then make sure the log file carries its header.
    pub fn start(&mut self) -> Result<()> {
        self.say("MQ-7 Gas Sensor Test (Digital Mode)")?;
        self.say("Waiting for sensor to warm up...")?;
        self.clock.sleep(self.settings.warmup);
        self.say("Ready!")?;

        if let Err(e) = self.log.ensure_header() {
            return Err(self.fatal(e));
        }
        info!(
            "sampling every {:?}, logging to {}",
            self.settings.interval,
            self.log.path().display()
        );
        Ok(())
    }

    /// One sample, print, append cycle. Does not sleep the cycle interval.
    pub fn step(&mut self) -> Result<Step> {
        let timestamp = shift_timestamp(self.clock.now(), self.settings.utc_offset_hours);

        let climate = match self.climate.sample() {
            Ok(climate) => climate,
            Err(e) if e.is_recoverable() => {
                warn!("recoverable DHT22 fault: {e}");
                let reason = e.to_string();
                self.say(&reason)?;
                self.clock.sleep(self.settings.retry_delay);
                return Ok(Step::Retry(reason));
            }
            Err(e) => return Err(self.fatal(LoggerError::Sensor(e))),
        };

        let gas_pin_high = match self.gas.read_raw() {
            Ok(level) => level,
            Err(e) => return Err(self.fatal(e)),
        };

        let reading = Reading::new(climate, gas_pin_high, timestamp);
        self.say(&reading.status_line())?;
        self.say(reading.gas_line())?;

        if let Err(e) = self.log.append(&reading) {
            return Err(self.fatal(e));
        }
        Ok(Step::Logged(reading))
    }

    /// Runs until a fatal fault, which is returned.
    pub fn run(&mut self) -> Result<Infallible> {
        self.start()?;
        loop {
            if let Step::Logged(_) = self.step()? {
                self.clock.sleep(self.settings.interval);
            }
        }
    }

    pub fn into_parts(self) -> (S, G, C, W) {
        (self.climate, self.gas, self.clock, self.console)
    }

    fn say(&mut self, line: &str) -> Result<()> {
        if let Err(e) = writeln!(self.console, "{line}") {
            return Err(self.fatal(LoggerError::Console(e)));
        }
        Ok(())
    }

    fn fatal(&mut self, err: LoggerError) -> LoggerError {
        error!("{err}, releasing DHT22");
        self.climate.release();
        err
    }
}
