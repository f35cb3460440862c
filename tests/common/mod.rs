//! Scripted stand-ins for the GPIO sensors and the clock.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;
use std::path::Path;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use mq7_logger::dht22::ClimateSensor;
use mq7_logger::error::{Dht22Error, LoggerError};
use mq7_logger::mq7::GasAlarm;
use mq7_logger::reading::Climate;
use mq7_logger::sensor_loop::{Clock, SensorLoop};
use mq7_logger::settings::Settings;

pub type TestLoop = SensorLoop<ScriptedSensor, ScriptedPin, FakeClock, Vec<u8>>;

pub fn climate(temperature_c: f32, humidity_pct: f32) -> Climate {
    Climate {
        temperature_c,
        humidity_pct,
    }
}

/// Replays queued results, then keeps answering with 20.0 °C / 50.0 %.
#[derive(Default)]
pub struct ScriptedSensor {
    script: VecDeque<Result<Option<Climate>, Dht22Error>>,
    pub samples: usize,
    pub released: bool,
}

impl ScriptedSensor {
    pub fn new(script: Vec<Result<Option<Climate>, Dht22Error>>) -> Self {
        ScriptedSensor {
            script: script.into(),
            ..Default::default()
        }
    }
}

impl ClimateSensor for ScriptedSensor {
    fn sample(&mut self) -> Result<Option<Climate>, Dht22Error> {
        if self.released {
            return Err(Dht22Error::Released);
        }
        self.samples += 1;
        self.script
            .pop_front()
            .unwrap_or(Ok(Some(climate(20.0, 50.0))))
    }

    fn release(&mut self) {
        self.released = true;
    }
}

/// Replays queued pin levels, then reads high. `failing` makes every read error.
#[derive(Default)]
pub struct ScriptedPin {
    levels: VecDeque<bool>,
    pub reads: Vec<bool>,
    pub failing: bool,
}

impl ScriptedPin {
    pub fn new(levels: Vec<bool>) -> Self {
        ScriptedPin {
            levels: levels.into(),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        ScriptedPin {
            failing: true,
            ..Default::default()
        }
    }
}

impl GasAlarm for ScriptedPin {
    fn read_raw(&mut self) -> Result<bool, LoggerError> {
        if self.failing {
            return Err(LoggerError::GasPin {
                details: "line request lost".to_string(),
            });
        }
        let level = self.levels.pop_front().unwrap_or(true);
        self.reads.push(level);
        Ok(level)
    }
}

/// Time only moves when the loop sleeps.
pub struct FakeClock {
    pub now: NaiveDateTime,
    pub slept: Vec<Duration>,
}

impl FakeClock {
    /// Two seconds before 2024-01-01 05:00:00 local, so the first sample
    /// after warm-up is stamped 12:00:00 once shifted by seven hours
    pub fn new() -> Self {
        FakeClock {
            now: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(4, 59, 58)
                .unwrap(),
            slept: Vec::new(),
        }
    }
}

impl Clock for FakeClock {
    fn now(&self) -> NaiveDateTime {
        self.now
    }

    fn sleep(&mut self, duration: Duration) {
        self.now += duration;
        self.slept.push(duration);
    }
}

/// Stdout that has gone away, every write fails
pub struct ClosedConsole;

impl io::Write for ClosedConsole {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdout closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub fn settings_in(dir: &Path) -> Settings {
    Settings {
        log_path: dir.join("data.csv"),
        ..Settings::default()
    }
}

pub fn test_loop(dir: &Path, sensor: ScriptedSensor, pin: ScriptedPin) -> TestLoop {
    SensorLoop::new(settings_in(dir), sensor, pin, FakeClock::new(), Vec::new())
}

pub fn log_lines(dir: &Path) -> Vec<String> {
    std::fs::read_to_string(dir.join("data.csv"))
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

pub fn console_text(console: &[u8]) -> String {
    String::from_utf8(console.to_vec()).unwrap()
}
