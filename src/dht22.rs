// Copyright 2024, F. Stan
//
// Licensed under the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>,
// This file may not be copied, modified, or distributed
// except according to those terms.

use log::debug;
use rppal::gpio::{Gpio, IoPin, Level, Mode, Bias};
use std::time::{Duration, Instant};
use std::thread;

use crate::error::Dht22Error;
use crate::reading::Climate;

/// Start signal: the host holds the line low at least 1 ms
const START_SIGNAL: Duration = Duration::from_micros(1100);
/// Upper bound for one capture
const CAPTURE_WINDOW: Duration = Duration::from_millis(250);
/// Line considered idle once it stops toggling for this long
const IDLE_TIMEOUT: Duration = Duration::from_millis(2);
/// The sensor must not be triggered more often than this
pub const MIN_INTERVAL: Duration = Duration::from_secs(2);

/// Data bits in one frame
const FRAME_BITS: usize = 40;
/// High pulses longer than this encode a 1 (26-28 us is a 0, 70 us a 1)
const ONE_THRESHOLD_US: u32 = 51;

/// Source of temperature/humidity samples.
///
/// `Ok(None)` means the driver has no data yet, which is not a fault.
/// Errors are split by `Dht22Error::is_recoverable`.
pub trait ClimateSensor {
    fn sample(&mut self) -> Result<Option<Climate>, Dht22Error>;

    /// Give the data line back. Later samples fail with `Released`.
    fn release(&mut self);
}

/// DHT22 Struct, wraps the rppal GPIO line the sensor
/// data pin is wired to and implements the single wire
/// read sequence
///
pub struct Dht22 {
    pin: Option<IoPin>,
    gate: RateGate,
}

/// Last trigger time and last good sample, keeps the sensor
/// from being polled faster than `MIN_INTERVAL`
#[derive(Debug, Default)]
struct RateGate {
    last_attempt: Option<Instant>,
    last_sample: Option<Climate>,
}

impl RateGate {
    /// `Some(previous sample)` inside the window, `None` when a read is due
    fn cached(&self, now: Instant) -> Option<Option<Climate>> {
        match self.last_attempt {
            Some(last) if now.duration_since(last) < MIN_INTERVAL => Some(self.last_sample),
            _ => None,
        }
    }

    fn attempt(&mut self, now: Instant) {
        self.last_attempt = Some(now);
    }

    fn record(&mut self, climate: Climate) {
        self.last_sample = Some(climate);
    }
}

impl Dht22 {
    /// Create a new DHT22 Struct
    ///
    /// Claims the BCM pin through rppal and leaves it as a
    /// pulled up input, the idle state of the bus.
    /// If fails, return the GPIO error.
    ///
    pub fn new(bcm_pin: u8) -> Result<Dht22, Dht22Error> {
        let gpio = Gpio::new()?;
        let mut pin = gpio.get(bcm_pin)?.into_io(Mode::Input);
        pin.set_bias(Bias::PullUp);
        Ok(Dht22 {
            pin: Some(pin),
            gate: RateGate::default(),
        })
    }

    /// Sum of the four data bytes, truncated to 8 bits.
    /// The fifth byte of a frame carries this value.
    ///
    pub fn checksum(data: &[u8]) -> u8 {
        data.iter().fold(0u8, |sum, byte| sum.wrapping_add(*byte))
    }

    /// Turns captured high pulse widths (microseconds) into a 5 byte frame.
    ///
    /// The capture also contains the handshake pulses, only the last 40
    /// pulses carry data. Returns `NotFound` when the sensor never
    /// answered, `IncompleteFrame` when too few pulses came back and
    /// `Checksum` when the frame does not validate.
    ///
    pub fn decode_pulses(high_pulses: &[u32]) -> Result<[u8; 5], Dht22Error> {
        if high_pulses.is_empty() {
            return Err(Dht22Error::NotFound);
        }
        if high_pulses.len() < FRAME_BITS {
            return Err(Dht22Error::IncompleteFrame {
                pulses: high_pulses.len(),
            });
        }

        let bits = &high_pulses[high_pulses.len() - FRAME_BITS..];
        let mut frame = [0u8; 5];
        for (i, width) in bits.iter().enumerate() {
            if *width > ONE_THRESHOLD_US {
                frame[i / 8] |= 0x80 >> (i % 8);
            }
        }

        let expected = Dht22::checksum(&frame[..4]);
        if expected != frame[4] {
            return Err(Dht22Error::Checksum {
                expected,
                actual: frame[4],
            });
        }
        Ok(frame)
    }

    /// Converts a validated frame to Celsius and relative humidity.
    /// Both values come in tenths, the temperature sign is bit 15.
    ///
    pub fn parse_frame(frame: [u8; 5]) -> Climate {
        let humidity = u16::from_be_bytes([frame[0], frame[1]]);
        let magnitude = u16::from_be_bytes([frame[2] & 0x7f, frame[3]]);
        let mut temperature_c = f32::from(magnitude) / 10.0;
        if frame[2] & 0x80 != 0 {
            temperature_c = -temperature_c;
        }
        Climate {
            temperature_c,
            humidity_pct: f32::from(humidity) / 10.0,
        }
    }

    /// Sends the start signal and hands the line back to the sensor
    fn trigger(pin: &mut IoPin) {
        pin.set_mode(Mode::Output);
        pin.set_low();
        thread::sleep(START_SIGNAL);
        pin.set_high();
        pin.set_mode(Mode::Input);
    }

    /// Busy polls the line and records how long each high level lasted
    fn capture(pin: &IoPin) -> Vec<u32> {
        let start = Instant::now();
        let mut level = pin.read();
        let mut edge = start;
        let mut high_pulses = Vec::with_capacity(FRAME_BITS + 3);

        loop {
            let now = Instant::now();
            if now.duration_since(start) > CAPTURE_WINDOW {
                break;
            }
            let current = pin.read();
            if current == level {
                if !high_pulses.is_empty() && now.duration_since(edge) > IDLE_TIMEOUT {
                    break;
                }
                continue;
            }
            if level == Level::High {
                let width = now.duration_since(edge).as_micros();
                high_pulses.push(u32::try_from(width).unwrap_or(u32::MAX));
            }
            level = current;
            edge = now;
        }
        high_pulses
    }
}

impl ClimateSensor for Dht22 {
    /// Reads the sensor, at most once per `MIN_INTERVAL`.
    ///
    /// Inside that window the previous sample is returned again,
    /// or `None` when no read ever succeeded.
    ///
    fn sample(&mut self) -> Result<Option<Climate>, Dht22Error> {
        let pin = self.pin.as_mut().ok_or(Dht22Error::Released)?;

        let now = Instant::now();
        if let Some(cached) = self.gate.cached(now) {
            return Ok(cached);
        }
        self.gate.attempt(now);

        Dht22::trigger(pin);
        let high_pulses = Dht22::capture(pin);
        debug!("dht22 captured {} high pulses", high_pulses.len());

        let frame = Dht22::decode_pulses(&high_pulses)?;
        debug!("dht22 frame {:02x?}", frame);
        let climate = Dht22::parse_frame(frame);
        self.gate.record(climate);
        Ok(Some(climate))
    }

    fn release(&mut self) {
        if let Some(mut pin) = self.pin.take() {
            pin.set_mode(Mode::Input);
            debug!("dht22 data pin released");
        }
    }
}
