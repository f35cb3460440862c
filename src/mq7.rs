// Copyright 2024, F. Stan
//
// Licensed under the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>,
// This file may not be copied, modified, or distributed
// except according to those terms.

use log::debug;
use rppal::gpio::{Gpio, InputPin};

use crate::error::LoggerError;

/// Digital alarm input.
///
/// Returns the raw electrical level, `true` for high. Polarity is
/// resolved by the caller.
pub trait GasAlarm {
    fn read_raw(&mut self) -> Result<bool, LoggerError>;
}

/// MQ-7 Struct, wraps the rppal input pin the
/// module DOUT line is wired to
///
pub struct Mq7 {
    pin: InputPin,
}

impl Mq7 {
    /// Create a new MQ-7 Struct
    ///
    /// Claims the BCM pin exclusively and configures it as input.
    /// If fails, return the rppal GPIO error.
    ///
    pub fn new(bcm_pin: u8) -> Result<Mq7, LoggerError> {
        let pin = Gpio::new()?.get(bcm_pin)?.into_input();
        Ok(Mq7 { pin })
    }
}

impl GasAlarm for Mq7 {
    fn read_raw(&mut self) -> Result<bool, LoggerError> {
        let high = self.pin.is_high();
        debug!("mq7 pin {} level high={}", self.pin.pin(), high);
        Ok(high)
    }
}
