// Copyright 2024, F. Stan
//
// Licensed under the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>,
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

///
///DHT22 driver error enum. The single wire protocol is timing
///sensitive on a non realtime kernel, so most failures are
///transient and clear on the next attempt. GPIO access
///failures and use after release are not.
///
#[derive(Debug, Error)]
pub enum Dht22Error {
    /// The sensor did not pull the line low after the start signal
    #[error("DHT sensor not found, check wiring")]
    NotFound,
    /// Fewer high pulses than a 40 bit frame needs were captured
    #[error("A full buffer was not returned. Try again.")]
    IncompleteFrame { pulses: usize },
    /// The fifth frame byte does not match the sum of the first four
    #[error("Checksum did not validate. Try again.")]
    Checksum { expected: u8, actual: u8 },
    /// Error coming from the rppal GPIO layer
    #[error("GPIO failure on DHT22 data pin: {0}")]
    Gpio(#[from] rppal::gpio::Error),
    /// The driver was used after `release`
    #[error("DHT22 driver used after release")]
    Released,
}

impl Dht22Error {
    /// Whether a later read attempt may succeed.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NotFound | Self::IncompleteFrame { .. } | Self::Checksum { .. }
        )
    }
}

/// Shared `Result` alias for the logger.
pub type Result<T> = std::result::Result<T, LoggerError>;

/// Top-level error, every variant terminates the logging loop.
#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("GPIO setup failure: {0}")]
    Gpio(#[from] rppal::gpio::Error),

    #[error("unrecoverable temperature/humidity sensor fault: {0}")]
    Sensor(#[source] Dht22Error),

    /// Raised by `GasAlarm` backends whose reads can fail, rppal input reads cannot
    #[error("gas alarm pin read failure: {details}")]
    GasPin { details: String },

    #[error("console write failure: {0}")]
    Console(#[source] io::Error),

    #[error("IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LoggerError {
    /// IO error tied to the file it happened on.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
