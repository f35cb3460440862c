// Copyright 2024, F. Stan
//
// Licensed under the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>,
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Append-only CSV log.
//!
//! The file is opened for every row and closed before the call returns,
//! no descriptor is kept between samples.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::info;

use crate::error::{LoggerError, Result};
use crate::reading::{Reading, CSV_HEADER};

#[derive(Debug, Clone)]
pub struct CsvLog {
    path: PathBuf,
}

impl CsvLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvLog { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the file with its header row if it does not exist yet.
    ///
    /// Returns `true` when this call created the file. An existing file is
    /// left untouched, it is never truncated.
    pub fn ensure_header(&self) -> Result<bool> {
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path);
        let mut file = match file {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Ok(false),
            Err(e) => return Err(LoggerError::io(&self.path, e)),
        };

        file.write_all(format!("{CSV_HEADER}\n").as_bytes())
            .and_then(|()| file.flush())
            .map_err(|e| LoggerError::io(&self.path, e))?;
        info!("created {} with header", self.path.display());
        Ok(true)
    }

    /// Appends one row. The handle is dropped before returning, on error too.
    pub fn append(&self, reading: &Reading) -> Result<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|e| LoggerError::io(&self.path, e))?;
        file.write_all(reading.csv_row().as_bytes())
            .and_then(|()| file.flush())
            .map_err(|e| LoggerError::io(&self.path, e))
    }
}
