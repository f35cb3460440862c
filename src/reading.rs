// Copyright 2024, F. Stan
//
// Licensed under the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>,
// This file may not be copied, modified, or distributed
// except according to those terms.

use chrono::{NaiveDateTime, TimeDelta};

/// Format of the timestamp column and of the console prefix
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Header of the CSV log, without line terminator
pub const CSV_HEADER: &str = "temp_c,humidity,gas_detected,timestamp";

/// One temperature/humidity sample from the DHT22
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Climate {
    pub temperature_c: f32,
    pub humidity_pct: f32,
}

///
/// A fully built sample. Temperature and humidity are either
/// both present or both absent, absent meaning the driver had
/// no data yet.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub temperature_c: Option<f32>,
    pub humidity_pct: Option<f32>,
    pub gas_detected: bool,
    pub timestamp: NaiveDateTime,
}

impl Reading {
    /// Build a reading from the climate sample and the raw MQ-7 level.
    ///
    /// The MQ-7 module output is active low, the alarm is raised
    /// when the pin reads low.
    pub fn new(climate: Option<Climate>, gas_pin_high: bool, timestamp: NaiveDateTime) -> Self {
        Reading {
            temperature_c: climate.map(|c| c.temperature_c),
            humidity_pct: climate.map(|c| c.humidity_pct),
            gas_detected: gas_detected(gas_pin_high),
            timestamp,
        }
    }

    /// Both climate values, if the driver delivered them
    pub fn climate(&self) -> Option<Climate> {
        match (self.temperature_c, self.humidity_pct) {
            (Some(temperature_c), Some(humidity_pct)) => Some(Climate {
                temperature_c,
                humidity_pct,
            }),
            _ => None,
        }
    }

    /// Console line describing temperature and humidity
    pub fn status_line(&self) -> String {
        match self.climate() {
            Some(c) => format!(
                "[{}] Temp: {:.1}°C  Humidity: {:.1}%",
                format_timestamp(&self.timestamp),
                c.temperature_c,
                c.humidity_pct
            ),
            None => "Sensor read failed, retrying...".to_string(),
        }
    }

    /// Console line describing the gas alarm
    pub fn gas_line(&self) -> &'static str {
        if self.gas_detected {
            "Gas/CO Detected!"
        } else {
            "Normal"
        }
    }

    /// CSV row, newline terminated. Missing values become empty cells.
    pub fn csv_row(&self) -> String {
        format!(
            "{},{},{},{}\n",
            optional_cell(self.temperature_c),
            optional_cell(self.humidity_pct),
            if self.gas_detected { "True" } else { "False" },
            format_timestamp(&self.timestamp)
        )
    }
}

/// Active low conversion of the raw MQ-7 level
pub const fn gas_detected(gas_pin_high: bool) -> bool {
    !gas_pin_high
}

/// Shift a local wall clock time into the logging timezone
pub fn shift_timestamp(local: NaiveDateTime, offset_hours: i64) -> NaiveDateTime {
    local + TimeDelta::hours(offset_hours)
}

/// Fixed width `YYYY-MM-DD HH:MM:SS` rendering
pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Debug formatting keeps the decimal point on whole numbers (48.0, not 48)
fn optional_cell(value: Option<f32>) -> String {
    value.map(|v| format!("{v:?}")).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn sample() -> Option<Climate> {
        Some(Climate {
            temperature_c: 25.3,
            humidity_pct: 60.2,
        })
    }

    #[test]
    fn high_pin_means_no_gas() {
        let reading = Reading::new(sample(), true, noon());
        assert!(!reading.gas_detected);
        assert_eq!(reading.gas_line(), "Normal");
        assert_eq!(reading.csv_row(), "25.3,60.2,False,2024-01-01 12:00:00\n");
    }

    #[test]
    fn low_pin_means_gas() {
        let reading = Reading::new(sample(), false, noon());
        assert!(reading.gas_detected);
        assert_eq!(reading.gas_line(), "Gas/CO Detected!");
        assert_eq!(reading.csv_row(), "25.3,60.2,True,2024-01-01 12:00:00\n");
    }

    #[test]
    fn status_line_uses_one_decimal() {
        let reading = Reading::new(
            Some(Climate {
                temperature_c: -4.21,
                humidity_pct: 99.96,
            }),
            true,
            noon(),
        );
        assert_eq!(
            reading.status_line(),
            "[2024-01-01 12:00:00] Temp: -4.2°C  Humidity: 100.0%"
        );
    }

    #[test]
    fn missing_climate_leaves_empty_cells() {
        let reading = Reading::new(None, true, noon());
        assert_eq!(reading.temperature_c, None);
        assert_eq!(reading.humidity_pct, None);
        assert_eq!(reading.status_line(), "Sensor read failed, retrying...");
        assert_eq!(reading.csv_row(), ",,False,2024-01-01 12:00:00\n");
    }

    #[test]
    fn shift_crosses_midnight() {
        let late = NaiveDate::from_ymd_opt(2023, 12, 31)
            .unwrap()
            .and_hms_opt(20, 30, 5)
            .unwrap();
        assert_eq!(
            format_timestamp(&shift_timestamp(late, 7)),
            "2024-01-01 03:30:05"
        );
    }

    #[test]
    fn header_has_four_columns() {
        assert_eq!(CSV_HEADER.split(',').count(), 4);
    }
}
