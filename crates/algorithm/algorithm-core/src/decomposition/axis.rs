//! Synthetic calendar axes
//!
//! Callers of the forecast service send bare values with no timestamps, but
//! calendar-based models need dates. A [`TimeAxis`] lays the observations out
//! at a fixed cadence starting from an anchor date.

use algorithm_spi::{Result, TsError};
use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Spacing between consecutive observations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cadence {
    Daily,
    Weekly,
    Monthly,
}

impl Cadence {
    /// The date `steps` periods after `anchor`, or `None` on calendar overflow
    pub fn advance(self, anchor: NaiveDate, steps: u32) -> Option<NaiveDate> {
        match self {
            Cadence::Daily => anchor.checked_add_days(Days::new(u64::from(steps))),
            Cadence::Weekly => anchor.checked_add_days(Days::new(7 * u64::from(steps))),
            Cadence::Monthly => anchor.checked_add_months(Months::new(steps)),
        }
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Cadence::Daily => "daily",
            Cadence::Weekly => "weekly",
            Cadence::Monthly => "monthly",
        };
        f.write_str(name)
    }
}

impl FromStr for Cadence {
    type Err = TsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" | "d" => Ok(Cadence::Daily),
            "weekly" | "w" => Ok(Cadence::Weekly),
            "monthly" | "m" => Ok(Cadence::Monthly),
            other => Err(TsError::invalid_parameter(
                "cadence",
                format!("unknown cadence '{other}', expected daily, weekly or monthly"),
            )),
        }
    }
}

/// Evenly spaced date axis anchored at a fixed date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeAxis {
    anchor: NaiveDate,
    cadence: Cadence,
}

impl Default for TimeAxis {
    /// Monthly steps from 2020-01-01
    fn default() -> Self {
        Self {
            anchor: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or(NaiveDate::MIN),
            cadence: Cadence::Monthly,
        }
    }
}

impl TimeAxis {
    pub fn new(anchor: NaiveDate, cadence: Cadence) -> Self {
        Self { anchor, cadence }
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    /// The first `len` dates of the axis
    ///
    /// Each date is computed from the anchor, so month-end anchors clamp per
    /// month without drifting (Jan 31, Feb 29, Mar 31, ...).
    pub fn dates(&self, len: usize) -> Result<Vec<NaiveDate>> {
        (0..len)
            .map(|i| {
                u32::try_from(i)
                    .ok()
                    .and_then(|steps| self.cadence.advance(self.anchor, steps))
                    .ok_or_else(|| {
                        TsError::InvalidData(format!(
                            "date axis overflows the calendar at step {i}"
                        ))
                    })
            })
            .collect()
    }

    /// History dates followed by `extra` future dates
    pub fn extend(&self, history: usize, extra: usize) -> Result<Vec<NaiveDate>> {
        let total = history.checked_add(extra).ok_or_else(|| {
            TsError::invalid_parameter("extra", "axis length overflows usize")
        })?;
        self.dates(total)
    }
}
