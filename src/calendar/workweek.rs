use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::OptimizeError;

const DAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Set of weekdays worked, numbered 0 = Monday through 6 = Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct WorkWeek {
    mask: [bool; 7],
}

impl WorkWeek {
    pub const MONDAY_TO_FRIDAY: WorkWeek = WorkWeek {
        mask: [true, true, true, true, true, false, false],
    };

    pub fn from_days(days: &[u8]) -> Result<Self, OptimizeError> {
        let mut mask = [false; 7];
        for &day in days {
            let slot = mask.get_mut(usize::from(day)).ok_or_else(|| {
                OptimizeError::invalid_parameter(format!(
                    "work day {day} is outside 0 (Monday) ..= 6 (Sunday)"
                ))
            })?;
            *slot = true;
        }
        if !mask.iter().any(|worked| *worked) {
            return Err(OptimizeError::invalid_parameter(
                "work week must contain at least one day",
            ));
        }
        Ok(Self { mask })
    }

    pub fn is_work_day(&self, weekday: Weekday) -> bool {
        self.mask[weekday.num_days_from_monday() as usize]
    }

    pub fn works_on(&self, date: NaiveDate) -> bool {
        self.is_work_day(date.weekday())
    }

    pub fn days(&self) -> Vec<u8> {
        (0u8..7).filter(|d| self.mask[usize::from(*d)]).collect()
    }
}

impl Default for WorkWeek {
    fn default() -> Self {
        Self::MONDAY_TO_FRIDAY
    }
}

impl TryFrom<Vec<u8>> for WorkWeek {
    type Error = OptimizeError;

    fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
        Self::from_days(&value)
    }
}

impl From<WorkWeek> for Vec<u8> {
    fn from(value: WorkWeek) -> Self {
        value.days()
    }
}

impl Display for WorkWeek {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let names = self
            .days()
            .into_iter()
            .map(|d| DAY_NAMES[usize::from(d)])
            .collect::<Vec<_>>();
        write!(f, "{}", names.join(","))
    }
}

/// Parses a comma separated list of weekday numbers, e.g. `0,1,2,3,4`.
impl FromStr for WorkWeek {
    type Err = OptimizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut days = Vec::new();
        for piece in s.split(',') {
            let trimmed = piece.trim();
            if trimmed.is_empty() {
                continue;
            }
            let day = trimmed.parse::<u8>().map_err(|_| {
                OptimizeError::invalid_parameter(format!("invalid work day number: {trimmed}"))
            })?;
            days.push(day);
        }
        Self::from_days(&days)
    }
}
