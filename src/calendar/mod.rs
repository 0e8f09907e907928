pub mod workweek;

use std::collections::HashMap;

use chrono::{Days, NaiveDate};
use tracing::debug;

use crate::error::OptimizeError;
use crate::holidays::{Holiday, HolidayDetail};

pub use workweek::WorkWeek;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayType {
    Workday,
    Weekend,
    Holiday(HolidayDetail),
}

impl DayType {
    pub fn is_workday(&self) -> bool {
        matches!(self, Self::Workday)
    }

    /// Weekends and holidays both extend a cluster without costing PTO.
    pub fn is_off(&self) -> bool {
        !self.is_workday()
    }

    pub fn holiday(&self) -> Option<&HolidayDetail> {
        match self {
            Self::Holiday(detail) => Some(detail),
            _ => None,
        }
    }
}

/// Classification of every date in a contiguous inclusive range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Calendar {
    days: Vec<(NaiveDate, DayType)>,
}

impl Calendar {
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn start(&self) -> Option<NaiveDate> {
        self.days.first().map(|(date, _)| *date)
    }

    pub fn date_at(&self, index: usize) -> NaiveDate {
        self.days[index].0
    }

    pub fn day_type_at(&self, index: usize) -> &DayType {
        &self.days[index].1
    }

    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        let start = self.start()?;
        let offset = usize::try_from((date - start).num_days()).ok()?;
        (offset < self.days.len()).then_some(offset)
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DayType> {
        self.index_of(date).map(|idx| self.day_type_at(idx))
    }

    pub fn count_workdays(&self) -> usize {
        self.days.iter().filter(|(_, t)| t.is_workday()).count()
    }

    /// Holiday details for dates within `[first, last]`, in date order.
    pub fn holidays_between(&self, first: usize, last: usize) -> Vec<HolidayDetail> {
        self.days[first..=last]
            .iter()
            .filter_map(|(_, kind)| kind.holiday().cloned())
            .collect()
    }
}

/// Classifies each date of `[start, end]`: holiday, then non-working weekday, else workday.
///
/// `holidays` should already be restricted to the kinds that give a day off. If two entries
/// share a date, the first one is kept.
pub fn build_calendar(
    start: NaiveDate,
    end: NaiveDate,
    work_week: &WorkWeek,
    holidays: &[Holiday],
) -> Result<Calendar, OptimizeError> {
    if end < start {
        return Err(OptimizeError::InvalidRange { start, end });
    }

    let mut by_date: HashMap<NaiveDate, &Holiday> = HashMap::with_capacity(holidays.len());
    for holiday in holidays {
        by_date.entry(holiday.date).or_insert(holiday);
    }

    let mut days = Vec::with_capacity((end - start).num_days() as usize + 1);
    let mut current = start;
    while current <= end {
        let kind = if let Some(holiday) = by_date.get(&current) {
            DayType::Holiday(holiday.detail())
        } else if !work_week.works_on(current) {
            DayType::Weekend
        } else {
            DayType::Workday
        };
        days.push((current, kind));
        match current.checked_add_days(Days::new(1)) {
            Some(next) => current = next,
            None => break,
        }
    }

    let calendar = Calendar { days };
    debug!(
        %start,
        %end,
        days = calendar.len(),
        workdays = calendar.count_workdays(),
        "built calendar"
    );
    Ok(calendar)
}
