use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::debug;

use crate::calendar::Calendar;
use crate::optimizer::{efficiency_ratio, VacationOption};

pub const DEFAULT_MAX_PTO_SPAN_DAYS: u32 = 14;

/// Enumerates PTO allocations over a calendar and expands each into its full break.
#[derive(Debug, Clone)]
pub struct ClusterSearch {
    calendar: Calendar,
    workdays: Vec<usize>,
    max_pto_span_days: i64,
}

impl ClusterSearch {
    pub fn new(calendar: Calendar) -> Self {
        Self::with_max_span(calendar, DEFAULT_MAX_PTO_SPAN_DAYS)
    }

    /// `max_pto_span_days` bounds the calendar distance between the first and last PTO day.
    pub fn with_max_span(calendar: Calendar, max_pto_span_days: u32) -> Self {
        let workdays = (0..calendar.len())
            .filter(|&idx| calendar.day_type_at(idx).is_workday())
            .collect();
        Self {
            calendar,
            workdays,
            max_pto_span_days: i64::from(max_pto_span_days),
        }
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    /// Every distinct option spending between 1 and `pto_days` PTO days.
    ///
    /// Options are keyed by their PTO date set; the first one found for a set is kept.
    pub fn find_all(&self, pto_days: usize) -> Vec<VacationOption> {
        let mut options = Vec::new();
        let mut seen: HashSet<Vec<NaiveDate>> = HashSet::new();

        for start_idx in 0..self.calendar.len() {
            // Only the workdays at or after the start matter; a non-working start
            // repeats the search of the next workday and is fully deduplicated.
            if !self.calendar.day_type_at(start_idx).is_workday() {
                continue;
            }
            for pto_to_use in 1..=pto_days {
                let Some(option) = self.best_from(start_idx, pto_to_use) else {
                    continue;
                };
                if seen.insert(option.pto_dates.clone()) {
                    options.push(option);
                }
            }
        }

        debug!(
            days = self.calendar.len(),
            workdays = self.workdays.len(),
            pto_days,
            options = options.len(),
            "cluster search finished"
        );
        options
    }

    /// Best option using exactly `pto_to_use` workdays at or after `start_idx`.
    pub fn best_from(&self, start_idx: usize, pto_to_use: usize) -> Option<VacationOption> {
        if pto_to_use == 0 {
            return None;
        }
        let first_candidate = self.workdays.partition_point(|&idx| idx < start_idx);
        let candidates = &self.workdays[first_candidate..];
        if candidates.len() < pto_to_use {
            return None;
        }

        // (efficiency, window offset, cluster start, cluster end); ties keep the earliest window.
        let mut best: Option<(f64, usize, usize, usize)> = None;
        for (offset, window) in candidates.windows(pto_to_use).enumerate() {
            let first_pto = window[0];
            let last_pto = window[pto_to_use - 1];
            let span = (self.calendar.date_at(last_pto) - self.calendar.date_at(first_pto))
                .num_days();
            if span > self.max_pto_span_days {
                continue;
            }

            let (cluster_start, cluster_end) = self.expand(first_pto, last_pto);
            let total = (cluster_end - cluster_start + 1) as f64;
            let efficiency = total / pto_to_use as f64;
            if best.map_or(true, |(top, ..)| efficiency > top) {
                best = Some((efficiency, offset, cluster_start, cluster_end));
            }
        }

        let (_, offset, cluster_start, cluster_end) = best?;
        let pto_indices = &candidates[offset..offset + pto_to_use];
        Some(self.package(pto_indices, cluster_start, cluster_end))
    }

    /// Extends `[first_pto, last_pto]` over the adjacent weekends and holidays.
    pub fn expand(&self, first_pto: usize, last_pto: usize) -> (usize, usize) {
        let mut start = first_pto;
        while start > 0 && self.calendar.day_type_at(start - 1).is_off() {
            start -= 1;
        }
        let mut end = last_pto;
        while end + 1 < self.calendar.len() && self.calendar.day_type_at(end + 1).is_off() {
            end += 1;
        }
        (start, end)
    }

    fn package(
        &self,
        pto_indices: &[usize],
        cluster_start: usize,
        cluster_end: usize,
    ) -> VacationOption {
        let pto_dates = pto_indices
            .iter()
            .map(|&idx| self.calendar.date_at(idx))
            .collect::<Vec<_>>();
        let start_date = self.calendar.date_at(cluster_start);
        let end_date = self.calendar.date_at(cluster_end);
        let total_days_off = (end_date - start_date).num_days() + 1;
        VacationOption {
            pto_days_used: pto_dates.len(),
            pto_dates,
            total_days_off,
            efficiency_ratio: efficiency_ratio(total_days_off, pto_indices.len()),
            start_date,
            end_date,
            holidays_included: self.calendar.holidays_between(cluster_start, cluster_end),
        }
    }
}

/// Convenience wrapper running a [`ClusterSearch`] with the default span bound.
pub fn find_vacation_clusters(calendar: Calendar, pto_days: usize) -> Vec<VacationOption> {
    ClusterSearch::new(calendar).find_all(pto_days)
}
