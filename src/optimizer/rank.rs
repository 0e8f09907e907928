use std::cmp::Ordering;

use crate::optimizer::VacationOption;

/// Longest break first, then best efficiency, then earliest start.
///
/// Options tied on all three fall back to their PTO dates so the order is total.
pub fn compare_options(a: &VacationOption, b: &VacationOption) -> Ordering {
    b.total_days_off
        .cmp(&a.total_days_off)
        .then_with(|| b.efficiency_ratio.total_cmp(&a.efficiency_ratio))
        .then_with(|| a.start_date.cmp(&b.start_date))
        .then_with(|| a.pto_dates.cmp(&b.pto_dates))
}

pub fn rank_options(mut options: Vec<VacationOption>, max_items: usize) -> Vec<VacationOption> {
    options.sort_by(compare_options);
    options.truncate(max_items);
    options
}
