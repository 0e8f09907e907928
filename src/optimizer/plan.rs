use anyhow::Result;
use chrono::NaiveDate;
use tracing::info;

use crate::calendar::{build_calendar, WorkWeek};
use crate::error::OptimizeError;
use crate::holidays::{filter_by_types, Holiday, HolidayProvider};
use crate::optimizer::rank::rank_options;
use crate::optimizer::search::ClusterSearch;
use crate::optimizer::{OptimizeRequest, OptimizeResponse, OptimizerPolicy, VacationOption};

/// Ranked options for spending up to `pto_days` inside `[start, end]`.
///
/// `holidays` may contain every holiday of the range; only those tagged with one of the
/// policy's day-off types mark a day as off.
pub fn optimize(
    start: NaiveDate,
    end: NaiveDate,
    work_week: &WorkWeek,
    pto_days: i32,
    holidays: &[Holiday],
    policy: &OptimizerPolicy,
) -> Result<Vec<VacationOption>, OptimizeError> {
    let pto_days = policy.validate_inputs(start, end, pto_days)?;
    let days_off = filter_by_types(holidays, &policy.day_off_types);
    let calendar = build_calendar(start, end, work_week, &days_off)?;

    let search = ClusterSearch::with_max_span(calendar, policy.max_pto_span_days);
    let candidates = search.find_all(pto_days);
    let found = candidates.len();
    let ranked = rank_options(candidates, policy.max_results);
    info!(
        %start,
        %end,
        pto_days,
        holidays = days_off.len(),
        found,
        returned = ranked.len(),
        "vacation optimization complete"
    );
    Ok(ranked)
}

/// Fetches holidays for the request's country and range, then optimizes.
pub async fn optimize_vacation(
    provider: &HolidayProvider,
    request: &OptimizeRequest,
    policy: &OptimizerPolicy,
) -> Result<OptimizeResponse> {
    let work_week = request.work_week()?;
    let limit = request.result_limit(policy)?;
    policy.validate_inputs(request.start_date, request.end_date, request.pto_days)?;

    let holidays = provider
        .holidays_for_range(
            &request.country,
            request.start_date,
            request.end_date,
            request.subdivision(),
        )
        .await?;

    let mut options = optimize(
        request.start_date,
        request.end_date,
        &work_week,
        request.pto_days,
        &holidays,
        policy,
    )?;
    options.truncate(limit);

    Ok(OptimizeResponse {
        options,
        country: request.country.trim().to_ascii_uppercase(),
        search_range: (request.start_date, request.end_date),
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::optimize;
    use crate::calendar::WorkWeek;
    use crate::error::OptimizeError;
    use crate::holidays::Holiday;
    use crate::optimizer::OptimizerPolicy;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn ignores_holidays_that_are_not_days_off() {
        let holidays = vec![
            Holiday::new(day(2026, 2, 6), "Founders' Observance", "XX").with_types(&["Observance"]),
        ];
        let options = optimize(
            day(2026, 2, 2),
            day(2026, 2, 8),
            &WorkWeek::default(),
            1,
            &holidays,
            &OptimizerPolicy::default(),
        )
        .expect("optimize");
        assert_eq!(options[0].pto_dates, vec![day(2026, 2, 6)]);
        assert!(options[0].holidays_included.is_empty());
    }

    #[test]
    fn ranks_longest_break_first() {
        let holidays =
            vec![Holiday::new(day(2026, 1, 1), "New Year's Day", "US").with_types(&["Public"])];
        let options = optimize(
            day(2025, 12, 29),
            day(2026, 1, 4),
            &WorkWeek::default(),
            1,
            &holidays,
            &OptimizerPolicy::default(),
        )
        .expect("optimize");
        assert_eq!(options[0].pto_dates, vec![day(2026, 1, 2)]);
        assert_eq!(options[0].total_days_off, 4);
        assert_eq!(options[0].efficiency_ratio, 4.0);
    }

    #[test]
    fn applies_policy_cap() {
        let policy = OptimizerPolicy {
            max_results: 5,
            ..OptimizerPolicy::default()
        };
        let options = optimize(
            day(2026, 1, 1),
            day(2026, 3, 31),
            &WorkWeek::default(),
            5,
            &[],
            &policy,
        )
        .expect("optimize");
        assert_eq!(options.len(), 5);
    }

    #[test]
    fn fails_fast_on_inverted_range() {
        let err = optimize(
            day(2026, 1, 10),
            day(2026, 1, 1),
            &WorkWeek::default(),
            1,
            &[],
            &OptimizerPolicy::default(),
        )
        .expect_err("inverted range");
        assert!(matches!(err, OptimizeError::InvalidRange { .. }));
    }

    #[test]
    fn budget_larger_than_available_workdays_is_empty_not_error() {
        let options = optimize(
            day(2026, 2, 6),
            day(2026, 2, 8),
            &WorkWeek::default(),
            1,
            &[],
            &OptimizerPolicy::default(),
        )
        .expect("optimize");
        assert_eq!(options.len(), 1);

        let options = optimize(
            day(2026, 2, 7),
            day(2026, 2, 8),
            &WorkWeek::default(),
            3,
            &[],
            &OptimizerPolicy::default(),
        )
        .expect("optimize");
        assert!(options.is_empty());
    }
}
