pub mod plan;
pub mod rank;
pub mod search;

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::WorkWeek;
use crate::error::OptimizeError;
use crate::holidays::{HolidayDetail, PUBLIC_TYPE};

pub use plan::{optimize, optimize_vacation};
pub use rank::rank_options;
pub use search::{find_vacation_clusters, ClusterSearch};

/// One way to spend PTO and the contiguous break it produces.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VacationOption {
    pub pto_dates: Vec<NaiveDate>,
    pub pto_days_used: usize,
    pub total_days_off: i64,
    pub efficiency_ratio: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub holidays_included: Vec<HolidayDetail>,
}

impl VacationOption {
    pub fn holiday_names(&self) -> Vec<&str> {
        self.holidays_included
            .iter()
            .map(|h| h.name.as_str())
            .collect()
    }
}

/// `total / pto` rounded half-to-even at two decimals.
pub fn efficiency_ratio(total_days_off: i64, pto_days_used: usize) -> f64 {
    if pto_days_used == 0 {
        return 0.0;
    }
    let raw = total_days_off as f64 / pto_days_used as f64;
    (raw * 100.0).round_ties_even() / 100.0
}

/// Tunable limits applied around the search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptimizerPolicy {
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default = "default_max_pto_days")]
    pub max_pto_days: u32,
    #[serde(default = "default_max_pto_span_days")]
    pub max_pto_span_days: u32,
    #[serde(default = "default_max_range_days")]
    pub max_range_days: u32,
    #[serde(default = "default_day_off_types")]
    pub day_off_types: BTreeSet<String>,
}

impl OptimizerPolicy {
    pub fn validate_inputs(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        pto_days: i32,
    ) -> Result<usize, OptimizeError> {
        if end < start {
            return Err(OptimizeError::InvalidRange { start, end });
        }
        let range_days = (end - start).num_days() + 1;
        if range_days > i64::from(self.max_range_days) {
            return Err(OptimizeError::invalid_parameter(format!(
                "date range spans {range_days} days, limit is {}",
                self.max_range_days
            )));
        }
        if pto_days < 1 || pto_days as u32 > self.max_pto_days {
            return Err(OptimizeError::invalid_parameter(format!(
                "pto_days must be between 1 and {}, got {pto_days}",
                self.max_pto_days
            )));
        }
        Ok(pto_days as usize)
    }
}

impl Default for OptimizerPolicy {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            max_pto_days: default_max_pto_days(),
            max_pto_span_days: default_max_pto_span_days(),
            max_range_days: default_max_range_days(),
            day_off_types: default_day_off_types(),
        }
    }
}

fn default_max_results() -> usize {
    50
}

fn default_max_pto_days() -> u32 {
    30
}

fn default_max_pto_span_days() -> u32 {
    14
}

fn default_max_range_days() -> u32 {
    1098
}

fn default_day_off_types() -> BTreeSet<String> {
    BTreeSet::from([PUBLIC_TYPE.to_string()])
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeRequest {
    pub country: String,
    #[serde(default)]
    pub subdivision: Option<String>,
    pub pto_days: i32,
    #[serde(default = "default_work_days")]
    pub work_days: Vec<i64>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub max_results: Option<usize>,
}

impl OptimizeRequest {
    /// Work days arrive as plain integers so out-of-range values surface as
    /// `InvalidParameter` instead of a deserialization failure.
    pub fn work_week(&self) -> Result<WorkWeek, OptimizeError> {
        let days = self
            .work_days
            .iter()
            .map(|&day| {
                u8::try_from(day).ok().filter(|d| *d <= 6).ok_or_else(|| {
                    OptimizeError::invalid_parameter(format!(
                        "work day {day} is outside 0 (Monday) ..= 6 (Sunday)"
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        WorkWeek::from_days(&days)
    }

    /// Caller's cap, bounded by the policy cap.
    pub fn result_limit(&self, policy: &OptimizerPolicy) -> Result<usize, OptimizeError> {
        match self.max_results {
            None => Ok(policy.max_results),
            Some(n) if n >= 1 && n <= policy.max_results => Ok(n),
            Some(n) => Err(OptimizeError::invalid_parameter(format!(
                "max_results must be between 1 and {}, got {n}",
                policy.max_results
            ))),
        }
    }

    pub fn subdivision(&self) -> Option<&str> {
        self.subdivision
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

fn default_work_days() -> Vec<i64> {
    WorkWeek::default().days().into_iter().map(i64::from).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeResponse {
    pub options: Vec<VacationOption>,
    pub country: String,
    pub search_range: (NaiveDate, NaiveDate),
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{efficiency_ratio, OptimizeRequest, OptimizerPolicy};
    use crate::calendar::WorkWeek;
    use crate::error::OptimizeError;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn efficiency_rounds_to_two_decimals() {
        assert_eq!(efficiency_ratio(4, 1), 4.0);
        assert_eq!(efficiency_ratio(10, 3), 3.33);
        assert_eq!(efficiency_ratio(9, 4), 2.25);
        assert_eq!(efficiency_ratio(5, 8), 0.62);
        assert_eq!(efficiency_ratio(5, 0), 0.0);
    }

    #[test]
    fn policy_rejects_bad_inputs_before_search() {
        let policy = OptimizerPolicy::default();
        assert!(matches!(
            policy.validate_inputs(day(2026, 2, 1), day(2026, 1, 1), 5),
            Err(OptimizeError::InvalidRange { .. })
        ));
        assert!(matches!(
            policy.validate_inputs(day(2026, 1, 1), day(2026, 2, 1), 0),
            Err(OptimizeError::InvalidParameter(_))
        ));
        assert!(matches!(
            policy.validate_inputs(day(2026, 1, 1), day(2026, 2, 1), -3),
            Err(OptimizeError::InvalidParameter(_))
        ));
        assert!(matches!(
            policy.validate_inputs(day(2026, 1, 1), day(2026, 2, 1), 31),
            Err(OptimizeError::InvalidParameter(_))
        ));
        assert!(matches!(
            policy.validate_inputs(day(2020, 1, 1), day(2026, 1, 1), 5),
            Err(OptimizeError::InvalidParameter(_))
        ));
        assert_eq!(
            policy.validate_inputs(day(2026, 1, 1), day(2026, 12, 31), 30),
            Ok(30)
        );
    }

    #[test]
    fn request_defaults_work_week_and_result_limit() {
        let request: OptimizeRequest = serde_json::from_str(
            r#"{"country":"US","pto_days":5,"start_date":"2026-01-01","end_date":"2026-12-31"}"#,
        )
        .expect("deserialize request");
        let policy = OptimizerPolicy::default();
        assert_eq!(request.work_week(), Ok(WorkWeek::default()));
        assert_eq!(request.result_limit(&policy), Ok(50));
        assert_eq!(request.subdivision(), None);
    }

    #[test]
    fn request_limit_must_fit_policy_cap() {
        let mut request: OptimizeRequest = serde_json::from_str(
            r#"{"country":"US","pto_days":5,"start_date":"2026-01-01","end_date":"2026-12-31","max_results":10,"subdivision":" "}"#,
        )
        .expect("deserialize request");
        let policy = OptimizerPolicy::default();
        assert_eq!(request.result_limit(&policy), Ok(10));
        assert_eq!(request.subdivision(), None);
        request.max_results = Some(51);
        assert!(request.result_limit(&policy).is_err());
        request.max_results = Some(0);
        assert!(request.result_limit(&policy).is_err());
    }

    #[test]
    fn out_of_range_work_days_are_invalid_parameters() {
        for raw in ["[-1]", "[300]", "[0, 7]", "[]"] {
            let request: OptimizeRequest = serde_json::from_str(&format!(
                r#"{{"country":"US","pto_days":5,"work_days":{raw},"start_date":"2026-01-01","end_date":"2026-01-31"}}"#
            ))
            .expect("deserialize request");
            assert!(
                matches!(request.work_week(), Err(OptimizeError::InvalidParameter(_))),
                "{raw} should be rejected"
            );
        }

        let mut request: OptimizeRequest = serde_json::from_str(
            r#"{"country":"US","pto_days":5,"work_days":[6, 0, 0],"start_date":"2026-01-01","end_date":"2026-01-31"}"#,
        )
        .expect("deserialize request");
        assert_eq!(
            request.work_week().map(|w| w.days()),
            Ok(vec![0, 6])
        );
        request.work_days = vec![i64::MAX];
        assert!(request.work_week().is_err());
    }
}
