//! iCalendar export of vacation options.

use chrono::{DateTime, Days, NaiveDate, Utc};
use icalendar::{Calendar, Component, Event, EventLike};
use sha2::{Digest, Sha256};

use crate::optimizer::VacationOption;

/// Calendar with one event for the whole break and one per PTO day.
pub fn generate_ics(option: &VacationOption, generated_at: DateTime<Utc>) -> String {
    let mut calendar = Calendar::new();
    calendar.name("Vacation Time - PTO Plan");

    let mut description = vec![
        format!("Total days off: {}", option.total_days_off),
        format!("PTO days used: {}", option.pto_days_used),
        format!("Efficiency: {:.2}x", option.efficiency_ratio),
    ];
    if !option.holidays_included.is_empty() {
        description.push(format!("Holidays: {}", option.holiday_names().join(", ")));
    }
    calendar.push(all_day_event(
        option.start_date,
        option.end_date,
        "Vacation Time Off",
        &description.join("\n"),
        generated_at,
    ));

    for pto_date in &option.pto_dates {
        calendar.push(all_day_event(
            *pto_date,
            *pto_date,
            "PTO Day",
            "Take this day off as PTO",
            generated_at,
        ));
    }

    calendar.to_string()
}

/// Calendar with one event per option, numbered in ranking order.
pub fn generate_multi_ics(options: &[VacationOption], generated_at: DateTime<Utc>) -> String {
    let mut calendar = Calendar::new();
    calendar.name("Vacation Time - All Options");

    for (idx, option) in options.iter().enumerate() {
        let number = idx + 1;
        let pto_dates = option
            .pto_dates
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let mut description = vec![
            format!("Option {number}"),
            format!("Total days off: {}", option.total_days_off),
            format!("PTO days used: {}", option.pto_days_used),
            format!("Efficiency: {:.2}x", option.efficiency_ratio),
            format!("PTO dates: {pto_dates}"),
        ];
        if !option.holidays_included.is_empty() {
            description.push(format!("Holidays: {}", option.holiday_names().join(", ")));
        }
        calendar.push(all_day_event(
            option.start_date,
            option.end_date,
            &format!("Vacation Option {number}: {} days off", option.total_days_off),
            &description.join("\n"),
            generated_at,
        ));
    }

    calendar.to_string()
}

/// `last` is inclusive; DTEND is written as the following day.
fn all_day_event(
    first: NaiveDate,
    last: NaiveDate,
    summary: &str,
    description: &str,
    generated_at: DateTime<Utc>,
) -> Event {
    let exclusive_end = last.checked_add_days(Days::new(1)).unwrap_or(last);
    Event::new()
        .uid(&event_uid(first, last, summary, description))
        .timestamp(generated_at)
        .starts(first)
        .ends(exclusive_end)
        .summary(summary)
        .description(description)
        .add_property("TRANSP", "TRANSPARENT")
        .done()
}

/// Content hash, so re-exporting the same plan yields the same UIDs.
fn event_uid(first: NaiveDate, last: NaiveDate, summary: &str, description: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(first.to_string().as_bytes());
    hasher.update(last.to_string().as_bytes());
    hasher.update(summary.as_bytes());
    hasher.update(description.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    format!("{}@vacation-time", &digest[..32])
}
