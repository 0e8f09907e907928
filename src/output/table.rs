use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};

use crate::holidays::{Country, Holiday};
use crate::optimizer::VacationOption;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn render_options_table(options: &[VacationOption]) -> String {
    let mut table = new_table();
    table.set_header(vec![
        "Rank",
        "Break",
        "Days Off",
        "PTO Used",
        "Efficiency",
        "Take Off",
        "Holidays",
    ]);

    for (idx, option) in options.iter().enumerate() {
        let efficiency = format!("{:.2}x", option.efficiency_ratio);
        let efficiency_cell = if option.efficiency_ratio >= 3.0 {
            Cell::new(efficiency).fg(Color::Green)
        } else if option.efficiency_ratio >= 2.0 {
            Cell::new(efficiency).fg(Color::Yellow)
        } else {
            Cell::new(efficiency)
        };
        let pto = option
            .pto_dates
            .iter()
            .map(|d| d.format("%a %b %-d").to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let holidays = option.holiday_names().join(", ");
        table.add_row(Row::from(vec![
            Cell::new((idx + 1).to_string()),
            Cell::new(format!(
                "{} - {}",
                option.start_date.format("%a %Y-%m-%d"),
                option.end_date.format("%a %Y-%m-%d")
            )),
            Cell::new(option.total_days_off.to_string()),
            Cell::new(option.pto_days_used.to_string()),
            efficiency_cell,
            Cell::new(pto),
            Cell::new(if holidays.is_empty() {
                "-".to_string()
            } else {
                holidays
            }),
        ]));
    }
    table.to_string()
}

pub fn render_holidays_table(holidays: &[Holiday]) -> String {
    let mut table = new_table();
    table.set_header(vec!["Date", "Name", "Local Name", "Types", "Regions"]);
    for h in holidays {
        table.add_row(vec![
            h.date.format("%a %Y-%m-%d").to_string(),
            h.name.clone(),
            h.local_name.clone().unwrap_or_else(|| "-".to_string()),
            h.types.join(", "),
            h.counties
                .as_ref()
                .map(|c| c.join(", "))
                .unwrap_or_else(|| "all".to_string()),
        ]);
    }
    table.to_string()
}

pub fn render_countries_table(countries: &[Country]) -> String {
    let mut table = new_table();
    table.set_header(vec!["Code", "Country"]);
    for c in countries {
        table.add_row(vec![c.code.clone(), c.name.clone()]);
    }
    table.to_string()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{render_holidays_table, render_options_table};
    use crate::holidays::Holiday;
    use crate::optimizer::VacationOption;

    #[test]
    fn option_table_lists_pto_dates_and_efficiency() {
        let day = |d| NaiveDate::from_ymd_opt(2026, 2, d).expect("valid date");
        let option = VacationOption {
            pto_dates: vec![day(6)],
            pto_days_used: 1,
            total_days_off: 3,
            efficiency_ratio: 3.0,
            start_date: day(6),
            end_date: day(8),
            holidays_included: Vec::new(),
        };
        let rendered = render_options_table(&[option]);
        assert!(rendered.contains("Fri Feb 6"));
        assert!(rendered.contains("3.00x"));
    }

    #[test]
    fn holiday_table_marks_nationwide_entries() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 3).expect("valid date");
        let rendered = render_holidays_table(&[Holiday::new(date, "German Unity Day", "DE")]);
        assert!(rendered.contains("German Unity Day"));
        assert!(rendered.contains("all"));
    }
}
