use anyhow::Result;

use crate::holidays::{Country, Holiday};
use crate::optimizer::VacationOption;

pub fn options_to_csv(options: &[VacationOption]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "rank",
        "start_date",
        "end_date",
        "total_days_off",
        "pto_days_used",
        "efficiency_ratio",
        "pto_dates",
        "holidays",
    ])?;
    for (idx, option) in options.iter().enumerate() {
        writer.write_record([
            (idx + 1).to_string(),
            option.start_date.to_string(),
            option.end_date.to_string(),
            option.total_days_off.to_string(),
            option.pto_days_used.to_string(),
            format!("{:.2}", option.efficiency_ratio),
            option
                .pto_dates
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join(" "),
            option.holiday_names().join("; "),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn holidays_to_csv(holidays: &[Holiday]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["date", "name", "local_name", "types", "counties"])?;
    for holiday in holidays {
        writer.write_record([
            holiday.date.to_string(),
            holiday.name.clone(),
            holiday.local_name.clone().unwrap_or_default(),
            holiday.types.join(" "),
            holiday
                .counties
                .as_ref()
                .map(|c| c.join(" "))
                .unwrap_or_default(),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn countries_to_csv(countries: &[Country]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["code", "name"])?;
    for country in countries {
        writer.write_record([country.code.as_str(), country.name.as_str()])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}
