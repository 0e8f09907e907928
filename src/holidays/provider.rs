use std::sync::Arc;

use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::holidays::cache::{CachedValue, HolidayCache};
use crate::holidays::{Country, Holiday, HolidaySource};

const COUNTRIES_KEY: &str = "countries";

/// Holiday lookups backed by a [`HolidaySource`] and a shared TTL cache.
#[derive(Clone)]
pub struct HolidayProvider {
    source: Arc<dyn HolidaySource>,
    cache: Arc<HolidayCache>,
}

impl HolidayProvider {
    pub fn new(source: Arc<dyn HolidaySource>, cache: Arc<HolidayCache>) -> Self {
        Self { source, cache }
    }

    pub async fn countries(&self) -> Result<Vec<Country>> {
        if let Some(CachedValue::Countries(countries)) = self.cache.get(COUNTRIES_KEY) {
            return Ok(countries);
        }
        let countries = self.source.countries().await?;
        self.cache
            .set(COUNTRIES_KEY, CachedValue::Countries(countries.clone()));
        Ok(countries)
    }

    pub async fn holidays(
        &self,
        country_code: &str,
        year: i32,
        subdivision: Option<&str>,
    ) -> Result<Vec<Holiday>> {
        let key = holidays_key(country_code, year, subdivision);
        if let Some(CachedValue::Holidays(holidays)) = self.cache.get(&key) {
            debug!(%key, "holiday cache hit");
            return Ok(holidays);
        }

        let holidays = self
            .source
            .holidays(country_code, year)
            .await?
            .into_iter()
            .filter(|h| h.applies_to(subdivision))
            .collect::<Vec<_>>();
        debug!(
            %key,
            source = self.source.name(),
            count = holidays.len(),
            "holiday cache miss"
        );
        self.cache.set(key, CachedValue::Holidays(holidays.clone()));
        Ok(holidays)
    }

    /// Holidays of every year touched by `[start, end]`, restricted to that range.
    pub async fn holidays_for_range(
        &self,
        country_code: &str,
        start: NaiveDate,
        end: NaiveDate,
        subdivision: Option<&str>,
    ) -> Result<Vec<Holiday>> {
        let mut all = Vec::new();
        for year in start.year()..=end.year() {
            all.extend(self.holidays(country_code, year, subdivision).await?);
        }
        all.retain(|h| start <= h.date && h.date <= end);
        all.sort_by_key(|h| h.date);
        Ok(all)
    }
}

fn holidays_key(country_code: &str, year: i32, subdivision: Option<&str>) -> String {
    format!(
        "holidays:{}:{year}:{}",
        country_code.trim().to_ascii_uppercase(),
        subdivision.unwrap_or_default()
    )
}
