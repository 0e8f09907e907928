use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::holidays::{Country, Holiday, HolidaySource};

pub const DEFAULT_BASE_URL: &str = "https://date.nager.at/api/v3";

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 12;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 6;

static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent(concat!("vacation-time/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS))
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .build()
        .expect("failed to build HTTP client")
});

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NagerCountry {
    country_code: String,
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NagerHoliday {
    date: NaiveDate,
    name: String,
    #[serde(default)]
    local_name: Option<String>,
    country_code: String,
    #[serde(default)]
    counties: Option<Vec<String>>,
    #[serde(default)]
    types: Vec<String>,
}

impl From<NagerHoliday> for Holiday {
    fn from(value: NagerHoliday) -> Self {
        Self {
            date: value.date,
            name: value.name,
            local_name: value.local_name,
            country_code: value.country_code,
            types: value.types,
            counties: value.counties,
        }
    }
}

/// Client for the public Nager.Date holiday API.
#[derive(Debug, Clone)]
pub struct NagerClient {
    base_url: String,
}

impl NagerClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn countries_url(&self) -> String {
        format!("{}/AvailableCountries", self.base_url)
    }

    fn holidays_url(&self, country_code: &str, year: i32) -> String {
        format!(
            "{}/PublicHolidays/{year}/{}",
            self.base_url,
            country_code.trim().to_ascii_uppercase()
        )
    }
}

impl Default for NagerClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait]
impl HolidaySource for NagerClient {
    fn name(&self) -> &str {
        "nager.date"
    }

    async fn countries(&self) -> Result<Vec<Country>> {
        let body = fetch_text(&self.countries_url()).await?;
        parse_countries(&body)
    }

    async fn holidays(&self, country_code: &str, year: i32) -> Result<Vec<Holiday>> {
        let body = fetch_text(&self.holidays_url(country_code, year)).await?;
        let holidays = parse_holidays(&body)?;
        debug!(country_code, year, count = holidays.len(), "fetched holidays");
        Ok(holidays)
    }
}

pub async fn fetch_text(url: &str) -> Result<String> {
    let response = HTTP_CLIENT
        .get(url)
        .send()
        .await
        .with_context(|| format!("failed GET request: {url}"))?;
    let status = response.status();
    let body = response
        .text()
        .await
        .with_context(|| format!("failed reading response body: {url}"))?;
    if !status.is_success() {
        let preview: String = body.chars().take(180).collect();
        return Err(anyhow!("GET {url} returned {status}: {preview}"));
    }
    Ok(body)
}

pub fn parse_countries(body: &str) -> Result<Vec<Country>> {
    let raw: Vec<NagerCountry> =
        serde_json::from_str(body).context("invalid country list response")?;
    Ok(raw
        .into_iter()
        .map(|c| Country {
            code: c.country_code,
            name: c.name,
        })
        .collect())
}

pub fn parse_holidays(body: &str) -> Result<Vec<Holiday>> {
    let raw: Vec<NagerHoliday> =
        serde_json::from_str(body).context("invalid public holiday response")?;
    Ok(raw.into_iter().map(Holiday::from).collect())
}
