pub mod cache;
pub mod nager;
pub mod provider;

use std::collections::BTreeSet;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use cache::HolidayCache;
pub use nager::NagerClient;
pub use provider::HolidayProvider;

/// Tag used by the upstream data for nationwide statutory days off.
pub const PUBLIC_TYPE: &str = "Public";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Country {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Holiday {
    pub date: NaiveDate,
    pub name: String,
    #[serde(default)]
    pub local_name: Option<String>,
    pub country_code: String,
    #[serde(default)]
    pub types: Vec<String>,
    /// Subdivision codes the holiday applies to; `None` means nationwide.
    #[serde(default)]
    pub counties: Option<Vec<String>>,
}

impl Holiday {
    pub fn new(date: NaiveDate, name: impl Into<String>, country_code: impl Into<String>) -> Self {
        Self {
            date,
            name: name.into(),
            local_name: None,
            country_code: country_code.into(),
            types: Vec::new(),
            counties: None,
        }
    }

    pub fn with_types(mut self, types: &[&str]) -> Self {
        self.types = types.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_counties(mut self, counties: &[&str]) -> Self {
        self.counties = Some(counties.iter().map(|c| c.to_string()).collect());
        self
    }

    pub fn has_any_type(&self, wanted: &BTreeSet<String>) -> bool {
        self.types.iter().any(|t| wanted.contains(t))
    }

    pub fn applies_to(&self, subdivision: Option<&str>) -> bool {
        match (subdivision, &self.counties) {
            (Some(sub), Some(counties)) if !counties.is_empty() => {
                counties.iter().any(|c| c.eq_ignore_ascii_case(sub))
            }
            _ => true,
        }
    }

    pub fn detail(&self) -> HolidayDetail {
        HolidayDetail {
            date: self.date,
            name: self.name.clone(),
            types: self.types.clone(),
        }
    }
}

/// The part of a holiday that is reported alongside a vacation option.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HolidayDetail {
    pub date: NaiveDate,
    pub name: String,
    pub types: Vec<String>,
}

#[async_trait]
pub trait HolidaySource: Send + Sync {
    fn name(&self) -> &str;
    async fn countries(&self) -> Result<Vec<Country>>;
    async fn holidays(&self, country_code: &str, year: i32) -> Result<Vec<Holiday>>;
}

/// Keeps only holidays carrying at least one of the given type tags.
pub fn filter_by_types(holidays: &[Holiday], types: &BTreeSet<String>) -> Vec<Holiday> {
    holidays
        .iter()
        .filter(|h| h.has_any_type(types))
        .cloned()
        .collect()
}
