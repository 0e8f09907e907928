use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::calendar::WorkWeek;
use crate::holidays::cache::DEFAULT_TTL_SECS;
use crate::holidays::nager::DEFAULT_BASE_URL;
use crate::optimizer::OptimizerPolicy;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub holidays: HolidaysConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub optimizer: OptimizerPolicy,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolidaysConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub subdivision: Option<String>,
    #[serde(default)]
    pub work_days: WorkWeek,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub country: Option<String>,
    pub subdivision: Option<String>,
    pub work_days: Option<WorkWeek>,
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config/vacation-time/config.toml")
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed reading config: {}", path.display()))?;
        Self::parse(&data).with_context(|| format!("failed parsing TOML config: {}", path.display()))
    }

    pub fn parse(data: &str) -> Result<Self> {
        Ok(toml::from_str(data)?)
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(base_url) = overrides.base_url {
            self.holidays.base_url = base_url;
        }
        if let Some(country) = overrides.country {
            self.schedule.country = Some(country);
        }
        if let Some(subdivision) = overrides.subdivision {
            self.schedule.subdivision = Some(subdivision);
        }
        if let Some(work_days) = overrides.work_days {
            self.schedule.work_days = work_days;
        }
    }

    pub fn write_template(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed creating config directory: {}", parent.display())
            })?;
        }
        fs::write(path, Self::default_template())
            .with_context(|| format!("failed writing config template: {}", path.display()))
    }

    pub fn default_template() -> String {
        let template = r#"[holidays]
base_url = "https://date.nager.at/api/v3"
cache_ttl_secs = 3600

[schedule]
# country = "US"
# subdivision = "US-CA"
# 0 = Monday .. 6 = Sunday
work_days = [0, 1, 2, 3, 4]

[optimizer]
max_results = 50
max_pto_days = 30
max_pto_span_days = 14
max_range_days = 1098
day_off_types = ["Public"]

[server]
host = "127.0.0.1"
port = 3001
"#;
        template.to_string()
    }
}

impl Default for HolidaysConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            country: None,
            subdivision: None,
            work_days: WorkWeek::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_cache_ttl_secs() -> u64 {
    DEFAULT_TTL_SECS as u64
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3001
}
