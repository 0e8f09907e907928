use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

use crate::holidays::{Country, Holiday};

pub const DEFAULT_TTL_SECS: i64 = 3600;

// chrono durations are bounded by i64::MAX milliseconds.
const MAX_TTL_SECS: i64 = i64::MAX / 1_000;

#[derive(Debug, Clone, PartialEq)]
pub enum CachedValue {
    Countries(Vec<Country>),
    Holidays(Vec<Holiday>),
}

#[derive(Debug, Clone)]
struct CacheEntry {
    captured_at: DateTime<Utc>,
    value: CachedValue,
}

/// Keyed in-memory cache whose entries expire `ttl` after they were stored.
#[derive(Debug)]
pub struct HolidayCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl HolidayCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// TTLs beyond what chrono can represent are clamped to its maximum.
    pub fn with_ttl_secs(secs: u64) -> Self {
        let secs = i64::try_from(secs)
            .unwrap_or(i64::MAX)
            .min(MAX_TTL_SECS);
        Self::new(Duration::seconds(secs))
    }

    pub fn get(&self, key: &str) -> Option<CachedValue> {
        self.get_at(key, Utc::now())
    }

    pub fn set(&self, key: impl Into<String>, value: CachedValue) {
        self.set_at(key, value, Utc::now());
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .expect("holiday cache mutex poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get_at(&self, key: &str, now: DateTime<Utc>) -> Option<CachedValue> {
        let mut guard = self.entries.lock().expect("holiday cache mutex poisoned");
        let entry = guard.get(key)?;
        if now - entry.captured_at < self.ttl {
            return Some(entry.value.clone());
        }
        guard.remove(key);
        None
    }

    fn set_at(&self, key: impl Into<String>, value: CachedValue, now: DateTime<Utc>) {
        let entry = CacheEntry {
            captured_at: now,
            value,
        };
        let mut guard = self.entries.lock().expect("holiday cache mutex poisoned");
        guard.insert(key.into(), entry);
    }
}

impl Default for HolidayCache {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_TTL_SECS))
    }
}
