use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::{cmp, fs};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};

const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// Free tier of the paid provider: 500k characters per month.
pub const MONTHLY_CHAR_LIMIT: u64 = 500_000;
/// Monthly allowance spread evenly over a 30-day month.
pub const DEFAULT_DAILY_CHAR_LIMIT: u64 = 16_666;

/// Character counters for the paid provider, persisted through a [`QuotaStore`]
/// with the browser-side wire names (`monthlyChars`, `resetDay`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuotaUsage {
    pub monthly_chars: u64,
    pub daily_chars: u64,
    pub reset_month: u32,
    pub reset_day: u32,
}

impl QuotaUsage {
    /// Zeroes counters whose wall-clock window rolled over since the stored
    /// markers, then stamps the markers with the given month/day.
    pub fn roll_over(&mut self, month: u32, day: u32) {
        if self.reset_month != month {
            self.monthly_chars = 0;
            self.daily_chars = 0;
        } else if self.reset_day != day {
            self.daily_chars = 0;
        }
        self.reset_month = month;
        self.reset_day = day;
    }

    pub fn add(&mut self, chars: u64) {
        self.monthly_chars = self.monthly_chars.saturating_add(chars);
        self.daily_chars = self.daily_chars.saturating_add(chars);
    }

    pub fn monthly_used_pct(&self) -> f64 {
        percentage(self.monthly_chars, MONTHLY_CHAR_LIMIT)
    }

    pub fn daily_used_pct(&self, daily_limit: u64) -> f64 {
        percentage(self.daily_chars, daily_limit)
    }
}

fn percentage(used: u64, limit: u64) -> f64 {
    if limit == 0 {
        return 0.0;
    }
    used as f64 / limit as f64 * 100.0
}

/// External persistence for [`QuotaUsage`]. The pipeline only ever does
/// load-modify-save sequences through this trait.
#[async_trait]
pub trait QuotaStore: Send + Sync {
    async fn load(&self) -> Result<QuotaUsage>;
    async fn save(&self, usage: &QuotaUsage) -> Result<()>;
}

/// In-memory store for tests and embeddings that do not persist usage.
#[derive(Debug, Default)]
pub struct MemoryQuotaStore {
    data: Mutex<QuotaUsage>,
}

impl MemoryQuotaStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuotaStore for MemoryQuotaStore {
    async fn load(&self) -> Result<QuotaUsage> {
        Ok(self.data.lock().unwrap().clone())
    }

    async fn save(&self, usage: &QuotaUsage) -> Result<()> {
        *self.data.lock().unwrap() = usage.clone();
        Ok(())
    }
}

/// JSON-file store mirroring the settings persistence.
pub struct JsonQuotaStore {
    path: PathBuf,
}

impl JsonQuotaStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl QuotaStore for JsonQuotaStore {
    async fn load(&self) -> Result<QuotaUsage> {
        if !self.path.exists() {
            return Ok(QuotaUsage::default());
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read quota usage from {}", self.path.display()))?;
        Ok(serde_json::from_str(&contents).unwrap_or_default())
    }

    async fn save(&self, usage: &QuotaUsage) -> Result<()> {
        let serialized = serde_json::to_string_pretty(usage)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write quota usage to {}", self.path.display()))
    }
}

/// Tracks paid-provider character usage against the monthly/daily windows.
pub struct QuotaTracker {
    store: Arc<dyn QuotaStore>,
    daily_limit: u64,
}

impl QuotaTracker {
    pub fn new(store: Arc<dyn QuotaStore>) -> Self {
        Self::with_daily_limit(store, DEFAULT_DAILY_CHAR_LIMIT)
    }

    pub fn with_daily_limit(store: Arc<dyn QuotaStore>, daily_limit: u64) -> Self {
        Self { store, daily_limit }
    }

    pub fn daily_limit(&self) -> u64 {
        self.daily_limit
    }

    /// Load-rollover-add-save. Returns the updated counters.
    pub async fn add_usage(&self, chars: u64) -> Result<QuotaUsage> {
        let mut usage = self.store.load().await?;
        let today = Local::now();
        usage.roll_over(today.month(), today.day());
        usage.add(chars);
        self.store.save(&usage).await?;

        log_info!(
            "Google usage - today: {} | month: {} / {}",
            usage.daily_chars,
            usage.monthly_chars,
            MONTHLY_CHAR_LIMIT
        );
        Ok(usage)
    }

    /// Current counters with the rollover applied. Persists the rollover so a
    /// stale daily window does not linger until the next paid call.
    pub async fn snapshot(&self) -> Result<QuotaUsage> {
        let mut usage = self.store.load().await?;
        let before = usage.clone();
        let today = Local::now();
        usage.roll_over(today.month(), today.day());
        if usage != before {
            self.store.save(&usage).await?;
        }
        Ok(usage)
    }

    /// Zero both counters, stamping the markers with today.
    pub async fn reset(&self) -> Result<()> {
        let today = Local::now();
        let usage = QuotaUsage {
            monthly_chars: 0,
            daily_chars: 0,
            reset_month: today.month(),
            reset_day: today.day(),
        };
        self.store.save(&usage).await
    }

    /// Fire-and-forget usage report, used from the paid adapter so accounting
    /// never delays the translation result.
    pub fn record_usage(self: &Arc<Self>, chars: u64) {
        let tracker = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(err) = tracker.add_usage(chars).await {
                log_warn!("failed to record quota usage: {err:#}");
            }
        });
    }

    /// Headroom left today, for embeddings that want to warn before a call.
    pub async fn daily_remaining(&self) -> Result<u64> {
        let usage = self.snapshot().await?;
        Ok(cmp::max(self.daily_limit as i64 - usage.daily_chars as i64, 0) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roll_over_keeps_counters_within_the_same_day() {
        let mut usage = QuotaUsage {
            monthly_chars: 1000,
            daily_chars: 200,
            reset_month: 3,
            reset_day: 14,
        };
        usage.roll_over(3, 14);
        assert_eq!(usage.monthly_chars, 1000);
        assert_eq!(usage.daily_chars, 200);
    }

    #[test]
    fn roll_over_zeroes_daily_on_a_new_day() {
        let mut usage = QuotaUsage {
            monthly_chars: 1000,
            daily_chars: 200,
            reset_month: 3,
            reset_day: 14,
        };
        usage.roll_over(3, 15);
        assert_eq!(usage.monthly_chars, 1000);
        assert_eq!(usage.daily_chars, 0);
        assert_eq!(usage.reset_day, 15);
    }

    #[test]
    fn roll_over_zeroes_both_on_a_new_month() {
        let mut usage = QuotaUsage {
            monthly_chars: 1000,
            daily_chars: 200,
            reset_month: 3,
            reset_day: 14,
        };
        usage.roll_over(4, 1);
        assert_eq!(usage.monthly_chars, 0);
        assert_eq!(usage.daily_chars, 0);
        assert_eq!(usage.reset_month, 4);
        assert_eq!(usage.reset_day, 1);
    }

    #[test]
    fn percentages_track_the_limits() {
        let usage = QuotaUsage {
            monthly_chars: 250_000,
            daily_chars: 8_333,
            reset_month: 1,
            reset_day: 1,
        };
        assert!((usage.monthly_used_pct() - 50.0).abs() < f64::EPSILON);
        assert!((usage.daily_used_pct(16_666) - 49.999).abs() < 0.01);
        assert_eq!(usage.daily_used_pct(0), 0.0);
    }

    #[test]
    fn serializes_with_camel_case_wire_names() {
        let usage = QuotaUsage {
            monthly_chars: 5,
            daily_chars: 3,
            reset_month: 7,
            reset_day: 21,
        };
        let json = serde_json::to_value(&usage).unwrap();
        assert_eq!(json["monthlyChars"], 5);
        assert_eq!(json["dailyChars"], 3);
        assert_eq!(json["resetMonth"], 7);
        assert_eq!(json["resetDay"], 21);
    }

    #[tokio::test]
    async fn tracker_accumulates_usage() {
        let store = Arc::new(MemoryQuotaStore::new());
        let tracker = QuotaTracker::new(store.clone());

        tracker.add_usage(11).await.unwrap();
        let usage = tracker.add_usage(9).await.unwrap();

        assert_eq!(usage.monthly_chars, 20);
        assert_eq!(usage.daily_chars, 20);
        assert!(usage.reset_month >= 1);

        tracker.reset().await.unwrap();
        let usage = tracker.snapshot().await.unwrap();
        assert_eq!(usage.monthly_chars, 0);
        assert_eq!(usage.daily_chars, 0);
    }

    #[tokio::test]
    async fn record_usage_lands_without_awaiting() {
        let store = Arc::new(MemoryQuotaStore::new());
        let tracker = Arc::new(QuotaTracker::new(store.clone()));

        tracker.record_usage(42);
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }

        let usage = store.load().await.unwrap();
        assert_eq!(usage.daily_chars, 42);
    }

    #[tokio::test]
    async fn json_store_round_trips() {
        let path = std::env::temp_dir().join(format!("dualsub-quota-{}.json", uuid::Uuid::new_v4()));
        let store = JsonQuotaStore::new(path.clone());

        assert_eq!(store.load().await.unwrap(), QuotaUsage::default());

        let usage = QuotaUsage {
            monthly_chars: 123,
            daily_chars: 45,
            reset_month: 6,
            reset_day: 2,
        };
        store.save(&usage).await.unwrap();
        assert_eq!(store.load().await.unwrap(), usage);

        let _ = std::fs::remove_file(path);
    }
}
