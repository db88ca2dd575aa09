use std::fs;
use std::path::Path;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

use crate::error::{IoSnafu, JsonSnafu, Result};
use crate::item::ItemStatus;

/// Experience awarded per review, keyed by the status the review leaves the item in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct XpTable {
    pub new: u32,
    pub learning: u32,
    pub review: u32,
    /// Any status without its own entry.
    pub fallback: u32,
}

impl Default for XpTable {
    fn default() -> Self {
        Self {
            new: 10,
            learning: 5,
            review: 15,
            fallback: 5,
        }
    }
}

impl XpTable {
    pub fn reward(&self, status: ItemStatus) -> u32 {
        match status {
            ItemStatus::New => self.new,
            ItemStatus::Learning => self.learning,
            ItemStatus::Review => self.review,
            ItemStatus::Graduated => self.fallback,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// New items per day for a freshly created progress snapshot.
    pub default_daily_quota: u32,
    pub xp: XpTable,
    /// `level_thresholds[n]` is the experience needed to reach level `n + 1`.
    pub level_thresholds: Vec<u32>,
    /// Level-ups stop here even if the thresholds go further.
    pub max_level: u32,
    /// Zone whose calendar days drive streaks and the daily counter.
    pub time_zone: Tz,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_daily_quota: 5,
            xp: XpTable::default(),
            level_thresholds: vec![0, 500, 1500],
            max_level: 3,
            time_zone: Tz::UTC,
        }
    }
}

impl EngineConfig {
    /// Reads a JSON config. Keys left out keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).context(IoSnafu { path })?;
        serde_json::from_str(&text).context(JsonSnafu)
    }

    /// Experience needed to reach `level`, if the table defines it.
    pub fn threshold(&self, level: u32) -> Option<u32> {
        let index = usize::try_from(level.checked_sub(1)?).ok()?;
        self.level_thresholds.get(index).copied()
    }
}
