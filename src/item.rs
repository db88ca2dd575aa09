use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use snafu::OptionExt;
use strum::{Display, EnumIter, EnumString, FromRepr, IntoStaticStr};

use crate::error::{InvalidOutcomeSnafu, Result};

pub(crate) const INITIAL_EASINESS: f64 = 2.5;
pub(crate) const MIN_EASINESS: f64 = 1.3;

/// Stable identifier of an [`Item`]. Never changes once assigned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    #[default]
    New,
    Learning,
    Review,
    /// Kept for documents written by other tools; the scheduler never assigns it.
    Graduated,
}

/// The learner's rating of one review.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    FromRepr,
    IntoStaticStr,
)]
#[repr(u8)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Forgot = 0,
    Hard = 1,
    Good = 2,
    Easy = 3,
}

impl Outcome {
    /// Parses the raw ordinal a rating surface sends.
    pub fn from_ordinal(value: i64) -> Result<Self> {
        u8::try_from(value)
            .ok()
            .and_then(Outcome::from_repr)
            .context(InvalidOutcomeSnafu { value })
    }

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// SM-2 quality score: HARD→3, GOOD→4, EASY→5.
    pub(crate) fn quality(self) -> f64 {
        f64::from(self.ordinal() + 2)
    }
}

impl TryFrom<i64> for Outcome {
    type Error = crate::EngineError;

    fn try_from(value: i64) -> Result<Self> {
        Self::from_ordinal(value)
    }
}

/// Learner facing content of an item. Scheduling never reads it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemContent {
    pub term: String,
    pub transcription: String,
    pub meaning: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_transcription: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_translation: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// 1-3
    #[serde(default = "default_difficulty_level")]
    pub difficulty_level: u8,
}

fn default_difficulty_level() -> u8 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    #[serde(flatten)]
    pub content: ItemContent,
    pub status: ItemStatus,
    pub interval_days: u32,
    pub repetition_count: u32,
    pub easiness_factor: f64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub next_review_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl Item {
    /// A fresh NEW item with a random id.
    pub fn new(content: ItemContent, now: DateTime<Utc>) -> Self {
        Self::with_id(ItemId::random(), content, now)
    }

    pub fn with_id(id: ItemId, content: ItemContent, now: DateTime<Utc>) -> Self {
        Self {
            id,
            content,
            status: ItemStatus::New,
            interval_days: 0,
            repetition_count: 0,
            easiness_factor: INITIAL_EASINESS,
            next_review_at: DateTime::UNIX_EPOCH,
            created_at: now,
        }
    }

    pub fn is_new(&self) -> bool {
        self.status == ItemStatus::New
    }

    /// A reviewed item whose scheduled instant has passed.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        !self.is_new() && self.next_review_at <= now
    }
}
