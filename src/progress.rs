use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::item::{Item, ItemId};
use crate::scheduler::schedule;
use crate::session::SessionLog;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    pub experience: u32,
    pub level: u32,
    pub streak_days: u32,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub last_study_at: Option<DateTime<Utc>>,
    pub items_learned_today: u32,
    pub daily_new_item_quota: u32,
}

impl ProgressSnapshot {
    pub fn new(daily_new_item_quota: u32) -> Self {
        Self {
            experience: 0,
            level: 1,
            streak_days: 0,
            last_study_at: None,
            items_learned_today: 0,
            daily_new_item_quota,
        }
    }

    pub fn studied_on(&self, now: DateTime<Utc>, tz: Tz) -> bool {
        self.last_study_at
            .is_some_and(|last| same_calendar_day(last, now, tz))
    }

    /// Clears the daily counter once the calendar day has moved on. Returns
    /// whether anything was reset.
    pub fn roll_over_day(&mut self, now: DateTime<Utc>, tz: Tz) -> bool {
        if self.studied_on(now, tz) {
            return false;
        }
        if self.items_learned_today != 0 {
            debug!(
                "new day: clearing {} items learned yesterday",
                self.items_learned_today
            );
        }
        self.items_learned_today = 0;
        true
    }
}

/// Compares year, month and day as seen in `tz`, not elapsed hours.
pub fn same_calendar_day(a: DateTime<Utc>, b: DateTime<Utc>, tz: Tz) -> bool {
    a.with_timezone(&tz).date_naive() == b.with_timezone(&tz).date_naive()
}

/// Applies a completed session: reschedules every reviewed item in log order,
/// credits experience, extends the streak, counts distinct items and levels up
/// at most once. Reviews of items no longer in the collection are skipped.
pub fn finalize(
    log: &SessionLog,
    prior: &ProgressSnapshot,
    items: &[Item],
    config: &EngineConfig,
    now: DateTime<Utc>,
) -> (Vec<Item>, ProgressSnapshot) {
    let mut items = items.to_vec();
    let mut positions: HashMap<ItemId, usize> = HashMap::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        positions.entry(item.id.clone()).or_insert(i);
    }

    let mut progress = prior.clone();
    let mut touched = HashSet::new();
    for review in log.reviews() {
        let Some(&i) = positions.get(&review.item_id) else {
            debug!("skipping review of {}: not in the collection", review.item_id);
            continue;
        };
        let updated = schedule(&items[i], review.outcome, now);
        progress.experience = progress
            .experience
            .saturating_add(config.xp.reward(updated.status));
        items[i] = updated;
        touched.insert(&review.item_id);
    }

    // streaks only ever grow: a missed day does not reset them
    if !progress.studied_on(now, config.time_zone) {
        progress.streak_days = progress.streak_days.saturating_add(1);
        progress.last_study_at = Some(now);
        progress.items_learned_today = 0;
    }
    let distinct = u32::try_from(touched.len()).unwrap_or(u32::MAX);
    progress.items_learned_today = progress.items_learned_today.saturating_add(distinct);

    level_up(&mut progress, config);

    info!(
        "session applied: {} reviews, {distinct} items, +{} xp, streak {}",
        log.len(),
        progress.experience.saturating_sub(prior.experience),
        progress.streak_days
    );
    (items, progress)
}

/// Moves up a single level when the next threshold is met, never past `max_level`.
fn level_up(progress: &mut ProgressSnapshot, config: &EngineConfig) -> bool {
    if progress.level >= config.max_level {
        return false;
    }
    match config.threshold(progress.level + 1) {
        Some(threshold) if progress.experience >= threshold => {
            progress.level += 1;
            info!("level up: {} ({} xp)", progress.level, progress.experience);
            true
        }
        _ => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelProgress {
    pub level: u32,
    pub experience: u32,
    /// Experience at which the current level started.
    pub current_floor: u32,
    /// `None` at the level ceiling.
    pub next_threshold: Option<u32>,
}

impl LevelProgress {
    /// Share of the way from `current_floor` to `next_threshold`, in `0.0..=1.0`.
    pub fn fraction(&self) -> f64 {
        match self.next_threshold {
            Some(next) if next > self.current_floor => {
                let gained = self.experience.saturating_sub(self.current_floor);
                (f64::from(gained) / f64::from(next - self.current_floor)).clamp(0.0, 1.0)
            }
            _ => 1.0,
        }
    }

    pub fn remaining(&self) -> Option<u32> {
        self.next_threshold
            .map(|next| next.saturating_sub(self.experience))
    }
}

pub fn level_progress(progress: &ProgressSnapshot, config: &EngineConfig) -> LevelProgress {
    let next_threshold = if progress.level < config.max_level {
        config.threshold(progress.level + 1)
    } else {
        None
    };
    LevelProgress {
        level: progress.level,
        experience: progress.experience,
        current_floor: config.threshold(progress.level).unwrap_or(0),
        next_threshold,
    }
}
