//! Modified SM-2.
//!
//! - FORGOT resets the repetition streak and brings the item back tomorrow
//!   without touching its easiness.
//! - HARD/GOOD/EASY map to SM-2 qualities 3/4/5, adjust the easiness factor
//!   and grow the interval 1 day → 6 days → `ceil(interval * ef)`.

use chrono::{DateTime, Duration, SubsecRound, Utc};
use log::debug;

use crate::item::{Item, ItemStatus, MIN_EASINESS, Outcome};

pub fn next_easiness(easiness_factor: f64, outcome: Outcome) -> f64 {
    let distance = 5.0 - outcome.quality();
    (easiness_factor + (0.1 - distance * (0.08 + distance * 0.02))).max(MIN_EASINESS)
}

/// Interval after a successful review. Rounds up, never to nearest.
pub fn next_interval(interval_days: u32, repetition_count: u32, easiness_factor: f64) -> u32 {
    match repetition_count {
        0 => 1,
        1 => 6,
        // an interval of 0 past the second repetition only comes from hand-edited documents
        _ => ((f64::from(interval_days) * easiness_factor).ceil() as u32).max(1),
    }
}

/// Saturates at the last instant a document can hold.
pub(crate) fn days_from(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    now.checked_add_signed(Duration::days(i64::from(days)))
        .unwrap_or_else(|| DateTime::<Utc>::MAX_UTC.trunc_subsecs(3))
}

/// Scheduling fields of an item after one review.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemState {
    pub status: ItemStatus,
    pub interval_days: u32,
    pub repetition_count: u32,
    pub easiness_factor: f64,
    pub next_review_at: DateTime<Utc>,
}

impl ItemState {
    pub fn next(item: &Item, outcome: Outcome, now: DateTime<Utc>) -> Self {
        if outcome == Outcome::Forgot {
            return ItemState {
                status: ItemStatus::Learning,
                interval_days: 1,
                repetition_count: 0,
                easiness_factor: item.easiness_factor,
                next_review_at: days_from(now, 1),
            };
        }
        let easiness_factor = next_easiness(item.easiness_factor, outcome);
        let interval_days = next_interval(item.interval_days, item.repetition_count, easiness_factor);
        ItemState {
            status: ItemStatus::Review,
            interval_days,
            repetition_count: item.repetition_count.saturating_add(1),
            easiness_factor,
            next_review_at: days_from(now, interval_days),
        }
    }

    fn apply_to(self, item: &Item) -> Item {
        Item {
            status: self.status,
            interval_days: self.interval_days,
            repetition_count: self.repetition_count,
            easiness_factor: self.easiness_factor,
            next_review_at: self.next_review_at,
            ..item.clone()
        }
    }
}

/// The item as it stands after being rated `outcome` at `now`.
pub fn schedule(item: &Item, outcome: Outcome, now: DateTime<Utc>) -> Item {
    let state = ItemState::next(item, outcome, now);
    debug!(
        "{} rated {outcome}: {} -> {}, interval {}d, ef {:.2}",
        item.id, item.status, state.status, state.interval_days, state.easiness_factor
    );
    state.apply_to(item)
}

/// What each of the four ratings would do to an item, for labelling answer buttons.
#[derive(Debug, Clone, PartialEq)]
pub struct NextStates {
    pub forgot: ItemState,
    pub hard: ItemState,
    pub good: ItemState,
    pub easy: ItemState,
}

impl NextStates {
    pub fn get(&self, outcome: Outcome) -> &ItemState {
        match outcome {
            Outcome::Forgot => &self.forgot,
            Outcome::Hard => &self.hard,
            Outcome::Good => &self.good,
            Outcome::Easy => &self.easy,
        }
    }
}

pub fn next_states(item: &Item, now: DateTime<Utc>) -> NextStates {
    NextStates {
        forgot: ItemState::next(item, Outcome::Forgot, now),
        hard: ItemState::next(item, Outcome::Hard, now),
        good: ItemState::next(item, Outcome::Good, now),
        easy: ItemState::next(item, Outcome::Easy, now),
    }
}
