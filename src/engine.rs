use std::io::Write;
use std::path::Path;

use itertools::Itertools;
use log::info;

use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::export;
use crate::item::{Item, ItemContent, ItemId, Outcome};
use crate::persistence::{EngineState, SnapshotStore};
use crate::progress::{LevelProgress, finalize, level_progress};
use crate::queue::{self, session_quota};
use crate::scheduler::{self, NextStates};
use crate::session::{Session, SessionLog};

/// What a completed session changed, for the end-of-session screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub reviews: usize,
    /// Distinct items rated, re-queued ones counted once.
    pub items: usize,
    pub experience_gained: u32,
    pub leveled_up: bool,
    pub streak_days: u32,
}

/// Entry point tying the pure scheduling pieces to a clock, a config and
/// optionally a snapshot store. Each call reads the clock once.
///
/// The engine holds no learner data itself: every operation takes the
/// [`EngineState`] it works on.
#[derive(Debug, Clone)]
pub struct Engine<C: Clock = SystemClock> {
    config: EngineConfig,
    clock: C,
    store: Option<SnapshotStore>,
}

impl Engine<SystemClock> {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> Engine<C> {
    pub fn with_clock(config: EngineConfig, clock: C) -> Self {
        Self {
            config,
            clock,
            store: None,
        }
    }

    /// State changing operations save through `store` once attached.
    pub fn with_store(mut self, store: SnapshotStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn store(&self) -> Option<&SnapshotStore> {
        self.store.as_ref()
    }

    /// The saved state with the day rollover applied, or the seed state when
    /// there is no store or nothing usable in it.
    pub fn load(&self) -> EngineState {
        let now = self.clock.now();
        match &self.store {
            Some(store) => store.load(now, &self.config),
            None => EngineState::initial(now, &self.config),
        }
    }

    pub fn save(&self, state: &EngineState) -> Result<()> {
        match &self.store {
            Some(store) => store.save(state),
            None => Ok(()),
        }
    }

    /// Forgets everything: removes the saved document and returns the seed state.
    pub fn reset(&self) -> Result<EngineState> {
        let now = self.clock.now();
        match &self.store {
            Some(store) => store.reset(now, &self.config),
            None => Ok(EngineState::initial(now, &self.config)),
        }
    }

    pub fn schedule(&self, item: &Item, outcome: Outcome) -> Item {
        scheduler::schedule(item, outcome, self.clock.now())
    }

    pub fn next_states(&self, item: &Item) -> NextStates {
        scheduler::next_states(item, self.clock.now())
    }

    /// Today's queue, with the NEW item quota reduced by what was already
    /// learned today.
    pub fn build_queue(&self, state: &EngineState) -> Vec<ItemId> {
        let now = self.clock.now();
        // a state kept in memory past midnight still gets today's full quota
        let mut progress = state.progress.clone();
        progress.roll_over_day(now, self.config.time_zone);
        queue::build_queue(state.items.items(), session_quota(&progress), now)
    }

    pub fn start_session(&self, state: &EngineState) -> Session {
        Session::new(self.build_queue(state))
    }

    /// Applies a completed session and saves the result. `state` is only
    /// replaced once the save has gone through.
    pub fn complete_session(
        &self,
        state: &mut EngineState,
        log: SessionLog,
    ) -> Result<SessionSummary> {
        let now = self.clock.now();
        let (items, progress) =
            finalize(&log, &state.progress, state.items.items(), &self.config, now);
        let updated = EngineState {
            items: items.into(),
            progress,
        };
        self.save(&updated)?;

        let summary = SessionSummary {
            reviews: log.len(),
            items: log
                .reviews()
                .iter()
                .map(|review| &review.item_id)
                .filter(|&id| state.items.get(id).is_some())
                .unique()
                .count(),
            experience_gained: updated
                .progress
                .experience
                .saturating_sub(state.progress.experience),
            leveled_up: updated.progress.level > state.progress.level,
            streak_days: updated.progress.streak_days,
        };
        *state = updated;
        Ok(summary)
    }

    /// Appends a NEW item with a fresh id and saves.
    pub fn add_item(&self, state: &mut EngineState, content: ItemContent) -> Result<ItemId> {
        let item = Item::new(content, self.clock.now());
        let id = item.id.clone();
        let mut updated = state.clone();
        updated.items.append(item);
        self.save(&updated)?;
        info!("added item {id}");
        *state = updated;
        Ok(id)
    }

    pub fn due_count(&self, state: &EngineState) -> usize {
        queue::due_count(state.items.items(), self.clock.now())
    }

    pub fn level_progress(&self, state: &EngineState) -> LevelProgress {
        level_progress(&state.progress, &self.config)
    }

    pub fn export_csv<W: Write>(&self, state: &EngineState, writer: W) -> Result<()> {
        export::export_csv(state.items.items(), self.config.time_zone, writer)
    }

    pub fn export_csv_file(&self, state: &EngineState, path: impl AsRef<Path>) -> Result<()> {
        export::export_csv_file(state.items.items(), self.config.time_zone, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EngineError;
    use crate::clock::FixedClock;
    use crate::item::ItemStatus;
    use crate::item::Outcome::*;
    use crate::session::SessionState;
    use crate::test_helpers::at;
    use chrono::Duration;

    fn engine(dir: &tempfile::TempDir) -> Engine<FixedClock> {
        Engine::with_clock(EngineConfig::default(), FixedClock::new(at(2024, 5, 1, 9)))
            .with_store(SnapshotStore::new(dir.path().join("state.json")))
    }

    fn ids(queue: &[ItemId]) -> Vec<&str> {
        queue.iter().map(ItemId::as_str).collect()
    }

    /// Rates every item `outcome`, except that `forgotten` gets a FORGOT the
    /// first time it comes up.
    fn run(session: &mut Session, forgotten: Option<&str>, outcome: Outcome) {
        let mut forgot_once = false;
        while let Some(id) = session.current() {
            let rating = if Some(id.as_str()) == forgotten && !forgot_once {
                forgot_once = true;
                Forgot
            } else {
                outcome
            };
            session.rate(rating).unwrap();
        }
    }

    #[test]
    fn first_day_then_next_day() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine(&dir);
        let mut state = engine.load();
        assert_eq!(state.items.len(), 5);

        let mut session = engine.start_session(&state);
        assert_eq!(
            ids(&engine.build_queue(&state)),
            ["seed-1", "seed-2", "seed-3", "seed-4", "seed-5"]
        );
        run(&mut session, Some("seed-1"), Good);
        assert_eq!(session.state(), SessionState::Complete);
        let summary = engine
            .complete_session(&mut state, session.finish().unwrap())
            .unwrap();

        assert_eq!(
            summary,
            SessionSummary {
                reviews: 6,
                items: 5,
                // LEARNING 5 + five REVIEW 15s
                experience_gained: 80,
                leveled_up: false,
                streak_days: 1,
            }
        );
        assert_eq!(state.progress.items_learned_today, 5);
        assert!(state.items.items().iter().all(|item| item.status == ItemStatus::Review));
        assert_eq!(engine.load(), state);

        // quota used up and nothing due yet
        let session = engine.start_session(&state);
        assert_eq!(session.state(), SessionState::NothingDue);
        assert_eq!(engine.due_count(&state), 0);

        engine.clock().advance(Duration::days(1));
        let mut state = engine.load();
        assert_eq!(state.progress.items_learned_today, 0);
        assert_eq!(engine.due_count(&state), 5);

        let mut session = engine.start_session(&state);
        run(&mut session, None, Easy);
        let summary = engine
            .complete_session(&mut state, session.finish().unwrap())
            .unwrap();
        assert_eq!(summary.experience_gained, 75);
        assert_eq!(summary.streak_days, 2);
        assert!(
            state
                .items
                .items()
                .iter()
                .all(|item| item.interval_days == 6)
        );
    }

    #[test]
    fn quota_refreshes_for_state_held_past_midnight() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine(&dir);
        let mut state = engine.load();
        state.progress.items_learned_today = 5;
        state.progress.last_study_at = Some(engine.clock().now());
        assert!(engine.build_queue(&state).is_empty());

        engine.clock().advance(Duration::days(1));
        assert_eq!(engine.build_queue(&state).len(), 5);
    }

    #[test]
    fn failed_save_leaves_state_alone() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let engine = Engine::with_clock(EngineConfig::default(), FixedClock::new(at(2024, 5, 1, 9)))
            .with_store(SnapshotStore::new(blocker.join("state.json")));

        let mut state = engine.load();
        let before = state.clone();
        let mut session = engine.start_session(&state);
        run(&mut session, None, Good);
        let result = engine.complete_session(&mut state, session.finish().unwrap());
        assert!(matches!(result, Err(EngineError::Io { .. })));
        assert_eq!(state, before);

        let result = engine.add_item(&mut state, ItemContent::default());
        assert!(result.is_err());
        assert_eq!(state, before);
    }

    #[test]
    fn cancelled_session_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine(&dir);
        let state = engine.load();
        let mut session = engine.start_session(&state);
        session.rate(Easy).unwrap();
        session.rate_ordinal(2).unwrap();
        session.cancel();
        assert_eq!(engine.load(), state);
        assert!(!engine.store().unwrap().path().exists());
    }

    #[test]
    fn added_items_join_the_queue() {
        let engine = Engine::with_clock(EngineConfig::default(), FixedClock::new(at(2024, 5, 1, 9)));
        let mut state = engine.load();
        state.progress.daily_new_item_quota = 6;
        let id = engine
            .add_item(
                &mut state,
                ItemContent {
                    term: "食飯".into(),
                    transcription: "sik6 faan6".into(),
                    meaning: "吃饭".into(),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(state.items.len(), 6);
        let item = state.items.get(&id).unwrap();
        assert!(item.is_new());
        assert_eq!(item.created_at, at(2024, 5, 1, 9));
        assert_eq!(engine.build_queue(&state).last(), Some(&id));
    }

    #[test]
    fn previews_and_dashboard() {
        let engine = Engine::with_clock(EngineConfig::default(), FixedClock::new(at(2024, 5, 1, 9)));
        let mut state = engine.load();
        let item = state.items.items()[0].clone();
        let preview = engine.next_states(&item);
        assert_eq!(preview.good.interval_days, 1);
        assert_eq!(
            engine.schedule(&item, Hard).easiness_factor,
            preview.hard.easiness_factor
        );

        state.progress.experience = 600;
        state.progress.level = 2;
        let level = engine.level_progress(&state);
        assert_eq!(level.current_floor, 500);
        assert_eq!(level.remaining(), Some(900));

        let mut csv = Vec::new();
        engine.export_csv(&state, &mut csv).unwrap();
        assert_eq!(String::from_utf8(csv).unwrap().lines().count(), 6);
    }

    #[test]
    fn wall_clock_state_reloads_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let engine = Engine::new(EngineConfig::default())
            .with_store(SnapshotStore::new(dir.path().join("state.json")));
        let mut state = engine.load();
        engine.add_item(&mut state, ItemContent::default()).unwrap();
        assert_eq!(engine.load(), state);
    }

    #[test]
    fn reset_returns_to_seed() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine(&dir);
        let mut state = engine.load();
        let mut session = engine.start_session(&state);
        run(&mut session, None, Good);
        engine
            .complete_session(&mut state, session.finish().unwrap())
            .unwrap();
        assert!(engine.store().unwrap().path().exists());

        let fresh = engine.reset().unwrap();
        assert_eq!(fresh.progress.experience, 0);
        assert!(fresh.items.items().iter().all(Item::is_new));
        assert!(!engine.store().unwrap().path().exists());
    }
}
