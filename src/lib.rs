mod clock;
mod collection;
mod config;
mod engine;
mod error;
mod export;
mod item;
mod persistence;
mod progress;
mod queue;
mod scheduler;
mod seed;
mod session;
#[cfg(test)]
mod test_helpers;

pub use clock::{Clock, FixedClock, SystemClock};
pub use collection::Collection;
pub use config::{EngineConfig, XpTable};
pub use engine::{Engine, SessionSummary};
pub use error::{EngineError, Result};
pub use export::{export_csv, export_csv_file};
pub use item::{Item, ItemContent, ItemId, ItemStatus, Outcome};
pub use persistence::{EngineState, SnapshotStore};
pub use progress::{
    LevelProgress, ProgressSnapshot, finalize, level_progress, same_calendar_day,
};
pub use queue::{build_queue, due_count, session_quota};
pub use scheduler::{ItemState, NextStates, next_easiness, next_interval, next_states, schedule};
pub use seed::seed_items;
pub use session::{Review, Session, SessionLog, SessionProgress, SessionState};
