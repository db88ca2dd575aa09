use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

use crate::collection::Collection;
use crate::config::EngineConfig;
use crate::error::{IoSnafu, JsonSnafu, Result};
use crate::progress::ProgressSnapshot;
use crate::seed::seed_items;

/// Everything the engine persists: the collection and the learner's progress,
/// always written together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineState {
    pub items: Collection,
    pub progress: ProgressSnapshot,
}

impl EngineState {
    /// Seed collection and a fresh progress snapshot.
    pub fn initial(now: DateTime<Utc>, config: &EngineConfig) -> Self {
        Self {
            items: seed_items(now).into(),
            progress: ProgressSnapshot::new(config.default_daily_quota),
        }
    }
}

/// A single JSON document on disk holding an [`EngineState`].
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Never fails: a missing or unreadable document yields the initial state.
    /// A loaded document gets the day rollover applied before it is returned.
    pub fn load(&self, now: DateTime<Utc>, config: &EngineConfig) -> EngineState {
        match self.read() {
            Ok(Some(mut state)) => {
                state.progress.roll_over_day(now, config.time_zone);
                debug!(
                    "loaded {} items from {}",
                    state.items.len(),
                    self.path.display()
                );
                state
            }
            Ok(None) => {
                info!("no snapshot at {}, starting fresh", self.path.display());
                EngineState::initial(now, config)
            }
            Err(e) => {
                warn!(
                    "discarding snapshot at {}: {e}; starting fresh",
                    self.path.display()
                );
                EngineState::initial(now, config)
            }
        }
    }

    fn read(&self) -> Result<Option<EngineState>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).context(IoSnafu { path: &self.path }),
        };
        serde_json::from_str(&text).map(Some).context(JsonSnafu)
    }

    /// Writes the whole state to a sibling temp file, then renames it over the
    /// document, so readers see either the old pair or the new one.
    pub fn save(&self, state: &EngineState) -> Result<()> {
        let json = serde_json::to_vec_pretty(state).context(JsonSnafu)?;
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).context(IoSnafu { path: dir })?;
        }
        let temp = self.temp_path();
        fs::write(&temp, json).context(IoSnafu { path: &temp })?;
        if let Err(e) = fs::rename(&temp, &self.path) {
            if let Err(cleanup) = fs::remove_file(&temp) {
                warn!("could not remove {}: {cleanup}", temp.display());
            }
            return Err(e).context(IoSnafu { path: &self.path });
        }
        debug!(
            "saved {} items to {}",
            state.items.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Deletes the document and hands back a fresh initial state.
    pub fn reset(&self, now: DateTime<Utc>, config: &EngineConfig) -> Result<EngineState> {
        match fs::remove_file(&self.path) {
            Ok(()) => info!("removed snapshot at {}", self.path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e).context(IoSnafu { path: &self.path }),
        }
        Ok(EngineState::initial(now, config))
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
