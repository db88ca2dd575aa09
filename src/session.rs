use std::collections::VecDeque;

use log::debug;
use serde::{Deserialize, Serialize};
use snafu::ensure;

use crate::error::{Result, SessionClosedSnafu, SessionIncompleteSnafu};
use crate::item::{ItemId, Outcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for a rating of [`Session::current`].
    Active,
    /// Every queued item, re-queued ones included, has been rated.
    Complete,
    /// The queue was empty from the start. Nothing gets scheduled or credited.
    NothingDue,
}

/// One rating in a session log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub item_id: ItemId,
    pub outcome: Outcome,
}

/// The ordered log of a session that ran to completion. Only a completed
/// session can produce one, so only full sessions ever reach the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionLog {
    reviews: Vec<Review>,
}

impl SessionLog {
    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn from_reviews(reviews: Vec<Review>) -> Self {
        Self { reviews }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    pub answered: usize,
    /// Grows by one every time a forgotten item is re-queued.
    pub total: usize,
}

/// Walks a built queue one rating at a time. A forgotten item goes to the back
/// of this session's queue; its persistent schedule is still updated when the
/// session is finalized.
#[derive(Debug, Clone)]
pub struct Session {
    pending: VecDeque<ItemId>,
    log: Vec<Review>,
    state: SessionState,
}

impl Session {
    pub fn new(queue: Vec<ItemId>) -> Self {
        let state = if queue.is_empty() {
            SessionState::NothingDue
        } else {
            SessionState::Active
        };
        Self {
            pending: queue.into(),
            log: Vec::new(),
            state,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The item awaiting a rating, if the session is active.
    pub fn current(&self) -> Option<&ItemId> {
        self.pending.front()
    }

    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            answered: self.log.len(),
            total: self.log.len() + self.pending.len(),
        }
    }

    pub fn reviews(&self) -> &[Review] {
        &self.log
    }

    pub fn rate(&mut self, outcome: Outcome) -> Result<SessionState> {
        ensure!(self.state == SessionState::Active, SessionClosedSnafu);
        let Some(item_id) = self.pending.pop_front() else {
            return SessionClosedSnafu.fail();
        };
        debug!("session rated {item_id} {outcome}");
        if outcome == Outcome::Forgot {
            self.pending.push_back(item_id.clone());
        }
        self.log.push(Review { item_id, outcome });
        if self.pending.is_empty() {
            self.state = SessionState::Complete;
        }
        Ok(self.state)
    }

    /// Rates with a raw ordinal from the rating surface. An unknown ordinal is
    /// rejected before anything changes.
    pub fn rate_ordinal(&mut self, value: i64) -> Result<SessionState> {
        let outcome = Outcome::from_ordinal(value)?;
        self.rate(outcome)
    }

    pub fn finish(self) -> Result<SessionLog> {
        ensure!(self.state == SessionState::Complete, SessionIncompleteSnafu);
        Ok(SessionLog { reviews: self.log })
    }

    /// Leaves the session early. The partial log is dropped: no item is
    /// rescheduled and no progress is credited.
    pub fn cancel(self) {
        debug!(
            "session cancelled after {} of {} ratings",
            self.log.len(),
            self.log.len() + self.pending.len()
        );
    }
}
