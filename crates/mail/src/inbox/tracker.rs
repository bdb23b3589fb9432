//! New-message detection across polls

use std::collections::HashSet;

use crate::models::MessageId;

/// Tracks which message ids have been seen across inbox polls.
///
/// The baseline is replaced wholesale on every observation: ids that
/// vanish from the listing (deleted or expired remotely) drop out of the
/// baseline too. The first observation after construction or [`reset`]
/// only primes the baseline, so a freshly restored mailbox doesn't flag
/// its whole backlog as new mail.
///
/// [`reset`]: InboxTracker::reset
#[derive(Debug, Default)]
pub struct InboxTracker {
    seen: HashSet<MessageId>,
    primed: bool,
}

impl InboxTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the ids from one poll and return the ones not seen before.
    ///
    /// On the priming observation the returned list is always empty.
    pub fn observe<I>(&mut self, ids: I) -> Vec<MessageId>
    where
        I: IntoIterator<Item = MessageId>,
    {
        let incoming: Vec<MessageId> = ids.into_iter().collect();

        let new_ids = if self.primed {
            incoming
                .iter()
                .filter(|id| !self.seen.contains(id))
                .cloned()
                .collect()
        } else {
            Vec::new()
        };

        self.seen = incoming.into_iter().collect();
        self.primed = true;
        new_ids
    }

    /// Forget everything; the next observation primes a fresh baseline.
    /// Called whenever the mailbox changes.
    pub fn reset(&mut self) {
        self.seen.clear();
        self.primed = false;
    }

    /// Whether a baseline has been established since the last reset
    pub fn is_primed(&self) -> bool {
        self.primed
    }

    /// Number of ids in the current baseline
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}
