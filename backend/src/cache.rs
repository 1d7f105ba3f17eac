use std::sync::Arc;

use arc_swap::ArcSwapOption;
use common::ScoreboardData;

/// Holds the latest complete scoreboard.
///
/// Empty until the first successful cycle. Snapshots are swapped in whole, so
/// a reader gets either the old or the new one and never blocks a writer.
pub struct ScoreboardCache {
    slot: ArcSwapOption<ScoreboardData>,
}

impl ScoreboardCache {
    pub fn new() -> Self {
        Self {
            slot: ArcSwapOption::empty(),
        }
    }

    pub fn get(&self) -> Option<Arc<ScoreboardData>> {
        self.slot.load_full()
    }

    pub fn replace(&self, snapshot: Arc<ScoreboardData>) {
        self.slot.store(Some(snapshot));
    }

    pub fn is_empty(&self) -> bool {
        self.slot.load().is_none()
    }
}

impl Default for ScoreboardCache {
    fn default() -> Self {
        Self::new()
    }
}
