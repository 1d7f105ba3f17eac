use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use common::{MedalTableEntry, ScoreboardData, Team};

use crate::cache::ScoreboardCache;
use crate::error::{CycleError, PersistenceError};
use crate::hub::BroadcastHub;
use crate::source::MedalSource;
use crate::storage::SnapshotStore;

/// One fetch → compute → rank → persist → cache → broadcast pass, and the
/// guard that keeps those passes from overlapping.
pub struct Pipeline {
    teams: Arc<[Team]>,
    source: Box<dyn MedalSource>,
    store: Box<dyn SnapshotStore>,
    hub: Arc<BroadcastHub>,
    interval: Duration,
    active_cycle: tokio::sync::Mutex<()>,
}

impl Pipeline {
    pub fn new(
        teams: Vec<Team>,
        source: Box<dyn MedalSource>,
        store: Box<dyn SnapshotStore>,
        hub: Arc<BroadcastHub>,
        interval: Duration,
    ) -> Self {
        Self {
            teams: teams.into(),
            source,
            store,
            hub,
            interval,
            active_cycle: tokio::sync::Mutex::new(()),
        }
    }

    pub fn cache(&self) -> &Arc<ScoreboardCache> {
        self.hub.cache()
    }

    pub fn hub(&self) -> &Arc<BroadcastHub> {
        &self.hub
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Runs a cycle, waiting for an in-flight one to finish first.
    pub async fn run_cycle(&self) -> Result<Arc<ScoreboardData>, CycleError> {
        let _active = self.active_cycle.lock().await;
        self.cycle().await
    }

    /// Runs a cycle unless one is already in flight, in which case `None`.
    pub async fn try_run_cycle(&self) -> Option<Result<Arc<ScoreboardData>, CycleError>> {
        let _active = self.active_cycle.try_lock().ok()?;
        Some(self.cycle().await)
    }

    /// The cached scoreboard, or a freshly computed one if no cycle has
    /// completed yet.
    pub async fn current_or_run(&self) -> Result<Arc<ScoreboardData>, CycleError> {
        if let Some(snapshot) = self.cache().get() {
            return Ok(snapshot);
        }

        let _active = self.active_cycle.lock().await;
        // Whoever held the guard may have just filled the cache.
        if let Some(snapshot) = self.cache().get() {
            return Ok(snapshot);
        }
        self.cycle().await
    }

    /// Seeds the cache from the persisted medal table of a previous run.
    ///
    /// Only applies to live sources, since mock data is never persisted.
    /// Returns whether a snapshot was restored.
    #[tracing::instrument(skip(self))]
    pub async fn warm_start(&self) -> Result<bool, PersistenceError> {
        if !self.source.is_live() {
            return Ok(false);
        }

        let _active = self.active_cycle.lock().await;
        if !self.cache().is_empty() {
            return Ok(false);
        }

        match self.store.load().await? {
            Some(medals) => {
                // The next scheduled cycle is the very first tick, so only the
                // timestamp of the data itself is carried over.
                let now = Utc::now();
                let saved_at = self.store.saved_at().await?.unwrap_or(now);
                let snapshot = self.snapshot_at(&medals, saved_at, now);
                self.cache().replace(snapshot);
                tracing::info!("Restored scoreboard from {} persisted countries", medals.len());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    #[tracing::instrument(name = "cycle", skip(self))]
    async fn cycle(&self) -> Result<Arc<ScoreboardData>, CycleError> {
        let medals = self.source.fetch().await?;
        let snapshot = self.snapshot(&medals);

        if self.source.is_live() {
            self.store.save(&medals).await?;
        }

        self.hub.publish(snapshot.clone());

        tracing::info!(
            teams = snapshot.teams.len(),
            countries = medals.len(),
            "Scoreboard updated"
        );
        Ok(snapshot)
    }

    fn snapshot(&self, medals: &[MedalTableEntry]) -> Arc<ScoreboardData> {
        let last_update = Utc::now();
        let next_update = chrono::Duration::from_std(self.interval)
            .ok()
            .and_then(|interval| last_update.checked_add_signed(interval))
            .unwrap_or(last_update);

        self.snapshot_at(medals, last_update, next_update)
    }

    fn snapshot_at(
        &self,
        medals: &[MedalTableEntry],
        last_update: DateTime<Utc>,
        next_update: DateTime<Utc>,
    ) -> Arc<ScoreboardData> {
        Arc::new(ScoreboardData {
            teams: scoring::leaderboard(&self.teams, medals),
            last_update,
            next_update,
        })
    }
}
