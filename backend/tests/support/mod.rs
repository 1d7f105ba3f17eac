#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use backend::error::{FetchError, PersistenceError};
use backend::hub::{ConnectionId, Transport};
use backend::source::MedalSource;
use backend::storage::SnapshotStore;
use common::{Country, MedalCount, MedalTableEntry, ScoreboardData, Team};
use futures::future::BoxFuture;
use futures::FutureExt;

pub fn entry(code: &str, name: &str, gold: u32, silver: u32, bronze: u32) -> MedalTableEntry {
    MedalTableEntry {
        country: Country::new(code, name),
        medals: MedalCount {
            gold,
            silver,
            bronze,
        },
    }
}

pub fn table() -> Vec<MedalTableEntry> {
    vec![
        entry("KOR", "South Korea", 5, 0, 0),
        entry("LVA", "Latvia", 0, 3, 0),
        entry("GBR", "Great Britain", 0, 0, 2),
        entry("ESP", "Spain", 1, 1, 1),
    ]
}

pub fn team(id: &str, picks: [(&str, &str); 3], tiebreaker_rank: u32) -> Team {
    Team {
        id: id.to_owned(),
        manager_name: format!("Manager {}", id),
        gold_country: Country::new(picks[0].0, picks[0].1),
        silver_country: Country::new(picks[1].0, picks[1].1),
        bronze_country: Country::new(picks[2].0, picks[2].1),
        tiebreaker_rank,
    }
}

/// Against `table()`: spain scores 6, nobody 0 and example 23.
pub fn teams() -> Vec<Team> {
    vec![
        team(
            "spain",
            [("ESP", "Spain"), ("ESP", "Spain"), ("ESP", "Spain")],
            1,
        ),
        team(
            "nobody",
            [("FIN", "Finland"), ("FIN", "Finland"), ("FIN", "Finland")],
            2,
        ),
        team(
            "example",
            [("KOR", "South Korea"), ("LVA", "Latvia"), ("GBR", "Great Britain")],
            3,
        ),
    ]
}

struct SourceState {
    live: bool,
    table: Vec<MedalTableEntry>,
    failing: AtomicBool,
    calls: AtomicUsize,
    gate: Option<tokio::sync::Notify>,
}

/// Returns the same table on every fetch, or fails on demand.
#[derive(Clone)]
pub struct FixedSource {
    state: Arc<SourceState>,
}

impl FixedSource {
    pub fn new(live: bool, table: Vec<MedalTableEntry>) -> Self {
        Self::build(live, table, None)
    }

    /// A source whose fetch blocks until `release` is called.
    pub fn gated(live: bool, table: Vec<MedalTableEntry>) -> Self {
        Self::build(live, table, Some(tokio::sync::Notify::new()))
    }

    fn build(live: bool, table: Vec<MedalTableEntry>, gate: Option<tokio::sync::Notify>) -> Self {
        Self {
            state: Arc::new(SourceState {
                live,
                table,
                failing: AtomicBool::new(false),
                calls: AtomicUsize::new(0),
                gate,
            }),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.state.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.state.calls.load(Ordering::SeqCst)
    }

    pub fn release(&self) {
        if let Some(gate) = &self.state.gate {
            gate.notify_one();
        }
    }

    pub fn boxed(&self) -> Box<dyn MedalSource> {
        Box::new(self.clone())
    }
}

#[async_trait::async_trait]
impl MedalSource for FixedSource {
    fn is_live(&self) -> bool {
        self.state.live
    }

    async fn fetch(&self) -> Result<Vec<MedalTableEntry>, FetchError> {
        self.state.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.state.gate {
            gate.notified().await;
        }

        if self.state.failing.load(Ordering::SeqCst) {
            return Err(FetchError::Status(reqwest::StatusCode::SERVICE_UNAVAILABLE));
        }
        Ok(self.state.table.clone())
    }
}

/// A store whose writes always fail.
pub struct BrokenStore;

impl SnapshotStore for BrokenStore {
    fn save<'f, 'd, 'own>(
        &'own self,
        _data: &'d [MedalTableEntry],
    ) -> BoxFuture<'f, Result<(), PersistenceError>>
    where
        'd: 'f,
        'own: 'f,
    {
        async {
            Err(PersistenceError::Io {
                path: "/dev/full".into(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
            })
        }
        .boxed()
    }

    fn load<'f, 'own>(
        &'own self,
    ) -> BoxFuture<'f, Result<Option<Vec<MedalTableEntry>>, PersistenceError>>
    where
        'own: 'f,
    {
        async { Ok(None) }.boxed()
    }
}

#[derive(Debug, Clone)]
pub enum Sent {
    Published(Arc<ScoreboardData>),
    Pushed(ConnectionId, Arc<ScoreboardData>),
}

#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<Sent>>,
}

impl RecordingTransport {
    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn published(&self) -> usize {
        self.sent()
            .iter()
            .filter(|s| matches!(s, Sent::Published(_)))
            .count()
    }

    pub fn pushed_to(&self, id: ConnectionId) -> usize {
        self.sent()
            .iter()
            .filter(|s| matches!(s, Sent::Pushed(to, _) if *to == id))
            .count()
    }
}

impl Transport for RecordingTransport {
    fn subscribe(&self, _id: ConnectionId) {}

    fn unsubscribe(&self, _id: ConnectionId) {}

    fn publish(&self, snapshot: Arc<ScoreboardData>) {
        self.sent.lock().unwrap().push(Sent::Published(snapshot));
    }

    fn push_to(&self, id: ConnectionId, snapshot: Arc<ScoreboardData>) {
        self.sent.lock().unwrap().push(Sent::Pushed(id, snapshot));
    }
}
