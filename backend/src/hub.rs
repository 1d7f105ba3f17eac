use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use common::ScoreboardData;
use tokio::time::Instant;

use crate::cache::ScoreboardCache;

pub type ConnectionId = u64;

/// Minimum spacing between two honoured refresh requests of one connection.
pub const THROTTLE_WINDOW: Duration = Duration::from_millis(1000);

/// The parts of a real-time transport the hub needs.
///
/// `subscribe` adds a connection to the broadcast group, `publish` reaches
/// every subscribed connection, `push_to` reaches exactly one.
pub trait Transport: Send + Sync {
    fn subscribe(&self, id: ConnectionId);
    fn unsubscribe(&self, id: ConnectionId);
    fn publish(&self, snapshot: Arc<ScoreboardData>);
    fn push_to(&self, id: ConnectionId, snapshot: Arc<ScoreboardData>);
}

pub struct BroadcastHub {
    transport: Arc<dyn Transport>,
    cache: Arc<ScoreboardCache>,
    last_request: Mutex<HashMap<ConnectionId, Instant>>,
    /// Held while a snapshot is read from the cache and handed to the
    /// transport, so a single push can never overtake a newer broadcast.
    delivery: Mutex<()>,
}

impl BroadcastHub {
    pub fn new(transport: Arc<dyn Transport>, cache: Arc<ScoreboardCache>) -> Self {
        Self {
            transport,
            cache,
            last_request: Mutex::new(HashMap::new()),
            delivery: Mutex::new(()),
        }
    }

    fn delivery(&self) -> MutexGuard<'_, ()> {
        self.delivery.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn connect(&self, id: ConnectionId) {
        let _delivery = self.delivery();
        self.transport.subscribe(id);

        if let Some(snapshot) = self.cache.get() {
            self.transport.push_to(id, snapshot);
        }
    }

    /// Handles a client asking for the current scoreboard.
    ///
    /// Returns `false` when the request fell inside the throttle window and
    /// was dropped without a reply.
    pub fn request_update(&self, id: ConnectionId) -> bool {
        let now = Instant::now();

        {
            let mut last_request = self
                .last_request
                .lock()
                .unwrap_or_else(PoisonError::into_inner);

            if let Some(previous) = last_request.get(&id) {
                if now.duration_since(*previous) < THROTTLE_WINDOW {
                    tracing::debug!(connection = id, "Throttled update request");
                    return false;
                }
            }
            last_request.insert(id, now);
        }

        let _delivery = self.delivery();
        if let Some(snapshot) = self.cache.get() {
            self.transport.push_to(id, snapshot);
        }
        true
    }

    pub fn disconnect(&self, id: ConnectionId) {
        self.last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);

        self.transport.unsubscribe(id);
    }

    /// Makes `snapshot` current and sends it to every connection.
    ///
    /// The cache is written before anything goes out, so a connection that
    /// asks right after a broadcast gets the same snapshot.
    pub fn publish(&self, snapshot: Arc<ScoreboardData>) {
        let _delivery = self.delivery();
        self.cache.replace(snapshot.clone());
        self.transport.publish(snapshot);
    }

    pub fn cache(&self) -> &Arc<ScoreboardCache> {
        &self.cache
    }

    pub fn tracked_connections(&self) -> usize {
        self.last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Subscribe(ConnectionId),
        Unsubscribe(ConnectionId),
        Publish,
        PushTo(ConnectionId),
    }

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<Call>>,
    }

    impl Recorder {
        fn take(&self) -> Vec<Call> {
            std::mem::take(&mut *self.calls.lock().unwrap())
        }
    }

    impl Transport for Recorder {
        fn subscribe(&self, id: ConnectionId) {
            self.calls.lock().unwrap().push(Call::Subscribe(id));
        }
        fn unsubscribe(&self, id: ConnectionId) {
            self.calls.lock().unwrap().push(Call::Unsubscribe(id));
        }
        fn publish(&self, _snapshot: Arc<ScoreboardData>) {
            self.calls.lock().unwrap().push(Call::Publish);
        }
        fn push_to(&self, id: ConnectionId, _snapshot: Arc<ScoreboardData>) {
            self.calls.lock().unwrap().push(Call::PushTo(id));
        }
    }

    fn snapshot() -> Arc<ScoreboardData> {
        let now = chrono::Utc::now();
        Arc::new(ScoreboardData {
            teams: Vec::new(),
            last_update: now,
            next_update: now,
        })
    }

    fn hub() -> (BroadcastHub, Arc<Recorder>) {
        let recorder = Arc::new(Recorder::default());
        let hub = BroadcastHub::new(recorder.clone(), Arc::new(ScoreboardCache::new()));
        (hub, recorder)
    }

    #[test]
    fn connect_without_snapshot_pushes_nothing() {
        let (hub, recorder) = hub();

        hub.connect(1);

        assert_eq!(recorder.take(), vec![Call::Subscribe(1)]);
    }

    #[test]
    fn connect_with_snapshot_pushes_immediately() {
        let (hub, recorder) = hub();
        hub.publish(snapshot());
        recorder.take();

        hub.connect(2);

        assert_eq!(recorder.take(), vec![Call::Subscribe(2), Call::PushTo(2)]);
    }

    #[test]
    fn publish_updates_cache_first() {
        let (hub, recorder) = hub();
        let data = snapshot();

        hub.publish(data.clone());

        assert!(Arc::ptr_eq(&hub.cache().get().unwrap(), &data));
        assert_eq!(recorder.take(), vec![Call::Publish]);
    }

    /// Publishes a newer snapshot from another thread while the first
    /// `push_to` is in progress, and remembers the last frame per connection.
    #[derive(Default)]
    struct Interleaving {
        hub: std::sync::OnceLock<std::sync::Weak<BroadcastHub>>,
        newer: Mutex<Option<Arc<ScoreboardData>>>,
        publisher: Mutex<Option<std::thread::JoinHandle<()>>>,
        subscribed: Mutex<Vec<ConnectionId>>,
        last_frame: Mutex<HashMap<ConnectionId, Arc<ScoreboardData>>>,
    }

    impl Transport for Interleaving {
        fn subscribe(&self, id: ConnectionId) {
            self.subscribed.lock().unwrap().push(id);
        }
        fn unsubscribe(&self, _id: ConnectionId) {}
        fn publish(&self, snapshot: Arc<ScoreboardData>) {
            let mut last_frame = self.last_frame.lock().unwrap();
            for id in self.subscribed.lock().unwrap().iter() {
                last_frame.insert(*id, snapshot.clone());
            }
        }
        fn push_to(&self, id: ConnectionId, snapshot: Arc<ScoreboardData>) {
            if let Some(newer) = self.newer.lock().unwrap().take() {
                let hub = self.hub.get().and_then(|hub| hub.upgrade()).unwrap();
                *self.publisher.lock().unwrap() =
                    Some(std::thread::spawn(move || hub.publish(newer)));
                std::thread::sleep(Duration::from_millis(50));
            }
            self.last_frame.lock().unwrap().insert(id, snapshot);
        }
    }

    #[test]
    fn connect_never_delivers_a_stale_snapshot_last() {
        let transport = Arc::new(Interleaving::default());
        let hub = Arc::new(BroadcastHub::new(
            transport.clone(),
            Arc::new(ScoreboardCache::new()),
        ));
        transport.hub.set(Arc::downgrade(&hub)).unwrap();

        let older = snapshot();
        let newer = snapshot();
        hub.publish(older);
        *transport.newer.lock().unwrap() = Some(newer.clone());

        hub.connect(7);
        transport
            .publisher
            .lock()
            .unwrap()
            .take()
            .unwrap()
            .join()
            .unwrap();

        let last_frame = transport.last_frame.lock().unwrap();
        assert!(Arc::ptr_eq(&last_frame[&7], &newer));
        assert!(Arc::ptr_eq(&hub.cache().get().unwrap(), &newer));
    }

    #[tokio::test(start_paused = true)]
    async fn throttles_within_window() {
        let (hub, recorder) = hub();
        hub.publish(snapshot());
        hub.connect(1);
        recorder.take();

        assert!(hub.request_update(1));
        tokio::time::advance(Duration::from_millis(999)).await;
        assert!(!hub.request_update(1));

        assert_eq!(recorder.take(), vec![Call::PushTo(1)]);
    }

    #[tokio::test(start_paused = true)]
    async fn honours_after_window() {
        let (hub, recorder) = hub();
        hub.publish(snapshot());
        hub.connect(1);
        recorder.take();

        assert!(hub.request_update(1));
        tokio::time::advance(THROTTLE_WINDOW).await;
        assert!(hub.request_update(1));

        assert_eq!(recorder.take(), vec![Call::PushTo(1), Call::PushTo(1)]);
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_request_does_not_reset_window() {
        let (hub, _recorder) = hub();
        hub.connect(1);

        assert!(hub.request_update(1));
        tokio::time::advance(Duration::from_millis(600)).await;
        assert!(!hub.request_update(1));
        tokio::time::advance(Duration::from_millis(400)).await;
        assert!(hub.request_update(1));
    }

    #[tokio::test(start_paused = true)]
    async fn throttle_is_per_connection() {
        let (hub, recorder) = hub();
        hub.publish(snapshot());
        hub.connect(1);
        hub.connect(2);
        recorder.take();

        assert!(hub.request_update(1));
        assert!(hub.request_update(2));

        assert_eq!(recorder.take(), vec![Call::PushTo(1), Call::PushTo(2)]);
    }

    #[tokio::test(start_paused = true)]
    async fn honoured_request_without_snapshot_is_silent() {
        let (hub, recorder) = hub();
        hub.connect(1);
        recorder.take();

        assert!(hub.request_update(1));
        assert_eq!(recorder.take(), Vec::new());
    }

    #[tokio::test(start_paused = true)]
    async fn disconnect_forgets_connection() {
        let (hub, recorder) = hub();
        hub.connect(1);
        hub.request_update(1);
        assert_eq!(hub.tracked_connections(), 1);

        hub.disconnect(1);

        assert_eq!(hub.tracked_connections(), 0);
        assert_eq!(recorder.take().last(), Some(&Call::Unsubscribe(1)));
    }
}
