use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use common::events::{ClientEvent, ServerEvent};
use common::ScoreboardData;
use tokio::sync::mpsc;

use crate::api::AppState;
use crate::hub::{ConnectionId, Transport};

struct Connection {
    outbound: mpsc::UnboundedSender<String>,
    subscribed: bool,
}

/// WebSocket side of the broadcast hub.
///
/// Each socket task owns the receiving end of an unbounded channel; the
/// transport only ever holds the senders.
#[derive(Default)]
pub struct WsTransport {
    next_id: AtomicU64,
    connections: Mutex<HashMap<ConnectionId, Connection>>,
}

impl WsTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new connection. It receives nothing from `publish` until it
    /// is subscribed.
    pub fn open(&self) -> (ConnectionId, mpsc::UnboundedReceiver<String>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let (outbound, rx) = mpsc::unbounded_channel();

        self.connections().insert(
            id,
            Connection {
                outbound,
                subscribed: false,
            },
        );

        (id, rx)
    }

    pub fn len(&self) -> usize {
        self.connections().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn connections(&self) -> std::sync::MutexGuard<'_, HashMap<ConnectionId, Connection>> {
        self.connections.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn encode(snapshot: Arc<ScoreboardData>) -> Option<String> {
    match serde_json::to_string(&ServerEvent::ScoreUpdate(snapshot)) {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::error!("Encoding score update: {:?}", e);
            None
        }
    }
}

impl Transport for WsTransport {
    fn subscribe(&self, id: ConnectionId) {
        if let Some(connection) = self.connections().get_mut(&id) {
            connection.subscribed = true;
        }
    }

    fn unsubscribe(&self, id: ConnectionId) {
        self.connections().remove(&id);
    }

    fn publish(&self, snapshot: Arc<ScoreboardData>) {
        let Some(text) = encode(snapshot) else {
            return;
        };

        let connections = self.connections();
        let mut delivered = 0;
        for connection in connections.values().filter(|c| c.subscribed) {
            if connection.outbound.send(text.clone()).is_ok() {
                delivered += 1;
            }
        }
        tracing::debug!("Broadcast score update to {} connections", delivered);
    }

    fn push_to(&self, id: ConnectionId, snapshot: Arc<ScoreboardData>) {
        let Some(text) = encode(snapshot) else {
            return;
        };

        if let Some(connection) = self.connections().get(&id) {
            let _ = connection.outbound.send(text);
        }
    }
}

pub async fn upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: AppState) {
    let (id, mut outbound) = state.transport.open();
    tracing::info!(connection = id, "Client connected");

    state.pipeline.hub().connect(id);

    loop {
        tokio::select! {
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => match serde_json::from_str::<ClientEvent>(&text) {
                        Ok(ClientEvent::RequestUpdate) => {
                            state.pipeline.hub().request_update(id);
                        }
                        Err(e) => {
                            tracing::debug!(connection = id, "Ignoring client message: {}", e);
                        }
                    },
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::debug!(connection = id, "Socket error: {}", e);
                        break;
                    }
                }
            }
            Some(text) = outbound.recv() => {
                if socket.send(Message::Text(text)).await.is_err() {
                    break;
                }
            }
        }
    }

    state.pipeline.hub().disconnect(id);
    tracing::info!(connection = id, "Client disconnected");
}
