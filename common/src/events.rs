//! Messages exchanged over the real-time channel.
//!
//! Every frame is a JSON envelope `{"event": <name>, "data": <payload>}`.

use std::sync::Arc;

use crate::ScoreboardData;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    ScoreUpdate(Arc<ScoreboardData>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ClientEvent {
    RequestUpdate,
}
