use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use common::{ErrorResponse, HealthStatus, RefreshResponse, ScoreboardData};

use crate::error::CycleError;
use crate::pipeline::Pipeline;
use crate::ws::WsTransport;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub transport: Arc<WsTransport>,
}

pub fn router(state: AppState) -> axum::Router {
    axum::Router::new()
        .route("/scoreboard", axum::routing::get(scoreboard))
        .route("/refresh", axum::routing::post(refresh))
        .route("/health", axum::routing::get(health))
        .route("/ws", axum::routing::get(crate::ws::upgrade))
        .with_state(state)
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn internal_error(message: &'static str) -> impl FnOnce(CycleError) -> ApiError {
    move |e| {
        tracing::error!("{}: {}", message, e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: message.to_owned(),
            }),
        )
    }
}

#[tracing::instrument(skip(state))]
async fn scoreboard(State(state): State<AppState>) -> Result<Json<Arc<ScoreboardData>>, ApiError> {
    let snapshot = state
        .pipeline
        .current_or_run()
        .await
        .map_err(internal_error("Failed to fetch scoreboard"))?;

    Ok(Json(snapshot))
}

#[tracing::instrument(skip(state))]
async fn refresh(State(state): State<AppState>) -> Result<Json<RefreshResponse>, ApiError> {
    let snapshot = state
        .pipeline
        .run_cycle()
        .await
        .map_err(internal_error("Failed to refresh data"))?;

    Ok(Json(RefreshResponse {
        success: true,
        data: snapshot,
    }))
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_owned(),
        timestamp: chrono::Utc::now(),
    })
}
