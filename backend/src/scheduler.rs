use std::sync::Arc;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::pipeline::Pipeline;

/// Runs a cycle right away and then once per pipeline interval until
/// `shutdown` fires.
///
/// A failed cycle is logged and the loop carries on; the last good
/// scoreboard stays in the cache.
pub async fn run(pipeline: Arc<Pipeline>, shutdown: CancellationToken) {
    let mut ticker = tokio::time::interval(pipeline.interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    tracing::info!(interval = ?pipeline.interval(), "Starting update scheduler");

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                tracing::info!("Update scheduler shutting down");
                break;
            }
            _ = ticker.tick() => {
                match pipeline.try_run_cycle().await {
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::error!("Update cycle failed: {}", e);
                    }
                    None => {
                        tracing::warn!("Previous cycle still running, skipping tick");
                    }
                }
            }
        }
    }
}
