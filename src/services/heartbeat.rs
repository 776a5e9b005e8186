use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::info;

/// Logs a liveness line every `period` until the runtime shuts down.
pub fn spawn_heartbeat(period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period.max(Duration::from_secs(1)));
        // первый tick срабатывает сразу
        ticker.tick().await;
        loop {
            ticker.tick().await;
            info!("[background] cinema system running");
        }
    })
}
