use crate::engine::CycleReport;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// The most recent completed cycle, shared between the monitor loop and the
/// API handlers. `None` until the first cycle finishes.
#[derive(Clone, Default)]
pub struct AppState {
    latest: Arc<RwLock<Option<Latest>>>,
}

pub struct Latest {
    pub report: CycleReport,
    pub duration: Duration,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn publish(&self, report: CycleReport, duration: Duration) {
        *self.latest.write().await = Some(Latest { report, duration });
    }

    pub async fn with_latest<T>(&self, f: impl FnOnce(&Latest) -> T) -> Option<T> {
        self.latest.read().await.as_ref().map(f)
    }
}
