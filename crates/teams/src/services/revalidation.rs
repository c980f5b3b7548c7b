//! Best-effort account-view refresh notifications.
//!
//! Every successful mutation announces which users' account views went
//! stale. Listeners (the server keeps one for its cache hook) can refresh;
//! nobody listening is fine, delivery is fire-and-forget.

use tokio::sync::broadcast;
use tracing::debug;

/// Which user's account view should be refreshed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevalidationEvent {
    pub user_id: i64,
}

#[derive(Clone)]
pub struct RevalidationHandle {
    tx: broadcast::Sender<RevalidationEvent>,
}

impl RevalidationHandle {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RevalidationEvent> {
        self.tx.subscribe()
    }

    /// Announce a stale view. Lagging or absent receivers never fail the
    /// mutation that triggered this.
    pub fn notify(&self, user_id: i64) {
        if self.tx.send(RevalidationEvent { user_id }).is_err() {
            debug!(user_id, "no revalidation listeners");
        }
    }
}

impl Default for RevalidationHandle {
    fn default() -> Self {
        Self::new(64)
    }
}
