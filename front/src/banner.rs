use std::{sync::Arc, time::Duration};

use tokio::{
    sync::{watch, Mutex},
    task::JoinHandle,
    time,
};

use crate::state::{Banner, BannerKind, ListState};

/// How long each kind of banner stays up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BannerTimings {
    pub success: Duration,
    pub error: Duration,
}

impl Default for BannerTimings {
    fn default() -> Self {
        Self {
            success: Duration::from_secs(3),
            error: Duration::from_secs(5),
        }
    }
}

impl BannerTimings {
    fn for_kind(&self, kind: BannerKind) -> Duration {
        match kind {
            BannerKind::Success => self.success,
            BannerKind::Error => self.error,
        }
    }
}

#[derive(Default)]
struct Pending {
    next_id: u64,
    dismissal: Option<JoinHandle<()>>,
}

/// Shows one banner at a time and dismisses it once its time is up.
pub(crate) struct BannerTimer {
    state: Arc<watch::Sender<ListState>>,
    timings: BannerTimings,
    pending: Mutex<Pending>,
}

impl BannerTimer {
    pub fn new(state: Arc<watch::Sender<ListState>>, timings: BannerTimings) -> Self {
        Self {
            state,
            timings,
            pending: Mutex::default(),
        }
    }

    pub async fn success(&self, message: impl Into<String>) {
        self.show(BannerKind::Success, message.into()).await;
    }

    pub async fn error(&self, message: impl Into<String>) {
        self.show(BannerKind::Error, message.into()).await;
    }

    /// Replace the current banner, cancelling the previous dismissal.
    async fn show(&self, kind: BannerKind, message: String) {
        let mut pending = self.pending.lock().await;

        let id = pending.next_id;
        pending.next_id += 1;

        if let Some(previous) = pending.dismissal.take() {
            previous.abort();
        }

        self.state
            .send_modify(|state| state.banner = Some(Banner { id, kind, message }));

        let delay = self.timings.for_kind(kind);
        let state = self.state.clone();
        pending.dismissal = Some(tokio::spawn(async move {
            time::sleep(delay).await;
            state.send_if_modified(|state| match &state.banner {
                Some(banner) if banner.id == id => {
                    state.banner = None;
                    true
                }
                _ => false,
            });
        }));
    }
}

impl Drop for BannerTimer {
    fn drop(&mut self) {
        if let Some(dismissal) = self.pending.get_mut().dismissal.take() {
            dismissal.abort();
        }
    }
}
