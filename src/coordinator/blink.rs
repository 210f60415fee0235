//! Repeating blink task, one per alerting tab.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tokio_util::sync::CancellationToken;

use crate::config::BLINK_INTERVAL;
use crate::risk::IndicatorColor;

use super::{TabHost, TabId};

/// Handle to a running blink task. Cancelling is O(1) and idempotent.
#[derive(Debug)]
pub(super) struct BlinkHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl BlinkHandle {
    /// Stops the blink loop. The token ends the loop at its next await
    /// point; the abort covers a task that has not been polled yet.
    pub(super) fn cancel(self) {
        self.token.cancel();
        self.task.abort();
    }
}

/// Spawns the blink loop for a tab. The caller has already painted the alert
/// color, so the first tick here flips to the default one interval later.
pub(super) fn spawn_blinker(
    host: Arc<dyn TabHost>,
    tab: TabId,
    color: IndicatorColor,
) -> BlinkHandle {
    let token = CancellationToken::new();
    let blink_token = token.clone();
    let task = tokio::spawn(async move {
        let mut show_color = false;
        let mut ticks = interval_at(Instant::now() + BLINK_INTERVAL, BLINK_INTERVAL);
        loop {
            tokio::select! {
                _ = blink_token.cancelled() => break,
                _ = ticks.tick() => {
                    let frame = if show_color { color } else { IndicatorColor::Default };
                    if let Err(e) = host.set_indicator(tab, frame) {
                        // Tab is presumably gone; keep blinking until told to stop.
                        log::debug!("Error setting indicator for tab {tab}: {e}");
                    }
                    show_color = !show_color;
                }
            }
        }
    });
    BlinkHandle { token, task }
}
