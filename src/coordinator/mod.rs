//! Tab alert state machine and the coordinator message loop.
//!
//! One coordinator is shared across all tabs; page contexts talk to it only
//! through [`CoordinatorMessage`] values over a channel, and it talks back
//! through per-tab [`PageEvent`] channels. Message passing is fire-and-forget
//! in both directions: delivery failures are logged and dropped, never
//! propagated, because the usual cause is a tab that already navigated away
//! or closed.

mod blink;

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;
use url::Url;

use crate::config::COORDINATOR_QUEUE_DEPTH;
use crate::risk::IndicatorColor;

/// Browser tab identifier.
pub type TabId = u32;

/// Frame identifier within a tab.
pub type FrameId = u32;

/// The frame id of the top-level document. Sub-frame navigations are ignored.
pub const TOP_LEVEL_FRAME: FrameId = 0;

/// Failures reported by the host when driving a tab. Best-effort calls: the
/// coordinator logs these and moves on.
#[derive(Error, Debug)]
pub enum HostError {
    /// The tab no longer exists.
    #[error("tab {0} is gone")]
    TabGone(TabId),

    /// Any other host-side failure.
    #[error("host call failed: {0}")]
    Backend(String),
}

/// Host-side tab primitives consumed by the coordinator.
///
/// Implementations wrap whatever the embedding host offers for setting a
/// tab's indicator icon and for closing a tab. Both calls may fail when the
/// tab is already gone; the coordinator never treats that as fatal and never
/// rolls state back on failure.
pub trait TabHost: Send + Sync {
    /// Sets the indicator for a tab.
    fn set_indicator(&self, tab: TabId, color: IndicatorColor) -> Result<(), HostError>;

    /// Requests closure of a tab.
    fn close_tab(&self, tab: TabId) -> Result<(), HostError>;
}

/// Messages accepted by the coordinator.
#[derive(Debug)]
pub enum CoordinatorMessage {
    /// A page asks for its tab indicator to change.
    RequestAlert {
        /// Target tab.
        tab: TabId,
        /// Color to show.
        color: IndicatorColor,
        /// Blink between the color and the default, or show it steady.
        blink: bool,
    },
    /// A page asks for its tab to be closed ("get me out of here").
    CloseTab {
        /// Target tab.
        tab: TabId,
    },
    /// A page context came up and wants to receive coordinator events.
    RegisterPage {
        /// The page's tab.
        tab: TabId,
        /// Channel the coordinator forwards [`PageEvent`]s into.
        events: mpsc::Sender<PageEvent>,
    },
    /// The host reports a completed navigation.
    NavigationCompleted {
        /// Tab that navigated.
        tab: TabId,
        /// Destination URL.
        url: String,
        /// Frame that navigated; only [`TOP_LEVEL_FRAME`] is acted on.
        frame: FrameId,
    },
    /// The host reports a removed tab.
    TabClosed {
        /// The removed tab.
        tab: TabId,
    },
    /// The user clicked the extension indicator on a tab.
    IndicatorClicked {
        /// Tab whose indicator was clicked.
        tab: TabId,
    },
}

/// Events the coordinator forwards to a page context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    /// Toggle the overlay, rebuilding it from the last computed info.
    TogglePopup,
    /// Run (or re-run) the age check for the current document.
    CheckDomainAge {
        /// Hostname of the document that finished loading.
        hostname: String,
    },
}

/// Alert state for one tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabAlertState {
    /// Color currently shown (or blinked against the default).
    pub color: IndicatorColor,
    /// Whether a blink task is driving the indicator.
    pub blinking: bool,
}

impl Default for TabAlertState {
    fn default() -> Self {
        Self {
            color: IndicatorColor::Default,
            blinking: false,
        }
    }
}

/// The per-tab alert state machine.
///
/// Owns, for every tab, the current indicator state and the blink task
/// driving it (at most one per tab, enforced by the handle map). Tab state
/// is created implicitly on the first message naming a tab and destroyed on
/// tab close; every top-level navigation resets it to the default before the
/// new page's age check resolves, so no stale alert survives a navigation.
pub struct AlertCoordinator {
    host: Arc<dyn TabHost>,
    tabs: HashMap<TabId, TabAlertState>,
    blinkers: HashMap<TabId, blink::BlinkHandle>,
    pages: HashMap<TabId, mpsc::Sender<PageEvent>>,
}

impl AlertCoordinator {
    /// Creates a coordinator driving the given host.
    pub fn new(host: Arc<dyn TabHost>) -> Self {
        Self {
            host,
            tabs: HashMap::new(),
            blinkers: HashMap::new(),
            pages: HashMap::new(),
        }
    }

    /// Spawns the coordinator receive loop and returns the sender half that
    /// page contexts and host adapters use to reach it.
    pub fn spawn(host: Arc<dyn TabHost>) -> mpsc::Sender<CoordinatorMessage> {
        let (tx, mut rx) = mpsc::channel(COORDINATOR_QUEUE_DEPTH);
        let mut coordinator = Self::new(host);
        tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                coordinator.handle_message(message);
            }
            coordinator.shutdown();
        });
        tx
    }

    /// Applies one message to the state machine.
    pub fn handle_message(&mut self, message: CoordinatorMessage) {
        match message {
            CoordinatorMessage::RequestAlert { tab, color, blink } => {
                self.request_alert(tab, color, blink)
            }
            CoordinatorMessage::CloseTab { tab } => self.close_tab(tab),
            CoordinatorMessage::RegisterPage { tab, events } => {
                self.pages.insert(tab, events);
            }
            CoordinatorMessage::NavigationCompleted { tab, url, frame } => {
                self.navigation_completed(tab, &url, frame)
            }
            CoordinatorMessage::TabClosed { tab } => self.tab_closed(tab),
            CoordinatorMessage::IndicatorClicked { tab } => {
                self.forward(tab, PageEvent::TogglePopup)
            }
        }
    }

    fn request_alert(&mut self, tab: TabId, color: IndicatorColor, blink: bool) {
        self.stop_blinking(tab);
        // Paint the requested color immediately; for a blink request this
        // makes the first frame visible without waiting out one interval.
        self.set_indicator(tab, color);
        if blink {
            let handle = blink::spawn_blinker(Arc::clone(&self.host), tab, color);
            self.blinkers.insert(tab, handle);
        }
        self.tabs.insert(tab, TabAlertState { color, blinking: blink });
    }

    fn navigation_completed(&mut self, tab: TabId, url: &str, frame: FrameId) {
        if frame != TOP_LEVEL_FRAME {
            return;
        }
        // Reset before the new page's lookup resolves. A late result from the
        // previous page can still repaint once; the race is accepted, the next
        // navigation reset clears it again.
        self.stop_blinking(tab);
        self.set_indicator(tab, IndicatorColor::Default);
        self.tabs.insert(tab, TabAlertState::default());
        log::debug!("Navigated to {url} (tab {tab}), indicator reset");

        match Url::parse(url) {
            Ok(parsed) => {
                if let Some(hostname) = parsed.host_str() {
                    self.forward(
                        tab,
                        PageEvent::CheckDomainAge {
                            hostname: hostname.to_string(),
                        },
                    );
                }
            }
            Err(e) => log::debug!("Unparseable navigation URL {url}: {e}"),
        }
    }

    fn tab_closed(&mut self, tab: TabId) {
        self.stop_blinking(tab);
        self.tabs.remove(&tab);
        self.pages.remove(&tab);
    }

    fn close_tab(&mut self, tab: TabId) {
        self.stop_blinking(tab);
        if let Err(e) = self.host.close_tab(tab) {
            log::debug!("Unable to close tab {tab}: {e}");
        }
        // Per-tab state goes away regardless of the closure outcome.
        self.tabs.remove(&tab);
        self.pages.remove(&tab);
    }

    fn forward(&mut self, tab: TabId, event: PageEvent) {
        let Some(events) = self.pages.get(&tab) else {
            log::debug!("No page channel registered for tab {tab}, dropping {event:?}");
            return;
        };
        if let Err(e) = events.try_send(event) {
            log::debug!("Failed to forward event to tab {tab}: {e}");
        }
    }

    fn set_indicator(&self, tab: TabId, color: IndicatorColor) {
        if let Err(e) = self.host.set_indicator(tab, color) {
            log::debug!("Error setting indicator for tab {tab}: {e}");
        }
    }

    fn stop_blinking(&mut self, tab: TabId) {
        if let Some(handle) = self.blinkers.remove(&tab) {
            handle.cancel();
        }
    }

    /// Current alert state for a tab (the default state when the tab is
    /// unknown).
    pub fn tab_state(&self, tab: TabId) -> TabAlertState {
        self.tabs.get(&tab).copied().unwrap_or_default()
    }

    /// Whether a blink task is currently scheduled for the tab.
    pub fn has_active_blinker(&self, tab: TabId) -> bool {
        self.blinkers.contains_key(&tab)
    }

    fn shutdown(&mut self) {
        for (_, handle) in self.blinkers.drain() {
            handle.cancel();
        }
    }
}
