// Shared test helpers: mock host, overlay surface, registry, and page setup.
//
// This module provides common utilities used across multiple test files to
// reduce duplication.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use tempfile::TempDir;
use tokio::sync::mpsc;

use domain_alert::{
    AgeCache, CoordinatorMessage, HostError, IndicatorColor, OverlayContent, OverlaySurface,
    PageSession, RegistryError, RegistryLookup, TabHost, TabId, WhitelistStore,
};

/// Tab id used by the page-session tests.
#[allow(dead_code)] // Used by other test files
pub const TEST_TAB: TabId = 1;

/// Records every host call; flips to failing when `fail` is set.
#[derive(Default)]
#[allow(dead_code)] // Used by other test files
pub struct RecordingHost {
    pub indicator_calls: Mutex<Vec<(TabId, IndicatorColor)>>,
    pub close_calls: Mutex<Vec<TabId>>,
    pub fail: AtomicBool,
}

impl RecordingHost {
    #[allow(dead_code)] // Used by other test files
    pub fn colors_for(&self, tab: TabId) -> Vec<IndicatorColor> {
        self.indicator_calls
            .lock()
            .expect("lock")
            .iter()
            .filter(|(t, _)| *t == tab)
            .map(|(_, color)| *color)
            .collect()
    }
}

impl TabHost for RecordingHost {
    fn set_indicator(&self, tab: TabId, color: IndicatorColor) -> Result<(), HostError> {
        self.indicator_calls.lock().expect("lock").push((tab, color));
        if self.fail.load(Ordering::SeqCst) {
            return Err(HostError::TabGone(tab));
        }
        Ok(())
    }

    fn close_tab(&self, tab: TabId) -> Result<(), HostError> {
        self.close_calls.lock().expect("lock").push(tab);
        if self.fail.load(Ordering::SeqCst) {
            return Err(HostError::TabGone(tab));
        }
        Ok(())
    }
}

/// Overlay surface that records everything it is asked to show.
#[derive(Default)]
#[allow(dead_code)] // Used by other test files
pub struct RecordingSurface {
    pub shown: Vec<OverlayContent>,
    visible: bool,
}

impl OverlaySurface for RecordingSurface {
    fn show(&mut self, content: OverlayContent) {
        self.visible = true;
        self.shown.push(content);
    }

    fn dismiss(&mut self) {
        self.visible = false;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }
}

#[allow(dead_code)] // Used by other test files
enum MockOutcome {
    RegisteredDaysAgo(i64),
    Fail(u16),
}

/// Registry stub with a call counter, so tests can assert that cached and
/// reconstructed paths never hit the network.
#[allow(dead_code)] // Used by other test files
pub struct MockRegistry {
    outcome: MockOutcome,
    calls: AtomicUsize,
}

impl MockRegistry {
    #[allow(dead_code)] // Used by other test files
    pub fn registered_days_ago(days: i64) -> Self {
        Self {
            outcome: MockOutcome::RegisteredDaysAgo(days),
            calls: AtomicUsize::new(0),
        }
    }

    #[allow(dead_code)] // Used by other test files
    pub fn failing(status: u16) -> Self {
        Self {
            outcome: MockOutcome::Fail(status),
            calls: AtomicUsize::new(0),
        }
    }

    #[allow(dead_code)] // Used by other test files
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RegistryLookup for MockRegistry {
    async fn fetch(
        &self,
        _hostname: &str,
        _registrable_domain: &str,
    ) -> Result<DateTime<Utc>, RegistryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.outcome {
            MockOutcome::RegisteredDaysAgo(days) => Ok(Utc::now() - Duration::days(days)),
            MockOutcome::Fail(status) => Err(RegistryError::Status(status)),
        }
    }
}

/// A page session wired to temp-dir stores and an inspectable coordinator
/// channel.
#[allow(dead_code)] // Used by other test files
pub struct TestPage {
    pub session: PageSession<RecordingSurface>,
    pub coordinator_rx: mpsc::Receiver<CoordinatorMessage>,
    pub whitelist: WhitelistStore,
    pub cache: AgeCache,
    _dir: TempDir,
}

#[allow(dead_code)] // Used by other test files
pub fn test_page(hostname: &str) -> TestPage {
    let dir = tempfile::tempdir().expect("tempdir");
    let (tx, coordinator_rx) = mpsc::channel(16);
    let cache = AgeCache::new(dir.path().join("age_cache"));
    let whitelist = WhitelistStore::new(dir.path().join("whitelist.json"));
    let session = PageSession::new(
        TEST_TAB,
        hostname,
        tx,
        RecordingSurface::default(),
        cache.clone(),
        whitelist.clone(),
    );
    TestPage {
        session,
        coordinator_rx,
        whitelist,
        cache,
        _dir: dir,
    }
}

/// Pops the next coordinator message and unwraps it as a RequestAlert.
#[allow(dead_code)] // Used by other test files
pub fn expect_alert(rx: &mut mpsc::Receiver<CoordinatorMessage>) -> (IndicatorColor, bool) {
    match rx.try_recv().expect("a coordinator message") {
        CoordinatorMessage::RequestAlert { color, blink, .. } => (color, blink),
        other => panic!("expected RequestAlert, got {other:?}"),
    }
}
