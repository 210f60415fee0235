//! Per-page session: the age-check pipeline and overlay negotiation.
//!
//! One [`PageSession`] exists per top-level document and is destroyed with
//! it. It owns the overlay surface, remembers the last computed age info so
//! the overlay can be rebuilt on demand without another network query, and
//! talks to the coordinator only through messages.

mod overlay;

pub use overlay::{OverlayContent, OverlaySurface};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use crate::cache::AgeCache;
use crate::config::PAGE_QUEUE_DEPTH;
use crate::coordinator::{CoordinatorMessage, PageEvent, TabId};
use crate::registry::{self, RegistryError, RegistryLookup};
use crate::risk::{self, IndicatorColor, RiskTier};
use crate::suffix::resolve_registrable_domain;
use crate::whitelist::WhitelistStore;

/// Outcome of the most recent age lookup for a page.
#[derive(Debug, Clone)]
pub enum AgeOutcome {
    /// The lookup succeeded.
    Known {
        /// Computed risk tier (before any whitelist override).
        tier: RiskTier,
        /// Age in fractional days at lookup time.
        days: f64,
        /// Registration date reported by the registry.
        registered: DateTime<Utc>,
    },
    /// The lookup failed; the message explains why.
    Unknown {
        /// User-facing error text.
        message: String,
    },
}

/// The last computed age info, kept for the lifetime of the page so a later
/// "show overlay again" trigger can reconstruct the same alert.
#[derive(Debug, Clone)]
pub struct AgeInfo {
    /// Registrable domain the lookup was keyed by.
    pub registrable_domain: String,
    /// What the lookup produced.
    pub outcome: AgeOutcome,
}

/// One page context.
pub struct PageSession<S: OverlaySurface> {
    tab: TabId,
    hostname: String,
    coordinator: mpsc::Sender<CoordinatorMessage>,
    surface: S,
    cache: AgeCache,
    whitelist: WhitelistStore,
    last_info: Option<AgeInfo>,
}

impl<S: OverlaySurface> PageSession<S> {
    /// Creates a session for the document at `hostname` in `tab`.
    pub fn new(
        tab: TabId,
        hostname: impl Into<String>,
        coordinator: mpsc::Sender<CoordinatorMessage>,
        surface: S,
        cache: AgeCache,
        whitelist: WhitelistStore,
    ) -> Self {
        Self {
            tab,
            hostname: hostname.into(),
            coordinator,
            surface,
            cache,
            whitelist,
            last_info: None,
        }
    }

    /// Registers this page with the coordinator and returns the receiver for
    /// the events it will forward (navigation re-checks, indicator clicks).
    pub async fn connect(&self) -> mpsc::Receiver<PageEvent> {
        let (tx, rx) = mpsc::channel(PAGE_QUEUE_DEPTH);
        self.send(CoordinatorMessage::RegisterPage {
            tab: self.tab,
            events: tx,
        })
        .await;
        rx
    }

    /// Dispatches one coordinator-forwarded event.
    pub async fn handle_event<R: RegistryLookup>(&mut self, event: PageEvent, registry: &R) {
        match event {
            PageEvent::TogglePopup => self.toggle_overlay(),
            PageEvent::CheckDomainAge { hostname } => {
                self.hostname = hostname;
                self.check_domain_age(registry).await;
            }
        }
    }

    /// Runs the full age-check pipeline for the current document.
    ///
    /// Resolves the registrable domain, looks up the registration date
    /// (known table, then cache, then registry), classifies the age, applies
    /// the whitelist override, shows the overlay when warranted, and requests
    /// the matching indicator state from the coordinator. Nothing in here is
    /// fatal: a failed lookup degrades to an UNKNOWN/YELLOW alert.
    pub async fn check_domain_age<R: RegistryLookup>(&mut self, registry: &R) {
        if self.hostname.is_empty() {
            log::debug!("Age check skipped: page has no hostname");
            return;
        }
        let registrable = resolve_registrable_domain(&self.hostname);
        let whitelisted = self.whitelist.is_whitelisted(&registrable);

        let info = match self.lookup_registration_date(registry, &registrable).await {
            Ok(registered) => {
                let days = age_in_days(registered);
                let tier = risk::classify(days);
                log::debug!("{registrable} is {days:.1} days old ({tier})");
                AgeInfo {
                    registrable_domain: registrable,
                    outcome: AgeOutcome::Known {
                        tier,
                        days,
                        registered,
                    },
                }
            }
            Err(err) => {
                log::info!("Failed to determine domain age for {registrable}: {err}");
                AgeInfo {
                    registrable_domain: registrable,
                    outcome: AgeOutcome::Unknown {
                        message: unknown_age_message(&self.hostname, &err),
                    },
                }
            }
        };

        let alerting = match &info.outcome {
            AgeOutcome::Known { tier, .. } => risk::should_alert(*tier),
            AgeOutcome::Unknown { .. } => true,
        };
        if alerting && !whitelisted {
            self.show_overlay(build_overlay(&info, false));
        }

        let (color, blink) = if whitelisted {
            (IndicatorColor::Green, false)
        } else {
            match &info.outcome {
                AgeOutcome::Known { tier, .. } => (IndicatorColor::from(*tier), alerting),
                AgeOutcome::Unknown { .. } => (IndicatorColor::Yellow, true),
            }
        };

        // Kept for the lifetime of the page: a later toggle rebuilds the
        // overlay from this without re-querying the network.
        self.last_info = Some(info);

        self.send(CoordinatorMessage::RequestAlert {
            tab: self.tab,
            color,
            blink,
        })
        .await;
    }

    async fn lookup_registration_date<R: RegistryLookup>(
        &self,
        registry: &R,
        registrable: &str,
    ) -> Result<DateTime<Utc>, RegistryError> {
        if let Some(date) = registry::known_registration_date(registrable) {
            log::debug!("Using built-in registration date for {registrable}");
            return Ok(date);
        }
        if let Some(entry) = self.cache.get(registrable) {
            log::debug!("Cache hit for {registrable}");
            return Ok(entry.registration_date);
        }
        let date = registry.fetch(&self.hostname, registrable).await?;
        if let Err(e) = self.cache.put(registrable, date) {
            // The cache is an optimization; a failed write never fails the check.
            log::warn!("Failed to cache registration date for {registrable}: {e:#}");
        }
        Ok(date)
    }

    /// Idempotent overlay toggle, driven by the indicator click: dismisses a
    /// visible overlay, otherwise rebuilds the last computed alert without
    /// re-querying the registry.
    pub fn toggle_overlay(&mut self) {
        if self.surface.is_visible() {
            self.surface.dismiss();
            return;
        }
        let Some(info) = self.last_info.clone() else {
            log::debug!("No age info recorded for this page yet, nothing to show");
            return;
        };
        let whitelisted = self.whitelist.is_whitelisted(&info.registrable_domain);
        self.show_overlay(build_overlay(&info, whitelisted));
    }

    /// "Don't warn me again on this site": records the registrable domain in
    /// the whitelist, requests a steady green indicator, and dismisses the
    /// overlay.
    pub async fn whitelist_current_domain(&mut self) {
        let registrable = resolve_registrable_domain(&self.hostname);
        if let Err(e) = self.whitelist.add(&registrable) {
            log::warn!("Failed to persist whitelist entry for {registrable}: {e:#}");
        }
        self.send(CoordinatorMessage::RequestAlert {
            tab: self.tab,
            color: IndicatorColor::Green,
            blink: false,
        })
        .await;
        self.surface.dismiss();
    }

    /// "Get me out of here": asks the coordinator to close this tab.
    pub async fn request_close(&self) {
        self.send(CoordinatorMessage::CloseTab { tab: self.tab }).await;
    }

    /// The plain close/OK affordance. Never mutates the whitelist.
    pub fn dismiss_overlay(&mut self) {
        self.surface.dismiss();
    }

    /// The last computed age info for this page, if any check has run.
    pub fn last_info(&self) -> Option<&AgeInfo> {
        self.last_info.as_ref()
    }

    /// The overlay surface (primarily for inspection in tests).
    pub fn surface(&self) -> &S {
        &self.surface
    }

    fn show_overlay(&mut self, content: OverlayContent) {
        if self.surface.is_visible() {
            return;
        }
        self.surface.show(content);
    }

    async fn send(&self, message: CoordinatorMessage) {
        if let Err(e) = self.coordinator.send(message).await {
            log::debug!("Coordinator unavailable, dropping message: {e}");
        }
    }
}

fn age_in_days(registered: DateTime<Utc>) -> f64 {
    let age = Utc::now().signed_duration_since(registered);
    age.num_milliseconds() as f64 / (1000.0 * 60.0 * 60.0 * 24.0)
}

/// Formats an age for display: days under 90 days, whole months under two
/// years, otherwise years with one decimal.
pub fn format_age(days: f64) -> String {
    if days < 90.0 {
        format!("{} days", days.floor() as i64)
    } else if days < 2.0 * 365.0 {
        format!("{} months", (days / 30.0).floor() as i64)
    } else {
        format!("{:.1} years", days / 365.0)
    }
}

fn unknown_age_message(hostname: &str, err: &RegistryError) -> String {
    // Many ccTLD registries expose no RDAP endpoint, so failed lookups on
    // two-letter TLDs get a softer framing.
    let cc_hint = if has_country_code_tld(hostname) {
        " This is common for country-specific domains."
    } else {
        ""
    };
    format!("Unable to determine domain age (RDAP error: {err}).{cc_hint}")
}

fn has_country_code_tld(hostname: &str) -> bool {
    hostname
        .trim_end_matches('.')
        .rsplit('.')
        .next()
        .map(|label| label.len() == 2 && label.chars().all(|c| c.is_ascii_alphabetic()))
        .unwrap_or(false)
}

fn build_overlay(info: &AgeInfo, whitelisted: bool) -> OverlayContent {
    match &info.outcome {
        AgeOutcome::Unknown { message } => {
            let severity = if whitelisted {
                RiskTier::Green
            } else {
                RiskTier::Yellow
            };
            OverlayContent {
                text: message.clone(),
                severity,
                link: Some(format!(
                    "https://rdap.org/domain/{}",
                    info.registrable_domain
                )),
                show_exit: severity != RiskTier::Green,
                show_whitelist: severity != RiskTier::Green && !whitelisted,
            }
        }
        AgeOutcome::Known {
            tier,
            days,
            registered,
        } => {
            let severity = if whitelisted { RiskTier::Green } else { *tier };
            let prefix = if severity == RiskTier::Green {
                ""
            } else {
                "Warning: "
            };
            let text = format!(
                "{prefix}This domain is {} old (registered on {}).",
                format_age(*days),
                registered.format("%Y-%m-%d")
            );
            OverlayContent {
                text,
                severity,
                link: None,
                show_exit: severity != RiskTier::Green,
                show_whitelist: severity != RiskTier::Green && !whitelisted,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_age_buckets() {
        assert_eq!(format_age(10.4), "10 days");
        assert_eq!(format_age(89.9), "89 days");
        assert_eq!(format_age(90.0), "3 months");
        assert_eq!(format_age(600.0), "20 months");
        assert_eq!(format_age(729.9), "24 months");
        assert_eq!(format_age(730.1), "2.0 years");
        assert_eq!(format_age(3650.0), "10.0 years");
    }

    #[test]
    fn test_country_code_tld_detection() {
        assert!(has_country_code_tld("example.co"));
        assert!(has_country_code_tld("shop.example.de"));
        assert!(has_country_code_tld("example.fr."));
        assert!(!has_country_code_tld("example.com"));
        assert!(!has_country_code_tld("example.a1"));
        assert!(!has_country_code_tld("localhost"));
    }

    #[test]
    fn test_unknown_message_carries_cc_hint() {
        let message = unknown_age_message("example.de", &RegistryError::Status(404));
        assert!(message.contains("Unable to determine domain age"));
        assert!(message.contains("HTTP error! status: 404"));
        assert!(message.contains("country-specific"));

        let message = unknown_age_message("example.com", &RegistryError::Status(404));
        assert!(!message.contains("country-specific"));
    }

    #[test]
    fn test_overlay_for_young_domain() {
        let info = AgeInfo {
            registrable_domain: "fresh.com".to_string(),
            outcome: AgeOutcome::Known {
                tier: RiskTier::Red,
                days: 10.2,
                registered: "2026-08-14T00:00:00Z".parse().expect("date"),
            },
        };
        let overlay = build_overlay(&info, false);
        assert_eq!(overlay.severity, RiskTier::Red);
        assert!(overlay.text.starts_with("Warning: "));
        assert!(overlay.text.contains("10 days"));
        assert!(overlay.text.contains("2026-08-14"));
        assert!(overlay.link.is_none());
        assert!(overlay.show_exit);
        assert!(overlay.show_whitelist);
    }

    #[test]
    fn test_overlay_for_whitelisted_domain_is_green_and_buttonless() {
        let info = AgeInfo {
            registrable_domain: "fresh.com".to_string(),
            outcome: AgeOutcome::Known {
                tier: RiskTier::Red,
                days: 10.2,
                registered: "2026-08-14T00:00:00Z".parse().expect("date"),
            },
        };
        let overlay = build_overlay(&info, true);
        assert_eq!(overlay.severity, RiskTier::Green);
        assert!(!overlay.text.starts_with("Warning:"));
        assert!(!overlay.show_exit);
        assert!(!overlay.show_whitelist);
    }

    #[test]
    fn test_overlay_for_failed_lookup() {
        let info = AgeInfo {
            registrable_domain: "mystery.zz".to_string(),
            outcome: AgeOutcome::Unknown {
                message: "Unable to determine domain age (RDAP error: HTTP error! status: 404)."
                    .to_string(),
            },
        };
        let overlay = build_overlay(&info, false);
        assert_eq!(overlay.severity, RiskTier::Yellow);
        assert_eq!(
            overlay.link.as_deref(),
            Some("https://rdap.org/domain/mystery.zz")
        );
        assert!(overlay.show_exit);
        assert!(overlay.show_whitelist);
    }
}
