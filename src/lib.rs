//! domain_alert library: domain-age risk engine
//!
//! For every page a user navigates to, this crate determines how recently the
//! site's registrable domain was registered, classifies the risk by age, and
//! drives a per-tab blinking indicator plus a dismissible warning overlay
//! until the user dismisses or whitelists the domain.
//!
//! The crate is host-agnostic: the indicator-set and tab-removal primitives
//! live behind the [`TabHost`] trait, overlay rendering behind
//! [`OverlaySurface`], and the two execution contexts (the shared coordinator
//! and the per-page sessions) only talk through typed messages over channels.
//!
//! # Example
//!
//! ```no_run
//! use domain_alert::{classify, resolve_registrable_domain, RdapClient, RegistryLookup};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registrable = resolve_registrable_domain("www.example.co.uk");
//! let client = RdapClient::new()?;
//! let registered = client.fetch("www.example.co.uk", &registrable).await?;
//! let days = (chrono::Utc::now() - registered).num_days();
//! println!("{registrable} is {days} days old ({:?})", classify(days as f64));
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! The coordinator and the RDAP client require a Tokio runtime. Use
//! `#[tokio::main]` in your application or ensure you're calling these APIs
//! within an async context.

#![warn(missing_docs)]

pub mod cache;
pub mod config;
pub mod coordinator;
pub mod page;
pub mod registry;
pub mod risk;
mod storage;
pub mod suffix;
pub mod whitelist;

// Re-export public API
pub use cache::{AgeCache, AgeCacheEntry};
pub use coordinator::{
    AlertCoordinator, CoordinatorMessage, FrameId, HostError, PageEvent, TabAlertState, TabHost,
    TabId, TOP_LEVEL_FRAME,
};
pub use page::{AgeInfo, AgeOutcome, OverlayContent, OverlaySurface, PageSession};
pub use registry::{RdapClient, RegistryError, RegistryLookup};
pub use risk::{classify, should_alert, IndicatorColor, RiskTier};
pub use suffix::resolve_registrable_domain;
pub use whitelist::WhitelistStore;
