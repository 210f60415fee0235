//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `domain_alert` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - User-facing output formatting
//!
//! It runs the lookup pipeline once for a single hostname: registrable
//! domain, cached or fresh registration date, age, and risk tier.

use anyhow::{Context, Result};
use clap::Parser;
use url::Url;

use domain_alert::config::{LogLevel, DEFAULT_CACHE_DIR};
use domain_alert::registry::known_registration_date;
use domain_alert::{
    classify, resolve_registrable_domain, should_alert, AgeCache, RdapClient, RegistryLookup,
};

#[derive(Parser, Debug)]
#[command(
    name = "domain-alert",
    about = "Look up a domain's registration age and risk tier"
)]
struct Opt {
    /// Hostname or URL to check
    target: String,

    /// Directory for the persistent age cache
    #[arg(long, default_value = DEFAULT_CACHE_DIR)]
    cache_dir: std::path::PathBuf,

    /// Skip the cache and query the registry directly
    #[arg(long)]
    no_cache: bool,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,
}

#[tokio::main]
async fn main() -> Result<()> {
    let opt = Opt::parse();

    env_logger::Builder::new()
        .filter_level(opt.log_level.into())
        .init();

    let hostname = parse_target(&opt.target)?;
    let registrable = resolve_registrable_domain(&hostname);
    println!("Registrable domain: {registrable}");

    let cache = AgeCache::new(&opt.cache_dir);

    let mut registered = known_registration_date(&registrable);
    if registered.is_none() && !opt.no_cache {
        registered = cache.get(&registrable).map(|entry| entry.registration_date);
    }
    let registered = match registered {
        Some(date) => date,
        None => {
            let client = RdapClient::new().context("Failed to build RDAP client")?;
            let date = client
                .fetch(&hostname, &registrable)
                .await
                .with_context(|| format!("Registry lookup failed for {registrable}"))?;
            if let Err(e) = cache.put(&registrable, date) {
                log::warn!("Failed to cache registration date for {registrable}: {e:#}");
            }
            date
        }
    };

    let days = (chrono::Utc::now() - registered).num_days();
    let tier = classify(days as f64);
    println!("Registered on:      {}", registered.format("%Y-%m-%d"));
    println!("Age:                {days} days");
    println!("Risk tier:          {tier}");
    if should_alert(tier) {
        println!("This domain was registered recently; treat it with caution.");
    }

    Ok(())
}

/// Accepts either a bare hostname or a full URL.
fn parse_target(target: &str) -> Result<String> {
    if let Ok(url) = Url::parse(target) {
        if let Some(host) = url.host_str() {
            return Ok(host.to_string());
        }
    }
    if target.is_empty() || target.contains('/') || target.contains(' ') {
        anyhow::bail!("Expected a hostname or URL, got {target:?}");
    }
    Ok(target.to_string())
}
