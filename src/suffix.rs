//! Registrable-domain extraction (effective TLD + 1).
//!
//! The registrable domain is the unit a registrant can actually register
//! under a public suffix ("example.co.uk", not "www.example.co.uk" or
//! "co.uk"). It is the key for both the age cache and the whitelist, so
//! extraction must be deterministic and normalization must happen here.

use std::collections::HashSet;
use std::sync::OnceLock;

/// Compiled-in public-suffix set. A curated subset of the public suffix
/// list: the common gTLDs plus the multi-label country suffixes seen in
/// practice. Hostnames under suffixes missing from this table go through the
/// last-two-labels fallback in [`resolve_registrable_domain`].
const PUBLIC_SUFFIXES: &[&str] = &[
    // Generic TLDs
    "com", "net", "org", "edu", "gov", "mil", "int", "info", "biz", "name", "pro", "io", "co",
    "ai", "app", "dev", "xyz", "online", "site", "top", "shop", "store", "blog", "cloud", "tech",
    "me", "tv", "cc", "ws", "mobi",
    // Country TLDs
    "us", "uk", "de", "fr", "it", "nl", "es", "pt", "gr", "pl", "cz", "at", "be", "ch", "dk",
    "no", "se", "fi", "ie", "ru", "ua", "jp", "kr", "cn", "in", "au", "nz", "br", "ar", "mx",
    "ca", "za", "il", "tr", "sg", "hk", "tw", "eu", "is", "sk", "hu", "ro", "bg", "lt", "lv",
    "ee", "tk", "ml", "ga", "cf",
    // Multi-label public suffixes
    "co.uk", "org.uk", "net.uk", "ac.uk", "gov.uk", "me.uk", "ltd.uk", "plc.uk",
    "com.au", "net.au", "org.au", "edu.au", "gov.au",
    "co.jp", "ne.jp", "or.jp", "ac.jp", "go.jp",
    "co.kr", "or.kr", "com.cn", "net.cn", "org.cn", "gov.cn",
    "co.in", "net.in", "org.in", "ac.in",
    "com.br", "net.br", "org.br", "gov.br",
    "com.mx", "org.mx", "com.ar", "com.sg", "com.hk", "com.tw",
    "co.za", "org.za", "co.nz", "org.nz", "co.il", "org.il",
    "com.tr", "com.ua", "com.ru", "com.pl",
];

fn suffix_set() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| PUBLIC_SUFFIXES.iter().copied().collect())
}

/// Extracts the registrable domain (effective TLD + 1) from a hostname.
///
/// The hostname is lower-cased and a single trailing dot is stripped.
/// Candidate suffixes are scanned from longest to shortest; the first one
/// found in the public-suffix set wins and the result is that suffix plus
/// the one label preceding it.
///
/// When no candidate matches, the last two labels are returned as a
/// best-effort fallback. For unknown multi-label TLDs this can place the
/// registrable boundary too high; the subsequent registry lookup will then
/// fail visibly rather than silently caching a wrong entry under a good key.
///
/// Single-label inputs (including the empty string) are returned unchanged:
/// hostname validation is the caller's job, not the resolver's.
pub fn resolve_registrable_domain(hostname: &str) -> String {
    let clean = hostname
        .strip_suffix('.')
        .unwrap_or(hostname)
        .to_lowercase();
    let labels: Vec<&str> = clean.split('.').collect();

    if labels.len() <= 1 {
        return clean;
    }

    let suffixes = suffix_set();
    for take in (1..labels.len()).rev() {
        let candidate = labels[labels.len() - take..].join(".");
        if suffixes.contains(candidate.as_str()) {
            // Effective TLD found; keep exactly one label in front of it.
            return labels[labels.len() - take - 1..].join(".");
        }
    }

    let fallback = labels[labels.len() - 2..].join(".");
    log::debug!("Unknown eTLD for {hostname}, falling back to {fallback}");
    fallback
}
