//! Risk classification by domain age.

use std::fmt;

use crate::config::{RED_MAX_AGE_DAYS, YELLOW_MAX_AGE_DAYS};

/// Risk tier for a domain age. The derived order is by severity: RED is the
/// most severe, GREEN the least.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RiskTier {
    /// Registered within the last year.
    Red,
    /// Registered between one and three years ago, or age unknown.
    Yellow,
    /// Registered more than three years ago, or whitelisted.
    Green,
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RiskTier::Red => "RED",
            RiskTier::Yellow => "YELLOW",
            RiskTier::Green => "GREEN",
        };
        write!(f, "{name}")
    }
}

/// Indicator color shown on a tab, including the non-alerting default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorColor {
    /// The neutral indicator (no alert state).
    Default,
    /// Green indicator.
    Green,
    /// Yellow indicator.
    Yellow,
    /// Red indicator.
    Red,
}

impl From<RiskTier> for IndicatorColor {
    fn from(tier: RiskTier) -> Self {
        match tier {
            RiskTier::Red => IndicatorColor::Red,
            RiskTier::Yellow => IndicatorColor::Yellow,
            RiskTier::Green => IndicatorColor::Green,
        }
    }
}

/// Maps an age in days to a risk tier.
///
/// Boundaries are inclusive on the more severe side: exactly 365 days is
/// still RED, exactly 1095 days is still YELLOW.
pub fn classify(days: f64) -> RiskTier {
    if days <= RED_MAX_AGE_DAYS {
        RiskTier::Red
    } else if days <= YELLOW_MAX_AGE_DAYS {
        RiskTier::Yellow
    } else {
        RiskTier::Green
    }
}

/// Whether a tier warrants alerting the user (blinking indicator + overlay).
pub fn should_alert(tier: RiskTier) -> bool {
    matches!(tier, RiskTier::Red | RiskTier::Yellow)
}
