//! Overlay data contract between the engine and the rendering surface.

use crate::risk::RiskTier;

/// What the rendering surface should show. Rendering itself (DOM, CSS,
/// buttons) is out of scope; this is the full data contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayContent {
    /// Message text: the formatted age, or the lookup error.
    pub text: String,
    /// Visual severity. UNKNOWN outcomes render as YELLOW.
    pub severity: RiskTier,
    /// Optional external lookup link (shown for failed lookups).
    pub link: Option<String>,
    /// Show the "get me out of here" affordance.
    pub show_exit: bool,
    /// Show the "don't warn me again on this site" affordance.
    pub show_whitelist: bool,
}

/// Rendering surface for the warning overlay.
///
/// The engine guarantees at most one overlay per page: `show` is never
/// called while an overlay is visible.
pub trait OverlaySurface {
    /// Presents the overlay.
    fn show(&mut self, content: OverlayContent);

    /// Removes the overlay if present.
    fn dismiss(&mut self);

    /// Whether an overlay is currently presented.
    fn is_visible(&self) -> bool;
}
