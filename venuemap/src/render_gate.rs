//! Per-marker render gate.
//!
//! The native map view re-rasterizes a custom marker view every frame while
//! its "tracks view changes" flag is set. Leaving it on for every marker
//! collapses the frame rate past a few dozen markers; turning it off while an
//! entry or emphasis animation is still running freezes the marker
//! mid-animation. The gate therefore opens for a bounded window when the
//! marker first appears or its emphasis changes, and is closed otherwise.
//!
//! The window must be at least as long as the marker animation; that is
//! enforced when building [`RenderGateConfig`].

use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::warn;

/// Default re-measure window after appearance or emphasis change.
pub const DEFAULT_RENDER_WINDOW: Duration = Duration::from_millis(800);

/// Default duration of marker entry/emphasis animations.
pub const DEFAULT_MARKER_ANIMATION: Duration = Duration::from_millis(300);

/// Recommended bounds for the render window.
pub const RECOMMENDED_RENDER_WINDOW_MIN: Duration = Duration::from_millis(500);
pub const RECOMMENDED_RENDER_WINDOW_MAX: Duration = Duration::from_millis(1000);

/// Errors building a render gate configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderGateError {
    /// The gate would close while the animation is still running.
    #[error(
        "Render window of {window_ms}ms is shorter than the marker animation ({animation_ms}ms)"
    )]
    WindowTooShort { window_ms: u64, animation_ms: u64 },
}

/// Validated render gate timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderGateConfig {
    window: Duration,
    animation: Duration,
}

impl RenderGateConfig {
    /// # Errors
    ///
    /// Returns [`RenderGateError::WindowTooShort`] if `window < animation`.
    pub fn new(window: Duration, animation: Duration) -> Result<Self, RenderGateError> {
        if window < animation {
            return Err(RenderGateError::WindowTooShort {
                window_ms: window.as_millis() as u64,
                animation_ms: animation.as_millis() as u64,
            });
        }
        let config = Self { window, animation };
        if !config.is_window_recommended() {
            warn!(
                window_ms = window.as_millis() as u64,
                min_ms = RECOMMENDED_RENDER_WINDOW_MIN.as_millis() as u64,
                max_ms = RECOMMENDED_RENDER_WINDOW_MAX.as_millis() as u64,
                "Render window outside the recommended range"
            );
        }
        Ok(config)
    }

    /// Whether the window lies within 500-1000 ms.
    pub fn is_window_recommended(&self) -> bool {
        (RECOMMENDED_RENDER_WINDOW_MIN..=RECOMMENDED_RENDER_WINDOW_MAX).contains(&self.window)
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn animation(&self) -> Duration {
        self.animation
    }
}

impl Default for RenderGateConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_RENDER_WINDOW,
            animation: DEFAULT_MARKER_ANIMATION,
        }
    }
}

/// Re-measure flag owned by a single marker.
#[derive(Debug, Clone)]
pub struct MarkerRenderGate {
    window: Duration,
    open_until: Instant,
    emphasized: bool,
}

impl MarkerRenderGate {
    /// Gate for a marker that just appeared. Opens immediately.
    pub fn appeared(config: &RenderGateConfig, emphasized: bool, now: Instant) -> Self {
        Self {
            window: config.window,
            open_until: now + config.window,
            emphasized,
        }
    }

    /// Updates the emphasis (selection) state, reopening the gate on change.
    ///
    /// Returns `true` if the state changed.
    pub fn set_emphasis(&mut self, emphasized: bool, now: Instant) -> bool {
        if self.emphasized == emphasized {
            return false;
        }
        self.emphasized = emphasized;
        self.open_until = now + self.window;
        true
    }

    /// Whether the map view may re-measure this marker right now.
    #[inline]
    pub fn allows_remeasure(&self, now: Instant) -> bool {
        now < self.open_until
    }

    /// When the gate closes, if it is still open at `now`.
    pub fn closes_at(&self, now: Instant) -> Option<Instant> {
        self.allows_remeasure(now).then_some(self.open_until)
    }

    pub fn is_emphasized(&self) -> bool {
        self.emphasized
    }
}
