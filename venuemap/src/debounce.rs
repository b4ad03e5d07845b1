//! Viewport change debouncing.
//!
//! Map views report a stream of region changes while the user pans or zooms.
//! Issuing a search for each intermediate frame is wasteful, so the
//! debouncer waits for the gesture to finish and then for a short quiet
//! period before emitting a single settled viewport.
//!
//! # State Machine
//!
//! ```text
//! Idle     --start / in-progress-->  Changing   (pending emission cancelled)
//! Changing --complete(region)----->  Pending    (due = now + quiet_period)
//! Pending  --start / in-progress-->  Changing   (pending emission cancelled)
//! Pending  --poll(now >= due)----->  Idle       (emit region)
//! ```
//!
//! The debouncer owns no timer. The host calls [`ViewportDebouncer::poll`]
//! when [`ViewportDebouncer::deadline`] passes; the async session does this
//! with `tokio::time::sleep_until`.
//!
//! If the map never reports a completion the debouncer never emits. That is
//! accepted as a silent no-op.

use std::time::{Duration, Instant};

use serde::Deserialize;
use tracing::{debug, trace};

use crate::geo::Region;

/// Default quiet period after a gesture completes.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(150);

/// Region-change notifications from the map surface.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "type", content = "region", rename_all = "snake_case")]
pub enum ViewportEvent {
    /// A pan/zoom gesture began.
    ChangeStarted,
    /// Intermediate frame of an ongoing gesture.
    Changing(Region),
    /// The gesture ended on this region.
    ChangeCompleted(Region),
}

#[derive(Debug, Clone, Copy)]
struct PendingEmission {
    region: Region,
    due: Instant,
}

/// Turns a stream of [`ViewportEvent`]s into settled viewports.
#[derive(Debug, Clone)]
pub struct ViewportDebouncer {
    quiet_period: Duration,
    changing: bool,
    /// Latest completed region, updated synchronously on completion.
    current: Region,
    pending: Option<PendingEmission>,
    last_emitted: Option<Region>,
}

impl ViewportDebouncer {
    pub fn new(initial: Region, quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            changing: false,
            current: initial,
            pending: None,
            last_emitted: None,
        }
    }

    /// Feeds one map event.
    pub fn handle(&mut self, event: ViewportEvent, now: Instant) {
        match event {
            ViewportEvent::ChangeStarted | ViewportEvent::Changing(_) => {
                if !self.changing {
                    trace!("Viewport gesture started");
                }
                self.changing = true;
                if self.pending.take().is_some() {
                    debug!("Pending viewport emission cancelled by new gesture");
                }
            }
            ViewportEvent::ChangeCompleted(region) => {
                self.current = region;
                self.changing = false;
                self.pending = Some(PendingEmission {
                    region,
                    due: now + self.quiet_period,
                });
                trace!(
                    latitude = region.latitude,
                    longitude = region.longitude,
                    longitude_delta = region.longitude_delta,
                    quiet_ms = self.quiet_period.as_millis() as u64,
                    "Viewport change completed, emission scheduled"
                );
            }
        }
    }

    /// Emits the settled viewport once its quiet period has elapsed.
    ///
    /// Returns `None` while a gesture is in progress, before the deadline,
    /// or when the region equals the one emitted last.
    pub fn poll(&mut self, now: Instant) -> Option<Region> {
        if self.changing {
            return None;
        }
        let pending = self.pending?;
        if now < pending.due {
            return None;
        }
        self.pending = None;

        if self.last_emitted == Some(pending.region) {
            trace!("Settled viewport unchanged, emission suppressed");
            return None;
        }

        self.last_emitted = Some(pending.region);
        debug!(
            latitude = pending.region.latitude,
            longitude = pending.region.longitude,
            longitude_delta = pending.region.longitude_delta,
            "Viewport settled"
        );
        Some(pending.region)
    }

    /// Drops the record of the last emitted region so the next settle on it
    /// emits again. Used when the search for that region failed.
    pub fn forget_emitted(&mut self) {
        self.last_emitted = None;
    }

    /// When the pending emission becomes due, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|p| p.due)
    }

    /// Latest completed region. Fresh as soon as a completion arrives, before
    /// any emission.
    pub fn current_region(&self) -> Region {
        self.current
    }

    pub fn is_changing(&self) -> bool {
        self.changing
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoPoint;

    fn region(lat: f64) -> Region {
        Region::around(GeoPoint::new(lat, 44.5), 0.02)
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn debouncer() -> ViewportDebouncer {
        ViewportDebouncer::new(region(0.0), DEFAULT_QUIET_PERIOD)
    }

    #[test]
    fn test_single_emission_after_gesture() {
        let t0 = Instant::now();
        let mut d = debouncer();

        d.handle(ViewportEvent::ChangeStarted, t0);
        for i in 1..=5 {
            d.handle(ViewportEvent::Changing(region(i as f64)), t0 + ms(i * 10));
        }
        d.handle(ViewportEvent::ChangeCompleted(region(9.0)), t0 + ms(60));

        assert!(d.poll(t0 + ms(100)).is_none(), "Quiet period not elapsed");
        assert_eq!(d.poll(t0 + ms(210)), Some(region(9.0)));
        assert!(d.poll(t0 + ms(400)).is_none(), "Must not emit twice");
    }

    #[test]
    fn test_new_gesture_cancels_pending_emission() {
        let t0 = Instant::now();
        let mut d = debouncer();

        d.handle(ViewportEvent::ChangeCompleted(region(1.0)), t0);
        d.handle(ViewportEvent::ChangeStarted, t0 + ms(100));
        assert!(d.deadline().is_none());
        assert!(d.poll(t0 + ms(200)).is_none());

        d.handle(ViewportEvent::ChangeCompleted(region(2.0)), t0 + ms(300));
        assert!(d.poll(t0 + ms(449)).is_none());
        assert_eq!(d.poll(t0 + ms(450)), Some(region(2.0)));
    }

    #[test]
    fn test_never_emits_while_changing() {
        let t0 = Instant::now();
        let mut d = debouncer();

        d.handle(ViewportEvent::ChangeStarted, t0);
        assert!(d.poll(t0 + ms(10_000)).is_none());
        assert!(d.is_changing());
    }

    #[test]
    fn test_current_region_is_fresh_before_emission() {
        let t0 = Instant::now();
        let mut d = debouncer();

        d.handle(ViewportEvent::ChangeCompleted(region(3.0)), t0);
        assert_eq!(d.current_region(), region(3.0));
        assert_eq!(d.deadline(), Some(t0 + DEFAULT_QUIET_PERIOD));
    }

    #[test]
    fn test_in_progress_frames_do_not_move_current_region() {
        let t0 = Instant::now();
        let mut d = debouncer();

        d.handle(ViewportEvent::Changing(region(7.0)), t0);
        assert_eq!(d.current_region(), region(0.0));
    }

    #[test]
    fn test_identical_settled_region_is_suppressed() {
        let t0 = Instant::now();
        let mut d = debouncer();

        d.handle(ViewportEvent::ChangeCompleted(region(1.0)), t0);
        assert!(d.poll(t0 + ms(150)).is_some());

        d.handle(ViewportEvent::ChangeStarted, t0 + ms(200));
        d.handle(ViewportEvent::ChangeCompleted(region(1.0)), t0 + ms(250));
        assert!(d.poll(t0 + ms(500)).is_none());
    }

    #[test]
    fn test_forgotten_region_emits_again() {
        let t0 = Instant::now();
        let mut d = debouncer();

        d.handle(ViewportEvent::ChangeCompleted(region(1.0)), t0);
        assert!(d.poll(t0 + ms(150)).is_some());
        d.forget_emitted();

        d.handle(ViewportEvent::ChangeStarted, t0 + ms(200));
        d.handle(ViewportEvent::ChangeCompleted(region(1.0)), t0 + ms(250));
        assert_eq!(d.poll(t0 + ms(400)), Some(region(1.0)));
    }

    #[test]
    fn test_missing_completion_never_emits() {
        let t0 = Instant::now();
        let mut d = debouncer();

        d.handle(ViewportEvent::Changing(region(1.0)), t0);
        d.handle(ViewportEvent::Changing(region(2.0)), t0 + ms(16));
        assert!(d.deadline().is_none());
        assert!(d.poll(t0 + ms(5_000)).is_none());
    }

    #[test]
    fn test_event_deserializes_from_tagged_json() {
        let event: ViewportEvent = serde_json::from_str(
            r#"{"type": "change_completed", "region": {"latitude": 1.0, "longitude": 2.0, "latitudeDelta": 0.1, "longitudeDelta": 0.1}}"#,
        )
        .unwrap();
        assert!(matches!(event, ViewportEvent::ChangeCompleted(_)));

        let start: ViewportEvent = serde_json::from_str(r#"{"type": "change_started"}"#).unwrap();
        assert_eq!(start, ViewportEvent::ChangeStarted);
    }
}
