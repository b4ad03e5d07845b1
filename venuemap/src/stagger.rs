//! Entry animation staggering.
//!
//! Owned by the container that renders a batch of items and handed out in
//! render order, so sibling animations start slightly apart. Each container
//! keeps its own counter; there is no process-wide state.

use std::time::Duration;

/// Default delay between consecutive entry animations.
pub const DEFAULT_STAGGER_STEP: Duration = Duration::from_millis(30);

/// Default upper bound on any single entry delay.
pub const DEFAULT_STAGGER_MAX: Duration = Duration::from_millis(300);

/// Incrementing counter producing entry delays.
#[derive(Debug, Clone)]
pub struct StaggerCounter {
    next: u32,
    step: Duration,
    max_delay: Duration,
}

impl StaggerCounter {
    pub fn new(step: Duration, max_delay: Duration) -> Self {
        Self {
            next: 0,
            step,
            max_delay,
        }
    }

    /// Delay for the next item, then advance.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.step.saturating_mul(self.next).min(self.max_delay);
        self.next = self.next.saturating_add(1);
        delay
    }

    /// Restart at zero for a new batch.
    pub fn reset(&mut self) {
        self.next = 0;
    }
}

impl Default for StaggerCounter {
    fn default() -> Self {
        Self::new(DEFAULT_STAGGER_STEP, DEFAULT_STAGGER_MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delays_increase_by_step_and_cap() {
        let mut counter = StaggerCounter::new(Duration::from_millis(100), Duration::from_millis(250));
        assert_eq!(counter.next_delay(), Duration::ZERO);
        assert_eq!(counter.next_delay(), Duration::from_millis(100));
        assert_eq!(counter.next_delay(), Duration::from_millis(200));
        assert_eq!(counter.next_delay(), Duration::from_millis(250));
    }

    #[test]
    fn test_counters_are_independent() {
        let mut a = StaggerCounter::default();
        let mut b = StaggerCounter::default();
        a.next_delay();
        a.next_delay();
        assert_eq!(b.next_delay(), Duration::ZERO);

        a.reset();
        assert_eq!(a.next_delay(), Duration::ZERO);
    }
}
