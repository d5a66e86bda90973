//! Fixed-step tick scheduling
//!
//! The host feeds wall-clock time into [`FixedStep::advance`] and runs the
//! returned number of ticks. Game-owned one-shot timers are [`Delay`]s,
//! counted down by the owning game once per tick.

use std::time::Duration;

use crate::consts::MAX_SUBSTEPS;

/// Accumulator that turns elapsed time into whole ticks
#[derive(Debug, Clone)]
pub struct FixedStep {
    interval: Duration,
    accumulator: Duration,
    running: bool,
    max_substeps: u32,
}

impl FixedStep {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            accumulator: Duration::ZERO,
            running: false,
            max_substeps: MAX_SUBSTEPS,
        }
    }

    pub fn with_max_substeps(mut self, max_substeps: u32) -> Self {
        self.max_substeps = max_substeps.max(1);
        self
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self) {
        self.running = true;
        self.accumulator = Duration::ZERO;
    }

    /// Stop producing ticks. Safe to call repeatedly.
    pub fn stop(&mut self) {
        self.running = false;
        self.accumulator = Duration::ZERO;
    }

    /// Add elapsed time and return how many ticks are due
    ///
    /// At most `max_substeps` ticks are returned per call; any backlog
    /// beyond that is dropped to prevent a spiral of death.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if !self.running || self.interval.is_zero() {
            return 0;
        }
        self.accumulator = self.accumulator.saturating_add(elapsed);

        let mut steps = 0;
        while self.accumulator >= self.interval && steps < self.max_substeps {
            self.accumulator -= self.interval;
            steps += 1;
        }
        if steps == self.max_substeps && self.accumulator >= self.interval {
            log::trace!("Dropping {:?} of tick backlog", self.accumulator);
            self.accumulator = Duration::ZERO;
        }
        steps
    }
}

/// One-shot timer carrying the action it will release
#[derive(Debug, Clone, PartialEq)]
pub struct Delay<T> {
    remaining: Duration,
    payload: Option<T>,
}

impl<T> Delay<T> {
    pub fn new(after: Duration, payload: T) -> Self {
        Self {
            remaining: after,
            payload: Some(payload),
        }
    }

    /// Count down; yields the payload exactly once when the timer expires
    pub fn poll(&mut self, elapsed: Duration) -> Option<T> {
        self.payload.as_ref()?;
        self.remaining = self.remaining.saturating_sub(elapsed);
        if self.remaining.is_zero() {
            self.payload.take()
        } else {
            None
        }
    }

    pub fn cancel(&mut self) {
        self.payload = None;
    }

    pub fn is_pending(&self) -> bool {
        self.payload.is_some()
    }

    pub fn payload(&self) -> Option<&T> {
        self.payload.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS16: Duration = Duration::from_millis(16);

    #[test]
    fn test_advance_accumulates() {
        let mut step = FixedStep::new(MS16);
        assert_eq!(step.advance(Duration::from_millis(100)), 0);

        step.start();
        assert_eq!(step.advance(Duration::from_millis(10)), 0);
        assert_eq!(step.advance(Duration::from_millis(10)), 1);
        assert_eq!(step.advance(Duration::from_millis(28)), 2);
    }

    #[test]
    fn test_advance_caps_substeps() {
        let mut step = FixedStep::new(MS16).with_max_substeps(8);
        step.start();
        assert_eq!(step.advance(Duration::from_secs(2)), 8);
        // Backlog was dropped, not replayed
        assert_eq!(step.advance(Duration::ZERO), 0);
    }

    #[test]
    fn test_advance_saturates_huge_elapsed() {
        let mut step = FixedStep::new(MS16).with_max_substeps(8);
        step.start();
        assert_eq!(step.advance(Duration::from_millis(5)), 0);
        assert_eq!(step.advance(Duration::MAX), 8);
        assert_eq!(step.advance(Duration::ZERO), 0);
        assert_eq!(step.advance(MS16), 1);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut step = FixedStep::new(MS16);
        step.start();
        step.stop();
        step.stop();
        assert!(!step.is_running());
        assert_eq!(step.advance(Duration::from_millis(50)), 0);
    }

    #[test]
    fn test_delay_fires_once() {
        let mut delay = Delay::new(Duration::from_millis(48), 7u32);
        assert_eq!(delay.poll(MS16), None);
        assert_eq!(delay.poll(MS16), None);
        assert_eq!(delay.poll(MS16), Some(7));
        assert_eq!(delay.poll(MS16), None);
        assert!(!delay.is_pending());
    }

    #[test]
    fn test_delay_cancel() {
        let mut delay = Delay::new(Duration::from_millis(16), "serve");
        delay.cancel();
        assert_eq!(delay.poll(Duration::from_secs(1)), None);
    }
}
