//! Gravity timer. The host feeds it elapsed time; when armed and due it asks for one tick.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct TickScheduler {
    interval: Duration,
    elapsed: Duration,
    armed: bool,
}

impl TickScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            elapsed: Duration::ZERO,
            armed: false,
        }
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    #[inline]
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Schedule the next tick one full interval from now.
    pub fn arm(&mut self) {
        self.armed = true;
        self.elapsed = Duration::ZERO;
    }

    /// Drop any pending tick.
    pub fn cancel(&mut self) {
        self.armed = false;
        self.elapsed = Duration::ZERO;
    }

    /// Advance by `dt`. Returns true when a tick is due; the next one is then a full interval away.
    /// At most one tick fires per call, however long the host stalled.
    pub fn advance(&mut self, dt: Duration) -> bool {
        if !self.armed {
            return false;
        }
        self.elapsed += dt;
        if self.elapsed >= self.interval {
            self.elapsed = Duration::ZERO;
            true
        } else {
            false
        }
    }

    /// Time left until the next tick, if one is pending.
    pub fn remaining(&self) -> Option<Duration> {
        self.armed
            .then(|| self.interval.saturating_sub(self.elapsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: Duration = Duration::from_millis(1000);

    #[test]
    fn idle_until_armed() {
        let mut s = TickScheduler::new(SECOND);
        assert!(!s.advance(SECOND * 5));
        assert_eq!(s.remaining(), None);
    }

    #[test]
    fn fires_once_per_interval() {
        let mut s = TickScheduler::new(SECOND);
        s.arm();
        assert!(!s.advance(Duration::from_millis(600)));
        assert_eq!(s.remaining(), Some(Duration::from_millis(400)));
        assert!(s.advance(Duration::from_millis(400)));
        assert!(!s.advance(Duration::from_millis(999)));
        assert!(s.advance(Duration::from_millis(1)));
    }

    #[test]
    fn long_stall_fires_once() {
        let mut s = TickScheduler::new(SECOND);
        s.arm();
        assert!(s.advance(SECOND * 10));
        assert!(!s.advance(Duration::ZERO));
    }

    #[test]
    fn cancel_drops_pending_tick() {
        let mut s = TickScheduler::new(SECOND);
        s.arm();
        s.advance(Duration::from_millis(900));
        s.cancel();
        assert!(!s.advance(SECOND));
        s.arm();
        assert!(!s.advance(Duration::from_millis(900)));
    }
}
