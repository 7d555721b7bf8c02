//! Idle keepalive timing.

use std::{ops::Sub, time::Duration};

/// Idle time after which a keepalive is sent.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);

/// Tracks the last socket activity. Generic over the instant type so
/// simulation can drive it with virtual time.
#[derive(Debug, Clone, Copy)]
pub struct Heartbeat<I> {
    last_activity: I,
    interval: Duration,
}

impl<I> Heartbeat<I>
where
    I: Copy + Ord + Sub<Output = Duration>,
{
    /// Start the idle timer at `now`.
    pub fn new(now: I, interval: Duration) -> Self {
        Self { last_activity: now, interval }
    }

    /// Record activity at `now`. Instants older than the last one are
    /// ignored.
    pub fn touch(&mut self, now: I) {
        if now > self.last_activity {
            self.last_activity = now;
        }
    }

    /// Whether the idle interval has passed since the last activity.
    pub fn is_due(&self, now: I) -> bool {
        now > self.last_activity && now - self.last_activity >= self.interval
    }

    /// When activity was last seen.
    pub fn last_activity(&self) -> I {
        self.last_activity
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    #[test]
    fn due_after_interval() {
        let start = Instant::now();
        let heartbeat = Heartbeat::new(start, HEARTBEAT_INTERVAL);

        assert!(!heartbeat.is_due(start));
        assert!(!heartbeat.is_due(start + Duration::from_secs(19)));
        assert!(heartbeat.is_due(start + HEARTBEAT_INTERVAL));
    }

    #[test]
    fn touch_resets_timer() {
        let start = Instant::now();
        let mut heartbeat = Heartbeat::new(start, HEARTBEAT_INTERVAL);

        heartbeat.touch(start + Duration::from_secs(15));
        assert!(!heartbeat.is_due(start + Duration::from_secs(25)));
        assert!(heartbeat.is_due(start + Duration::from_secs(35)));

        heartbeat.touch(start);
        assert_eq!(heartbeat.last_activity(), start + Duration::from_secs(15));
    }
}
