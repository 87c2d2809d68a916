//! Wall-clock to simulation-time conversion.

use std::time::Duration;

use kingdom_core::constants::MAX_FRAME_DELTA_SECS;

/// Turns a stream of wall-clock instants into frame deltas.
///
/// While paused every delta is zero. After a resume the next instant only
/// re-baselines the clock, so time spent paused never becomes progress.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<Duration>,
    paused: bool,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous instant, clamped to `MAX_FRAME_DELTA_SECS`.
    pub fn delta(&mut self, now: Duration) -> f64 {
        let previous = self.last.replace(now);
        if self.paused {
            return 0.0;
        }
        match previous {
            Some(previous) => now
                .saturating_sub(previous)
                .as_secs_f64()
                .min(MAX_FRAME_DELTA_SECS),
            None => 0.0,
        }
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
        self.last = None;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_first_instant_is_baseline() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.delta(ms(5_000)), 0.0);
        assert!((clock.delta(ms(5_100)) - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_large_gap_is_clamped() {
        let mut clock = FrameClock::new();
        clock.delta(ms(0));
        assert_eq!(clock.delta(ms(3_000)), MAX_FRAME_DELTA_SECS);
    }

    #[test]
    fn test_paused_span_is_not_progress() {
        let mut clock = FrameClock::new();
        clock.delta(ms(0));
        clock.delta(ms(100));
        clock.pause();
        assert_eq!(clock.delta(ms(200)), 0.0);
        assert_eq!(clock.delta(ms(60_000)), 0.0);
        clock.resume();
        assert_eq!(clock.delta(ms(60_050)), 0.0);
        assert!((clock.delta(ms(60_100)) - 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_time_going_backwards_is_zero() {
        let mut clock = FrameClock::new();
        clock.delta(ms(500));
        assert_eq!(clock.delta(ms(400)), 0.0);
    }
}
