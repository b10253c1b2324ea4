//! Animated statistic counter.
//!
//! The displayed value climbs from zero to the target in fixed ticks once the
//! counter first becomes visible. Step `k` of `n` shows
//! `min(target, target * k / n)` (integer division), so the value never
//! decreases, never overshoots, and reaches the target on the last tick.

use std::time::Duration;

/// Total animation time.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(2000);

/// Interval between display updates.
pub const DEFAULT_TICK: Duration = Duration::from_millis(16);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Waiting,
    Running { step: u64 },
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counter {
    target: u64,
    steps: u64,
    tick: Duration,
    phase: Phase,
}

impl Counter {
    pub fn new(target: u64) -> Self {
        Self::with_timing(target, DEFAULT_DURATION, DEFAULT_TICK)
    }

    pub fn with_timing(target: u64, duration: Duration, tick: Duration) -> Self {
        let tick_ms = tick.as_millis().max(1);
        let steps = (duration.as_millis() / tick_ms).max(1) as u64;
        Self {
            target,
            steps,
            tick,
            phase: Phase::Waiting,
        }
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    /// Number of ticks the animation takes.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick
    }

    /// The element scrolled into view. Starts the animation the first time
    /// only; returns whether it started.
    pub fn on_visible(&mut self) -> bool {
        if self.phase != Phase::Waiting {
            return false;
        }
        self.phase = if self.target == 0 {
            Phase::Done
        } else {
            Phase::Running { step: 0 }
        };
        true
    }

    /// Advance one tick and return the new displayed value.
    pub fn tick(&mut self) -> u64 {
        if let Phase::Running { step } = self.phase {
            let step = step + 1;
            self.phase = if step >= self.steps {
                Phase::Done
            } else {
                Phase::Running { step }
            };
        }
        self.value()
    }

    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    /// Value currently displayed.
    pub fn value(&self) -> u64 {
        match self.phase {
            Phase::Waiting => 0,
            Phase::Running { step } => self.value_at_step(step),
            Phase::Done => self.target,
        }
    }

    /// Value shown after `step` ticks.
    pub fn value_at_step(&self, step: u64) -> u64 {
        let scaled = (self.target as u128 * step as u128 / self.steps as u128) as u64;
        scaled.min(self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_to_150_in_2000ms_of_16ms_ticks() {
        let mut counter = Counter::new(150);
        assert_eq!(counter.steps(), 125);
        assert!(counter.on_visible());

        let mut last = counter.value();
        assert_eq!(last, 0);
        let mut ticks = 0;
        while !counter.is_done() {
            let value = counter.tick();
            ticks += 1;
            assert!(value >= last, "value went backwards at tick {ticks}");
            assert!(value <= 150);
            last = value;
        }
        assert_eq!(last, 150);
        assert!(counter.tick_interval() * ticks <= DEFAULT_DURATION);
    }

    #[test]
    fn does_not_run_until_visible() {
        let mut counter = Counter::new(50);
        assert_eq!(counter.tick(), 0);
        assert!(!counter.is_done());
    }

    #[test]
    fn never_retriggers() {
        let mut counter = Counter::new(10);
        assert!(counter.on_visible());
        while !counter.is_done() {
            counter.tick();
        }
        assert!(!counter.on_visible());
        assert_eq!(counter.value(), 10);
    }

    #[test]
    fn zero_target_finishes_immediately() {
        let mut counter = Counter::new(0);
        counter.on_visible();
        assert!(counter.is_done());
        assert_eq!(counter.value(), 0);
    }

    #[test]
    fn intermediate_values_follow_the_linear_ramp() {
        let counter = Counter::new(150);
        assert_eq!(counter.value_at_step(1), 1);
        assert_eq!(counter.value_at_step(5), 6);
        assert_eq!(counter.value_at_step(62), 74);
        assert_eq!(counter.value_at_step(125), 150);
        assert_eq!(counter.value_at_step(500), 150);
    }
}
