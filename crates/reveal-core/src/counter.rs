//! Runtime state for a numeric counter item.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A counter that climbs from zero to its target in equal steps.
///
/// The value after step `k` of `n` is `target * k / n`, so the final step
/// lands on the target exactly instead of accumulating rounding error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterState {
    target: f64,
    unit: String,
    duration: Duration,
    step_count: u32,
    steps_taken: u32,
    current: f64,
    visible: bool,
}

impl CounterState {
    /// Callers validate inputs; `step_count` must be non-zero and `target`
    /// finite and non-negative.
    pub fn new(target: f64, unit: impl Into<String>, duration: Duration, step_count: u32) -> Self {
        Self {
            target,
            unit: unit.into(),
            duration,
            step_count: step_count.max(1),
            steps_taken: 0,
            current: 0.0,
            visible: false,
        }
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn current_value(&self) -> f64 {
        self.current
    }

    pub fn steps_taken(&self) -> u32 {
        self.steps_taken
    }

    pub fn step_count(&self) -> u32 {
        self.step_count
    }

    /// Time between steps.
    pub fn interval(&self) -> Duration {
        self.duration / self.step_count
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_complete(&self) -> bool {
        self.visible && self.current == self.target
    }

    /// The item's delay has elapsed. Returns `true` if interval ticks are
    /// needed; a zero target is complete on reveal.
    pub fn reveal(&mut self) -> bool {
        self.visible = true;
        if self.target == 0.0 {
            self.steps_taken = self.step_count;
            return false;
        }
        true
    }

    /// Take one step. Returns `true` while more steps remain.
    pub fn step(&mut self) -> bool {
        if !self.visible || self.steps_taken >= self.step_count {
            return false;
        }
        self.steps_taken += 1;
        self.current = if self.steps_taken == self.step_count {
            self.target
        } else {
            (self.target * f64::from(self.steps_taken) / f64::from(self.step_count)).min(self.target)
        };
        self.steps_taken < self.step_count
    }

    /// Completion of the paired progress bar in [0, 1].
    ///
    /// Zero before reveal. A zero target reads as full from the moment it
    /// is revealed.
    pub fn fill(&self) -> f64 {
        if !self.visible {
            0.0
        } else if self.target == 0.0 {
            1.0
        } else {
            (self.current / self.target).min(1.0)
        }
    }

    /// Current value with the target's precision (whole targets show no
    /// decimals, fractional targets one) followed by the unit.
    pub fn display(&self) -> String {
        let decimals = if self.target.fract() == 0.0 { 0 } else { 1 };
        format!("{:.*}{}", decimals, self.current, self.unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter(target: f64, unit: &str) -> CounterState {
        CounterState::new(target, unit, Duration::from_millis(1200), 50)
    }

    fn run_to_end(state: &mut CounterState) -> u32 {
        let mut ticks = 0;
        if state.reveal() {
            loop {
                ticks += 1;
                if !state.step() {
                    break;
                }
            }
        }
        ticks
    }

    #[test]
    fn test_interval() {
        assert_eq!(counter(1.0, "").interval(), Duration::from_millis(24));
        let odd = CounterState::new(1.0, "", Duration::from_millis(1000), 3);
        assert!(odd.interval() * 3 <= Duration::from_millis(1000));
    }

    #[test]
    fn test_converges_exactly() {
        for target in [1.1, 1.9, 2.3, 10.0, 0.1, 123.456] {
            let mut state = counter(target, "s");
            assert_eq!(run_to_end(&mut state), 50);
            assert_eq!(state.current_value(), target);
            assert_eq!(state.fill(), 1.0);
            assert!(state.is_complete());
        }
    }

    #[test]
    fn test_non_decreasing() {
        let mut state = counter(1.9, "s");
        state.reveal();
        let mut last = state.current_value();
        while state.step() {
            assert!(state.current_value() >= last);
            assert!(state.current_value() <= 1.9);
            last = state.current_value();
        }
        assert!(state.current_value() >= last);
    }

    #[test]
    fn test_step_before_reveal_is_noop() {
        let mut state = counter(2.0, "");
        assert!(!state.step());
        assert_eq!(state.current_value(), 0.0);
        assert_eq!(state.fill(), 0.0);
    }

    #[test]
    fn test_step_after_completion_is_noop() {
        let mut state = counter(2.0, "");
        run_to_end(&mut state);
        assert!(!state.step());
        assert_eq!(state.steps_taken(), 50);
        assert_eq!(state.current_value(), 2.0);
    }

    #[test]
    fn test_zero_target() {
        let mut state = counter(0.0, "");
        assert_eq!(state.fill(), 0.0);
        assert!(!state.reveal());
        assert_eq!(state.fill(), 1.0);
        assert!(!state.fill().is_nan());
        assert!(state.is_complete());
        assert_eq!(state.display(), "0");
    }

    #[test]
    fn test_display_precision() {
        let mut lcp = counter(1.9, "s");
        assert_eq!(lcp.display(), "0.0s");
        run_to_end(&mut lcp);
        assert_eq!(lcp.display(), "1.9s");

        let mut tbt = counter(10.0, "ms");
        tbt.reveal();
        tbt.step();
        assert_eq!(tbt.display(), "0ms");
        run_to_end(&mut tbt);
        assert_eq!(tbt.display(), "10ms");
    }

    #[test]
    fn test_halfway_fill() {
        let mut state = CounterState::new(4.0, "", Duration::from_millis(100), 4);
        state.reveal();
        state.step();
        state.step();
        assert_eq!(state.current_value(), 2.0);
        assert_eq!(state.fill(), 0.5);
        assert_eq!(state.display(), "2");
    }
}
