//! One-shot visibility trigger.
//!
//! ```text
//! Pending ──ratio ≥ threshold──▶ Settling ──settle delay──▶ Activated
//! ```
//!
//! There is no way back: once a sample crosses the threshold the container
//! is committed to activating, and later samples are ignored.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Result, RevealError};

/// Where a container is in its activation lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum TriggerPhase {
    /// Waiting for the first sufficiently visible sample.
    Pending,
    /// Threshold crossed at `since`; waiting out the settle delay.
    Settling { since: Duration },
    /// Items may run. Entered exactly once.
    Activated { at: Duration },
}

/// Result of feeding one visibility sample to the trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// Nothing changed.
    Ignored,
    /// This sample crossed the threshold; the settle delay starts now.
    Crossed,
}

/// Threshold gate with a single allowed transition path.
#[derive(Debug, Clone)]
pub struct ActivationTrigger {
    threshold: f64,
    phase: TriggerPhase,
}

impl ActivationTrigger {
    /// Create a trigger. Fails if `threshold` is NaN or outside [0, 1].
    pub fn new(threshold: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(RevealError::InvalidThreshold(threshold));
        }
        Ok(Self {
            threshold,
            phase: TriggerPhase::Pending,
        })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn phase(&self) -> TriggerPhase {
        self.phase
    }

    /// True once the threshold has been crossed, including while settling.
    pub fn has_crossed(&self) -> bool {
        !matches!(self.phase, TriggerPhase::Pending)
    }

    pub fn is_activated(&self) -> bool {
        matches!(self.phase, TriggerPhase::Activated { .. })
    }

    /// Feed a visibility ratio sampled at `now`.
    ///
    /// Ratios are clamped to [0, 1]; NaN samples are ignored.
    pub fn observe(&mut self, ratio: f64, now: Duration) -> TriggerOutcome {
        if ratio.is_nan() || self.has_crossed() {
            return TriggerOutcome::Ignored;
        }
        if ratio.clamp(0.0, 1.0) >= self.threshold {
            self.phase = TriggerPhase::Settling { since: now };
            TriggerOutcome::Crossed
        } else {
            TriggerOutcome::Ignored
        }
    }

    /// Finish the settle delay. Returns `true` only for the one call that
    /// actually activates.
    pub fn settle(&mut self, now: Duration) -> bool {
        match self.phase {
            TriggerPhase::Settling { .. } => {
                self.phase = TriggerPhase::Activated { at: now };
                true
            }
            TriggerPhase::Pending | TriggerPhase::Activated { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_rejects_bad_threshold() {
        assert!(ActivationTrigger::new(-0.1).is_err());
        assert!(ActivationTrigger::new(1.1).is_err());
        assert!(ActivationTrigger::new(f64::NAN).is_err());
        assert!(ActivationTrigger::new(0.0).is_ok());
        assert!(ActivationTrigger::new(1.0).is_ok());
    }

    #[test]
    fn test_below_threshold_stays_pending() {
        let mut trigger = ActivationTrigger::new(0.3).unwrap();
        for ratio in [0.0, 0.1, 0.29, 0.2999] {
            assert_eq!(trigger.observe(ratio, ms(5)), TriggerOutcome::Ignored);
        }
        assert_eq!(trigger.phase(), TriggerPhase::Pending);
        assert!(!trigger.settle(ms(10)));
    }

    #[test]
    fn test_crossing_is_inclusive() {
        let mut trigger = ActivationTrigger::new(0.3).unwrap();
        assert_eq!(trigger.observe(0.3, ms(40)), TriggerOutcome::Crossed);
        assert_eq!(trigger.phase(), TriggerPhase::Settling { since: ms(40) });
    }

    #[test]
    fn test_single_transition() {
        let mut trigger = ActivationTrigger::new(0.3).unwrap();
        trigger.observe(0.8, ms(0));

        // Leaving and re-entering while settling changes nothing.
        assert_eq!(trigger.observe(0.0, ms(100)), TriggerOutcome::Ignored);
        assert_eq!(trigger.observe(1.0, ms(200)), TriggerOutcome::Ignored);

        assert!(trigger.settle(ms(300)));
        assert!(!trigger.settle(ms(301)));
        assert_eq!(trigger.phase(), TriggerPhase::Activated { at: ms(300) });

        assert_eq!(trigger.observe(1.0, ms(900)), TriggerOutcome::Ignored);
        assert!(trigger.is_activated());
    }

    #[test]
    fn test_nan_and_out_of_range_samples() {
        let mut trigger = ActivationTrigger::new(1.0).unwrap();
        assert_eq!(trigger.observe(f64::NAN, ms(0)), TriggerOutcome::Ignored);
        assert_eq!(trigger.observe(3.0, ms(0)), TriggerOutcome::Crossed);
    }
}
