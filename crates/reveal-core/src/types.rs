//! Core reveal types and data structures.
//!
//! - `ContainerId` / `ItemId`: identifiers for mounted containers and their items
//! - `RevealItem`: one animated element, either a numeric counter or a fade-in
//! - `RevealSequence`: the ordered list of items released by one container

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use reveal_config::CounterConfig;

use crate::error::{Result, RevealError};

/// Unique identifier for a mounted container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContainerId(pub u64);

impl ContainerId {
    /// Generate a new unique container ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ContainerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Position of an item within its sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub usize);

/// Timing and display settings for a numeric counter.
///
/// `duration_ms` and `step_count` fall back to the configured counter
/// defaults when unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterSpec {
    pub target_value: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_count: Option<u32>,
}

impl CounterSpec {
    /// Duration and step count with config defaults filled in.
    pub fn resolve(&self, defaults: &CounterConfig) -> (Duration, u32) {
        (
            Duration::from_millis(self.duration_ms.unwrap_or(defaults.duration_ms)),
            self.step_count.unwrap_or(defaults.step_count),
        )
    }
}

/// What an item does once its delay has elapsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemKind {
    /// Count up from zero to a target value.
    NumericCounter(CounterSpec),
    /// Become visible, once.
    FadeIn,
}

/// One animated element of a reveal sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevealItem {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Offset from activation, not from the previous item.
    #[serde(default)]
    pub delay_ms: u64,
    pub kind: ItemKind,
}

impl RevealItem {
    /// A counter that counts up to `target_value` and renders with `unit`.
    pub fn counter(label: impl Into<String>, target_value: f64, unit: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            color: None,
            delay_ms: 0,
            kind: ItemKind::NumericCounter(CounterSpec {
                target_value,
                unit: unit.into(),
                duration_ms: None,
                step_count: None,
            }),
        }
    }

    /// A one-way fade-in.
    pub fn fade_in(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            color: None,
            delay_ms: 0,
            kind: ItemKind::FadeIn,
        }
    }

    pub fn with_delay_ms(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Override the counter duration. Ignored for fade-ins.
    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        if let ItemKind::NumericCounter(spec) = &mut self.kind {
            spec.duration_ms = Some(duration_ms);
        }
        self
    }

    /// Override the counter step count. Ignored for fade-ins.
    pub fn with_step_count(mut self, step_count: u32) -> Self {
        if let ItemKind::NumericCounter(spec) = &mut self.kind {
            spec.step_count = Some(step_count);
        }
        self
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn is_counter(&self) -> bool {
        matches!(self.kind, ItemKind::NumericCounter(_))
    }
}

/// Ordered list of items released by one container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RevealSequence {
    pub items: Vec<RevealItem>,
}

impl RevealSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item (builder style).
    pub fn with(mut self, item: RevealItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn push(&mut self, item: RevealItem) {
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ItemId, &RevealItem)> {
        self.items.iter().enumerate().map(|(i, item)| (ItemId(i), item))
    }

    /// Check every counter against the given defaults.
    ///
    /// Targets must be finite and non-negative; resolved durations and step
    /// counts must be positive, and each step must last at least a nanosecond.
    pub fn validate(&self, defaults: &CounterConfig) -> Result<()> {
        for (index, item) in self.items.iter().enumerate() {
            let ItemKind::NumericCounter(spec) = &item.kind else {
                continue;
            };
            if !spec.target_value.is_finite() || spec.target_value < 0.0 {
                return Err(RevealError::InvalidTarget {
                    index,
                    label: item.label.clone(),
                    value: spec.target_value,
                });
            }
            let (duration, steps) = spec.resolve(defaults);
            if duration.is_zero() {
                return Err(RevealError::ZeroDuration {
                    index,
                    label: item.label.clone(),
                });
            }
            if steps == 0 {
                return Err(RevealError::ZeroSteps {
                    index,
                    label: item.label.clone(),
                });
            }
            if (duration / steps).is_zero() {
                return Err(RevealError::StepsExceedDuration {
                    index,
                    label: item.label.clone(),
                    steps,
                    duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
                });
            }
        }
        Ok(())
    }

    /// Latest moment, measured from activation, at which any item can still change.
    pub fn settle_time(&self, defaults: &CounterConfig) -> Duration {
        self.items
            .iter()
            .map(|item| match &item.kind {
                ItemKind::NumericCounter(spec) => item.delay() + spec.resolve(defaults).0,
                ItemKind::FadeIn => item.delay(),
            })
            .max()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_id_uniqueness() {
        let a = ContainerId::new();
        let b = ContainerId::new();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn test_counter_defaults_resolve_from_config() {
        let item = RevealItem::counter("Speed Index", 2.3, "s");
        let ItemKind::NumericCounter(spec) = &item.kind else {
            panic!("expected counter");
        };
        let (duration, steps) = spec.resolve(&CounterConfig::default());
        assert_eq!(duration, Duration::from_millis(1200));
        assert_eq!(steps, 50);

        let item = item.with_duration_ms(600).with_step_count(12);
        let ItemKind::NumericCounter(spec) = &item.kind else {
            panic!("expected counter");
        };
        assert_eq!(
            spec.resolve(&CounterConfig::default()),
            (Duration::from_millis(600), 12)
        );
    }

    #[test]
    fn test_counter_overrides_ignored_for_fade() {
        let item = RevealItem::fade_in("Forced reflow")
            .with_duration_ms(10)
            .with_step_count(3);
        assert_eq!(item.kind, ItemKind::FadeIn);
    }

    #[test]
    fn test_validate_rejects_bad_targets() {
        let defaults = CounterConfig::default();

        let negative = RevealSequence::new().with(RevealItem::counter("neg", -1.0, ""));
        assert!(matches!(
            negative.validate(&defaults),
            Err(RevealError::InvalidTarget { index: 0, .. })
        ));

        let nan = RevealSequence::new()
            .with(RevealItem::fade_in("ok"))
            .with(RevealItem::counter("nan", f64::NAN, ""));
        assert!(matches!(
            nan.validate(&defaults),
            Err(RevealError::InvalidTarget { index: 1, .. })
        ));

        let infinite = RevealSequence::new().with(RevealItem::counter("inf", f64::INFINITY, ""));
        assert!(infinite.validate(&defaults).is_err());
    }

    #[test]
    fn test_validate_rejects_sub_nanosecond_steps() {
        let defaults = CounterConfig::default();

        let too_fine = RevealSequence::new().with(
            RevealItem::counter("fine", 5.0, "")
                .with_duration_ms(1)
                .with_step_count(2_000_000),
        );
        assert!(matches!(
            too_fine.validate(&defaults),
            Err(RevealError::StepsExceedDuration {
                index: 0,
                steps: 2_000_000,
                duration_ms: 1,
                ..
            })
        ));

        // One nanosecond per step is still exact.
        let finest = RevealSequence::new().with(
            RevealItem::counter("finest", 5.0, "")
                .with_duration_ms(1)
                .with_step_count(1_000_000),
        );
        assert!(finest.validate(&defaults).is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_timing() {
        let defaults = CounterConfig::default();

        let zero_duration =
            RevealSequence::new().with(RevealItem::counter("a", 1.0, "").with_duration_ms(0));
        assert!(matches!(
            zero_duration.validate(&defaults),
            Err(RevealError::ZeroDuration { .. })
        ));

        let zero_steps =
            RevealSequence::new().with(RevealItem::counter("b", 1.0, "").with_step_count(0));
        assert!(matches!(
            zero_steps.validate(&defaults),
            Err(RevealError::ZeroSteps { .. })
        ));

        let bad_defaults = CounterConfig {
            duration_ms: 1200,
            step_count: 0,
        };
        let uses_defaults = RevealSequence::new().with(RevealItem::counter("c", 1.0, ""));
        assert!(uses_defaults.validate(&bad_defaults).is_err());
    }

    #[test]
    fn test_zero_target_is_valid() {
        let sequence = RevealSequence::new().with(RevealItem::counter("CLS", 0.0, ""));
        assert!(sequence.validate(&CounterConfig::default()).is_ok());
    }

    #[test]
    fn test_settle_time() {
        let sequence = RevealSequence::new()
            .with(RevealItem::counter("a", 1.0, "").with_delay_ms(1000))
            .with(RevealItem::fade_in("b").with_delay_ms(1500));
        assert_eq!(
            sequence.settle_time(&CounterConfig::default()),
            Duration::from_millis(2200)
        );
        assert_eq!(
            RevealSequence::new().settle_time(&CounterConfig::default()),
            Duration::ZERO
        );
    }

    #[test]
    fn test_sequence_json_shape() {
        let json = r##"{
            "items": [
                { "label": "TBT", "delay_ms": 600, "color": "#10b981",
                  "kind": { "type": "numeric_counter", "target_value": 10, "unit": "ms" } },
                { "label": "Insights", "kind": { "type": "fade_in" } }
            ]
        }"##;
        let sequence: RevealSequence = serde_json::from_str(json).unwrap();
        assert_eq!(sequence.len(), 2);
        assert_eq!(sequence.items[0].delay_ms, 600);
        assert!(sequence.items[0].is_counter());
        assert_eq!(sequence.items[1].delay_ms, 0);
        assert_eq!(sequence.items[1].kind, ItemKind::FadeIn);
    }
}
