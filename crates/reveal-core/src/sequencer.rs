//! Staged reveal sequencer for a single container.
//!
//! A `RevealSequencer` owns everything about one mounted container: its
//! activation trigger, its timers, and the runtime state of each item.
//! Nothing is shared between containers.
//!
//! # Lifecycle
//!
//! ```text
//! observe(ratio ≥ threshold) ─▶ Entered ─settle─▶ Activated ─┬─ item delay ─▶ revealed ─ticks─▶ complete
//!                                                            └─ ...one branch per item, all concurrent
//! teardown() ─▶ every pending timer cancelled, all further calls ignored
//! ```
//!
//! Item timers are only created by the activation itself, never ahead of it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, trace};

use reveal_config::RevealConfig;

use super::counter::CounterState;
use super::easing::EasingFunction;
use super::error::Result;
use super::events::{EventQueue, RevealEvent};
use super::fade::{FadeState, transition_progress};
use super::scheduler::{TimerFiring, TimerId, TimerScheduler, TimerTarget};
use super::trigger::{ActivationTrigger, TriggerOutcome, TriggerPhase};
use super::types::{ContainerId, ItemId, ItemKind, RevealSequence};

/// Vertical offset the container slides up from while entering.
pub const ENTRANCE_OFFSET_PX: f64 = 16.0;

/// Per-item animation state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemProgress {
    Counter(CounterState),
    Fade(FadeState),
}

/// One item of a mounted sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRuntime {
    id: ItemId,
    label: String,
    color: Option<String>,
    delay: Duration,
    progress: ItemProgress,
}

impl ItemRuntime {
    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn progress(&self) -> &ItemProgress {
        &self.progress
    }

    pub fn counter(&self) -> Option<&CounterState> {
        match &self.progress {
            ItemProgress::Counter(counter) => Some(counter),
            ItemProgress::Fade(_) => None,
        }
    }

    pub fn is_visible(&self) -> bool {
        match &self.progress {
            ItemProgress::Counter(counter) => counter.is_visible(),
            ItemProgress::Fade(fade) => fade.is_visible(),
        }
    }

    /// Counter value; `None` for fade-ins.
    pub fn current_value(&self) -> Option<f64> {
        self.counter().map(CounterState::current_value)
    }

    /// Counter bar fill; `None` for fade-ins.
    pub fn fill(&self) -> Option<f64> {
        self.counter().map(CounterState::fill)
    }

    /// Formatted counter text; `None` for fade-ins.
    pub fn display(&self) -> Option<String> {
        self.counter().map(CounterState::display)
    }

    fn is_finished(&self) -> bool {
        match &self.progress {
            ItemProgress::Counter(counter) => counter.is_complete(),
            ItemProgress::Fade(fade) => fade.is_visible(),
        }
    }
}

/// Render-ready snapshot of one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemFrame {
    pub id: ItemId,
    pub label: String,
    pub color: Option<String>,
    pub visible: bool,
    pub opacity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<f64>,
}

/// Drives one container's reveal, exactly once.
#[derive(Debug)]
pub struct RevealSequencer {
    container: ContainerId,
    items: Vec<ItemRuntime>,
    trigger: ActivationTrigger,
    timers: TimerScheduler,
    /// Outstanding delay or tick timer per item.
    item_timers: HashMap<ItemId, TimerId>,
    settle_delay: Duration,
    entrance_duration: Duration,
    fade_duration: Duration,
    easing: EasingFunction,
    entered_at: Option<Duration>,
    torn_down: bool,
    mutations: u64,
    events: EventQueue,
}

impl RevealSequencer {
    /// Build the runtime state for `sequence`.
    ///
    /// Rejects thresholds outside [0, 1], negative or non-finite counter
    /// targets, and counters with zero duration or steps.
    pub fn new(
        container: ContainerId,
        sequence: &RevealSequence,
        config: &RevealConfig,
    ) -> Result<Self> {
        let trigger = ActivationTrigger::new(config.trigger.threshold)?;
        sequence.validate(&config.counter)?;

        let items = sequence
            .iter()
            .map(|(id, item)| {
                let progress = match &item.kind {
                    ItemKind::NumericCounter(spec) => {
                        let (duration, steps) = spec.resolve(&config.counter);
                        ItemProgress::Counter(CounterState::new(
                            spec.target_value,
                            spec.unit.clone(),
                            duration,
                            steps,
                        ))
                    }
                    ItemKind::FadeIn => ItemProgress::Fade(FadeState::new()),
                };
                ItemRuntime {
                    id,
                    label: item.label.clone(),
                    color: item.color.clone(),
                    delay: item.delay(),
                    progress,
                }
            })
            .collect::<Vec<_>>();

        debug!(
            container = %container,
            items = items.len(),
            threshold = config.trigger.threshold,
            "mounted reveal sequence"
        );

        Ok(Self {
            container,
            items,
            trigger,
            timers: TimerScheduler::new(),
            item_timers: HashMap::new(),
            settle_delay: Duration::from_millis(config.trigger.settle_delay_ms),
            entrance_duration: Duration::from_millis(config.trigger.entrance_ms),
            fade_duration: Duration::from_millis(config.fade.duration_ms),
            easing: EasingFunction::STANDARD,
            entered_at: None,
            torn_down: false,
            mutations: 0,
            events: EventQueue::new(),
        })
    }

    /// Use a different curve for the entrance and fade transitions.
    pub fn with_easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    // ========================================================================
    // Driving
    // ========================================================================

    /// Feed a visibility sample taken at the current clock value.
    pub fn observe(&mut self, ratio: f64) {
        if self.torn_down {
            return;
        }
        let now = self.timers.now();
        if self.trigger.observe(ratio, now) != TriggerOutcome::Crossed {
            return;
        }

        self.entered_at = Some(now);
        self.mutations += 1;
        self.timers.schedule_once(self.settle_delay, TimerTarget::Settle);
        self.events.push(RevealEvent::Entered {
            container: self.container,
            at_ms: millis(now),
        });
        debug!(container = %self.container, ratio, at_ms = millis(now), "reveal threshold crossed");
    }

    /// Advance the clock by `dt`, running every timer that comes due,
    /// including timers created by earlier firings in the same window.
    pub fn advance(&mut self, dt: Duration) {
        if self.torn_down {
            return;
        }
        let until = self.timers.now() + dt;
        while let Some(firing) = self.timers.fire_next(until) {
            self.dispatch(firing);
        }
        self.timers.advance_to(until);
    }

    /// Cancel every outstanding timer and stop accepting input.
    ///
    /// Returns how many timers were cancelled. Calling it again is a no-op.
    pub fn teardown(&mut self) -> usize {
        if self.torn_down {
            return 0;
        }
        self.torn_down = true;
        let cancelled = self.timers.cancel_all();
        self.item_timers.clear();
        self.events.push(RevealEvent::TornDown {
            container: self.container,
            cancelled_timers: cancelled,
        });
        debug!(container = %self.container, cancelled, "reveal container torn down");
        cancelled
    }

    fn dispatch(&mut self, firing: TimerFiring) {
        match firing.target {
            TimerTarget::Settle => self.activate(firing.at),
            TimerTarget::ItemDelay(id) => self.reveal_item(id, firing.at),
            TimerTarget::ItemTick(id) => self.tick_item(id, firing.at),
        }
    }

    fn activate(&mut self, at: Duration) {
        if !self.trigger.settle(at) {
            return;
        }
        self.mutations += 1;
        self.events.push(RevealEvent::Activated {
            container: self.container,
            at_ms: millis(at),
        });
        debug!(container = %self.container, at_ms = millis(at), "reveal activated");

        for item in &self.items {
            let timer = self
                .timers
                .schedule_once(item.delay, TimerTarget::ItemDelay(item.id));
            self.item_timers.insert(item.id, timer);
        }
    }

    fn reveal_item(&mut self, id: ItemId, at: Duration) {
        self.item_timers.remove(&id);
        let Some(item) = self.items.get_mut(id.0) else {
            return;
        };
        self.mutations += 1;

        let needs_ticks = match &mut item.progress {
            ItemProgress::Counter(counter) => {
                let ticking = counter.reveal();
                ticking.then(|| counter.interval())
            }
            ItemProgress::Fade(fade) => {
                fade.show(at);
                None
            }
        };

        self.events.push(RevealEvent::ItemRevealed {
            container: self.container,
            item: id,
            label: item.label.clone(),
            at_ms: millis(at),
        });
        trace!(container = %self.container, item = id.0, label = %item.label, "item revealed");

        match needs_ticks {
            Some(interval) => {
                let timer = self.timers.schedule_every(interval, TimerTarget::ItemTick(id));
                self.item_timers.insert(id, timer);
            }
            None => {
                if let ItemProgress::Counter(counter) = &item.progress {
                    self.events.push(RevealEvent::CounterCompleted {
                        container: self.container,
                        item: id,
                        label: item.label.clone(),
                        value: counter.current_value(),
                        at_ms: millis(at),
                    });
                }
            }
        }
    }

    fn tick_item(&mut self, id: ItemId, at: Duration) {
        let Some(item) = self.items.get_mut(id.0) else {
            return;
        };
        let ItemProgress::Counter(counter) = &mut item.progress else {
            return;
        };
        self.mutations += 1;
        let running = counter.step();
        trace!(
            container = %self.container,
            item = id.0,
            value = counter.current_value(),
            "counter step"
        );
        if running {
            return;
        }

        let value = counter.current_value();
        if let Some(timer) = self.item_timers.remove(&id) {
            self.timers.cancel(timer);
        }
        self.events.push(RevealEvent::CounterCompleted {
            container: self.container,
            item: id,
            label: item.label.clone(),
            value,
            at_ms: millis(at),
        });
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn container(&self) -> ContainerId {
        self.container
    }

    pub fn phase(&self) -> TriggerPhase {
        self.trigger.phase()
    }

    pub fn is_entered(&self) -> bool {
        self.trigger.has_crossed()
    }

    pub fn is_activated(&self) -> bool {
        self.trigger.is_activated()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Activated and every item has reached its final state.
    pub fn is_settled(&self) -> bool {
        self.is_activated() && self.items.iter().all(ItemRuntime::is_finished)
    }

    /// Time since mount on this container's clock.
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    pub fn items(&self) -> &[ItemRuntime] {
        &self.items
    }

    pub fn item(&self, id: ItemId) -> Option<&ItemRuntime> {
        self.items.get(id.0)
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.pending_count()
    }

    /// Timer callbacks delivered so far.
    pub fn fired_timers(&self) -> u64 {
        self.timers.fired_count()
    }

    /// Number of state changes applied so far (trigger, reveals, steps).
    pub fn mutation_count(&self) -> u64 {
        self.mutations
    }

    /// Opacity of the container itself; it starts fading in at the raw
    /// trigger, before the settle delay.
    pub fn entrance_opacity(&self) -> f64 {
        match self.entered_at {
            None => 0.0,
            Some(start) => {
                transition_progress(start, self.now(), self.entrance_duration, self.easing)
            }
        }
    }

    /// Remaining upward slide of the container in pixels.
    pub fn entrance_offset_px(&self) -> f64 {
        ENTRANCE_OFFSET_PX * (1.0 - self.entrance_opacity())
    }

    /// Snapshot of every item for rendering.
    pub fn frame(&self) -> Vec<ItemFrame> {
        let now = self.now();
        self.items
            .iter()
            .map(|item| {
                let opacity = match &item.progress {
                    ItemProgress::Counter(_) => 1.0,
                    ItemProgress::Fade(fade) => fade.opacity(now, self.fade_duration, self.easing),
                };
                ItemFrame {
                    id: item.id,
                    label: item.label.clone(),
                    color: item.color.clone(),
                    visible: item.is_visible(),
                    opacity,
                    value: item.current_value(),
                    text: item.display(),
                    fill: item.fill(),
                }
            })
            .collect()
    }

    // ========================================================================
    // Events
    // ========================================================================

    pub fn drain_events(&mut self) -> impl Iterator<Item = RevealEvent> + '_ {
        self.events.drain()
    }

    pub fn pop_event(&mut self) -> Option<RevealEvent> {
        self.events.pop()
    }

    pub fn pending_event_count(&self) -> usize {
        self.events.len()
    }

    /// Hand pending events to an outer queue.
    pub(crate) fn forward_events(&mut self, into: &mut EventQueue) {
        into.append(&mut self.events);
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
