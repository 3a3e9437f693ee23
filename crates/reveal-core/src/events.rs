//! Reveal lifecycle events.
//!
//! Sequencers record what happened during each `observe`/`advance` call;
//! hosts poll the queue afterwards. Per-step counter ticks are not events,
//! only the transitions a renderer would care about.
//!
//! ```ignore
//! host.advance(Duration::from_millis(16));
//! for event in host.drain_events() {
//!     if let RevealEvent::CounterCompleted { label, value, .. } = event {
//!         println!("{label} settled at {value}");
//!     }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::types::{ContainerId, ItemId};

/// Something that happened to a container or one of its items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RevealEvent {
    /// Visibility crossed the threshold; the entrance fade starts and the
    /// settle delay begins.
    Entered { container: ContainerId, at_ms: u64 },
    /// The settle delay elapsed; item delays start counting.
    Activated { container: ContainerId, at_ms: u64 },
    /// An item's delay elapsed and it became visible.
    ItemRevealed {
        container: ContainerId,
        item: ItemId,
        label: String,
        at_ms: u64,
    },
    /// A counter reached its target.
    CounterCompleted {
        container: ContainerId,
        item: ItemId,
        label: String,
        value: f64,
        at_ms: u64,
    },
    /// The container was destroyed; outstanding timers were cancelled.
    TornDown {
        container: ContainerId,
        cancelled_timers: usize,
    },
}

impl RevealEvent {
    pub fn container(&self) -> ContainerId {
        match self {
            Self::Entered { container, .. }
            | Self::Activated { container, .. }
            | Self::ItemRevealed { container, .. }
            | Self::CounterCompleted { container, .. }
            | Self::TornDown { container, .. } => *container,
        }
    }

    /// The item this event concerns, if it is item-level.
    pub fn item(&self) -> Option<ItemId> {
        match self {
            Self::ItemRevealed { item, .. } | Self::CounterCompleted { item, .. } => Some(*item),
            _ => None,
        }
    }

    pub fn is_activation(&self) -> bool {
        matches!(self, Self::Activated { .. })
    }
}

/// FIFO of events awaiting the host.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<RevealEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: RevealEvent) {
        self.events.push_back(event);
    }

    /// Move every event from `other` onto the back of this queue.
    pub fn append(&mut self, other: &mut EventQueue) {
        self.events.append(&mut other.events);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn pop(&mut self) -> Option<RevealEvent> {
        self.events.pop_front()
    }

    pub fn peek(&self) -> Option<&RevealEvent> {
        self.events.front()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = RevealEvent> + '_ {
        self.events.drain(..)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Pending events for one container, oldest first.
    pub fn events_for(&self, container: ContainerId) -> Vec<&RevealEvent> {
        self.events
            .iter()
            .filter(|e| e.container() == container)
            .collect()
    }
}
