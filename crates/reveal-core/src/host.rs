//! Reveal host: the explicit, once-per-page entry point.
//!
//! A page creates one `RevealHost` during setup and mounts a container for
//! each staged reveal it renders. The host routes visibility samples and
//! clock ticks to its containers and gathers their events; each container's
//! state stays private to its own sequencer.

use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, warn};

use reveal_config::RevealConfig;

use super::error::{Result, RevealError};
use super::events::{EventQueue, RevealEvent};
use super::sequencer::RevealSequencer;
use super::trigger::ActivationTrigger;
use super::types::{ContainerId, RevealSequence};
use super::visibility::{Rect, VisibilitySource};

/// Owner of every mounted reveal container on a page.
#[derive(Debug)]
pub struct RevealHost {
    config: RevealConfig,
    containers: BTreeMap<ContainerId, RevealSequencer>,
    events: EventQueue,
}

impl RevealHost {
    /// Initialise the host. Fails if the configured threshold is invalid.
    pub fn new(config: RevealConfig) -> Result<Self> {
        ActivationTrigger::new(config.trigger.threshold)?;
        debug!(
            threshold = config.trigger.threshold,
            root_margin_px = config.trigger.root_margin_px,
            settle_delay_ms = config.trigger.settle_delay_ms,
            "reveal host initialised"
        );
        Ok(Self {
            config,
            containers: BTreeMap::new(),
            events: EventQueue::new(),
        })
    }

    pub fn config(&self) -> &RevealConfig {
        &self.config
    }

    /// Mount a container for `sequence`.
    pub fn mount(&mut self, sequence: &RevealSequence) -> Result<ContainerId> {
        let id = ContainerId::new();
        let sequencer = RevealSequencer::new(id, sequence, &self.config)?;
        self.containers.insert(id, sequencer);
        Ok(id)
    }

    /// Tear down and discard a container, returning how many of its timers
    /// were still pending.
    pub fn unmount(&mut self, id: ContainerId) -> Result<usize> {
        let mut sequencer = self
            .containers
            .remove(&id)
            .ok_or(RevealError::UnknownContainer(id))?;
        let cancelled = sequencer.teardown();
        sequencer.forward_events(&mut self.events);
        Ok(cancelled)
    }

    /// Feed a visibility ratio to one container. Unknown ids are ignored.
    pub fn observe(&mut self, id: ContainerId, ratio: f64) {
        match self.containers.get_mut(&id) {
            Some(sequencer) => {
                sequencer.observe(ratio);
                sequencer.forward_events(&mut self.events);
            }
            None => warn!(container = %id, "visibility sample for unmounted container"),
        }
    }

    /// Sample every laid-out container from `source`.
    ///
    /// Containers missing from `layout` are not sampled.
    pub fn observe_all<S>(&mut self, source: &S, layout: &[(ContainerId, Rect)])
    where
        S: VisibilitySource + ?Sized,
    {
        for (id, rect) in layout {
            let ratio = source.visibility_ratio(rect);
            self.observe(*id, ratio);
        }
    }

    /// Advance every container's clock by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        for sequencer in self.containers.values_mut() {
            sequencer.advance(dt);
            sequencer.forward_events(&mut self.events);
        }
    }

    pub fn container(&self, id: ContainerId) -> Option<&RevealSequencer> {
        self.containers.get(&id)
    }

    pub fn containers(&self) -> impl Iterator<Item = &RevealSequencer> {
        self.containers.values()
    }

    pub fn container_count(&self) -> usize {
        self.containers.len()
    }

    /// True while any container still has timers outstanding.
    pub fn has_pending_work(&self) -> bool {
        self.containers.values().any(|c| c.pending_timers() > 0)
    }

    /// True once every mounted container has activated and finished.
    pub fn all_settled(&self) -> bool {
        self.containers.values().all(RevealSequencer::is_settled)
    }

    pub fn drain_events(&mut self) -> impl Iterator<Item = RevealEvent> + '_ {
        self.events.drain()
    }

    pub fn pending_event_count(&self) -> usize {
        self.events.len()
    }

    /// Tear down every container.
    pub fn clear(&mut self) {
        for (_, mut sequencer) in std::mem::take(&mut self.containers) {
            sequencer.teardown();
            sequencer.forward_events(&mut self.events);
        }
    }
}

static_assertions::assert_impl_all!(RevealHost: Send);
