//! Scroll-triggered staged reveals.
//!
//! This crate provides:
//! - **Trigger**: a one-shot visibility gate (`Pending → Settling → Activated`)
//! - **Scheduler**: cancellable delayed and periodic timers on a simulated clock
//! - **Sequencer**: per-container runtime that releases numeric counters and
//!   fade-ins at their configured offsets after activation
//! - **Host**: explicit page-level owner of every mounted container
//! - **Scrub**: values driven directly by scroll position
//!
//! # Architecture
//!
//! ```text
//! RevealHost
//!   └── RevealSequencer (one per container)
//!         ├── ActivationTrigger
//!         ├── TimerScheduler ── settle / item delay / counter tick timers
//!         └── items: CounterState | FadeState
//!
//! VisibilitySource ──ratio──▶ RevealHost::observe_all
//! ```

pub mod counter;
pub mod easing;
pub mod error;
pub mod events;
pub mod fade;
pub mod host;
pub mod presets;
pub mod scheduler;
pub mod scrub;
pub mod sequencer;
pub mod trigger;
pub mod types;
pub mod visibility;

pub use counter::CounterState;
pub use easing::EasingFunction;
pub use error::{Result, RevealError};
pub use events::{EventQueue, RevealEvent};
pub use fade::FadeState;
pub use host::RevealHost;
pub use scheduler::{TimerFiring, TimerId, TimerScheduler, TimerTarget};
pub use scrub::ScrollScrub;
pub use sequencer::{ItemFrame, ItemProgress, ItemRuntime, RevealSequencer};
pub use trigger::{ActivationTrigger, TriggerOutcome, TriggerPhase};
pub use types::{ContainerId, CounterSpec, ItemId, ItemKind, RevealItem, RevealSequence};
pub use visibility::{
    Rect, RootMargin, ScrolledViewport, Viewport, VisibilitySource, intersection_ratio,
};

pub use reveal_config::RevealConfig;
