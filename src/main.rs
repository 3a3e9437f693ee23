//! Replays a scroll session down the proposal page and prints what the
//! performance card's staged reveal shows along the way.
//!
//! Run with: `RUST_LOG=reveal_core=debug cargo run`

use anyhow::{Context, Result, bail};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use reveal_config::RevealConfig;
use reveal_core::presets::performance_report;
use reveal_core::{
    ContainerId, Rect, RevealEvent, RevealHost, RevealSequence, RevealSequencer, RootMargin,
    ScrollScrub, ScrolledViewport, Viewport,
};

const VIEWPORT_WIDTH: f64 = 1280.0;
const VIEWPORT_HEIGHT: f64 = 800.0;
const DOCUMENT_HEIGHT: f64 = 7200.0;
/// Where the performance card sits on the page.
const CARD: Rect = Rect {
    x: 320.0,
    y: 4600.0,
    width: 640.0,
    height: 520.0,
};
/// Simulated time to keep running once scrolling stops.
const TAIL: Duration = Duration::from_millis(3000);

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = RevealConfig::load();
    let sequence = load_sequence(&config)?;

    let mut host = RevealHost::new(config.clone())?;
    let card = host.mount(&sequence)?;
    let layout = [(card, CARD)];

    let mut viewport = ScrolledViewport::new(
        Viewport::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT),
        RootMargin::bottom(config.trigger.root_margin_px),
    );
    let gear = ScrollScrub::gear_rotation(DOCUMENT_HEIGHT, VIEWPORT_HEIGHT);
    let frame = Duration::from_millis(config.demo.frame_ms.max(1));
    let step = scroll_step(&config)?;
    // Stop with the card centred in the viewport.
    let resting_scroll = CARD.y + CARD.height / 2.0 - VIEWPORT_HEIGHT / 2.0;

    let mut scroll = 0.0;
    let mut elapsed = Duration::ZERO;
    let mut idle = Duration::ZERO;

    while idle < TAIL {
        if scroll < resting_scroll {
            scroll = (scroll + step).min(resting_scroll);
        } else {
            idle += frame;
        }
        viewport.scroll_to(scroll);
        host.observe_all(&viewport, &layout);
        host.advance(frame);
        elapsed += frame;

        for event in host.drain_events() {
            report_event(&event, elapsed, scroll, gear.value_at(scroll));
        }
    }

    let container = host
        .container(card)
        .context("performance card was unmounted mid-run")?;
    print_summary(container, card);

    let cancelled = host.unmount(card)?;
    info!(cancelled, "unmounted performance card");
    Ok(())
}

/// Pixels scrolled per frame; must make progress towards the card.
fn scroll_step(config: &RevealConfig) -> Result<f64> {
    let step = config.demo.scroll_step_px;
    if !step.is_finite() || step <= 0.0 {
        bail!("demo.scroll_step_px must be a positive number of pixels, got {step}");
    }
    Ok(step)
}

fn load_sequence(config: &RevealConfig) -> Result<RevealSequence> {
    match &config.demo.sequence_path {
        Some(path) => {
            let data = std::fs::read(path)
                .with_context(|| format!("failed to read sequence file {}", path.display()))?;
            serde_json::from_slice(&data)
                .with_context(|| format!("failed to parse sequence file {}", path.display()))
        }
        None => Ok(performance_report()),
    }
}

fn report_event(event: &RevealEvent, elapsed: Duration, scroll: f64, gear_deg: f64) {
    let t = elapsed.as_millis() as u64;
    match event {
        RevealEvent::Entered { .. } => {
            info!(t, scroll, gear_deg, "card entered the viewport");
        }
        RevealEvent::Activated { .. } => {
            info!(t, "reveal activated");
        }
        RevealEvent::ItemRevealed { label, .. } => {
            info!(t, %label, "item revealed");
        }
        RevealEvent::CounterCompleted { label, value, .. } => {
            info!(t, %label, value, "counter finished");
        }
        RevealEvent::TornDown {
            cancelled_timers, ..
        } => {
            info!(t, cancelled_timers, "card torn down");
        }
    }
}

fn print_summary(container: &RevealSequencer, id: ContainerId) {
    println!("=== Performance Analysis {id} ===");
    println!(
        "entrance opacity {:.2}, offset {:.1}px",
        container.entrance_opacity(),
        container.entrance_offset_px()
    );
    for item in container.frame() {
        match (item.text, item.fill) {
            (Some(text), Some(fill)) => {
                println!("  {:<28} {:>8}  {:>5.1}%", item.label, text, fill * 100.0)
            }
            _ => println!(
                "  {:<28} {}",
                item.label,
                if item.visible { "shown" } else { "hidden" }
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_step(step: f64) -> RevealConfig {
        let mut config = RevealConfig::default();
        config.demo.scroll_step_px = step;
        config
    }

    #[test]
    fn test_scroll_step_accepts_default() {
        let config = RevealConfig::default();
        assert_eq!(scroll_step(&config).unwrap(), config.demo.scroll_step_px);
    }

    #[test]
    fn test_scroll_step_rejects_stalled_scroll() {
        for step in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            assert!(scroll_step(&with_step(step)).is_err(), "step {step}");
        }
    }
}
