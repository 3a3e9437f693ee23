//! Sequences used on the proposal page.

use crate::types::{RevealItem, RevealSequence};

const RED: &str = "#ef4444";
const AMBER: &str = "#f59e0b";
const GREEN: &str = "#10b981";

/// Metrics row of the "Performance Analysis" card.
pub fn performance_analysis() -> RevealSequence {
    RevealSequence::new()
        .with(
            RevealItem::counter("First Contentful Paint", 1.1, "s")
                .with_color(RED)
                .with_delay_ms(200),
        )
        .with(
            RevealItem::counter("Largest Contentful Paint", 1.9, "s")
                .with_color(AMBER)
                .with_delay_ms(400),
        )
        .with(
            RevealItem::counter("Total Blocking Time", 10.0, "ms")
                .with_color(GREEN)
                .with_delay_ms(600),
        )
        .with(
            RevealItem::counter("Cumulative Layout Shift", 0.0, "")
                .with_color(GREEN)
                .with_delay_ms(800),
        )
        .with(
            RevealItem::counter("Speed Index", 2.3, "s")
                .with_color(RED)
                .with_delay_ms(1000),
        )
}

/// Insight headings listed under the metrics row.
pub const INSIGHTS: [&str; 6] = [
    "Document request latency — Est savings of 550 ms",
    "Improve image delivery — Est savings of 100 KiB",
    "Use efficient cache lifetimes — Est savings of 22 KiB",
    "Render blocking requests — Est savings of 40 ms",
    "Forced reflow",
    "LCP request discovery",
];

/// Metrics followed by the insights as staged fade-ins, starting 1200ms
/// after activation and 100ms apart.
pub fn performance_report() -> RevealSequence {
    let mut sequence = performance_analysis();
    for (i, insight) in INSIGHTS.iter().enumerate() {
        sequence.push(
            RevealItem::fade_in(*insight)
                .with_color(AMBER)
                .with_delay_ms(1200 + 100 * i as u64),
        );
    }
    sequence
}
