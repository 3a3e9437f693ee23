/// Example program to print the loaded configuration
///
/// Run with: cargo run -p reveal-config --example print_config

fn main() {
    // Load configuration from reveal.toml plus REVEAL_* overrides
    let config = reveal_config::RevealConfig::load();

    println!("=== Reveal Configuration ===\n");

    println!("Trigger Settings:");
    println!("  Threshold: {}", config.trigger.threshold);
    println!("  Root Margin: {}px", config.trigger.root_margin_px);
    println!("  Settle Delay: {}ms", config.trigger.settle_delay_ms);
    println!("  Entrance: {}ms", config.trigger.entrance_ms);
    println!();

    println!("Counter Settings:");
    println!("  Duration: {}ms", config.counter.duration_ms);
    println!("  Steps: {}", config.counter.step_count);
    println!();

    println!("Fade Settings:");
    println!("  Duration: {}ms", config.fade.duration_ms);
    println!();

    println!("Demo Settings:");
    println!("  Frame: {}ms", config.demo.frame_ms);
    println!("  Scroll Step: {}px", config.demo.scroll_step_px);
    println!("  Sequence Path: {:?}", config.demo.sequence_path);
    println!();

    match toml::to_string_pretty(&config) {
        Ok(toml_str) => {
            println!("=== Serialized Configuration ===");
            println!("{}", toml_str);
        }
        Err(e) => {
            eprintln!("Failed to serialize config: {}", e);
        }
    }
}
