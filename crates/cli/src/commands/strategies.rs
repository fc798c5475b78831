//! `sgr strategies` — list the registered step strategies.

use sgr_agent::StrategyRegistry;

pub fn run() {
    let registry = StrategyRegistry::with_defaults();
    println!();
    println!("  Available strategies:");
    for name in registry.names() {
        println!("    - {name}");
    }
    println!();
}
