//! Traffic Light State Machine
//!
//! This example demonstrates a simple cyclic state machine.
//!
//! Key concepts:
//! - Cyclic state transitions (states repeat)
//! - Enum keys declared with `state_enum!`
//! - Anonymous machines: the transition argument names the next light
//! - Shared enter/exit hooks for every state
//!
//! Run with: cargo run --example traffic_light

use keyfsm::builder::FsmBuilder;
use keyfsm::engine::FsmKind;
use keyfsm::state_enum;

state_enum! {
    enum TrafficLight {
        Red,
        Yellow,
        Green,
    }
}

fn main() {
    println!("=== Traffic Light State Machine ===\n");

    let lights = FsmBuilder::new()
        .states(TrafficLight::ALL.iter().copied())
        .initial(TrafficLight::Red)
        .kind(FsmKind::Anonymous)
        .on_exit(|ctx| println!("  {} off", ctx.from))
        .on_enter(|ctx| println!("  {} on", ctx.to))
        .build()
        .unwrap();

    lights.initialize().unwrap();
    println!("Initial state: {}\n", lights.initial_state());

    let cycle = [
        TrafficLight::Green,
        TrafficLight::Yellow,
        TrafficLight::Red,
    ];

    for round in 1..=2 {
        println!("Round {}:", round);
        for light in cycle {
            lights.transition(&light).unwrap();
        }
    }

    // Switching to the light that is already on changes nothing.
    println!("\nRequesting Red while Red is on:");
    lights.transition(&TrafficLight::Red).unwrap();
    println!("  still {:?}", lights.current_state());

    println!("\nKey Characteristics:");
    println!("- No final state (cycles indefinitely)");
    println!("- Hooks observe every change of light");

    println!("\n=== Example Complete ===");
}
