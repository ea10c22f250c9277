//! Idle / Running Animation Blend
//!
//! This example drives a two-state locomotion machine the way a game loop
//! would, crossfading between an idle and a running pose.
//!
//! Key concepts:
//! - Guards on active time and on pushed events
//! - Linear and eased blends over several ticks
//! - Host object reachable from state hooks
//! - Structured logs from the machine via `tracing`
//!
//! Run with: RUST_LOG=crossfade=debug cargo run --example idle_running

use crossfade::builder::StateMachineBuilder;
use crossfade::core::{Guard, ManualClock, State, StateContext};
use crossfade::easing::Ease;
use crossfade::machine::{StateMachine, Tick};
use crossfade::state_tag;
use crossfade::transitions::Transition;
use crossfade::MachineOptions;
use tracing_subscriber::EnvFilter;

state_tag! {
    enum Locomotion {
        Idle,
        Running,
    }
}

#[derive(Debug, PartialEq)]
enum Input {
    Stop,
}

/// What the renderer would read each frame.
#[derive(Default)]
struct Pose {
    idle: f32,
    running: f32,
}

struct Animated;

impl State<Locomotion, Pose> for Animated {
    fn on_update(&mut self, ctx: &mut StateContext<'_, Locomotion, Pose>) {
        let weight = ctx.weight();
        match ctx.tag() {
            Locomotion::Idle => ctx.host_mut().idle = weight,
            Locomotion::Running => ctx.host_mut().running = weight,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=== Idle / Running Blend ===\n");

    let clock = ManualClock::new();
    let mut machine: StateMachine<Locomotion, Input, Pose> = StateMachineBuilder::new(Pose::default())
        .options(MachineOptions::named("player-locomotion"))
        .state(Locomotion::Idle, Animated)
        .state(Locomotion::Running, Animated)
        .clock(clock.source())
        .transitions(vec![
            Transition::blended(Locomotion::Idle, Locomotion::Running)
                .guarded(Guard::after(2.0))
                .lasting(1.0),
            Transition::new(Locomotion::Running, Locomotion::Idle)
                .guarded(Guard::on_event(|input: &Input| *input == Input::Stop))
                .with_blend(Ease::EaseOutCubic)
                .lasting(0.5),
        ])
        .build()
        .unwrap();

    let frame = 0.25;
    for tick in 0..24 {
        if tick == 16 {
            println!("  -- player releases the stick --");
            machine.push_event(Input::Stop);
        }

        let outcome = machine.update().unwrap();
        let pose = machine.host();
        let label = match outcome {
            Tick::Stayed(state) => format!("{state:?}"),
            Tick::Transitioning { from, to } => format!("{from:?} -> {to:?}"),
            Tick::Changed { from, to } => format!("{from:?} => {to:?} (done)"),
        };
        println!(
            "t={:>5.2}s  idle={:.2} running={:.2}  {}",
            clock.now(),
            pose.idle,
            pose.running,
            label
        );

        clock.advance(frame);
    }

    println!("\nPath: {:?}", machine.history().get_path());
    println!("\n=== Example Complete ===");
}
