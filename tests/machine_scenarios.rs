//! End-to-end scenarios driving a machine with a manual clock.

use crossfade::builder::StateMachineBuilder;
use crossfade::core::{Guard, ManualClock, State, StateContext};
use crossfade::machine::{MachineError, StateMachine, Tick};
use crossfade::state_tag;
use crossfade::transitions::Transition;
use crossfade::BuildError;
use std::sync::{Arc, Mutex};

state_tag! {
    enum Mode {
        Idle,
        Running,
        Jumping,
    }
}

#[derive(Debug, PartialEq)]
enum Input {
    Jump,
    Land,
}

/// Counts `on_update` calls per state in the host.
#[derive(Default)]
struct Counters {
    updates: [u32; 3],
}

struct Counting;

impl State<Mode, Counters> for Counting {
    fn on_update(&mut self, ctx: &mut StateContext<'_, Mode, Counters>) {
        let index = ctx.tag() as usize;
        ctx.host_mut().updates[index] += 1;
    }
}

fn machine(clock: &ManualClock) -> StateMachine<Mode, Input, Counters> {
    StateMachineBuilder::new(Counters::default())
        .name("scenario")
        .state(Mode::Idle, Counting)
        .state(Mode::Running, Counting)
        .state(Mode::Jumping, Counting)
        .clock(clock.source())
        .build()
        .unwrap()
}

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-5
}

#[test]
fn first_registered_transition_fires() {
    let clock = ManualClock::new();
    let mut machine = machine(&clock);
    machine
        .add_transitions(vec![
            Transition::new(Mode::Idle, Mode::Running),
            Transition::new(Mode::Idle, Mode::Jumping),
        ])
        .unwrap();

    machine.update().unwrap();
    assert_eq!(machine.current_state(), Mode::Running);
}

#[test]
fn swapping_registration_order_swaps_the_winner() {
    let clock = ManualClock::new();
    let mut machine = machine(&clock);
    machine
        .add_transitions(vec![
            Transition::new(Mode::Idle, Mode::Jumping),
            Transition::new(Mode::Idle, Mode::Running),
        ])
        .unwrap();

    machine.update().unwrap();
    assert_eq!(machine.current_state(), Mode::Jumping);
}

#[test]
fn zero_duration_transition_completes_in_one_update() {
    let clock = ManualClock::new();
    let mut machine = machine(&clock);
    machine
        .add_transition(Transition::new(Mode::Idle, Mode::Running))
        .unwrap();

    let tick = machine.update().unwrap();

    assert_eq!(
        tick,
        Tick::Changed {
            from: Mode::Idle,
            to: Mode::Running
        }
    );
    assert!(!machine.is_transitioning());
    assert_eq!(machine.weight(Mode::Running), Some(1.0));
    assert_eq!(machine.weight(Mode::Idle), Some(0.0));
}

#[test]
fn short_blends_complete_instantly() {
    let clock = ManualClock::new();
    let mut machine = machine(&clock);
    machine
        .add_transition(Transition::blended(Mode::Idle, Mode::Running).lasting(0.005))
        .unwrap();

    assert!(matches!(machine.update().unwrap(), Tick::Changed { .. }));
    assert_eq!(machine.weight(Mode::Running), Some(1.0));
}

#[test]
fn identity_blend_follows_elapsed_time_then_converges() {
    let clock = ManualClock::new();
    let mut machine = machine(&clock);
    machine
        .add_transition(Transition::blended(Mode::Idle, Mode::Running).lasting(2.0))
        .unwrap();

    machine.update().unwrap();
    for step in 1..8 {
        clock.set(step as f32 * 0.25);
        let tick = machine.update().unwrap();
        assert_eq!(
            tick,
            Tick::Transitioning {
                from: Mode::Idle,
                to: Mode::Running
            }
        );
        let expected = step as f32 * 0.25 / 2.0;
        assert!(close(machine.weight(Mode::Running).unwrap(), expected));
        assert!(close(machine.weight(Mode::Idle).unwrap(), 1.0 - expected));
    }

    clock.set(2.5);
    assert!(matches!(machine.update().unwrap(), Tick::Changed { .. }));
    assert_eq!(machine.weight(Mode::Running), Some(1.0));
    assert_eq!(machine.weight(Mode::Idle), Some(0.0));
}

#[test]
fn one_update_consumes_exactly_one_event() {
    let clock = ManualClock::new();
    let mut machine = machine(&clock);
    machine
        .add_transition(
            Transition::new(Mode::Idle, Mode::Jumping)
                .guarded(Guard::on_event(|input: &Input| *input == Input::Jump)),
        )
        .unwrap();

    machine.push_event(Input::Land);
    machine.push_event(Input::Land);
    machine.update().unwrap();

    assert_eq!(machine.pending_events(), 1);
    assert_eq!(machine.current_state(), Mode::Idle);
}

#[test]
fn updating_with_no_events_does_not_underflow() {
    let clock = ManualClock::new();
    let mut machine = machine(&clock);

    machine.update().unwrap();
    machine.update().unwrap();

    assert_eq!(machine.pending_events(), 0);
}

#[test]
fn event_not_at_the_front_is_dropped_unseen() {
    let clock = ManualClock::new();
    let mut machine = machine(&clock);
    machine
        .add_transitions(vec![
            Transition::new(Mode::Idle, Mode::Jumping)
                .guarded(Guard::on_event(|input: &Input| *input == Input::Jump)),
            Transition::new(Mode::Jumping, Mode::Idle)
                .guarded(Guard::on_event(|input: &Input| *input == Input::Land)),
        ])
        .unwrap();

    machine.push_event(Input::Jump);
    machine.push_event(Input::Land);

    machine.update().unwrap();
    assert_eq!(machine.current_state(), Mode::Jumping);
    assert_eq!(machine.pending_events(), 1);

    machine.update().unwrap();
    assert_eq!(machine.current_state(), Mode::Idle);
    assert_eq!(machine.pending_events(), 0);
}

#[test]
fn no_op_ticks_are_idempotent() {
    let clock = ManualClock::new();
    let mut machine = machine(&clock);
    machine
        .add_transition(Transition::new(Mode::Idle, Mode::Running).when(|_, _| false))
        .unwrap();

    for _ in 0..10 {
        clock.advance(0.1);
        assert_eq!(machine.update().unwrap(), Tick::Stayed(Mode::Idle));
    }

    assert_eq!(machine.current_state(), Mode::Idle);
    assert_eq!(machine.previous_state(), Mode::Idle);
    assert_eq!(machine.weight(Mode::Idle), Some(1.0));
    assert_eq!(machine.weight(Mode::Running), Some(0.0));
    assert_eq!(machine.host().updates[Mode::Idle as usize], 10);
}

#[test]
fn idle_to_running_scenario() {
    let clock = ManualClock::new();
    let mut machine = machine(&clock);
    machine
        .add_transitions(vec![
            Transition::blended(Mode::Idle, Mode::Running)
                .when(|idle, _| idle.active_time > 2.0)
                .lasting(1.0),
            Transition::blended(Mode::Running, Mode::Idle).lasting(1.0),
        ])
        .unwrap();

    for step in 0..=20 {
        clock.set(step as f32 * 0.1);
        assert_eq!(machine.update().unwrap(), Tick::Stayed(Mode::Idle));
        assert_eq!(machine.weight(Mode::Idle), Some(1.0));
    }

    clock.set(2.1);
    machine.update().unwrap();
    assert!(machine.is_transitioning());
    assert_eq!(machine.target_state(), Some(Mode::Running));
    assert_eq!(machine.weight(Mode::Running), Some(0.0));

    let mut last = 0.0;
    for step in 1..10 {
        clock.set(2.1 + step as f32 * 0.1);
        machine.update().unwrap();
        let running = machine.weight(Mode::Running).unwrap();
        assert!(running > last);
        last = running;
    }

    clock.set(3.2);
    let tick = machine.update().unwrap();
    assert_eq!(
        tick,
        Tick::Changed {
            from: Mode::Idle,
            to: Mode::Running
        }
    );
    assert_eq!(machine.current_state(), Mode::Running);
    assert_eq!(machine.previous_state(), Mode::Idle);
    assert_eq!(machine.weight(Mode::Idle), Some(0.0));
    assert_eq!(machine.weight(Mode::Running), Some(1.0));

    // The unconditional return blend starts on the next tick.
    clock.set(3.3);
    machine.update().unwrap();
    assert_eq!(machine.target_state(), Some(Mode::Idle));
}

#[test]
fn locked_machine_finishes_in_flight_transition() {
    let clock = ManualClock::new();
    let mut machine = machine(&clock);
    machine
        .add_transitions(vec![
            Transition::new(Mode::Idle, Mode::Running).lasting(1.0),
            Transition::new(Mode::Running, Mode::Jumping),
        ])
        .unwrap();

    machine.update().unwrap();
    machine.lock();
    clock.set(1.0);
    machine.update().unwrap();
    assert_eq!(machine.current_state(), Mode::Running);

    machine.update().unwrap();
    assert_eq!(machine.current_state(), Mode::Running);
}

#[test]
fn listeners_see_every_completed_transition() {
    let clock = ManualClock::new();
    let mut machine = machine(&clock);
    machine
        .add_transitions(vec![
            Transition::new(Mode::Idle, Mode::Running),
            Transition::new(Mode::Running, Mode::Jumping),
        ])
        .unwrap();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    machine.on_transition_ended(move |notice| sink.lock().unwrap().push((notice.from, notice.to)));

    machine.update().unwrap();
    machine.update().unwrap();
    machine.force_state(Mode::Idle).unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            (Mode::Idle, Mode::Running),
            (Mode::Running, Mode::Jumping),
            (Mode::Jumping, Mode::Idle),
        ]
    );
}

#[test]
fn forced_state_becomes_current_and_owns_the_next_scan() {
    let clock = ManualClock::new();
    let mut machine = machine(&clock);
    machine
        .add_transitions(vec![
            Transition::new(Mode::Idle, Mode::Jumping).when(|_, _| false),
            Transition::blended(Mode::Jumping, Mode::Running).lasting(0.5),
        ])
        .unwrap();

    machine.force_state(Mode::Jumping).unwrap();
    assert_eq!(machine.current_state(), Mode::Jumping);
    assert_eq!(machine.previous_state(), Mode::Idle);
    assert_eq!(machine.weight(Mode::Idle), Some(0.0));
    assert_eq!(machine.weight(Mode::Jumping), Some(1.0));

    machine.update().unwrap();
    assert!(machine.is_transitioning());
    assert_eq!(machine.target_state(), Some(Mode::Running));

    clock.set(0.5);
    machine.update().unwrap();
    assert_eq!(machine.current_state(), Mode::Running);
    assert_eq!(machine.previous_state(), Mode::Jumping);
}

#[test]
fn transition_callbacks_fire_on_finish() {
    let clock = ManualClock::new();
    let mut machine = machine(&clock);
    let fired = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&fired);
    machine
        .add_transition(
            Transition::new(Mode::Idle, Mode::Running)
                .lasting(0.5)
                .on_finished(move |_, _| *counter.lock().unwrap() += 1),
        )
        .unwrap();

    machine.update().unwrap();
    assert_eq!(*fired.lock().unwrap(), 0);

    clock.set(0.5);
    machine.update().unwrap();
    assert_eq!(*fired.lock().unwrap(), 1);
}

#[test]
fn wiring_to_unknown_states_fails_fast() {
    let clock = ManualClock::new();
    let result: Result<StateMachine<Mode, Input, Counters>, BuildError> =
        StateMachineBuilder::new(Counters::default())
            .state(Mode::Idle, Counting)
            .clock(clock.source())
            .transitions(vec![
                Transition::new(Mode::Idle, Mode::Running),
                Transition::new(Mode::Jumping, Mode::Idle).lasting(-2.0),
            ])
            .build();

    match result {
        Err(BuildError::Machine(MachineError::InvalidWiring(errors))) => {
            assert_eq!(errors.len(), 3)
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected wiring to be rejected"),
    }
}

#[test]
fn rejected_batch_adds_nothing() {
    let clock = ManualClock::new();
    let mut machine = machine(&clock);

    let result = machine.add_transitions(vec![
        Transition::new(Mode::Idle, Mode::Running),
        Transition::new(Mode::Idle, Mode::Jumping).lasting(f32::INFINITY),
    ]);

    assert!(result.is_err());
    assert!(machine.transitions_from(Mode::Idle).is_empty());
}

#[test]
fn snapshot_survives_json_and_restore() {
    let clock = ManualClock::new();
    let mut machine = machine(&clock);
    machine
        .add_transition(Transition::new(Mode::Idle, Mode::Jumping))
        .unwrap();
    machine.update().unwrap();

    let json = machine.snapshot().to_json().unwrap();
    let snapshot = crossfade::checkpoint::MachineSnapshot::from_json(&json).unwrap();

    let mut fresh = self::machine(&clock);
    fresh.restore(snapshot).unwrap();

    assert_eq!(fresh.current_state(), Mode::Jumping);
    assert_eq!(fresh.weight(Mode::Jumping), Some(1.0));
    assert_eq!(fresh.weight(Mode::Idle), Some(0.0));
    assert_eq!(fresh.history().get_path(), vec![&Mode::Idle, &Mode::Jumping]);
}
