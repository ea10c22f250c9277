//! Tick-driven state machine with weighted transitions.

use crate::builder::{BuildError, StateMachineBuilder};
use crate::checkpoint::{MachineSnapshot, SnapshotError, StateWeight, SNAPSHOT_VERSION};
use crate::config::MachineOptions;
use crate::core::{
    State, StateContext, StateHistory, StateId, StateTag, StateTransition, StateView, TimeSource,
};
use crate::machine::error::MachineError;
use crate::machine::events::EventQueue;
use crate::transitions::{BlendWeights, Transition, TransitionGroup};
use crate::wiring::validate_transitions;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use stillwater::validation::Validation;
use tracing::{debug, info, trace, warn};
use uuid::Uuid;

/// Boxed behaviour of one state.
pub type BoxedState<T, C> = Box<dyn State<T, C>>;

/// What one call to [`StateMachine::update`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick<T> {
    /// No transition in flight; the current state ran its update
    Stayed(T),

    /// A transition is in flight and needs more ticks
    Transitioning { from: T, to: T },

    /// A transition completed during this tick
    Changed { from: T, to: T },
}

/// Payload handed to transition listeners.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionNotice<T> {
    pub from: T,
    pub to: T,
    /// Machine time of the notification
    pub at: f32,
}

type Listener<T> = Box<dyn FnMut(&TransitionNotice<T>) + Send>;

struct StateSlot<T: StateTag, C> {
    tag: T,
    behavior: BoxedState<T, C>,
    weight: f32,
    activated_at: f32,
}

impl<T: StateTag, C> StateSlot<T, C> {
    fn view(&self, now: f32) -> StateView<T> {
        StateView {
            tag: self.tag,
            weight: self.weight,
            active_time: now - self.activated_at,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct InFlight<T> {
    from: T,
    to: T,
    /// Position in the source's outgoing list
    index: usize,
    started_at: f32,
}

/// Weighted transition state machine.
///
/// Generic over the state tag `T`, the event type `E` pushed by the host,
/// and the host object `C` that state hooks can reach.
///
/// The host drives the machine by calling [`update`](Self::update) once per
/// frame and, optionally, [`fixed_update`](Self::fixed_update) once per
/// fixed step, both from the same thread.
///
/// # Example
///
/// ```rust
/// use crossfade::builder::StateMachineBuilder;
/// use crossfade::core::{ManualClock, State, StateContext};
/// use crossfade::machine::{StateMachine, Tick};
/// use crossfade::transitions::Transition;
/// use crossfade::state_tag;
///
/// state_tag! {
///     enum Door {
///         Closed,
///         Open,
///     }
/// }
///
/// struct Still;
///
/// impl State<Door> for Still {
///     fn on_update(&mut self, _ctx: &mut StateContext<'_, Door, ()>) {}
/// }
///
/// let clock = ManualClock::new();
/// let mut machine: StateMachine<Door> = StateMachineBuilder::new(())
///     .state(Door::Closed, Still)
///     .state(Door::Open, Still)
///     .clock(clock.source())
///     .transitions(Transition::new(Door::Closed, Door::Open))
///     .build()
///     .unwrap();
///
/// let tick = machine.update().unwrap();
/// assert_eq!(tick, Tick::Changed { from: Door::Closed, to: Door::Open });
/// assert_eq!(machine.current_state(), Door::Open);
/// assert_eq!(machine.weight(Door::Closed), Some(0.0));
/// ```
pub struct StateMachine<T: StateTag, E = (), C = ()> {
    options: MachineOptions,
    host: C,
    clock: TimeSource,
    states: HashMap<StateId, StateSlot<T, C>>,
    outgoing: HashMap<StateId, Vec<Transition<T, E>>>,
    events: EventQueue<E>,
    current: T,
    previous: T,
    in_flight: Option<InFlight<T>>,
    locked: bool,
    dead: bool,
    history: StateHistory<T>,
    started_listeners: Vec<Listener<T>>,
    ended_listeners: Vec<Listener<T>>,
}

/// Run one lifecycle hook of the state `tag`.
fn run_hook<T, C, F>(
    states: &mut HashMap<StateId, StateSlot<T, C>>,
    host: &mut C,
    tag: T,
    now: f32,
    hook: F,
) -> Result<(), MachineError>
where
    T: StateTag,
    F: FnOnce(&mut BoxedState<T, C>, &mut StateContext<'_, T, C>),
{
    let slot = states
        .get_mut(&tag.id())
        .ok_or_else(|| missing_slot(tag))?;
    let mut ctx = StateContext::new(slot.view(now), host);
    hook(&mut slot.behavior, &mut ctx);
    Ok(())
}

fn missing_slot<T: StateTag>(tag: T) -> MachineError {
    MachineError::Inconsistent(format!("state '{}' has no registered slot", tag.name()))
}

impl<T: StateTag, E, C> StateMachine<T, E, C> {
    /// Start building a machine owned by `host`.
    pub fn builder(host: C) -> StateMachineBuilder<T, E, C> {
        StateMachineBuilder::new(host)
    }

    /// Register the state set and enter the initial state.
    pub(crate) fn init(
        host: C,
        states: Vec<(T, BoxedState<T, C>)>,
        clock: TimeSource,
        options: MachineOptions,
    ) -> Result<Self, BuildError> {
        if states.is_empty() {
            return Err(BuildError::NoStates);
        }

        let initial = states
            .iter()
            .map(|(tag, _)| *tag)
            .find(|tag| tag.id() == 0)
            .ok_or(BuildError::MissingInitialState)?;

        let now = clock();
        let mut order = Vec::with_capacity(states.len());
        let mut slots = HashMap::with_capacity(states.len());
        for (tag, behavior) in states {
            if slots.contains_key(&tag.id()) {
                return Err(BuildError::DuplicateState { name: tag.name() });
            }
            let weight = if tag == initial { 1.0 } else { 0.0 };
            slots.insert(
                tag.id(),
                StateSlot {
                    tag,
                    behavior,
                    weight,
                    activated_at: now,
                },
            );
            order.push(tag);
        }

        let mut machine = Self {
            options,
            host,
            clock,
            states: slots,
            outgoing: HashMap::new(),
            events: EventQueue::new(),
            current: initial,
            previous: initial,
            in_flight: None,
            locked: false,
            dead: false,
            history: StateHistory::new(),
            started_listeners: Vec::new(),
            ended_listeners: Vec::new(),
        };

        for tag in order {
            run_hook(&mut machine.states, &mut machine.host, tag, now, |state, ctx| {
                state.init(ctx)
            })?;
        }
        run_hook(&mut machine.states, &mut machine.host, initial, now, |state, ctx| {
            state.on_transition_to_finished(ctx)
        })?;

        info!(
            machine = %machine.options.name,
            states = machine.states.len(),
            initial = initial.name(),
            "state machine initialised"
        );

        Ok(machine)
    }

    /// Register a single transition.
    pub fn add_transition(&mut self, transition: Transition<T, E>) -> Result<(), MachineError> {
        self.add_transitions(TransitionGroup::one(transition))
    }

    /// Register a batch of transitions.
    ///
    /// The whole batch is validated first; if any transition is invalid,
    /// nothing is added and every violation is reported.
    pub fn add_transitions(
        &mut self,
        group: impl Into<TransitionGroup<T, E>>,
    ) -> Result<(), MachineError> {
        let group = group.into();
        let registered: HashSet<StateId> = self.states.keys().copied().collect();

        if let Validation::Failure(errors) = validate_transitions(&registered, group.as_slice()) {
            let errors: Vec<_> = errors.iter().cloned().collect();
            warn!(
                machine = %self.options.name,
                violations = errors.len(),
                "transition wiring rejected"
            );
            return Err(MachineError::InvalidWiring(errors));
        }

        let added = group.len();
        for transition in group {
            self.outgoing
                .entry(transition.from.id())
                .or_default()
                .push(transition);
        }
        debug!(machine = %self.options.name, added, "transitions registered");
        Ok(())
    }

    /// Advance the machine by one tick.
    ///
    /// A transition in flight is progressed by one step. Otherwise, unless
    /// the machine is locked, the current state's outgoing transitions are
    /// scanned in registration order and the first eligible one begins and
    /// is progressed in the same call, so instantaneous transitions complete
    /// here. One pending event is dequeued after every scan. Finally, if no
    /// transition remains in flight, the current state runs `on_update`.
    pub fn update(&mut self) -> Result<Tick<T>, MachineError> {
        let now = self.now();

        let (tick, blended) = if self.in_flight.is_some() {
            self.advance(now)?
        } else if let Some(index) = self.lookup(None, now) {
            self.begin_transition(index, now)?;
            self.advance(now)?
        } else {
            (Tick::Stayed(self.current), false)
        };

        // Blend steps already updated both endpoints this tick.
        if self.in_flight.is_none() && !blended {
            run_hook(&mut self.states, &mut self.host, self.current, now, |state, ctx| {
                state.on_update(ctx)
            })?;
        }

        Ok(tick)
    }

    /// Run the current state's fixed-step hook.
    pub fn fixed_update(&mut self) -> Result<(), MachineError> {
        let now = self.now();
        run_hook(&mut self.states, &mut self.host, self.current, now, |state, ctx| {
            state.on_fixed_update(ctx)
        })
    }

    /// Queue an event for guards to observe.
    pub fn push_event(&mut self, event: E) {
        self.events.push(event);
        trace!(
            machine = %self.options.name,
            pending = self.events.len(),
            "event pushed"
        );
    }

    /// Whether an eligible transition to `target` exists right now.
    ///
    /// Has no side effects; the pending event is not consumed.
    pub fn is_available_to(&self, target: T) -> bool {
        if self.locked || self.in_flight.is_some() {
            return false;
        }
        self.find_transition(Some(target), self.now()).is_some()
    }

    /// Begin an eligible transition to `target`, if there is one.
    ///
    /// Follows the same rules as [`update`](Self::update), including the
    /// consumption of one pending event, but only considers transitions
    /// ending at `target`. Returns whether a transition was started.
    pub fn try_move_to(&mut self, target: T) -> Result<bool, MachineError> {
        let now = self.now();
        match self.lookup(Some(target), now) {
            Some(index) => {
                self.begin_transition(index, now)?;
                self.advance(now)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Switch to `target` immediately, bypassing guards and permissions.
    ///
    /// Abandons any transition in flight. Only the `finished` hooks run.
    pub fn force_state(&mut self, target: T) -> Result<(), MachineError> {
        if !self.states.contains_key(&target.id()) {
            return Err(MachineError::UnknownState {
                name: target.name(),
            });
        }

        let now = self.now();
        self.abandon_in_flight();

        let from = self.current;
        run_hook(&mut self.states, &mut self.host, from, now, |state, ctx| {
            state.on_transition_from_finished(ctx)
        })?;
        self.enter(target, now)?;

        self.previous = from;
        self.current = target;
        self.apply_weights(from, target, BlendWeights { from: 0.0, to: 1.0 })?;

        self.record(from, target, now, now);
        self.notify_ended(from, target, now);
        debug!(
            machine = %self.options.name,
            from = from.name(),
            to = target.name(),
            "state forced"
        );
        Ok(())
    }

    /// Stop evaluating new transitions. Transitions in flight still finish.
    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }

    /// Tear the machine down.
    ///
    /// Runs the current state's `on_transition_from_finished`, abandons any
    /// transition in flight and, if configured, locks the machine. Calling
    /// `die` again does nothing.
    pub fn die(&mut self) -> Result<(), MachineError> {
        if self.dead {
            return Ok(());
        }

        let now = self.now();
        self.abandon_in_flight();
        run_hook(&mut self.states, &mut self.host, self.current, now, |state, ctx| {
            state.on_transition_from_finished(ctx)
        })?;

        if self.options.lock_on_die {
            self.locked = true;
        }
        self.dead = true;
        debug!(
            machine = %self.options.name,
            state = self.current.name(),
            "state machine died"
        );
        Ok(())
    }

    /// Subscribe to transition starts.
    pub fn on_transition_started<F>(&mut self, listener: F)
    where
        F: FnMut(&TransitionNotice<T>) + Send + 'static,
    {
        self.started_listeners.push(Box::new(listener));
    }

    /// Subscribe to transition completions, including forced switches.
    pub fn on_transition_ended<F>(&mut self, listener: F)
    where
        F: FnMut(&TransitionNotice<T>) + Send + 'static,
    {
        self.ended_listeners.push(Box::new(listener));
    }

    pub fn current_state(&self) -> T {
        self.current
    }

    pub fn previous_state(&self) -> T {
        self.previous
    }

    /// Destination of the transition in flight.
    pub fn target_state(&self) -> Option<T> {
        self.in_flight.map(|flight| flight.to)
    }

    pub fn is_transitioning(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn weight(&self, tag: T) -> Option<f32> {
        self.states.get(&tag.id()).map(|slot| slot.weight)
    }

    pub fn active_time(&self, tag: T) -> Option<f32> {
        self.view(tag).map(|view| view.active_time)
    }

    pub fn view(&self, tag: T) -> Option<StateView<T>> {
        let now = self.now();
        self.states.get(&tag.id()).map(|slot| slot.view(now))
    }

    /// Registered tags, ordered by id.
    pub fn registered_states(&self) -> Vec<T> {
        let mut tags: Vec<T> = self.states.values().map(|slot| slot.tag).collect();
        tags.sort_by_key(|tag| tag.id());
        tags
    }

    /// Outgoing transitions of `tag`, in registration order.
    pub fn transitions_from(&self, tag: T) -> &[Transition<T, E>] {
        self.outgoing
            .get(&tag.id())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    pub fn peek_event(&self) -> Option<&E> {
        self.events.peek()
    }

    pub fn history(&self) -> &StateHistory<T> {
        &self.history
    }

    pub fn options(&self) -> &MachineOptions {
        &self.options
    }

    pub fn host(&self) -> &C {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut C {
        &mut self.host
    }

    /// Current reading of the machine's time source.
    pub fn now(&self) -> f32 {
        (self.clock)()
    }

    /// Capture the serialisable part of the machine.
    pub fn snapshot(&self) -> MachineSnapshot<T> {
        let mut weights: Vec<StateWeight<T>> = self
            .states
            .values()
            .map(|slot| StateWeight {
                tag: slot.tag,
                weight: slot.weight,
            })
            .collect();
        weights.sort_by_key(|entry| entry.tag.id());

        MachineSnapshot {
            version: SNAPSHOT_VERSION,
            id: Uuid::new_v4().to_string(),
            taken_at: Utc::now(),
            machine: self.options.name.clone(),
            current: self.current,
            previous: self.previous,
            target: self.target_state(),
            locked: self.locked,
            weights,
            pending_events: self.events.len(),
            history: self.history.clone(),
        }
    }

    /// Put the machine back into the state captured by `snapshot`.
    ///
    /// Snapshots taken mid-transition cannot be restored because transitions
    /// are not serialisable. Pending events are not restored. The current
    /// state's active clock restarts.
    pub fn restore(&mut self, snapshot: MachineSnapshot<T>) -> Result<(), SnapshotError> {
        if let Err(err) = snapshot.validate() {
            warn!(machine = %self.options.name, error = %err, "snapshot rejected");
            return Err(err);
        }

        let referenced = [snapshot.current, snapshot.previous]
            .into_iter()
            .chain(snapshot.weights.iter().map(|entry| entry.tag));
        for tag in referenced {
            if !self.states.contains_key(&tag.id()) {
                let err = SnapshotError::UnregisteredState {
                    state: tag.name(),
                    machine: self.options.name.clone(),
                };
                warn!(machine = %self.options.name, error = %err, "snapshot rejected");
                return Err(err);
            }
        }

        self.in_flight = None;
        let now = self.now();
        for slot in self.states.values_mut() {
            slot.weight = 0.0;
        }
        for entry in &snapshot.weights {
            if let Some(slot) = self.states.get_mut(&entry.tag.id()) {
                slot.weight = entry.weight;
            }
        }
        if let Some(slot) = self.states.get_mut(&snapshot.current.id()) {
            slot.activated_at = now;
        }

        self.current = snapshot.current;
        self.previous = snapshot.previous;
        self.locked = snapshot.locked;
        self.history = snapshot.history;

        info!(
            machine = %self.options.name,
            snapshot = %snapshot.id,
            current = self.current.name(),
            "snapshot restored"
        );
        Ok(())
    }

    fn transition_at(&self, from: T, index: usize) -> Result<&Transition<T, E>, MachineError> {
        self.outgoing
            .get(&from.id())
            .and_then(|list| list.get(index))
            .ok_or_else(|| {
                MachineError::Inconsistent(format!(
                    "no transition #{index} leaves state '{}'",
                    from.name()
                ))
            })
    }

    /// First eligible transition from the current state, in registration
    /// order. `target` restricts the scan to one destination.
    fn find_transition(&self, target: Option<T>, now: f32) -> Option<usize> {
        let candidates = self.outgoing.get(&self.current.id())?;
        let current = self.states.get(&self.current.id())?.view(now);
        let event = self.events.peek();

        candidates.iter().position(|transition| {
            target.map_or(true, |target| transition.to == target)
                && transition.check(&current, event)
                && self.permits(transition, now)
        })
    }

    fn permits(&self, transition: &Transition<T, E>, now: f32) -> bool {
        let (Some(from), Some(to)) = (
            self.states.get(&transition.from.id()),
            self.states.get(&transition.to.id()),
        ) else {
            return false;
        };

        from.behavior.is_possible_change_from(&from.view(now))
            && to.behavior.is_possible_change_to(&to.view(now))
    }

    /// Scan for a transition and consume one pending event.
    fn lookup(&mut self, target: Option<T>, now: f32) -> Option<usize> {
        if self.locked || self.in_flight.is_some() {
            return None;
        }

        let found = self.find_transition(target, now);
        if self.events.pop().is_some() {
            trace!(
                machine = %self.options.name,
                pending = self.events.len(),
                consumed_by_transition = found.is_some(),
                "event dequeued after lookup"
            );
        }
        found
    }

    fn begin_transition(&mut self, index: usize, now: f32) -> Result<(), MachineError> {
        let from = self.current;
        let (to, duration) = {
            let transition = self.transition_at(from, index)?;
            (transition.to, transition.duration)
        };

        self.in_flight = Some(InFlight {
            from,
            to,
            index,
            started_at: now,
        });

        run_hook(&mut self.states, &mut self.host, from, now, |state, ctx| {
            state.on_transition_from_started(ctx)
        })?;
        run_hook(&mut self.states, &mut self.host, to, now, |state, ctx| {
            state.on_transition_to_started(ctx)
        })?;

        let weights = self.transition_at(from, index)?.begin();
        self.apply_weights(from, to, weights)?;

        let notice = TransitionNotice { from, to, at: now };
        for listener in self.started_listeners.iter_mut() {
            listener(&notice);
        }

        debug!(
            machine = %self.options.name,
            from = from.name(),
            to = to.name(),
            duration,
            "transition started"
        );
        Ok(())
    }

    /// Progress the transition in flight by one step.
    ///
    /// Returns the tick outcome and whether a blend step ran the endpoints'
    /// `on_update` hooks.
    fn advance(&mut self, now: f32) -> Result<(Tick<T>, bool), MachineError> {
        let InFlight {
            from,
            to,
            index,
            started_at,
        } = self.in_flight.ok_or_else(|| {
            MachineError::Inconsistent("no transition in flight to advance".to_string())
        })?;

        let step = self
            .transition_at(from, index)?
            .progress(now - started_at, self.options.instant_threshold);

        let blended = match step.weights {
            Some(weights) => {
                self.apply_blend_weights(from, to, weights)?;
                run_hook(&mut self.states, &mut self.host, from, now, |state, ctx| {
                    state.on_update(ctx)
                })?;
                run_hook(&mut self.states, &mut self.host, to, now, |state, ctx| {
                    state.on_update(ctx)
                })?;
                true
            }
            None => false,
        };

        if step.finished {
            self.finish_transition(now)?;
            Ok((Tick::Changed { from, to }, blended))
        } else {
            Ok((Tick::Transitioning { from, to }, blended))
        }
    }

    fn finish_transition(&mut self, now: f32) -> Result<(), MachineError> {
        let InFlight {
            from,
            to,
            index,
            started_at,
        } = self.in_flight.ok_or_else(|| {
            MachineError::Inconsistent("finishing without a transition in flight".to_string())
        })?;

        run_hook(&mut self.states, &mut self.host, from, now, |state, ctx| {
            state.on_transition_from_finished(ctx)
        })?;
        self.enter(to, now)?;

        self.previous = from;
        self.current = to;
        let weights = self.transition_at(from, index)?.finish();
        self.apply_weights(from, to, weights)?;
        self.in_flight = None;

        self.record(from, to, started_at, now);
        self.notify_ended(from, to, now);
        debug!(
            machine = %self.options.name,
            from = from.name(),
            to = to.name(),
            elapsed = now - started_at,
            "transition finished"
        );
        Ok(())
    }

    /// Reset the active clock of `tag` and run its `on_transition_to_finished`.
    fn enter(&mut self, tag: T, now: f32) -> Result<(), MachineError> {
        let slot = self.states.get_mut(&tag.id()).ok_or_else(|| missing_slot(tag))?;
        slot.activated_at = now;
        run_hook(&mut self.states, &mut self.host, tag, now, |state, ctx| {
            state.on_transition_to_finished(ctx)
        })
    }

    fn apply_weights(&mut self, from: T, to: T, weights: BlendWeights) -> Result<(), MachineError> {
        self.states
            .get_mut(&from.id())
            .ok_or_else(|| missing_slot(from))?
            .weight = weights.from;
        self.states
            .get_mut(&to.id())
            .ok_or_else(|| missing_slot(to))?
            .weight = weights.to;
        Ok(())
    }

    /// Blend steps write the target first, so a self-blend keeps `from`.
    fn apply_blend_weights(
        &mut self,
        from: T,
        to: T,
        weights: BlendWeights,
    ) -> Result<(), MachineError> {
        self.states
            .get_mut(&to.id())
            .ok_or_else(|| missing_slot(to))?
            .weight = weights.to;
        self.states
            .get_mut(&from.id())
            .ok_or_else(|| missing_slot(from))?
            .weight = weights.from;
        Ok(())
    }

    fn abandon_in_flight(&mut self) {
        if let Some(flight) = self.in_flight.take() {
            if flight.to != self.current {
                if let Some(slot) = self.states.get_mut(&flight.to.id()) {
                    slot.weight = 0.0;
                }
            }
            debug!(
                machine = %self.options.name,
                from = flight.from.name(),
                to = flight.to.name(),
                "transition abandoned"
            );
        }
    }

    fn record(&mut self, from: T, to: T, started_at: f32, finished_at: f32) {
        let entry = StateTransition {
            from,
            to,
            started_at,
            finished_at,
            timestamp: Utc::now(),
        };
        self.history.push(entry, self.options.history_limit);
    }

    fn notify_ended(&mut self, from: T, to: T, now: f32) {
        let notice = TransitionNotice { from, to, at: now };
        for listener in self.ended_listeners.iter_mut() {
            listener(&notice);
        }
    }
}
