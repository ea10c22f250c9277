//! State tags and the behaviour trait implemented by machine states.
//!
//! A machine is keyed by a small, finite *tag* type (usually a fieldless
//! enum) that maps onto a dense integer id space. The behaviour attached to
//! each tag is a boxed [`State`] implementation supplied by the host.

use crate::machine::MachineError;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Dense integer identity of a state.
pub type StateId = u32;

/// Trait for the tag type that names the states of a machine.
///
/// The mapping between tags and ids must be a bijection. The tag whose id is
/// `0` is the initial state of every machine built over this type.
///
/// # Required Traits
///
/// - `Copy` + `Eq` + `Hash`: tags are used as cheap map keys
/// - `Debug`: tags appear in diagnostics and log fields
/// - `Serialize` + `Deserialize`: tags are written into snapshots
///
/// # Example
///
/// ```rust
/// use crossfade::core::{StateId, StateTag};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum Mode {
///     Idle,
///     Running,
/// }
///
/// impl StateTag for Mode {
///     fn id(&self) -> StateId {
///         *self as StateId
///     }
///
///     fn from_id(id: StateId) -> Option<Self> {
///         match id {
///             0 => Some(Self::Idle),
///             1 => Some(Self::Running),
///             _ => None,
///         }
///     }
///
///     fn name(&self) -> &'static str {
///         match self {
///             Self::Idle => "Idle",
///             Self::Running => "Running",
///         }
///     }
/// }
///
/// assert_eq!(Mode::from_id(Mode::Running.id()), Some(Mode::Running));
/// ```
pub trait StateTag:
    Copy + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// Integer id of this tag.
    fn id(&self) -> StateId;

    /// Inverse of [`StateTag::id`]. Returns `None` for ids outside the tag set.
    fn from_id(id: StateId) -> Option<Self>;

    /// Display name used in logs and errors.
    fn name(&self) -> &'static str;
}

/// Convert an id back into its tag, failing loudly on undefined ids.
pub fn resolve_tag<T: StateTag>(id: StateId) -> Result<T, MachineError> {
    T::from_id(id).ok_or(MachineError::UndefinedId { id })
}

/// Read-only snapshot of a registered state, as seen by guards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StateView<T> {
    /// Which state this is
    pub tag: T,
    /// Current blend weight
    pub weight: f32,
    /// Seconds since the state last finished becoming current
    pub active_time: f32,
}

/// Context handed to every lifecycle hook.
///
/// Carries the hooked state's view and mutable access to the host object
/// that owns the machine.
pub struct StateContext<'a, T, C> {
    view: StateView<T>,
    host: &'a mut C,
}

impl<'a, T: StateTag, C> StateContext<'a, T, C> {
    pub(crate) fn new(view: StateView<T>, host: &'a mut C) -> Self {
        Self { view, host }
    }

    pub fn tag(&self) -> T {
        self.view.tag
    }

    /// Blend weight of the hooked state for this tick.
    pub fn weight(&self) -> f32 {
        self.view.weight
    }

    pub fn active_time(&self) -> f32 {
        self.view.active_time
    }

    pub fn view(&self) -> &StateView<T> {
        &self.view
    }

    pub fn host(&self) -> &C {
        self.host
    }

    pub fn host_mut(&mut self) -> &mut C {
        self.host
    }
}

/// Behaviour of a single machine state.
///
/// Only [`State::on_update`] is mandatory. `on_update` must be total for any
/// weight the machine may assign, including values outside `[0, 1]` produced
/// by overshooting blend curves.
///
/// # Example
///
/// ```rust
/// use crossfade::core::{State, StateContext};
/// use crossfade::state_tag;
///
/// state_tag! {
///     enum Mode {
///         Idle,
///         Running,
///     }
/// }
///
/// struct Running;
///
/// impl State<Mode, f32> for Running {
///     fn on_update(&mut self, ctx: &mut StateContext<'_, Mode, f32>) {
///         let weight = ctx.weight();
///         *ctx.host_mut() += weight;
///     }
/// }
/// ```
pub trait State<T: StateTag, C = ()>: Send {
    /// Called once, when the machine registers the state.
    fn init(&mut self, _ctx: &mut StateContext<'_, T, C>) {}

    /// This state became the target of a transition.
    fn on_transition_to_started(&mut self, _ctx: &mut StateContext<'_, T, C>) {}

    /// This state finished becoming current. Its active clock was just reset.
    fn on_transition_to_finished(&mut self, _ctx: &mut StateContext<'_, T, C>) {}

    /// This state started losing weight to a transition target.
    fn on_transition_from_started(&mut self, _ctx: &mut StateContext<'_, T, C>) {}

    /// This state stopped being current.
    fn on_transition_from_finished(&mut self, _ctx: &mut StateContext<'_, T, C>) {}

    /// Per-tick behaviour.
    fn on_update(&mut self, ctx: &mut StateContext<'_, T, C>);

    /// Per fixed step behaviour.
    fn on_fixed_update(&mut self, _ctx: &mut StateContext<'_, T, C>) {}

    /// Whether a transition may leave this state right now.
    fn is_possible_change_from(&self, _view: &StateView<T>) -> bool {
        true
    }

    /// Whether a transition may enter this state right now.
    fn is_possible_change_to(&self, _view: &StateView<T>) -> bool {
        true
    }
}
