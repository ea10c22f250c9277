//! Macros for ergonomic state machine construction.

/// Generate a [`StateTag`](crate::core::StateTag) implementation for a
/// fieldless enum.
///
/// Ids follow the enum discriminants, so the first variant (or the one set
/// to `0`) is the initial state. An associated `ALL` constant lists every
/// variant in declaration order.
///
/// # Example
///
/// ```
/// use crossfade::core::StateTag;
/// use crossfade::state_tag;
///
/// state_tag! {
///     pub enum Locomotion {
///         Idle,
///         Walk,
///         Run = 5,
///     }
/// }
///
/// assert_eq!(Locomotion::Idle.id(), 0);
/// assert_eq!(Locomotion::Run.id(), 5);
/// assert_eq!(Locomotion::from_id(5), Some(Locomotion::Run));
/// assert_eq!(Locomotion::from_id(2), None);
/// assert_eq!(Locomotion::Walk.name(), "Walk");
/// assert_eq!(Locomotion::ALL.len(), 3);
/// ```
#[macro_export]
macro_rules! state_tag {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $(= $value:expr)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant $(= $value)?
            ),*
        }

        impl $name {
            /// Every tag, in declaration order.
            #[allow(dead_code)]
            $vis const ALL: &'static [$name] = &[$(Self::$variant),*];
        }

        impl $crate::core::StateTag for $name {
            fn id(&self) -> $crate::core::StateId {
                *self as $crate::core::StateId
            }

            fn from_id(id: $crate::core::StateId) -> Option<Self> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|tag| $crate::core::StateTag::id(tag) == id)
            }

            fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}
