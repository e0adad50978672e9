//! Macros for ergonomic state machine construction.

/// Declare an enum usable as a state or transition key.
///
/// Derives `Clone, Copy, PartialEq, Eq, Hash, Debug` and adds an `ALL`
/// constant listing every variant, a `name()` method and `Display`.
///
/// # Example
///
/// ```
/// use keyfsm::builder::FsmBuilder;
/// use keyfsm::state_enum;
///
/// state_enum! {
///     pub enum Door {
///         Closed,
///         Opened,
///     }
/// }
///
/// let fsm = FsmBuilder::new()
///     .states(Door::ALL.iter().copied())
///     .initial(Door::Closed)
///     .build()
///     .unwrap();
///
/// assert_eq!(fsm.initial_state().name(), "Closed");
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),*];

            pub fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}
