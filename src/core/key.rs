//! Key trait shared by states and transitions.

use std::fmt::Debug;
use std::hash::Hash;

/// Identity of a state or a transition.
///
/// Any value that is cheap to clone, hashable and debuggable can key a
/// machine: `&'static str`, `String`, small integers or a plain enum.
/// The trait is implemented automatically for every such type.
///
/// # Example
///
/// ```rust
/// use keyfsm::core::StateKey;
///
/// fn accepts<K: StateKey>(_key: K) {}
///
/// accepts("idle");
/// accepts(String::from("running"));
/// accepts(42u8);
/// ```
pub trait StateKey: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

impl<T> StateKey for T where T: Clone + Eq + Hash + Debug + Send + Sync + 'static {}
