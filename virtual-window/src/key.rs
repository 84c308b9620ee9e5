#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

/// Map keyed by view key: `HashMap` with `std`, `BTreeMap` without.
#[cfg(feature = "std")]
pub type KeyMap<K, V> = HashMap<K, V>;
#[cfg(not(feature = "std"))]
pub type KeyMap<K, V> = BTreeMap<K, V>;

/// Identity of a collection item or section.
///
/// Keys must be cheap to clone; they are copied into every layout info and reusable view.
#[cfg(feature = "std")]
pub trait ViewKey: core::hash::Hash + Eq + Clone {}
#[cfg(feature = "std")]
impl<K: core::hash::Hash + Eq + Clone> ViewKey for K {}

#[cfg(not(feature = "std"))]
pub trait ViewKey: Ord + Clone {}
#[cfg(not(feature = "std"))]
impl<K: Ord + Clone> ViewKey for K {}
