use core::fmt;
use core::hash::Hash;

/// Identity of an item in a [`crate::SimHost`].
pub trait SimKey: Clone + Eq + Hash + fmt::Debug {}
impl<T: Clone + Eq + Hash + fmt::Debug> SimKey for T {}
