/// Bound for item identifiers used to key the row cache.
///
/// Blanket-implemented for every `Hash + Eq + Clone + Debug` type, so plain integers and strings
/// work out of the box.
pub trait GridKey: core::hash::Hash + Eq + Clone + core::fmt::Debug {}

impl<K: core::hash::Hash + Eq + Clone + core::fmt::Debug> GridKey for K {}
