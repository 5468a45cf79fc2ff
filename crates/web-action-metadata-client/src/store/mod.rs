//! Snapshot projection and the state container observers read from.

pub mod container;
pub mod reducer;

pub use container::StateContainer;
pub use reducer::{reduce, Snapshot};
