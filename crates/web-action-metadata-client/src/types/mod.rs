//! Event, payload, and error types shared by the controller and the store.

pub mod error;
pub mod event;

pub use error::*;
pub use event::*;
