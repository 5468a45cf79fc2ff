//! Fetch-dispatch controller: runs operations and publishes their outcome.

pub mod dispatcher;
pub mod process;

pub use dispatcher::FetchDispatchController;
pub use process::run_operation;
