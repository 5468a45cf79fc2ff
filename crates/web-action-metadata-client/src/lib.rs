//! Web action metadata client: fetches action descriptors, aggregates them
//! into a per-route metadata table, and projects every outcome into an
//! observable snapshot.

pub mod config;
pub mod controller;
pub mod render;
pub mod store;
pub mod transport;
pub mod types;

pub use config::ClientConfig;
pub use controller::FetchDispatchController;
pub use store::{reduce, Snapshot, StateContainer};
pub use transport::{Fetcher, HttpFetcher};
