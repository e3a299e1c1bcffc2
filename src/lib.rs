//! Live state registry for a building's laundry machines.
//!
//! Machines are identified by `(floor, pos)` and stored as JSON documents in a
//! [`DocumentStore`]. The [`MachineService`] trait is the entry point for the
//! HTTP layer; [`MachineRegistry`] is its store-backed implementation.

mod clock;
mod config;
mod error;
mod filter;
mod machine;
mod service;
mod telemetry;

pub mod query;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use self::config::{ConfigError, RegistryConfig, ENV_PREFIX};
pub use error::RegistryError;
pub use filter::MachineFilter;
pub use machine::{
    create_key, create_typed_key, Machine, MachineRecord, MachineStatus, MachineType,
    MachineUpdate, MachineUpdateRecord, NewMachineRecord, UpdateField, UpdateValue, KEY_PREFIX,
};
pub use query::{translate, Bound, Clause, SearchQuery};
pub use service::{MachineRegistry, MachineService};
pub use store::{AnyStore, DocumentStore, InMemoryDocumentStore, SearchResults, StoreError};
#[cfg(feature = "redb")]
pub use store::RedbDocumentStore;
pub use telemetry::{init_tracing, TelemetryConfig, TelemetryError};
