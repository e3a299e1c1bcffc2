//! Machine service - the registry's public operations.
//!
//! [`MachineService`] is the interface the HTTP and auth layers call into.
//! [`MachineRegistry`] implements it on top of any
//! [`DocumentStore`](crate::store::DocumentStore).
//!
//! ## Quick Start
//!
//! ```ignore
//! use laundry_registry::{
//!     InMemoryDocumentStore, Machine, MachineFilter, MachineRegistry, MachineService,
//!     MachineStatus, MachineType,
//! };
//!
//! let registry = MachineRegistry::new(InMemoryDocumentStore::new());
//! registry.create(&Machine::new(0, 0, MachineType::Washer, MachineStatus::Idle, Duration::minutes(40)))?;
//!
//! let started = registry.start(0, 0)?;
//! assert_eq!(started.status, MachineStatus::InUse);
//!
//! let busy = registry.find(&MachineFilter::new().status(MachineStatus::InUse))?;
//! ```
//!
//! ## Concurrency
//!
//! `create` relies on the store's atomic conditional insert, so two racing
//! creates for one position produce exactly one success. `update`, `start`
//! and `stop` read the document, merge, then write it back in full: two
//! concurrent updates to the same machine are last-writer-wins.

mod registry;

use crate::error::RegistryError;
use crate::filter::MachineFilter;
use crate::machine::{Machine, MachineStatus, MachineUpdate};

pub use registry::MachineRegistry;

/// Create, query and mutate machines.
pub trait MachineService: Send + Sync {
    /// Register a new machine. Fails with `Conflict` if any machine already
    /// occupies `(floor, pos)`; the existing machine is left untouched.
    fn create(&self, machine: &Machine) -> Result<(), RegistryError>;

    /// Machines matching every set field of `filter`, at most one page.
    /// Nothing matching is an empty vector, not an error.
    fn find(&self, filter: &MachineFilter) -> Result<Vec<Machine>, RegistryError>;

    /// Merge `patch` onto the machine at `(floor, pos)` and return the result.
    fn update(
        &self,
        floor: i32,
        pos: i32,
        patch: &MachineUpdate,
    ) -> Result<Machine, RegistryError>;

    /// Mark the machine in use, starting now.
    fn start(&self, floor: i32, pos: i32) -> Result<Machine, RegistryError>;

    /// Mark the machine idle.
    fn stop(&self, floor: i32, pos: i32) -> Result<Machine, RegistryError> {
        self.update(floor, pos, &MachineUpdate::new().status(MachineStatus::Idle))
    }

    /// Remove the machine at `(floor, pos)` and return it.
    fn delete(&self, floor: i32, pos: i32) -> Result<Machine, RegistryError>;
}
