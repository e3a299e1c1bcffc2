//! MachineRegistry - MachineService over a document store.

use serde_json::Value;
use tracing::{debug, info};

use super::MachineService;
use crate::clock::{Clock, SystemClock};
use crate::error::RegistryError;
use crate::filter::MachineFilter;
use crate::machine::{create_key, Machine, MachineRecord, MachineStatus, MachineUpdate};
use crate::query::translate;
use crate::store::{DocumentStore, StoreError};

/// Registry of machines backed by a [`DocumentStore`].
///
/// Documents are always written in the [`MachineRecord`] shape; the store
/// never sees the internal representation.
pub struct MachineRegistry<S, C = SystemClock> {
    store: S,
    clock: C,
}

impl<S: DocumentStore> MachineRegistry<S> {
    /// Create a registry that uses wall-clock time.
    pub fn new(store: S) -> Self {
        Self {
            store,
            clock: SystemClock,
        }
    }
}

impl<S: DocumentStore, C: Clock> MachineRegistry<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    /// Get a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Get the machine at `(floor, pos)`, if any.
    pub fn get(&self, floor: i32, pos: i32) -> Result<Option<Machine>, RegistryError> {
        let key = create_key(floor, pos);
        match self.store.get(&key)? {
            Some(json) => Ok(Some(decode(&key, json)?)),
            None => Ok(None),
        }
    }
}

impl<S: DocumentStore, C: Clock> MachineService for MachineRegistry<S, C> {
    fn create(&self, machine: &Machine) -> Result<(), RegistryError> {
        machine.validate()?;
        let key = machine.key();
        let json = encode(machine)?;

        if !self.store.set_if_absent(&key, &json)? {
            debug!(%key, "machine already exists, create rejected");
            return Err(RegistryError::Conflict {
                floor: machine.floor,
                pos: machine.pos,
            });
        }

        debug!(%key, machine_type = %machine.machine_type, "created machine");
        Ok(())
    }

    fn find(&self, filter: &MachineFilter) -> Result<Vec<Machine>, RegistryError> {
        let query = translate(filter);
        let query_string = query.query_string();
        info!(query = %query_string, "executing machine search");

        let results = self
            .store
            .search(&query_string, query.offset, query.limit)?;

        debug!(
            total = results.total,
            returned = results.documents.len(),
            "machine search finished"
        );

        results
            .documents
            .into_iter()
            .map(|doc| decode(&doc.id, doc.json))
            .collect()
    }

    fn update(
        &self,
        floor: i32,
        pos: i32,
        patch: &MachineUpdate,
    ) -> Result<Machine, RegistryError> {
        patch.validate()?;
        let key = create_key(floor, pos);
        let current = match self.store.get(&key)? {
            Some(json) => decode(&key, json)?,
            None => {
                debug!(%key, "update on missing machine");
                return Err(RegistryError::NotFound { floor, pos });
            }
        };

        let merged = patch.applied(&current);
        self.store.set(&key, &encode(&merged)?)?;

        debug!(%key, fields = ?patch.fields().collect::<Vec<_>>(), "updated machine");
        Ok(merged)
    }

    fn start(&self, floor: i32, pos: i32) -> Result<Machine, RegistryError> {
        let patch = MachineUpdate::new()
            .status(MachineStatus::InUse)
            .last_started_at(self.clock.now());
        self.update(floor, pos, &patch)
    }

    fn delete(&self, floor: i32, pos: i32) -> Result<Machine, RegistryError> {
        let key = create_key(floor, pos);
        match self.store.delete(&key)? {
            Some(json) => {
                debug!(%key, "deleted machine");
                decode(&key, json)
            }
            None => Err(RegistryError::NotFound { floor, pos }),
        }
    }
}

fn encode(machine: &Machine) -> Result<Value, RegistryError> {
    serde_json::to_value(MachineRecord::from(machine))
        .map_err(|e| StoreError::Serialization(e.to_string()).into())
}

/// Stored documents that do not decode into a valid machine are reported as a
/// store failure; they were not supplied by the caller.
fn decode(key: &str, json: Value) -> Result<Machine, RegistryError> {
    let corrupt = |reason: String| StoreError::Corrupt {
        key: key.to_string(),
        reason,
    };
    let record: MachineRecord =
        serde_json::from_value(json).map_err(|e| corrupt(e.to_string()))?;
    Machine::try_from(record).map_err(|e| corrupt(e.to_string()).into())
}
