//! MachineUpdate - sparse patch of mutable machine fields.
//!
//! The patch is a map from field to new value. Only fields present in the map
//! are applied; there is no null-versus-absent ambiguity. Identity fields
//! (`floor`, `pos`, `machine_type`) have no entry and cannot be patched.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};

use super::record::check_duration;
use super::{Machine, MachineStatus};
use crate::error::RegistryError;

/// Patchable machine fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UpdateField {
    Status,
    Duration,
    LastStartedAt,
}

/// A new value for one patchable field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateValue {
    Status(MachineStatus),
    Duration(Duration),
    LastStartedAt(DateTime<Utc>),
}

impl UpdateValue {
    pub fn field(&self) -> UpdateField {
        match self {
            UpdateValue::Status(_) => UpdateField::Status,
            UpdateValue::Duration(_) => UpdateField::Duration,
            UpdateValue::LastStartedAt(_) => UpdateField::LastStartedAt,
        }
    }
}

/// Partial update of a machine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MachineUpdate {
    changes: BTreeMap<UpdateField, UpdateValue>,
}

impl MachineUpdate {
    /// An empty patch. Applying it changes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: MachineStatus) -> Self {
        self.set(UpdateValue::Status(status));
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.set(UpdateValue::Duration(duration));
        self
    }

    pub fn last_started_at(mut self, at: DateTime<Utc>) -> Self {
        self.set(UpdateValue::LastStartedAt(at));
        self
    }

    /// Set a field, replacing any earlier value for the same field.
    pub fn set(&mut self, value: UpdateValue) -> Option<UpdateValue> {
        self.changes.insert(value.field(), value)
    }

    /// Drop a field from the patch so it is left untouched.
    pub fn unset(&mut self, field: UpdateField) -> Option<UpdateValue> {
        self.changes.remove(&field)
    }

    pub fn get(&self, field: UpdateField) -> Option<&UpdateValue> {
        self.changes.get(&field)
    }

    pub fn contains(&self, field: UpdateField) -> bool {
        self.changes.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Fields present in the patch, in a fixed order.
    pub fn fields(&self) -> impl Iterator<Item = UpdateField> + '_ {
        self.changes.keys().copied()
    }

    pub fn values(&self) -> impl Iterator<Item = &UpdateValue> {
        self.changes.values()
    }

    /// Check every value in the patch before it is merged.
    pub fn validate(&self) -> Result<(), RegistryError> {
        match self.changes.get(&UpdateField::Duration) {
            Some(UpdateValue::Duration(duration)) => check_duration(*duration),
            _ => Ok(()),
        }
    }

    /// Merge the patch onto `machine` in place.
    pub fn apply_to(&self, machine: &mut Machine) {
        for value in self.changes.values() {
            match value {
                UpdateValue::Status(status) => machine.status = *status,
                UpdateValue::Duration(duration) => machine.duration = *duration,
                UpdateValue::LastStartedAt(at) => machine.last_started_at = *at,
            }
        }
    }

    /// Return a patched copy of `machine`.
    pub fn applied(&self, machine: &Machine) -> Machine {
        let mut merged = machine.clone();
        self.apply_to(&mut merged);
        merged
    }
}

impl FromIterator<UpdateValue> for MachineUpdate {
    fn from_iter<I: IntoIterator<Item = UpdateValue>>(iter: I) -> Self {
        let mut update = MachineUpdate::new();
        for value in iter {
            update.set(value);
        }
        update
    }
}
