//! Machine - the canonical laundry machine entity.
//!
//! A machine has two shapes. [`Machine`] is the internal one used by the
//! registry: its cycle length is a [`chrono::Duration`]. [`MachineRecord`] is
//! the wire and storage shape, where the cycle length is a plain integer
//! number of seconds. Conversion between the two is exact at second
//! granularity.
//!
//! Identity is derived from `(floor, pos)` only; see [`create_key`].
//!
//! ## Example
//!
//! ```ignore
//! use laundry_registry::{Machine, MachineStatus, MachineType, MachineRecord};
//!
//! let machine = Machine::new(0, 1, MachineType::Dryer, MachineStatus::Idle, Duration::minutes(50));
//! assert_eq!(machine.key(), "machine:0:1");
//!
//! let record = MachineRecord::from(&machine);
//! assert_eq!(record.duration, 3000);
//! ```

mod keys;
mod record;
mod update;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

pub use keys::{create_key, create_typed_key, KEY_PREFIX};
pub use record::{MachineRecord, MachineUpdateRecord, NewMachineRecord};
pub use update::{MachineUpdate, UpdateField, UpdateValue};

/// States a machine can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MachineStatus {
    Idle,
    InUse,
    Finishing,
    Error,
}

impl MachineStatus {
    /// Canonical tag, as stored and searched.
    pub fn as_str(&self) -> &'static str {
        match self {
            MachineStatus::Idle => "idle",
            MachineStatus::InUse => "in_use",
            MachineStatus::Finishing => "finishing",
            MachineStatus::Error => "error",
        }
    }
}

impl fmt::Display for MachineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MachineStatus {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idle" => Ok(MachineStatus::Idle),
            "in_use" => Ok(MachineStatus::InUse),
            "finishing" => Ok(MachineStatus::Finishing),
            "error" => Ok(MachineStatus::Error),
            other => Err(RegistryError::InvalidInput(format!(
                "unknown machine status '{}', expected one of: idle, in_use, finishing, error",
                other
            ))),
        }
    }
}

/// Kind of machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MachineType {
    Washer,
    Dryer,
}

impl MachineType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MachineType::Washer => "washer",
            MachineType::Dryer => "dryer",
        }
    }
}

impl fmt::Display for MachineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MachineType {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "washer" => Ok(MachineType::Washer),
            "dryer" => Ok(MachineType::Dryer),
            other => Err(RegistryError::InvalidInput(format!(
                "unknown machine type '{}', expected one of: washer, dryer",
                other
            ))),
        }
    }
}

/// Internal representation of a machine.
///
/// `floor`, `pos` and `machine_type` are fixed at creation; the registry never
/// patches them. Machines on a floor are numbered left to right from 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Machine {
    pub floor: i32,
    pub pos: i32,
    pub machine_type: MachineType,
    pub status: MachineStatus,
    pub last_started_at: DateTime<Utc>,
    /// Approximate length of one cycle.
    pub duration: Duration,
}

impl Machine {
    /// Create a machine whose `last_started_at` defaults to now.
    pub fn new(
        floor: i32,
        pos: i32,
        machine_type: MachineType,
        status: MachineStatus,
        duration: Duration,
    ) -> Self {
        Self {
            floor,
            pos,
            machine_type,
            status,
            last_started_at: Utc::now(),
            duration,
        }
    }

    pub fn with_last_started_at(mut self, at: DateTime<Utc>) -> Self {
        self.last_started_at = at;
        self
    }

    /// Storage key, `machine:{floor}:{pos}`.
    pub fn key(&self) -> String {
        create_key(self.floor, self.pos)
    }

    /// Type-qualified key, `{type}:{floor}:{pos}`.
    pub fn typed_key(&self) -> String {
        create_typed_key(self.machine_type, self.floor, self.pos)
    }

    /// Check that the machine can be written in its external shape.
    pub fn validate(&self) -> Result<(), RegistryError> {
        record::check_duration(self.duration)
    }
}
