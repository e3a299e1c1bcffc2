//! Wire and storage shapes: durations as integer seconds.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::keys::{create_key, create_typed_key};
use super::{Machine, MachineStatus, MachineType, MachineUpdate, UpdateValue};
use crate::error::RegistryError;

/// External representation of a machine. This is also the exact JSON shape
/// held by the document store, so every field is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineRecord {
    pub floor: i32,
    pub pos: i32,
    #[serde(rename = "type")]
    pub machine_type: MachineType,
    pub status: MachineStatus,
    pub last_started_at: DateTime<Utc>,
    /// Cycle length in seconds.
    pub duration: i64,
}

impl MachineRecord {
    pub fn create_key(&self) -> String {
        create_key(self.floor, self.pos)
    }

    pub fn create_typed_key(&self) -> String {
        create_typed_key(self.machine_type, self.floor, self.pos)
    }
}

impl From<&Machine> for MachineRecord {
    fn from(machine: &Machine) -> Self {
        Self {
            floor: machine.floor,
            pos: machine.pos,
            machine_type: machine.machine_type,
            status: machine.status,
            last_started_at: machine.last_started_at,
            duration: machine.duration.num_seconds(),
        }
    }
}

impl From<Machine> for MachineRecord {
    fn from(machine: Machine) -> Self {
        Self::from(&machine)
    }
}

impl TryFrom<MachineRecord> for Machine {
    type Error = RegistryError;

    fn try_from(record: MachineRecord) -> Result<Self, Self::Error> {
        Ok(Machine {
            floor: record.floor,
            pos: record.pos,
            machine_type: record.machine_type,
            status: record.status,
            last_started_at: record.last_started_at,
            duration: duration_from_secs(record.duration)?,
        })
    }
}

/// Create request body. Same as [`MachineRecord`] except that
/// `last_started_at` may be omitted and then defaults to the time of decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMachineRecord {
    pub floor: i32,
    pub pos: i32,
    #[serde(rename = "type")]
    pub machine_type: MachineType,
    pub status: MachineStatus,
    #[serde(default = "Utc::now")]
    pub last_started_at: DateTime<Utc>,
    pub duration: i64,
}

impl TryFrom<NewMachineRecord> for Machine {
    type Error = RegistryError;

    fn try_from(record: NewMachineRecord) -> Result<Self, Self::Error> {
        Machine::try_from(MachineRecord {
            floor: record.floor,
            pos: record.pos,
            machine_type: record.machine_type,
            status: record.status,
            last_started_at: record.last_started_at,
            duration: record.duration,
        })
    }
}

/// External representation of a partial update. Absent fields are left out
/// of the resulting [`MachineUpdate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineUpdateRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<MachineStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_started_at: Option<DateTime<Utc>>,
}

impl TryFrom<MachineUpdateRecord> for MachineUpdate {
    type Error = RegistryError;

    fn try_from(record: MachineUpdateRecord) -> Result<Self, Self::Error> {
        let mut update = MachineUpdate::new();
        if let Some(status) = record.status {
            update.set(UpdateValue::Status(status));
        }
        if let Some(secs) = record.duration {
            update.set(UpdateValue::Duration(duration_from_secs(secs)?));
        }
        if let Some(at) = record.last_started_at {
            update.set(UpdateValue::LastStartedAt(at));
        }
        Ok(update)
    }
}

impl From<&MachineUpdate> for MachineUpdateRecord {
    fn from(update: &MachineUpdate) -> Self {
        let mut record = MachineUpdateRecord::default();
        for value in update.values() {
            match value {
                UpdateValue::Status(status) => record.status = Some(*status),
                UpdateValue::Duration(duration) => record.duration = Some(duration.num_seconds()),
                UpdateValue::LastStartedAt(at) => record.last_started_at = Some(*at),
            }
        }
        record
    }
}

/// Reject cycle lengths that have no wire form.
pub(crate) fn check_duration(duration: Duration) -> Result<(), RegistryError> {
    if duration < Duration::zero() {
        return Err(RegistryError::InvalidInput(format!(
            "duration must be non-negative, got {}s",
            duration.num_seconds()
        )));
    }
    Ok(())
}

fn duration_from_secs(secs: i64) -> Result<Duration, RegistryError> {
    if secs < 0 {
        return Err(RegistryError::InvalidInput(format!(
            "duration must be a non-negative number of seconds, got {}",
            secs
        )));
    }
    Duration::try_seconds(secs).ok_or_else(|| {
        RegistryError::InvalidInput(format!("duration of {} seconds is out of range", secs))
    })
}
