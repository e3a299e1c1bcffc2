//! MachineFilter - optional predicates for machine search.
//!
//! Every field is optional. An unset field places no constraint on that
//! dimension; set fields are combined with logical AND. An empty filter
//! matches every machine, bounded by the fixed page size.

use chrono::Duration;

use crate::machine::{MachineStatus, MachineType};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MachineFilter {
    pub status: Option<MachineStatus>,
    pub floor: Option<i32>,
    pub pos: Option<i32>,
    pub machine_type: Option<MachineType>,
    /// Inclusive lower bound on cycle length.
    pub min_duration: Option<Duration>,
    /// Inclusive upper bound on cycle length.
    pub max_duration: Option<Duration>,
}

impl MachineFilter {
    /// A filter with no constraints.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: MachineStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn floor(mut self, floor: i32) -> Self {
        self.floor = Some(floor);
        self
    }

    pub fn pos(mut self, pos: i32) -> Self {
        self.pos = Some(pos);
        self
    }

    pub fn machine_type(mut self, machine_type: MachineType) -> Self {
        self.machine_type = Some(machine_type);
        self
    }

    pub fn min_duration(mut self, duration: Duration) -> Self {
        self.min_duration = Some(duration);
        self
    }

    pub fn max_duration(mut self, duration: Duration) -> Self {
        self.max_duration = Some(duration);
        self
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
