//! Deterministic machine keys.

use super::MachineType;

/// Namespace of every machine document key.
pub const KEY_PREFIX: &str = "machine";

/// Primary key for the machine at `(floor, pos)`.
///
/// The machine type is deliberately absent: at most one machine may occupy a
/// position, whatever its type.
pub fn create_key(floor: i32, pos: i32) -> String {
    format!("{}:{}:{}", KEY_PREFIX, floor, pos)
}

/// Secondary key qualified by machine type, `{type}:{floor}:{pos}`.
pub fn create_typed_key(machine_type: MachineType, floor: i32, pos: i32) -> String {
    format!("{}:{}:{}", machine_type, floor, pos)
}
