use thiserror::Error;

use crate::store::StoreError;

/// Error type for registry operations.
///
/// `Conflict` and `NotFound` are domain outcomes. `Unavailable` and
/// `InvalidInput` are passed through to the boundary layer unchanged.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A machine already occupies this position.
    #[error("machine at floor {floor} position {pos} already exists")]
    Conflict { floor: i32, pos: i32 },

    /// No machine at this position.
    #[error("machine at floor {floor} and position {pos} was not found")]
    NotFound { floor: i32, pos: i32 },

    /// The document store failed or returned something unreadable.
    #[error("store unavailable: {0}")]
    Unavailable(#[from] StoreError),

    /// A wire value could not be turned into a valid machine field.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl RegistryError {
    /// HTTP-style status code for the boundary layer.
    ///
    /// Conflicts map to 400, matching the product's existing create response.
    pub fn status_code(&self) -> u16 {
        match self {
            RegistryError::Conflict { .. } => 400,
            RegistryError::NotFound { .. } => 404,
            RegistryError::InvalidInput(_) => 422,
            RegistryError::Unavailable(_) => 503,
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, RegistryError::Conflict { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RegistryError::NotFound { .. })
    }
}
