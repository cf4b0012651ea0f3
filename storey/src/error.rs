//! Error types.

use thiserror::Error;

/// Failure of a [`Level`](crate::Level) operation.
///
/// Every variant is a normal outcome of querying current state; none leaves
/// the level modified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum LevelError {
    /// Every slot is occupied. Retry only after a release.
    #[error("level is full ({capacity} slots)")]
    CapacityExceeded {
        /// Capacity of the level.
        capacity: usize,
    },

    /// The level is empty.
    #[error("no vehicles parked")]
    NoVehiclesParked,

    /// No slot holds the requested plate or position.
    #[error("not found")]
    NotFound,

    /// No parked vehicle has the requested color.
    #[error("no vehicle with color {color:?}")]
    AttributeNotFound {
        /// The color that was searched for.
        color: String,
    },

    /// The plate is already parked on this level.
    #[error("plate {plate:?} already parked at slot {position}")]
    DuplicatePlate {
        /// The rejected plate.
        plate: String,
        /// Slot currently holding the plate.
        position: u32,
    },
}

/// Error building a [`Level`](crate::Level).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Capacity was missing or zero.
    #[error("capacity cannot be zero")]
    ZeroCapacity,

    /// Capacity is more slots than a `u32` position can number.
    #[error("capacity {capacity} exceeds the maximum of {max} slots")]
    CapacityTooLarge {
        /// Requested capacity.
        capacity: usize,
        /// Largest supported capacity.
        max: usize,
    },
}
