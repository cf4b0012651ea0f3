//! The vehicle parked in a slot.

use serde::Serialize;

/// A parked vehicle: registration plate plus a color tag.
///
/// Immutable once built. Owned by the slot that holds it and handed back to
/// the caller when the slot is released.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Vehicle {
    plate: String,
    color: String,
}

impl Vehicle {
    /// Creates a vehicle.
    pub fn new(plate: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            plate: plate.into(),
            color: color.into(),
        }
    }

    /// Registration plate.
    #[inline]
    pub fn plate(&self) -> &str {
        &self.plate
    }

    /// Color tag. Compared by exact string equality.
    #[inline]
    pub fn color(&self) -> &str {
        &self.color
    }
}

impl core::fmt::Display for Vehicle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} ({})", self.plate, self.color)
    }
}
