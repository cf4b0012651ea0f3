//! Level construction.
//!
//! [`LevelBuilder`] is the programmatic entry point. [`LevelConfig`] is the
//! same settings in a serde-deserializable shape, for embedding applications
//! that load their layout from a file.

use serde::Deserialize;

use crate::{ConfigError, Level, MAX_CAPACITY};

/// Builder for a [`Level`].
///
/// # Example
///
/// ```
/// use storey::LevelBuilder;
///
/// let level = LevelBuilder::default().capacity(6).build()?;
/// assert_eq!(level.capacity(), 6);
/// # Ok::<(), storey::ConfigError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct LevelBuilder {
    capacity: Option<usize>,
}

impl LevelBuilder {
    /// Number of slots on the level. Required.
    pub fn capacity(mut self, slots: usize) -> Self {
        self.capacity = Some(slots);
        self
    }

    /// Build the level. Slot storage grows as vehicles park.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::ZeroCapacity`] if capacity is missing or 0
    /// - [`ConfigError::CapacityTooLarge`] if capacity is over [`MAX_CAPACITY`]
    pub fn build(self) -> Result<Level, ConfigError> {
        let capacity = self.capacity.unwrap_or(0);
        if capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if capacity > MAX_CAPACITY {
            return Err(ConfigError::CapacityTooLarge {
                capacity,
                max: MAX_CAPACITY,
            });
        }
        Ok(Level::with_capacity(capacity))
    }
}

/// Deserializable level settings.
///
/// ```
/// use storey::LevelConfig;
///
/// let config = LevelConfig { capacity: 2 };
/// let level = config.build()?;
/// assert_eq!(level.available(), 2);
/// # Ok::<(), storey::ConfigError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LevelConfig {
    /// Number of slots on the level.
    pub capacity: usize,
}

impl LevelConfig {
    /// Converts to a builder.
    pub fn builder(&self) -> LevelBuilder {
        LevelBuilder::default().capacity(self.capacity)
    }

    /// Build the level described by this config.
    pub fn build(&self) -> Result<Level, ConfigError> {
        self.builder().build()
    }
}
