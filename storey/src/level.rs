//! A single parking level.
//!
//! [`Level`] owns the slot storage and the chain threaded through it, and is
//! the only way to mutate either. All operations are synchronous and walk the
//! chain from its head.
//!
//! # Example
//!
//! ```
//! use storey::{Level, LevelError};
//!
//! let mut level = Level::with_capacity(3);
//!
//! assert_eq!(level.allocate("KA-01", "White")?, 1);
//! assert_eq!(level.allocate("KA-02", "Black")?, 2);
//! assert_eq!(level.allocate("KA-03", "White")?, 3);
//!
//! let released = level.release_by_position(2)?;
//! assert_eq!(released.vehicle.plate(), "KA-02");
//!
//! // The freed slot is handed out again before anything higher
//! assert_eq!(level.allocate("KA-04", "Red")?, 2);
//! assert_eq!(level.positions_by_color("White")?, vec![1, 3]);
//! # Ok::<(), LevelError>(())
//! ```
//!
//! # Concurrency
//!
//! Mutation needs `&mut Level`. Share a level across threads by wrapping the
//! whole value in one mutex held for each request.

use serde::Serialize;

use crate::{LevelBuilder, LevelError, SlotChain, SlotNode, SlotStorage, Storage, Vehicle};

/// An occupied slot, as reported by [`Level::list_all`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slot {
    /// Slot number.
    pub position: u32,
    /// Plate of the parked vehicle.
    pub plate: String,
    /// Color of the parked vehicle.
    pub color: String,
}

/// A slot matched by [`Level::find_all_by_color`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorMatch {
    /// Slot number.
    pub position: u32,
    /// Plate of the parked vehicle.
    pub plate: String,
}

/// A freed slot and the vehicle that left it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Released {
    /// The slot number that is now vacant.
    pub position: u32,
    /// The vehicle that occupied it.
    pub vehicle: Vehicle,
}

/// One parking level: a capacity-bounded, position-ordered chain of slots.
///
/// Allocation always takes the lowest vacant position. Plates are unique
/// within a level.
#[derive(Debug)]
pub struct Level {
    capacity: usize,
    storage: SlotStorage,
    chain: SlotChain<SlotStorage>,
}

/// Largest supported capacity. Positions are `u32`, numbered from 1.
pub const MAX_CAPACITY: usize = u32::MAX as usize;

impl Level {
    /// Creates an empty level with `capacity` slots.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0 or greater than [`MAX_CAPACITY`]. Use
    /// [`LevelBuilder`] for a fallible constructor.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity <= MAX_CAPACITY, "capacity exceeds MAX_CAPACITY");
        Self {
            capacity,
            storage: SlotStorage::with_capacity(capacity),
            chain: SlotChain::new(),
        }
    }

    /// Returns a builder.
    pub fn builder() -> LevelBuilder {
        LevelBuilder::default()
    }

    /// Number of slots on the level.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of occupied slots, counted by walking the chain.
    pub fn occupancy_count(&self) -> usize {
        self.chain.count(&self.storage)
    }

    /// Number of vacant slots.
    pub fn available(&self) -> usize {
        self.capacity - self.occupancy_count()
    }

    /// Returns `true` if every slot is occupied.
    pub fn is_full(&self) -> bool {
        self.occupancy_count() >= self.capacity
    }

    /// Returns `true` if no slot is occupied.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Position of the first occupied slot.
    pub fn head_position(&self) -> Option<u32> {
        let key = self.chain.head_key()?;
        self.chain.get(&self.storage, key).map(SlotNode::position)
    }

    /// Iterates occupied slots in position order without copying.
    pub fn slots(&self) -> impl DoubleEndedIterator<Item = &SlotNode> + '_ {
        self.chain.iter(&self.storage)
    }

    /// Checks the chain's link and ordering invariants.
    pub fn is_well_formed(&self) -> bool {
        self.chain.is_well_formed(&self.storage)
            && self.occupancy_count() == self.storage.len()
            && self.storage.len() <= self.capacity
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Parks a vehicle in the lowest vacant slot and returns its position.
    ///
    /// # Errors
    ///
    /// - [`LevelError::CapacityExceeded`] if every slot is occupied
    /// - [`LevelError::DuplicatePlate`] if `plate` is already parked here
    pub fn allocate(
        &mut self,
        plate: impl Into<String>,
        color: impl Into<String>,
    ) -> Result<u32, LevelError> {
        let plate = plate.into();

        if self.occupancy_count() >= self.capacity {
            tracing::trace!(%plate, capacity = self.capacity, "allocation rejected, level full");
            return Err(LevelError::CapacityExceeded {
                capacity: self.capacity,
            });
        }

        if let Ok(position) = self.find_by_plate(&plate) {
            tracing::trace!(%plate, position, "allocation rejected, plate already parked");
            return Err(LevelError::DuplicatePlate { plate, position });
        }

        let vehicle = Vehicle::new(plate, color);
        let (_, position) = self
            .chain
            .try_insert_ordered(&mut self.storage, vehicle)
            .map_err(|_| LevelError::CapacityExceeded {
                capacity: self.capacity,
            })?;
        debug_assert!(self.chain.is_well_formed(&self.storage));

        tracing::debug!(position, "allocated slot");
        Ok(position)
    }

    /// Frees the slot holding `plate`.
    ///
    /// # Errors
    ///
    /// - [`LevelError::NoVehiclesParked`] if the level is empty
    /// - [`LevelError::NotFound`] if no slot holds `plate`
    pub fn release_by_plate(&mut self, plate: &str) -> Result<Released, LevelError> {
        self.ensure_occupied()?;
        let key = self.chain.find_by_plate(&self.storage, plate);
        self.release(key)
    }

    /// Frees the slot at `position`.
    ///
    /// # Errors
    ///
    /// - [`LevelError::NoVehiclesParked`] if the level is empty
    /// - [`LevelError::NotFound`] if `position` is vacant or out of range
    pub fn release_by_position(&mut self, position: u32) -> Result<Released, LevelError> {
        self.ensure_occupied()?;
        let key = self.chain.find_by_position(&self.storage, position);
        self.release(key)
    }

    fn release(&mut self, key: Option<usize>) -> Result<Released, LevelError> {
        let Some(node) = key.and_then(|key| self.chain.remove(&mut self.storage, key)) else {
            tracing::trace!("release rejected, no matching slot");
            return Err(LevelError::NotFound);
        };
        debug_assert!(self.chain.is_well_formed(&self.storage));

        let position = node.position();
        let vehicle = node.into_vehicle();
        tracing::debug!(position, plate = vehicle.plate(), "released slot");

        Ok(Released { position, vehicle })
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Returns the position of the slot holding `plate`.
    ///
    /// # Errors
    ///
    /// - [`LevelError::NoVehiclesParked`] if the level is empty
    /// - [`LevelError::NotFound`] if no slot holds `plate`
    pub fn find_by_plate(&self, plate: &str) -> Result<u32, LevelError> {
        self.ensure_occupied()?;
        self.chain
            .find_by_plate(&self.storage, plate)
            .and_then(|key| self.chain.get(&self.storage, key))
            .map(SlotNode::position)
            .ok_or(LevelError::NotFound)
    }

    /// Returns the vehicle parked at `position`.
    ///
    /// # Errors
    ///
    /// - [`LevelError::NoVehiclesParked`] if the level is empty
    /// - [`LevelError::NotFound`] if `position` is vacant or out of range
    pub fn find_by_position(&self, position: u32) -> Result<&Vehicle, LevelError> {
        self.ensure_occupied()?;
        self.chain
            .find_by_position(&self.storage, position)
            .and_then(|key| self.chain.get(&self.storage, key))
            .map(SlotNode::vehicle)
            .ok_or(LevelError::NotFound)
    }

    /// Returns every slot whose vehicle has `color`, in position order.
    ///
    /// # Errors
    ///
    /// - [`LevelError::NoVehiclesParked`] if the level is empty
    /// - [`LevelError::AttributeNotFound`] if no vehicle has `color`
    pub fn find_all_by_color(&self, color: &str) -> Result<Vec<ColorMatch>, LevelError> {
        self.ensure_occupied()?;

        let matches: Vec<_> = self
            .chain
            .find_all_by_color(&self.storage, color)
            .map(|node| ColorMatch {
                position: node.position(),
                plate: node.vehicle().plate().to_owned(),
            })
            .collect();

        if matches.is_empty() {
            return Err(LevelError::AttributeNotFound {
                color: color.to_owned(),
            });
        }
        Ok(matches)
    }

    /// Plates of every vehicle with `color`, in position order.
    ///
    /// Fails like [`Level::find_all_by_color`].
    pub fn plates_by_color(&self, color: &str) -> Result<Vec<String>, LevelError> {
        let matches = self.find_all_by_color(color)?;
        Ok(matches.into_iter().map(|m| m.plate).collect())
    }

    /// Positions of every vehicle with `color`, ascending.
    ///
    /// Fails like [`Level::find_all_by_color`].
    pub fn positions_by_color(&self, color: &str) -> Result<Vec<u32>, LevelError> {
        let matches = self.find_all_by_color(color)?;
        Ok(matches.into_iter().map(|m| m.position).collect())
    }

    /// Snapshot of every occupied slot in position order.
    ///
    /// # Errors
    ///
    /// [`LevelError::NoVehiclesParked`] if the level is empty.
    pub fn list_all(&self) -> Result<Vec<Slot>, LevelError> {
        self.ensure_occupied()?;
        Ok(self
            .slots()
            .map(|node| Slot {
                position: node.position(),
                plate: node.vehicle().plate().to_owned(),
                color: node.vehicle().color().to_owned(),
            })
            .collect())
    }

    #[inline]
    fn ensure_occupied(&self) -> Result<(), LevelError> {
        if self.chain.is_empty() {
            return Err(LevelError::NoVehiclesParked);
        }
        Ok(())
    }
}
