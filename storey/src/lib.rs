//! A single parking level modelled as an ordered slot chain.
//!
//! Slots are nodes in a doubly-linked chain that lives in arena storage and
//! is linked by key rather than by reference. Positions are ordered along the
//! chain, and the lowest vacant position is always allocated first.
//!
//! ```text
//! Level              - capacity policy, failure taxonomy, public API
//!   └── SlotChain    - ordered insert, unlink, linear search
//!         └── Storage (BoundedSlab) - owns the SlotNodes, stable keys
//! ```
//!
//! # Quick Start
//!
//! ```
//! use storey::{Level, LevelError};
//!
//! let mut level = Level::builder().capacity(2).build().unwrap();
//!
//! let slot = level.allocate("KA-01-HH-1234", "White")?;
//! assert_eq!(slot, 1);
//! assert_eq!(level.find_by_plate("KA-01-HH-1234")?, 1);
//!
//! level.allocate("KA-01-HH-9999", "White")?;
//! assert_eq!(
//!     level.allocate("KA-01-BB-0001", "Black"),
//!     Err(LevelError::CapacityExceeded { capacity: 2 }),
//! );
//!
//! let released = level.release_by_plate("KA-01-HH-1234")?;
//! assert_eq!(released.position, 1);
//! assert_eq!(level.occupancy_count(), 1);
//! # Ok::<(), LevelError>(())
//! ```
//!
//! # Failure Taxonomy
//!
//! | Error | Meaning |
//! |-------|---------|
//! | [`LevelError::CapacityExceeded`] | every slot occupied |
//! | [`LevelError::NoVehiclesParked`] | query or release on an empty level |
//! | [`LevelError::NotFound`] | plate or position absent from a non-empty level |
//! | [`LevelError::AttributeNotFound`] | no vehicle with the requested color |
//! | [`LevelError::DuplicatePlate`] | plate already parked on this level |
//!
//! # Logging
//!
//! Successful allocations and releases emit `tracing` events at `debug`;
//! rejected requests emit at `trace`. The crate installs no subscriber.

#![warn(missing_docs)]

pub mod chain;
pub mod config;
pub mod error;
pub mod key;
pub mod level;
pub mod storage;
pub mod vehicle;

pub use chain::{FIRST_POSITION, SlotChain, SlotNode, SlotStorage};
pub use config::{LevelBuilder, LevelConfig};
pub use error::{ConfigError, LevelError};
pub use key::Key;
pub use level::{ColorMatch, Level, MAX_CAPACITY, Released, Slot};
pub use storage::{BoundedSlab, BoundedStorage, Full, Storage, UnboundedStorage};
pub use vehicle::Vehicle;
