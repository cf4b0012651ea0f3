//! Arena storage for slot nodes.
//!
//! Storage hands out stable keys that stay valid until the entry is removed.
//! The slot chain links nodes through these keys instead of references, so a
//! removed node can never leave a dangling back link behind.

use core::convert::Infallible;
use core::marker::PhantomData;

use crate::Key;

/// Slab-like storage with stable keys.
///
/// # Implementations
///
/// - `slab::Slab<T>` - growable, infallible insertion
/// - [`BoundedSlab<T, K>`] - fixed capacity, returns [`Full`] when exhausted
pub trait Storage<T> {
    /// Key type handed out by this storage.
    type Key: Key;

    /// Error type for failed insertions.
    ///
    /// - `Full<T>` for fixed-capacity storage
    /// - `Infallible` for growable storage
    type Error;

    /// Inserts a value, returning its stable key.
    fn try_insert(&mut self, value: T) -> Result<Self::Key, Self::Error>;

    /// Removes and returns the value at `key`, if present.
    fn remove(&mut self, key: Self::Key) -> Option<T>;

    /// Returns a reference to the value at `key`, if present.
    fn get(&self, key: Self::Key) -> Option<&T>;

    /// Returns a mutable reference to the value at `key`, if present.
    fn get_mut(&mut self, key: Self::Key) -> Option<&mut T>;

    /// Returns the number of occupied entries.
    fn len(&self) -> usize;

    /// Returns `true` if no entries are occupied.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Storage with a fixed capacity.
pub trait BoundedStorage<T>: Storage<T, Error = Full<T>> {
    /// Returns the maximum number of entries.
    fn capacity(&self) -> usize;

    /// Returns `true` if no further insert can succeed.
    #[inline]
    fn is_full(&self) -> bool {
        self.len() >= self.capacity()
    }
}

/// Storage that grows on demand.
pub trait UnboundedStorage<T>: Storage<T, Error = Infallible> {
    /// Inserts a value, returning its stable key.
    #[inline]
    fn insert(&mut self, value: T) -> Self::Key {
        match self.try_insert(value) {
            Ok(key) => key,
            Err(never) => match never {},
        }
    }
}

impl<T, S: Storage<T, Error = Infallible>> UnboundedStorage<T> for S {}

/// Error returned when fixed-capacity storage is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Full<T>(pub T);

impl<T> Full<T> {
    /// Returns the value that could not be inserted.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> core::fmt::Display for Full<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "storage is full")
    }
}

impl<T: core::fmt::Debug> std::error::Error for Full<T> {}

// =============================================================================
// slab::Slab - unbounded
// =============================================================================

impl<T> Storage<T> for slab::Slab<T> {
    type Key = usize;
    type Error = Infallible;

    #[inline]
    fn try_insert(&mut self, value: T) -> Result<Self::Key, Self::Error> {
        Ok(self.insert(value))
    }

    #[inline]
    fn remove(&mut self, key: Self::Key) -> Option<T> {
        self.try_remove(key)
    }

    #[inline]
    fn get(&self, key: Self::Key) -> Option<&T> {
        slab::Slab::get(self, key)
    }

    #[inline]
    fn get_mut(&mut self, key: Self::Key) -> Option<&mut T> {
        slab::Slab::get_mut(self, key)
    }

    #[inline]
    fn len(&self) -> usize {
        slab::Slab::len(self)
    }
}

// =============================================================================
// BoundedSlab - fixed capacity over slab::Slab
// =============================================================================

/// Fixed-capacity storage backed by a `slab::Slab`.
///
/// The slab grows on demand but never past `capacity`; an insert beyond it
/// hands the value back in [`Full`]. Keys are any [`Key`] type wide enough
/// to address `capacity` entries.
///
/// # Example
///
/// ```
/// use storey::{BoundedSlab, BoundedStorage, Storage};
///
/// let mut storage: BoundedSlab<&str, u32> = BoundedSlab::with_capacity(1);
/// let key = storage.try_insert("a").unwrap();
/// assert!(storage.is_full());
/// assert_eq!(storage.try_insert("b").unwrap_err().into_inner(), "b");
/// assert_eq!(storage.remove(key), Some("a"));
/// ```
#[derive(Debug, Clone)]
pub struct BoundedSlab<T, K: Key = usize> {
    slab: slab::Slab<T>,
    capacity: usize,
    _key: PhantomData<K>,
}

impl<T, K: Key> BoundedSlab<T, K> {
    /// Creates storage holding at most `capacity` entries.
    ///
    /// Nothing is allocated up front.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0 or if `K` cannot address `capacity` entries
    /// without reaching its `NONE` sentinel.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be > 0");
        assert!(
            capacity <= K::NONE.as_usize(),
            "capacity exceeds key type range"
        );

        Self {
            slab: slab::Slab::new(),
            capacity,
            _key: PhantomData,
        }
    }
}

impl<T, K: Key> Storage<T> for BoundedSlab<T, K> {
    type Key = K;
    type Error = Full<T>;

    #[inline]
    fn try_insert(&mut self, value: T) -> Result<Self::Key, Self::Error> {
        if self.slab.len() >= self.capacity {
            return Err(Full(value));
        }
        Ok(K::from_usize(self.slab.insert(value)))
    }

    #[inline]
    fn remove(&mut self, key: Self::Key) -> Option<T> {
        self.slab.try_remove(key.as_usize())
    }

    #[inline]
    fn get(&self, key: Self::Key) -> Option<&T> {
        self.slab.get(key.as_usize())
    }

    #[inline]
    fn get_mut(&mut self, key: Self::Key) -> Option<&mut T> {
        self.slab.get_mut(key.as_usize())
    }

    #[inline]
    fn len(&self) -> usize {
        self.slab.len()
    }
}

impl<T, K: Key> BoundedStorage<T> for BoundedSlab<T, K> {
    #[inline]
    fn capacity(&self) -> usize {
        self.capacity
    }
}
