//! Ordered slot chain over arena storage.
//!
//! Each [`SlotNode`] carries its slot position, the parked [`Vehicle`], and
//! `prev`/`next` keys into the same storage. Positions strictly increase from
//! head to tail but may have gaps left behind by released slots.
//!
//! # Allocation Policy
//!
//! Insertion is first-fit by ascending position: the lowest vacant position
//! is always handed out, so freed positions are reused before the chain grows.
//!
//! ```
//! use storey::{SlotChain, SlotStorage, Vehicle};
//!
//! let mut storage = SlotStorage::with_capacity(8);
//! let mut chain: SlotChain<SlotStorage> = SlotChain::new();
//!
//! chain.try_insert_ordered(&mut storage, Vehicle::new("A", "red")).unwrap();
//! let (b, _) = chain.try_insert_ordered(&mut storage, Vehicle::new("B", "red")).unwrap();
//! chain.try_insert_ordered(&mut storage, Vehicle::new("C", "red")).unwrap();
//!
//! chain.remove(&mut storage, b);
//!
//! // Position 2 is vacant again and wins over appending at 4
//! let (_, position) = chain.try_insert_ordered(&mut storage, Vehicle::new("D", "red")).unwrap();
//! assert_eq!(position, 2);
//! ```
//!
//! # Storage Invariant
//!
//! A chain must always be used with the same storage instance. The chain
//! holds keys only; passing a different storage panics on the first stale
//! link or silently reads unrelated nodes.
//!
//! # Complexity
//!
//! Insertion, lookup, and [`SlotChain::count`] walk the chain: O(n). There is
//! no index, and the count is never cached.

use core::cmp::Ordering;
use std::marker::PhantomData;

use crate::{BoundedSlab, BoundedStorage, Full, Key, Storage, UnboundedStorage, Vehicle};

/// Position of the first slot on a level.
pub const FIRST_POSITION: u32 = 1;

/// Bounded storage for slot nodes, as used by [`Level`](crate::Level).
pub type SlotStorage = BoundedSlab<SlotNode<usize>>;

/// A slot in the chain: a numbered position holding one vehicle.
#[derive(Debug, Clone)]
pub struct SlotNode<K: Key = usize> {
    position: u32,
    vehicle: Vehicle,
    prev: K,
    next: K,
}

impl<K: Key> SlotNode<K> {
    /// Creates an unlinked, unpositioned node.
    #[inline]
    fn new(vehicle: Vehicle) -> Self {
        Self {
            position: 0,
            vehicle,
            prev: K::NONE,
            next: K::NONE,
        }
    }

    /// Slot number, starting at [`FIRST_POSITION`].
    #[inline]
    pub fn position(&self) -> u32 {
        self.position
    }

    /// The vehicle parked in this slot.
    #[inline]
    pub fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    /// Key of the preceding node, if any.
    #[inline]
    pub fn prev(&self) -> Option<K> {
        self.prev.into_option()
    }

    /// Key of the following node, if any.
    #[inline]
    pub fn next(&self) -> Option<K> {
        self.next.into_option()
    }

    /// Consumes the node, returning the vehicle.
    #[inline]
    pub fn into_vehicle(self) -> Vehicle {
        self.vehicle
    }
}

/// Ordered chain of occupied slots over external storage.
///
/// The chain tracks only its head and tail; nodes live in user-provided
/// storage wrapped in [`SlotNode`].
///
/// # Type Parameters
///
/// - `S`: Storage type (e.g., [`SlotStorage`])
/// - `K`: Key type (default `usize`)
#[derive(Debug)]
pub struct SlotChain<S, K: Key = usize>
where
    S: Storage<SlotNode<K>, Key = K>,
{
    head: K,
    tail: K,
    _marker: PhantomData<fn() -> S>,
}

impl<S, K: Key> Default for SlotChain<S, K>
where
    S: Storage<SlotNode<K>, Key = K>,
{
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Base impl - works with any Storage (link/search/remove operations)
// =============================================================================

impl<S, K: Key> SlotChain<S, K>
where
    S: Storage<SlotNode<K>, Key = K>,
{
    /// Creates an empty chain.
    #[inline]
    pub const fn new() -> Self {
        Self {
            head: K::NONE,
            tail: K::NONE,
            _marker: PhantomData,
        }
    }

    /// Returns `true` if no slot is occupied.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Returns the head node's key, or `None` if empty.
    #[inline]
    pub fn head_key(&self) -> Option<K> {
        self.head.into_option()
    }

    /// Returns the tail node's key, or `None` if empty.
    #[inline]
    pub fn tail_key(&self) -> Option<K> {
        self.tail.into_option()
    }

    /// Returns the node at `key`.
    #[inline]
    pub fn get<'a>(&self, storage: &'a S, key: K) -> Option<&'a SlotNode<K>> {
        storage.get(key)
    }

    /// Returns `true` if `key` is linked into this chain.
    ///
    /// Follows back links to the first node and compares it with this
    /// chain's head, so only the nodes before `key` are visited.
    pub fn contains(&self, storage: &S, key: K) -> bool {
        if self.head.is_none() {
            return false;
        }

        let mut current = key;
        loop {
            let Some(node) = storage.get(current) else {
                return false;
            };
            if node.prev.is_none() {
                return current == self.head;
            }
            current = node.prev;
        }
    }

    /// Counts the occupied slots by walking the chain.
    pub fn count(&self, storage: &S) -> usize {
        self.keys(storage).count()
    }

    #[inline]
    fn node(storage: &S, key: K) -> &SlotNode<K> {
        storage
            .get(key)
            .expect("slot chain links to a vacant storage entry")
    }

    #[inline]
    fn node_mut(storage: &mut S, key: K) -> &mut SlotNode<K> {
        storage
            .get_mut(key)
            .expect("slot chain links to a vacant storage entry")
    }

    // ========================================================================
    // Link operations
    // ========================================================================

    /// Links an existing node at the lowest vacant position.
    ///
    /// The node must already exist in storage but not be in any chain.
    /// Returns the position assigned to it.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not valid in storage.
    pub fn link_ordered(&mut self, storage: &mut S, key: K) -> u32 {
        if self.head.is_none() {
            let node = Self::node_mut(storage, key);
            node.position = FIRST_POSITION;
            node.prev = K::NONE;
            node.next = K::NONE;

            self.head = key;
            self.tail = key;
            return FIRST_POSITION;
        }

        if Self::node(storage, self.head).position > FIRST_POSITION {
            self.link_front(storage, key, FIRST_POSITION);
            return FIRST_POSITION;
        }

        let mut current = self.head;
        loop {
            let node = Self::node(storage, current);
            let candidate = node.position + 1;
            let next = node.next;

            // Tail reached, or a gap right after `current`
            if next.is_none() || Self::node(storage, next).position > candidate {
                self.link_after(storage, current, key, candidate);
                return candidate;
            }

            current = next;
        }
    }

    fn link_front(&mut self, storage: &mut S, key: K, position: u32) {
        let head = self.head;

        let node = Self::node_mut(storage, key);
        node.position = position;
        node.prev = K::NONE;
        node.next = head;

        if head.is_some() {
            Self::node_mut(storage, head).prev = key;
        } else {
            self.tail = key;
        }

        self.head = key;
    }

    fn link_after(&mut self, storage: &mut S, after: K, key: K, position: u32) {
        let next = Self::node(storage, after).next;

        let node = Self::node_mut(storage, key);
        node.position = position;
        node.prev = after;
        node.next = next;

        Self::node_mut(storage, after).next = key;

        if next.is_some() {
            Self::node_mut(storage, next).prev = key;
        } else {
            self.tail = key;
        }
    }

    /// Unlinks a node from the chain without deallocating.
    ///
    /// Both neighbours are repaired: the predecessor's `next` skips the node
    /// and the successor's `prev` points back at the predecessor. Head and
    /// tail are retargeted when the node sat at either end.
    ///
    /// Returns `true` if the node was in the chain. An invalid key, or a node
    /// linked into a different chain over the same storage, is left untouched.
    pub fn unlink(&mut self, storage: &mut S, key: K) -> bool {
        if !self.contains(storage, key) {
            return false;
        }

        let node = Self::node(storage, key);
        let prev = node.prev;
        let next = node.next;

        if prev.is_some() {
            Self::node_mut(storage, prev).next = next;
        } else {
            self.head = next;
        }

        if next.is_some() {
            Self::node_mut(storage, next).prev = prev;
        } else {
            self.tail = prev;
        }

        let node = Self::node_mut(storage, key);
        node.prev = K::NONE;
        node.next = K::NONE;
        true
    }

    /// Unlinks and deallocates a node, returning it.
    ///
    /// Returns `None` if the key is invalid or not in this chain.
    pub fn remove(&mut self, storage: &mut S, key: K) -> Option<SlotNode<K>> {
        if !self.unlink(storage, key) {
            return None;
        }
        storage.remove(key)
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// Returns the key of the first node matching `pred`, head to tail.
    pub fn find<F>(&self, storage: &S, mut pred: F) -> Option<K>
    where
        F: FnMut(&SlotNode<K>) -> bool,
    {
        let mut current = self.head;
        while current.is_some() {
            let node = storage.get(current)?;
            if pred(node) {
                return Some(current);
            }
            current = node.next;
        }
        None
    }

    /// Returns the key of the node holding `plate`.
    #[inline]
    pub fn find_by_plate(&self, storage: &S, plate: &str) -> Option<K> {
        self.find(storage, |node| node.vehicle.plate() == plate)
    }

    /// Returns the key of the node at `position`.
    ///
    /// Stops as soon as the walk passes `position`.
    pub fn find_by_position(&self, storage: &S, position: u32) -> Option<K> {
        let mut current = self.head;
        while current.is_some() {
            let node = storage.get(current)?;
            match node.position.cmp(&position) {
                Ordering::Equal => return Some(current),
                Ordering::Greater => return None,
                Ordering::Less => current = node.next,
            }
        }
        None
    }

    /// Returns the nodes whose vehicle has `color`, in position order.
    #[inline]
    pub fn find_all_by_color<'a>(
        &'a self,
        storage: &'a S,
        color: &'a str,
    ) -> impl Iterator<Item = &'a SlotNode<K>> {
        self.iter(storage).filter(move |node| node.vehicle.color() == color)
    }

    /// Checks the link and ordering invariants.
    ///
    /// Walks head to tail verifying that every `prev` points at the node
    /// walked before it, positions strictly increase from
    /// [`FIRST_POSITION`], the walk ends at `tail`, and no cycle exists.
    pub fn is_well_formed(&self, storage: &S) -> bool {
        let mut prev = K::NONE;
        let mut last_position = 0;
        let mut steps = 0usize;
        let mut current = self.head;

        while current.is_some() {
            let Some(node) = storage.get(current) else {
                return false;
            };
            if node.prev != prev || node.position <= last_position {
                return false;
            }

            steps += 1;
            if steps > storage.len() {
                return false;
            }

            last_position = node.position;
            prev = current;
            current = node.next;
        }

        self.tail == prev
    }

    // ========================================================================
    // Iteration
    // ========================================================================

    /// Returns an iterator over nodes in position order.
    #[inline]
    pub fn iter<'a>(&self, storage: &'a S) -> Iter<'a, S, K> {
        Iter {
            walk: self.walk(storage),
        }
    }

    /// Returns an iterator over node keys in position order.
    ///
    /// Collect the keys first when removing while walking.
    #[inline]
    pub fn keys<'a>(&self, storage: &'a S) -> Keys<'a, S, K> {
        Keys {
            walk: self.walk(storage),
        }
    }

    fn walk<'a>(&self, storage: &'a S) -> Walk<'a, S, K> {
        Walk {
            storage,
            front: self.head,
            back: self.tail,
        }
    }
}

// =============================================================================
// Bounded storage impl - fallible insertion
// =============================================================================

impl<S, K: Key> SlotChain<S, K>
where
    S: BoundedStorage<SlotNode<K>, Key = K>,
{
    /// Parks a vehicle at the lowest vacant position.
    ///
    /// Returns the new node's key and its position.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(vehicle))` if storage is full.
    pub fn try_insert_ordered(
        &mut self,
        storage: &mut S,
        vehicle: Vehicle,
    ) -> Result<(K, u32), Full<Vehicle>> {
        let key = storage
            .try_insert(SlotNode::new(vehicle))
            .map_err(|e| Full(e.0.vehicle))?;
        let position = self.link_ordered(storage, key);
        Ok((key, position))
    }
}

// =============================================================================
// Unbounded storage impl - infallible insertion
// =============================================================================

impl<S, K: Key> SlotChain<S, K>
where
    S: UnboundedStorage<SlotNode<K>, Key = K>,
{
    /// Parks a vehicle at the lowest vacant position.
    ///
    /// Returns the new node's key and its position.
    pub fn insert_ordered(&mut self, storage: &mut S, vehicle: Vehicle) -> (K, u32) {
        let key = storage.insert(SlotNode::new(vehicle));
        let position = self.link_ordered(storage, key);
        (key, position)
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// Two-ended cursor shared by [`Iter`] and [`Keys`].
///
/// Both ends go to `NONE` once they have crossed the same node.
struct Walk<'a, S, K: Key> {
    storage: &'a S,
    front: K,
    back: K,
}

impl<'a, S, K: Key + 'a> Walk<'a, S, K>
where
    S: Storage<SlotNode<K>, Key = K>,
{
    #[inline]
    fn step(&mut self, from_back: bool) -> Option<(K, &'a SlotNode<K>)> {
        let key = if from_back { self.back } else { self.front };
        if key.is_none() {
            return None;
        }

        let node = self.storage.get(key)?;
        if self.front == self.back {
            self.front = K::NONE;
            self.back = K::NONE;
        } else if from_back {
            self.back = node.prev;
        } else {
            self.front = node.next;
        }

        Some((key, node))
    }
}

/// Iterator over slot nodes in position order.
pub struct Iter<'a, S, K: Key> {
    walk: Walk<'a, S, K>,
}

impl<'a, S, K: Key + 'a> Iterator for Iter<'a, S, K>
where
    S: Storage<SlotNode<K>, Key = K>,
{
    type Item = &'a SlotNode<K>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.walk.step(false).map(|(_, node)| node)
    }
}

impl<'a, S, K: Key + 'a> DoubleEndedIterator for Iter<'a, S, K>
where
    S: Storage<SlotNode<K>, Key = K>,
{
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.walk.step(true).map(|(_, node)| node)
    }
}

/// Iterator over slot node keys in position order.
pub struct Keys<'a, S, K: Key> {
    walk: Walk<'a, S, K>,
}

impl<'a, S, K: Key + 'a> Iterator for Keys<'a, S, K>
where
    S: Storage<SlotNode<K>, Key = K>,
{
    type Item = K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.walk.step(false).map(|(key, _)| key)
    }
}

impl<'a, S, K: Key + 'a> DoubleEndedIterator for Keys<'a, S, K>
where
    S: Storage<SlotNode<K>, Key = K>,
{
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.walk.step(true).map(|(key, _)| key)
    }
}
