//! Growable double-ended ring buffer that can be shared between threads.

use crate::{
    bounds::{resolve_index, Bounds},
    shim::{AtomicU64, Ordering},
    slot::{grow_target, repack, Slot},
    DEFAULT_CAPACITY,
};
use core::fmt;
use crossbeam_utils::{Backoff, CachePadded};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe growable deque over circular storage.
///
/// `push_back`, `pop_back` and `pop_front` are the fast path: they pin the
/// storage with the read side of the lock and claim a position with a single
/// CAS on the packed boundary word. `push_front`, growth and every
/// whole-structure operation take the write side and therefore serialize
/// with each other and with the fast path.
///
/// Wrap it in an [`Arc`](std::sync::Arc) to share it:
///
/// ```
/// use ringdeck::Deque;
/// use std::{sync::Arc, thread};
///
/// let deque = Arc::new(Deque::new());
/// let pusher = thread::spawn({
///     let deque = Arc::clone(&deque);
///     move || deque.push_back(123)
/// });
/// pusher.join().unwrap();
/// assert_eq!(deque.pop_front(), Some(123));
/// ```
pub struct Deque<T> {
    storage: RwLock<Box<[Slot<T>]>>,
    bounds: CachePadded<AtomicU64>,
    min_capacity: usize,
}

impl<T> Deque<T> {
    /// Creates an empty deque with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty deque with at least `capacity` slots.
    ///
    /// The effective capacity, `max(capacity, DEFAULT_CAPACITY)`, also
    /// becomes the floor that `shrink_to_fit` never goes below.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` exceeds `u32::MAX`.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(DEFAULT_CAPACITY);
        assert!(capacity <= u32::MAX as usize, "capacity exceeds u32::MAX");
        Self {
            storage: RwLock::new(Slot::vacant_row(capacity)),
            bounds: CachePadded::new(AtomicU64::new(Bounds::EMPTY.into_raw())),
            min_capacity: capacity,
        }
    }

    fn read_storage(&self) -> RwLockReadGuard<'_, Box<[Slot<T>]>> {
        self.storage.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_storage(&self) -> RwLockWriteGuard<'_, Box<[Slot<T>]>> {
        self.storage.write().unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    fn load_bounds(&self) -> Bounds {
        Bounds::from_raw(self.bounds.load(Ordering::Acquire))
    }

    #[inline]
    fn store_bounds(&self, bounds: Bounds) {
        self.bounds.store(bounds.into_raw(), Ordering::Release);
    }

    #[inline]
    fn cas_bounds(&self, current: Bounds, next: Bounds) -> bool {
        self.bounds
            .compare_exchange_weak(
                current.into_raw(),
                next.into_raw(),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// Number of elements.
    ///
    /// Lock-free. *Under concurrent access the value may be stale by the
    /// time it is used.*
    #[inline]
    pub fn len(&self) -> usize {
        self.load_bounds().len as usize
    }

    /// Checks whether the deque is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current capacity of the backing storage.
    pub fn capacity(&self) -> usize {
        self.read_storage().len()
    }

    /// Capacity floor restored by [`Self::shrink_to_fit`] when empty.
    pub fn min_capacity(&self) -> usize {
        self.min_capacity
    }

    /// Appends an element at the back.
    ///
    /// Lock-free while there is room. When the buffer is full the call
    /// escalates to the exclusive path, growing the storage by doubling.
    pub fn push_back(&self, value: T) {
        {
            let slots = self.read_storage();
            let capacity = slots.len();
            let backoff = Backoff::new();
            loop {
                let cur = self.load_bounds();
                if cur.len as usize == capacity {
                    break;
                }
                let next = Bounds {
                    front: cur.front,
                    len: cur.len + 1,
                };
                if self.cas_bounds(cur, next) {
                    slots[cur.back(capacity)].put(value);
                    return;
                }
                backoff.spin();
            }
        }
        self.push_back_grown(value);
    }

    /// Full-buffer branch of [`Self::push_back`]: re-check under the lock
    /// (another caller may have grown the storage already), grow if still
    /// needed, then finish the write while still holding the lock.
    fn push_back_grown(&self, value: T) {
        let mut slots = self.write_storage();
        let mut cur = self.load_bounds();
        if cur.len as usize == slots.len() {
            let target = grow_target(slots.len(), self.min_capacity);
            repack(&mut slots, cur.front as usize, cur.len as usize, target);
            cur = Bounds {
                front: 0,
                len: cur.len,
            };
        }
        let capacity = slots.len();
        slots[cur.back(capacity)].fill(value);
        self.store_bounds(Bounds {
            front: cur.front,
            len: cur.len + 1,
        });
    }

    /// Prepends an element at the front.
    ///
    /// Always takes the exclusive path: moving the front boundary backward
    /// shares its exclusivity requirement with growth.
    pub fn push_front(&self, value: T) {
        let mut slots = self.write_storage();
        let mut cur = self.load_bounds();
        if cur.len as usize == slots.len() {
            let target = grow_target(slots.len(), self.min_capacity);
            repack(&mut slots, cur.front as usize, cur.len as usize, target);
            cur = Bounds {
                front: 0,
                len: cur.len,
            };
        }
        let capacity = slots.len();
        let front = (cur.front as usize + capacity - 1) % capacity;
        slots[front].fill(value);
        self.store_bounds(Bounds {
            front: front as u32,
            len: cur.len + 1,
        });
    }

    /// Removes and returns the back element.
    ///
    /// Returns `None` if the deque was empty at the moment of the attempt.
    pub fn pop_back(&self) -> Option<T> {
        let slots = self.read_storage();
        let capacity = slots.len();
        let backoff = Backoff::new();
        loop {
            let cur = self.load_bounds();
            if cur.len == 0 {
                return None;
            }
            let next = Bounds {
                front: cur.front,
                len: cur.len - 1,
            };
            if self.cas_bounds(cur, next) {
                return Some(slots[next.back(capacity)].take());
            }
            backoff.spin();
        }
    }

    /// Removes and returns the front element.
    ///
    /// Returns `None` if the deque was empty at the moment of the attempt.
    pub fn pop_front(&self) -> Option<T> {
        let slots = self.read_storage();
        let capacity = slots.len();
        let backoff = Backoff::new();
        loop {
            let cur = self.load_bounds();
            if cur.len == 0 {
                return None;
            }
            let next = Bounds {
                front: ((cur.front as usize + 1) % capacity) as u32,
                len: cur.len - 1,
            };
            if self.cas_bounds(cur, next) {
                return Some(slots[cur.front as usize].take());
            }
            backoff.spin();
        }
    }

    /// Returns a clone of the front element without removing it.
    pub fn front(&self) -> Option<T>
    where
        T: Clone,
    {
        self.at(0)
    }

    /// Returns a clone of the back element without removing it.
    pub fn back(&self) -> Option<T>
    where
        T: Clone,
    {
        self.at(-1)
    }

    /// Returns a clone of the element at `index`.
    ///
    /// Negative indices resolve as `index + len`, so `-1` is the back
    /// element. Out of range yields `None`.
    pub fn at(&self, index: isize) -> Option<T>
    where
        T: Clone,
    {
        // Write side: a read guard would not keep fast-path claimants away
        // from the slot being cloned.
        let slots = self.write_storage();
        let cur = self.load_bounds();
        let i = resolve_index(index, cur.len as usize)?;
        let value = unsafe { slots[cur.slot(i, slots.len())].value_ref() }.clone();
        Some(value)
    }

    /// Replaces the element at `index`, dropping the old value.
    ///
    /// On an out-of-range index the deque is left unchanged and `value` is
    /// handed back in the `Err`.
    pub fn set(&self, index: isize, value: T) -> Result<(), T> {
        let mut slots = self.write_storage();
        let cur = self.load_bounds();
        match resolve_index(index, cur.len as usize) {
            Some(i) => {
                let at = cur.slot(i, slots.len());
                slots[at].replace(value);
                Ok(())
            }
            None => Err(value),
        }
    }

    /// Swaps the elements at `i` and `j`.
    ///
    /// Returns `false` without touching the deque when `i == j` or either
    /// index is out of range after negative-index resolution.
    pub fn swap(&self, i: isize, j: isize) -> bool {
        if i == j {
            return false;
        }
        let mut slots = self.write_storage();
        let cur = self.load_bounds();
        let len = cur.len as usize;
        let (Some(i), Some(j)) = (resolve_index(i, len), resolve_index(j, len)) else {
            return false;
        };
        let capacity = slots.len();
        slots.swap(cur.slot(i, capacity), cur.slot(j, capacity));
        true
    }

    /// Reverses the order of the elements in place.
    pub fn reverse(&self) {
        let mut slots = self.write_storage();
        let cur = self.load_bounds();
        reverse_ring(&mut slots, cur.front as usize, cur.len as usize);
    }

    /// Rotates the deque `n` positions to the right; negative `n` rotates
    /// left.
    ///
    /// `n` is reduced modulo the length. Uses three reversals of the live
    /// window, each with circular indexing since the window may wrap.
    pub fn rotate(&self, n: isize) {
        let mut slots = self.write_storage();
        let cur = self.load_bounds();
        let len = cur.len as usize;
        if len <= 1 {
            return;
        }
        let n = n.rem_euclid(len as isize) as usize;
        if n == 0 {
            return;
        }
        let front = cur.front as usize;
        let capacity = slots.len();
        reverse_ring(&mut slots, front, len);
        reverse_ring(&mut slots, front, n);
        reverse_ring(&mut slots, (front + n) % capacity, len - n);
    }

    /// Creates an independent deque with the same elements and capacity.
    pub fn copy(&self) -> Self
    where
        T: Clone,
    {
        let slots = self.write_storage();
        let cur = self.load_bounds();
        let capacity = slots.len();
        let mut row = Slot::vacant_row(capacity);
        for i in 0..cur.len as usize {
            let value = unsafe { slots[cur.slot(i, capacity)].value_ref() }.clone();
            row[i].fill(value);
        }
        Self {
            storage: RwLock::new(row),
            bounds: CachePadded::new(AtomicU64::new(
                Bounds {
                    front: 0,
                    len: cur.len,
                }
                .into_raw(),
            )),
            min_capacity: self.min_capacity,
        }
    }

    /// Drops all elements. Capacity is preserved.
    pub fn clear(&self) {
        let mut slots = self.write_storage();
        let cur = self.load_bounds();
        let capacity = slots.len();
        for i in 0..cur.len as usize {
            slots[cur.slot(i, capacity)].drop_value();
        }
        self.store_bounds(Bounds::EMPTY);
    }

    /// Shrinks the capacity to `max(len, min_capacity)`.
    ///
    /// An empty deque is reset to a fresh row of exactly `min_capacity`
    /// slots; otherwise the live window is repacked to offset 0 when the
    /// target differs from the current capacity.
    pub fn shrink_to_fit(&self) {
        let mut slots = self.write_storage();
        let cur = self.load_bounds();
        let len = cur.len as usize;
        if len == 0 {
            *slots = Slot::vacant_row(self.min_capacity);
            self.store_bounds(Bounds::EMPTY);
            return;
        }
        let target = len.max(self.min_capacity);
        if target != slots.len() {
            repack(&mut slots, cur.front as usize, len, target);
            self.store_bounds(Bounds {
                front: 0,
                len: cur.len,
            });
        }
    }

    /// Drops all elements and reinstalls a fresh row, with the capacity
    /// floor raised to `max(capacity, DEFAULT_CAPACITY)`.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` exceeds `u32::MAX`.
    pub fn reset(&mut self, capacity: usize) {
        let capacity = capacity.max(DEFAULT_CAPACITY);
        assert!(capacity <= u32::MAX as usize, "capacity exceeds u32::MAX");
        self.min_capacity = capacity;
        let cur = self.load_bounds();
        let slots = self
            .storage
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        let old_capacity = slots.len();
        for i in 0..cur.len as usize {
            slots[cur.slot(i, old_capacity)].drop_value();
        }
        *slots = Slot::vacant_row(capacity);
        self.store_bounds(Bounds::EMPTY);
    }
}

impl<T> Default for Deque<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for Deque<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T: fmt::Display> fmt::Display for Deque<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slots = self.write_storage();
        let cur = self.load_bounds();
        let len = cur.len as usize;
        if len == 0 {
            return f.write_str("[]");
        }
        let limit = crate::fmt::limit_for(f, len);
        let capacity = slots.len();
        crate::fmt::write_run(
            f,
            (0..limit).map(|i| unsafe { slots[cur.slot(i, capacity)].value_ref() }),
            len,
        )
    }
}

/// Reverses `count` ring slots starting at `start`, wrapping modulo the row
/// length.
fn reverse_ring<T>(slots: &mut [Slot<T>], start: usize, count: usize) {
    let capacity = slots.len();
    for i in 0..count / 2 {
        let left = (start + i) % capacity;
        let right = (start + count - 1 - i) % capacity;
        slots.swap(left, right);
    }
}
