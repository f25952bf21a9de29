//! Growable LIFO stack sharing the deque's storage and synchronization
//! model, restricted to one end.
//!
//! The top counter is boundary and count at once, so the packed word
//! degenerates to a single 32-bit atomic, and the live window never wraps:
//! structural operations work on the plain prefix `[0, top)`.

use crate::{
    bounds::resolve_index,
    shim::{AtomicU32, Ordering},
    slot::{grow_target, repack, Slot},
    DEFAULT_CAPACITY,
};
use core::fmt;
use crossbeam_utils::{Backoff, CachePadded};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe growable stack.
///
/// `push` and `pop` are lock-free while there is room, same as the deque's
/// back-end operations; everything else takes the exclusive side of the
/// storage lock.
pub struct Stack<T> {
    storage: RwLock<Box<[Slot<T>]>>,
    top: CachePadded<AtomicU32>,
    min_capacity: usize,
}

impl<T> Stack<T> {
    /// Creates an empty stack with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty stack with at least `capacity` slots.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` exceeds `u32::MAX`.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(DEFAULT_CAPACITY);
        assert!(capacity <= u32::MAX as usize, "capacity exceeds u32::MAX");
        Self {
            storage: RwLock::new(Slot::vacant_row(capacity)),
            top: CachePadded::new(AtomicU32::new(0)),
            min_capacity: capacity,
        }
    }

    fn read_storage(&self) -> RwLockReadGuard<'_, Box<[Slot<T>]>> {
        self.storage.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_storage(&self) -> RwLockWriteGuard<'_, Box<[Slot<T>]>> {
        self.storage.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of elements. Lock-free.
    #[inline]
    pub fn len(&self) -> usize {
        self.top.load(Ordering::Acquire) as usize
    }

    /// Checks whether the stack is empty.
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

    /// Pushes an element on top.
    ///
    /// Lock-free while there is room; grows by doubling otherwise.
    pub fn push(&self, value: T) {
        {
            let slots = self.read_storage();
            let capacity = slots.len() as u32;
            let backoff = Backoff::new();
            loop {
                let top = self.top.load(Ordering::Acquire);
                if top == capacity {
                    break;
                }
                if self
                    .top
                    .compare_exchange_weak(top, top + 1, Ordering::AcqRel, Ordering::Acquire)
                    .is_ok()
                {
                    slots[top as usize].put(value);
                    return;
                }
                backoff.spin();
            }
        }
        self.push_grown(value);
    }

    fn push_grown(&self, value: T) {
        let mut slots = self.write_storage();
        let top = self.top.load(Ordering::Acquire) as usize;
        if top == slots.len() {
            let target = grow_target(slots.len(), self.min_capacity);
            repack(&mut slots, 0, top, target);
        }
        slots[top].fill(value);
        self.top.store(top as u32 + 1, Ordering::Release);
    }

    /// Removes and returns the top element.
    ///
    /// Returns `None` if the stack was empty at the moment of the attempt.
    pub fn pop(&self) -> Option<T> {
        let slots = self.read_storage();
        let backoff = Backoff::new();
        loop {
            let top = self.top.load(Ordering::Acquire);
            if top == 0 {
                return None;
            }
            if self
                .top
                .compare_exchange_weak(top, top - 1, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                return Some(slots[top as usize - 1].take());
            }
            backoff.spin();
        }
    }

    /// Returns a clone of the top element without removing it.
    pub fn top(&self) -> Option<T>
    where
        T: Clone,
    {
        self.at(0)
    }

    /// Returns a clone of the element `index` positions below the top
    /// (`0` is the most recently pushed).
    ///
    /// Negative indices resolve as `index + len`, so `-1` addresses the
    /// bottom element. Out of range yields `None`.
    pub fn at(&self, index: isize) -> Option<T>
    where
        T: Clone,
    {
        let slots = self.write_storage();
        let top = self.top.load(Ordering::Acquire) as usize;
        let i = resolve_index(index, top)?;
        let value = unsafe { slots[top - 1 - i].value_ref() }.clone();
        Some(value)
    }

    /// Replaces the element `index` positions below the top, dropping the
    /// old value.
    ///
    /// On an out-of-range index the stack is left unchanged and `value` is
    /// handed back in the `Err`.
    pub fn set(&self, index: isize, value: T) -> Result<(), T> {
        let mut slots = self.write_storage();
        let top = self.top.load(Ordering::Acquire) as usize;
        match resolve_index(index, top) {
            Some(i) => {
                slots[top - 1 - i].replace(value);
                Ok(())
            }
            None => Err(value),
        }
    }

    /// Reverses the order of the elements in place.
    pub fn reverse(&self) {
        let mut slots = self.write_storage();
        let top = self.top.load(Ordering::Acquire) as usize;
        slots[..top].reverse();
    }

    /// Rotates the stack `n` positions (positive moves the top element `n`
    /// positions down); negative rotates the other way.
    ///
    /// `n` is reduced modulo the length. Same three-reversal scheme as the
    /// deque, over a linear window since the stack never wraps.
    pub fn rotate(&self, n: isize) {
        let mut slots = self.write_storage();
        let top = self.top.load(Ordering::Acquire) as usize;
        if top <= 1 {
            return;
        }
        let n = n.rem_euclid(top as isize) as usize;
        if n == 0 {
            return;
        }
        slots[..top].reverse();
        slots[..n].reverse();
        slots[n..top].reverse();
    }

    /// Creates an independent stack with the same elements.
    ///
    /// The copy's storage is sized to the element count; an empty stack's
    /// copy starts at capacity zero and regrows on first push.
    pub fn copy(&self) -> Self
    where
        T: Clone,
    {
        let slots = self.write_storage();
        let top = self.top.load(Ordering::Acquire) as usize;
        let mut row = Slot::vacant_row(top);
        for i in 0..top {
            let value = unsafe { slots[i].value_ref() }.clone();
            row[i].fill(value);
        }
        Self {
            storage: RwLock::new(row),
            top: CachePadded::new(AtomicU32::new(top as u32)),
            min_capacity: self.min_capacity,
        }
    }

    /// Forces the capacity to exactly `capacity`, dropping elements beyond
    /// it when shrinking below the current length.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` exceeds `u32::MAX`.
    pub fn resize(&self, capacity: usize) {
        assert!(capacity <= u32::MAX as usize, "capacity exceeds u32::MAX");
        let mut slots = self.write_storage();
        let mut top = self.top.load(Ordering::Acquire) as usize;
        if capacity < top {
            for slot in slots[capacity..top].iter_mut() {
                slot.drop_value();
            }
            top = capacity;
            self.top.store(top as u32, Ordering::Release);
        }
        repack(&mut slots, 0, top, capacity);
    }

    /// Shrinks the capacity to `max(len, min_capacity)`.
    ///
    /// An empty stack is reset to a fresh row of exactly `min_capacity`
    /// slots.
    pub fn shrink_to_fit(&self) {
        let mut slots = self.write_storage();
        let top = self.top.load(Ordering::Acquire) as usize;
        if top == 0 {
            *slots = Slot::vacant_row(self.min_capacity);
            return;
        }
        let target = top.max(self.min_capacity);
        if target != slots.len() {
            repack(&mut slots, 0, top, target);
        }
    }

    /// Drops all elements. Capacity is preserved.
    pub fn clear(&self) {
        let mut slots = self.write_storage();
        let top = self.top.load(Ordering::Acquire) as usize;
        for slot in slots[..top].iter_mut() {
            slot.drop_value();
        }
        self.top.store(0, Ordering::Release);
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
        let slots = self
            .storage
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        let top = self.top.load(Ordering::Acquire) as usize;
        for slot in slots[..top].iter_mut() {
            slot.drop_value();
        }
        *slots = Slot::vacant_row(capacity);
        self.top.store(0, Ordering::Release);
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for Stack<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T: fmt::Display> fmt::Display for Stack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slots = self.write_storage();
        let top = self.top.load(Ordering::Acquire) as usize;
        if top == 0 {
            return f.write_str("[]");
        }
        let limit = crate::fmt::limit_for(f, top);
        // Top to bottom, newest first.
        crate::fmt::write_run(
            f,
            (0..limit).map(|i| unsafe { slots[top - 1 - i].value_ref() }),
            top,
        )
    }
}
