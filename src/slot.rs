//! Storage slot with a publication flag.
//!
//! A fast-path caller owns a slot *position* once its boundary CAS succeeds,
//! but the *value* is handed over separately: a pusher writes the value and
//! then marks the slot occupied, a popper moves the value out and then marks
//! it vacant. A claimant that arrives before its peer has finished spins
//! until the flag flips; the peer already holds a storage read guard and
//! needs no further lock, so the wait is bounded.

use crate::shim::{AtomicU32, Ordering};
use core::{cell::UnsafeCell, mem, mem::MaybeUninit};
use crossbeam_utils::Backoff;

const VACANT: u32 = 0;
const OCCUPIED: u32 = 1;

pub(crate) struct Slot<T> {
    state: AtomicU32,
    value: UnsafeCell<MaybeUninit<T>>,
}

unsafe impl<T: Send> Send for Slot<T> {}
unsafe impl<T: Send> Sync for Slot<T> {}

impl<T> Slot<T> {
    fn vacant() -> Self {
        Self {
            state: AtomicU32::new(VACANT),
            value: UnsafeCell::new(MaybeUninit::uninit()),
        }
    }

    /// Allocates a row of `capacity` vacant slots.
    pub fn vacant_row(capacity: usize) -> Box<[Self]> {
        (0..capacity).map(|_| Self::vacant()).collect()
    }

    /// Hands `value` to the slot from a fast-path push.
    ///
    /// Spins until a straggling popper of the previous lap has moved its
    /// value out, then publishes the new one.
    pub fn put(&self, value: T) {
        let backoff = Backoff::new();
        while self.state.load(Ordering::Acquire) != VACANT {
            backoff.snooze();
        }
        unsafe { (*self.value.get()).write(value) };
        self.state.store(OCCUPIED, Ordering::Release);
    }

    /// Moves the value out of the slot from a fast-path pop.
    ///
    /// Spins until the pusher that claimed this position has published.
    pub fn take(&self) -> T {
        let backoff = Backoff::new();
        while self.state.load(Ordering::Acquire) != OCCUPIED {
            backoff.snooze();
        }
        let value = unsafe { (*self.value.get()).assume_init_read() };
        self.state.store(VACANT, Ordering::Release);
        value
    }

    // Exclusive-path accessors. The caller holds the storage write lock,
    // which keeps every fast-path attempt out; slot states are settled
    // (live slots occupied, all others vacant).

    /// Writes into a vacant slot.
    pub fn fill(&mut self, value: T) {
        debug_assert_eq!(self.state.load(Ordering::Relaxed), VACANT);
        self.value.get_mut().write(value);
        *self.state.get_mut() = OCCUPIED;
    }

    /// Moves the value out of an occupied slot, leaving it vacant.
    pub fn take_mut(&mut self) -> T {
        debug_assert_eq!(self.state.load(Ordering::Relaxed), OCCUPIED);
        *self.state.get_mut() = VACANT;
        unsafe { self.value.get_mut().assume_init_read() }
    }

    /// Drops the value of an occupied slot in place, leaving it vacant.
    pub fn drop_value(&mut self) {
        debug_assert_eq!(self.state.load(Ordering::Relaxed), OCCUPIED);
        *self.state.get_mut() = VACANT;
        unsafe { self.value.get_mut().assume_init_drop() };
    }

    /// Replaces the value of an occupied slot, dropping the old one.
    pub fn replace(&mut self, value: T) {
        debug_assert_eq!(self.state.load(Ordering::Relaxed), OCCUPIED);
        unsafe { self.value.get_mut().assume_init_drop() };
        self.value.get_mut().write(value);
    }

    /// Shared view of an occupied slot's value.
    ///
    /// # Safety
    ///
    /// The slot must be occupied, and the caller must hold the storage write
    /// lock so that no fast-path claimant is in flight on it.
    pub unsafe fn value_ref(&self) -> &T {
        (*self.value.get()).assume_init_ref()
    }
}

/// Capacity the row grows to when it is full: doubling, restarting from
/// `min_capacity` if the row has been resized away to nothing.
#[inline]
pub(crate) fn grow_target(capacity: usize, min_capacity: usize) -> usize {
    if capacity == 0 {
        min_capacity
    } else {
        capacity * 2
    }
}

/// Replaces the row with a freshly allocated one of `new_capacity` slots,
/// moving the live window `[front, front + len)` (modular) to offset 0.
pub(crate) fn repack<T>(row: &mut Box<[Slot<T>]>, front: usize, len: usize, new_capacity: usize) {
    debug_assert!(len <= new_capacity);
    let mut old = mem::replace(row, Slot::vacant_row(new_capacity));
    let capacity = old.len();
    for i in 0..len {
        let value = old[(front + i) % capacity].take_mut();
        row[i].fill(value);
    }
}
