//! Growable ring-buffer containers that can be shared between threads.
//!
//! All three containers are backed by the same storage model: a fixed row of
//! slots that is replaced wholesale when it grows or shrinks, a packed atomic
//! boundary word, and a reader-writer lock around the row. Appending or
//! removing at a buffer end is lock-free while there is room: the caller pins
//! the row with the read side of the lock, claims a position with a single
//! compare-and-swap and moves the value through the slot. Growth and every
//! whole-structure operation (indexed access, rotate, reverse, copy, shrink)
//! take the write side and see a settled view of the row.
//!
//! Note that there is no explicit requirement of `T: Send` on the containers
//! themselves; they work just fine with `T: !Send` until you try to share
//! them across threads.
//!
//! ```
//! use ringdeck::Deque;
//! use std::{sync::Arc, thread};
//!
//! let deque = Arc::new(Deque::new());
//! let handles: Vec<_> = (0..4)
//!     .map(|t| {
//!         let deque = Arc::clone(&deque);
//!         thread::spawn(move || {
//!             for i in 0..100 {
//!                 deque.push_back(t * 100 + i);
//!             }
//!         })
//!     })
//!     .collect();
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! assert_eq!(deque.len(), 400);
//! ```

mod bounds;
mod fmt;
mod shim;
mod slot;

pub mod deque;
pub mod queue;
pub mod stack;

#[cfg(test)]
mod tests;

pub use deque::Deque;
pub use queue::Queue;
pub use stack::Stack;

/// Capacity floor for every container.
///
/// Requested capacities below it are raised to it, and `shrink_to_fit` on an
/// empty container resets the storage to exactly this many slots.
pub const DEFAULT_CAPACITY: usize = 8;
