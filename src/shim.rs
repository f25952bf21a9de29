//! Atomic primitives, swappable for `portable-atomic` on targets without
//! native 64-bit atomics.

pub use core::sync::atomic::Ordering;

#[cfg(not(feature = "portable-atomic"))]
pub use core::sync::atomic::{AtomicU32, AtomicU64};
#[cfg(feature = "portable-atomic")]
pub use portable_atomic::{AtomicU32, AtomicU64};
