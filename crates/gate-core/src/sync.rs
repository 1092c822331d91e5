//! Indirection over the atomic primitives and the wait/wake primitive.
//!
//! Under normal compilation this re-exports `std::sync::atomic` and drives
//! drains through the `atomic-wait` crate (OS futex / `WaitOnAddress` /
//! `__ulock` depending on platform). Under `--cfg loom` it swaps in loom's
//! shadow atomics so [`crate::Gate`]'s transition logic can be exhaustively
//! model-checked; loom cannot intercept a real OS wait syscall, so the loom
//! build replaces the drain with a yielding spin loop instead.

#[cfg(not(loom))]
pub(crate) use std::sync::atomic::{AtomicU32, Ordering};

#[cfg(loom)]
pub(crate) use loom::sync::atomic::{AtomicU32, Ordering};

/// Block the calling thread until `atomic` no longer holds `expected`.
///
/// Mirrors `InterlockedHL_WaitForValue` / `WaitOnAddress` from the original
/// design: a spurious wakeup is always safe because the caller re-checks the
/// value in a loop (see [`crate::gate::Gate::drain`]).
#[cfg(all(not(loom), feature = "wait"))]
pub(crate) fn wait(atomic: &AtomicU32, expected: u32) {
    atomic_wait::wait(atomic, expected);
}

#[cfg(all(not(loom), not(feature = "wait")))]
pub(crate) fn wait(atomic: &AtomicU32, expected: u32) {
    while atomic.load(Ordering::Acquire) == expected {
        std::hint::spin_loop();
        std::thread::yield_now();
    }
}

#[cfg(loom)]
pub(crate) fn wait(atomic: &AtomicU32, expected: u32) {
    while atomic.load(Ordering::Acquire) == expected {
        loom::thread::yield_now();
    }
}

/// Wake exactly one waiter blocked in [`wait`] on this address, if any.
#[cfg(all(not(loom), feature = "wait"))]
pub(crate) fn wake_one(atomic: &AtomicU32) {
    atomic_wait::wake_one(atomic);
}

#[cfg(all(not(loom), not(feature = "wait")))]
pub(crate) fn wake_one(_atomic: &AtomicU32) {}

#[cfg(loom)]
pub(crate) fn wake_one(_atomic: &AtomicU32) {}

/// Bounded yield used by `close_begin` while a barrier occupies the gate.
///
/// A second wait/wake channel for barrier completion would halve this
/// latency at the cost of doubling the signaling surface; close is rare
/// enough that the simpler busy-poll wins (see DESIGN.md).
#[cfg(not(loom))]
pub(crate) fn short_sleep() {
    std::thread::sleep(std::time::Duration::from_millis(1));
}

#[cfg(loom)]
pub(crate) fn short_sleep() {
    loom::thread::yield_now();
}
