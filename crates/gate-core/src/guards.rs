//! RAII wrappers over the raw begin/end pairs.
//!
//! The raw [`Gate`] methods mirror the original design faithfully: a caller
//! must remember to pair every granted `_begin` with its `_end`. These
//! guards make that pairing a type-system guarantee instead of a
//! documentation convention, the same way [`crate::Gate`]'s own doc
//! comments describe a session guard toggling phases on enter/leave.

use crate::Gate;

/// The gate refused the requested transition.
///
/// Carries no detail beyond the refusal itself — matching the original
/// design, `REFUSED` is a normal outcome the caller is expected to retry or
/// surface, not a diagnosed failure. Call [`Gate::phase`] for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("gate refused the requested transition")]
pub struct Refused;

/// Granted initialization responsibility from [`Gate::open`].
///
/// Dropping this guard calls `open_end`, promoting the gate to
/// [`Phase::Opened`](crate::Phase::Opened) — including when the guard is
/// dropped during a panicking unwind, so a failed initializer still leaves
/// the gate in a phase future callers can act on rather than stuck in
/// `Opening` forever.
#[must_use = "the gate stays in Opening until this guard is dropped"]
pub struct Opening<'a> {
    gate: &'a Gate,
}

impl<'a> Opening<'a> {
    pub(crate) fn new(gate: &'a Gate) -> Self {
        Self { gate }
    }
}

impl Drop for Opening<'_> {
    fn drop(&mut self) {
        self.gate.open_end();
    }
}

/// Granted teardown responsibility from [`Gate::close`].
///
/// Dropping this guard calls `close_end`, returning the gate to
/// [`Phase::Created`](crate::Phase::Created).
#[must_use = "the gate stays in Closing until this guard is dropped"]
pub struct Closing<'a> {
    gate: &'a Gate,
}

impl<'a> Closing<'a> {
    pub(crate) fn new(gate: &'a Gate) -> Self {
        Self { gate }
    }
}

impl Drop for Closing<'_> {
    fn drop(&mut self) {
        self.gate.close_end();
    }
}

/// A granted regular execution from [`Gate::execute`].
///
/// Dropping this guard calls `end`, retiring the execution and — if it was
/// the last one in flight — waking a draining barrier or close.
#[must_use = "the execution is not retired until this guard is dropped"]
pub struct Execution<'a> {
    gate: &'a Gate,
}

impl<'a> Execution<'a> {
    pub(crate) fn new(gate: &'a Gate) -> Self {
        Self { gate }
    }
}

impl Drop for Execution<'_> {
    fn drop(&mut self) {
        self.gate.end();
    }
}

/// Granted barrier occupancy from [`Gate::barrier`].
///
/// Dropping this guard calls `barrier_end`, returning the gate to
/// [`Phase::Opened`](crate::Phase::Opened) and admitting regular executions
/// again.
#[must_use = "the barrier is held until this guard is dropped"]
pub struct Barrier<'a> {
    gate: &'a Gate,
}

impl<'a> Barrier<'a> {
    pub(crate) fn new(gate: &'a Gate) -> Self {
        Self { gate }
    }
}

impl Drop for Barrier<'_> {
    fn drop(&mut self) {
        self.gate.barrier_end();
    }
}
