//! gate-core: a lock-free lifecycle-and-execution gate.
//!
//! A [`Gate`] is the sole authority on whether a multi-threaded component
//! may run a given operation right now. It distinguishes four kinds of
//! operation:
//!
//! - **open** — brings the component from dormant to running
//!   ([`Gate::open_begin`]/[`Gate::open_end`]);
//! - **close** — quiesces the component and returns it to dormant
//!   ([`Gate::close_begin`]/[`Gate::close_end`]);
//! - **regular execution** — ordinary work that may run concurrently with
//!   other regular executions ([`Gate::begin`]/[`Gate::end`]);
//! - **barrier execution** — work that must run with nothing else in
//!   flight, open or regular ([`Gate::barrier_begin`]/[`Gate::barrier_end`]).
//!
//! # Architecture
//!
//! ```text
//! Created ──open_begin──▶ Opening ──open_end──▶ Opened
//! Opened  ──begin (n++)──▶ Opened                          (fast path, no CAS loop)
//! Opened  ──barrier_begin─▶ DrainingToBarrier ──drain(n=0)──▶ OpenedBarrier ──barrier_end──▶ Opened
//! Opened  ──close_begin──▶ DrainingToClose    ──drain(n=0)──▶ Closing        ──close_end────▶ Created
//! ```
//!
//! The gate is one atomic state word (phase + close bit + generation) and
//! one atomic in-flight counter — no mutex anywhere. See [`Gate`] for the
//! full contract and `DESIGN.md` for how each piece is grounded.
//!
//! # Modules
//!
//! - [`Gate`]: the primitive itself.
//! - [`Admission`]: the result of a raw `_begin` call.
//! - [`Opening`], [`Closing`], [`Execution`], [`Barrier`]: RAII guards over
//!   the raw begin/end pairs, so forgetting the matching `_end` is a type
//!   error rather than a runtime bug.
//!
//! # Safety
//!
//! This crate forbids unsafe code. The wait/wake primitive is supplied by
//! the `atomic-wait` crate rather than hand-rolled futex syscalls.

#![forbid(unsafe_code)]

mod admission;
mod gate;
mod guards;
mod phase;
mod sync;

pub use admission::Admission;
pub use gate::Gate;
pub use guards::{Barrier, Closing, Execution, Opening, Refused};
pub use phase::Phase;
