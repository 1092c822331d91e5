//! The state word: phase + close bit + generation, packed into one `u32`.

use crate::sync::Ordering;

/// Low 7 bits of the state word.
pub(crate) const PHASE_MASK: u32 = 0x7F;
/// Bit 7: a closer has declared intent.
pub(crate) const CLOSE_BIT: u32 = 0x80;
/// Every successful transition bumps the state word by this much.
pub(crate) const GEN_INCREMENT: u32 = 0x100;

/// The lifecycle stage of a [`Gate`](crate::Gate).
///
/// Ordered the way the state machine moves through them; the numeric values
/// are the phase field's bit pattern, never observed outside this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Phase {
    /// Born here; also where a gate returns to after a completed close.
    Created = 0,
    /// `open_begin` succeeded; the winner has not yet called `open_end`.
    Opening = 1,
    /// Steady state: `begin` and `barrier_begin` are both admissible.
    Opened = 2,
    /// `barrier_begin` is draining in-flight regular executions.
    OpenedDrainingToBarrier = 3,
    /// `close_begin` is draining in-flight regular executions.
    OpenedDrainingToClose = 4,
    /// A barrier execution owns the gate exclusively.
    OpenedBarrier = 5,
    /// `close_begin` succeeded; the winner has not yet called `close_end`.
    Closing = 6,
}

impl Phase {
    fn from_bits(bits: u32) -> Self {
        match bits {
            0 => Self::Created,
            1 => Self::Opening,
            2 => Self::Opened,
            3 => Self::OpenedDrainingToBarrier,
            4 => Self::OpenedDrainingToClose,
            5 => Self::OpenedBarrier,
            6 => Self::Closing,
            other => unreachable!("state word carries an unencoded phase: {other}"),
        }
    }
}

/// Decode the phase field out of a raw state word.
pub(crate) fn phase_of(state: u32) -> Phase {
    Phase::from_bits(state & PHASE_MASK)
}

/// Whether a closer has declared intent on this state word.
pub(crate) fn close_bit_set(state: u32) -> bool {
    state & CLOSE_BIT != 0
}

/// Replace the phase field of `state`, leaving the close bit and generation
/// untouched, then bump the generation so the transition is distinguishable
/// from any prior observation of the same phase.
pub(crate) fn transition(state: u32, to: Phase) -> u32 {
    let with_new_phase = (state & !PHASE_MASK) | (to as u32);
    with_new_phase.wrapping_add(GEN_INCREMENT)
}

/// The delta to `fetch_add` onto the state word to move it from `from` to
/// `to` plus a generation bump, used by the two unconditional transitions
/// (end of a drain) that are known race-free because the close bit or the
/// draining phase itself already gives the caller exclusive ownership.
pub(crate) fn transition_delta(from: Phase, to: Phase) -> u32 {
    (to as u32)
        .wrapping_sub(from as u32)
        .wrapping_add(GEN_INCREMENT)
}

/// Load the state word with the ordering every read in this crate uses.
pub(crate) fn load(state: &crate::sync::AtomicU32) -> u32 {
    state.load(Ordering::Acquire)
}
