//! The outcome of a raw `_begin` call.

/// Outcome of an admission request (`open_begin`, `close_begin`, `begin`,
/// `barrier_begin`).
///
/// There is no `ERROR` variant: the original design reserved it for a null
/// handle, which safe Rust's `&Gate` cannot be — the type system rules that
/// failure mode out instead of reporting it at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a Granted admission obligates the caller to call the matching _end"]
pub enum Admission {
    /// The caller owns the right granted by this `_begin` and must call the
    /// matching `_end`.
    Granted,
    /// The gate is in a phase that disallows this operation right now, or a
    /// race with another caller was lost. Not an error — retry later, or
    /// surface it to the caller.
    Refused,
}

impl Admission {
    /// `true` if this admission was granted.
    pub fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }

    /// `true` if this admission was refused.
    pub fn is_refused(self) -> bool {
        matches!(self, Self::Refused)
    }
}
