//! The gate itself: an atomic state word plus an atomic in-flight counter.

use std::fmt;

use crate::phase::{self, CLOSE_BIT, Phase, transition, transition_delta};
use crate::sync::{AtomicU32, Ordering};
use crate::{Admission, Refused};

const NO_NAME: &str = "NO_NAME";

/// A lifecycle-and-execution gate.
///
/// A host component embeds one `Gate` and asks it for permission before
/// running any public operation: `open_begin`/`open_end` to start up,
/// `begin`/`end` to bracket ordinary work, `barrier_begin`/`barrier_end` to
/// bracket work that must run alone, and `close_begin`/`close_end` to shut
/// down. The gate is the sole authority on whether a caller may proceed; it
/// does no I/O and owns nothing beyond its own two atomic words and a
/// diagnostic name.
///
/// All methods take `&self` — the gate is `Sync` and meant to be shared
/// (typically behind an `Arc`) across every thread that calls into the host
/// component.
pub struct Gate {
    state: AtomicU32,
    n: AtomicU32,
    name: Box<str>,
}

impl fmt::Debug for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = phase::load(&self.state);
        f.debug_struct("Gate")
            .field("name", &self.name)
            .field("phase", &phase::phase_of(state))
            .field("close_in_progress", &phase::close_bit_set(state))
            .field("n", &self.n.load(Ordering::Acquire))
            .finish()
    }
}

impl Default for Gate {
    fn default() -> Self {
        Self::unnamed()
    }
}

impl Gate {
    /// Create a gate in phase [`Phase::Created`], named for diagnostics.
    ///
    /// An empty name is substituted with `"NO_NAME"`, matching a missing
    /// name — safe Rust has no null handle to distinguish "absent" from
    /// "empty", so both collapse to the same substitution.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let name = if name.is_empty() { NO_NAME } else { &name };
        Self {
            state: AtomicU32::new(Phase::Created as u32),
            n: AtomicU32::new(0),
            name: Box::from(name),
        }
    }

    /// Create an unnamed gate; its diagnostic name is `"NO_NAME"`.
    pub fn unnamed() -> Self {
        Self::new(String::new())
    }

    /// The diagnostic name this gate was created with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The current lifecycle phase. Racy by construction — by the time the
    /// caller observes the result, another thread may have already moved
    /// on — useful only for diagnostics, never for admission decisions.
    pub fn phase(&self) -> Phase {
        phase::phase_of(phase::load(&self.state))
    }

    /// Number of regular executions currently admitted and not yet retired.
    pub fn in_flight(&self) -> u32 {
        self.n.load(Ordering::Acquire)
    }

    // ---------------------------------------------------------------
    // open
    // ---------------------------------------------------------------

    /// Move the gate from [`Phase::Created`] to [`Phase::Opening`], granting
    /// the caller exclusive responsibility for finishing initialization
    /// with a matching [`Gate::open_end`].
    ///
    /// Not idempotent: of any number of concurrent callers, at most one
    /// sees [`Admission::Granted`].
    pub fn open_begin(&self) -> Admission {
        let state = phase::load(&self.state);
        if !matches!(phase::phase_of(state), Phase::Created) {
            tracing::debug!(gate = %self.name, phase = ?phase::phase_of(state), "open_begin refused: not Created");
            return Admission::Refused;
        }
        match self.state.compare_exchange(
            state,
            transition(state, Phase::Opening),
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            Ok(_) => Admission::Granted,
            Err(_) => {
                tracing::debug!(gate = %self.name, "open_begin refused: lost the race to open");
                Admission::Refused
            }
        }
    }

    /// Promote [`Phase::Opening`] to [`Phase::Opened`]. Called once by the
    /// winner of [`Gate::open_begin`]. A phase other than `Opening` is a
    /// misuse by the caller: logged, otherwise ignored.
    pub fn open_end(&self) {
        let state = phase::load(&self.state);
        if !matches!(phase::phase_of(state), Phase::Opening) {
            tracing::warn!(gate = %self.name, phase = ?phase::phase_of(state), "open_end called outside Opening");
            return;
        }
        if self
            .state
            .compare_exchange(
                state,
                transition(state, Phase::Opened),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_err()
        {
            tracing::warn!(gate = %self.name, "open_end lost a CAS it should own exclusively");
        }
    }

    // ---------------------------------------------------------------
    // close
    // ---------------------------------------------------------------

    /// Drain the gate and reach [`Phase::Closing`], granting the caller
    /// exclusive responsibility for finishing teardown with a matching
    /// [`Gate::close_end`]. At most one closer proceeds at a time; the rest
    /// see [`Admission::Refused`] immediately.
    pub fn close_begin(&self) -> Admission {
        if self.state.fetch_or(CLOSE_BIT, Ordering::AcqRel) & CLOSE_BIT != 0 {
            tracing::debug!(gate = %self.name, "close_begin refused: another close is in progress");
            return Admission::Refused;
        }

        let result = loop {
            let state = phase::load(&self.state);
            match phase::phase_of(state) {
                Phase::Opened => {
                    if self
                        .state
                        .compare_exchange(
                            state,
                            transition(state, Phase::OpenedDrainingToClose),
                            Ordering::AcqRel,
                            Ordering::Acquire,
                        )
                        .is_err()
                    {
                        continue;
                    }
                    self.drain();
                    self.state.fetch_add(
                        transition_delta(Phase::OpenedDrainingToClose, Phase::Closing),
                        Ordering::AcqRel,
                    );
                    break Admission::Granted;
                }
                Phase::OpenedBarrier | Phase::OpenedDrainingToBarrier => {
                    crate::sync::short_sleep();
                }
                _ => {
                    tracing::debug!(gate = %self.name, phase = ?phase::phase_of(state), "close_begin refused: not Opened");
                    break Admission::Refused;
                }
            }
        };

        self.state.fetch_and(!CLOSE_BIT, Ordering::AcqRel);
        result
    }

    /// Return [`Phase::Closing`] to [`Phase::Created`], completing teardown.
    /// A phase other than `Closing` is a misuse by the caller: logged,
    /// otherwise ignored.
    pub fn close_end(&self) {
        let state = phase::load(&self.state);
        if !matches!(phase::phase_of(state), Phase::Closing) {
            tracing::warn!(gate = %self.name, phase = ?phase::phase_of(state), "close_end called outside Closing");
            return;
        }
        if self
            .state
            .compare_exchange(
                state,
                transition(state, Phase::Created),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_err()
        {
            tracing::warn!(gate = %self.name, "close_end lost a CAS it should own exclusively");
        }
    }

    // ---------------------------------------------------------------
    // regular execution
    // ---------------------------------------------------------------

    /// Admit one regular execution if the gate is [`Phase::Opened`] and no
    /// close is in progress. On [`Admission::Granted`] the caller must call
    /// a matching [`Gate::end`] exactly once.
    pub fn begin(&self) -> Admission {
        let snapshot = phase::load(&self.state);
        if !matches!(phase::phase_of(snapshot), Phase::Opened) || phase::close_bit_set(snapshot) {
            tracing::debug!(gate = %self.name, "begin refused: gate not open for regular execution");
            return Admission::Refused;
        }

        self.n.fetch_add(1, Ordering::AcqRel);

        let now = phase::load(&self.state);
        if now != snapshot {
            // A barrier or close started between our snapshot and our
            // increment; back out before it can conclude its drain having
            // missed us.
            let prev = self.n.fetch_sub(1, Ordering::AcqRel);
            if prev == 1 {
                crate::sync::wake_one(&self.n);
            }
            tracing::debug!(gate = %self.name, "begin refused: state changed during admission");
            return Admission::Refused;
        }

        Admission::Granted
    }

    /// Retire one regular execution granted by [`Gate::begin`]. Idempotent
    /// under excess calls: once `n` reaches zero, further calls are no-ops.
    pub fn end(&self) {
        let state = phase::load(&self.state);
        if !matches!(
            phase::phase_of(state),
            Phase::Opened | Phase::OpenedDrainingToBarrier | Phase::OpenedDrainingToClose
        ) {
            tracing::warn!(gate = %self.name, phase = ?phase::phase_of(state), "end called outside an executable phase");
            return;
        }

        loop {
            let n = self.n.load(Ordering::Acquire);
            if n == 0 {
                return;
            }
            if self
                .n
                .compare_exchange(n, n - 1, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                if n - 1 == 0 {
                    crate::sync::wake_one(&self.n);
                }
                return;
            }
        }
    }

    // ---------------------------------------------------------------
    // barrier execution
    // ---------------------------------------------------------------

    /// Drain all in-flight regular executions and grant the caller
    /// exclusive occupancy. On [`Admission::Granted`] the caller must call
    /// a matching [`Gate::barrier_end`].
    pub fn barrier_begin(&self) -> Admission {
        let snapshot = phase::load(&self.state);
        if !matches!(phase::phase_of(snapshot), Phase::Opened) || phase::close_bit_set(snapshot) {
            tracing::debug!(gate = %self.name, "barrier_begin refused: gate not open");
            return Admission::Refused;
        }

        if self
            .state
            .compare_exchange(
                snapshot,
                transition(snapshot, Phase::OpenedDrainingToBarrier),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_err()
        {
            tracing::debug!(gate = %self.name, "barrier_begin refused: lost the race to start draining");
            return Admission::Refused;
        }

        self.drain();
        self.state.fetch_add(
            transition_delta(Phase::OpenedDrainingToBarrier, Phase::OpenedBarrier),
            Ordering::AcqRel,
        );
        Admission::Granted
    }

    /// Release barrier occupancy, returning to [`Phase::Opened`]. A phase
    /// other than `OpenedBarrier` is a misuse by the caller: logged,
    /// otherwise ignored.
    pub fn barrier_end(&self) {
        let state = phase::load(&self.state);
        if !matches!(phase::phase_of(state), Phase::OpenedBarrier) {
            tracing::warn!(gate = %self.name, phase = ?phase::phase_of(state), "barrier_end called outside OpenedBarrier");
            return;
        }
        if self
            .state
            .compare_exchange(
                state,
                transition(state, Phase::Opened),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_err()
        {
            tracing::warn!(gate = %self.name, "barrier_end lost a CAS it should own exclusively");
        }
    }

    /// Wait on the address of `n` until every admitted regular execution has
    /// retired. Only ever called by the one thread that just won the CAS
    /// into a draining phase, so there is exactly one waiter at a time.
    fn drain(&self) {
        loop {
            let n = self.n.load(Ordering::Acquire);
            if n == 0 {
                return;
            }
            crate::sync::wait(&self.n, n);
        }
    }

    // ---------------------------------------------------------------
    // guard-returning ergonomic wrappers
    // ---------------------------------------------------------------

    /// `open_begin` followed by an [`Opening`](crate::Opening) guard that
    /// calls `open_end` on drop, so a panicking initializer can never leave
    /// the gate stuck in [`Phase::Opening`] forever.
    pub fn open(&self) -> Result<crate::Opening<'_>, Refused> {
        match self.open_begin() {
            Admission::Granted => Ok(crate::Opening::new(self)),
            Admission::Refused => Err(Refused),
        }
    }

    /// `close_begin` followed by a [`Closing`](crate::Closing) guard that
    /// calls `close_end` on drop.
    pub fn close(&self) -> Result<crate::Closing<'_>, Refused> {
        match self.close_begin() {
            Admission::Granted => Ok(crate::Closing::new(self)),
            Admission::Refused => Err(Refused),
        }
    }

    /// `begin` followed by an [`Execution`](crate::Execution) guard that
    /// calls `end` on drop — the idiomatic way to bracket a unit of regular
    /// work without risking a forgotten `end`.
    pub fn execute(&self) -> Result<crate::Execution<'_>, Refused> {
        match self.begin() {
            Admission::Granted => Ok(crate::Execution::new(self)),
            Admission::Refused => Err(Refused),
        }
    }

    /// `barrier_begin` followed by a [`Barrier`](crate::Barrier) guard that
    /// calls `barrier_end` on drop.
    pub fn barrier(&self) -> Result<crate::Barrier<'_>, Refused> {
        match self.barrier_begin() {
            Admission::Granted => Ok(crate::Barrier::new(self)),
            Admission::Refused => Err(Refused),
        }
    }
}
