#![no_main]

use arbitrary::Arbitrary;
use gate_core::Gate;
use libfuzzer_sys::fuzz_target;

/// One of the eight public operations, driven single-threaded against one
/// gate. Multi-threaded interleavings are covered by the loom and stress
/// tests in `gate-core`; this target instead hammers the *sequential*
/// legality checks — can any order of calls, legal or not, ever be made to
/// panic or drive `n` negative?
#[derive(Arbitrary, Debug)]
enum Op {
    OpenBegin,
    OpenEnd,
    Begin,
    End,
    BarrierBegin,
    BarrierEnd,
    CloseBegin,
    CloseEnd,
}

fuzz_target!(|ops: Vec<Op>| {
    if ops.len() > 4_096 {
        return;
    }

    let gate = Gate::new("fuzz");
    // close_begin busy-polls while a barrier is held, waiting for a
    // *different* thread to call barrier_end. This driver is
    // single-threaded, so issuing CloseBegin while we ourselves hold the
    // barrier would spin forever; track it and skip rather than hang the
    // fuzzer on a sequence no real host could produce.
    let mut barrier_held = false;

    for op in ops {
        match op {
            Op::OpenBegin => {
                let _ = gate.open_begin();
            }
            Op::OpenEnd => gate.open_end(),
            Op::Begin => {
                let _ = gate.begin();
            }
            Op::End => gate.end(),
            Op::BarrierBegin => {
                if gate.barrier_begin().is_granted() {
                    barrier_held = true;
                }
            }
            Op::BarrierEnd => {
                gate.barrier_end();
                barrier_held = false;
            }
            Op::CloseBegin => {
                if !barrier_held {
                    let _ = gate.close_begin();
                }
            }
            Op::CloseEnd => gate.close_end(),
        }

        assert!(gate.in_flight() < u32::MAX / 2, "n underflowed");
    }
});
