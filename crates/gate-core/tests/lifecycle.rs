//! Black-box lifecycle tests against the public API only, exercising the
//! gate the way a host component actually would: through the guard types
//! rather than the raw `_begin`/`_end` pairs.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::thread;

use gate_core::{Gate, Phase};

#[test]
fn host_component_round_trip() {
    let gate = Gate::new("host-component");
    assert_eq!(gate.phase(), Phase::Created);

    {
        let _opening = gate.open().expect("first open always succeeds");
    }
    assert_eq!(gate.phase(), Phase::Opened);

    for _ in 0..3 {
        let _work = gate.execute().expect("gate is open");
    }

    {
        let _barrier = gate.barrier().expect("no work in flight");
        assert_eq!(gate.phase(), Phase::OpenedBarrier);
    }

    {
        let _closing = gate.close().expect("nothing blocks close");
    }
    assert_eq!(gate.phase(), Phase::Created);
}

#[test]
fn second_open_is_refused_while_first_is_still_opening() {
    let gate = Arc::new(Gate::new("double-open-guard"));
    let held = gate.open().unwrap();
    assert!(gate.open().is_err());
    drop(held);
    assert_eq!(gate.phase(), Phase::Opened);
}

#[test]
fn many_workers_drain_cleanly_under_a_rolling_barrier() {
    let gate = Arc::new(Gate::new("rolling-barrier"));
    gate.open().unwrap();

    let observed_violations = Arc::new(AtomicU32::new(0));

    let workers: Vec<_> = (0..4)
        .map(|_| {
            let gate = Arc::clone(&gate);
            let observed_violations = Arc::clone(&observed_violations);
            thread::spawn(move || {
                for _ in 0..500 {
                    if let Ok(_work) = gate.execute() {
                        if gate.phase() == Phase::OpenedBarrier {
                            observed_violations.fetch_add(1, Ordering::AcqRel);
                        }
                    }
                }
            })
        })
        .collect();

    let barrier_gate = Arc::clone(&gate);
    let barrier_thread = thread::spawn(move || {
        for _ in 0..40 {
            let _barrier = barrier_gate.barrier();
        }
    });

    for w in workers {
        w.join().unwrap();
    }
    barrier_thread.join().unwrap();

    assert_eq!(observed_violations.load(Ordering::Acquire), 0);

    let _closing = gate.close().expect("no barrier or execution left in flight");
}
