// Termination signals delivered to the process set the stop signal.
// Lives in its own test binary: only one handler may be installed per process.

#![cfg(unix)]

use puppetserver_metrics::core::{install_signal_bridge, StopSignal};
use std::time::Duration;

fn raise(signal: libc::c_int) {
    // SAFETY: raise only queues a signal for the calling thread
    let rc = unsafe { libc::raise(signal) };
    assert_eq!(rc, 0, "raise({}) failed", signal);
}

#[test]
fn test_termination_signals_set_stop() {
    let stop = StopSignal::new();
    install_signal_bridge(&stop).unwrap();

    raise(libc::SIGHUP);
    assert!(
        stop.wait_timeout(Duration::from_secs(2)),
        "SIGHUP should set the stop signal"
    );

    // Later signals are harmless once stopped
    raise(libc::SIGTERM);
    raise(libc::SIGINT);
    std::thread::sleep(Duration::from_millis(50));
    assert!(stop.is_set());
    assert!(!stop.trigger());

    // A second bridge is refused
    assert!(install_signal_bridge(&StopSignal::new()).is_err());
}
