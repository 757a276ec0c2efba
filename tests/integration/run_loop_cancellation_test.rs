// Integration tests for the refresh loop: cadence and cooperative stop

use puppetserver_metrics::core::{LoopState, RunLoop, StopSignal};
use std::thread;
use std::time::{Duration, Instant};

#[test]
fn test_period_is_interval_not_interval_plus_work() {
    let interval = Duration::from_millis(150);
    let work = Duration::from_millis(60);
    let stop = StopSignal::new();
    let mut run_loop = RunLoop::new(interval, stop.clone());

    let mut starts = Vec::new();
    run_loop
        .run(|n| {
            starts.push(Instant::now());
            thread::sleep(work);
            if n == 4 {
                stop.trigger();
            }
            Ok(())
        })
        .unwrap();

    assert_eq!(starts.len(), 5);
    let total = starts[4] - starts[0];

    // Four periods of 150ms. Adding the work on top would give 840ms.
    assert!(total >= Duration::from_millis(560), "too fast: {:?}", total);
    assert!(total < Duration::from_millis(800), "work time not absorbed: {:?}", total);
}

#[test]
fn test_slow_tick_starts_next_one_immediately() {
    let stop = StopSignal::new();
    let mut run_loop = RunLoop::new(Duration::from_millis(20), stop.clone());

    let mut starts = Vec::new();
    run_loop
        .run(|n| {
            starts.push(Instant::now());
            if n == 0 {
                thread::sleep(Duration::from_millis(100));
            }
            if n == 1 {
                stop.trigger();
            }
            Ok(())
        })
        .unwrap();

    let gap = starts[1] - starts[0];
    assert!(gap >= Duration::from_millis(100));
    assert!(gap < Duration::from_millis(400), "overrun should not add a wait: {:?}", gap);
}

#[test]
fn test_stop_interrupts_long_wait() {
    let stop = StopSignal::new();
    let mut run_loop = RunLoop::new(Duration::from_secs(60), stop.clone());

    let trigger = stop.clone();
    let handle = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        trigger.trigger();
    });

    let start = Instant::now();
    run_loop.run(|_| Ok(())).unwrap();
    handle.join().unwrap();

    assert!(start.elapsed() < Duration::from_secs(2), "Stop should end the wait promptly");
    assert_eq!(run_loop.ticks(), 1, "No tick should run after the stop");
    assert_eq!(run_loop.state(), LoopState::Terminated);
}

#[test]
fn test_concurrent_triggers_count_once() {
    let stop = StopSignal::new();
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let stop = stop.clone();
            thread::spawn(move || stop.trigger())
        })
        .collect();

    let first_calls = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|&first| first)
        .count();

    assert_eq!(first_calls, 1);
    assert!(stop.is_set());
}
