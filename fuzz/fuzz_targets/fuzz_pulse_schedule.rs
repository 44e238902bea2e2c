#![no_main]
use libfuzzer_sys::fuzz_target;
use wheel_core::mocks::{RecordingCues, RecordingFeeder};
use wheel_core::runner::replay;
use wheel_core::{HourWindow, WheelController};
use wheel_traits::clock::ManualClock;

fuzz_target!(|input: (u64, Vec<u16>)| {
    let (seed, gaps) = input;
    let clock = ManualClock::new();
    let Ok(mut ctl) = WheelController::builder()
        .with_hours(HourWindow::ALWAYS)
        .with_feeder(RecordingFeeder::default())
        .with_cues(RecordingCues::default())
        .with_clock(Box::new(clock.clone()))
        .with_seed(seed)
        .build()
    else {
        return;
    };

    let mut t = 0u64;
    let times: Vec<u64> = gaps
        .iter()
        .map(|g| {
            t += u64::from(*g);
            t
        })
        .collect();
    let stats = replay(&mut ctl, &clock, &times, 30_000);

    let snap = ctl.snapshot();
    assert!(snap.count < 5);
    assert!(snap.history.len() <= 10);
    assert!(snap.history.iter().all(|ts| *ts <= snap.now_ms));
    assert!(stats.wins <= stats.jackpots);
    assert_eq!(stats.pulses as usize, times.len());
});
