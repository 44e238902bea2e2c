#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parse errors and validation errors are both fine; panics are not.
    if let Ok(cfg) = toml::from_str::<wheel_config::Config>(data)
        && cfg.validate().is_ok()
    {
        // Anything that validates must also convert and build.
        let core = wheel_core::ControllerCfg::from(&cfg);
        let built = wheel_core::WheelController::builder()
            .with_config(core)
            .with_feeder(wheel_core::mocks::RecordingFeeder::default())
            .with_cues(wheel_core::mocks::RecordingCues::default())
            .with_seed(0)
            .build();
        assert!(built.is_ok(), "validated config rejected by builder: {built:?}");
    }
});
