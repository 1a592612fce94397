//! Integration test: recording a playback to video through fake
//! capture backends.

use retrace_rand::RandSlot;
use retrace_replay::{
    CaptureError, CaptureMode, PlayOptions, ReplayConfig, ReplayEngine, ReplayEngineBuilder,
    ReplayError, MIME_VP8, MIME_VP9,
};
use retrace_test_utils::{
    drive_live_run, FakeCanvas, FakeRecorderFactory, HostCall, RecordingHost,
    ScriptedSimulation, SettableInput,
};

fn record(mut engine: ReplayEngine, slot: &RandSlot) -> ReplayEngine {
    let mut sim = ScriptedSimulation::new(slot.clone());
    engine.start_recording("seed-A");
    drive_live_run(&mut engine, &mut sim, &SettableInput::new(), 8).unwrap();
    engine.mark_ended().unwrap();
    engine
}

fn builder(slot: &RandSlot) -> ReplayEngineBuilder {
    ReplayEngine::builder(slot.clone())
}

fn video() -> PlayOptions<'static> {
    PlayOptions::new().capture(CaptureMode::Video)
}

#[test]
fn capture_produces_blob() {
    let slot = RandSlot::default();
    let canvas = FakeCanvas::new();
    let factory = FakeRecorderFactory::new();
    let engine = builder(&slot)
        .capture_surface(canvas.clone())
        .recorder_factory(factory.clone())
        .build()
        .unwrap();
    let mut engine = record(engine, &slot);
    let mut sim = ScriptedSimulation::new(slot.clone());

    let report = engine.play(&mut sim, video()).unwrap().unwrap();

    let blob = report.video.unwrap();
    assert!(!blob.is_empty());
    assert_eq!(blob.data, b"\x1a\x45\xdf\xa3cluster".to_vec());
    assert_eq!(blob.mime_type, MIME_VP9);
    assert_eq!(canvas.streams_opened(), vec![60]);

    let stats = factory.stats();
    assert_eq!(stats.opened_mime, vec![MIME_VP9.to_owned()]);
    assert_eq!((stats.starts, stats.stops), (1, 1));
}

#[test]
fn capture_falls_back_to_vp8() {
    let slot = RandSlot::default();
    let engine = builder(&slot)
        .capture_surface(FakeCanvas::new())
        .recorder_factory(FakeRecorderFactory::new().vp8_only())
        .build()
        .unwrap();
    let mut engine = record(engine, &slot);
    let mut sim = ScriptedSimulation::new(slot.clone());

    let report = engine.play(&mut sim, video()).unwrap().unwrap();

    assert_eq!(report.video.unwrap().mime_type, MIME_VP8);
}

#[test]
fn capture_uses_configured_fps() {
    let slot = RandSlot::default();
    let canvas = FakeCanvas::new();
    let config = ReplayConfig {
        capture_fps: 30,
        ..ReplayConfig::default()
    };
    let engine = builder(&slot)
        .config(config)
        .capture_surface(canvas.clone())
        .recorder_factory(FakeRecorderFactory::new())
        .build()
        .unwrap();
    let mut engine = record(engine, &slot);
    let mut sim = ScriptedSimulation::new(slot.clone());

    engine.play(&mut sim, video()).unwrap();

    assert_eq!(canvas.streams_opened(), vec![30]);
}

#[test]
fn no_capture_leaves_recorder_idle() {
    let slot = RandSlot::default();
    let factory = FakeRecorderFactory::new();
    let engine = builder(&slot)
        .capture_surface(FakeCanvas::new())
        .recorder_factory(factory.clone())
        .build()
        .unwrap();
    let mut engine = record(engine, &slot);
    let mut sim = ScriptedSimulation::new(slot.clone());

    let report = engine.play(&mut sim, PlayOptions::new()).unwrap().unwrap();

    assert!(report.video.is_none());
    assert_eq!(factory.stats().starts, 0);
}

#[test]
fn missing_recorder_fails_before_playback() {
    let slot = RandSlot::default();
    let host = RecordingHost::new();
    let engine = builder(&slot)
        .host(host.clone())
        .capture_surface(FakeCanvas::new())
        .build()
        .unwrap();
    let mut engine = record(engine, &slot);
    let mut sim = ScriptedSimulation::new(slot.clone());

    let err = engine.play(&mut sim, video()).unwrap_err();

    assert!(matches!(
        err,
        ReplayError::Capture(CaptureError::MissingRecorder)
    ));
    assert_eq!(host.calls(), vec![HostCall::StopMusic]);
    assert_eq!(sim.starts, 0);
    assert!(!engine.is_replaying());
}

#[test]
fn missing_surface_fails_before_playback() {
    let slot = RandSlot::default();
    let engine = builder(&slot)
        .recorder_factory(FakeRecorderFactory::new())
        .build()
        .unwrap();
    let mut engine = record(engine, &slot);
    let mut sim = ScriptedSimulation::new(slot.clone());

    let err = engine.play(&mut sim, video()).unwrap_err();

    assert!(matches!(
        err,
        ReplayError::Capture(CaptureError::MissingSurface)
    ));
    assert_eq!(sim.starts, 0);
}

#[test]
fn unconfirmed_stop_times_out_and_restores() {
    let slot = RandSlot::default();
    let host = RecordingHost::new();
    let config = ReplayConfig {
        capture_flush_timeout_ms: 20,
        ..ReplayConfig::default()
    };
    let engine = builder(&slot)
        .config(config)
        .host(host.clone())
        .capture_surface(FakeCanvas::new())
        .recorder_factory(FakeRecorderFactory::new().never_confirm_stop())
        .build()
        .unwrap();
    let mut engine = record(engine, &slot);
    let mut sim = ScriptedSimulation::new(slot.clone());

    let err = engine.play(&mut sim, video()).unwrap_err();

    assert_eq!(
        err.to_string(),
        ReplayError::Capture(CaptureError::FlushTimeout { timeout_ms: 20 }).to_string()
    );
    // The whole run played before the flush.
    assert_eq!(sim.updates, 8);
    assert_eq!(host.calls().last(), Some(&HostCall::ShowOver));
    assert!(!engine.is_replaying());
}
