use protocell_lib::app::{App, AppOptions, ShutdownManager};
use protocell_lib::Signals;
use std::path::Path;
use std::time::{Duration, Instant};

fn write_config(dir: &Path) -> std::path::PathBuf {
    let saves = dir.join("saves");
    let path = dir.join("config.toml");
    let content = format!(
        r#"
log_interval = 2

[world]
plants_per_quadrant = 5
eggs_per_quadrant = 4

[metabolism]
hatch_age = 1

[persistence]
saves_dir = '{}'
autosave_period_secs = 1
"#,
        saves.display()
    );
    std::fs::write(&path, content).expect("write config");
    path
}

fn options(dir: &Path, ticks: u64) -> AppOptions {
    AppOptions {
        config_path: Some(write_config(dir)),
        ticks: Some(ticks),
        partitions: Some(2),
        seed: Some(8),
        ..AppOptions::default()
    }
}

#[test]
fn test_run_stops_at_tick_limit() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut app = App::new(options(dir.path(), 5), Signals::new()).expect("app starts");

    app.run().expect("run succeeds");

    assert_eq!(app.ticks_run, 5);
    assert_eq!(app.sim.tick, 5);
    assert_eq!(app.metrics.tick_count(), 5);
    assert!(!app.running);
}

#[test]
fn test_shutdown_signal_stops_before_first_tick() {
    let dir = tempfile::tempdir().expect("temp dir");
    let signals = Signals::new();
    let mut app = App::new(options(dir.path(), 100), signals.clone()).expect("app starts");
    signals.request_shutdown();

    app.run().expect("run succeeds");

    assert_eq!(app.ticks_run, 0);
}

#[test]
fn test_autosave_waits_for_period_and_skips_while_paused() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut app = App::new(options(dir.path(), 1), Signals::new()).expect("app starts");
    let now = Instant::now();

    assert!(!app.maybe_autosave(now));

    app.controls.set_paused(true);
    assert!(!app.maybe_autosave(now + Duration::from_secs(5)));

    app.controls.set_paused(false);
    assert!(app.maybe_autosave(now + Duration::from_secs(5)));
    assert_eq!(app.store.list().expect("list saves").len(), 1);
    assert_eq!(app.metrics.counter("saves"), 1);
}

#[test]
fn test_manual_save_is_honoured_while_paused() {
    let dir = tempfile::tempdir().expect("temp dir");
    let signals = Signals::new();
    let mut app = App::new(options(dir.path(), 1), signals.clone()).expect("app starts");
    app.controls.set_paused(true);
    app.controls.request_save();

    // A paused app loops until stopped; stop it from another thread.
    let stopper = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(100));
        signals.request_shutdown();
    });
    app.run().expect("run succeeds");
    stopper.join().expect("stopper thread");

    assert_eq!(app.ticks_run, 0);
    assert!(app.last_save_path.is_some());
}

#[test]
fn test_exit_save_can_be_resumed() {
    let dir = tempfile::tempdir().expect("temp dir");
    let signals = Signals::new();
    let mut app = App::new(options(dir.path(), 3), signals.clone()).expect("app starts");
    app.run().expect("run succeeds");

    let shutdown = ShutdownManager::new(signals);
    let saved = shutdown
        .cleanup(&mut app)
        .expect("cleanup succeeds")
        .expect("state saved on exit");
    assert_eq!(shutdown.exit_code(), 0);

    let resumed = App::new(
        AppOptions {
            load: Some(saved),
            ..options(dir.path(), 1)
        },
        Signals::new(),
    )
    .expect("resumed app starts");
    assert_eq!(resumed.sim.tick, 3);
    assert_eq!(resumed.sim.cells, app.sim.cells);
}
