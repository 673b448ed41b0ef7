//! End-to-end poll cycle tests against real temp files

use std::fs;
use std::path::Path;
use std::sync::Mutex;

use deskwatch::{run_cycle, Config, EmissionLog, LogFormat, MetricsSink, SeverityRule, StateStore};
use tempfile::{tempdir, TempDir};

/// Sink that captures submitted gauges
#[derive(Default)]
struct CaptureSink {
    gauges: Mutex<Vec<(String, f64, Vec<String>)>>,
}

impl MetricsSink for CaptureSink {
    fn gauge(&self, name: &str, value: f64, tags: &[String]) -> anyhow::Result<()> {
        self.gauges
            .lock()
            .unwrap()
            .push((name.to_string(), value, tags.to_vec()));
        Ok(())
    }
}

fn test_config(dir: &TempDir, desktop: &Path) -> Config {
    Config {
        desktop_path: Some(desktop.to_path_buf()),
        state_file: dir.path().join("state.json"),
        emission_log: dir.path().join("emissions.log"),
        statsd_addr: None,
        ..Config::default()
    }
}

#[test]
fn test_first_cycle_emits_and_persists() {
    let dir = tempdir().unwrap();
    let desktop = dir.path().join("Desktop");
    fs::create_dir(&desktop).unwrap();
    fs::write(desktop.join("a.txt"), "").unwrap();
    fs::write(desktop.join("b.txt"), "").unwrap();

    let config = test_config(&dir, &desktop);
    let sink = CaptureSink::default();

    let outcome = run_cycle(&config, &sink, 1000);

    assert_eq!(outcome.observed_count, 2);
    assert!(outcome.emitted);
    assert!(outcome.reason.as_ref().unwrap().contains("unset -> 2"));
    assert!(outcome.state_write_error.is_none());

    let state = StateStore::new(&config.state_file).load().unwrap();
    assert_eq!(state.last_count, Some(2));
    assert_eq!(state.last_logged, 1000);

    let records = EmissionLog::new(&config.emission_log, LogFormat::Jsonl).read_recent(10);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].file_count, 2);
    assert_eq!(records[0].file_count_change, 0);
}

#[test]
fn test_unchanged_count_within_heartbeat_skips() {
    let dir = tempdir().unwrap();
    let desktop = dir.path().join("Desktop");
    fs::create_dir(&desktop).unwrap();
    fs::write(desktop.join("a.txt"), "").unwrap();

    let config = test_config(&dir, &desktop);
    let sink = CaptureSink::default();

    assert!(run_cycle(&config, &sink, 1000).emitted);
    let state_bytes = fs::read(&config.state_file).unwrap();

    let second = run_cycle(&config, &sink, 2000);
    assert!(!second.emitted);
    assert!(second.reason.is_none());

    // state untouched on a skipped cycle
    assert_eq!(fs::read(&config.state_file).unwrap(), state_bytes);
    let records = EmissionLog::new(&config.emission_log, LogFormat::Jsonl).read_recent(10);
    assert_eq!(records.len(), 1);

    // the gauge still goes out every cycle
    assert_eq!(sink.gauges.lock().unwrap().len(), 2);
}

#[test]
fn test_changed_count_emits_with_delta() {
    let dir = tempdir().unwrap();
    let desktop = dir.path().join("Desktop");
    fs::create_dir(&desktop).unwrap();
    fs::write(desktop.join("a.txt"), "").unwrap();

    let config = test_config(&dir, &desktop);
    let sink = CaptureSink::default();

    run_cycle(&config, &sink, 1000);
    fs::write(desktop.join("b.txt"), "").unwrap();
    fs::write(desktop.join("c.txt"), "").unwrap();

    let outcome = run_cycle(&config, &sink, 2000);
    assert!(outcome.emitted);
    assert!(outcome.reason.as_ref().unwrap().contains("1 -> 3"));

    let records = EmissionLog::new(&config.emission_log, LogFormat::Jsonl).read_recent(10);
    assert_eq!(records.last().unwrap().file_count_change, 2);
}

#[test]
fn test_heartbeat_after_interval_elapses() {
    let dir = tempdir().unwrap();
    let desktop = dir.path().join("Desktop");
    fs::create_dir(&desktop).unwrap();
    fs::write(desktop.join("a.txt"), "").unwrap();

    let config = test_config(&dir, &desktop);
    let sink = CaptureSink::default();

    run_cycle(&config, &sink, 1000);
    let outcome = run_cycle(&config, &sink, 1000 + 43_201);

    assert!(outcome.emitted);
    assert!(outcome.reason.as_ref().unwrap().contains("was alive"));

    let state = StateStore::new(&config.state_file).load().unwrap();
    assert_eq!(state.last_count, Some(1));
    assert_eq!(state.last_logged, 1000 + 43_201);
}

#[test]
fn test_unreadable_desktop_reports_sentinel() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("no-such-desktop");

    let config = test_config(&dir, &missing);
    let sink = CaptureSink::default();

    let outcome = run_cycle(&config, &sink, 1000);

    assert_eq!(outcome.observed_count, -1);
    assert_eq!(outcome.status.as_str(), "UNKNOWN");
    assert!(outcome.emitted);

    let gauges = sink.gauges.lock().unwrap();
    assert_eq!(gauges[0].1, -1.0);
    assert!(gauges[0].2.iter().any(|t| t == "status:UNKNOWN"));
}

#[test]
fn test_corrupt_state_degrades_to_first_run() {
    let dir = tempdir().unwrap();
    let desktop = dir.path().join("Desktop");
    fs::create_dir(&desktop).unwrap();
    fs::write(desktop.join("a.txt"), "").unwrap();

    let config = test_config(&dir, &desktop);
    fs::write(&config.state_file, "{{{{garbage").unwrap();

    let sink = CaptureSink::default();
    let outcome = run_cycle(&config, &sink, 1000);

    assert!(outcome.emitted);
    assert!(outcome.reason.as_ref().unwrap().contains("unset -> 1"));
    // the overwritten state is valid again
    assert!(StateStore::new(&config.state_file).load().is_some());
}

#[test]
fn test_gauge_tags_include_os_status_script() {
    let dir = tempdir().unwrap();
    let desktop = dir.path().join("Desktop");
    fs::create_dir(&desktop).unwrap();

    let mut config = test_config(&dir, &desktop);
    config.source = "mycheck".to_string();

    let sink = CaptureSink::default();
    run_cycle(&config, &sink, 1000);

    let gauges = sink.gauges.lock().unwrap();
    let (name, value, tags) = &gauges[0];
    assert_eq!(name, "deskwatch.desktop.file_count");
    assert_eq!(*value, 0.0);
    assert!(tags.iter().any(|t| t.starts_with("os:")));
    assert!(tags.iter().any(|t| t == "status:INFO"));
    assert!(tags.iter().any(|t| t == "script:mycheck"));
}

#[test]
fn test_text_format_log_lines() {
    let dir = tempdir().unwrap();
    let desktop = dir.path().join("Desktop");
    fs::create_dir(&desktop).unwrap();
    for i in 0..20 {
        fs::write(desktop.join(format!("f{}.txt", i)), "").unwrap();
    }

    let mut config = test_config(&dir, &desktop);
    config.log_format = LogFormat::Text;
    config.severity = SeverityRule::WarnAbove { threshold: 18 };

    let sink = CaptureSink::default();
    let outcome = run_cycle(&config, &sink, 1000);

    assert!(outcome.emitted);
    assert_eq!(outcome.status.as_str(), "WARNING");

    let content = fs::read_to_string(&config.emission_log).unwrap();
    assert_eq!(content.lines().count(), 1);
    assert!(content.contains("WARNING: !!"));
    assert!(content.contains("File count changed: unset -> 20"));
}

#[test]
fn test_excluded_names_do_not_count() {
    let dir = tempdir().unwrap();
    let desktop = dir.path().join("Desktop");
    fs::create_dir(&desktop).unwrap();
    fs::write(desktop.join("Thumbs.db"), "").unwrap();
    fs::write(desktop.join(".hidden"), "").unwrap();
    fs::write(desktop.join("real.txt"), "").unwrap();

    let config = test_config(&dir, &desktop);
    let sink = CaptureSink::default();

    let outcome = run_cycle(&config, &sink, 1000);
    assert_eq!(outcome.observed_count, 1);
}
