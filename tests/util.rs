#![allow(dead_code)]
use climrisk::hazard::centroids::Centroids;
use log::{Level, LevelFilter, Log, Metadata, Record};
use once_cell::sync::Lazy;
use std::path::PathBuf;
use std::sync::Mutex;
use std::thread::ThreadId;
use tempfile::TempDir;

/// Logger that keeps every record, tagged with the emitting thread.
struct CaptureLogger;

static RECORDS: Mutex<Vec<(ThreadId, Level, String)>> = Mutex::new(Vec::new());
static LOGGER: CaptureLogger = CaptureLogger;
static INSTALL: Lazy<()> = Lazy::new(|| {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(LevelFilter::Trace);
});

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        RECORDS.lock().unwrap().push((
            std::thread::current().id(),
            record.level(),
            record.args().to_string(),
        ));
    }

    fn flush(&self) {}
}

/// Runs `f` and returns its result with the log records it emitted on this
/// thread.
pub fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, Vec<(Level, String)>) {
    Lazy::force(&INSTALL);
    let me = std::thread::current().id();
    RECORDS.lock().unwrap().retain(|(t, _, _)| *t != me);
    let out = f();
    let logs = RECORDS
        .lock()
        .unwrap()
        .iter()
        .filter(|(t, _, _)| *t == me)
        .map(|(_, level, msg)| (*level, msg.clone()))
        .collect();
    (out, logs)
}

/// Messages at `Warn` level.
pub fn warnings(logs: &[(Level, String)]) -> Vec<&str> {
    logs.iter()
        .filter(|(level, _)| *level == Level::Warn)
        .map(|(_, msg)| msg.as_str())
        .collect()
}

/// Centroids from (lat, lon) pairs and ids.
pub fn centroids(points: &[(f64, f64)], ids: &[i64]) -> Centroids {
    Centroids::from_points(points.iter().copied(), ids.to_vec())
}

/// Creates an empty file `name` in a fresh scratch directory.
///
/// The directory is removed when the returned [`TempDir`] is dropped; keep it
/// bound (`let (_dir, path) = ...`) for as long as the file is read.
pub fn touch(name: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::Builder::new().prefix("climrisk-").tempdir().unwrap();
    let path = dir.path().join(name);
    std::fs::write(&path, b"").unwrap();
    (dir, path)
}
