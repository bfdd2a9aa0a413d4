//! Stress tests for concurrent delivery
//!
//! These tests verify:
//! - Independent file locks on one file never interleave records
//! - A shared logger stays consistent under concurrent callers
//! - Metrics add up after heavy mixed-level load

use parking_lot::Mutex;
use rust_multisink_logger::prelude::*;
use rust_multisink_logger::{FileHandler, FileLock};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

const THREADS: usize = 8;
const RECORDS_PER_THREAD: usize = 50;

#[derive(Clone, Default)]
struct Counting {
    delivered: Arc<AtomicUsize>,
    messages: Arc<Mutex<Vec<String>>>,
}

impl Handler for Counting {
    fn name(&self) -> &str {
        "counting"
    }

    fn is_available(&mut self, _application: &Application) -> bool {
        true
    }

    fn deliver(&mut self, _application: &Application, event: &Event) -> Result<()> {
        self.delivered.fetch_add(1, Ordering::Relaxed);
        self.messages.lock().push(event.message().to_string());
        Ok(())
    }
}

/// Each writer owns its own lock, like separate processes would
#[test]
fn test_concurrent_file_locks_do_not_interleave() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("contended.log");
    FileLock::new(&path, 0o644).expect("Failed to create file");

    let mut handles = vec![];
    for thread_id in 0..THREADS {
        let path = path.clone();
        handles.push(thread::spawn(move || {
            let lock = FileLock::new(&path, 0o644)
                .expect("lock")
                .with_intervals(Duration::from_millis(1), Duration::from_millis(1));
            for i in 0..RECORDS_PER_THREAD {
                // Long records make torn writes visible
                let record = format!("{:02}-{:03}-{}\n", thread_id, i, "#".repeat(512));
                lock.append(record.as_bytes()).expect("append");
            }
        }));
    }
    for handle in handles {
        handle.join().expect("writer thread panicked");
    }

    let content = std::fs::read_to_string(&path).expect("Failed to read log file");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), THREADS * RECORDS_PER_THREAD);

    let mut seen = HashSet::new();
    for line in lines {
        assert_eq!(
            line.len(),
            2 + 1 + 3 + 1 + 512,
            "torn record: {:?}",
            &line[..16.min(line.len())]
        );
        assert!(seen.insert(line[..6].to_string()), "duplicate record {}", &line[..6]);
    }
}

#[test]
fn test_shared_logger_from_many_threads() {
    let counting = Counting::default();
    let logger = Arc::new(
        Logger::builder("stress")
            .defaults(Defaults::default())
            .min_level(LogLevel::Debug)
            .handler(counting.clone())
            .build(),
    );

    let mut handles = vec![];
    for thread_id in 0..THREADS {
        let logger = Arc::clone(&logger);
        handles.push(thread::spawn(move || {
            for i in 0..RECORDS_PER_THREAD {
                logger.info(format!("Thread {} - Message {}", thread_id, i));
            }
        }));
    }
    for handle in handles {
        handle.join().expect("logging thread panicked");
    }

    let total = THREADS * RECORDS_PER_THREAD;
    assert_eq!(counting.delivered.load(Ordering::Relaxed), total);
    assert_eq!(logger.metrics().dispatched_count(), total as u64);

    let unique: HashSet<String> = counting.messages.lock().iter().cloned().collect();
    assert_eq!(unique.len(), total);
}

#[test]
fn test_mixed_levels_metrics_add_up() {
    let counting = Counting::default();
    let logger = Arc::new(
        Logger::builder("mixed")
            .defaults(Defaults::default())
            .min_level(LogLevel::Warning)
            .handler(counting.clone())
            .build(),
    );

    let mut handles = vec![];
    for _ in 0..THREADS {
        let logger = Arc::clone(&logger);
        handles.push(thread::spawn(move || {
            for i in 0..RECORDS_PER_THREAD {
                let level = LogLevel::ALL[i % LogLevel::ALL.len()];
                logger.log(level, "tick");
            }
        }));
    }
    for handle in handles {
        handle.join().expect("logging thread panicked");
    }

    let metrics = logger.metrics();
    let total = (THREADS * RECORDS_PER_THREAD) as u64;
    assert_eq!(metrics.dispatched_count() + metrics.filtered_count(), total);
    assert_eq!(metrics.delivered_count(), metrics.dispatched_count());
    assert_eq!(counting.delivered.load(Ordering::Relaxed) as u64, metrics.delivered_count());
}

#[test]
fn test_file_handler_under_threads() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let app = Application::new("threads").with_all_disabled().with_file(
        FileConfiguration::default()
            .with_enabled(true)
            .with_path(temp_dir.path())
            .with_log_format(LogFormat::Jsonl)
            .with_timestamp_format(TimestampFormat::UnixTimestamp)
            .with_trace_format(TraceFormat::None),
    );

    let logger = Arc::new(
        Logger::builder("threads")
            .defaults(Defaults::default())
            .application(app.clone())
            .min_level(LogLevel::Debug)
            .handler(
                FileHandler::new()
                    .with_lock_intervals(Duration::from_millis(1), Duration::from_millis(1)),
            )
            .build(),
    );

    let mut handles = vec![];
    for thread_id in 0..4 {
        let logger = Arc::clone(&logger);
        handles.push(thread::spawn(move || {
            for i in 0..20 {
                logger.debug(format!("{}:{}", thread_id, i));
            }
        }));
    }
    for handle in handles {
        handle.join().expect("logging thread panicked");
    }

    let content =
        std::fs::read_to_string(FileHandler::log_file_path(&app)).expect("Failed to read log file");
    let mut count = 0;
    for line in content.lines() {
        let value: serde_json::Value =
            serde_json::from_str(line).expect("one JSON record per line");
        assert_eq!(value["level"], "DBG");
        count += 1;
    }
    assert_eq!(count, 80);
}
