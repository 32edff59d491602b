use chrono::{DateTime, Local};
use log::{Level, LevelFilter, Metadata, Record};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub level: Level,
    pub target: String,
    pub message: String,
}

/// Logger that echoes records to stderr and keeps the most recent ones for
/// an end-of-run summary
#[derive(Clone)]
pub struct AppLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
    /// Counted apart from `entries`, which drops old records
    warnings: Arc<AtomicUsize>,
    max_entries: usize,
    level: LevelFilter,
}

impl AppLogger {
    pub fn new(max_entries: usize, level: LevelFilter) -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
            warnings: Arc::new(AtomicUsize::new(0)),
            max_entries,
            level,
        }
    }

    pub fn init(self) -> Result<(), log::SetLoggerError> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(level);
        Ok(())
    }

    /// Warnings and errors logged since start, including evicted ones
    pub fn warning_count(&self) -> usize {
        self.warnings.load(Ordering::Relaxed)
    }
}

impl log::Log for AppLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        if record.level() <= Level::Warn {
            self.warnings.fetch_add(1, Ordering::Relaxed);
        }

        let entry = LogEntry {
            timestamp: Local::now(),
            level: record.level(),
            target: record.target().to_string(),
            message: format!("{}", record.args()),
        };

        eprintln!(
            "[{} {:<5} {}] {}",
            entry.timestamp.format("%H:%M:%S"),
            entry.level,
            entry.target,
            entry.message
        );

        let Ok(mut entries) = self.entries.lock() else {
            return;
        };
        entries.push(entry);

        // Keep only the most recent entries
        if entries.len() > self.max_entries {
            let excess = entries.len() - self.max_entries;
            entries.drain(0..excess);
        }
    }

    fn flush(&self) {}
}
