//! `log` backend for the Workers console
//!
//! Library code logs through the `log` macros; this forwards each record to
//! the matching `console.*` call. Without `init` (native tests) records are
//! dropped by the facade.

use log::{Level, LevelFilter, Log, Metadata, Record};

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        match record.level() {
            Level::Error => worker::console_error!("[{}] {}", record.target(), record.args()),
            Level::Warn => worker::console_warn!("[{}] {}", record.target(), record.args()),
            Level::Info | Level::Debug | Level::Trace => {
                worker::console_log!("[{}] {}", record.target(), record.args());
            }
        }
    }

    fn flush(&self) {}
}

/// Install the console logger. Safe to call on every request; only the
/// first call registers, later calls just adjust the level.
pub fn init(level: LevelFilter) {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}
