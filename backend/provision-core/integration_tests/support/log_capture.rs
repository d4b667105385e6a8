//! Per-thread capture of records logged by the library under test.
//!
//! `#[tokio::test]` drives each test on its own thread with a current-thread
//! runtime, so records emitted during a run land in that test's buffer only.

use std::cell::RefCell;
use std::sync::Once;

use log::{Level, LevelFilter, Log, Metadata, Record};

const CAPTURED_TARGET: &str = "provision_core";

thread_local! {
    static RECORDS: RefCell<Vec<(Level, String)>> = const { RefCell::new(Vec::new()) };
}

struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.target().starts_with(CAPTURED_TARGET)
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let line = record.args().to_string();
            let _ = RECORDS.try_with(|records| records.borrow_mut().push((record.level(), line)));
        }
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;
static INSTALL: Once = Once::new();

/// Install the capturing logger and start this thread from an empty buffer.
pub fn capture() {
    INSTALL.call_once(|| {
        log::set_logger(&LOGGER).expect("no other logger in the test binary");
        log::set_max_level(LevelFilter::Trace);
    });
    RECORDS.with(|records| records.borrow_mut().clear());
}

/// Everything captured on this thread since [`capture`].
pub fn records() -> Vec<(Level, String)> {
    RECORDS.with(|records| records.borrow().clone())
}

/// Messages captured at exactly `level`.
pub fn messages_at(level: Level) -> Vec<String> {
    records()
        .into_iter()
        .filter(|(l, _)| *l == level)
        .map(|(_, message)| message)
        .collect()
}
