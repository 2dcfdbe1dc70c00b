//! `log` backend that forwards records to the browser console.

use log::{Level, Log, Metadata, Record};
use wasm_bindgen::JsValue;
use web_sys::console;

struct ConsoleLogger {
    max_level: Level,
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format!(
            "[{}] {}: {}",
            record.level(),
            record.target(),
            record.args()
        ));
        match record.level() {
            Level::Error => console::error_1(&line),
            Level::Warn => console::warn_1(&line),
            Level::Info => console::info_1(&line),
            Level::Debug | Level::Trace => console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

/// Installs the console logger; later calls are ignored.
pub fn init(max_level: Level) {
    static LOGGER: std::sync::OnceLock<ConsoleLogger> = std::sync::OnceLock::new();
    let logger = LOGGER.get_or_init(|| ConsoleLogger { max_level });
    if log::set_logger(logger).is_ok() {
        log::set_max_level(max_level.to_level_filter());
    }
}
