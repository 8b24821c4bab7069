//! JSON-lines backend for the `log` facade.
//!
//! Every record becomes one object on stderr:
//! `{"ts":<ms>,"level":"INFO","mod":"<target>","msg":"..."}`.

use std::io::Write;

use log::{LevelFilter, Log, Metadata, Record};

use crate::common::time;

/// Logger writing one JSON object per record.
pub struct JsonLogger {
    level: LevelFilter,
}

impl JsonLogger {
    pub fn new(level: LevelFilter) -> Self {
        Self { level }
    }

    /// Render a record into the documented line schema (without newline).
    pub fn render(record: &Record<'_>) -> String {
        serde_json::json!({
            "ts": time::now_ms() as u64,
            "level": record.level().as_str(),
            "mod": record.target(),
            "msg": record.args().to_string(),
        })
        .to_string()
    }
}

impl Log for JsonLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = Self::render(record);
        let mut err = std::io::stderr().lock();
        let _ = writeln!(err, "{line}");
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Install the JSON logger as the global `log` backend.
///
/// Returns `false` when a logger was already installed; the existing one stays.
pub fn init(level: LevelFilter) -> bool {
    let installed = log::set_boxed_logger(Box::new(JsonLogger::new(level))).is_ok();
    if installed {
        log::set_max_level(level);
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_the_line_schema() {
        let line = JsonLogger::render(
            &Record::builder()
                .args(format_args!("loaded \"scaler\""))
                .level(log::Level::Warn)
                .target("artifacts")
                .build(),
        );
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["level"], "WARN");
        assert_eq!(value["mod"], "artifacts");
        assert_eq!(value["msg"], "loaded \"scaler\"");
        assert!(value["ts"].as_u64().unwrap() > 0);
    }

    #[test]
    fn filters_below_the_configured_level() {
        let logger = JsonLogger::new(LevelFilter::Info);
        let debug = Metadata::builder().level(log::Level::Debug).build();
        let error = Metadata::builder().level(log::Level::Error).build();
        assert!(!logger.enabled(&debug));
        assert!(logger.enabled(&error));
    }
}
