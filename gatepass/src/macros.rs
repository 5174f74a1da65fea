
/// Logs a line under a named component. The component becomes the log
/// target, so the fern format in `main.rs` prints it between the level and
/// the pid.
/// Usage:
/// ```rust,ignore
/// gatepass_log!(Level::Info, "store", "Database ready at {}", path.display());
/// gatepass_log!(Level::Warn, "scan", "No QR code in frame");
/// ```
/// Logs like:
/// [2025-04-25T16:32:10+02:00][INFO ][store][pid=4568][tid=ThreadId(1)] Database ready at ...
#[macro_export]
macro_rules! gatepass_log {
    ($level:expr, $component:expr, $fmt:expr $(, $($arg:tt)+)?) => {
        log::log!(target: $component, $level, $fmt $(, $($arg)+)?)
    };
}

#[cfg(test)]
mod tests {
    use log::{Level, LevelFilter, Log, Metadata, Record};
    use std::sync::Mutex;

    /// A tiny in-memory logger that captures up to DEBUG.
    struct MemoryLogger {
        buffer: Mutex<String>,
    }

    impl MemoryLogger {
        const fn new() -> Self {
            MemoryLogger { buffer: Mutex::new(String::new()) }
        }

        fn take(&self) -> String {
            std::mem::take(&mut *self.buffer.lock().unwrap())
        }
    }

    static LOGGER: MemoryLogger = MemoryLogger::new();

    impl Log for MemoryLogger {
        fn enabled(&self, metadata: &Metadata) -> bool {
            metadata.level() <= Level::Debug
        }
        fn log(&self, record: &Record) {
            if self.enabled(record.metadata()) {
                let mut buf = self.buffer.lock().unwrap();
                buf.push_str(&format!("[{}][{}] {}\n", record.level(), record.target(), record.args()));
            }
        }
        fn flush(&self) {}
    }

    #[test]
    fn gatepass_log_uses_component_as_target() {
        log::set_logger(&LOGGER).unwrap();
        log::set_max_level(LevelFilter::Debug);
        LOGGER.take();

        gatepass_log!(Level::Debug, "scan", "Answer={}!", 42);
        gatepass_log!(Level::Info, "store", "plain");

        let output = LOGGER.take();
        assert!(output.contains("[DEBUG][scan] Answer=42!"), "missing level/component: {}", output);
        assert!(output.contains("[INFO][store] plain"), "missing second line: {}", output);
    }
}
