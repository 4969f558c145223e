use log::{LevelFilter, Log};

use super::{CallSite, Logger};

/// Feeds records from the `log` macros into a [`Logger`], one line each,
/// rendered as `LEVEL message`.
pub(crate) struct LogBridge {
    logger: Logger,
    filter: LevelFilter,
}

impl LogBridge {
    pub(crate) fn new(logger: Logger, filter: LevelFilter) -> Self {
        Self { logger, filter }
    }
}

impl Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.filter >= metadata.level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let call_site = record
            .file()
            .map(|file| CallSite::new(file, record.line().unwrap_or(0)));
        let msg = format!("{} {}", record.level(), record.args());

        let _ = self.logger.output(call_site, &msg);
    }

    fn flush(&self) {
        let _ = self.logger.flush();
    }
}
