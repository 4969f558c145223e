//! Process-wide default logger: [`StdoutSink`], no prefix, [`Flags::STD`].
//! Changes made here are seen by every thread.

use std::{
    fmt::{self, Display},
    sync::OnceLock,
};

use super::{Flags, LogSink, Logger, StdoutSink};

static DEFAULT_LOGGER: OnceLock<Logger> = OnceLock::new();

pub fn default_logger() -> &'static Logger {
    DEFAULT_LOGGER.get_or_init(|| Logger::new(StdoutSink::new(), "", Flags::STD))
}

/// Fails once the default exists, including one created lazily.
pub fn init_default(logger: Logger) -> eyre::Result<()> {
    DEFAULT_LOGGER
        .set(logger)
        .map_err(|_| eyre::eyre!("Default logger is already initialized"))
}

pub fn set_sink(sink: impl LogSink + 'static) -> Box<dyn LogSink> {
    default_logger().set_sink(sink)
}

pub fn set_prefix(prefix: impl Into<String>) {
    default_logger().set_prefix(prefix)
}

pub fn prefix() -> String {
    default_logger().prefix()
}

pub fn flags() -> Flags {
    default_logger().flags()
}

#[track_caller]
pub fn info(values: &[&dyn Display]) {
    default_logger().info(values)
}

#[track_caller]
pub fn infoln(values: &[&dyn Display]) {
    default_logger().infoln(values)
}

#[track_caller]
pub fn infof(args: fmt::Arguments<'_>) {
    default_logger().infof(args)
}

#[track_caller]
pub fn fatal(values: &[&dyn Display]) -> ! {
    default_logger().fatal(values)
}

#[track_caller]
pub fn fatalln(values: &[&dyn Display]) -> ! {
    default_logger().fatalln(values)
}

#[track_caller]
pub fn fatalf(args: fmt::Arguments<'_>) -> ! {
    default_logger().fatalf(args)
}

#[track_caller]
pub fn panic(values: &[&dyn Display]) -> ! {
    default_logger().panic(values)
}

#[track_caller]
pub fn panicln(values: &[&dyn Display]) -> ! {
    default_logger().panicln(values)
}

#[track_caller]
pub fn panicf(args: fmt::Arguments<'_>) -> ! {
    default_logger().panicf(args)
}
