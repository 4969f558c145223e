mod bridge;
mod flags;
mod formatters;
pub mod global;
mod logger;
mod sinks;

use std::{io, panic::Location};

pub use flags::Flags;
pub use formatters::{format_header, DefaultFormatter};
pub use logger::{recover, Builder, Logger};
pub use sinks::{BufferSink, FanOutSink, FileSink, NullSink, StderrSink, StdoutSink, WriterSink};

/// Receives one complete line per `write`. Calls are serialized by the [`Logger`].
pub trait LogSink: Send {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<S: LogSink + ?Sized> LogSink for Box<S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        (**self).write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite<'a> {
    pub file: &'a str,
    pub line: u32,
}

impl<'a> CallSite<'a> {
    pub fn new(file: &'a str, line: u32) -> Self {
        Self { file, line }
    }
}

impl From<&'static Location<'static>> for CallSite<'static> {
    fn from(location: &'static Location<'static>) -> Self {
        Self::new(location.file(), location.line())
    }
}

#[macro_export]
macro_rules! info {
    ($logger:expr, $($value:expr),+ $(,)?) => {
        $logger.info(&[$(&$value as &dyn ::std::fmt::Display),+])
    };
}

#[macro_export]
macro_rules! infoln {
    ($logger:expr, $($value:expr),+ $(,)?) => {
        $logger.infoln(&[$(&$value as &dyn ::std::fmt::Display),+])
    };
}

#[macro_export]
macro_rules! infof {
    ($logger:expr, $($arg:tt)+) => {
        $logger.infof(::std::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($value:expr),+ $(,)?) => {
        $logger.fatal(&[$(&$value as &dyn ::std::fmt::Display),+])
    };
}

#[macro_export]
macro_rules! fatalln {
    ($logger:expr, $($value:expr),+ $(,)?) => {
        $logger.fatalln(&[$(&$value as &dyn ::std::fmt::Display),+])
    };
}

#[macro_export]
macro_rules! fatalf {
    ($logger:expr, $($arg:tt)+) => {
        $logger.fatalf(::std::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! log_panic {
    ($logger:expr, $($value:expr),+ $(,)?) => {
        $logger.panic(&[$(&$value as &dyn ::std::fmt::Display),+])
    };
}

#[macro_export]
macro_rules! log_panicln {
    ($logger:expr, $($value:expr),+ $(,)?) => {
        $logger.panicln(&[$(&$value as &dyn ::std::fmt::Display),+])
    };
}

#[macro_export]
macro_rules! log_panicf {
    ($logger:expr, $($arg:tt)+) => {
        $logger.panicf(::std::format_args!($($arg)+))
    };
}
