//! Line-oriented logging.
//!
//! A [`Logger`] writes `prefix + header + message` lines to a [`LogSink`].
//! The header (date, time, call site) is controlled by [`Flags`]. Each logging
//! call comes in three flavours: `info*` writes and returns, `fatal*` writes
//! and exits the process, `panic*` writes and unwinds.
//!
//! ```no_run
//! use linelog::{infof, Flags, Logger, StdoutSink};
//!
//! let logger = Logger::new(StdoutSink::new(), "app: ", Flags::STD | Flags::SHORT_FILE);
//! infof!(logger, "listening on {}", 8080);
//! ```

pub mod config;
pub mod logging;

pub use logging::{
    format_header, global, recover, BufferSink, Builder, CallSite, DefaultFormatter, FanOutSink,
    FileSink, Flags, LogSink, Logger, NullSink, StderrSink, StdoutSink, WriterSink,
};
