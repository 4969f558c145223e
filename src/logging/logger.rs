use std::{
    any::Any,
    fmt::{self, Display, Write as _},
    io,
    panic::{self, Location, UnwindSafe},
    path::PathBuf,
    sync::{Mutex, MutexGuard, PoisonError},
};

use chrono::Utc;
use eyre::Context;
use log::LevelFilter;

use super::{
    bridge::LogBridge,
    formatters::DefaultFormatter,
    sinks::{FanOutSink, FileSink, NullSink, StderrSink, StdoutSink},
    CallSite, Flags, LogSink,
};

struct Inner {
    sink: Box<dyn LogSink>,
    prefix: String,
}

/// Writes `prefix + header + message` lines to a [`LogSink`], one `write` per line.
pub struct Logger {
    formatter: DefaultFormatter,
    inner: Mutex<Inner>,
}

impl Logger {
    pub fn new(sink: impl LogSink + 'static, prefix: impl Into<String>, flags: Flags) -> Self {
        Self {
            formatter: DefaultFormatter::new(flags),
            inner: Mutex::new(Inner {
                sink: Box::new(sink),
                prefix: prefix.into(),
            }),
        }
    }

    pub fn init(self, filter: LevelFilter) -> eyre::Result<()> {
        log::set_max_level(filter);
        log::set_boxed_logger(Box::new(LogBridge::new(self, filter)))
            .context("Failed registering boxed logger")?;

        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the previous sink, still open.
    pub fn set_sink(&self, sink: impl LogSink + 'static) -> Box<dyn LogSink> {
        std::mem::replace(&mut self.lock().sink, Box::new(sink))
    }

    pub fn set_prefix(&self, prefix: impl Into<String>) {
        self.lock().prefix = prefix.into();
    }

    pub fn prefix(&self) -> String {
        self.lock().prefix.clone()
    }

    pub fn flags(&self) -> Flags {
        self.formatter.flags()
    }

    pub fn flush(&self) -> io::Result<()> {
        self.lock().sink.flush()
    }

    pub fn output(&self, call_site: Option<CallSite<'_>>, msg: &str) -> io::Result<()> {
        let now = Utc::now();

        let mut inner = self.lock();
        let line = self
            .formatter
            .format_line(&inner.prefix, now, call_site, msg);
        inner.sink.write(&line)?;

        Ok(())
    }

    #[track_caller]
    fn emit(&self, msg: &str) {
        // Write errors are only visible through `output`.
        let _ = self.output(Some(CallSite::from(Location::caller())), msg);
    }

    /// Values are written back to back with no separator, strings or not:
    /// `info(&[&1, &2])` logs `12`. Use [`Logger::infoln`] for spaces.
    #[track_caller]
    pub fn info(&self, values: &[&dyn Display]) {
        self.emit(&concat(values));
    }

    #[track_caller]
    pub fn infoln(&self, values: &[&dyn Display]) {
        self.emit(&join(values));
    }

    #[track_caller]
    pub fn infof(&self, args: fmt::Arguments<'_>) {
        self.emit(&args.to_string());
    }

    /// Exits the process with status 1 after the write.
    #[track_caller]
    pub fn fatal(&self, values: &[&dyn Display]) -> ! {
        self.exit(&concat(values))
    }

    #[track_caller]
    pub fn fatalln(&self, values: &[&dyn Display]) -> ! {
        self.exit(&join(values))
    }

    #[track_caller]
    pub fn fatalf(&self, args: fmt::Arguments<'_>) -> ! {
        self.exit(&args.to_string())
    }

    #[track_caller]
    fn exit(&self, msg: &str) -> ! {
        self.emit(msg);
        let _ = self.flush();
        std::process::exit(1)
    }

    #[track_caller]
    pub fn panic(&self, values: &[&dyn Display]) -> ! {
        self.unwind(concat(values))
    }

    #[track_caller]
    pub fn panicln(&self, values: &[&dyn Display]) -> ! {
        self.unwind(join(values))
    }

    #[track_caller]
    pub fn panicf(&self, args: fmt::Arguments<'_>) -> ! {
        self.unwind(args.to_string())
    }

    #[track_caller]
    fn unwind(&self, msg: String) -> ! {
        self.emit(&msg);
        panic::panic_any(msg)
    }
}

fn concat(values: &[&dyn Display]) -> String {
    let mut msg = String::new();
    for value in values {
        let _ = write!(msg, "{}", value);
    }
    msg
}

fn join(values: &[&dyn Display]) -> String {
    let mut msg = String::new();
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            msg.push(' ');
        }
        let _ = write!(msg, "{}", value);
    }
    msg.push('\n');
    msg
}

/// Catches panics with a `String` or `&str` payload. Others keep unwinding.
pub fn recover<F, R>(f: F) -> Result<R, String>
where
    F: FnOnce() -> R + UnwindSafe,
{
    panic::catch_unwind(f).map_err(|payload| match text_payload(payload) {
        Ok(msg) => msg,
        Err(payload) => panic::resume_unwind(payload),
    })
}

fn text_payload(payload: Box<dyn Any + Send>) -> Result<String, Box<dyn Any + Send>> {
    match payload.downcast::<String>() {
        Ok(msg) => Ok(*msg),
        Err(payload) => payload.downcast::<&'static str>().map(|msg| msg.to_string()),
    }
}

type SinkConstructor = Box<dyn Fn() -> eyre::Result<Box<dyn LogSink>>>;

pub struct Builder {
    prefix: String,
    flags: Flags,
    constructors: Vec<SinkConstructor>,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    pub fn new() -> Self {
        Self {
            prefix: String::new(),
            flags: Flags::STD,
            constructors: Vec::new(),
        }
    }

    pub fn with_prefix(self, prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..self
        }
    }

    pub fn with_flags(self, flags: Flags) -> Self {
        Self { flags, ..self }
    }

    fn push(mut self, constructor: SinkConstructor) -> Self {
        self.constructors.push(constructor);
        self
    }

    pub fn with_file_sink(self, path: impl Into<PathBuf>) -> Self {
        let path: PathBuf = path.into();
        self.push(Box::new(move || {
            let sink = FileSink::new(&path)?;
            Ok(Box::new(sink))
        }))
    }

    pub fn with_stdout_sink(self) -> Self {
        self.push(Box::new(|| Ok(Box::new(StdoutSink::new()))))
    }

    pub fn with_stderr_sink(self) -> Self {
        self.push(Box::new(|| Ok(Box::new(StderrSink::new()))))
    }

    /// Only the first `build` gets the sink.
    pub fn with_sink(self, sink: impl LogSink + 'static) -> Self {
        let slot: Mutex<Option<Box<dyn LogSink>>> = Mutex::new(Some(Box::new(sink)));
        self.push(Box::new(move || {
            let sink = slot
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .take()
                .ok_or_else(|| eyre::eyre!("Custom sink was already handed to a logger"))?;
            Ok(sink)
        }))
    }

    pub fn build(&self) -> eyre::Result<Logger> {
        let mut sinks = self
            .constructors
            .iter()
            .map(|constructor| constructor())
            .collect::<eyre::Result<Vec<_>>>()?;

        let sink: Box<dyn LogSink> = match sinks.len() {
            0 => Box::new(NullSink::new()),
            1 => sinks.remove(0),
            _ => Box::new(FanOutSink::new(sinks)),
        };

        Ok(Logger::new(sink, self.prefix.clone(), self.flags))
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        sync::{Arc, Barrier},
        thread,
    };

    use super::*;
    use crate::logging::BufferSink;

    struct BrokenSink;

    impl LogSink for BrokenSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }
    }

    /// Pushes one byte at a time and yields in between, so unserialized
    /// writers would interleave.
    struct TrickleSink {
        buf: Arc<Mutex<Vec<u8>>>,
    }

    impl LogSink for TrickleSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            for byte in buf {
                self.buf.lock().unwrap().push(*byte);
                thread::yield_now();
            }
            Ok(buf.len())
        }
    }

    fn buffered(prefix: &str, flags: Flags) -> (Logger, BufferSink) {
        let buffer = BufferSink::new();
        (Logger::new(buffer.clone(), prefix, flags), buffer)
    }

    #[test]
    fn info_concatenates_values() {
        let (logger, out) = buffered("", Flags::empty());
        logger.info(&[&"a", &1, &"b", &2.5]);
        assert_eq!(out.contents(), "a1b2.5\n");
    }

    #[test]
    fn info_never_inserts_spaces_between_numbers() {
        let (logger, out) = buffered("", Flags::empty());
        logger.info(&[&1, &2, &"three", &4]);
        assert_eq!(out.contents(), "12three4\n");
    }

    #[test]
    fn infoln_joins_with_spaces() {
        let (logger, out) = buffered("", Flags::empty());
        logger.infoln(&[&"a", &1, &"b"]);
        assert_eq!(out.contents(), "a 1 b\n");
    }

    #[test]
    fn infof_formats_template() {
        let (logger, out) = buffered("", Flags::empty());
        crate::infof!(logger, "{} + {} = {}", 1, 2, 1 + 2);
        assert_eq!(out.contents(), "1 + 2 = 3\n");
    }

    #[test]
    fn macros_build_value_lists() {
        let (logger, out) = buffered("", Flags::empty());
        crate::info!(logger, "x=", 5);
        crate::infoln!(logger, "x=", 5);
        assert_eq!(out.contents(), "x=5\nx= 5\n");
    }

    #[test]
    fn newline_is_not_doubled() {
        let (logger, out) = buffered("", Flags::empty());
        logger.infof(format_args!("done\n"));
        assert_eq!(out.contents(), "done\n");
    }

    #[test]
    fn prefix_comes_first_and_is_taken_verbatim() {
        let (logger, out) = buffered("svc", Flags::SHORT_FILE);
        logger.info(&[&"hello"]);

        let line = out.contents();
        assert!(line.starts_with("svclogger.rs:"), "{}", line);
        assert!(line.ends_with(": hello\n"), "{}", line);
    }

    #[test]
    fn call_site_is_the_callers_line() {
        let (logger, out) = buffered("", Flags::SHORT_FILE);
        let expected_line = line!() + 1;
        logger.info(&[&"here"]);

        assert_eq!(out.contents(), format!("logger.rs:{}: here\n", expected_line));
    }

    #[test]
    fn long_file_uses_full_path() {
        let (logger, out) = buffered("", Flags::LONG_FILE);
        logger.info(&[&"here"]);
        assert!(out.contents().starts_with(file!()), "{}", out.contents());
    }

    #[test]
    fn prefix_and_sink_can_be_replaced() {
        let (logger, first) = buffered("one: ", Flags::empty());
        logger.info(&[&"a"]);

        let second = BufferSink::new();
        let _old = logger.set_sink(second.clone());
        logger.set_prefix("two: ");
        logger.info(&[&"b"]);

        assert_eq!(logger.prefix(), "two: ");
        assert_eq!(first.contents(), "one: a\n");
        assert_eq!(second.contents(), "two: b\n");
    }

    #[test]
    fn set_sink_returns_previous_sink() {
        let (logger, first) = buffered("", Flags::empty());
        let mut old = logger.set_sink(NullSink::new());

        old.write(b"still usable\n").unwrap();
        assert_eq!(first.contents(), "still usable\n");
    }

    #[test]
    fn info_ignores_write_failures() {
        let logger = Logger::new(BrokenSink, "", Flags::STD);
        logger.info(&[&"lost"]);
        logger.infof(format_args!("also {}", "lost"));
    }

    #[test]
    fn output_reports_write_failures() {
        let logger = Logger::new(BrokenSink, "", Flags::STD);
        let err = logger.output(None, "lost").unwrap_err();
        assert_eq!(err.to_string(), "disk full");
    }

    #[test]
    fn panic_writes_then_unwinds_with_message() {
        let (logger, out) = buffered("app: ", Flags::empty());

        let result: Result<(), String> = recover(|| logger.panicf(format_args!("bad value {}", 42)));

        assert_eq!(result.unwrap_err(), "bad value 42");
        assert_eq!(out.contents(), "app: bad value 42\n");
    }

    #[test]
    fn panic_still_unwinds_when_write_fails() {
        let logger = Logger::new(BrokenSink, "", Flags::empty());
        let result: Result<(), String> = recover(|| logger.panic(&[&"x"]));
        assert_eq!(result.unwrap_err(), "x");
    }

    #[test]
    fn panicln_payload_keeps_newline() {
        let (logger, out) = buffered("", Flags::empty());
        let result: Result<(), String> = recover(|| crate::log_panicln!(logger, "a", "b"));
        assert_eq!(result.unwrap_err(), "a b\n");
        assert_eq!(out.contents(), "a b\n");
    }

    #[test]
    fn recover_passes_through_values() {
        assert_eq!(recover(|| 7), Ok(7));
    }

    #[test]
    fn recover_catches_plain_panics() {
        let result: Result<(), String> = recover(|| panic!("plain"));
        assert_eq!(result.unwrap_err(), "plain");
    }

    #[test]
    fn lock_survives_panicking_sink() {
        struct PanickingSink;

        impl LogSink for PanickingSink {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                panic!("sink exploded")
            }
        }

        let logger = Logger::new(PanickingSink, "", Flags::empty());
        let _ = recover(|| logger.info(&[&"boom"]));

        let buffer = BufferSink::new();
        logger.set_sink(buffer.clone());
        logger.info(&[&"fine"]);
        assert_eq!(buffer.contents(), "fine\n");
    }

    #[test]
    fn concurrent_lines_do_not_interleave() {
        const THREADS: usize = 4;
        const LINES: usize = 25;

        let buf = Arc::new(Mutex::new(Vec::new()));
        let logger = Arc::new(Logger::new(
            TrickleSink { buf: buf.clone() },
            "",
            Flags::empty(),
        ));
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let logger = logger.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    let payload = t.to_string().repeat(16);
                    for _ in 0..LINES {
                        logger.infof(format_args!("{}", payload));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let out = String::from_utf8(buf.lock().unwrap().clone()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), THREADS * LINES);

        for line in lines {
            let first = line.chars().next().unwrap();
            assert_eq!(line.len(), 16, "{:?}", line);
            assert!(line.chars().all(|c| c == first), "interleaved: {:?}", line);
        }
    }

    #[test]
    fn builder_without_sinks_discards() {
        let logger = Builder::new().with_prefix("p").build().unwrap();
        assert_eq!(logger.flags(), Flags::STD);
        assert!(logger.output(None, "nowhere").is_ok());
    }

    #[test]
    fn builder_fans_out_to_every_sink() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.log");
        let buffer = BufferSink::new();

        let logger = Builder::new()
            .with_flags(Flags::empty())
            .with_prefix("> ")
            .with_sink(buffer.clone())
            .with_file_sink(&path)
            .build()
            .unwrap();

        logger.info(&[&"both"]);
        logger.flush().unwrap();

        assert_eq!(buffer.contents(), "> both\n");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "> both\n");
    }

    #[test]
    fn builder_surfaces_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no").join("such").join("dir.log");

        let err = Builder::new().with_file_sink(&path).build().err().unwrap();
        assert!(err.to_string().contains("dir.log"));
    }

    #[test]
    fn custom_sink_is_handed_out_once() {
        let builder = Builder::new().with_sink(BufferSink::new());
        assert!(builder.build().is_ok());
        assert!(builder.build().is_err());
    }
}
