use std::fmt::{Display, Write};

use chrono::{DateTime, Local, TimeZone, Utc};

use super::{CallSite, Flags};

pub struct DefaultFormatter {
    flags: Flags,
}

impl DefaultFormatter {
    pub fn new(flags: Flags) -> Self {
        Self { flags }
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    pub fn format_header(&self, now: DateTime<Utc>, call_site: Option<CallSite<'_>>) -> String {
        format_header(now, self.flags, call_site)
    }

    pub fn format_line(
        &self,
        prefix: &str,
        now: DateTime<Utc>,
        call_site: Option<CallSite<'_>>,
        msg: &str,
    ) -> Vec<u8> {
        let header = self.format_header(now, call_site);

        let mut line = Vec::with_capacity(prefix.len() + header.len() + msg.len() + 1);
        line.extend_from_slice(prefix.as_bytes());
        line.extend_from_slice(header.as_bytes());
        line.extend_from_slice(msg.as_bytes());
        if !msg.ends_with('\n') {
            line.push(b'\n');
        }

        line
    }
}

/// Date, time and file location, in that order, for whichever are enabled.
pub fn format_header(now: DateTime<Utc>, flags: Flags, call_site: Option<CallSite<'_>>) -> String {
    let mut header = String::new();

    if flags.contains(Flags::UTC) {
        push_datetime(&mut header, &now, flags);
    } else {
        push_datetime(&mut header, &now.with_timezone(&Local), flags);
    }

    if flags.shows_file() {
        let (file, line) = match call_site {
            Some(site) if flags.contains(Flags::SHORT_FILE) => (short_file(site.file), site.line),
            Some(site) => (site.file, site.line),
            None => ("???", 0),
        };

        let _ = write!(header, "{}:{}: ", file, line);
    }

    header
}

fn push_datetime<Tz>(out: &mut String, time: &DateTime<Tz>, flags: Flags)
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if flags.contains(Flags::DATE) {
        let _ = write!(out, "{} ", time.format("%Y/%m/%d"));
    }

    if flags.contains(Flags::TIME) {
        let _ = write!(out, "{}", time.format("%H:%M:%S"));
        if flags.contains(Flags::MICROSECONDS) {
            let _ = write!(out, "{}", time.format("%.6f"));
        }
        out.push(' ');
    }
}

fn short_file(file: &str) -> &str {
    match file.rfind(['/', '\\']) {
        Some(idx) => &file[idx + 1..],
        None => file,
    }
}
