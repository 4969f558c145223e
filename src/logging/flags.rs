use std::{
    fmt::{self, Display},
    ops::{BitOr, BitOrAssign},
    str::FromStr,
};

/// Header fields of a [`Logger`](super::Logger), e.g.
/// `2009/01/23 01:23:23.123123 /a/b/c/d.rs:23: message`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Flags(u8);

impl Flags {
    /// Date in the local time zone: `2009/01/23`.
    pub const DATE: Flags = Flags(1 << 0);
    /// Time in the local time zone: `01:23:23`.
    pub const TIME: Flags = Flags(1 << 1);
    /// Microsecond resolution: `01:23:23.123123`. Only used with `TIME`.
    pub const MICROSECONDS: Flags = Flags(1 << 2);
    /// Full file path and line number: `/a/b/c/d.rs:23`.
    pub const LONG_FILE: Flags = Flags(1 << 3);
    /// Final path element and line number: `d.rs:23`. Overrides `LONG_FILE`.
    pub const SHORT_FILE: Flags = Flags(1 << 4);
    /// Use UTC rather than the local time zone for date and time.
    pub const UTC: Flags = Flags(1 << 5);
    /// Initial values for the default logger.
    pub const STD: Flags = Flags(Self::DATE.0 | Self::TIME.0);

    const NAMES: [(&'static str, Flags); 6] = [
        ("date", Flags::DATE),
        ("time", Flags::TIME),
        ("microseconds", Flags::MICROSECONDS),
        ("longfile", Flags::LONG_FILE),
        ("shortfile", Flags::SHORT_FILE),
        ("utc", Flags::UTC),
    ];

    pub const fn empty() -> Self {
        Flags(0)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }

    pub(crate) fn shows_file(self) -> bool {
        self.contains(Flags::SHORT_FILE) || self.contains(Flags::LONG_FILE)
    }
}

impl BitOr for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Self) -> Self::Output {
        Flags(self.0 | rhs.0)
    }
}

impl BitOrAssign for Flags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = Self::NAMES
            .iter()
            .filter(|(_, flag)| self.contains(*flag))
            .map(|(name, _)| *name)
            .collect();

        write!(f, "{}", names.join(","))
    }
}

impl FromStr for Flags {
    type Err = eyre::Report;

    /// `date,time,utc`, `std`, or empty.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut flags = Flags::empty();

        for name in s.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            let name = name.to_ascii_lowercase();
            if name == "std" {
                flags |= Flags::STD;
                continue;
            }

            match Self::NAMES.iter().find(|(known, _)| *known == name) {
                Some((_, flag)) => flags |= *flag,
                None => return Err(eyre::eyre!("Unknown log flag '{}'", name)),
            }
        }

        Ok(flags)
    }
}
