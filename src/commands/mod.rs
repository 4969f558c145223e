use std::{fmt::Display, path::PathBuf};

use clap::{Parser, Subcommand};
use eyre::Context;
use log::LevelFilter;

use linelog::{
    config::{Config, ConfigManager, LocalConfigManager},
    Builder, Flags, Logger,
};

mod fatal;
mod info;
mod panic;
mod print;
mod printf;

#[derive(Subcommand, Debug)]
pub enum LinelogCmd {
    Print(print::Cmd),

    Printf(printf::Cmd),

    Fatal(fatal::Cmd),

    Panic(panic::Cmd),

    Info(info::Cmd),
}

impl Display for LinelogCmd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinelogCmd::Print(cmd) => write!(f, "print{}", if cmd.ln { " --ln" } else { "" }),
            LinelogCmd::Printf(_cmd) => write!(f, "printf"),
            LinelogCmd::Fatal(_cmd) => write!(f, "fatal"),
            LinelogCmd::Panic(cmd) => {
                write!(f, "panic{}", if cmd.recover { " --recover" } else { "" })
            }
            LinelogCmd::Info(_cmd) => write!(f, "info"),
        }
    }
}

#[derive(Parser)]
#[command(version, long_version = "")]
#[command(about = "Write log lines from the command line.", long_about = None, disable_help_subcommand = true)]
pub struct Linelog {
    #[arg(
        global = true,
        long,
        help = "Text written at the start of every line, as is. Defaults to the LINELOG_PREFIX environment variable.",
        display_order = 0
    )]
    pub prefix: Option<String>,

    #[arg(
        global = true,
        long,
        value_parser = parse_flags,
        help = "Comma separated header fields: date, time, microseconds, longfile, shortfile, utc or std. Defaults to LINELOG_FLAGS, then std.",
        display_order = 0
    )]
    pub flags: Option<Flags>,

    #[arg(
        global = true,
        long = "file",
        value_name = "PATH",
        help = "Also append every line to this file. Can be given more than once.",
        display_order = 1
    )]
    pub files: Vec<PathBuf>,

    #[arg(
        long,
        short = 'v',
        action = clap::ArgAction::Count,
        global = true,
        help = "Write verbose messages to stderr and to the default log file for debugging.",
        display_order = 999
    )]
    pub verbose: u8,

    #[command(subcommand)]
    pub cmd: LinelogCmd,
}

fn parse_flags(flags: &str) -> eyre::Result<Flags> {
    flags.parse()
}

impl Linelog {
    fn log_filter(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Off,
            1 => LevelFilter::Error,
            2 => LevelFilter::Warn,
            3 => LevelFilter::Info,
            4 => LevelFilter::Debug,
            5 => LevelFilter::Trace,
            6_u8..=u8::MAX => LevelFilter::max(),
        }
    }

    fn setup_logging(&self, config: &impl ConfigManager) -> eyre::Result<()> {
        let filter = self.log_filter();
        let mut builder = Builder::new()
            .with_stderr_sink()
            .with_prefix("linelog: ")
            .with_flags(Flags::STD | Flags::MICROSECONDS | Flags::SHORT_FILE);

        if filter != LevelFilter::Off {
            let log_path = PathBuf::from(
                config
                    .get_log_path()
                    .context("Failed constructing file sink log path")?,
            );
            if let Some(dir) = log_path.parent() {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("Failed creating log directory {}", dir.display()))?;
            }
            builder = builder.with_file_sink(log_path);
        }

        builder.build()?.init(filter)
    }

    fn build_logger(&self, config: &Config) -> eyre::Result<Logger> {
        let prefix = self.prefix.as_ref().unwrap_or(&config.prefix);
        let flags = self.flags.unwrap_or(config.flags);

        let mut builder = Builder::new()
            .with_prefix(prefix.as_str())
            .with_flags(flags)
            .with_stdout_sink();

        for path in &self.files {
            builder = builder.with_file_sink(path);
        }

        builder.build()
    }

    pub fn run(self) -> eyre::Result<()> {
        let manager = LocalConfigManager::new();
        self.setup_logging(&manager)?;

        log::info!(target: "linelog", "linelog starting up");
        let config = Config::from_env()?;
        log::trace!(target: "linelog", "environment config: {:?}", config);

        let logger = self.build_logger(&config)?;
        log::info!(target: "linelog", "running command {}", &self.cmd);
        log::debug!(target: "linelog", "flags={} sinks={}", logger.flags(), self.files.len() + 1);

        let result = match &self.cmd {
            LinelogCmd::Print(print) => print.run(&logger),
            LinelogCmd::Printf(printf) => printf.run(&logger),
            LinelogCmd::Fatal(fatal) => fatal.run(&logger),
            LinelogCmd::Panic(panic) => panic.run(&logger),
            LinelogCmd::Info(info) => info.run(&logger, &manager),
        };

        if let Err(msg) = &result {
            log::error!(target: "linelog", "failed running command {}, error={} cause={}", &self.cmd, msg, msg.root_cause());
        }

        result
    }
}
