use std::panic;

use clap::Args;
use linelog::{recover, Logger};

#[derive(Args, Debug)]
pub struct Cmd {
    #[arg(long, help = "Catch the panic and report the recovered message instead of aborting.")]
    pub recover: bool,

    pub message: String,
}

impl Cmd {
    pub fn run(&self, logger: &Logger) -> eyre::Result<()> {
        if !self.recover {
            logger.panicf(format_args!("{}", self.message));
        }

        // silence the default hook while recovering
        let hook = panic::take_hook();
        panic::set_hook(Box::new(|_| {}));
        let result: Result<(), String> = recover(|| logger.panicf(format_args!("{}", self.message)));
        panic::set_hook(hook);

        match result {
            Ok(()) => Err(eyre::eyre!("Logger returned from panic")),
            Err(msg) => {
                log::info!(target: "linelog", "recovered from panic");
                println!("recovered: {}", msg);
                Ok(())
            }
        }
    }
}
