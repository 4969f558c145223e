use clap::Args;
use linelog::Logger;

#[derive(Args, Debug)]
pub struct Cmd {
    pub message: String,
}

impl Cmd {
    pub fn run(&self, logger: &Logger) -> eyre::Result<()> {
        log::warn!(target: "linelog", "exiting after fatal message");
        logger.fatalf(format_args!("{}", self.message))
    }
}
