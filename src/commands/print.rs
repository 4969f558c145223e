use std::fmt::Display;

use clap::Args;
use linelog::Logger;

#[derive(Args, Debug)]
pub struct Cmd {
    #[arg(long, help = "Separate the values with spaces instead of writing them back to back.")]
    pub ln: bool,

    #[arg(required = true, num_args = 1.., value_name = "VALUE")]
    pub values: Vec<String>,
}

impl Cmd {
    pub fn run(&self, logger: &Logger) -> eyre::Result<()> {
        let values: Vec<&dyn Display> = self.values.iter().map(|v| v as &dyn Display).collect();

        if self.ln {
            logger.infoln(&values);
        } else {
            logger.info(&values);
        }

        Ok(())
    }
}
