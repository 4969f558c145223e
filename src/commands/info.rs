use clap::{Args, CommandFactory};
use linelog::{config::ConfigManager, Logger};

use crate::commands::Linelog;

#[derive(Args, Debug)]
pub struct Cmd {}

impl Cmd {
    pub fn run(&self, logger: &Logger, config: &impl ConfigManager) -> eyre::Result<()> {
        println!(
            "Version:        {}",
            Linelog::command().get_version().unwrap_or("")
        );
        println!("Flags:          {}", logger.flags());
        println!("Prefix:         {:?}", logger.prefix());
        println!(
            "Verbose Log:    {}",
            config.get_log_path().unwrap_or("".to_string())
        );
        Ok(())
    }
}
