mod commands;

use crate::commands::Linelog;
use clap::Parser;
use std::process::ExitCode;

fn report(err: &eyre::Report) {
    eprint!("\x1b[31m");
    eprint!("Error: {}", err);

    if err.chain().count() > 1 {
        eprintln!();
        eprintln!();
        eprintln!("Caused by:");
        for cause in err.chain().skip(1) {
            eprintln!("  {}", cause);
        }
        eprint!("\x1b[0m");
    } else {
        eprintln!("\x1b[0m");
    }
}

fn main() -> ExitCode {
    let linelog = Linelog::parse();

    match linelog.run() {
        Err(err) => {
            report(&err);
            ExitCode::from(1)
        }
        Ok(_) => ExitCode::from(0),
    }
}
