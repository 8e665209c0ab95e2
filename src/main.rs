use anyhow::Result;
use clap::Parser;

use brightr::args::{Cli, Command};
use brightr::commands;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Start => commands::control::handle_start(),
        Command::Stop => commands::control::handle_stop(),
        Command::Status => commands::control::handle_status(),
        Command::Run => commands::control::handle_run(),
        Command::Show => commands::edit::handle_show(),
        Command::Add { time, brightness } => commands::edit::handle_add(&time, brightness),
        Command::Remove { time } => commands::edit::handle_remove(&time),
        Command::Test { brightness } => commands::test::handle_test(brightness),
    }
}
