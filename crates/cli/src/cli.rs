use clap::{Parser, Subcommand};

mod args;
mod data;
mod run;
mod save;

#[derive(Subcommand)]
enum Command {
    /// Inspect and build game data bundles.
    Data(data::Data),
    /// Inspect and manage save files.
    Save(save::Save),
    /// Boot the engine and run the main loop.
    Run(run::Run),
}

#[derive(Parser)]
#[command(name = "fernwood", about = "Tools for the Fernwood adventure engine.")]
pub struct Cli {
    #[clap(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(&self) -> anyhow::Result<()> {
        match &self.command {
            Command::Data(data) => data.run(),
            Command::Save(save) => save.run(),
            Command::Run(run) => run.run(),
        }
    }
}
