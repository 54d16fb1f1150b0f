mod config;
mod import;
mod run;
mod show;
mod store;

use clap::{Parser, Subcommand};

use crate::{
    cli::{import::ImportArgs, run::RunArgs, show::ShowArgs},
    prelude::*,
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Main command: evaluate every channel once and set the target states.
    #[clap(name = "run")]
    Run(Box<RunArgs>),

    /// Store the prices from a JSON file.
    #[clap(name = "import")]
    Import(Box<ImportArgs>),

    /// Print the normalized channels.
    #[clap(name = "show")]
    Show(Box<ShowArgs>),
}

impl Command {
    pub async fn run(self) -> Result {
        match self {
            Self::Run(args) => args.run().await,
            Self::Import(args) => args.run(),
            Self::Show(args) => args.run(),
        }
    }
}
