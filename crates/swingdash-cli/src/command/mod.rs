use clap::{Parser, Subcommand};

use self::{compare::CompareArg, describe::DescribeArg, sessions::SessionsArg};

mod compare;
mod describe;
mod sessions;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Compare a baseline session against a comparison session
    Compare(#[clap(flatten)] CompareArg),
    /// Summarize the key metrics of a single session
    Describe(#[clap(flatten)] DescribeArg),
    /// List the CSV sessions found in directories
    Sessions(#[clap(flatten)] SessionsArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Compare(arg) => compare::run(&arg)?,
        Mode::Describe(arg) => describe::run(&arg)?,
        Mode::Sessions(arg) => sessions::run(&arg)?,
    }
    Ok(())
}
