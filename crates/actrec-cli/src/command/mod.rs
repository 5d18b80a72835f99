use clap::{Parser, Subcommand};

use self::{backends::BackendsArg, summarize::SummarizeArg};

mod backends;
mod summarize;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Accumulate statistics over a JSON array of data
    Summarize(#[clap(flatten)] SummarizeArg),
    /// List the numeric backends compiled into this build
    Backends(#[clap(flatten)] BackendsArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Summarize(arg) => summarize::run(&arg)?,
        Mode::Backends(arg) => backends::run(&arg),
    }
    Ok(())
}
