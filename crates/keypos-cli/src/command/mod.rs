use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use self::{replay::ReplayArg, select::SelectArg};

mod replay;
mod select;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Select the key positions of a game
    Select(#[clap(flatten)] SelectArg),
    /// Replay a game and dump its full position sequence
    Replay(#[clap(flatten)] ReplayArg),
}

pub fn run() -> anyhow::Result<()> {
    init_tracing();
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Select(arg) => select::run(&arg)?,
        Mode::Replay(arg) => replay::run(&arg)?,
    }
    Ok(())
}

// Diagnostics go to stderr so JSON output on stdout stays parseable.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}
