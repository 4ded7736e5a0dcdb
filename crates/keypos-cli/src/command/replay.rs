use std::path::PathBuf;

use crate::util::{GameSourceArg, Output};

#[derive(Debug, Clone, clap::Args)]
pub struct ReplayArg {
    #[clap(flatten)]
    source: GameSourceArg,
    /// Output file path (defaults to stdout)
    #[arg(long)]
    output: Option<PathBuf>,
}

pub fn run(arg: &ReplayArg) -> anyhow::Result<()> {
    let positions = arg.source.build_positions()?;
    eprintln!("Replayed {} positions", positions.len());
    Output::save_json(&positions, arg.output.clone())
}
