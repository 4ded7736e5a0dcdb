use std::path::PathBuf;

use keypos_analysis::{
    record::MoveAnnotation,
    selector::{self, SelectionConfig},
};

use crate::{
    schema::{AnnotationEntry, SelectedPosition},
    util::{self, GameSourceArg, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub struct SelectArg {
    #[clap(flatten)]
    source: GameSourceArg,
    /// Path to a JSON annotation file (one entry per ply)
    #[arg(long)]
    annotations: Option<PathBuf>,
    /// Maximum number of positions to select
    #[arg(long, default_value_t = selector::DEFAULT_MAX_POSITIONS)]
    max_positions: usize,
    /// Skip phase transition detection
    #[arg(long)]
    no_transitions: bool,
    /// Skip critical move matching
    #[arg(long)]
    no_mistakes: bool,
    /// Skip evaluation shift detection
    #[arg(long)]
    no_shifts: bool,
    /// Skip strategic fallback checkpoints
    #[arg(long)]
    no_strategic: bool,
    /// Rank evaluation shifts by swing size instead of game order
    #[arg(long)]
    shifts_by_magnitude: bool,
    /// Output file path (defaults to stdout)
    #[arg(long)]
    output: Option<PathBuf>,
}

pub fn run(arg: &SelectArg) -> anyhow::Result<()> {
    let positions = arg.source.build_positions()?;

    let annotations: Option<Vec<MoveAnnotation>> = match &arg.annotations {
        Some(path) => {
            let entries: Vec<AnnotationEntry> = util::read_json_file("annotation", path)?;
            Some(
                entries
                    .into_iter()
                    .enumerate()
                    .map(|(ply, entry)| entry.into_annotation(ply))
                    .collect(),
            )
        }
        None => None,
    };

    let config = SelectionConfig {
        max_positions: arg.max_positions,
        detect_transitions: !arg.no_transitions,
        detect_mistakes: !arg.no_mistakes,
        detect_shifts: !arg.no_shifts,
        strategic_fallback: !arg.no_strategic,
        rank_shifts_by_magnitude: arg.shifts_by_magnitude,
    };
    let selected = selector::select_key_positions(&positions, annotations.as_deref(), &config);

    let report: Vec<SelectedPosition> = selected.iter().map(SelectedPosition::from).collect();
    Output::save_json(&report, arg.output.clone())
}
