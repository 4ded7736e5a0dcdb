//! Strategic checkpoint selection.
//!
//! The fallback generator: when the targeted heuristics find little, this
//! one guarantees a minimum of coverage by sampling fixed structural
//! points of the game. It is the only generator that looks at how many
//! candidates already exist.

use tracing::debug;

use crate::{
    candidate::{Candidate, CandidateKind, PriorityTier},
    record::{GamePhase, PositionRecord},
};

/// Checkpoint count the generators collectively aim for.
pub const COVERAGE_TARGET: usize = 5;

/// Checkpoints emitted even when other generators already met the target.
pub const MIN_CHECKPOINTS: usize = 2;

/// Samples fixed structural checkpoints of the game.
///
/// Emits up to `max(COVERAGE_TARGET - existing_count, MIN_CHECKPOINTS)`
/// medium-priority candidates, drawn in order from:
///
/// 1. the midpoint of the opening's development window (moves 8 to 15),
/// 2. up to two middlegame positions at round move numbers,
/// 3. the first endgame position.
#[must_use]
pub fn select_strategic_checkpoints(
    positions: &[PositionRecord],
    existing_count: usize,
) -> Vec<Candidate> {
    let target = COVERAGE_TARGET
        .saturating_sub(existing_count)
        .max(MIN_CHECKPOINTS);

    let mut candidates = Vec::new();

    let development: Vec<&PositionRecord> = positions
        .iter()
        .filter(|r| r.phase == GamePhase::Opening && (8..=15).contains(&r.move_number))
        .collect();
    if let Some(record) = development.get(development.len() / 2).copied() {
        candidates.push(checkpoint(record, "Opening development checkpoint"));
    }

    let round_middlegame = positions
        .iter()
        .filter(|r| r.phase == GamePhase::Middlegame && r.move_number % 10 == 0)
        .take(2);
    for record in round_middlegame {
        candidates.push(checkpoint(record, "Middlegame strategic checkpoint"));
    }

    if let Some(record) = positions.iter().find(|r| r.phase == GamePhase::Endgame) {
        candidates.push(checkpoint(record, "Endgame entry point"));
    }

    candidates.truncate(target);
    debug!(
        count = candidates.len(),
        target, "selected strategic checkpoints"
    );
    candidates
}

fn checkpoint(record: &PositionRecord, reason: &str) -> Candidate {
    Candidate {
        position: record.clone(),
        reason: reason.to_string(),
        priority: PriorityTier::Medium,
        kind: CandidateKind::Strategic,
    }
}
