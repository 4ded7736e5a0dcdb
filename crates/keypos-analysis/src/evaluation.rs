//! Evaluation shift detection.
//!
//! Stands in for engine-based evaluation: until a real evaluator feeds
//! scores into the records, shifts are detected from the material balance
//! alone. The interface is shaped so swapping in centipawn deltas later
//! only changes the scoring closure.

use keypos_engine::Board;
use tracing::{debug, warn};

use crate::{
    candidate::{Candidate, CandidateKind, PriorityTier},
    record::PositionRecord,
};

/// Minimum absolute swing, in pawn units, worth flagging.
pub const SHIFT_THRESHOLD: f64 = 1.0;

/// At most this many shift candidates per game.
pub const MAX_SHIFTS: usize = 3;

/// Flags positions where the material balance swings sharply.
///
/// Compares each consecutive pair of records and emits a medium-priority
/// candidate for the later one when the balance moves by more than
/// [`SHIFT_THRESHOLD`]. At most [`MAX_SHIFTS`] candidates are returned,
/// in sequence order: the first qualifying shifts by default, or the
/// largest ones when `rank_by_magnitude` is set. Records whose board
/// state fails to parse are skipped with a diagnostic.
#[must_use]
pub fn detect_evaluation_shifts(
    positions: &[PositionRecord],
    rank_by_magnitude: bool,
) -> Vec<Candidate> {
    let mut shifts: Vec<(usize, f64)> = Vec::new();
    let mut prev: Option<f64> = None;
    for (index, record) in positions.iter().enumerate() {
        let balance = match Board::from_fen(&record.board_state) {
            Ok(board) => f64::from(board.material_balance()),
            Err(err) => {
                warn!(
                    move_number = record.move_number,
                    error = %err,
                    "skipping unparseable board state in shift detection"
                );
                continue;
            }
        };
        if let Some(prev) = prev {
            let change = (balance - prev).abs();
            if change > SHIFT_THRESHOLD {
                shifts.push((index, change));
            }
        }
        prev = Some(balance);
    }

    if rank_by_magnitude && shifts.len() > MAX_SHIFTS {
        shifts.sort_by(|a, b| b.1.total_cmp(&a.1));
        shifts.truncate(MAX_SHIFTS);
        shifts.sort_by_key(|&(index, _)| index);
    } else {
        shifts.truncate(MAX_SHIFTS);
    }

    let candidates: Vec<_> = shifts
        .into_iter()
        .map(|(index, change)| {
            let record = &positions[index];
            Candidate {
                position: record.clone(),
                reason: format!(
                    "Material swing of {change:.1} on move {}",
                    record.move_number
                ),
                priority: PriorityTier::Medium,
                kind: CandidateKind::EvaluationShift { change },
            }
        })
        .collect();
    debug!(count = candidates.len(), "detected evaluation shifts");
    candidates
}
