//! Critical move matching against external annotations.
//!
//! Annotations arrive as a parallel per-ply list produced by an outside
//! evaluator; entry `p` describes the `p`-th played ply. The matcher
//! translates a ply index back into the move number and side-to-move of
//! the resulting position and looks that record up in the sequence, so a
//! sequence with skipped plies simply fails to match rather than flagging
//! the wrong position.

use keypos_engine::Color;
use tracing::debug;

use crate::{
    candidate::{Candidate, CandidateKind, PriorityTier},
    record::{MoveAnnotation, PositionRecord},
};

/// Flags positions reached by annotated blunders and inaccuracies.
///
/// Emits at most one critical-priority candidate per critical annotation,
/// in annotation order. Annotations without a critical judgment, and
/// annotations whose ply has no corresponding record, are ignored.
#[must_use]
pub fn match_critical_moves(
    positions: &[PositionRecord],
    annotations: &[MoveAnnotation],
) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    for (ply, annotation) in annotations.iter().enumerate() {
        let Some(judgment) = annotation.judgment.filter(|j| j.is_critical()) else {
            continue;
        };
        let ply = u32::try_from(ply).unwrap_or(u32::MAX);
        let expected_move = ply / 2 + 1;
        // White moves on even plies; the resulting record then has the
        // opponent to move.
        let expected_side = if ply % 2 == 0 {
            Color::Black
        } else {
            Color::White
        };
        let Some(record) = positions
            .iter()
            .find(|r| r.move_number == expected_move && r.side_to_move == expected_side)
        else {
            debug!(ply, %judgment, "critical annotation has no matching position");
            continue;
        };
        candidates.push(Candidate {
            position: record.clone(),
            reason: format!(
                "{judgment} by {} on move {expected_move}",
                expected_side.opponent()
            ),
            priority: PriorityTier::Critical,
            kind: CandidateKind::Mistake {
                judgment,
                evaluation: annotation.evaluation,
            },
        });
    }
    debug!(count = candidates.len(), "matched critical moves");
    candidates
}
