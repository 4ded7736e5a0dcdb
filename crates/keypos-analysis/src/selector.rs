//! Candidate merging, deduplication, and ranking.
//!
//! The final pipeline stage. Generators run in a fixed order so that
//! first-wins deduplication has deterministic semantics: when two
//! generators flag the same board state, the earlier family keeps it and
//! its justification. The output is ordered by priority, not
//! chronologically; a renderer wanting game order must re-sort by move
//! number itself.

use std::collections::HashSet;

use keypos_engine::Board;
use tracing::{debug, warn};

use crate::{
    candidate::Candidate,
    evaluation::detect_evaluation_shifts,
    mistake::match_critical_moves,
    record::{MoveAnnotation, PositionRecord},
    strategic::select_strategic_checkpoints,
    transition::detect_phase_transitions,
};

/// Default size budget for the selected set.
pub const DEFAULT_MAX_POSITIONS: usize = 15;

/// Tuning knobs for [`select_key_positions`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionConfig {
    /// Upper bound on the returned set; 0 selects nothing.
    pub max_positions: usize,
    pub detect_transitions: bool,
    pub detect_mistakes: bool,
    pub detect_shifts: bool,
    pub strategic_fallback: bool,
    /// Rank evaluation shifts by swing size instead of keeping the
    /// earliest ones.
    pub rank_shifts_by_magnitude: bool,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            max_positions: DEFAULT_MAX_POSITIONS,
            detect_transitions: true,
            detect_mistakes: true,
            detect_shifts: true,
            strategic_fallback: true,
            rank_shifts_by_magnitude: false,
        }
    }
}

/// Selects the key positions of one game.
///
/// Runs the enabled generators over the sequence, merges their output in
/// a fixed order (transitions, mistakes, shifts, strategic), keeps the
/// first candidate per board state, orders by descending priority with
/// move number breaking ties, and truncates to the configured budget.
///
/// Records whose board state is not a structurally valid position are
/// dropped up front with a diagnostic; selection itself never fails.
#[must_use]
pub fn select_key_positions(
    positions: &[PositionRecord],
    annotations: Option<&[MoveAnnotation]>,
    config: &SelectionConfig,
) -> Vec<Candidate> {
    let positions: Vec<PositionRecord> = positions
        .iter()
        .filter(|record| match Board::from_fen(&record.board_state) {
            Ok(_) => true,
            Err(err) => {
                warn!(
                    move_number = record.move_number,
                    game_index = record.game_index,
                    error = %err,
                    "dropping record with invalid board state"
                );
                false
            }
        })
        .cloned()
        .collect();

    let mut candidates = Vec::new();
    if config.detect_transitions {
        candidates.extend(detect_phase_transitions(&positions));
    }
    if config.detect_mistakes
        && let Some(annotations) = annotations
    {
        candidates.extend(match_critical_moves(&positions, annotations));
    }
    if config.detect_shifts {
        candidates.extend(detect_evaluation_shifts(
            &positions,
            config.rank_shifts_by_magnitude,
        ));
    }
    if config.strategic_fallback {
        candidates.extend(select_strategic_checkpoints(&positions, candidates.len()));
    }

    let mut seen = HashSet::new();
    candidates.retain(|candidate| seen.insert(candidate.position.board_state.clone()));

    // Two stable passes: move number first, then priority, so equal
    // priorities end up in game order.
    candidates.sort_by_key(|c| c.position.move_number);
    candidates.sort_by_key(|c| std::cmp::Reverse(c.priority));
    candidates.truncate(config.max_positions);

    debug!(selected = candidates.len(), "selected key positions");
    candidates
}
