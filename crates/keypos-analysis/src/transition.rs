//! Phase transition detection.

use tracing::debug;

use crate::{
    candidate::{Candidate, CandidateKind, PriorityTier},
    record::PositionRecord,
};

/// Flags the first position of each new game phase.
///
/// Walks the sequence in order and emits one high-priority candidate per
/// phase boundary: the emitted record is the first one classified under
/// the new phase. A sequence that never leaves the opening produces no
/// candidates.
#[must_use]
pub fn detect_phase_transitions(positions: &[PositionRecord]) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    let Some(first) = positions.first() else {
        return candidates;
    };
    let mut phase = first.phase;
    for record in &positions[1..] {
        if record.phase != phase {
            candidates.push(Candidate {
                position: record.clone(),
                reason: format!("Transition from {phase} to {}", record.phase),
                priority: PriorityTier::High,
                kind: CandidateKind::Transition {
                    from: phase,
                    to: record.phase,
                },
            });
            phase = record.phase;
        }
    }
    debug!(count = candidates.len(), "detected phase transitions");
    candidates
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        builder::SequenceBuilder,
        record::{GameInfo, GamePhase},
    };

    use super::*;

    fn synthetic(move_number: u32, phase: GamePhase, clock: u32) -> PositionRecord {
        PositionRecord {
            move_number,
            phase,
            board_state: format!("4k3/8/8/8/8/8/8/4K3 w - - {clock} 1"),
            ..PositionRecord::initial(0, Arc::new(GameInfo::default()))
        }
    }

    #[test]
    fn test_no_transitions_in_short_game() {
        let builder = SequenceBuilder::new(0, Arc::new(GameInfo::default()));
        let positions = builder.from_moves("e4 e5 Nf3 Nc6".split_whitespace());
        assert!(detect_phase_transitions(&positions).is_empty());
    }

    #[test]
    fn test_emits_first_record_of_new_phase() {
        let positions = vec![
            synthetic(15, GamePhase::Opening, 0),
            synthetic(16, GamePhase::Middlegame, 1),
            synthetic(16, GamePhase::Middlegame, 2),
            synthetic(30, GamePhase::Endgame, 3),
        ];
        let candidates = detect_phase_transitions(&positions);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].position.move_number, 16);
        assert_eq!(candidates[0].reason, "Transition from opening to middlegame");
        assert_eq!(candidates[0].priority, PriorityTier::High);
        assert_eq!(
            candidates[0].kind,
            CandidateKind::Transition {
                from: GamePhase::Opening,
                to: GamePhase::Middlegame,
            }
        );
        assert_eq!(candidates[1].position.move_number, 30);
        assert_eq!(candidates[1].reason, "Transition from middlegame to endgame");
    }

    #[test]
    fn test_empty_sequence() {
        assert!(detect_phase_transitions(&[]).is_empty());
    }
}
